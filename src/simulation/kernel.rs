use crate::config::WaveParams;
use crate::simulation::grid::Grid;
use crate::simulation::mouse::MouseState;

/// Which quantity an update invocation advances
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Velocity,
    Position,
}

impl Phase {
    /// Value of the kernel's `phase` parameter (1 = velocity update)
    pub fn as_flag(self) -> u32 {
        match self {
            Phase::Velocity => 1,
            Phase::Position => 0,
        }
    }
}

/// Parameters for one update-kernel invocation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelParams {
    pub phase: Phase,
    pub delta_time_ms: f32,
    pub mouse_x: i32,
    pub mouse_y: i32,
    pub mouse_updated: bool,
    pub wave: WaveParams,
}

impl KernelParams {
    pub fn new(phase: Phase, delta_time_ms: f32, mouse: &MouseState, wave: WaveParams) -> Self {
        Self {
            phase,
            delta_time_ms,
            mouse_x: mouse.x,
            mouse_y: mouse.y,
            mouse_updated: mouse.updated,
            wave,
        }
    }
}

/// Backend executing the update and presentation kernels.
///
/// `invoke` must read only `input` and write every cell of `output`.
/// `present` draws `input` to the visible surface, never to a simulation
/// buffer. Frame hooks bracket one loop step so a backend can batch work.
pub trait Kernels {
    /// One simulation buffer
    type Target;

    fn begin_frame(&mut self) {}

    fn invoke(&mut self, params: &KernelParams, input: &Self::Target, output: &mut Self::Target);

    fn present(&mut self, input: &Self::Target);

    fn end_frame(&mut self) {}

    /// Overwrite a buffer with host data
    fn upload(&mut self, target: &mut Self::Target, grid: &Grid);
}
