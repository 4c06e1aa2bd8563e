use crate::config::NOMINAL_FRAME_MS;
use crate::simulation::cell::{Cell, HEIGHT, VELOCITY};
use crate::simulation::grid::{Grid, Neighborhood};
use crate::simulation::kernel::{KernelParams, Kernels, Phase};

/// Host-side backend: runs a per-cell update function over whole grids.
///
/// `update` sees the input neighbourhood of one cell and returns that cell's
/// output; `present` receives the front buffer once per frame.
pub struct CpuKernels<U, P> {
    update: U,
    present: P,
}

impl<U, P> CpuKernels<U, P>
where
    U: FnMut(&Neighborhood<'_>, &KernelParams) -> Cell,
    P: FnMut(&Grid),
{
    pub fn new(update: U, present: P) -> Self {
        Self { update, present }
    }
}

impl<U, P> Kernels for CpuKernels<U, P>
where
    U: FnMut(&Neighborhood<'_>, &KernelParams) -> Cell,
    P: FnMut(&Grid),
{
    type Target = Grid;

    fn invoke(&mut self, params: &KernelParams, input: &Grid, output: &mut Grid) {
        debug_assert_eq!(
            (input.rows(), input.cols()),
            (output.rows(), output.cols())
        );
        for row in 0..input.rows() {
            for col in 0..input.cols() {
                let cell = (self.update)(&input.neighborhood(row, col), params);
                output.set_cell(row, col, &cell);
            }
        }
    }

    fn present(&mut self, input: &Grid) {
        (self.present)(input);
    }

    fn upload(&mut self, target: &mut Grid, grid: &Grid) {
        target.clone_from(grid);
    }
}

/// Host mirror of the bundled update shader.
///
/// Symplectic Euler on the 5-point Laplacian: the velocity phase accelerates
/// by `c² ∇²h` and applies the pointer drop, the position phase integrates
/// `h += v dt`. Border cells are held at zero.
#[derive(Clone, Copy, Debug)]
pub struct WaveKernel {
    pub surface_width: u32,
    pub surface_height: u32,
}

impl WaveKernel {
    pub fn update(&self, n: &Neighborhood<'_>, params: &KernelParams) -> Cell {
        if n.is_border() {
            return [0.0; 4];
        }

        let dt = params.delta_time_ms / NOMINAL_FRAME_MS;
        let center = n.center();
        let mut out = center;

        match params.phase {
            Phase::Velocity => {
                let laplacian = n.at(0, 1)[HEIGHT] + n.at(0, -1)[HEIGHT] + n.at(1, 0)[HEIGHT]
                    + n.at(-1, 0)[HEIGHT]
                    - 4.0 * center[HEIGHT];
                let mut velocity = (center[VELOCITY] + params.wave.wave_speed_sq * laplacian * dt)
                    * params.wave.damping.powf(dt);
                if params.mouse_updated {
                    velocity -= params.wave.drop_strength * self.drop_falloff(n, params);
                }
                out[VELOCITY] = velocity;
            }
            Phase::Position => {
                out[HEIGHT] = center[HEIGHT] + center[VELOCITY] * dt;
            }
        }

        out
    }

    /// Gaussian weight of this cell relative to the pointer, in grid space
    fn drop_falloff(&self, n: &Neighborhood<'_>, params: &KernelParams) -> f32 {
        let gx = (params.mouse_x as f32 + 0.5) * n.cols() as f32 / self.surface_width as f32;
        let gy = (params.mouse_y as f32 + 0.5) * n.rows() as f32 / self.surface_height as f32;
        let dx = n.col() as f32 + 0.5 - gx;
        let dy = n.row() as f32 + 0.5 - gy;
        let r = params.wave.drop_radius;
        (-(dx * dx + dy * dy) / (r * r)).exp()
    }
}
