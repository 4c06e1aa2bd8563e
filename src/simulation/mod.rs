pub mod buffers;
pub mod cell;
pub mod clock;
pub mod cpu;
pub mod frame_loop;
pub mod grid;
pub mod initial;
pub mod kernel;
pub mod mouse;

pub use buffers::{BufferSet, Slot};
pub use cell::Channels;
pub use frame_loop::SimulationLoop;
pub use grid::Grid;
pub use initial::PeakParams;
pub use kernel::{KernelParams, Kernels, Phase};
pub use mouse::MouseState;
