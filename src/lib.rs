//! Ping-pong wave simulation on the GPU.
//!
//! `simulation` holds the backend-independent core: grid layout, initial
//! condition, double buffering and the two-phase frame loop. `gpu` runs the
//! same loop on wgpu with a compute update kernel and a render presentation
//! kernel.

pub mod app;
pub mod config;
pub mod error;
pub mod gpu;
pub mod simulation;

pub use config::SimConfig;
pub use error::SetupError;
