mod buffers;
mod compute;
mod context;
mod kernels;
mod render;
mod shader;

pub use buffers::GridTexture;
pub use context::GpuContext;
pub use kernels::GpuKernels;
pub use shader::KernelSource;
