use thiserror::Error;

/// Fatal errors raised while building the simulation; the frame loop never
/// starts when one of these is returned.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("invalid grid {rows}x{cols}: {reason}")]
    InvalidGrid { rows: u32, cols: u32, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface not supported by adapter")]
    SurfaceUnsupported,

    /// The adapter cannot write to floating point textures from a kernel
    #[error("floating point render targets unsupported for {format:?}")]
    FloatRenderUnsupported { format: wgpu::TextureFormat },

    #[error("kernel '{kernel}' failed to build:\n{log}")]
    KernelBuild { kernel: String, log: String },

    #[error("render target misconfigured: {reason}")]
    RenderTarget { reason: String },
}
