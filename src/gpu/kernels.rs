use wgpu::{CommandEncoder, SurfaceTexture};

use crate::config::SimConfig;
use crate::error::SetupError;
use crate::gpu::buffers::{grid_format, GridTexture, PhaseUniforms, UpdateUniforms};
use crate::gpu::compute::UpdatePipeline;
use crate::gpu::context::GpuContext;
use crate::gpu::render::PresentPipeline;
use crate::gpu::shader::{validated, KernelSource};
use crate::simulation::{Grid, KernelParams, Kernels};

/// wgpu backend: the update kernel runs as a compute pass writing the back
/// texture, the presentation kernel as a render pass onto the surface.
///
/// All passes of a frame share one encoder, submitted in `end_frame`.
pub struct GpuKernels {
    gpu: GpuContext,
    update: UpdatePipeline,
    present: PresentPipeline,
    uniforms: PhaseUniforms,
    encoder: Option<CommandEncoder>,
    frame: Option<SurfaceTexture>,
}

impl GpuKernels {
    /// Check capabilities and build both kernels. Any failure here is fatal.
    pub fn new(
        gpu: GpuContext,
        config: &SimConfig,
        update_source: &KernelSource,
        present_source: &KernelSource,
    ) -> Result<Self, SetupError> {
        config.validate()?;

        let format = grid_format(config.channels);
        let features = gpu.adapter.get_texture_format_features(format);
        let required = wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING;
        if !features.allowed_usages.contains(required) {
            log::error!("Adapter cannot write {:?} from a kernel", format);
            return Err(SetupError::FloatRenderUnsupported { format });
        }

        let max_dim = gpu.device.limits().max_texture_dimension_2d;
        if config.rows > max_dim || config.cols > max_dim {
            return Err(SetupError::RenderTarget {
                reason: format!(
                    "grid {}x{} exceeds the device limit of {}",
                    config.rows, config.cols, max_dim
                ),
            });
        }

        log::info!("Creating update pipeline ({:?})...", format);
        let update = UpdatePipeline::new(&gpu.device, update_source, config.channels)?;

        log::info!("Creating present pipeline...");
        let present = PresentPipeline::new(&gpu.device, present_source, gpu.format())?;

        let uniforms = PhaseUniforms::new(&gpu.device);

        Ok(Self {
            gpu,
            update,
            present,
            uniforms,
            encoder: None,
            frame: None,
        })
    }

    /// Allocate one simulation buffer, validated once here rather than per frame
    pub fn create_target(&self, label: &str, config: &SimConfig) -> Result<GridTexture, SetupError> {
        validated(&self.gpu.device, || {
            GridTexture::new(&self.gpu.device, label, config.rows, config.cols, config.channels)
        })
        .map_err(|err| SetupError::RenderTarget {
            reason: format!("{}: {}", label, err),
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    /// Acquire the next surface texture, reconfiguring if it went stale
    fn acquire_surface(&self) -> Option<SurfaceTexture> {
        match self.gpu.surface.get_current_texture() {
            Ok(texture) => Some(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                None
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                None
            }
        }
    }
}

impl Kernels for GpuKernels {
    type Target = GridTexture;

    fn begin_frame(&mut self) {
        frame_encoder(&mut self.encoder, &self.gpu.device);
    }

    fn invoke(&mut self, params: &KernelParams, input: &GridTexture, output: &mut GridTexture) {
        let uniforms = UpdateUniforms::new(params, self.gpu.surface_size());
        let params_buffer = self.uniforms.write(&self.gpu.queue, params.phase, &uniforms);
        let bind_group =
            self.update
                .create_bind_group(&self.gpu.device, input, output, params_buffer);

        let encoder = frame_encoder(&mut self.encoder, &self.gpu.device);
        self.update
            .dispatch(encoder, &bind_group, output.cols, output.rows);
    }

    fn present(&mut self, input: &GridTexture) {
        let Some(frame) = self.acquire_surface() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.present.create_bind_group(&self.gpu.device, input);

        let encoder = frame_encoder(&mut self.encoder, &self.gpu.device);
        self.present.draw(encoder, &view, &bind_group);
        self.frame = Some(frame);
    }

    fn end_frame(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.gpu.queue.submit(std::iter::once(encoder.finish()));
        }
        if let Some(frame) = self.frame.take() {
            frame.present();
        }
    }

    fn upload(&mut self, target: &mut GridTexture, grid: &Grid) {
        target.upload(&self.gpu.queue, grid);
    }
}

/// The encoder for the frame in flight, created on first use
fn frame_encoder<'a>(
    slot: &'a mut Option<CommandEncoder>,
    device: &wgpu::Device,
) -> &'a mut CommandEncoder {
    slot.get_or_insert_with(|| {
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        })
    })
}
