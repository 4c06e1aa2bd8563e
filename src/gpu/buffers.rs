use wgpu::{Buffer, BufferUsages, Device, Queue, Texture, TextureFormat, TextureView};

use crate::config::NOMINAL_FRAME_MS;
use crate::simulation::{Channels, Grid, KernelParams, Phase};

/// Texture format backing a grid with the given channel layout
pub fn grid_format(channels: Channels) -> TextureFormat {
    match channels {
        Channels::Two => TextureFormat::Rg32Float,
        Channels::Four => TextureFormat::Rgba32Float,
    }
}

/// WGSL storage format name for the update kernel's output binding
pub fn wgsl_storage_format(channels: Channels) -> &'static str {
    match channels {
        Channels::Two => "rg32float",
        Channels::Four => "rgba32float",
    }
}

/// One simulation buffer: a float texture read as `texture_2d` and written
/// as a storage texture
pub struct GridTexture {
    pub texture: Texture,
    pub view: TextureView,
    pub rows: u32,
    pub cols: u32,
    pub channels: Channels,
}

impl GridTexture {
    pub fn new(device: &Device, label: &str, rows: u32, cols: u32, channels: Channels) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: cols,
                height: rows,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: grid_format(channels),
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            rows,
            cols,
            channels,
        }
    }

    /// Replace the texture contents with a host grid of the same shape
    pub fn upload(&self, queue: &Queue, grid: &Grid) {
        assert_eq!(
            (grid.rows(), grid.cols(), grid.channels()),
            (self.rows, self.cols, self.channels),
            "Grid shape mismatch"
        );

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            grid.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.cols * self.channels.cell_bytes() as u32),
                rows_per_image: Some(self.rows),
            },
            wgpu::Extent3d {
                width: self.cols,
                height: self.rows,
                depth_or_array_layers: 1,
            },
        );
    }
}

/// Update kernel parameters (48 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UpdateUniforms {
    // Invocation contract (20 bytes)
    pub phase: u32,
    pub delta_time: f32,
    pub mouse_x: i32,
    pub mouse_y: i32,
    pub mouse_updated: u32,

    // Surface size for mapping pointer pixels onto the grid (8 bytes)
    pub surface_width: f32,
    pub surface_height: f32,

    // Wave equation parameters (20 bytes)
    pub wave_speed_sq: f32,
    pub damping: f32,
    pub drop_radius: f32,
    pub drop_strength: f32,
    pub nominal_frame_ms: f32,
}

impl UpdateUniforms {
    pub fn new(params: &KernelParams, surface_size: (u32, u32)) -> Self {
        Self {
            phase: params.phase.as_flag(),
            delta_time: params.delta_time_ms,
            mouse_x: params.mouse_x,
            mouse_y: params.mouse_y,
            mouse_updated: params.mouse_updated as u32,
            surface_width: surface_size.0.max(1) as f32,
            surface_height: surface_size.1.max(1) as f32,
            wave_speed_sq: params.wave.wave_speed_sq,
            damping: params.wave.damping,
            drop_radius: params.wave.drop_radius,
            drop_strength: params.wave.drop_strength,
            nominal_frame_ms: NOMINAL_FRAME_MS,
        }
    }
}

/// Uniform buffers for the two update phases.
///
/// Queue writes land before the frame's command buffer runs, so each phase
/// recorded into the same encoder needs its own buffer.
pub struct PhaseUniforms {
    pub velocity: Buffer,
    pub position: Buffer,
}

impl PhaseUniforms {
    pub fn new(device: &Device) -> Self {
        let create = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<UpdateUniforms>() as u64,
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        Self {
            velocity: create("velocity-params-buffer"),
            position: create("position-params-buffer"),
        }
    }

    /// Write parameters for one invocation and return the buffer to bind
    pub fn write(&self, queue: &Queue, phase: Phase, uniforms: &UpdateUniforms) -> &Buffer {
        let buffer = match phase {
            Phase::Velocity => &self.velocity,
            Phase::Position => &self.position,
        };
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(uniforms));
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WaveParams;
    use crate::simulation::MouseState;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<UpdateUniforms>(), 48);
        assert_eq!(std::mem::size_of::<UpdateUniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_follow_parameter_contract() {
        let mut mouse = MouseState::default();
        mouse.press(12, 34);
        let params = KernelParams::new(Phase::Velocity, 16.5, &mouse, WaveParams::default());
        let uniforms = UpdateUniforms::new(&params, (512, 256));
        assert_eq!(uniforms.phase, 1);
        assert_eq!(uniforms.delta_time, 16.5);
        assert_eq!((uniforms.mouse_x, uniforms.mouse_y), (12, 34));
        assert_eq!(uniforms.mouse_updated, 1);
        assert_eq!((uniforms.surface_width, uniforms.surface_height), (512.0, 256.0));

        let params = KernelParams::new(
            Phase::Position,
            16.5,
            &MouseState::default(),
            WaveParams::default(),
        );
        let uniforms = UpdateUniforms::new(&params, (0, 0));
        assert_eq!(uniforms.phase, 0);
        assert_eq!(uniforms.mouse_updated, 0);
        assert_eq!(uniforms.surface_width, 1.0);
    }

    #[test]
    fn test_formats_match_channel_layout() {
        for channels in [Channels::Two, Channels::Four] {
            let format = grid_format(channels);
            assert_eq!(
                format.block_copy_size(None),
                Some(channels.cell_bytes() as u32)
            );
        }
        assert_eq!(wgsl_storage_format(Channels::Two), "rg32float");
    }
}
