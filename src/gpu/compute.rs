use wgpu::{BindGroup, BindGroupLayout, Buffer, ComputePipeline as WgpuComputePipeline, Device};

use crate::config::WORKGROUP_SIZE;
use crate::error::SetupError;
use crate::gpu::buffers::{grid_format, wgsl_storage_format, GridTexture};
use crate::gpu::shader::{
    build_module, kernel_build_error, validated, KernelSource, FORMAT_TOKEN, WORKGROUP_TOKEN,
};
use crate::simulation::Channels;

/// Compute pipeline running the update kernel over the whole grid
pub struct UpdatePipeline {
    pipeline: WgpuComputePipeline,
    bind_group_layout: BindGroupLayout,
}

impl UpdatePipeline {
    /// Build the update kernel for the given channel layout
    pub fn new(device: &Device, source: &KernelSource, channels: Channels) -> Result<Self, SetupError> {
        let source = source
            .specialize(FORMAT_TOKEN, wgsl_storage_format(channels))
            .specialize(WORKGROUP_TOKEN, &WORKGROUP_SIZE.to_string());
        let shader = build_module(device, &source)?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("update-bind-group-layout"),
            entries: &[
                // Input grid (sampled without filtering)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Output grid (write-only storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: grid_format(channels),
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                // Update parameters (uniform)
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("update-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = validated(device, || {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("update-compute-pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            })
        })
        .map_err(|err| kernel_build_error(&source.label, err.to_string()))?;

        Ok(Self {
            pipeline,
            bind_group_layout,
        })
    }

    /// Bind `input` for reading and `output` for writing
    pub fn create_bind_group(
        &self,
        device: &Device,
        input: &GridTexture,
        output: &GridTexture,
        params_buffer: &Buffer,
    ) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("update-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&input.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&output.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Record one pass covering every cell
    pub fn dispatch(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        bind_group: &BindGroup,
        cols: u32,
        rows: u32,
    ) {
        let workgroups_x = cols.div_ceil(WORKGROUP_SIZE);
        let workgroups_y = rows.div_ceil(WORKGROUP_SIZE);

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("update-compute-pass"),
            timestamp_writes: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.dispatch_workgroups(workgroups_x, workgroups_y, 1);
    }
}
