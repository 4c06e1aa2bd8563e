use std::borrow::Cow;
use wgpu::{CompilationMessageType, Device, ShaderModule};

use crate::error::SetupError;

/// Token in the update kernel replaced with the storage texture format
pub const FORMAT_TOKEN: &str = "{{GRID_FORMAT}}";

/// Token in the update kernel replaced with the workgroup edge length
pub const WORKGROUP_TOKEN: &str = "{{WORKGROUP_SIZE}}";

/// WGSL program supplied to the simulation.
///
/// Update kernels bind `grid_in` (texture_2d<f32>), `grid_out` (write-only
/// storage texture) and a uniform `UpdateParams` at group 0 bindings 0..=2,
/// with entry point `main`. Presentation kernels bind the grid texture alone
/// at binding 0 and provide `vs_main`/`fs_main`.
#[derive(Clone, Debug)]
pub struct KernelSource {
    pub label: String,
    pub wgsl: Cow<'static, str>,
}

impl KernelSource {
    pub fn new(label: impl Into<String>, wgsl: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            wgsl: wgsl.into(),
        }
    }

    /// Bundled finite-difference wave update
    pub fn bundled_update() -> Self {
        Self::new("update-kernel", include_str!("../shaders/update.wgsl"))
    }

    /// Bundled height colormap
    pub fn bundled_present() -> Self {
        Self::new("present-kernel", include_str!("../shaders/present.wgsl"))
    }

    /// Substitute a template token, leaving sources without it untouched
    pub fn specialize(&self, token: &str, value: &str) -> Self {
        if !self.wgsl.contains(token) {
            return self.clone();
        }
        Self {
            label: self.label.clone(),
            wgsl: Cow::Owned(self.wgsl.replace(token, value)),
        }
    }
}

/// Run `build` inside a validation error scope, returning whatever error the
/// device raised while it ran
pub fn validated<T>(device: &Device, build: impl FnOnce() -> T) -> Result<T, wgpu::Error> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = build();
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(value),
        Some(err) => Err(err),
    }
}

/// Log a kernel build failure and wrap it as a setup error
pub fn kernel_build_error(kernel: &str, log: String) -> SetupError {
    log::error!("Failed to build kernel '{}':\n{}", kernel, log);
    SetupError::KernelBuild {
        kernel: kernel.to_string(),
        log,
    }
}

/// Compile a kernel, failing with its compiler log on any error message
pub fn build_module(device: &Device, source: &KernelSource) -> Result<ShaderModule, SetupError> {
    let module = validated(device, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(source.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(source.wgsl.clone()),
        })
    })
    .map_err(|err| kernel_build_error(&source.label, err.to_string()))?;

    let info = pollster::block_on(module.get_compilation_info());
    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, CompilationMessageType::Error))
        .map(|m| m.message.clone())
        .collect();

    if !errors.is_empty() {
        return Err(kernel_build_error(&source.label, errors.join("\n")));
    }

    Ok(module)
}
