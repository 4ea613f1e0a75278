use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::ViewerError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared WGSL modules are registered at construction. Consuming shaders use
/// `#import detview::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping a WGSL re-parse on the
/// device.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path).
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Modules in dependency order.
const SHARED_MODULES: &[ModuleDef] = &[ModuleDef {
    source: include_str!("../../assets/shaders/modules/camera.wgsl"),
    file_path: "modules/camera.wgsl",
}];

/// Mesh and flat-line shader.
pub const MESH_SHADER: &str = include_str!("../../assets/shaders/mesh.wgsl");

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, ViewerError> {
        let mut composer = Composer::default();
        for m in SHARED_MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    ViewerError::Shader(format!(
                        "failed to register module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source (which may contain `#import` directives) into
    /// a `naga::Module`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] on composition failure.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, ViewerError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                ViewerError::Shader(format!("failed to compose '{file_path}': {e}"))
            })
    }

    /// Compose a shader into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] on composition failure.
    #[cfg(feature = "gpu")]
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, ViewerError> {
        let module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(std::borrow::Cow::Owned(module)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::OutlineStyle;

    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (MESH_SHADER, "mesh.wgsl"),
            (
                OutlineStyle::Hover.shader_source(),
                OutlineStyle::Hover.shader_path(),
            ),
            (
                OutlineStyle::Selection.shader_source(),
                OutlineStyle::Selection.shader_path(),
            ),
        ]
    }

    #[test]
    fn all_shaders_compose_and_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let module = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("{e}"));
            let _ = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            )
            .validate(&module)
            .unwrap_or_else(|e| panic!("'{file_path}' failed validation: {e:?}"));
            for entry in ["vs_main", "fs_main"] {
                assert!(
                    module.entry_points.iter().any(|ep| ep.name == entry),
                    "'{file_path}' lacks {entry}"
                );
            }
        }
    }

    #[test]
    fn unknown_import_is_a_shader_error() {
        let mut composer = ShaderComposer::new().unwrap();
        let err = composer
            .compose_naga("#import detview::missing\n", "broken.wgsl")
            .unwrap_err();
        assert!(matches!(err, ViewerError::Shader(_)));
    }
}
