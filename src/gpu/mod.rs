//! GPU resource management.
//!
//! Shader composition is always available (and tested without a device);
//! the wgpu surface, pipelines and [`scene_renderer::SceneRenderer`] are
//! behind the `gpu` feature.

/// Shared wgpu boilerplate for the scene pipelines.
#[cfg(feature = "gpu")]
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
#[cfg(feature = "gpu")]
pub mod render_context;
/// Renderer implementation drawing scenes with wgpu.
#[cfg(feature = "gpu")]
pub mod scene_renderer;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
