//! Outline effects: edge extraction, outline materials, the post-process
//! pass chain and the manager that owns outline artifacts.

pub mod compositor;
pub mod edges;
pub mod manager;
pub mod material;

pub use manager::{EffectsManager, OutlineArtifact};
pub use material::{OutlineMaterial, OutlineStyle};
