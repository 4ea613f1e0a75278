//! Camera system: tagged-variant cameras, cross-model synchronization,
//! orbit controls, tweens and the main/overlay controls manager.

/// Orbit control bound to one camera and one canvas.
pub mod controls;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Main/overlay camera and control ownership.
pub mod manager;
/// Cross-model and same-model camera synchronization.
pub mod sync;
/// Time-based property tweens.
pub mod tween;

pub use self::core::{Camera, Projection, ProjectionKind};
pub use controls::OrbitControls;
pub use manager::ControlsManager;
