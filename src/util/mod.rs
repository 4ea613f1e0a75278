//! Shared utilities: easing curves for tweens and frame timing.

pub mod easing;
/// Per-frame elapsed time and FPS.
pub mod frame_timing;
