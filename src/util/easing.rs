//! Easing functions for camera tweens.
//!
//! All curves map `t ∈ [0, 1]` to `[0, 1]` with `f(0) = 0` and `f(1) = 1`.

/// Easing function variants for tween curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    #[default]
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic ease-out: `1 - (1 - t)³`.
    CubicOut,
}

impl EasingFunction {
    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
        }
    }
}
