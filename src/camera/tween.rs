//! Time-based property tweens for camera position, orbit target and zoom.
//!
//! Tweens are keyed by `(canvas, property)`; starting a new tween on a key
//! replaces the running one, so the latest request always wins.

use glam::Vec3;
use rustc_hash::FxHashMap;
use web_time::{Duration, Instant};

use crate::input::CanvasId;
use crate::util::easing::EasingFunction;

/// Values that can be linearly interpolated.
pub trait Lerp: Copy {
    /// Interpolate from `a` to `b` by `t` in `[0, 1]`.
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

/// A single eased interpolation between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    start: Instant,
    duration: Duration,
    easing: EasingFunction,
}

impl<T: Lerp> Tween<T> {
    /// Tween from `from` to `to` starting at `start`.
    #[must_use]
    pub fn new(
        from: T,
        to: T,
        start: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Eased value at `now`.
    #[must_use]
    pub fn value(&self, now: Instant) -> T {
        T::lerp(self.from, self.to, self.easing.evaluate(self.progress(now)))
    }

    /// Whether the tween has reached its end value.
    #[must_use]
    pub fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// End value.
    #[must_use]
    pub fn end(&self) -> T {
        self.to
    }
}

/// Camera property driven by a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenProperty {
    /// Camera position.
    Position,
    /// Orbit control target.
    Target,
    /// Projection zoom factor.
    Zoom,
}

/// Interpolated value produced by [`CameraTweens::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    /// Vector-valued property (position, target).
    Vector(Vec3),
    /// Scalar property (zoom).
    Scalar(f32),
}

/// One property update for one canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
    /// Canvas whose camera/control is updated.
    pub canvas: CanvasId,
    /// Updated property.
    pub property: TweenProperty,
    /// New value.
    pub value: TweenValue,
}

#[derive(Debug, Clone, Copy)]
enum ActiveTween {
    Vector(Tween<Vec3>),
    Scalar(Tween<f32>),
}

impl ActiveTween {
    fn sample(&self, now: Instant) -> (TweenValue, bool) {
        match self {
            Self::Vector(t) => (TweenValue::Vector(t.value(now)), t.is_done(now)),
            Self::Scalar(t) => (TweenValue::Scalar(t.value(now)), t.is_done(now)),
        }
    }
}

/// Set of running camera tweens.
#[derive(Debug, Default, Clone)]
pub struct CameraTweens {
    active: FxHashMap<(CanvasId, TweenProperty), ActiveTween>,
}

impl CameraTweens {
    /// Start (or replace) a vector tween.
    pub fn start_vector(
        &mut self,
        canvas: CanvasId,
        property: TweenProperty,
        tween: Tween<Vec3>,
    ) {
        if self
            .active
            .insert((canvas, property), ActiveTween::Vector(tween))
            .is_some()
        {
            log::debug!("superseded {property:?} tween on {canvas:?}");
        }
    }

    /// Start (or replace) a scalar tween.
    pub fn start_scalar(
        &mut self,
        canvas: CanvasId,
        property: TweenProperty,
        tween: Tween<f32>,
    ) {
        if self
            .active
            .insert((canvas, property), ActiveTween::Scalar(tween))
            .is_some()
        {
            log::debug!("superseded {property:?} tween on {canvas:?}");
        }
    }

    /// Whether a tween is running for the key.
    #[must_use]
    pub fn is_active(&self, canvas: CanvasId, property: TweenProperty) -> bool {
        self.active.contains_key(&(canvas, property))
    }

    /// Number of running tweens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no tween is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drop every tween targeting `canvas`.
    pub fn cancel_canvas(&mut self, canvas: CanvasId) {
        self.active.retain(|(c, _), _| *c != canvas);
    }

    /// Sample every running tween at `now`, dropping the finished ones
    /// (their final value is still emitted).
    pub fn advance(&mut self, now: Instant) -> Vec<TweenSample> {
        let mut samples = Vec::with_capacity(self.active.len());
        self.active.retain(|&(canvas, property), tween| {
            let (value, done) = tween.sample(now);
            samples.push(TweenSample {
                canvas,
                property,
                value,
            });
            !done
        });
        samples
    }
}
