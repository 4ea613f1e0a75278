//! Frame-rate-adaptive hit-test throttling.
//!
//! Pointer moves only stash the latest position; the scheduler releases it
//! for a hit test once every `frames_to_skip` frames. `frames_to_skip`
//! follows an exponentially smoothed FPS estimate through hysteresis bands
//! so it does not oscillate around a threshold.

use glam::Vec2;

use crate::input::CanvasId;

/// Every value `frames_to_skip` can take.
pub const SKIP_LEVELS: [u32; 4] = [1, 3, 5, 8];

const DEFAULT_SKIP: u32 = 3;
const DEFAULT_FPS: f32 = 60.0;
const FPS_SMOOTHING: f32 = 0.1;

/// Below this FPS, escalate to skipping 8 frames.
const TO_HIGH_SKIP: f32 = 25.0;
/// Below this FPS, escalate to skipping 5 frames.
const TO_MED_SKIP: f32 = 35.0;
/// Above this FPS, relax to skipping 3 frames.
const TO_LOW_SKIP: f32 = 45.0;
/// Above this FPS, relax to skipping 1 frame.
const TO_MINIMAL_SKIP: f32 = 90.0;

/// Next `frames_to_skip` value for a smoothed FPS estimate.
///
/// Escalation only happens upward and relaxation only downward, so the
/// 35..45 FPS band keeps whatever level was reached.
#[must_use]
pub fn next_skip(current: u32, fps: f32) -> u32 {
    if fps < TO_HIGH_SKIP && current < 8 {
        8
    } else if fps < TO_MED_SKIP && current < 5 {
        5
    } else if fps > TO_MINIMAL_SKIP && current > 1 {
        1
    } else if fps > TO_LOW_SKIP && current > 3 {
        3
    } else {
        current
    }
}

/// A pointer position waiting for a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingHitTest {
    /// Canvas the pointer is over.
    pub canvas: CanvasId,
    /// Pointer position in pixels.
    pub position: Vec2,
}

/// Throttles hit tests against the measured frame rate.
#[derive(Debug, Clone)]
pub struct HitTestScheduler {
    smoothed_fps: f32,
    frames_to_skip: u32,
    frame_counter: u32,
    pending: Option<PendingHitTest>,
}

impl Default for HitTestScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl HitTestScheduler {
    /// Scheduler at 60 FPS skipping 3 frames.
    #[must_use]
    pub fn new() -> Self {
        Self {
            smoothed_fps: DEFAULT_FPS,
            frames_to_skip: DEFAULT_SKIP,
            frame_counter: 0,
            pending: None,
        }
    }

    /// Stash the latest pointer position, discarding any unprocessed one.
    pub fn queue(&mut self, canvas: CanvasId, position: Vec2) {
        self.pending = Some(PendingHitTest { canvas, position });
    }

    /// Whether a pointer position is waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fold one frame's instantaneous FPS into the estimate and re-evaluate
    /// the skip level.
    pub fn record_fps(&mut self, current_fps: f32) {
        if !current_fps.is_finite() || current_fps <= 0.0 {
            return;
        }
        self.smoothed_fps = self.smoothed_fps * (1.0 - FPS_SMOOTHING)
            + current_fps * FPS_SMOOTHING;
        let next = next_skip(self.frames_to_skip, self.smoothed_fps);
        if next != self.frames_to_skip {
            log::debug!(
                "hit-test skip {} -> {next} at {:.1} fps",
                self.frames_to_skip,
                self.smoothed_fps
            );
            self.frames_to_skip = next;
        }
    }

    /// Advance one frame. Returns the pending position when a hit test is
    /// due, resetting the frame counter.
    ///
    /// Frames without a pending position are not counted.
    pub fn tick(&mut self) -> Option<PendingHitTest> {
        if self.pending.is_none() {
            return None;
        }
        self.frame_counter += 1;
        if self.frame_counter >= self.frames_to_skip {
            self.frame_counter = 0;
            return self.pending.take();
        }
        None
    }

    /// Drop any pending position and return to the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current skip level.
    #[must_use]
    pub fn frames_to_skip(&self) -> u32 {
        self.frames_to_skip
    }

    /// Current smoothed FPS estimate.
    #[must_use]
    pub fn smoothed_fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hysteresis_bands() {
        assert_eq!(next_skip(3, 20.0), 8);
        assert_eq!(next_skip(3, 30.0), 5);
        assert_eq!(next_skip(5, 30.0), 5);
        assert_eq!(next_skip(8, 30.0), 8);
        assert_eq!(next_skip(8, 40.0), 8);
        assert_eq!(next_skip(8, 50.0), 3);
        assert_eq!(next_skip(3, 50.0), 3);
        assert_eq!(next_skip(3, 95.0), 1);
        assert_eq!(next_skip(1, 40.0), 1);
        assert_eq!(next_skip(1, 30.0), 5);
    }

    #[test]
    fn decreasing_fps_never_lowers_skip() {
        let mut skip = DEFAULT_SKIP;
        for fps in (10..=60).rev() {
            let next = next_skip(skip, fps as f32);
            assert!(next >= skip, "skip dropped at {fps} fps");
            assert!(SKIP_LEVELS.contains(&next));
            skip = next;
        }
        assert_eq!(skip, 8);
    }

    #[test]
    fn increasing_fps_never_raises_skip() {
        let mut skip = next_skip(DEFAULT_SKIP, 10.0);
        for fps in 11..=100 {
            let next = next_skip(skip, fps as f32);
            assert!(next <= skip, "skip rose at {fps} fps");
            assert!(SKIP_LEVELS.contains(&next));
            skip = next;
        }
        assert_eq!(skip, 1);
    }

    #[test]
    fn only_latest_event_is_processed() {
        let mut scheduler = HitTestScheduler::new();
        scheduler.queue(CanvasId::Main, Vec2::new(1.0, 1.0));
        scheduler.queue(CanvasId::Main, Vec2::new(2.0, 2.0));
        assert_eq!(scheduler.tick(), None);
        assert_eq!(scheduler.tick(), None);
        let due = scheduler.tick().unwrap();
        assert_eq!(due.position, Vec2::new(2.0, 2.0));
        assert!(!scheduler.has_pending());
        // Counter restarted
        scheduler.queue(CanvasId::Overlay, Vec2::ZERO);
        assert_eq!(scheduler.tick(), None);
    }

    #[test]
    fn idle_frames_are_not_counted() {
        let mut scheduler = HitTestScheduler::new();
        for _ in 0..10 {
            assert_eq!(scheduler.tick(), None);
        }
        scheduler.queue(CanvasId::Main, Vec2::ZERO);
        assert_eq!(scheduler.tick(), None);
    }

    #[test]
    fn smoothing_converges_and_reset_restores_defaults() {
        let mut scheduler = HitTestScheduler::new();
        for _ in 0..100 {
            scheduler.record_fps(15.0);
        }
        assert!((scheduler.smoothed_fps() - 15.0).abs() < 0.1);
        assert_eq!(scheduler.frames_to_skip(), 8);
        scheduler.queue(CanvasId::Main, Vec2::ZERO);
        scheduler.reset();
        assert_eq!(scheduler.frames_to_skip(), 3);
        assert_eq!(scheduler.smoothed_fps(), 60.0);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn invalid_fps_samples_are_ignored() {
        let mut scheduler = HitTestScheduler::new();
        scheduler.record_fps(f32::INFINITY);
        scheduler.record_fps(0.0);
        assert_eq!(scheduler.smoothed_fps(), 60.0);
    }
}
