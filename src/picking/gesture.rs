//! Pointer gesture recognition: click vs. drag, and double-click.

use glam::Vec2;
use web_time::{Duration, Instant};

/// Default maximum pointer travel (px) for a click.
pub const DEFAULT_CLICK_THRESHOLD: f32 = 5.0;
/// Default maximum interval between the two clicks of a double-click.
pub const DEFAULT_DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Where a press-to-release interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No button held.
    Idle,
    /// Button held, pointer still within the click threshold.
    PressHeld,
    /// Button held, pointer moved past the click threshold.
    Dragging,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickResult {
    /// Released within the threshold of the press point.
    Click {
        /// Release position.
        position: Vec2,
    },
    /// Released past the threshold; no selection change.
    Drag,
    /// Release without a recorded press.
    NoAction,
}

/// Click/drag state machine for one pointer.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    down_position: Option<Vec2>,
    is_dragging: bool,
    click_threshold: f32,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_THRESHOLD)
    }
}

impl GestureTracker {
    /// Tracker with a click threshold in pixels.
    #[must_use]
    pub fn new(click_threshold: f32) -> Self {
        Self {
            down_position: None,
            is_dragging: false,
            click_threshold,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match (self.down_position, self.is_dragging) {
            (None, _) => GesturePhase::Idle,
            (Some(_), false) => GesturePhase::PressHeld,
            (Some(_), true) => GesturePhase::Dragging,
        }
    }

    /// Whether the current press has turned into a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Click threshold in pixels.
    #[must_use]
    pub fn click_threshold(&self) -> f32 {
        self.click_threshold
    }

    /// Change the click threshold; non-positive values are ignored.
    pub fn set_click_threshold(&mut self, threshold: f32) {
        if threshold > 0.0 {
            self.click_threshold = threshold;
        }
    }

    /// Record a press.
    pub fn pointer_down(&mut self, position: Vec2) {
        self.down_position = Some(position);
        self.is_dragging = false;
    }

    /// Track a move. Returns `true` exactly when this move starts a drag.
    pub fn pointer_move(&mut self, position: Vec2) -> bool {
        let Some(down) = self.down_position else {
            return false;
        };
        if self.is_dragging || down.distance(position) <= self.click_threshold {
            return false;
        }
        self.is_dragging = true;
        true
    }

    /// Classify a release and return to idle.
    pub fn pointer_up(&mut self, position: Vec2) -> ClickResult {
        let Some(down) = self.down_position.take() else {
            return ClickResult::NoAction;
        };
        self.is_dragging = false;
        if down.distance(position) <= self.click_threshold {
            ClickResult::Click { position }
        } else {
            ClickResult::Drag
        }
    }

    /// Forget any in-flight press.
    pub fn reset(&mut self) {
        self.down_position = None;
        self.is_dragging = false;
    }
}

/// Detects two clicks close together in time and space.
///
/// Runs its own press tracking so it works whether or not selection mode is
/// active.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    window: Duration,
    distance_threshold: f32,
    down_position: Option<Vec2>,
    last_click: Option<(Instant, Vec2)>,
}

impl Default for DoubleClickDetector {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK_WINDOW, DEFAULT_CLICK_THRESHOLD)
    }
}

impl DoubleClickDetector {
    /// Detector with a time window and a pixel distance threshold.
    #[must_use]
    pub fn new(window: Duration, distance_threshold: f32) -> Self {
        Self {
            window,
            distance_threshold,
            down_position: None,
            last_click: None,
        }
    }

    /// Maximum interval between the two clicks.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Change the time window.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Change the distance threshold; non-positive values are ignored.
    pub fn set_distance_threshold(&mut self, threshold: f32) {
        if threshold > 0.0 {
            self.distance_threshold = threshold;
        }
    }

    /// Record a press.
    pub fn pointer_down(&mut self, position: Vec2) {
        self.down_position = Some(position);
    }

    /// Process a release. Returns `true` when it completes a double-click.
    ///
    /// Drags break any pending first click; a completed double-click resets
    /// the detector so a third click starts over.
    pub fn pointer_up(&mut self, position: Vec2, now: Instant) -> bool {
        let Some(down) = self.down_position.take() else {
            return false;
        };
        if down.distance(position) > self.distance_threshold {
            self.last_click = None;
            return false;
        }
        match self.last_click.take() {
            Some((time, previous))
                if now.saturating_duration_since(time) <= self.window
                    && previous.distance(position) <= self.distance_threshold =>
            {
                true
            }
            _ => {
                self.last_click = Some((now, position));
                false
            }
        }
    }

    /// Forget any pending click.
    pub fn reset(&mut self) {
        self.down_position = None;
        self.last_click = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_travel_is_a_click() {
        let mut tracker = GestureTracker::default();
        tracker.pointer_down(Vec2::new(100.0, 100.0));
        assert!(!tracker.pointer_move(Vec2::new(101.0, 101.0)));
        assert_eq!(tracker.phase(), GesturePhase::PressHeld);
        assert_eq!(
            tracker.pointer_up(Vec2::new(102.0, 101.0)),
            ClickResult::Click {
                position: Vec2::new(102.0, 101.0)
            }
        );
        assert_eq!(tracker.phase(), GesturePhase::Idle);
    }

    #[test]
    fn large_travel_is_a_drag() {
        let mut tracker = GestureTracker::default();
        tracker.pointer_down(Vec2::new(100.0, 100.0));
        assert!(tracker.pointer_move(Vec2::new(110.0, 100.0)));
        assert_eq!(tracker.phase(), GesturePhase::Dragging);
        // Drag start is reported once
        assert!(!tracker.pointer_move(Vec2::new(120.0, 100.0)));
        assert_eq!(tracker.pointer_up(Vec2::new(110.0, 100.0)), ClickResult::Drag);
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn release_is_measured_from_press_point() {
        let mut tracker = GestureTracker::default();
        tracker.pointer_down(Vec2::new(100.0, 100.0));
        let _ = tracker.pointer_move(Vec2::new(150.0, 100.0));
        // Came back before releasing: still a click
        assert!(matches!(
            tracker.pointer_up(Vec2::new(101.0, 100.0)),
            ClickResult::Click { .. }
        ));
    }

    #[test]
    fn up_without_down_does_nothing() {
        let mut tracker = GestureTracker::default();
        assert_eq!(tracker.pointer_up(Vec2::ZERO), ClickResult::NoAction);
    }

    #[test]
    fn threshold_must_be_positive() {
        let mut tracker = GestureTracker::default();
        tracker.set_click_threshold(-1.0);
        assert_eq!(tracker.click_threshold(), 5.0);
        tracker.set_click_threshold(12.0);
        assert_eq!(tracker.click_threshold(), 12.0);
    }

    fn click(detector: &mut DoubleClickDetector, position: Vec2, now: Instant) -> bool {
        detector.pointer_down(position);
        detector.pointer_up(position, now)
    }

    #[test]
    fn close_clicks_within_window_fire() {
        let mut detector = DoubleClickDetector::default();
        let start = Instant::now();
        assert!(!click(&mut detector, Vec2::new(50.0, 50.0), start));
        assert!(click(
            &mut detector,
            Vec2::new(51.0, 49.0),
            start + Duration::from_millis(250)
        ));
        // Third click starts over
        assert!(!click(
            &mut detector,
            Vec2::new(51.0, 49.0),
            start + Duration::from_millis(260)
        ));
    }

    #[test]
    fn distant_clicks_do_not_fire() {
        let mut detector = DoubleClickDetector::default();
        let start = Instant::now();
        assert!(!click(&mut detector, Vec2::new(50.0, 50.0), start));
        assert!(!click(
            &mut detector,
            Vec2::new(80.0, 80.0),
            start + Duration::from_millis(100)
        ));
    }

    #[test]
    fn slow_clicks_do_not_fire() {
        let mut detector = DoubleClickDetector::default();
        let start = Instant::now();
        assert!(!click(&mut detector, Vec2::new(50.0, 50.0), start));
        assert!(!click(
            &mut detector,
            Vec2::new(50.0, 50.0),
            start + Duration::from_millis(400)
        ));
    }

    #[test]
    fn drag_breaks_pending_click() {
        let mut detector = DoubleClickDetector::default();
        let start = Instant::now();
        assert!(!click(&mut detector, Vec2::new(50.0, 50.0), start));
        detector.pointer_down(Vec2::new(50.0, 50.0));
        assert!(!detector.pointer_up(Vec2::new(90.0, 50.0), start + Duration::from_millis(50)));
        assert!(!click(
            &mut detector,
            Vec2::new(50.0, 50.0),
            start + Duration::from_millis(100)
        ));
    }
}
