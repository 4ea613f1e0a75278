use web_time::{Duration, Instant};

/// Frame timing with per-frame delta, smoothed FPS and optional frame
/// limiting.
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32, now: Instant) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            last_frame: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Returns true if enough time has passed since the last frame to render.
    #[must_use]
    pub fn should_render(&self, now: Instant) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        now.saturating_duration_since(self.last_frame)
            >= self.min_frame_duration
    }

    /// Mark the start of a new frame and return the time elapsed since the
    /// previous one.
    pub fn begin_frame(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        elapsed
    }

    /// Get the current FPS (smoothed, for display).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_reports_delta() {
        let start = Instant::now();
        let mut timing = FrameTiming::new(0, start);
        let delta = timing.begin_frame(start + Duration::from_millis(16));
        assert_eq!(delta, Duration::from_millis(16));
        // 60 → nudged towards 62.5
        assert!(timing.fps() > 60.0);
    }

    #[test]
    fn frame_limiter_waits_for_budget() {
        let start = Instant::now();
        let timing = FrameTiming::new(30, start);
        assert!(!timing.should_render(start + Duration::from_millis(10)));
        assert!(timing.should_render(start + Duration::from_millis(40)));
    }
}
