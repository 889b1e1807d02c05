//! Live frame-rate measurement for the overlay.

use crate::constants::FPS_WINDOW_SECS;
use std::time::{Duration, Instant};

/// Averages the frame rate over fixed windows
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window: Duration,
    window_start: Instant,
    frames: u32,
    fps: f64,
}

impl FpsMeter {
    /// Start measuring; `initial` is shown until the first window completes
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self::starting_at(initial, Instant::now())
    }

    /// Start measuring from a given instant
    #[must_use]
    pub fn starting_at(initial: f64, start: Instant) -> Self {
        Self {
            window: Duration::from_secs_f64(FPS_WINDOW_SECS),
            window_start: start,
            frames: 0,
            fps: initial,
        }
    }

    /// Count one frame captured now
    pub fn record_frame(&mut self) -> f64 {
        self.record_frame_at(Instant::now())
    }

    /// Count one frame captured at `now`
    pub fn record_frame_at(&mut self, now: Instant) -> f64 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= self.window {
            self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }

    /// Restart the window, e.g. after a pause
    pub fn restart(&mut self) {
        self.frames = 0;
        self.window_start = Instant::now();
    }

    /// Latest measurement
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}
