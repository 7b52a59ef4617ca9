//! Frame pacing for the effect tick.
//!
//! The engine does not sleep. The main loop calls `update` as often as it
//! likes and the scheduler decides whether a frame is due.

use embassy_time::{Duration, Instant};

/// Default refresh rate when none is configured.
pub const DEFAULT_REFRESH_RATE_HZ: u16 = 60;

/// Decides when the next frame may be rendered.
#[derive(Debug, Clone, Copy)]
pub struct FrameScheduler {
    interval: Duration,
    last_frame: Option<Instant>,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::from_refresh_rate(DEFAULT_REFRESH_RATE_HZ)
    }
}

impl FrameScheduler {
    /// Create a scheduler with `interval = 1000 / hz` milliseconds.
    ///
    /// A rate of zero is treated as 1 Hz.
    #[allow(clippy::cast_lossless)]
    pub const fn from_refresh_rate(hz: u16) -> Self {
        let hz = if hz == 0 { 1 } else { hz as u64 };
        Self::with_interval(Duration::from_millis(1000 / hz))
    }

    pub const fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// True when no frame was rendered yet or a full interval has elapsed
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_frame {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Record that a frame was rendered at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    /// Forget the last frame so the next tick renders immediately
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}
