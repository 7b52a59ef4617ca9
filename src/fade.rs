//! Post-completion fade-out.
//!
//! When an effect finishes, the manager captures the current buffer and
//! ramps it down to black over [`FADE_DURATION`] using a gamma curve, so the
//! fade looks even to the eye instead of dropping off at the end.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::{
    MAX_PIXELS,
    color::{BLACK, Rgb},
    math8::{scale8, unit_to_u8},
};

pub const FADE_DURATION: Duration = Duration::from_millis(3000);
pub const FADE_GAMMA: f32 = 2.2;

/// Snapshot of the strip at completion plus the fade clock
#[derive(Debug, Clone)]
pub struct FadeOut {
    started_at: Instant,
    duration: Duration,
    snapshot: Vec<Rgb, MAX_PIXELS>,
}

impl FadeOut {
    /// Copy `pixels` and start fading at `now`
    pub fn capture(pixels: &[Rgb], now: Instant) -> Self {
        Self::with_duration(pixels, now, FADE_DURATION)
    }

    pub fn with_duration(pixels: &[Rgb], now: Instant, duration: Duration) -> Self {
        let live = &pixels[..pixels.len().min(MAX_PIXELS)];
        Self {
            started_at: now,
            duration,
            snapshot: Vec::from_slice(live).unwrap_or_default(),
        }
    }

    pub fn snapshot(&self) -> &[Rgb] {
        &self.snapshot
    }

    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Linear time fraction in `0.0..=1.0`
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, now: Instant) -> f32 {
        let total = self.duration.as_millis();
        if total == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at).as_millis();
        (elapsed as f32 / total as f32).min(1.0)
    }

    /// Brightness scale for `now`: 255 at the start, 0 once elapsed.
    ///
    /// `scale = (1 - t)^gamma`
    pub fn level(&self, now: Instant) -> u8 {
        let t = self.progress(now);
        if t >= 1.0 {
            return 0;
        }
        unit_to_u8(libm::powf(1.0 - t, FADE_GAMMA))
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            Duration::from_ticks(0)
        } else {
            self.duration - elapsed
        }
    }

    /// Write the faded snapshot into `leds`. Pixels past the snapshot go dark.
    pub fn render_into(&self, leds: &mut [Rgb], now: Instant) {
        let level = self.level(now);
        for (i, led) in leds.iter_mut().enumerate() {
            *led = match self.snapshot.get(i) {
                Some(color) => Rgb {
                    r: scale8(color.r, level),
                    g: scale8(color.g, level),
                    b: scale8(color.b, level),
                },
                None => BLACK,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_endpoints() {
        let white = Rgb::new(255, 255, 255);
        let fade = FadeOut::capture(&[white], Instant::from_millis(100));
        assert_eq!(fade.level(Instant::from_millis(100)), 255);
        assert_eq!(fade.level(Instant::from_millis(3100)), 0);
        assert_eq!(fade.level(Instant::from_millis(9000)), 0);
    }

    #[test]
    fn test_level_is_gamma_shaped() {
        let fade = FadeOut::capture(&[], Instant::from_millis(0));
        // Halfway: 0.5^2.2 * 255 ~= 55
        let mid = fade.level(Instant::from_millis(1500));
        assert!((50..=60).contains(&mid), "mid level was {}", mid);
    }

    #[test]
    fn test_level_never_rises() {
        let fade = FadeOut::capture(&[], Instant::from_millis(0));
        let mut previous = u8::MAX;
        for ms in (0..=3000).step_by(50) {
            let level = fade.level(Instant::from_millis(ms));
            assert!(level <= previous);
            previous = level;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let fade = FadeOut::with_duration(&[], Instant::from_millis(5), Duration::from_millis(0));
        assert!(fade.is_complete(Instant::from_millis(5)));
        assert_eq!(fade.level(Instant::from_millis(5)), 0);
    }
}
