//! Rainbow sweep
//!
//! A hue gradient shifts along the strip. `hue_step` sets how tight the
//! rainbow is, `speed` how fast it moves. Palette colors are ignored.
//!
//! Counters: `phase` is the hue offset (0..256), `step` counts frames for
//! the fade-in.

use super::{Effect, EffectCounters, Palette};
use crate::{
    color::{Hsv, Rgb, hsv2rgb, scale_color},
    config::RainbowConfig,
};

/// Frames spent fading in at the start of a run
pub const FADE_IN_FRAMES: u32 = 60;

const HUE_CIRCLE: f32 = 256.0;
const MIN_SPEED: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct RainbowEffect {
    speed: f32,
    hue_step: f32,
    saturation: u8,
    brightness: u8,
}

impl RainbowEffect {
    pub fn new(config: &RainbowConfig) -> Self {
        Self {
            speed: (f32::from(config.speed) / 100.0).max(MIN_SPEED),
            hue_step: f32::from(config.hue_step) / 100.0,
            saturation: config.saturation,
            brightness: config.brightness,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fade_in_level(frame: u32) -> u8 {
        if frame >= FADE_IN_FRAMES {
            255
        } else {
            (frame * 255 / FADE_IN_FRAMES) as u8
        }
    }
}

impl Effect for RainbowEffect {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn update(
        &mut self,
        leds: &mut [Rgb],
        counters: &mut EffectCounters,
        _palette: &Palette,
    ) -> bool {
        let level = Self::fade_in_level(counters.step);

        for (i, led) in leds.iter_mut().enumerate() {
            let hue = libm::fmodf(counters.phase + i as f32 * self.hue_step, HUE_CIRCLE);
            let color = hsv2rgb(Hsv {
                hue: hue as u8,
                sat: self.saturation,
                val: self.brightness,
            });
            *led = scale_color(color, level);
        }

        counters.step = counters.step.saturating_add(1);
        counters.phase += self.speed;
        if counters.phase >= HUE_CIRCLE {
            // Fast sweeps can cover several turns in one frame.
            let turns = libm::floorf(counters.phase / HUE_CIRCLE);
            counters.phase -= turns * HUE_CIRCLE;
            counters.cycles = counters.cycles.saturating_add(turns as u32);
        }
        true
    }
}
