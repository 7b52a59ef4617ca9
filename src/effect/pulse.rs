//! Breathing pulse
//!
//! The whole strip swings from off to full brightness and back along a
//! raised cosine. One 360 degree sweep is one cycle.

use super::{Effect, EffectCounters, Palette};
use crate::{
    color::{Rgb, scale_color},
    config::PulseConfig,
    math8::unit_to_u8,
};

/// Phase advance per step, in degrees
const PHASE_STEP: f32 = 8.0;
const FULL_TURN: f32 = 360.0;

/// Counters: `step` counts frames towards the next phase step, `phase` is
/// the angle in degrees.
#[derive(Debug, Clone)]
pub struct PulseEffect {
    frame_delay: u32,
}

impl PulseEffect {
    pub fn new(config: &PulseConfig) -> Self {
        Self {
            frame_delay: u32::from(config.speed.max(1)),
        }
    }

    /// Brightness (0-255) at `phase` degrees; 0 at 0 degrees, 255 at 180.
    pub fn level_at(phase: f32) -> u8 {
        let radians = phase * core::f32::consts::PI / 180.0;
        unit_to_u8(0.5 * (1.0 - libm::cosf(radians)))
    }
}

impl Effect for PulseEffect {
    fn update(
        &mut self,
        leds: &mut [Rgb],
        counters: &mut EffectCounters,
        palette: &Palette,
    ) -> bool {
        counters.step += 1;
        if counters.step >= self.frame_delay {
            counters.step = 0;
            counters.phase += PHASE_STEP;
            if counters.phase >= FULL_TURN {
                // Land exactly on "off" at the cycle boundary.
                counters.phase = 0.0;
                counters.cycles = counters.cycles.saturating_add(1);
            }
        }

        leds.fill(scale_color(palette.primary, Self::level_at(counters.phase)));
        true
    }
}
