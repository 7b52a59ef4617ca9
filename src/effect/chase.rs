//! Chase effects
//!
//! A bright head runs along the strip leaving a fading trail. Position
//! advances by a fractional step per frame so slow speeds stay smooth.
//!
//! Counters: `step` is the integer head position, `phase` the fractional
//! remainder, `direction` is -1 when the chase runs backwards.

use super::{Effect, EffectCounters, Palette};
use crate::{
    color::{BLACK, Rgb, scale_color},
    config::{ChaseMultiConfig, ChaseSingleConfig},
    math8::scale8,
};

/// Heads in the multi-color chase
const HEADS: usize = 3;

/// Paint one head with its trail behind it
#[allow(clippy::cast_possible_truncation)]
fn draw_trail(leds: &mut [Rgb], head: isize, color: Rgb, trail: usize, fade: u8, reverse: bool) {
    let len = leds.len();
    let taper_len = trail.max(1);
    let keep = 255 - fade;
    let mut falloff: u8 = 255;

    for i in 0..=trail {
        let scale = if i == 0 {
            255
        } else {
            falloff = scale8(falloff, keep);
            let taper = ((taper_len - i + 1) * 255 / (taper_len + 1)) as u8;
            scale8(taper, falloff)
        };
        let pos = head - i.cast_signed();
        if pos < 0 {
            break;
        }
        let pos = pos.cast_unsigned();
        if pos >= len {
            continue;
        }
        let index = if reverse { len - 1 - pos } else { pos };
        leds[index] = scale_color(color, scale);
    }
}

/// Advance the head; returns `true` when a full pass completed
fn advance(counters: &mut EffectCounters, speed: u16, total_steps: usize) -> bool {
    counters.phase += f32::from(speed.max(1)) / 100.0;
    while counters.phase >= 1.0 {
        counters.step = counters.step.saturating_add(1);
        counters.phase -= 1.0;
    }
    if counters.step as usize >= total_steps {
        counters.step = 0;
        counters.phase = 0.0;
        counters.cycles = counters.cycles.saturating_add(1);
        return true;
    }
    false
}

#[allow(clippy::cast_possible_wrap)]
const fn as_signed(value: u32) -> isize {
    value as isize
}

/// Single head in one color
#[derive(Debug, Clone)]
pub struct ChaseSingleEffect {
    config: ChaseSingleConfig,
}

impl ChaseSingleEffect {
    pub const fn new(config: ChaseSingleConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ChaseSingleConfig {
        &self.config
    }
}

impl Effect for ChaseSingleEffect {
    fn update(
        &mut self,
        leds: &mut [Rgb],
        counters: &mut EffectCounters,
        palette: &Palette,
    ) -> bool {
        leds.fill(BLACK);
        if leds.is_empty() {
            return true;
        }
        counters.direction = if self.config.reverse { -1 } else { 1 };

        let trail = usize::from(self.config.trail_length);
        draw_trail(
            leds,
            as_signed(counters.step),
            palette.primary,
            trail,
            self.config.trail_fade,
            self.config.reverse,
        );
        advance(counters, self.config.speed, leds.len() + trail);
        true
    }
}

/// Three heads, one per palette color, evenly spaced
#[derive(Debug, Clone)]
pub struct ChaseMultiEffect {
    config: ChaseMultiConfig,
    spacing: usize,
}

impl ChaseMultiEffect {
    pub const fn new(config: ChaseMultiConfig) -> Self {
        Self {
            config,
            spacing: config.trail_length as usize + config.color_spacing as usize,
        }
    }

    pub const fn config(&self) -> &ChaseMultiConfig {
        &self.config
    }

    /// Distance between consecutive heads
    pub const fn spacing(&self) -> usize {
        self.spacing
    }
}

impl Effect for ChaseMultiEffect {
    fn initialize(&mut self, led_count: usize) {
        // The gap grows with the strip so density looks the same on any length.
        let gap = usize::from(self.config.color_spacing).max(led_count / 10);
        self.spacing = usize::from(self.config.trail_length) + gap;
    }

    fn update(
        &mut self,
        leds: &mut [Rgb],
        counters: &mut EffectCounters,
        palette: &Palette,
    ) -> bool {
        leds.fill(BLACK);
        if leds.is_empty() {
            return true;
        }
        counters.direction = if self.config.reverse { -1 } else { 1 };

        let trail = usize::from(self.config.trail_length);
        let spacing = self.spacing.cast_signed();
        let colors = palette.as_array();
        let head = as_signed(counters.step);
        // Back to front so the leading head wins overlaps.
        for i in (0..HEADS).rev() {
            draw_trail(
                leds,
                head - spacing * i.cast_signed(),
                colors[i],
                trail,
                self.config.trail_fade,
                self.config.reverse,
            );
        }

        let total = leds.len() + (HEADS - 1) * self.spacing + trail;
        advance(counters, self.config.speed, total);
        true
    }
}
