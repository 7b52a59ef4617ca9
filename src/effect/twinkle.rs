//! Twinkling star field
//!
//! A fixed pool of stars fade in to a random peak and back out. The whole
//! strip decays every frame so nothing lingers. Runs until stopped.

use super::{Effect, EffectCounters, Palette};
use crate::{
    color::{Rgb, add_colors, fade_to_black_by, scale_color},
    config::TwinkleConfig,
    math8::{qadd8, qsub8},
    random::Rng,
};

/// Capacity of the star pool
pub const MAX_STARS: usize = 64;

/// Frames between star brightness steps
const STAR_FRAME_DIVIDER: u32 = 2;
const STAR_BRIGHTNESS_STEP: u8 = 8;
/// Spawn probability per star step, in percent
const SPAWN_CHANCE: u32 = 3;

#[derive(Debug, Clone, Copy, Default)]
struct Star {
    active: bool,
    rising: bool,
    position: usize,
    brightness: u8,
    peak: u8,
}

#[derive(Debug, Clone)]
pub struct TwinkleEffect {
    config: TwinkleConfig,
    stars: [Star; MAX_STARS],
    /// Usable part of the pool, fixed at `initialize`
    capacity: usize,
    rng: Rng,
}

impl TwinkleEffect {
    pub fn new(config: &TwinkleConfig, seed: u64) -> Self {
        Self {
            config: *config,
            stars: [Star::default(); MAX_STARS],
            capacity: usize::from(config.density).min(MAX_STARS),
            rng: Rng::new(seed),
        }
    }

    /// Stars currently lit
    pub fn active_stars(&self) -> usize {
        self.stars[..self.capacity]
            .iter()
            .filter(|star| star.active)
            .count()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Step every active star; returns how many went dark
    fn step_stars(&mut self) -> u32 {
        let mut finished = 0;
        for star in self.stars[..self.capacity].iter_mut().filter(|s| s.active) {
            if star.rising {
                star.brightness = qadd8(star.brightness, STAR_BRIGHTNESS_STEP).min(star.peak);
                if star.brightness >= star.peak {
                    star.rising = false;
                }
            } else {
                star.brightness = qsub8(star.brightness, STAR_BRIGHTNESS_STEP);
                if star.brightness == 0 {
                    star.active = false;
                    finished += 1;
                }
            }
        }
        finished
    }

    #[allow(clippy::cast_possible_truncation)]
    fn spawn(&mut self, led_count: usize) {
        if led_count == 0 {
            return;
        }
        let peak = self.rng.between(
            u32::from(self.config.min_brightness.max(STAR_BRIGHTNESS_STEP)),
            u32::from(self.config.max_brightness.max(STAR_BRIGHTNESS_STEP)),
        ) as u8;
        let position = self.rng.below(led_count as u32) as usize;
        if let Some(star) = self.stars[..self.capacity].iter_mut().find(|s| !s.active) {
            *star = Star {
                active: true,
                rising: true,
                position,
                brightness: 0,
                peak,
            };
        }
    }
}

impl Effect for TwinkleEffect {
    const CYCLE_BASED: bool = false;

    fn initialize(&mut self, _led_count: usize) {
        self.capacity = usize::from(self.config.density).min(MAX_STARS);
        self.stars = [Star::default(); MAX_STARS];
    }

    fn update(
        &mut self,
        leds: &mut [Rgb],
        counters: &mut EffectCounters,
        palette: &Palette,
    ) -> bool {
        for led in leds.iter_mut() {
            *led = fade_to_black_by(*led, self.config.fade_speed);
        }

        counters.step += 1;
        if counters.step >= STAR_FRAME_DIVIDER {
            counters.step = 0;
            let finished = self.step_stars();
            counters.cycles = counters.cycles.saturating_add(finished);
            if self.rng.chance(SPAWN_CHANCE) {
                self.spawn(leds.len());
            }
        }

        for star in self.stars[..self.capacity].iter().filter(|s| s.active) {
            let glow = scale_color(palette.primary, star.brightness / 3);
            if let Some(led) = leds.get_mut(star.position) {
                *led = scale_color(palette.primary, star.brightness);
            }
            if star.position > 0 {
                if let Some(left) = leds.get_mut(star.position - 1) {
                    *left = add_colors(*left, glow);
                }
            }
            if let Some(right) = leds.get_mut(star.position + 1) {
                *right = add_colors(*right, glow);
            }
        }
        true
    }
}
