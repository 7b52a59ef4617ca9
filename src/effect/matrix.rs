//! Matrix rain
//!
//! Drops with random length and speed fall from the start of the strip and
//! leave a fading tail. A cycle spawns the configured number of drops and
//! completes once every one of them has left the strip.

use super::{Effect, EffectCounters, Palette};
use crate::{
    color::{Rgb, fade_to_black_by},
    config::MatrixConfig,
    random::Rng,
};

/// Capacity of the drop pool
pub const MAX_DROPS: usize = 32;

const SPAWN_CHANCE: u32 = 8;
const MIN_DROP_LEN: u32 = 3;
const MAX_DROP_LEN: u32 = 10;
const MIN_DROP_SPEED: u32 = 1;
const MAX_DROP_SPEED: u32 = 3;

#[derive(Debug, Clone, Copy, Default)]
struct RainDrop {
    active: bool,
    /// Head position; may run past the end while the tail drains
    position: usize,
    length: usize,
    speed: usize,
}

/// Counters: `step` counts frames towards the next drop movement.
#[derive(Debug, Clone)]
pub struct MatrixEffect {
    config: MatrixConfig,
    drops: [RainDrop; MAX_DROPS],
    /// Drops per cycle, fixed at `initialize`
    target: usize,
    spawned: usize,
    rng: Rng,
}

impl MatrixEffect {
    pub fn new(config: &MatrixConfig, seed: u64) -> Self {
        Self {
            config: *config,
            drops: [RainDrop::default(); MAX_DROPS],
            target: usize::from(config.drops.max(1)).min(MAX_DROPS),
            spawned: 0,
            rng: Rng::new(seed),
        }
    }

    pub fn active_drops(&self) -> usize {
        self.drops.iter().filter(|drop| drop.active).count()
    }

    /// Drops spawned per cycle
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Move drops, returns `true` when the current cycle completed
    fn step_drops(&mut self, leds: &mut [Rgb]) -> bool {
        let len = leds.len();
        for drop in self.drops.iter_mut().filter(|d| d.active) {
            let tail_start = drop.position.saturating_sub(drop.length - 1);
            let tail_end = (drop.position + 1).min(len);
            if tail_start < tail_end {
                for led in &mut leds[tail_start..tail_end] {
                    *led = fade_to_black_by(*led, self.config.trail_fade);
                }
            }
            drop.position += drop.speed;
            if drop.position >= len + drop.length {
                drop.active = false;
            }
        }

        if self.spawned < self.target && self.rng.chance(SPAWN_CHANCE) {
            self.spawn();
        }

        if self.spawned >= self.target && self.active_drops() == 0 {
            self.spawned = 0;
            return true;
        }
        false
    }

    #[allow(clippy::cast_possible_truncation)]
    fn spawn(&mut self) {
        let length = self.rng.between(MIN_DROP_LEN, MAX_DROP_LEN) as usize;
        let speed = self.rng.between(MIN_DROP_SPEED, MAX_DROP_SPEED) as usize;
        if let Some(drop) = self.drops[..self.target].iter_mut().find(|d| !d.active) {
            *drop = RainDrop {
                active: true,
                position: 0,
                length,
                speed,
            };
            self.spawned += 1;
        }
    }
}

impl Effect for MatrixEffect {
    fn initialize(&mut self, _led_count: usize) {
        self.target = usize::from(self.config.drops.max(1)).min(MAX_DROPS);
        self.drops = [RainDrop::default(); MAX_DROPS];
        self.spawned = 0;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(
        &mut self,
        leds: &mut [Rgb],
        counters: &mut EffectCounters,
        palette: &Palette,
    ) -> bool {
        for led in leds.iter_mut() {
            *led = fade_to_black_by(*led, self.config.background_fade);
        }

        counters.step += 1;
        if counters.step >= u32::from(self.config.speed.max(1)) {
            counters.step = 0;
            if self.step_drops(leds) {
                counters.cycles = counters.cycles.saturating_add(1);
            }
        }

        let tail_fade = usize::from(self.config.brightness_fade);
        for drop in self.drops.iter().filter(|d| d.active) {
            for j in 0..drop.length {
                let brightness = 255usize.saturating_sub(j * tail_fade);
                if brightness == 0 {
                    break;
                }
                let Some(pos) = drop.position.checked_sub(j) else {
                    break;
                };
                if let Some(led) = leds.get_mut(pos) {
                    *led = fade_to_black_by(palette.primary, 255 - brightness as u8);
                }
            }
        }
        true
    }
}
