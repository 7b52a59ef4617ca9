//! Name → effect lookup, construction and per-effect defaults.
//!
//! Effects copy their parameters out of the configuration when they are
//! built, so [`EffectRegistry::update_config`] affects the next effect
//! started and never the one already running.

use crate::{
    config::EffectsConfig,
    effect::{
        ChaseMultiEffect, ChaseSingleEffect, EffectKind, EffectSlot, MatrixEffect, Palette,
        PulseEffect, RainbowEffect, TwinkleEffect,
    },
    random::mix,
};

const DEFAULT_SEED: u64 = 0x5eed_1ed5_0ffe_c7ed;

#[derive(Debug, Clone)]
pub struct EffectRegistry {
    config: EffectsConfig,
    seed: u64,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new(EffectsConfig::DEFAULT)
    }
}

impl EffectRegistry {
    pub const fn new(config: EffectsConfig) -> Self {
        Self {
            config,
            seed: DEFAULT_SEED,
        }
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, name: &str) -> Option<EffectKind> {
        EffectKind::parse_from_str(name)
    }

    pub fn is_valid_effect(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn available_effects(&self) -> impl Iterator<Item = &'static str> {
        EffectKind::ALL.into_iter().map(EffectKind::as_str)
    }

    /// Build a fresh effect by name; `None` for unknown names
    pub fn create_effect(&mut self, name: &str) -> Option<EffectSlot> {
        self.lookup(name).map(|kind| self.create(kind))
    }

    /// Build a fresh, default-initialized effect from the current config
    pub fn create(&mut self, kind: EffectKind) -> EffectSlot {
        let config = &self.config;
        match kind {
            EffectKind::ChaseSingle => {
                EffectSlot::ChaseSingle(ChaseSingleEffect::new(config.chase_single))
            }
            EffectKind::ChaseMulti => {
                EffectSlot::ChaseMulti(ChaseMultiEffect::new(config.chase_multi))
            }
            EffectKind::Rainbow => EffectSlot::Rainbow(RainbowEffect::new(&config.rainbow)),
            EffectKind::Pulse => EffectSlot::Pulse(PulseEffect::new(&config.pulse)),
            EffectKind::Twinkle => {
                let seed = self.next_seed();
                EffectSlot::Twinkle(TwinkleEffect::new(&self.config.twinkle, seed))
            }
            EffectKind::Matrix => {
                let seed = self.next_seed();
                EffectSlot::Matrix(MatrixEffect::new(&self.config.matrix, seed))
            }
        }
    }

    /// Authored default colors, used when the caller supplies none
    pub fn default_colors(&self, kind: EffectKind) -> Palette {
        let config = &self.config;
        match kind {
            EffectKind::ChaseSingle => Palette::single(config.chase_single.color),
            EffectKind::ChaseMulti => Palette::new(
                config.chase_multi.color1,
                config.chase_multi.color2,
                config.chase_multi.color3,
            ),
            EffectKind::Matrix => Palette::single(config.matrix.color),
            EffectKind::Twinkle => Palette::single(config.twinkle.color),
            EffectKind::Pulse => Palette::single(config.pulse.color),
            EffectKind::Rainbow => Palette::FALLBACK,
        }
    }

    pub fn default_colors_for(&self, name: &str) -> Option<Palette> {
        self.lookup(name).map(|kind| self.default_colors(kind))
    }

    pub const fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Replace the whole parameter table
    pub fn update_config(&mut self, config: EffectsConfig) {
        self.config = config;
    }

    /// Reseed randomized effects, e.g. from a hardware RNG at boot
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }

    fn next_seed(&mut self) -> u64 {
        self.seed = mix(self.seed.wrapping_add(1));
        self.seed
    }
}
