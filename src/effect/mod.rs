//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait.

mod chase;
mod matrix;
mod pulse;
mod rainbow;
mod twinkle;

pub use chase::{ChaseMultiEffect, ChaseSingleEffect};
pub use matrix::{MAX_DROPS, MatrixEffect};
pub use pulse::PulseEffect;
pub use rainbow::{FADE_IN_FRAMES, RainbowEffect};
pub use twinkle::{MAX_STARS, TwinkleEffect};

use crate::color::{BLACK, Rgb, rgb_from_u32};

const EFFECT_NAME_CHASE_SINGLE: &str = "chase_single";
const EFFECT_NAME_RAINBOW: &str = "rainbow";
const EFFECT_NAME_TWINKLE: &str = "twinkle";
const EFFECT_NAME_CHASE_MULTI: &str = "chase_multi";
const EFFECT_NAME_PULSE: &str = "pulse";
const EFFECT_NAME_MATRIX: &str = "matrix";

const EFFECT_ID_CHASE_SINGLE: u8 = 0;
const EFFECT_ID_RAINBOW: u8 = 1;
const EFFECT_ID_TWINKLE: u8 = 2;
const EFFECT_ID_CHASE_MULTI: u8 = 3;
const EFFECT_ID_PULSE: u8 = 4;
const EFFECT_ID_MATRIX: u8 = 5;

/// Per-run counters owned by the manager and advanced by the effect.
///
/// `step`, `direction` and `phase` have effect-private meaning. `cycles` is
/// only ever incremented by the effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectCounters {
    pub step: u32,
    pub direction: i8,
    pub phase: f32,
    pub cycles: u32,
}

impl Default for EffectCounters {
    fn default() -> Self {
        Self {
            step: 0,
            direction: 1,
            phase: 0.0,
            cycles: 0,
        }
    }
}

/// Up to three colors an effect may draw with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub tertiary: Rgb,
}

impl Palette {
    /// Blue, black, black
    pub const FALLBACK: Self = Self::single(rgb_from_u32(0x00_00ff));

    pub const fn new(primary: Rgb, secondary: Rgb, tertiary: Rgb) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }

    pub const fn single(primary: Rgb) -> Self {
        Self::new(primary, BLACK, BLACK)
    }

    pub const fn as_array(&self) -> [Rgb; 3] {
        [self.primary, self.secondary, self.tertiary]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::FALLBACK
    }
}

pub trait Effect {
    /// Whether a nonzero cycle target is meaningful for this effect
    const CYCLE_BASED: bool = true;

    /// One-time per-run setup, sized to the strip
    fn initialize(&mut self, _led_count: usize) {}

    /// Advance exactly one frame.
    ///
    /// Returns `false` once the effect has naturally finished.
    fn update(&mut self, leds: &mut [Rgb], counters: &mut EffectCounters, palette: &Palette)
    -> bool;
}

/// Known effects that can be requested by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectKind {
    ChaseSingle = EFFECT_ID_CHASE_SINGLE,
    Rainbow = EFFECT_ID_RAINBOW,
    Twinkle = EFFECT_ID_TWINKLE,
    ChaseMulti = EFFECT_ID_CHASE_MULTI,
    Pulse = EFFECT_ID_PULSE,
    Matrix = EFFECT_ID_MATRIX,
}

impl EffectKind {
    pub const ALL: [Self; 6] = [
        Self::ChaseSingle,
        Self::Rainbow,
        Self::Twinkle,
        Self::ChaseMulti,
        Self::Pulse,
        Self::Matrix,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_CHASE_SINGLE => Self::ChaseSingle,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            EFFECT_ID_TWINKLE => Self::Twinkle,
            EFFECT_ID_CHASE_MULTI => Self::ChaseMulti,
            EFFECT_ID_PULSE => Self::Pulse,
            EFFECT_ID_MATRIX => Self::Matrix,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChaseSingle => EFFECT_NAME_CHASE_SINGLE,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
            Self::Twinkle => EFFECT_NAME_TWINKLE,
            Self::ChaseMulti => EFFECT_NAME_CHASE_MULTI,
            Self::Pulse => EFFECT_NAME_PULSE,
            Self::Matrix => EFFECT_NAME_MATRIX,
        }
    }

    /// Case-insensitive name lookup
    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub const fn is_cycle_based(self) -> bool {
        match self {
            Self::ChaseSingle => ChaseSingleEffect::CYCLE_BASED,
            Self::Rainbow => RainbowEffect::CYCLE_BASED,
            Self::Twinkle => TwinkleEffect::CYCLE_BASED,
            Self::ChaseMulti => ChaseMultiEffect::CYCLE_BASED,
            Self::Pulse => PulseEffect::CYCLE_BASED,
            Self::Matrix => MatrixEffect::CYCLE_BASED,
        }
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    ChaseSingle(ChaseSingleEffect),
    ChaseMulti(ChaseMultiEffect),
    Rainbow(RainbowEffect),
    Twinkle(TwinkleEffect),
    Pulse(PulseEffect),
    Matrix(MatrixEffect),
}

impl EffectSlot {
    pub fn initialize(&mut self, led_count: usize) {
        match self {
            Self::ChaseSingle(effect) => effect.initialize(led_count),
            Self::ChaseMulti(effect) => effect.initialize(led_count),
            Self::Rainbow(effect) => effect.initialize(led_count),
            Self::Twinkle(effect) => effect.initialize(led_count),
            Self::Pulse(effect) => effect.initialize(led_count),
            Self::Matrix(effect) => effect.initialize(led_count),
        }
    }

    /// Render one frame of the current effect
    pub fn update(
        &mut self,
        leds: &mut [Rgb],
        counters: &mut EffectCounters,
        palette: &Palette,
    ) -> bool {
        match self {
            Self::ChaseSingle(effect) => effect.update(leds, counters, palette),
            Self::ChaseMulti(effect) => effect.update(leds, counters, palette),
            Self::Rainbow(effect) => effect.update(leds, counters, palette),
            Self::Twinkle(effect) => effect.update(leds, counters, palette),
            Self::Pulse(effect) => effect.update(leds, counters, palette),
            Self::Matrix(effect) => effect.update(leds, counters, palette),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Self::ChaseSingle(_) => EffectKind::ChaseSingle,
            Self::ChaseMulti(_) => EffectKind::ChaseMulti,
            Self::Rainbow(_) => EffectKind::Rainbow,
            Self::Twinkle(_) => EffectKind::Twinkle,
            Self::Pulse(_) => EffectKind::Pulse,
            Self::Matrix(_) => EffectKind::Matrix,
        }
    }

    pub fn is_cycle_based(&self) -> bool {
        self.kind().is_cycle_based()
    }
}
