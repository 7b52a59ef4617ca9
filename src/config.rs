//! Runtime parameters for every effect family.
//!
//! Fractional values are stored as hundredths so the table stays integer
//! and round-trips through JSON unchanged. Missing JSON keys fall back to the
//! authored defaults.

use serde::{Deserialize, Serialize};

use crate::{
    color::{Rgb, rgb_from_u32},
    error::ConfigError,
};

/// Upper bound for a serialized [`EffectsConfig`]
pub const CONFIG_JSON_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChaseSingleConfig {
    /// Pixels advanced per frame, x100
    pub speed: u16,
    pub trail_length: u8,
    /// Extra per-pixel dimming along the trail
    pub trail_fade: u8,
    pub reverse: bool,
    #[serde(with = "hex_color")]
    pub color: Rgb,
}

impl ChaseSingleConfig {
    pub const DEFAULT: Self = Self {
        speed: 80,
        trail_length: 15,
        trail_fade: 15,
        reverse: false,
        color: rgb_from_u32(0x00_62ff),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChaseMultiConfig {
    /// Pixels advanced per frame, x100
    pub speed: u16,
    pub trail_length: u8,
    pub trail_fade: u8,
    /// Dark gap between one head's trail and the next head
    pub color_spacing: u8,
    pub reverse: bool,
    #[serde(with = "hex_color")]
    pub color1: Rgb,
    #[serde(with = "hex_color")]
    pub color2: Rgb,
    #[serde(with = "hex_color")]
    pub color3: Rgb,
}

impl ChaseMultiConfig {
    pub const DEFAULT: Self = Self {
        speed: 70,
        trail_length: 15,
        trail_fade: 20,
        color_spacing: 3,
        reverse: false,
        color1: rgb_from_u32(0xff_0000),
        color2: rgb_from_u32(0x00_ff00),
        color3: rgb_from_u32(0x00_00ff),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatrixConfig {
    /// Frames between drop movements
    pub speed: u8,
    /// Drops spawned per cycle
    pub drops: u8,
    pub background_fade: u8,
    pub trail_fade: u8,
    /// Brightness lost per pixel along a drop's tail
    pub brightness_fade: u8,
    #[serde(with = "hex_color")]
    pub color: Rgb,
}

impl MatrixConfig {
    pub const DEFAULT: Self = Self {
        speed: 4,
        drops: 10,
        background_fade: 64,
        trail_fade: 32,
        brightness_fade: 40,
        color: rgb_from_u32(0x00_ff00),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TwinkleConfig {
    /// Maximum number of simultaneous stars
    pub density: u8,
    /// Background fade per frame
    pub fade_speed: u8,
    pub min_brightness: u8,
    pub max_brightness: u8,
    #[serde(with = "hex_color")]
    pub color: Rgb,
}

impl TwinkleConfig {
    pub const DEFAULT: Self = Self {
        density: 10,
        fade_speed: 3,
        min_brightness: 50,
        max_brightness: 255,
        color: rgb_from_u32(0xff_ff00),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PulseConfig {
    /// Frames per 8 degree phase step
    pub speed: u8,
    #[serde(with = "hex_color")]
    pub color: Rgb,
}

impl PulseConfig {
    pub const DEFAULT: Self = Self {
        speed: 5,
        color: rgb_from_u32(0x80_0080),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RainbowConfig {
    /// Hue units per frame, x100
    pub speed: u16,
    /// Hue units between neighbouring pixels, x100
    pub hue_step: u16,
    pub saturation: u8,
    pub brightness: u8,
}

impl RainbowConfig {
    pub const DEFAULT: Self = Self {
        speed: 250,
        hue_step: 200,
        saturation: 255,
        brightness: 255,
    };
}

macro_rules! impl_default {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Default for $ty {
                fn default() -> Self {
                    Self::DEFAULT
                }
            }
        )*
    };
}

impl_default!(
    ChaseSingleConfig,
    ChaseMultiConfig,
    MatrixConfig,
    TwinkleConfig,
    PulseConfig,
    RainbowConfig,
    EffectsConfig,
);

/// Parameter table for all effect families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsConfig {
    pub chase_single: ChaseSingleConfig,
    pub chase_multi: ChaseMultiConfig,
    pub matrix: MatrixConfig,
    pub twinkle: TwinkleConfig,
    pub pulse: PulseConfig,
    pub rainbow: RainbowConfig,
}

impl EffectsConfig {
    pub const DEFAULT: Self = Self {
        chase_single: ChaseSingleConfig::DEFAULT,
        chase_multi: ChaseMultiConfig::DEFAULT,
        matrix: MatrixConfig::DEFAULT,
        twinkle: TwinkleConfig::DEFAULT,
        pulse: PulseConfig::DEFAULT,
        rainbow: RainbowConfig::DEFAULT,
    };

    /// Parse a stored configuration
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        serde_json_core::from_slice::<Self>(bytes)
            .map(|(config, _)| config)
            .map_err(|_| ConfigError::Malformed)
    }

    /// Serialize into `buf`, returning the number of bytes written
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, ConfigError> {
        serde_json_core::to_slice(self, buf)
            .map_err(|_| ConfigError::Malformed)
    }
}

/// `#rrggbb` (de)serialization for [`Rgb`] fields
pub(crate) mod hex_color {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::color::{Rgb, format_hex_color, parse_hex_color};

    pub(crate) fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_hex_color(*color))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let raw = <&str>::deserialize(deserializer)?;
        parse_hex_color(raw)
            .ok_or_else(|| D::Error::custom("expected #rrggbb"))
    }
}
