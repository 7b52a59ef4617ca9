//! HTTP boundary helpers.
//!
//! Turns a JSON effect request (`effect`, `cycles`, `speed`, `intensity`,
//! `colors`) into everything the engine needs: the effect kind, a cycle
//! target, a palette and a parameter table with the sliders applied. Also
//! renders the JSON response body.

use core::fmt;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::{
    color::{BLACK, HexColor, format_hex_color, parse_hex_color},
    config::EffectsConfig,
    effect::{EffectKind, Palette},
    registry::EffectRegistry,
};

/// Cycles used when the request does not say
pub const DEFAULT_CYCLES: u32 = 3;
/// Extra colors beyond this are rejected by the parser
pub const MAX_REQUEST_COLORS: usize = 8;

const SPEED_RANGE: (u8, u8) = (1, 100);
const INTENSITY_RANGE: (u8, u8) = (10, 100);
const COLORS_ADJUSTED_NOTE: &str = "Colors adjusted for effect; defaults applied where necessary";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Body is not valid JSON for this request
    Malformed,
    MissingEffect,
    UnknownEffect,
    /// Cycle target requested for a continuous effect
    NotCycleBased,
    /// Response did not fit the output buffer
    BufferTooSmall,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => f.write_str("Invalid JSON in request body"),
            Self::MissingEffect => f.write_str("No effect name provided in JSON"),
            Self::UnknownEffect => f.write_str("Unknown LED effect"),
            Self::NotCycleBased => f.write_str("Effect runs continuously and cannot count cycles"),
            Self::BufferTooSmall => f.write_str("Response buffer too small"),
        }
    }
}

/// Raw request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EffectRequest<'a> {
    #[serde(default)]
    pub effect: &'a str,
    #[serde(default)]
    pub cycles: Option<u32>,
    #[serde(default)]
    pub speed: Option<i32>,
    #[serde(default)]
    pub intensity: Option<i32>,
    #[serde(default, borrow)]
    pub colors: Vec<&'a str, MAX_REQUEST_COLORS>,
}

impl<'a> EffectRequest<'a> {
    pub fn parse(body: &'a [u8]) -> Result<Self, RequestError> {
        serde_json_core::from_slice::<Self>(body)
            .map(|(request, _)| request)
            .map_err(|_| RequestError::Malformed)
    }
}

/// Palette chosen for a request, and whether defaults had to fill in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColors {
    pub palette: Palette,
    pub adjusted: bool,
}

/// Everything needed to start the requested effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectPlan {
    pub kind: EffectKind,
    pub cycles: u32,
    pub colors: ResolvedColors,
    /// Parameter table with the sliders applied
    pub config: EffectsConfig,
}

impl EffectPlan {
    /// Validate `request` and map it onto `base` for a strip of `led_count`
    pub fn build(
        request: &EffectRequest<'_>,
        base: &EffectsConfig,
        led_count: usize,
    ) -> Result<Self, RequestError> {
        let name = request.effect.trim();
        if name.is_empty() {
            return Err(RequestError::MissingEffect);
        }
        let kind = EffectKind::parse_from_str(name)
            .ok_or(RequestError::UnknownEffect)?;

        let cycles = match request.cycles {
            Some(cycles) if cycles > 0 && !kind.is_cycle_based() => {
                return Err(RequestError::NotCycleBased);
            }
            Some(cycles) => cycles,
            None if kind.is_cycle_based() => DEFAULT_CYCLES,
            None => 0,
        };

        let mut config = *base;
        apply_sliders(
            &mut config,
            kind,
            request.speed.map(|s| clamp_slider(s, SPEED_RANGE)),
            request.intensity.map(|i| clamp_slider(i, INTENSITY_RANGE)),
            led_count,
        );
        let defaults = EffectRegistry::new(config).default_colors(kind);
        let colors = resolve_colors(kind, &request.colors, defaults);

        Ok(Self {
            kind,
            cycles,
            colors,
            config,
        })
    }

    /// Render the success body into `buf`
    pub fn write_response(&self, buf: &mut [u8]) -> Result<usize, RequestError> {
        let palette = self.colors.palette.as_array();
        let response = EffectResponse {
            message: "LED effect started",
            effect: self.kind.as_str(),
            cycles: self.cycles,
            note: self.colors.adjusted.then_some(COLORS_ADJUSTED_NOTE),
            colors_used: palette.map(format_hex_color),
        };
        serde_json_core::to_slice(&response, buf)
            .map_err(|_| RequestError::BufferTooSmall)
    }
}

#[derive(Debug, Serialize)]
struct EffectResponse<'a> {
    message: &'a str,
    effect: &'a str,
    cycles: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
    colors_used: [HexColor; 3],
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_slider(value: i32, (lo, hi): (u8, u8)) -> u8 {
    value.clamp(i32::from(lo), i32::from(hi)) as u8
}

/// Slider position as `0.0..=1.0`
fn unit(slider: u8) -> f32 {
    f32::from(slider.clamp(1, 100) - 1) / 99.0
}

/// Chase speed in pixels/frame x100; 0.30 at 1, 1.20 at 100
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn chase_speed(speed: u8) -> u16 {
    let steps = 0.30 + 0.90 * libm::powf(unit(speed), 1.7);
    libm::roundf(steps * 100.0) as u16
}

/// Trail length 2..=20, linear in intensity
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn trail_length(intensity: u8) -> u8 {
    let raw = 2.0 + f32::from(intensity.clamp(1, 100) - 1) * 18.0 / 99.0;
    (libm::roundf(raw) as u8).clamp(2, 20)
}

/// Gap between chase heads, scales with the strip
#[allow(clippy::cast_possible_truncation)]
pub fn color_spacing(led_count: usize) -> u8 {
    (led_count / 10).clamp(2, usize::from(u8::MAX)) as u8
}

/// Drops per cycle; intensity 50 gives one drop per 15 pixels
#[allow(clippy::cast_possible_truncation)]
pub fn matrix_drops(intensity: u8, led_count: usize) -> u8 {
    let base = (led_count / 15).max(1);
    (base * usize::from(intensity) / 50).clamp(1, usize::from(u8::MAX)) as u8
}

/// Twinkle background fade 1..=64, exponential in speed
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn twinkle_fade(speed: u8) -> u8 {
    let value = 1.0 + 63.0 * libm::powf(unit(speed), 1.6);
    (value as u8).clamp(1, 64)
}

/// Simultaneous stars; 50 → 10
pub fn twinkle_density(intensity: u8) -> u8 {
    (intensity / 5).max(1)
}

/// Pulse frames per phase step, 8 (slow) down to 1 (fast)
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pulse_frame_delay(speed: u8) -> u8 {
    let delay = 8.0 - 7.0 * libm::powf(unit(speed), 2.2);
    (delay as u8).clamp(1, 8)
}

/// Rainbow hue/frame x100; 0.5 at 1, 15 at 100, quadratic
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rainbow_speed(speed: u8) -> u16 {
    let t = unit(speed);
    libm::roundf((0.5 + 14.5 * t * t) * 100.0) as u16
}

/// Rainbow hue/pixel x100; higher intensity packs the rainbow tighter
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rainbow_hue_step(intensity: u8) -> u16 {
    let step = (6.0 - f32::from(intensity) * 0.08).max(0.5);
    libm::roundf(step * 100.0) as u16
}

/// Map sliders onto the parameters of `kind`. `None` keeps the current value.
pub fn apply_sliders(
    config: &mut EffectsConfig,
    kind: EffectKind,
    speed: Option<u8>,
    intensity: Option<u8>,
    led_count: usize,
) {
    match kind {
        EffectKind::ChaseSingle => {
            let chase = &mut config.chase_single;
            if let Some(speed) = speed {
                chase.speed = chase_speed(speed);
            }
            if let Some(intensity) = intensity {
                chase.trail_length = trail_length(intensity);
            }
            chase.trail_fade = 15;
        }
        EffectKind::ChaseMulti => {
            let chase = &mut config.chase_multi;
            if let Some(speed) = speed {
                chase.speed = chase_speed(speed);
            }
            if let Some(intensity) = intensity {
                chase.trail_length = trail_length(intensity);
            }
            chase.trail_fade = 20;
            chase.color_spacing = color_spacing(led_count);
        }
        EffectKind::Matrix => {
            if let Some(intensity) = intensity {
                config.matrix.drops = matrix_drops(intensity, led_count);
            }
        }
        EffectKind::Twinkle => {
            if let Some(speed) = speed {
                config.twinkle.fade_speed = twinkle_fade(speed);
            }
            if let Some(intensity) = intensity {
                config.twinkle.density = twinkle_density(intensity);
            }
        }
        EffectKind::Pulse => {
            if let Some(speed) = speed {
                config.pulse.speed = pulse_frame_delay(speed);
            }
        }
        EffectKind::Rainbow => {
            if let Some(speed) = speed {
                config.rainbow.speed = rainbow_speed(speed);
            }
            if let Some(intensity) = intensity {
                config.rainbow.hue_step = rainbow_hue_step(intensity);
            }
        }
    }
}

/// Pick the palette for `kind` from request colors, filling gaps from
/// `defaults`. Unparsable entries become black.
pub fn resolve_colors(kind: EffectKind, colors: &[&str], defaults: Palette) -> ResolvedColors {
    let parse = |raw: &str| parse_hex_color(raw).unwrap_or(BLACK);
    match kind {
        EffectKind::Rainbow => ResolvedColors {
            palette: defaults,
            adjusted: false,
        },
        EffectKind::ChaseMulti => {
            let fallback = defaults.as_array();
            let mut picked = fallback;
            for (slot, raw) in picked.iter_mut().zip(colors) {
                *slot = parse(raw);
            }
            ResolvedColors {
                palette: Palette::new(picked[0], picked[1], picked[2]),
                adjusted: colors.len() != 3,
            }
        }
        _ => match colors.first() {
            Some(raw) => ResolvedColors {
                palette: Palette::single(parse(raw)),
                adjusted: colors.len() > 1,
            },
            None => ResolvedColors {
                palette: defaults,
                adjusted: true,
            },
        },
    }
}
