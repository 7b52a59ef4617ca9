use core::fmt::Write;

use heapless::String;
pub use smart_leds::hsv::hsv2rgb;

use crate::{
    color::Rgb,
    math8::{qadd8, scale8, scale8_video},
};

/// `#rrggbb` rendered into a fixed buffer
pub type HexColor = String<7>;

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Scale every channel by `scale` (255 keeps the color unchanged)
#[inline]
pub const fn scale_color(color: Rgb, scale: u8) -> Rgb {
    Rgb {
        r: scale8_video(color.r, scale),
        g: scale8_video(color.g, scale),
        b: scale8_video(color.b, scale),
    }
}

/// Dim a color towards black by `amount` (0 = untouched, 255 = black)
#[inline]
pub const fn fade_to_black_by(color: Rgb, amount: u8) -> Rgb {
    let keep = 255 - amount;
    Rgb {
        r: scale8(color.r, keep),
        g: scale8(color.g, keep),
        b: scale8(color.b, keep),
    }
}

/// Per-channel saturating add
#[inline]
pub const fn add_colors(a: Rgb, b: Rgb) -> Rgb {
    Rgb {
        r: qadd8(a.r, b.r),
        g: qadd8(a.g, b.g),
        b: qadd8(a.b, b.b),
    }
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb_from_u32)
}

/// Render a color as lowercase `#rrggbb`.
pub fn format_hex_color(color: Rgb) -> HexColor {
    let mut out = HexColor::new();
    // Seven bytes always fit.
    let _ = write!(out, "#{:02x}{:02x}{:02x}", color.r, color.g, color.b);
    out
}
