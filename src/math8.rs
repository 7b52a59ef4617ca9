//! 8-bit fixed-point helpers shared by effects, the strip and the fade-out.

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// `scale8(v, 255) == v`, `scale8(v, 0) == 0`.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Scale an 8-bit value, keeping non-zero inputs non-zero.
///
/// Used for dim trail pixels so a faint tail does not vanish early.
#[inline]
pub const fn scale8_video(value: u8, scale: u8) -> u8 {
    let scaled = scale8(value, scale);
    if scaled == 0 && value != 0 && scale != 0 {
        1
    } else {
        scaled
    }
}

/// Saturating add
#[inline]
pub const fn qadd8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Saturating subtract
#[inline]
pub const fn qsub8(a: u8, b: u8) -> u8 {
    a.saturating_sub(b)
}

/// Convert a unit interval value into 0-255 with rounding and clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unit_to_u8(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    libm::roundf(clamped * 255.0) as u8
}
