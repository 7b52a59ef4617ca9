mod utils;

use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use utils::{
    HexColor, add_colors, fade_to_black_by, format_hex_color, hsv2rgb, parse_hex_color,
    rgb_from_u32, scale_color,
};

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Pixel "off" colour
pub const BLACK: Rgb = rgb_from_u32(0x00_0000);
