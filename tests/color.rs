mod tests {
    use printer_strip_fx::color::{
        BLACK, Rgb, add_colors, fade_to_black_by, format_hex_color, parse_hex_color, rgb_from_u32,
        scale_color,
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_rgb_from_u32() {
        assert_eq!(rgb_from_u32(0x00_62ff), Rgb::new(0, 0x62, 0xff));
        assert_eq!(rgb_from_u32(0), BLACK);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), Some(RED));
        assert_eq!(parse_hex_color("0000FF"), Some(BLUE));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn test_format_hex_color() {
        assert_eq!(
            format_hex_color(rgb_from_u32(0x80_0080)).as_str(),
            "#800080"
        );
        assert_eq!(format_hex_color(BLACK).as_str(), "#000000");
    }

    #[test]
    fn test_fade_to_black_by() {
        assert_eq!(fade_to_black_by(WHITE, 0), WHITE);
        assert_eq!(fade_to_black_by(WHITE, 255), BLACK);
        assert_eq!(fade_to_black_by(WHITE, 128).r, 127);
    }

    #[test]
    fn test_scale_color() {
        assert_eq!(scale_color(RED, 255), RED);
        assert_eq!(scale_color(RED, 0), BLACK);
        assert_eq!(scale_color(RED, 128).r, 128);
    }

    #[test]
    fn test_add_colors_saturates() {
        let sum = add_colors(Rgb::new(200, 10, 0), Rgb::new(100, 10, 5));
        assert_eq!(sum, Rgb::new(255, 20, 5));
    }
}
