mod tests {
    use printer_strip_fx::{
        EffectKind, EffectsConfig, Palette,
        color::{BLACK, rgb_from_u32},
        request::{
            DEFAULT_CYCLES, EffectPlan, EffectRequest, RequestError, chase_speed, color_spacing,
            matrix_drops, pulse_frame_delay, rainbow_hue_step, rainbow_speed, resolve_colors,
            trail_length, twinkle_density, twinkle_fade,
        },
    };

    const STRIP: usize = 30;
    const FULL_BODY: &str = concat!(
        r#"{"effect":"chase_single","cycles":5,"speed":100,"#,
        r##""intensity":10,"colors":["#ff0000"]}"##,
    );

    fn plan(body: &str) -> Result<EffectPlan, RequestError> {
        let request = EffectRequest::parse(body.as_bytes())?;
        EffectPlan::build(&request, &EffectsConfig::DEFAULT, STRIP)
    }

    #[test]
    fn test_slider_mappings() {
        assert_eq!(chase_speed(1), 30);
        assert_eq!(chase_speed(50), 57);
        assert_eq!(chase_speed(100), 120);
        assert_eq!(trail_length(10), 4);
        assert_eq!(trail_length(100), 20);
        assert_eq!(pulse_frame_delay(1), 8);
        assert_eq!(pulse_frame_delay(100), 1);
        assert_eq!(rainbow_speed(1), 50);
        assert_eq!(rainbow_speed(100), 1500);
        assert_eq!(rainbow_hue_step(50), 200);
        assert_eq!(rainbow_hue_step(100), 50);
        assert_eq!(twinkle_fade(1), 1);
        assert_eq!(twinkle_fade(100), 64);
        assert_eq!(twinkle_density(50), 10);
        assert_eq!(twinkle_density(1), 1);
        assert_eq!(matrix_drops(50, 30), 2);
        assert_eq!(matrix_drops(100, 30), 4);
        assert_eq!(matrix_drops(10, 30), 1);
        assert_eq!(color_spacing(30), 3);
        assert_eq!(color_spacing(5), 2);
    }

    #[test]
    fn test_parse_full_request() {
        let request = EffectRequest::parse(FULL_BODY.as_bytes()).unwrap();
        assert_eq!(request.effect, "chase_single");
        assert_eq!(request.cycles, Some(5));
        assert_eq!(request.speed, Some(100));
        assert_eq!(request.colors.as_slice(), &["#ff0000"]);
    }

    #[test]
    fn test_plan_applies_sliders() {
        let plan = plan(FULL_BODY).unwrap();
        assert_eq!(plan.kind, EffectKind::ChaseSingle);
        assert_eq!(plan.cycles, 5);
        assert_eq!(plan.config.chase_single.speed, 120);
        assert_eq!(plan.config.chase_single.trail_length, 4);
        assert_eq!(
            plan.colors.palette,
            Palette::single(rgb_from_u32(0xff_0000))
        );
        assert!(!plan.colors.adjusted);
        // Other families untouched
        assert_eq!(plan.config.rainbow, EffectsConfig::DEFAULT.rainbow);
    }

    #[test]
    fn test_sliders_are_clamped() {
        let plan = plan(r#"{"effect":"chase_multi","speed":500,"intensity":0}"#).unwrap();
        assert_eq!(plan.config.chase_multi.speed, 120);
        assert_eq!(plan.config.chase_multi.trail_length, 4);
        assert_eq!(plan.config.chase_multi.color_spacing, 3);
    }

    #[test]
    fn test_default_cycles() {
        assert_eq!(
            plan(r#"{"effect":"pulse"}"#).unwrap().cycles,
            DEFAULT_CYCLES
        );
        assert_eq!(plan(r#"{"effect":"twinkle"}"#).unwrap().cycles, 0);
        assert_eq!(
            plan(r#"{"effect":"rainbow","cycles":0}"#).unwrap().cycles,
            0
        );
    }

    #[test]
    fn test_plan_errors() {
        assert_eq!(plan("{\"effect\":"), Err(RequestError::Malformed));
        assert_eq!(plan(r#"{"cycles":2}"#), Err(RequestError::MissingEffect));
        assert_eq!(plan(r#"{"effect":"  "}"#), Err(RequestError::MissingEffect));
        assert_eq!(
            plan(r#"{"effect":"strobe"}"#),
            Err(RequestError::UnknownEffect)
        );
        assert_eq!(
            plan(r#"{"effect":"twinkle","cycles":2}"#),
            Err(RequestError::NotCycleBased)
        );
    }

    #[test]
    fn test_resolve_colors() {
        let defaults = Palette::new(
            rgb_from_u32(0x11_1111),
            rgb_from_u32(0x22_2222),
            rgb_from_u32(0x33_3333),
        );

        let multi = resolve_colors(EffectKind::ChaseMulti, &["#ff0000", "#00ff00"], defaults);
        let expected = Palette::new(
            rgb_from_u32(0xff_0000),
            rgb_from_u32(0x00_ff00),
            rgb_from_u32(0x33_3333),
        );
        assert_eq!(multi.palette, expected);
        assert!(multi.adjusted);

        let single = resolve_colors(EffectKind::Pulse, &[], defaults);
        assert_eq!(single.palette, defaults);
        assert!(single.adjusted);

        let extra = resolve_colors(EffectKind::Matrix, &["00ff00", "#0000ff"], defaults);
        assert_eq!(extra.palette, Palette::single(rgb_from_u32(0x00_ff00)));
        assert!(extra.adjusted);

        let bad = resolve_colors(EffectKind::Twinkle, &["nope"], defaults);
        assert_eq!(bad.palette.primary, BLACK);

        let rainbow = resolve_colors(EffectKind::Rainbow, &["#ff0000"], defaults);
        assert_eq!(rainbow.palette, defaults);
        assert!(!rainbow.adjusted);
    }

    #[test]
    fn test_response_body() {
        let plan = plan(r#"{"effect":"pulse","cycles":2}"#).unwrap();
        let mut buf = [0u8; 256];
        let len = plan.write_response(&mut buf).unwrap();
        let json = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(
            json,
            "{\"message\":\"LED effect started\",\"effect\":\"pulse\",\"cycles\":2,\
             \"note\":\"Colors adjusted for effect; defaults applied where necessary\",\
             \"colors_used\":[\"#800080\",\"#000000\",\"#000000\"]}"
        );

        let mut tiny = [0u8; 8];
        assert_eq!(
            plan.write_response(&mut tiny),
            Err(RequestError::BufferTooSmall)
        );
    }
}
