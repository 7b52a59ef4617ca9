mod tests {
    use printer_strip_fx::{
        EffectKind, EffectRegistry, EffectSlot, EffectsConfig, Palette, Rgb,
        color::{BLACK, rgb_from_u32},
        effect::EffectCounters,
    };

    #[test]
    fn test_lookup_and_validation() {
        let registry = EffectRegistry::default();
        assert_eq!(registry.lookup("Chase_Multi"), Some(EffectKind::ChaseMulti));
        assert!(registry.is_valid_effect("pulse"));
        assert!(!registry.is_valid_effect("strobe"));
        assert_eq!(registry.available_effects().count(), 6);
    }

    #[test]
    fn test_create_effect_by_name() {
        let mut registry = EffectRegistry::default();
        for name in ["chase_single", "rainbow", "twinkle", "chase_multi", "pulse", "matrix"] {
            let effect = registry.create_effect(name).unwrap();
            assert_eq!(effect.kind().as_str(), name);
        }
        assert!(registry.create_effect("strobe").is_none());
        let matrix = registry.create(EffectKind::Matrix);
        assert!(matches!(matrix, EffectSlot::Matrix(_)));
    }

    #[test]
    fn test_default_colors_follow_config() {
        let mut config = EffectsConfig::DEFAULT;
        config.pulse.color = rgb_from_u32(0x12_3456);
        let registry = EffectRegistry::new(config);

        assert_eq!(
            registry.default_colors(EffectKind::Pulse),
            Palette::single(rgb_from_u32(0x12_3456))
        );
        assert_eq!(
            registry.default_colors(EffectKind::ChaseMulti),
            Palette::new(
                rgb_from_u32(0xff_0000),
                rgb_from_u32(0x00_ff00),
                rgb_from_u32(0x00_00ff)
            )
        );
        assert_eq!(
            registry.default_colors(EffectKind::Rainbow),
            Palette::FALLBACK
        );
        assert_eq!(registry.default_colors_for("nope"), None);
    }

    #[test]
    fn test_config_update_applies_to_new_effects() {
        let mut registry = EffectRegistry::default();
        let mut config = *registry.config();
        config.chase_single.trail_length = 2;
        registry.update_config(config);

        let Some(EffectSlot::ChaseSingle(chase)) = registry.create_effect("chase_single") else {
            panic!("expected a chase");
        };
        assert_eq!(chase.config().trail_length, 2);
    }

    fn render(slot: &mut EffectSlot, frames: usize) -> [Rgb; 24] {
        let mut leds = [BLACK; 24];
        let mut counters = EffectCounters::default();
        let palette = Palette::single(rgb_from_u32(0xff_ffff));
        slot.initialize(leds.len());
        for _ in 0..frames {
            slot.update(&mut leds, &mut counters, &palette);
        }
        leds
    }

    #[test]
    fn test_reseed_makes_random_effects_repeatable() {
        let mut a = EffectRegistry::default();
        let mut b = EffectRegistry::default();
        a.reseed(1234);
        b.reseed(1234);

        let first = render(&mut a.create(EffectKind::Twinkle), 400);
        assert_eq!(first, render(&mut b.create(EffectKind::Twinkle), 400));
        let first = render(&mut a.create(EffectKind::Matrix), 400);
        assert_eq!(first, render(&mut b.create(EffectKind::Matrix), 400));
    }
}
