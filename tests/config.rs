mod tests {
    use printer_strip_fx::{
        ConfigError, EffectsConfig,
        color::rgb_from_u32,
        config::{CONFIG_JSON_CAPACITY, PulseConfig},
    };

    #[test]
    fn test_defaults_round_trip_through_json() {
        let mut buf = [0u8; CONFIG_JSON_CAPACITY];
        let len = EffectsConfig::DEFAULT.to_json(&mut buf).unwrap();
        let json = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(json.contains("\"chaseSingle\""));
        assert!(json.contains("\"trailLength\":15"));
        assert!(json.contains("\"color\":\"#800080\""));

        assert_eq!(
            EffectsConfig::from_json(&buf[..len]),
            Ok(EffectsConfig::DEFAULT)
        );
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let json = br##"{"pulse":{"speed":2},"matrix":{"color":"#FF8800"}}"##;
        let config = EffectsConfig::from_json(json).unwrap();

        assert_eq!(
            config.pulse,
            PulseConfig {
                speed: 2,
                ..PulseConfig::DEFAULT
            }
        );
        assert_eq!(config.matrix.color, rgb_from_u32(0xff_8800));
        assert_eq!(config.matrix.drops, EffectsConfig::DEFAULT.matrix.drops);
        assert_eq!(config.chase_multi, EffectsConfig::DEFAULT.chase_multi);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EffectsConfig::from_json(b"{}"), Ok(EffectsConfig::DEFAULT));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            EffectsConfig::from_json(br##"{"pulse":{"color":"#zzzzzz"}}"##),
            Err(ConfigError::Malformed)
        );
        assert_eq!(
            EffectsConfig::from_json(br##"{"pulse":{"speed":-1}}"##),
            Err(ConfigError::Malformed)
        );
        assert_eq!(
            EffectsConfig::from_json(b"not json"),
            Err(ConfigError::Malformed)
        );
    }

    #[test]
    fn test_small_buffer_is_reported() {
        let mut buf = [0u8; 16];
        assert_eq!(
            EffectsConfig::DEFAULT.to_json(&mut buf),
            Err(ConfigError::Malformed)
        );
    }
}
