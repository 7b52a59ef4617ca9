mod tests {
    use printer_strip_fx::{
        ConfigError, ESP32C3_MINI, ESP32S3_MINI, StripConfig,
        board::PinSafety,
    };

    #[test]
    fn test_default_pins_are_safe() {
        for table in [&ESP32C3_MINI, &ESP32S3_MINI] {
            assert!(table.is_safe(table.default_led_pin), "{}", table.name);
        }
    }

    #[test]
    fn test_check_classifies_pins() {
        assert_eq!(ESP32C3_MINI.check(20), Ok(()));
        assert_eq!(ESP32C3_MINI.check(9), Err(ConfigError::UnsafePin(9)));
        assert_eq!(ESP32C3_MINI.check(33), Err(ConfigError::UnknownPin(33)));
        assert_eq!(ESP32S3_MINI.check(33), Ok(()));
        assert_eq!(ESP32S3_MINI.check(27), Err(ConfigError::UnsafePin(27)));
    }

    #[test]
    fn test_find_reports_notes() {
        let info = ESP32C3_MINI.find(8).unwrap();
        assert_eq!(info.safety, PinSafety::Avoid);
        assert!(info.note.contains("strapping"));
    }

    #[test]
    fn test_safe_pins_on_c3() {
        let pins: Vec<u8> = ESP32C3_MINI.safe_pins().collect();
        assert_eq!(pins, [2u8, 4, 5, 6, 7, 10, 20, 21]);
    }

    #[test]
    fn test_strip_config_validation() {
        assert_eq!(StripConfig::new(20, 300).validate(&ESP32C3_MINI), Ok(()));
        assert_eq!(
            StripConfig::new(20, 300).with_refresh_rate(1001).validate(&ESP32C3_MINI),
            Err(ConfigError::RefreshRate(1001))
        );
        assert_eq!(
            StripConfig::new(20, 1).with_refresh_rate(1000).validate(&ESP32C3_MINI),
            Ok(())
        );
    }
}
