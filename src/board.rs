//! Board GPIO maps used to validate the strip's data pin.

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSafety {
    /// Free for general purpose output
    Safe,
    /// Strapping, flash, USB or UART pin
    Avoid,
}

#[derive(Debug, Clone, Copy)]
pub struct GpioInfo {
    pub pin: u8,
    pub safety: PinSafety,
    pub note: &'static str,
}

impl GpioInfo {
    const fn safe(pin: u8, note: &'static str) -> Self {
        Self {
            pin,
            safety: PinSafety::Safe,
            note,
        }
    }

    const fn avoid(pin: u8, note: &'static str) -> Self {
        Self {
            pin,
            safety: PinSafety::Avoid,
            note,
        }
    }
}

/// GPIO map for one board variant
#[derive(Debug)]
pub struct PinTable {
    pub name: &'static str,
    pub default_led_pin: u8,
    pub pins: &'static [GpioInfo],
}

impl PinTable {
    pub fn find(&self, pin: u8) -> Option<&GpioInfo> {
        self.pins.iter().find(|info| info.pin == pin)
    }

    pub fn is_safe(&self, pin: u8) -> bool {
        self.find(pin)
            .is_some_and(|info| info.safety == PinSafety::Safe)
    }

    /// Accept only pins present on the board and not reserved
    pub fn check(&self, pin: u8) -> Result<(), ConfigError> {
        match self.find(pin) {
            Some(info) if info.safety == PinSafety::Safe => Ok(()),
            Some(_) => Err(ConfigError::UnsafePin(pin)),
            None => Err(ConfigError::UnknownPin(pin)),
        }
    }

    pub fn safe_pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.pins
            .iter()
            .filter(|info| info.safety == PinSafety::Safe)
            .map(|info| info.pin)
    }
}

pub const ESP32C3_MINI: PinTable = PinTable {
    name: "esp32c3-supermini",
    default_led_pin: 20,
    pins: &[
        GpioInfo::avoid(0, "ADC1_CH0, boot strapping"),
        GpioInfo::avoid(1, "ADC1_CH1, boot strapping"),
        GpioInfo::safe(2, "ADC1_CH2"),
        GpioInfo::avoid(3, "ADC1_CH3, boot strapping"),
        GpioInfo::safe(4, "ADC1_CH4"),
        GpioInfo::safe(5, "ADC2_CH0"),
        GpioInfo::safe(6, "general purpose"),
        GpioInfo::safe(7, "general purpose"),
        GpioInfo::avoid(8, "onboard LED, boot strapping"),
        GpioInfo::avoid(9, "BOOT button"),
        GpioInfo::safe(10, "general purpose"),
        GpioInfo::avoid(18, "USB D-"),
        GpioInfo::avoid(19, "USB D+"),
        GpioInfo::safe(20, "UART RX, free when USB CDC is used"),
        GpioInfo::safe(21, "UART TX, free when USB CDC is used"),
    ],
};

pub const ESP32S3_MINI: PinTable = PinTable {
    name: "esp32s3-mini",
    default_led_pin: 14,
    pins: &[
        GpioInfo::avoid(0, "boot strapping"),
        GpioInfo::safe(1, "ADC1_CH0"),
        GpioInfo::safe(2, "ADC1_CH1"),
        GpioInfo::safe(3, "ADC1_CH2"),
        GpioInfo::safe(4, "ADC1_CH3"),
        GpioInfo::safe(5, "ADC1_CH4"),
        GpioInfo::safe(6, "ADC1_CH5"),
        GpioInfo::safe(7, "ADC1_CH6"),
        GpioInfo::safe(8, "ADC1_CH7"),
        GpioInfo::safe(9, "ADC1_CH8"),
        GpioInfo::safe(10, "ADC1_CH9"),
        GpioInfo::safe(11, "ADC2_CH0"),
        GpioInfo::safe(12, "ADC2_CH1"),
        GpioInfo::safe(13, "ADC2_CH2"),
        GpioInfo::safe(14, "ADC2_CH3"),
        GpioInfo::safe(15, "ADC2_CH4, XTAL_32K_P"),
        GpioInfo::safe(16, "ADC2_CH5, XTAL_32K_N"),
        GpioInfo::safe(17, "ADC2_CH6"),
        GpioInfo::safe(18, "ADC2_CH7"),
        GpioInfo::avoid(19, "USB D-"),
        GpioInfo::avoid(20, "USB D+"),
        GpioInfo::safe(21, "general purpose"),
        GpioInfo::avoid(26, "SPI flash"),
        GpioInfo::avoid(27, "SPI flash"),
        GpioInfo::avoid(28, "SPI flash"),
        GpioInfo::avoid(29, "SPI flash"),
        GpioInfo::avoid(30, "SPI flash"),
        GpioInfo::avoid(31, "SPI flash"),
        GpioInfo::avoid(32, "SPI flash"),
        GpioInfo::safe(33, "general purpose"),
        GpioInfo::safe(34, "general purpose"),
        GpioInfo::safe(35, "general purpose, octal PSRAM on some modules"),
        GpioInfo::safe(36, "general purpose, octal PSRAM on some modules"),
        GpioInfo::safe(37, "general purpose, octal PSRAM on some modules"),
        GpioInfo::safe(38, "general purpose"),
        GpioInfo::safe(39, "JTAG MTCK"),
        GpioInfo::safe(40, "JTAG MTDO"),
        GpioInfo::safe(41, "JTAG MTDI"),
        GpioInfo::safe(42, "JTAG MTMS"),
        GpioInfo::safe(43, "UART0 TX"),
        GpioInfo::safe(44, "UART0 RX"),
        GpioInfo::avoid(45, "VDD_SPI strapping"),
        GpioInfo::avoid(46, "boot strapping"),
        GpioInfo::safe(47, "general purpose"),
        GpioInfo::safe(48, "general purpose, RGB LED on some boards"),
    ],
};
