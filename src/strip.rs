//! Pixel buffer bound to one output driver.

use crate::{
    MAX_PIXELS, OutputDriver,
    board::PinTable,
    color::{BLACK, Rgb, scale_color},
    error::ConfigError,
};

pub const MAX_REFRESH_RATE_HZ: u16 = 1000;

/// Hardware binding for the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripConfig {
    /// Data pin
    pub pin: u8,
    pub led_count: usize,
    /// Global brightness applied at push time
    pub brightness: u8,
    pub refresh_rate_hz: u16,
}

impl StripConfig {
    pub const fn new(pin: u8, led_count: usize) -> Self {
        Self {
            pin,
            led_count,
            brightness: 255,
            refresh_rate_hz: 60,
        }
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub const fn with_refresh_rate(mut self, hz: u16) -> Self {
        self.refresh_rate_hz = hz;
        self
    }

    /// Check the binding without touching hardware
    pub fn validate(&self, pins: &PinTable) -> Result<(), ConfigError> {
        pins.check(self.pin)?;
        if self.led_count == 0 || self.led_count > MAX_PIXELS {
            return Err(ConfigError::PixelCount(self.led_count));
        }
        if self.refresh_rate_hz == 0 || self.refresh_rate_hz > MAX_REFRESH_RATE_HZ {
            return Err(ConfigError::RefreshRate(self.refresh_rate_hz));
        }
        Ok(())
    }
}

/// Fixed-capacity pixel buffer plus the driver it is pushed to.
///
/// Only the first `len` pixels are live. Brightness is applied to a scratch
/// copy during [`LedStrip::show`], so effects always see full-scale colors.
pub struct LedStrip<D: OutputDriver> {
    driver: D,
    pub(crate) pixels: [Rgb; MAX_PIXELS],
    frame: [Rgb; MAX_PIXELS],
    pub(crate) len: usize,
    brightness: u8,
    pushes: u32,
}

impl<D: OutputDriver> LedStrip<D> {
    /// Validate `config`, bind the driver and start with a dark buffer
    pub fn bind(mut driver: D, config: &StripConfig, pins: &PinTable) -> Result<Self, ConfigError> {
        config.validate(pins)?;
        driver.attach(config.pin, config.led_count)?;
        Ok(Self {
            driver,
            pixels: [BLACK; MAX_PIXELS],
            frame: [BLACK; MAX_PIXELS],
            len: config.led_count,
            brightness: config.brightness,
            pushes: 0,
        })
    }

    /// Rebind the existing driver. On error the strip keeps its old binding.
    pub fn rebind(&mut self, config: &StripConfig, pins: &PinTable) -> Result<(), ConfigError> {
        config.validate(pins)?;
        self.driver.attach(config.pin, config.led_count)?;
        self.pixels = [BLACK; MAX_PIXELS];
        self.len = config.led_count;
        self.brightness = config.brightness;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Number of frames handed to the driver so far
    pub fn pushes(&self) -> u32 {
        self.pushes
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels[..self.len.min(MAX_PIXELS)]
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels[..self.len.min(MAX_PIXELS)]
    }

    /// Out-of-range indexes are ignored.
    pub fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels_mut().get_mut(index) {
            *pixel = color;
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels_mut().fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    /// Transmit the live pixels with global brightness applied
    pub fn show(&mut self) {
        let len = self.len.min(MAX_PIXELS);
        let brightness = self.brightness;
        for (out, pixel) in self.frame[..len].iter_mut().zip(&self.pixels[..len]) {
            *out = scale_color(*pixel, brightness);
        }
        self.driver.write(&self.frame[..len]);
        self.pushes = self.pushes.wrapping_add(1);
    }
}
