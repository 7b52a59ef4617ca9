#![no_std]

pub mod board;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod fade;
pub mod frame_scheduler;
pub mod manager;
pub mod math8;
pub mod random;
pub mod registry;
pub mod request;
pub mod strip;

pub use board::{ESP32C3_MINI, ESP32S3_MINI, PinTable};
pub use config::EffectsConfig;
pub use effect::{EffectKind, EffectSlot, Palette};
pub use error::{ConfigError, EffectError, LockTimeout};
pub use frame_scheduler::FrameScheduler;
pub use manager::{
    EffectsManager, EngineState, EngineStats, EngineStatus, LockTimeouts, TickOutcome,
};
pub use registry::EffectRegistry;
pub use strip::{LedStrip, StripConfig};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Hard cap on strip length; bounds frame time and memory
pub const MAX_PIXELS: usize = 300;

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The effects engine is generic over this trait.
pub trait OutputDriver {
    /// Bind the driver to a data pin and strip length.
    ///
    /// Called on (re)initialization, after the pin was checked against the
    /// board table.
    fn attach(&mut self, _pin: u8, _led_count: usize) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
