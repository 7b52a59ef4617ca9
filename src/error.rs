//! Error types reported by the engine's public API.

use core::fmt;

/// The engine lock could not be acquired within the configured timeout.
///
/// Transient: the caller may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTimeout;

impl fmt::Display for LockTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("effects engine is busy")
    }
}

/// Hardware binding and configuration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Pin is not present on the board
    UnknownPin(u8),
    /// Pin exists but is reserved (strapping, flash, USB)
    UnsafePin(u8),
    /// Pixel count is zero or above [`crate::MAX_PIXELS`]
    PixelCount(usize),
    /// Refresh rate is zero or above [`crate::strip::MAX_REFRESH_RATE_HZ`]
    RefreshRate(u16),
    /// Output driver refused the binding
    Binding,
    /// `reinitialize` called before `initialize`
    NotInitialized,
    /// Serialized configuration could not be parsed or written
    Malformed,
    LockTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPin(pin) => write!(f, "GPIO{} does not exist on this board", pin),
            Self::UnsafePin(pin) => write!(f, "GPIO{} is reserved on this board", pin),
            Self::PixelCount(count) => write!(
                f,
                "pixel count {} is outside 1..={}",
                count,
                crate::MAX_PIXELS
            ),
            Self::RefreshRate(hz) => write!(f, "refresh rate {} Hz is out of range", hz),
            Self::Binding => f.write_str("output driver rejected the binding"),
            Self::NotInitialized => f.write_str("strip is not initialized"),
            Self::Malformed => f.write_str("malformed effects configuration"),
            Self::LockTimeout => LockTimeout.fmt(f),
        }
    }
}

impl From<LockTimeout> for ConfigError {
    fn from(_: LockTimeout) -> Self {
        Self::LockTimeout
    }
}

/// Failures starting an effect. State is never changed when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectError {
    UnknownEffect,
    /// A cycle target was requested for a continuous effect
    NotCycleBased,
    NotInitialized,
    LockTimeout,
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEffect => f.write_str("unknown effect"),
            Self::NotCycleBased => f.write_str("effect does not support cycle counting"),
            Self::NotInitialized => f.write_str("strip is not initialized"),
            Self::LockTimeout => LockTimeout.fmt(f),
        }
    }
}

impl From<LockTimeout> for EffectError {
    fn from(_: LockTimeout) -> Self {
        Self::LockTimeout
    }
}
