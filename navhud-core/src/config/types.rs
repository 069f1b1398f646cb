//! Configuration type definitions

use heapless::String;
use navhud_protocol::link::MAX_NAME_LEN;
use navhud_protocol::reassembly::DEFAULT_SESSION_TIMEOUT_MS;
use navhud_protocol::BitmapOffset;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default advertised name
pub const DEFAULT_DEVICE_NAME: &str = "navHUD";

/// Default stall check period
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 250;

/// SSD1306 default I2C address
pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;

/// SSD1306 reset contrast
pub const DEFAULT_CONTRAST: u8 = 0xCF;

/// Configuration problems found by [`HudConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Device name must not be empty
    EmptyDeviceName,
    /// Session timeout must be non-zero
    ZeroSessionTimeout,
    /// Tick interval must be non-zero
    ZeroTickInterval,
    /// Tick interval longer than the session timeout
    TickSlowerThanTimeout,
    /// Not a 7-bit, non-reserved I2C address
    InvalidI2cAddress,
}

/// Phone link settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct LinkConfig {
    /// Name the bridge advertises
    pub device_name: String<MAX_NAME_LEN>,
    /// Idle time after which a partial transfer is dropped
    pub session_timeout_ms: u32,
    /// How often stalled sessions are checked
    pub tick_interval_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        let mut device_name = String::new();
        let _ = device_name.push_str(DEFAULT_DEVICE_NAME);
        Self {
            device_name,
            session_timeout_ms: DEFAULT_SESSION_TIMEOUT_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

/// OLED panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DisplayConfig {
    /// 7-bit I2C address
    pub i2c_address: u8,
    /// Panel contrast (0-255)
    pub contrast: u8,
    /// Switch the panel off while no phone is connected
    pub power_off_on_disconnect: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            i2c_address: DEFAULT_I2C_ADDRESS,
            contrast: DEFAULT_CONTRAST,
            power_off_on_disconnect: true,
        }
    }
}

/// Message decoding settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DecoderConfig {
    /// Icon alignment within the message
    pub bitmap_offset: BitmapOffset,
}

/// Complete firmware configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct HudConfig {
    pub link: LinkConfig,
    pub display: DisplayConfig,
    pub decoder: DecoderConfig,
}

impl HudConfig {
    /// Defaults matching the stock hardware
    pub fn new() -> Self {
        Self::default()
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link.device_name.is_empty() {
            return Err(ConfigError::EmptyDeviceName);
        }
        if self.link.session_timeout_ms == 0 {
            return Err(ConfigError::ZeroSessionTimeout);
        }
        if self.link.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.link.tick_interval_ms > self.link.session_timeout_ms {
            return Err(ConfigError::TickSlowerThanTimeout);
        }
        // 0x00-0x07 and 0x78-0x7F are reserved
        if !(0x08..=0x77).contains(&self.display.i2c_address) {
            return Err(ConfigError::InvalidI2cAddress);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = HudConfig::new();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.link.device_name.as_str(), "navHUD");
        assert_eq!(config.display.i2c_address, 0x3C);
        assert_eq!(config.decoder.bitmap_offset, BitmapOffset::Legacy);
    }

    #[test]
    fn test_validate_timeouts() {
        let mut config = HudConfig::new();
        config.link.session_timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSessionTimeout));

        config.link.session_timeout_ms = 100;
        config.link.tick_interval_ms = 500;
        assert_eq!(config.validate(), Err(ConfigError::TickSlowerThanTimeout));

        config.link.tick_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn test_validate_i2c_address() {
        let mut config = HudConfig::new();
        config.display.i2c_address = 0x78;
        assert_eq!(config.validate(), Err(ConfigError::InvalidI2cAddress));
        config.display.i2c_address = 0x3D;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_empty_name() {
        let mut config = HudConfig::new();
        config.link.device_name.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyDeviceName));
    }
}
