//! Configuration types
//!
//! Board-agnostic driver configuration. Boards either build it in code
//! from a preset or keep it in flash as postcard-serialized binary data.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::debounce::{DebounceConfig, DebounceStrategy};
use crate::hid::{keycode, HidDescriptor, Modifier};
use crate::registry::MAX_BUTTONS;

/// One configured button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonConfig {
    /// Index into the device's GPIO resource list
    pub resource_index: u8,
    /// HID usage reported while pressed
    pub keycode: u8,
    /// Pressed reads as low
    pub active_low: bool,
}

impl ButtonConfig {
    /// Create an active-high button
    pub const fn new(resource_index: u8, keycode: u8) -> Self {
        Self {
            resource_index,
            keycode,
            active_low: false,
        }
    }

    /// Create an active-low button
    pub const fn active_low(resource_index: u8, keycode: u8) -> Self {
        Self {
            resource_index,
            keycode,
            active_low: true,
        }
    }

    /// Logical level (true = pressed) for a raw line level
    pub const fn logical_level(&self, raw: bool) -> bool {
        raw != self.active_low
    }
}

/// Complete driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverConfig {
    /// Buttons in resource order
    pub buttons: Vec<ButtonConfig, MAX_BUTTONS>,
    pub strategy: DebounceStrategy,
    pub debounce: DebounceConfig,
    /// Modifier byte sent with every report
    pub modifier: Modifier,
    pub descriptor: HidDescriptor,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::page_buttons()
    }
}

impl DriverConfig {
    /// Page Up / Page Down pair with software debounce (e-reader board)
    pub fn page_buttons() -> Self {
        let mut buttons = Vec::new();
        let _ = buttons.push(ButtonConfig::new(0, keycode::PAGE_UP));
        let _ = buttons.push(ButtonConfig::new(1, keycode::PAGE_DOWN));

        Self {
            buttons,
            strategy: DebounceStrategy::Timed,
            debounce: DebounceConfig::default(),
            modifier: Modifier::NONE,
            descriptor: HidDescriptor::new(0x18D1, 0x1234),
        }
    }

    /// 'A' / 'B' pair reported straight from the interrupt (tutorial board)
    pub fn letter_buttons() -> Self {
        let mut buttons = Vec::new();
        let _ = buttons.push(ButtonConfig::new(0, keycode::A));
        let _ = buttons.push(ButtonConfig::new(1, keycode::B));

        Self {
            buttons,
            strategy: DebounceStrategy::Immediate,
            debounce: DebounceConfig::default(),
            modifier: Modifier::NONE,
            descriptor: HidDescriptor::new(0x1234, 0xABCD),
        }
    }

    /// Replace the debounce strategy
    pub fn with_strategy(mut self, strategy: DebounceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the debounce timing
    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    /// Check the configuration is usable
    ///
    /// Requires at least one button, no resource used twice, and keycodes
    /// within the range the report descriptor declares.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buttons.is_empty() {
            return Err(ConfigError::NoButtons);
        }

        for (i, button) in self.buttons.iter().enumerate() {
            if button.keycode == keycode::NONE || button.keycode > keycode::MAX {
                return Err(ConfigError::InvalidKeycode);
            }
            let reused = self.buttons[..i]
                .iter()
                .any(|b| b.resource_index == button.resource_index);
            if reused {
                return Err(ConfigError::DuplicateResource);
            }
        }

        if self.debounce.window_ticks == 0 {
            return Err(ConfigError::InvalidWindow);
        }

        Ok(())
    }
}

#[cfg(feature = "serde")]
impl DriverConfig {
    /// Serialize into `buf`, returning the used prefix
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No buttons configured
    NoButtons,
    /// Keycode is 0 or beyond the declared usage range
    InvalidKeycode,
    /// Two buttons share one GPIO resource
    DuplicateResource,
    /// Debounce window of zero ticks
    InvalidWindow,
    /// Output buffer too small
    Serialize,
    /// Corrupt or truncated data
    Deserialize,
}
