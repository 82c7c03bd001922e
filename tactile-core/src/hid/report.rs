//! Keyboard input report
//!
//! ```text
//! Byte |  D7    D6    D5    D4     D3        D2        D1      D0
//! -----+-------------------------------------------------------------------
//!  0   |  0     0     0   KANA  Compose  ScrollLock CapsLock NumLock
//!  1   |                         Keycode
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DriverError;

/// Input report length in bytes
pub const REPORT_LEN: usize = 2;

/// The only report id this device uses
pub const REPORT_ID: u8 = 0;

/// USB HID keyboard usage values
pub mod keycode {
    /// No key pressed
    pub const NONE: u8 = 0x00;
    /// 'a' / 'A'
    pub const A: u8 = 0x04;
    /// 'b' / 'B'
    pub const B: u8 = 0x05;
    /// Page Up
    pub const PAGE_UP: u8 = 0x4B;
    /// Page Down
    pub const PAGE_DOWN: u8 = 0x4E;
    /// Highest usage the report descriptor declares (Keyboard Application)
    pub const MAX: u8 = 0x65;
}

/// Modifier bitfield carried in byte 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Modifier(u8);

impl Modifier {
    pub const NONE: Self = Self(0);
    pub const NUM_LOCK: Self = Self(1 << 0);
    pub const CAPS_LOCK: Self = Self(1 << 1);
    pub const SCROLL_LOCK: Self = Self(1 << 2);
    pub const COMPOSE: Self = Self(1 << 3);
    pub const KANA: Self = Self(1 << 4);

    /// Bits 5-7 are reserved and always zero
    const MASK: u8 = 0x1F;

    /// Build from raw bits, dropping reserved bits
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Two-byte keyboard input report
///
/// Constructed fresh for every delivery and never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidInputReport {
    pub modifier: Modifier,
    /// HID usage of the pressed key, 0 when released
    pub keycode: u8,
}

impl HidInputReport {
    pub const fn new(modifier: Modifier, keycode: u8) -> Self {
        Self { modifier, keycode }
    }

    /// Report for a button at `level`: its keycode when high, 0 when low
    pub const fn for_level(modifier: Modifier, keycode: u8, level: bool) -> Self {
        Self {
            modifier,
            keycode: if level { keycode } else { keycode::NONE },
        }
    }

    /// Check if the report carries a key press
    pub const fn is_pressed(&self) -> bool {
        self.keycode != keycode::NONE
    }

    /// Wire layout
    pub const fn to_bytes(self) -> [u8; REPORT_LEN] {
        [self.modifier.bits(), self.keycode]
    }

    /// Decode from the wire layout
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [modifier, keycode, ..] => Some(Self {
                modifier: Modifier::from_bits_truncate(*modifier),
                keycode: *keycode,
            }),
            _ => None,
        }
    }

    /// Write the report into `buf`, returning the bytes written
    pub fn write_to(self, buf: &mut [u8]) -> Result<usize, DriverError> {
        let dst = buf
            .get_mut(..REPORT_LEN)
            .ok_or(DriverError::BufferTooSmall)?;
        dst.copy_from_slice(&self.to_bytes());
        Ok(REPORT_LEN)
    }
}
