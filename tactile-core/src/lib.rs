//! Board-agnostic core logic for the button HID driver
//!
//! This crate contains all logic that does not depend on specific
//! hardware or on a threading runtime:
//!
//! - HID keyboard report layout and fixed descriptor tables
//! - Debounce decisions for both strategies (immediate re-sample and
//!   timed confirmation) over a per-button atomic state
//! - Tick arithmetic that survives counter wraparound
//! - Button registry keyed by GPIO line
//! - Driver lifecycle state machine
//! - Error taxonomy and configuration types
//! - Host framework contracts

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod debounce;
pub mod error;
pub mod hid;
pub mod registry;
pub mod state;
pub mod traits;

pub use error::DriverError;

/// Identifier of a single GPIO line
pub type LineId = u16;
