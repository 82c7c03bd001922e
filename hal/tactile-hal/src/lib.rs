//! Tactile Hardware Abstraction Layer
//!
//! This crate defines the hardware contracts the button driver consumes.
//! Board support code implements them once per SoC; the driver and its
//! tests never touch registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tactile-drivers (ButtonDriver)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tactile-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  SoC GPIO     │       │  PolledLines  │
//! │  controller   │       │ (embedded-hal)│
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioController`] - Interrupt-capable GPIO lines
//! - [`clock::TickClock`] - Monotonic system tick counter
//! - [`resource::ResourceTable`] - Board resource lookup

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod clock;
pub mod gpio;
pub mod polled;
pub mod resource;

// Re-export key traits at crate root for convenience
pub use clock::TickClock;
pub use gpio::{GpioController, GpioError, IrqHandler, LineId, Triggering};
pub use polled::PolledLines;
pub use resource::ResourceTable;
