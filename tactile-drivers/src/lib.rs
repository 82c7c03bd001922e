//! Button HID driver
//!
//! Hosted implementation of the driver contracts defined in
//! tactile-core, on top of the tactile-hal GPIO traits:
//!
//! - [`ButtonDriver`]: lifecycle (probe, open, power, close, remove) and
//!   HID queries, serialized by one lock
//! - Per-button [`DebounceEngine`] bound to its line's interrupt, with a
//!   dedicated worker thread when confirmation is timed
//! - [`EventReporter`]: hands confirmed reports to the subscriber, if any
//! - [`SystemTicks`]: tick source for hosted targets

#![deny(unsafe_code)]

pub mod button;
pub mod clock;
pub mod driver;
pub mod engine;
pub mod reporter;
pub mod worker;

#[cfg(test)]
mod testing;

pub use clock::SystemTicks;
pub use driver::{ButtonDriver, DRIVER_INFO};
pub use engine::DebounceEngine;
pub use reporter::{EventCallback, EventReporter};
