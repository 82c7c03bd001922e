//! Driver lifecycle state machine
//!
//! The driver moves through probe, open and power-on, and back down
//! through power-off, close and remove. Every lifecycle call is validated
//! here before any hardware is touched.

pub mod machine;
pub mod ops;

pub use machine::DriverState;
pub use ops::Operation;
