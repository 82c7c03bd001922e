//! Host framework contracts
//!
//! These traits define the interface between the host device framework
//! and a driver. The framework calls them; drivers implement them.

pub mod device;

pub use device::{DeviceDriver, DeviceKind, DriverInfo, HidDevice};
