//! Device driver and HID operation contracts

use crate::error::DriverError;
use crate::hid::{HidDescriptor, ReportType};

/// Device class a driver registers for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceKind {
    /// HID hardware device
    HidHw,
}

/// Registration record published to the framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverInfo {
    pub kind: DeviceKind,
    pub name: &'static str,
    pub description: &'static str,
}

/// Lifecycle contract called by the framework
pub trait DeviceDriver {
    /// Allocate driver private state
    fn probe(&self) -> Result<(), DriverError>;

    /// Release driver private state, closing first if needed
    fn remove(&self) -> Result<(), DriverError>;

    /// Claim hardware and prepare for use
    fn open(&self) -> Result<(), DriverError>;

    /// Release everything `open` claimed
    fn close(&self) -> Result<(), DriverError>;
}

/// HID operation contract
pub trait HidDevice {
    /// Event sink invoked for each input report
    type Callback;

    /// Enable input event generation
    fn power_on(&self) -> Result<(), DriverError>;

    /// Disable input event generation
    fn power_off(&self) -> Result<(), DriverError>;

    /// HID device descriptor
    fn get_descriptor(&self) -> Result<HidDescriptor, DriverError>;

    /// Copy the report descriptor into `buf`, returning its length
    fn get_report_descriptor(&self, buf: &mut [u8]) -> Result<usize, DriverError>;

    /// Length of one report, 0 if the device has no such report
    fn get_report_length(&self, report_type: ReportType, report_id: u8) -> Result<u16, DriverError>;

    /// Largest report of `report_type`, including any report id prefix
    fn get_maximum_report_length(&self, report_type: ReportType) -> Result<u16, DriverError>;

    /// Synthesize the current report into `buf`, returning its length
    fn get_report(
        &self,
        report_type: ReportType,
        report_id: u8,
        buf: &mut [u8],
    ) -> Result<usize, DriverError>;

    /// Subscribe to input reports, replacing any previous subscriber
    fn register_callback(&self, callback: Self::Callback) -> Result<(), DriverError>;

    /// Drop the current subscriber
    fn unregister_callback(&self) -> Result<(), DriverError>;
}
