//! Driver error taxonomy
//!
//! Every failure the driver can report to the host framework. Lifecycle
//! operations return these without mutating state; the framework decides
//! what the user sees.

use core::fmt;

const EIO: i32 = 5;
const ENOENT: i32 = 2;
const ENOMEM: i32 = 12;
const EBUSY: i32 = 16;
const EEXIST: i32 = 17;
const EINVAL: i32 = 22;

/// Errors returned by driver operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Missing device context
    InvalidArgument,
    /// Device has not been probed
    NotProbed,
    /// Device was already probed
    AlreadyProbed,
    /// Device is not open
    NotOpen,
    /// Device is already open
    AlreadyOpen,
    /// Device is already powered on
    AlreadyPowered,
    /// Allocation or fixed capacity exhausted
    OutOfMemory,
    /// GPIO resource lookup or activation failed
    HardwareInitFailed,
    /// Caller buffer cannot hold the result
    BufferTooSmall,
    /// Only input reports are supported
    UnsupportedReportType,
    /// Only report id 0 is supported
    UnsupportedReportId,
    /// A button is already tracked on this line
    DuplicateLine,
    /// No button is tracked on this line
    NotFound,
}

impl DriverError {
    /// Negative errno reported to the host framework
    pub const fn errno(&self) -> i32 {
        match self {
            DriverError::InvalidArgument
            | DriverError::BufferTooSmall
            | DriverError::UnsupportedReportType => -EINVAL,
            DriverError::NotProbed
            | DriverError::NotOpen
            | DriverError::HardwareInitFailed
            | DriverError::UnsupportedReportId => -EIO,
            DriverError::AlreadyProbed | DriverError::AlreadyOpen | DriverError::AlreadyPowered => {
                -EBUSY
            }
            DriverError::OutOfMemory => -ENOMEM,
            DriverError::DuplicateLine => -EEXIST,
            DriverError::NotFound => -ENOENT,
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DriverError::InvalidArgument => "missing device context",
            DriverError::NotProbed => "device not probed",
            DriverError::AlreadyProbed => "device already probed",
            DriverError::NotOpen => "device not open",
            DriverError::AlreadyOpen => "device already open",
            DriverError::AlreadyPowered => "device already powered on",
            DriverError::OutOfMemory => "out of memory",
            DriverError::HardwareInitFailed => "hardware initialization failed",
            DriverError::BufferTooSmall => "buffer too small",
            DriverError::UnsupportedReportType => "unsupported report type",
            DriverError::UnsupportedReportId => "unsupported report id",
            DriverError::DuplicateLine => "line already tracked",
            DriverError::NotFound => "line not tracked",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for DriverError {}
