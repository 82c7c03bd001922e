//! HID keyboard report model
//!
//! The device presents itself as a one-key keyboard with a single 2-byte
//! input report and no output or feature reports.

pub mod descriptor;
pub mod report;

pub use descriptor::{
    HidDescriptor, ReportSizeInfo, ReportTable, ReportType, REPORT_DESCRIPTOR,
    REPORT_DESCRIPTOR_LEN, REPORT_SIZES,
};
pub use report::{keycode, HidInputReport, Modifier, REPORT_ID, REPORT_LEN};
