//! Fixed HID descriptor tables
//!
//! The report descriptor is a constant consumed verbatim by the host. The
//! size table records the length of each report type per report id, as
//! parsed from that descriptor.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::report::REPORT_ID;
use crate::error::DriverError;

/// HID class specification release 1.11 (BCD)
pub const HID_VERSION: u16 = 0x0111;

/// Length of [`REPORT_DESCRIPTOR`]
pub const REPORT_DESCRIPTOR_LEN: usize = 35;

/// Report descriptor for a one-key keyboard
pub static REPORT_DESCRIPTOR: [u8; REPORT_DESCRIPTOR_LEN] = [
    0x05, 0x01, // USAGE_PAGE (Generic Desktop)
    0x09, 0x06, // USAGE (Keyboard)
    0xa1, 0x01, // COLLECTION (Application)
    0x05, 0x07, //   USAGE_PAGE (Keyboard)
    0x19, 0xe0, //   USAGE_MINIMUM (Keyboard LeftControl)
    0x29, 0xe7, //   USAGE_MAXIMUM (Keyboard Right GUI)
    0x15, 0x00, //   LOGICAL_MINIMUM (0)
    0x25, 0x01, //   LOGICAL_MAXIMUM (1)
    0x75, 0x01, //   REPORT_SIZE (1)
    0x95, 0x08, //   REPORT_COUNT (8)
    0x81, 0x02, //   INPUT (Data,Var,Abs)
    0x95, 0x01, //   REPORT_COUNT (1)
    0x75, 0x08, //   REPORT_SIZE (8)
    0x25, 0x65, //   LOGICAL_MAXIMUM (101)
    0x19, 0x00, //   USAGE_MINIMUM (Reserved (no event))
    0x29, 0x65, //   USAGE_MAXIMUM (Keyboard Application)
    0x81, 0x00, //   INPUT (Data,Ary,Abs)
    0xc0, // END_COLLECTION
];

/// HID report type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReportType {
    Input = 0,
    Output = 1,
    Feature = 2,
}

/// HID device descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HidDescriptor {
    /// Size of this descriptor in bytes
    pub length: u8,
    /// Size of the report descriptor in bytes
    pub report_desc_length: u16,
    /// HID class release (BCD)
    pub hid_version: u16,
    pub product_id: u16,
    pub vendor_id: u16,
    /// Localization, 0 = not localized
    pub country_code: u8,
}

impl HidDescriptor {
    /// Encoded size of the descriptor
    pub const LEN: usize = 10;

    /// Descriptor for this device's report layout under the given ids
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            length: Self::LEN as u8,
            report_desc_length: REPORT_DESCRIPTOR_LEN as u16,
            hid_version: HID_VERSION,
            product_id,
            vendor_id,
            country_code: 0,
        }
    }

    /// Little-endian wire layout
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[0] = self.length;
        out[1..3].copy_from_slice(&self.report_desc_length.to_le_bytes());
        out[3..5].copy_from_slice(&self.hid_version.to_le_bytes());
        out[5..7].copy_from_slice(&self.product_id.to_le_bytes());
        out[7..9].copy_from_slice(&self.vendor_id.to_le_bytes());
        out[9] = self.country_code;
        out
    }
}

/// Report lengths for a single report id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportSizeInfo {
    pub id: u8,
    /// Lengths indexed by [`ReportType`]: input, output, feature
    pub sizes: [u16; 3],
}

/// Sizes parsed from [`REPORT_DESCRIPTOR`]: one 2-byte input report
pub static REPORT_SIZES: [ReportSizeInfo; 1] = [ReportSizeInfo {
    id: REPORT_ID,
    sizes: [2, 0, 0],
}];

/// Lookup over a report size table
#[derive(Debug, Clone, Copy)]
pub struct ReportTable<'a> {
    entries: &'a [ReportSizeInfo],
}

impl Default for ReportTable<'static> {
    fn default() -> Self {
        Self::new(&REPORT_SIZES)
    }
}

impl<'a> ReportTable<'a> {
    pub const fn new(entries: &'a [ReportSizeInfo]) -> Self {
        Self { entries }
    }

    /// Length of the report of `report_type` with `report_id`, 0 if absent
    pub fn report_length(&self, report_type: ReportType, report_id: u8) -> u16 {
        self.entries
            .iter()
            .find(|e| e.id == report_id)
            .map(|e| e.sizes[report_type as usize])
            .unwrap_or(0)
    }

    /// Largest report of `report_type` across all ids
    ///
    /// When the largest report has a non-zero id, one byte is added for
    /// the id prefix the host must reserve.
    pub fn max_report_length(&self, report_type: ReportType) -> u16 {
        let mut max_len = 0;
        let mut max_id = 0;

        for entry in self.entries {
            let len = entry.sizes[report_type as usize];
            if len > max_len {
                max_len = len;
                max_id = entry.id;
            }
        }

        if max_id != 0 {
            max_len += 1;
        }
        max_len
    }

    /// Validate an input report request against the table
    pub fn check_input(&self, report_id: u8) -> Result<u16, DriverError> {
        match self.report_length(ReportType::Input, report_id) {
            0 => Err(DriverError::UnsupportedReportId),
            len => Ok(len),
        }
    }
}
