//! Board resource lookup
//!
//! The host framework describes which GPIO lines belong to a device as an
//! indexed resource list. Drivers resolve each index once at open time.

use alloc::vec::Vec;

use crate::gpio::LineId;

/// Indexed GPIO resources assigned to a device
pub trait ResourceTable: Send + Sync {
    /// Resolve the `index`-th GPIO resource to a line id
    fn gpio_line(&self, index: usize) -> Option<LineId>;
}

impl<const N: usize> ResourceTable for [LineId; N] {
    fn gpio_line(&self, index: usize) -> Option<LineId> {
        self.get(index).copied()
    }
}

impl ResourceTable for Vec<LineId> {
    fn gpio_line(&self, index: usize) -> Option<LineId> {
        self.get(index).copied()
    }
}
