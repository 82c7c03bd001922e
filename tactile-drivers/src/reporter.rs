//! Input report delivery
//!
//! Holds the single subscriber and hands each confirmed report to it.
//! Delivery runs in interrupt or worker context, so the slot is guarded by
//! a critical section and the callback itself runs outside it.

use core::cell::RefCell;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use tactile_core::hid::{HidInputReport, ReportType};

/// Subscriber for input reports
///
/// Called with the report type (always input) and the report bytes. Any
/// device context the consumer needs is captured by the closure.
pub type EventCallback = Arc<dyn Fn(ReportType, &[u8]) + Send + Sync>;

/// Delivers input reports to the registered callback
pub struct EventReporter {
    callback: Mutex<CriticalSectionRawMutex, RefCell<Option<EventCallback>>>,
    delivered: AtomicU32,
    dropped: AtomicU32,
}

impl Default for EventReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventReporter {
    pub const fn new() -> Self {
        Self {
            callback: Mutex::new(RefCell::new(None)),
            delivered: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Replace the subscriber
    pub fn register(&self, callback: EventCallback) {
        self.callback.lock(|slot| *slot.borrow_mut() = Some(callback));
    }

    /// Drop the subscriber
    pub fn unregister(&self) {
        self.callback.lock(|slot| *slot.borrow_mut() = None);
    }

    /// Check if a subscriber is registered
    pub fn is_registered(&self) -> bool {
        self.callback.lock(|slot| slot.borrow().is_some())
    }

    /// Hand `report` to the subscriber
    ///
    /// Returns false when nobody is subscribed; the report is dropped,
    /// which is not an error.
    pub fn deliver(&self, report: HidInputReport) -> bool {
        let callback = self.callback.lock(|slot| slot.borrow().clone());

        match callback {
            Some(callback) => {
                callback(ReportType::Input, &report.to_bytes());
                self.delivered.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Reports handed to a subscriber so far
    pub fn delivered(&self) -> u32 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Reports dropped for lack of a subscriber
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactile_core::hid::{keycode, Modifier};

    #[test]
    fn test_deliver_without_subscriber_drops() {
        let reporter = EventReporter::new();
        let report = HidInputReport::new(Modifier::NONE, keycode::PAGE_UP);

        assert!(!reporter.deliver(report));
        assert_eq!(reporter.dropped(), 1);
        assert_eq!(reporter.delivered(), 0);
    }

    #[test]
    fn test_deliver_to_subscriber() {
        let reporter = EventReporter::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        reporter.register(Arc::new(move |report_type, bytes: &[u8]| {
            tx.send((report_type, bytes.to_vec())).unwrap();
        }));
        assert!(reporter.is_registered());

        assert!(reporter.deliver(HidInputReport::new(Modifier::NONE, keycode::PAGE_DOWN)));
        assert_eq!(rx.try_recv().unwrap(), (ReportType::Input, vec![0x00, 0x4E]));
        assert_eq!(reporter.delivered(), 1);
    }

    #[test]
    fn test_unregister_stops_delivery() {
        let reporter = EventReporter::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        reporter.register(Arc::new(move |_, bytes: &[u8]| {
            tx.send(bytes.to_vec()).unwrap();
        }));

        reporter.unregister();
        assert!(!reporter.is_registered());
        assert!(!reporter.deliver(HidInputReport::default()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_callback_may_unregister_itself() {
        let reporter = Arc::new(EventReporter::new());
        let inner = reporter.clone();
        reporter.register(Arc::new(move |_, _| inner.unregister()));

        assert!(reporter.deliver(HidInputReport::default()));
        assert!(!reporter.is_registered());
    }
}
