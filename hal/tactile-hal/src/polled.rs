//! Edge detection for boards without per-pin interrupts
//!
//! Wraps a bank of `embedded-hal` input pins and synthesizes edge
//! interrupts by comparing levels on every [`PolledLines::scan`]. Call
//! `scan` from a periodic timer interrupt; handlers then run in that
//! context exactly as they would from a pin-change interrupt.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::InputPin;

use crate::gpio::{GpioController, GpioError, IrqHandler, LineId, Triggering};

struct Line<P> {
    pin: P,
    active: bool,
    masked: bool,
    triggering: Triggering,
    /// Level seen by the previous scan
    level: bool,
    handler: Option<IrqHandler>,
}

/// GPIO controller backed by polled `embedded-hal` input pins
///
/// Line ids are indices into the pin array.
pub struct PolledLines<P, const N: usize> {
    lines: Mutex<RefCell<[Line<P>; N]>>,
}

impl<P: InputPin + Send, const N: usize> PolledLines<P, N> {
    /// Create a controller over `pins`; every line starts inactive and masked
    pub fn new(pins: [P; N]) -> Self {
        let lines = pins.map(|pin| Line {
            pin,
            active: false,
            masked: true,
            triggering: Triggering::BothEdges,
            level: false,
            handler: None,
        });

        Self {
            lines: Mutex::new(RefCell::new(lines)),
        }
    }

    fn with_line<R>(&self, line: LineId, f: impl FnOnce(&mut Line<P>) -> R) -> Option<R> {
        critical_section::with(|cs| {
            let mut lines = self.lines.borrow_ref_mut(cs);
            lines.get_mut(line as usize).map(f)
        })
    }

    /// Sample every active line and fire handlers for qualifying edges
    ///
    /// Handlers run outside the critical section so they may call back
    /// into the controller. Returns the number of handlers invoked.
    pub fn scan(&self) -> usize {
        let mut fired = 0;

        for index in 0..N {
            let line = index as LineId;
            let handler = self
                .with_line(line, |l| {
                    if !l.active {
                        return None;
                    }

                    let level = l.pin.is_high().unwrap_or(l.level);
                    if level == l.level {
                        return None;
                    }
                    l.level = level;

                    if l.masked || !l.triggering.fires_on(level) {
                        return None;
                    }
                    l.handler.clone()
                })
                .flatten();

            if let Some(handler) = handler {
                handler(line);
                fired += 1;
            }
        }

        fired
    }
}

impl<P: InputPin + Send, const N: usize> GpioController for PolledLines<P, N> {
    fn line_count(&self) -> usize {
        N
    }

    fn activate(&self, line: LineId) -> Result<(), GpioError> {
        self.with_line(line, |l| {
            l.active = true;
            l.level = l.pin.is_high().unwrap_or(false);
        })
        .ok_or(GpioError::InvalidLine)
    }

    fn deactivate(&self, line: LineId) {
        self.with_line(line, |l| {
            l.active = false;
            l.masked = true;
        });
    }

    fn direction_in(&self, _line: LineId) {
        // Pins are inputs by construction
    }

    fn get_value(&self, line: LineId) -> bool {
        self.with_line(line, |l| l.pin.is_high().unwrap_or(l.level))
            .unwrap_or(false)
    }

    fn mask_irq(&self, line: LineId) {
        self.with_line(line, |l| l.masked = true);
    }

    fn unmask_irq(&self, line: LineId) {
        self.with_line(line, |l| l.masked = false);
    }

    fn set_triggering(&self, line: LineId, triggering: Triggering) -> Result<(), GpioError> {
        self.with_line(line, |l| l.triggering = triggering)
            .ok_or(GpioError::InvalidLine)
    }

    fn attach_irq(&self, line: LineId, handler: IrqHandler) -> Result<(), GpioError> {
        self.with_line(line, |l| l.handler = Some(handler))
            .ok_or(GpioError::InvalidLine)
    }

    fn detach_irq(&self, line: LineId) {
        self.with_line(line, |l| l.handler = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use core::convert::Infallible;
    use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Clone)]
    struct MockPin(Arc<AtomicBool>);

    impl MockPin {
        fn new() -> Self {
            Self(Arc::new(AtomicBool::new(false)))
        }

        fn set(&self, high: bool) {
            self.0.store(high, Ordering::SeqCst);
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0.load(Ordering::SeqCst))
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0.load(Ordering::SeqCst))
        }
    }

    fn counting_handler() -> (IrqHandler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let handler: IrqHandler = Arc::new(move |_line| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (handler, count)
    }

    #[test]
    fn test_scan_fires_on_edge() {
        let pin = MockPin::new();
        let lines = PolledLines::new([pin.clone()]);
        let (handler, count) = counting_handler();

        lines.activate(0).unwrap();
        lines.attach_irq(0, handler).unwrap();
        lines.unmask_irq(0);

        // No change, no interrupt
        assert_eq!(lines.scan(), 0);

        pin.set(true);
        assert_eq!(lines.scan(), 1);
        assert_eq!(lines.scan(), 0);

        pin.set(false);
        assert_eq!(lines.scan(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_masked_line_does_not_fire() {
        let pin = MockPin::new();
        let lines = PolledLines::new([pin.clone()]);
        let (handler, count) = counting_handler();

        lines.activate(0).unwrap();
        lines.attach_irq(0, handler).unwrap();

        pin.set(true);
        assert_eq!(lines.scan(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // Edge seen while masked is consumed, not replayed
        lines.unmask_irq(0);
        assert_eq!(lines.scan(), 0);
    }

    #[test]
    fn test_rising_edge_only() {
        let pin = MockPin::new();
        let lines = PolledLines::new([pin.clone()]);
        let (handler, count) = counting_handler();

        lines.activate(0).unwrap();
        lines.set_triggering(0, Triggering::RisingEdge).unwrap();
        lines.attach_irq(0, handler).unwrap();
        lines.unmask_irq(0);

        pin.set(true);
        lines.scan();
        pin.set(false);
        lines.scan();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_line() {
        let lines = PolledLines::new([MockPin::new(), MockPin::new()]);
        assert_eq!(lines.line_count(), 2);
        assert_eq!(lines.activate(2), Err(GpioError::InvalidLine));
        assert_eq!(lines.set_debounce(0, 250_000), Err(GpioError::Unsupported));
    }

    #[test]
    fn test_deactivated_line_is_not_scanned() {
        let pin = MockPin::new();
        let lines = PolledLines::new([pin.clone()]);
        let (handler, count) = counting_handler();

        lines.activate(0).unwrap();
        lines.attach_irq(0, handler).unwrap();
        lines.unmask_irq(0);
        lines.deactivate(0);

        pin.set(true);
        assert_eq!(lines.scan(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(lines.get_value(0));
    }
}
