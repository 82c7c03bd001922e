//! Simulated hardware for driver tests

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::Receiver;
use embedded_hal::digital::{ErrorType, InputPin};

use tactile_core::debounce::TICK_MS;
use tactile_core::hid::HidInputReport;
use tactile_hal::{GpioController, GpioError, IrqHandler, LineId, TickClock, Triggering};

use crate::reporter::EventCallback;

struct SimLine {
    active: bool,
    masked: bool,
    input: bool,
    level: bool,
    triggering: Option<Triggering>,
    handler: Option<IrqHandler>,
    filter_us: Option<u32>,
    mask_count: u32,
}

impl Default for SimLine {
    fn default() -> Self {
        Self {
            active: false,
            masked: true,
            input: false,
            level: false,
            triggering: None,
            handler: None,
            filter_us: None,
            mask_count: 0,
        }
    }
}

#[derive(Default)]
struct SimState {
    lines: Vec<SimLine>,
    fail_activation: Vec<LineId>,
    fail_attach: Vec<LineId>,
}

/// GPIO controller that raises interrupts when a test drives a level
///
/// Handlers run synchronously on the calling thread, outside the
/// controller's lock, like a real interrupt preempting thread context.
pub struct SimGpio {
    state: Mutex<SimState>,
    filter: bool,
}

impl SimGpio {
    pub fn new(line_count: usize) -> Self {
        let mut state = SimState::default();
        state.lines.resize_with(line_count, SimLine::default);
        Self {
            state: Mutex::new(state),
            filter: false,
        }
    }

    /// Provide a hardware glitch filter
    pub fn with_filter(mut self) -> Self {
        self.filter = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap()
    }

    fn with_line<T: Default>(&self, line: LineId, f: impl FnOnce(&mut SimLine) -> T) -> T {
        self.lock()
            .lines
            .get_mut(line as usize)
            .map(f)
            .unwrap_or_default()
    }

    pub fn fail_activation(&self, line: LineId) {
        self.lock().fail_activation.push(line);
    }

    pub fn fail_attach(&self, line: LineId) {
        self.lock().fail_attach.push(line);
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.fail_activation.clear();
        state.fail_attach.clear();
    }

    /// Drive the line to `level`, firing its interrupt if enabled
    pub fn set_level(&self, line: LineId, level: bool) {
        let handler = self.with_line(line, |l| {
            let changed = l.level != level;
            l.level = level;
            let armed = changed
                && l.active
                && !l.masked
                && l.triggering.is_some_and(|t| t.fires_on(level));
            if armed {
                l.handler.clone()
            } else {
                None
            }
        });

        if let Some(handler) = handler {
            handler(line);
        }
    }

    /// Fire the line's interrupt without a level change (a glitch)
    pub fn pulse(&self, line: LineId) {
        let handler = self.with_line(line, |l| {
            if l.active && !l.masked {
                l.handler.clone()
            } else {
                None
            }
        });

        if let Some(handler) = handler {
            handler(line);
        }
    }

    pub fn is_active(&self, line: LineId) -> bool {
        self.with_line(line, |l| l.active)
    }

    pub fn is_masked(&self, line: LineId) -> bool {
        self.with_line(line, |l| l.masked)
    }

    pub fn is_input(&self, line: LineId) -> bool {
        self.with_line(line, |l| l.input)
    }

    pub fn has_handler(&self, line: LineId) -> bool {
        self.with_line(line, |l| l.handler.is_some())
    }

    pub fn triggering(&self, line: LineId) -> Option<Triggering> {
        self.with_line(line, |l| l.triggering)
    }

    pub fn filter_us(&self, line: LineId) -> Option<u32> {
        self.with_line(line, |l| l.filter_us)
    }

    pub fn mask_count(&self, line: LineId) -> u32 {
        self.with_line(line, |l| l.mask_count)
    }
}

impl GpioController for SimGpio {
    fn line_count(&self) -> usize {
        self.lock().lines.len()
    }

    fn activate(&self, line: LineId) -> Result<(), GpioError> {
        let mut state = self.lock();
        if state.fail_activation.contains(&line) {
            return Err(GpioError::ActivationFailed);
        }
        let sim = state
            .lines
            .get_mut(line as usize)
            .ok_or(GpioError::InvalidLine)?;
        sim.active = true;
        Ok(())
    }

    fn deactivate(&self, line: LineId) {
        self.with_line(line, |l| l.active = false);
    }

    fn direction_in(&self, line: LineId) {
        self.with_line(line, |l| l.input = true);
    }

    fn get_value(&self, line: LineId) -> bool {
        self.with_line(line, |l| l.level)
    }

    fn mask_irq(&self, line: LineId) {
        self.with_line(line, |l| {
            l.masked = true;
            l.mask_count += 1;
        });
    }

    fn unmask_irq(&self, line: LineId) {
        self.with_line(line, |l| l.masked = false);
    }

    fn set_triggering(&self, line: LineId, triggering: Triggering) -> Result<(), GpioError> {
        self.with_line(line, |l| {
            l.triggering = Some(triggering);
            Some(())
        })
        .ok_or(GpioError::InvalidLine)
    }

    fn attach_irq(&self, line: LineId, handler: IrqHandler) -> Result<(), GpioError> {
        if self.lock().fail_attach.contains(&line) {
            return Err(GpioError::Unsupported);
        }
        self.with_line(line, |l| {
            l.handler = Some(handler);
            Some(())
        })
        .ok_or(GpioError::InvalidLine)
    }

    fn detach_irq(&self, line: LineId) {
        self.with_line(line, |l| l.handler = None);
    }

    fn set_debounce(&self, line: LineId, window_us: u32) -> Result<(), GpioError> {
        if !self.filter {
            return Err(GpioError::Unsupported);
        }
        self.with_line(line, |l| l.filter_us = Some(window_us));
        Ok(())
    }
}

/// Tick counter advanced by hand
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU32,
    tick_ms: u32,
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        Self {
            now: AtomicU32::new(start),
            tick_ms: TICK_MS,
        }
    }

    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn advance(&self, ticks: u32) {
        self.now.fetch_add(ticks, Ordering::SeqCst);
    }

    pub fn set(&self, tick: u32) {
        self.now.store(tick, Ordering::SeqCst);
    }
}

impl TickClock for ManualClock {
    fn now(&self) -> u32 {
        self.now.load(Ordering::SeqCst)
    }

    fn tick_ms(&self) -> u32 {
        self.tick_ms
    }
}

/// Callback that forwards decoded reports to a channel
pub fn collector() -> (EventCallback, Receiver<HidInputReport>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let callback: EventCallback = Arc::new(move |_, bytes: &[u8]| {
        if let Some(report) = HidInputReport::from_bytes(bytes) {
            let _ = tx.send(report);
        }
    });
    (callback, rx)
}

/// Input pin whose level is shared with the test
#[derive(Clone, Default)]
pub struct SimPin(Arc<AtomicBool>);

impl SimPin {
    pub fn set_high(&self, high: bool) {
        self.0.store(high, Ordering::SeqCst);
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.load(Ordering::SeqCst))
    }
}
