//! Per-button debounce engine
//!
//! One engine is bound to each tracked line. Its [`on_edge`] entry point
//! is what the line's interrupt handler calls; the strategy decides
//! whether a state change comes back right away or is confirmed later by
//! the button's worker.
//!
//! [`on_edge`]: DebounceEngine::on_edge

use std::sync::{Arc, Weak};

use log::{debug, trace, warn};

use tactile_core::config::ButtonConfig;
use tactile_core::debounce::{
    immediate, timed, ButtonState, DebounceConfig, DebounceStrategy, SessionStep, StateChange,
};
use tactile_core::hid::{HidInputReport, Modifier};
use tactile_hal::{GpioController, IrqHandler, LineId, TickClock};

use crate::reporter::EventReporter;
use crate::worker::WakeSignal;

/// Everything the engines of one open device share
pub struct Shared<G, C> {
    pub gpio: Arc<G>,
    pub clock: Arc<C>,
    pub reporter: Arc<EventReporter>,
    pub modifier: Modifier,
    pub strategy: DebounceStrategy,
    pub debounce: DebounceConfig,
}

impl<G, C> Clone for Shared<G, C> {
    fn clone(&self) -> Self {
        Self {
            gpio: self.gpio.clone(),
            clock: self.clock.clone(),
            reporter: self.reporter.clone(),
            modifier: self.modifier,
            strategy: self.strategy,
            debounce: self.debounce,
        }
    }
}

enum Mode {
    Immediate,
    Timed(WakeSignal),
}

/// Debounce state and strategy for one line
pub struct DebounceEngine<G, C> {
    line: LineId,
    button: ButtonConfig,
    state: ButtonState,
    shared: Shared<G, C>,
    mode: Mode,
}

impl<G, C> DebounceEngine<G, C>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    /// Engine that reports from interrupt context
    pub fn immediate(line: LineId, button: ButtonConfig, shared: Shared<G, C>) -> Self {
        Self::with_mode(line, button, shared, Mode::Immediate)
    }

    /// Engine that hands edges to a worker through `signal`
    pub fn timed(
        line: LineId,
        button: ButtonConfig,
        shared: Shared<G, C>,
        signal: WakeSignal,
    ) -> Self {
        Self::with_mode(line, button, shared, Mode::Timed(signal))
    }

    fn with_mode(line: LineId, button: ButtonConfig, shared: Shared<G, C>, mode: Mode) -> Self {
        Self {
            line,
            button,
            // Buttons start released; nothing carries over from a previous open
            state: ButtonState::new(false),
            shared,
            mode,
        }
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn keycode(&self) -> u8 {
        self.button.keycode
    }

    pub fn state(&self) -> &ButtonState {
        &self.state
    }

    pub fn gpio(&self) -> &G {
        &self.shared.gpio
    }

    /// Process one edge notification for `line`
    ///
    /// Runs in interrupt context. The line is masked while it is sampled
    /// and the state updated. Returns a change only when it is confirmed on
    /// the spot; timed engines wake their worker instead.
    pub fn on_edge(&self, line: LineId) -> Option<StateChange> {
        if line != self.line {
            warn!("engine for line {} got edge on line {}", self.line, line);
            return None;
        }

        let gpio = &self.shared.gpio;
        gpio.mask_irq(line);
        let level = self.sample();

        let change = match &self.mode {
            Mode::Immediate => immediate::on_edge(&self.state, level),
            Mode::Timed(signal) => {
                if timed::on_edge(&self.state, level, self.shared.clock.now()) {
                    signal.wake();
                }
                None
            }
        };

        gpio.unmask_irq(line);
        change
    }

    /// Current logical level of the line (true = pressed)
    pub fn sample(&self) -> bool {
        self.button.logical_level(self.shared.gpio.get_value(self.line))
    }

    /// One confirmation poll on the worker
    pub fn poll(&self) -> SessionStep {
        let level = self.sample();
        timed::poll(
            &self.state,
            level,
            self.shared.clock.now(),
            self.shared.debounce.window_ticks,
        )
    }

    /// Deliver a confirmed change to the subscriber
    pub fn report(&self, change: StateChange) {
        let report =
            HidInputReport::for_level(self.shared.modifier, self.button.keycode, change.level);
        debug!(
            "line {} {}",
            self.line,
            if change.level { "pressed" } else { "released" }
        );

        if !self.shared.reporter.deliver(report) {
            trace!("no subscriber, report for line {} dropped", self.line);
        }
    }

    /// Build the interrupt handler for this engine's line
    ///
    /// The handler holds the engine weakly: an edge that arrives after the
    /// button was torn down is logged and dropped.
    pub fn irq_handler(self: &Arc<Self>) -> IrqHandler {
        let engine: Weak<Self> = Arc::downgrade(self);

        Arc::new(move |line| match engine.upgrade() {
            Some(engine) => {
                if let Some(change) = engine.on_edge(line) {
                    engine.report(change);
                }
            }
            None => warn!("edge on line {} after teardown, dropped", line),
        })
    }
}
