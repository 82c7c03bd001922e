//! Tracked buttons
//!
//! A [`Button`] owns everything claimed for one line: the debounce engine
//! bound to its interrupt and, for timed confirmation, the worker thread.
//! Bring-up undoes its own partial work on failure; teardown releases in
//! reverse order.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use tactile_core::config::ButtonConfig;
use tactile_core::debounce::DebounceStrategy;
use tactile_core::registry::Keyed;
use tactile_core::DriverError;
use tactile_hal::{GpioController, GpioError, LineId, TickClock, Triggering};

use crate::engine::{DebounceEngine, Shared};
use crate::worker::{wake_channel, DebounceWorker};

/// One initialized button
pub struct Button<G, C>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    engine: Arc<DebounceEngine<G, C>>,
    worker: Option<DebounceWorker>,
}

impl<G, C> Button<G, C>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    /// Claim `line` and bind a debounce engine to its interrupt
    ///
    /// The line ends up configured as an input triggering on both edges,
    /// with its interrupt masked until the device is powered on.
    pub fn open(
        line: LineId,
        config: ButtonConfig,
        shared: &Shared<G, C>,
    ) -> Result<Self, DriverError> {
        let gpio = &shared.gpio;

        gpio.activate(line).map_err(|e| {
            warn!("line {} activation failed: {:?}", line, e);
            DriverError::HardwareInitFailed
        })?;

        match Self::bind(line, config, shared) {
            Ok(button) => {
                debug!("line {} bound to keycode {:#04x}", line, config.keycode);
                Ok(button)
            }
            Err(e) => {
                gpio.mask_irq(line);
                gpio.deactivate(line);
                Err(e)
            }
        }
    }

    fn bind(
        line: LineId,
        config: ButtonConfig,
        shared: &Shared<G, C>,
    ) -> Result<Self, DriverError> {
        let gpio = &shared.gpio;

        gpio.direction_in(line);
        gpio.mask_irq(line);
        gpio.set_triggering(line, Triggering::BothEdges).map_err(|e| {
            warn!("line {} cannot trigger on both edges: {:?}", line, e);
            DriverError::HardwareInitFailed
        })?;

        let (engine, worker) = match shared.strategy {
            DebounceStrategy::Immediate => {
                if shared.debounce.hardware_filter {
                    Self::request_filter(gpio, line, shared.debounce.window_us())?;
                }
                let engine = DebounceEngine::immediate(line, config, shared.clone());
                (Arc::new(engine), None)
            }
            DebounceStrategy::Timed => {
                let (signal, wakes) = wake_channel();
                let engine = Arc::new(DebounceEngine::timed(
                    line,
                    config,
                    shared.clone(),
                    signal.clone(),
                ));
                let interval = Duration::from_micros(u64::from(shared.debounce.poll_interval_us));
                let worker = DebounceWorker::spawn(engine.clone(), signal, wakes, interval)?;
                (engine, Some(worker))
            }
        };

        // On failure the worker is stopped when it drops
        gpio.attach_irq(line, engine.irq_handler()).map_err(|e| {
            warn!("line {} interrupt attach failed: {:?}", line, e);
            DriverError::HardwareInitFailed
        })?;

        Ok(Self { engine, worker })
    }

    fn request_filter(gpio: &G, line: LineId, window_us: u32) -> Result<(), DriverError> {
        match gpio.set_debounce(line, window_us) {
            Ok(()) => {
                debug!("line {} hardware filter {} us", line, window_us);
                Ok(())
            }
            Err(GpioError::Unsupported) => {
                info!("line {} has no hardware filter, sampling once per edge", line);
                Ok(())
            }
            Err(e) => {
                warn!("line {} hardware filter failed: {:?}", line, e);
                Err(DriverError::HardwareInitFailed)
            }
        }
    }

    pub fn line(&self) -> LineId {
        self.engine.line()
    }

    pub fn engine(&self) -> &DebounceEngine<G, C> {
        &self.engine
    }

    pub fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// Enable edge delivery
    pub fn enable(&self) {
        self.engine.gpio().unmask_irq(self.line());
    }

    /// Disable edge delivery
    pub fn disable(&self) {
        self.engine.gpio().mask_irq(self.line());
    }

    /// Release the line
    ///
    /// Masks the interrupt, stops the worker, detaches the handler and
    /// deactivates the line, in that order.
    pub fn teardown(mut self) {
        let line = self.line();
        let gpio = self.engine.gpio();

        gpio.mask_irq(line);
        if let Some(worker) = self.worker.take() {
            worker.stop();
        }
        gpio.detach_irq(line);
        gpio.deactivate(line);

        debug!("line {} released", line);
    }
}

impl<G, C> Keyed for Button<G, C>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    fn line_id(&self) -> LineId {
        self.line()
    }
}
