//! Button HID driver
//!
//! Lifecycle and HID queries for one button device. State changes happen
//! under the driver lock, so lifecycle changes never interleave. Lines are
//! released after the lock is dropped: joining a worker that is inside the
//! subscriber must not block that subscriber calling back into the driver.
//! A later open waits until the release has finished. Interrupt handlers
//! and workers never take the lock themselves.
//!
//! ```text
//! Uninitialized --probe--> Probed --open--> Open --power_on--> PoweredOn
//!       ^                    |  ^             |  <--power_off--     |
//!       +-------remove-------+  +----close----+--------close--------+
//! ```

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};

use tactile_core::config::{ButtonConfig, DriverConfig};
use tactile_core::hid::{HidDescriptor, HidInputReport, ReportTable, ReportType, REPORT_DESCRIPTOR};
use tactile_core::registry::{ButtonRegistry, MAX_BUTTONS};
use tactile_core::state::{DriverState, Operation};
use tactile_core::traits::{DeviceDriver, DeviceKind, DriverInfo, HidDevice};
use tactile_core::DriverError;
use tactile_hal::{GpioController, LineId, ResourceTable, TickClock};

use crate::button::Button;
use crate::engine::Shared;
use crate::reporter::{EventCallback, EventReporter};

/// Registration record for the button driver
pub const DRIVER_INFO: DriverInfo = DriverInfo {
    kind: DeviceKind::HidHw,
    name: "hid_button",
    description: "Button HID Driver",
};

/// State that exists from probe until remove
struct Private<G, C>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    registry: ButtonRegistry<Button<G, C>>,
    reporter: Arc<EventReporter>,
    reports: ReportTable<'static>,
}

impl<G, C> Private<G, C>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    fn new() -> Self {
        Self {
            registry: ButtonRegistry::new(),
            reporter: Arc::new(EventReporter::new()),
            reports: ReportTable::default(),
        }
    }

    /// Release every tracked line
    fn release_all(&mut self) {
        for button in self.registry.drain() {
            button.teardown();
        }
    }
}

/// Buttons taken out of the registry, waiting to be released
type Released<G, C> = heapless::Vec<Button<G, C>, MAX_BUTTONS>;

struct Inner<G, C>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    state: DriverState,
    private: Option<Private<G, C>>,
    /// Lines taken out by close or remove are still being released
    releasing: bool,
}

impl<G, C> Inner<G, C>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    fn private(&self) -> Result<&Private<G, C>, DriverError> {
        self.private.as_ref().ok_or(DriverError::InvalidArgument)
    }

    fn private_mut(&mut self) -> Result<&mut Private<G, C>, DriverError> {
        self.private.as_mut().ok_or(DriverError::InvalidArgument)
    }

    /// Power off if needed, drop the subscriber and take every button out
    ///
    /// The caller releases the returned buttons once the lock is dropped.
    fn shut_down(&mut self) -> Released<G, C> {
        let powered = self.state.is_powered();
        let Some(private) = self.private.as_mut() else {
            return Released::new();
        };

        if powered {
            private.registry.for_each(Button::disable);
        }
        private.reporter.unregister();
        self.state = DriverState::Probed;
        self.releasing = true;
        private.registry.drain()
    }
}

fn release_all<G, C>(buttons: Released<G, C>)
where
    G: GpioController + 'static,
    C: TickClock + 'static,
{
    for button in buttons {
        button.teardown();
    }
}

/// Debounced GPIO buttons reported as HID keyboard input
pub struct ButtonDriver<G, C, R>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
    R: ResourceTable,
{
    gpio: Arc<G>,
    clock: Arc<C>,
    resources: R,
    config: DriverConfig,
    inner: Mutex<Inner<G, C>>,
    released: Condvar,
}

impl<G, C, R> ButtonDriver<G, C, R>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
    R: ResourceTable,
{
    pub fn new(gpio: Arc<G>, clock: Arc<C>, resources: R, config: DriverConfig) -> Self {
        Self {
            gpio,
            clock,
            resources,
            config,
            inner: Mutex::new(Inner {
                state: DriverState::Uninitialized,
                private: None,
                releasing: false,
            }),
            released: Condvar::new(),
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.lock().state
    }

    /// Number of buttons currently tracked
    pub fn button_count(&self) -> usize {
        self.lock()
            .private
            .as_ref()
            .map_or(0, |private| private.registry.len())
    }

    /// Check if a line is tracked
    pub fn is_tracking(&self, line: LineId) -> bool {
        self.lock()
            .private
            .as_ref()
            .is_some_and(|private| private.registry.contains(line))
    }

    // Callers never panic while holding the lock, but a panicking
    // subscriber on another thread must not wedge the device
    fn lock(&self) -> MutexGuard<'_, Inner<G, C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock once no close or remove is still releasing lines
    fn lock_idle(&self) -> MutexGuard<'_, Inner<G, C>> {
        self.released
            .wait_while(self.lock(), |inner| inner.releasing)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Release buttons taken out by `shut_down`, outside the lock
    fn release(&self, buttons: Released<G, C>) {
        release_all(buttons);
        self.lock().releasing = false;
        self.released.notify_all();
    }

    fn shared(&self, reporter: &Arc<EventReporter>) -> Shared<G, C> {
        let tick_ms = self.clock.tick_ms();
        let debounce = self.config.debounce.for_tick(tick_ms);
        if debounce.window_ticks != self.config.debounce.window_ticks {
            info!(
                "clock ticks every {} ms, debounce window is {} ticks",
                tick_ms, debounce.window_ticks
            );
        }

        Shared {
            gpio: self.gpio.clone(),
            clock: self.clock.clone(),
            reporter: reporter.clone(),
            modifier: self.config.modifier,
            strategy: self.config.strategy,
            debounce,
        }
    }

    /// Bring up every configured button
    ///
    /// All or nothing: on the first failure every button already brought
    /// up is released again.
    fn open_buttons(&self, private: &mut Private<G, C>) -> Result<(), DriverError> {
        let shared = self.shared(&private.reporter);

        for (index, config) in self.config.buttons.iter().enumerate() {
            if let Err(e) = self.open_button(private, &shared, config) {
                error!("button {} init failed: {}", index, e);
                private.release_all();
                return Err(e);
            }
        }
        Ok(())
    }

    fn open_button(
        &self,
        private: &mut Private<G, C>,
        shared: &Shared<G, C>,
        config: &ButtonConfig,
    ) -> Result<(), DriverError> {
        let index = usize::from(config.resource_index);
        let line = self.resources.gpio_line(index).ok_or_else(|| {
            warn!("no gpio resource at index {}", index);
            DriverError::HardwareInitFailed
        })?;

        if usize::from(line) >= self.gpio.line_count() {
            warn!("line {} out of range", line);
            return Err(DriverError::HardwareInitFailed);
        }
        if private.registry.contains(line) {
            warn!("line {} already tracked", line);
            return Err(DriverError::DuplicateLine);
        }

        let button = Button::open(line, *config, shared)?;
        private.registry.insert(button).map_err(|(e, button)| {
            button.teardown();
            e
        })
    }
}

impl<G, C, R> Drop for ButtonDriver<G, C, R>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
    R: ResourceTable,
{
    fn drop(&mut self) {
        let inner = self
            .inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if inner.state.is_open() {
            release_all(inner.shut_down());
        }
    }
}

impl<G, C, R> DeviceDriver for ButtonDriver<G, C, R>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
    R: ResourceTable,
{
    fn probe(&self) -> Result<(), DriverError> {
        let mut inner = self.lock();
        let next = inner.state.transition(Operation::Probe)?;

        inner.private = Some(Private::new());
        inner.state = next;
        info!("{} probed", DRIVER_INFO.name);
        Ok(())
    }

    fn remove(&self) -> Result<(), DriverError> {
        let buttons = {
            let mut inner = self.lock();
            let next = inner.state.transition(Operation::Remove)?;

            let buttons = if inner.state.is_open() {
                Some(inner.shut_down())
            } else {
                None
            };
            inner.private = None;
            inner.state = next;
            buttons
        };

        if let Some(buttons) = buttons {
            self.release(buttons);
        }
        info!("{} removed", DRIVER_INFO.name);
        Ok(())
    }

    fn open(&self) -> Result<(), DriverError> {
        let mut guard = self.lock_idle();
        let inner = &mut *guard;
        let next = inner.state.transition(Operation::Open)?;

        if let Err(e) = self.config.validate() {
            error!("invalid configuration: {:?}", e);
            return Err(DriverError::InvalidArgument);
        }

        let private = inner.private_mut()?;
        private.reporter.unregister();
        self.open_buttons(private)?;

        info!(
            "{} open, {} buttons ({:?})",
            DRIVER_INFO.name,
            private.registry.len(),
            self.config.strategy
        );
        inner.state = next;
        Ok(())
    }

    fn close(&self) -> Result<(), DriverError> {
        let buttons = {
            let mut inner = self.lock();
            let next = inner.state.transition(Operation::Close)?;

            let buttons = inner.shut_down();
            inner.state = next;
            buttons
        };

        self.release(buttons);
        info!("{} closed", DRIVER_INFO.name);
        Ok(())
    }
}

impl<G, C, R> HidDevice for ButtonDriver<G, C, R>
where
    G: GpioController + 'static,
    C: TickClock + 'static,
    R: ResourceTable,
{
    type Callback = EventCallback;

    fn power_on(&self) -> Result<(), DriverError> {
        let mut inner = self.lock();
        let next = inner.state.transition(Operation::PowerOn)?;

        inner.private()?.registry.for_each(Button::enable);
        inner.state = next;
        debug!("{} powered on", DRIVER_INFO.name);
        Ok(())
    }

    fn power_off(&self) -> Result<(), DriverError> {
        let mut inner = self.lock();
        let next = inner.state.transition(Operation::PowerOff)?;

        if inner.state.is_powered() {
            inner.private()?.registry.for_each(Button::disable);
            debug!("{} powered off", DRIVER_INFO.name);
        }
        inner.state = next;
        Ok(())
    }

    fn get_descriptor(&self) -> Result<HidDescriptor, DriverError> {
        self.lock().state.require_open()?;
        Ok(self.config.descriptor)
    }

    fn get_report_descriptor(&self, buf: &mut [u8]) -> Result<usize, DriverError> {
        self.lock().state.require_open()?;

        let dst = buf
            .get_mut(..REPORT_DESCRIPTOR.len())
            .ok_or(DriverError::BufferTooSmall)?;
        dst.copy_from_slice(&REPORT_DESCRIPTOR);
        Ok(REPORT_DESCRIPTOR.len())
    }

    fn get_report_length(
        &self,
        report_type: ReportType,
        report_id: u8,
    ) -> Result<u16, DriverError> {
        let inner = self.lock();
        Ok(inner.private()?.reports.report_length(report_type, report_id))
    }

    fn get_maximum_report_length(&self, report_type: ReportType) -> Result<u16, DriverError> {
        let inner = self.lock();
        Ok(inner.private()?.reports.max_report_length(report_type))
    }

    /// Synchronous input report: the modifier byte with no key held
    fn get_report(
        &self,
        report_type: ReportType,
        report_id: u8,
        buf: &mut [u8],
    ) -> Result<usize, DriverError> {
        let inner = self.lock();
        inner.state.require_open()?;

        if report_type != ReportType::Input {
            return Err(DriverError::UnsupportedReportType);
        }
        inner.private()?.reports.check_input(report_id)?;

        HidInputReport::new(self.config.modifier, 0).write_to(buf)
    }

    fn register_callback(&self, callback: EventCallback) -> Result<(), DriverError> {
        let inner = self.lock();
        inner.state.require_open()?;

        inner.private()?.reporter.register(callback);
        debug!("{} subscriber registered", DRIVER_INFO.name);
        Ok(())
    }

    fn unregister_callback(&self) -> Result<(), DriverError> {
        let inner = self.lock();
        inner.state.require_open()?;

        inner.private()?.reporter.unregister();
        debug!("{} subscriber removed", DRIVER_INFO.name);
        Ok(())
    }
}
