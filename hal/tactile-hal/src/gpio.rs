//! GPIO line abstractions
//!
//! Provides a line-oriented interface to an interrupt-capable GPIO
//! controller. Every method takes `&self`: implementations front
//! memory-mapped registers and are called from both thread context and
//! interrupt context.

use alloc::sync::Arc;

/// Identifier of a single GPIO line
pub type LineId = u16;

/// Interrupt handler bound to a line
///
/// Receives the id of the line that fired. Any context the handler needs
/// is captured by the closure when it is attached.
pub type IrqHandler = Arc<dyn Fn(LineId) + Send + Sync>;

/// Interrupt trigger configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Triggering {
    /// Fire on low-to-high transitions
    RisingEdge,
    /// Fire on high-to-low transitions
    FallingEdge,
    /// Fire on every transition
    BothEdges,
}

impl Triggering {
    /// Check whether a transition to `level` should fire
    pub fn fires_on(&self, level: bool) -> bool {
        match self {
            Triggering::RisingEdge => level,
            Triggering::FallingEdge => !level,
            Triggering::BothEdges => true,
        }
    }
}

/// Errors reported by a GPIO controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Line id out of range for this controller
    InvalidLine,
    /// Line could not be claimed or powered
    ActivationFailed,
    /// Feature not provided by this controller
    Unsupported,
}

/// Interrupt-capable GPIO controller
///
/// Implementations must tolerate redundant calls: masking an already
/// masked line or deactivating an inactive one is a no-op.
pub trait GpioController: Send + Sync {
    /// Number of lines exposed by the controller
    fn line_count(&self) -> usize;

    /// Claim and power a line
    fn activate(&self, line: LineId) -> Result<(), GpioError>;

    /// Release a line
    fn deactivate(&self, line: LineId);

    /// Configure the line as an input
    fn direction_in(&self, line: LineId);

    /// Read the current line level (true = high)
    fn get_value(&self, line: LineId) -> bool;

    /// Stop delivering interrupts for the line
    fn mask_irq(&self, line: LineId);

    /// Resume delivering interrupts for the line
    fn unmask_irq(&self, line: LineId);

    /// Select which transitions raise an interrupt
    fn set_triggering(&self, line: LineId, triggering: Triggering) -> Result<(), GpioError>;

    /// Bind a handler to the line, replacing any previous one
    fn attach_irq(&self, line: LineId, handler: IrqHandler) -> Result<(), GpioError>;

    /// Drop the handler bound to the line
    fn detach_irq(&self, line: LineId);

    /// Enable the controller's glitch filter for the line
    ///
    /// `window_us` is the minimum time a level must hold before it is
    /// passed on. Controllers without a filter keep the default.
    fn set_debounce(&self, line: LineId, window_us: u32) -> Result<(), GpioError> {
        let _ = (line, window_us);
        Err(GpioError::Unsupported)
    }
}
