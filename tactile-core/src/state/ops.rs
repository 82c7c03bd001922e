//! Lifecycle operations requested by the host framework

/// Operations that can change the driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Framework bound the driver to a device
    Probe,
    /// Consumer started using the device
    Open,
    /// Enable button interrupts
    PowerOn,
    /// Disable button interrupts
    PowerOff,
    /// Consumer finished with the device
    Close,
    /// Framework unbinding the driver
    Remove,
}
