//! Monotonic tick source
//!
//! The system tick is a free-running `u32` counter that wraps. Consumers
//! must compute intervals with wrapping arithmetic.

/// Monotonic system tick counter
pub trait TickClock: Send + Sync {
    /// Current tick count
    fn now(&self) -> u32;

    /// Length of one tick in milliseconds
    fn tick_ms(&self) -> u32 {
        10
    }
}
