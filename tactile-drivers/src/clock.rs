//! Hosted tick source

use std::time::Instant;

use tactile_core::debounce::TICK_MS;
use tactile_hal::TickClock;

/// Tick counter derived from the monotonic system clock
///
/// Counts whole ticks since construction plus a starting offset, and wraps
/// at `u32::MAX` like a hardware tick counter.
#[derive(Debug, Clone, Copy)]
pub struct SystemTicks {
    epoch: Instant,
    offset: u32,
    tick_ms: u32,
}

impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTicks {
    /// Start counting from zero at the default tick length
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Start counting from `tick`
    pub fn starting_at(tick: u32) -> Self {
        Self {
            epoch: Instant::now(),
            offset: tick,
            tick_ms: TICK_MS,
        }
    }

    /// Use a different tick length
    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms.max(1);
        self
    }
}

impl TickClock for SystemTicks {
    fn now(&self) -> u32 {
        let ticks = self.epoch.elapsed().as_millis() / u128::from(self.tick_ms);
        // Truncation is the wrap
        self.offset.wrapping_add(ticks as u32)
    }

    fn tick_ms(&self) -> u32 {
        self.tick_ms
    }
}
