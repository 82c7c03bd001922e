//! Button debounce logic
//!
//! Turns raw edge notifications into validated state changes. Two
//! strategies share one per-button [`ButtonState`]:
//!
//! - [`immediate`]: re-sample once in interrupt context and report any
//!   difference straight away. Relies on an upstream glitch filter.
//! - [`timed`]: interrupt context records the edge and wakes a worker,
//!   which confirms the level only after it has held for a full window.
//!
//! Both halves of the timed strategy touch the same fields from different
//! contexts. Interrupt-context writes happen with the line masked; the
//! worker always decides on the freshest stored value.

pub mod immediate;
pub mod tick;
pub mod timed;

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use tick::{Tick, MAX_TICK};
pub use timed::SessionStep;

/// Default debounce window in ticks (250 ms at 10 ms per tick)
pub const DEBOUNCE_WINDOW_TICKS: Tick = 25;

/// Default tick length in milliseconds
pub const TICK_MS: u32 = 10;

/// Default interval between confirmation polls in microseconds
pub const POLL_INTERVAL_US: u32 = 1000;

/// A validated level change on one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateChange {
    /// New settled level (true = pressed)
    pub level: bool,
}

/// Debounce strategy selected per board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DebounceStrategy {
    /// Re-sample once per edge in interrupt context
    Immediate,
    /// Confirm each edge on a per-button worker after a quiet window
    #[default]
    Timed,
}

/// Debounce timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DebounceConfig {
    /// Ticks a level must hold before it is reported
    pub window_ticks: Tick,
    /// Tick length in milliseconds
    pub tick_ms: u32,
    /// Worker sleep between polls within a session (µs)
    pub poll_interval_us: u32,
    /// Ask the GPIO controller for its glitch filter (immediate strategy)
    pub hardware_filter: bool,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window_ticks: DEBOUNCE_WINDOW_TICKS,
            tick_ms: TICK_MS,
            poll_interval_us: POLL_INTERVAL_US,
            hardware_filter: false,
        }
    }
}

impl DebounceConfig {
    /// Window length in milliseconds
    pub const fn window_ms(&self) -> u32 {
        self.window_ticks.saturating_mul(self.tick_ms)
    }

    /// Window length in microseconds
    pub const fn window_us(&self) -> u32 {
        self.window_ms().saturating_mul(1000)
    }

    /// The same window counted in ticks of `tick_ms` milliseconds
    ///
    /// Rounds up, so a clock with longer ticks never shortens the window.
    pub const fn for_tick(&self, tick_ms: u32) -> Self {
        if tick_ms == 0 || tick_ms == self.tick_ms {
            return *self;
        }
        Self {
            window_ticks: tick::ms_to_ticks(self.window_ms(), tick_ms),
            tick_ms,
            ..*self
        }
    }
}

/// Per-button debounce state shared between interrupt and worker context
#[derive(Debug, Default)]
pub struct ButtonState {
    /// Last observed logical level
    last_state: AtomicBool,
    /// Tick of the last observed transition
    last_active: AtomicU32,
    /// Last level delivered to the consumer
    reported: AtomicBool,
}

impl ButtonState {
    /// Fresh state for a button resting at `level`
    pub const fn new(level: bool) -> Self {
        Self {
            last_state: AtomicBool::new(level),
            last_active: AtomicU32::new(0),
            reported: AtomicBool::new(level),
        }
    }

    pub fn last_state(&self) -> bool {
        self.last_state.load(Ordering::Acquire)
    }

    pub fn set_last_state(&self, level: bool) {
        self.last_state.store(level, Ordering::Release);
    }

    pub fn last_active(&self) -> Tick {
        self.last_active.load(Ordering::Acquire)
    }

    pub fn set_last_active(&self, tick: Tick) {
        self.last_active.store(tick, Ordering::Release);
    }

    pub fn reported(&self) -> bool {
        self.reported.load(Ordering::Acquire)
    }

    pub fn set_reported(&self, level: bool) {
        self.reported.store(level, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DebounceConfig::default();
        assert_eq!(config.window_ticks, 25);
        assert_eq!(config.window_us(), 250_000);
        assert_eq!(config.poll_interval_us, 1000);
        assert_eq!(DebounceStrategy::default(), DebounceStrategy::Timed);
    }

    #[test]
    fn test_window_follows_clock_tick() {
        let config = DebounceConfig::default();
        assert_eq!(config.for_tick(10), config);

        let fine = config.for_tick(1);
        assert_eq!(fine.window_ticks, 250);
        assert_eq!(fine.window_us(), 250_000);

        // 250 ms in 20 ms ticks rounds up to 13
        assert_eq!(config.for_tick(20).window_ticks, 13);
        assert_eq!(config.for_tick(0), config);
    }

    #[test]
    fn test_fresh_state() {
        let state = ButtonState::new(false);
        assert!(!state.last_state());
        assert!(!state.reported());
        assert_eq!(state.last_active(), 0);
    }
}
