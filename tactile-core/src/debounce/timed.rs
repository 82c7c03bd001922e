//! Timed confirmation strategy
//!
//! Split across two contexts:
//!
//! - [`on_edge`] runs in interrupt context with the line masked. It records
//!   the new level and its tick, and tells the caller to wake the worker.
//! - [`poll`] runs on the button's worker once per poll interval during a
//!   session. The session ends when the level has held unchanged for longer
//!   than the window.
//!
//! A new edge mid-session moves `last_active` forward, so the window always
//! measures quiet time since the most recent transition. The decision reads
//! `last_state` at decision time, never a snapshot.

use super::tick::{self, Tick};
use super::{ButtonState, StateChange};

/// Outcome of one confirmation poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionStep {
    /// Window still open, poll again after the interval
    Pending,
    /// Level moved under the worker; window restarted
    Restarted,
    /// Level held for the window and differs from what was last reported
    Confirmed(StateChange),
    /// Level held for the window but matches what was last reported
    Settled,
}

impl SessionStep {
    /// Check whether the session is over
    pub fn is_final(&self) -> bool {
        matches!(self, SessionStep::Confirmed(_) | SessionStep::Settled)
    }
}

/// Record an edge; returns true when the worker must be woken
///
/// Must be called with the line's interrupt masked.
pub fn on_edge(state: &ButtonState, level: bool, now: Tick) -> bool {
    if state.last_state() == level {
        return false;
    }

    state.set_last_state(level);
    state.set_last_active(now);
    true
}

/// One poll of a confirmation session
///
/// `level` is the line sampled by the worker, `window` the number of ticks
/// the level must hold.
pub fn poll(state: &ButtonState, level: bool, now: Tick, window: Tick) -> SessionStep {
    if level != state.last_state() {
        state.set_last_state(level);
        state.set_last_active(now);
        return SessionStep::Restarted;
    }

    let start = state.last_active();
    let elapsed = tick::elapsed(start, now);
    if tick::wrapped(start, now) {
        // Re-base so later polls see an ordinary interval
        state.set_last_active(now);
    }

    if elapsed <= window {
        return SessionStep::Pending;
    }

    let level = state.last_state();
    if state.reported() == level {
        return SessionStep::Settled;
    }

    state.set_reported(level);
    SessionStep::Confirmed(StateChange { level })
}
