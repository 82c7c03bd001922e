//! Immediate re-sample strategy
//!
//! Runs entirely in interrupt context. The caller masks the line, samples
//! it, and hands the level here; any difference from the stored level is a
//! state change. No software timing window is applied.

use super::{ButtonState, StateChange};

/// Decide on one edge given the freshly sampled `level`
///
/// Must be called with the line's interrupt masked.
pub fn on_edge(state: &ButtonState, level: bool) -> Option<StateChange> {
    if state.last_state() == level {
        return None;
    }

    state.set_last_state(level);
    state.set_reported(level);
    Some(StateChange { level })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_is_reported() {
        let state = ButtonState::new(false);

        assert_eq!(on_edge(&state, true), Some(StateChange { level: true }));
        assert!(state.last_state());

        assert_eq!(on_edge(&state, false), Some(StateChange { level: false }));
        assert!(!state.last_state());
    }

    #[test]
    fn test_duplicate_level_suppressed() {
        let state = ButtonState::new(false);

        // Edge interrupt but the line already settled back
        assert_eq!(on_edge(&state, false), None);

        assert!(on_edge(&state, true).is_some());
        assert_eq!(on_edge(&state, true), None);
    }
}
