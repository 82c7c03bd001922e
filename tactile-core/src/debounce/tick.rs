//! System tick arithmetic
//!
//! The tick counter is a free-running `u32` that wraps to zero. All
//! interval math goes through [`elapsed`] so a wrap between two samples
//! yields the small positive interval, never a huge one.

/// System tick count
pub type Tick = u32;

/// Largest tick value before the counter wraps
pub const MAX_TICK: Tick = Tick::MAX;

/// Ticks elapsed from `start` to `now`
///
/// `now < start` means the counter wrapped once in between.
pub const fn elapsed(start: Tick, now: Tick) -> Tick {
    if now < start {
        now + (MAX_TICK - start) + 1
    } else {
        now - start
    }
}

/// Check whether the counter wrapped between `start` and `now`
pub const fn wrapped(start: Tick, now: Tick) -> bool {
    now < start
}

/// Convert milliseconds to whole ticks, rounding up
pub const fn ms_to_ticks(ms: u32, tick_ms: u32) -> Tick {
    if tick_ms == 0 {
        return ms;
    }
    ms.div_ceil(tick_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_elapsed_no_wrap() {
        assert_eq!(elapsed(100, 125), 25);
        assert_eq!(elapsed(7, 7), 0);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        // MAX-5 .. MAX is 5 ticks, MAX -> 0 is 1, 0 .. 10 is 10
        assert_eq!(elapsed(MAX_TICK - 5, 10), 16);
        assert_eq!(elapsed(MAX_TICK, 0), 1);
        assert!(wrapped(MAX_TICK - 5, 10));
        assert!(!wrapped(10, MAX_TICK - 5));
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(250, 10), 25);
        assert_eq!(ms_to_ticks(251, 10), 26);
        assert_eq!(ms_to_ticks(5, 0), 5);
    }

    proptest! {
        #[test]
        fn prop_elapsed_is_modular(start: u32, now: u32) {
            prop_assert_eq!(elapsed(start, now), now.wrapping_sub(start));
        }

        #[test]
        fn prop_elapsed_inverts_add(start: u32, delta: u32) {
            prop_assert_eq!(elapsed(start, start.wrapping_add(delta)), delta);
        }
    }
}
