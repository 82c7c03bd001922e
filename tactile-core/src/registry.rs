//! Button registry
//!
//! Ordered, fixed-capacity collection of tracked buttons keyed by GPIO
//! line. Sizes are a handful of entries, so lookups are linear scans.
//!
//! Mutation only happens during open and close, which the driver already
//! serializes; the registry carries no locking of its own.

use heapless::Vec;

use crate::error::DriverError;
use crate::LineId;

/// Maximum buttons per device
pub const MAX_BUTTONS: usize = 8;

/// Anything tracked by GPIO line
pub trait Keyed {
    /// The line this entry is bound to
    fn line_id(&self) -> LineId;
}

/// Ordered collection of buttons, unique by line
#[derive(Debug)]
pub struct ButtonRegistry<B, const N: usize = MAX_BUTTONS> {
    buttons: Vec<B, N>,
}

impl<B, const N: usize> Default for ButtonRegistry<B, N> {
    fn default() -> Self {
        Self { buttons: Vec::new() }
    }
}

impl<B: Keyed, const N: usize> ButtonRegistry<B, N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { buttons: Vec::new() }
    }

    /// Append a button
    ///
    /// Fails with `DuplicateLine` if its line is already tracked, or
    /// `OutOfMemory` if the registry is full. On failure the button is
    /// handed back so the caller can tear it down.
    pub fn insert(&mut self, button: B) -> Result<(), (DriverError, B)> {
        if self.contains(button.line_id()) {
            return Err((DriverError::DuplicateLine, button));
        }
        self.buttons
            .push(button)
            .map_err(|button| (DriverError::OutOfMemory, button))
    }

    /// Look up a button by line
    pub fn find(&self, line: LineId) -> Option<&B> {
        self.buttons.iter().find(|b| b.line_id() == line)
    }

    /// Check if a line is tracked
    pub fn contains(&self, line: LineId) -> bool {
        self.find(line).is_some()
    }

    /// Remove a button and hand back ownership, preserving order
    pub fn remove(&mut self, line: LineId) -> Result<B, DriverError> {
        let index = self
            .buttons
            .iter()
            .position(|b| b.line_id() == line)
            .ok_or(DriverError::NotFound)?;
        Ok(self.buttons.remove(index))
    }

    /// Take every button out, leaving the registry empty
    ///
    /// Teardown works on the returned snapshot so nothing is removed from
    /// the collection while it is being walked.
    pub fn drain(&mut self) -> Vec<B, N> {
        core::mem::take(&mut self.buttons)
    }

    /// Apply `f` to every button in insertion order
    pub fn for_each(&self, f: impl FnMut(&B)) {
        self.buttons.iter().for_each(f);
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &B> {
        self.buttons.iter()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Entry {
        line: LineId,
        keycode: u8,
    }

    impl Keyed for Entry {
        fn line_id(&self) -> LineId {
            self.line
        }
    }

    fn entry(line: LineId, keycode: u8) -> Entry {
        Entry { line, keycode }
    }

    #[test]
    fn test_insert_and_find() {
        let mut registry: ButtonRegistry<Entry, 4> = ButtonRegistry::new();
        registry.insert(entry(0, 0x4B)).unwrap();
        registry.insert(entry(9, 0x4E)).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find(9).map(|e| e.keycode), Some(0x4E));
        assert!(registry.find(3).is_none());
    }

    #[test]
    fn test_duplicate_line_rejected() {
        let mut registry: ButtonRegistry<Entry, 4> = ButtonRegistry::new();
        registry.insert(entry(0, 0x4B)).unwrap();

        let (err, rejected) = registry.insert(entry(0, 0x04)).unwrap_err();
        assert_eq!(err, DriverError::DuplicateLine);
        assert_eq!(rejected.keycode, 0x04);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_full_registry() {
        let mut registry: ButtonRegistry<Entry, 1> = ButtonRegistry::new();
        registry.insert(entry(0, 0x4B)).unwrap();

        let (err, _) = registry.insert(entry(1, 0x4E)).unwrap_err();
        assert_eq!(err, DriverError::OutOfMemory);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut registry: ButtonRegistry<Entry, 4> = ButtonRegistry::new();
        registry.insert(entry(1, 1)).unwrap();
        registry.insert(entry(2, 2)).unwrap();
        registry.insert(entry(3, 3)).unwrap();

        assert_eq!(registry.remove(2).unwrap().keycode, 2);
        assert_eq!(registry.remove(2), Err(DriverError::NotFound));

        let lines: Vec<LineId, 4> = registry.iter().map(|e| e.line).collect();
        assert_eq!(lines.as_slice(), &[1u16, 3]);
    }

    #[test]
    fn test_drain_empties_registry() {
        let mut registry: ButtonRegistry<Entry, 4> = ButtonRegistry::new();
        registry.insert(entry(0, 0x4B)).unwrap();
        registry.insert(entry(9, 0x4E)).unwrap();

        let drained = registry.drain();
        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty());

        // Lines can be reused after teardown
        registry.insert(entry(0, 0x4B)).unwrap();
    }

    #[test]
    fn test_for_each_visits_all() {
        let mut registry: ButtonRegistry<Entry, 4> = ButtonRegistry::new();
        registry.insert(entry(0, 1)).unwrap();
        registry.insert(entry(9, 2)).unwrap();

        let mut sum = 0u32;
        registry.for_each(|e| sum += e.keycode as u32);
        assert_eq!(sum, 3);
    }
}
