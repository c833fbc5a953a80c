use std::cell::RefCell;
use std::collections::HashMap;

use super::backend::StorageBackend;
use crate::error::{NotesError, Result};
use crate::store::RecordKind;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is
/// single-threaded. This avoids the overhead of `RwLock` while still
/// allowing the `StorageBackend` trait to use `&self` for all methods.
pub struct MemBackend {
    slots: RefCell<HashMap<(RecordKind, usize), String>>,
    masks: RefCell<HashMap<RecordKind, u32>>,
    settings: RefCell<Option<String>>,
    simulate_write_error: RefCell<bool>,
    // One-shot fuse: Some(n) lets n more writes through, fails the next.
    writes_until_failure: RefCell<Option<usize>>,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
            masks: RefCell::new(HashMap::new()),
            settings: RefCell::new(None),
            simulate_write_error: RefCell::new(false),
            writes_until_failure: RefCell::new(None),
        }
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Let `n` more writes succeed, then fail exactly one. Used to model
    /// a crash between the payload write and the mask write.
    pub fn fail_after_writes(&self, n: usize) {
        *self.writes_until_failure.borrow_mut() = Some(n);
    }

    fn check_write(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(NotesError::Store("Simulated write error".to_string()));
        }
        let mut fuse = self.writes_until_failure.borrow_mut();
        match *fuse {
            Some(0) => {
                *fuse = None;
                Err(NotesError::Store("Simulated write failure".to_string()))
            }
            Some(n) => {
                *fuse = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl StorageBackend for MemBackend {
    fn read_slot(&self, kind: RecordKind, slot: usize) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(&(kind, slot)).cloned())
    }

    fn write_slot(&self, kind: RecordKind, slot: usize, payload: &str) -> Result<()> {
        self.check_write()?;
        self.slots
            .borrow_mut()
            .insert((kind, slot), payload.to_string());
        Ok(())
    }

    fn read_mask(&self, kind: RecordKind) -> Result<u32> {
        Ok(self.masks.borrow().get(&kind).copied().unwrap_or(0))
    }

    fn write_mask(&self, kind: RecordKind, mask: u32) -> Result<()> {
        self.check_write()?;
        self.masks.borrow_mut().insert(kind, mask);
        Ok(())
    }

    fn read_settings(&self) -> Result<Option<String>> {
        Ok(self.settings.borrow().clone())
    }

    fn write_settings(&self, payload: &str) -> Result<()> {
        self.check_write()?;
        *self.settings.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_fields_read_as_empty() {
        let backend = MemBackend::new();
        assert!(backend.read_slot(RecordKind::Note, 0).unwrap().is_none());
        assert_eq!(backend.read_mask(RecordKind::Note).unwrap(), 0);
        assert!(backend.read_settings().unwrap().is_none());
    }

    #[test]
    fn test_slot_and_mask_roundtrip() {
        let backend = MemBackend::new();
        backend.write_slot(RecordKind::Contact, 3, "payload").unwrap();
        backend.write_mask(RecordKind::Contact, 0b1000).unwrap();

        assert_eq!(
            backend.read_slot(RecordKind::Contact, 3).unwrap().as_deref(),
            Some("payload")
        );
        assert_eq!(backend.read_mask(RecordKind::Contact).unwrap(), 0b1000);
        // Other kind untouched.
        assert_eq!(backend.read_mask(RecordKind::Note).unwrap(), 0);
    }

    #[test]
    fn test_simulated_write_error_blocks_all_writes() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        assert!(backend.write_slot(RecordKind::Note, 0, "x").is_err());
        assert!(backend.write_mask(RecordKind::Note, 1).is_err());
        assert!(backend.write_settings("{}").is_err());

        backend.set_simulate_write_error(false);
        assert!(backend.write_slot(RecordKind::Note, 0, "x").is_ok());
    }

    #[test]
    fn test_fail_after_writes_is_one_shot() {
        let backend = MemBackend::new();
        backend.fail_after_writes(1);
        assert!(backend.write_mask(RecordKind::Note, 1).is_ok());
        assert!(backend.write_mask(RecordKind::Note, 2).is_err());
        // Fuse is spent, writes work again.
        assert!(backend.write_mask(RecordKind::Note, 3).is_ok());
        assert_eq!(backend.read_mask(RecordKind::Note).unwrap(), 3);
    }
}
