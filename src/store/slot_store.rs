//! Slot allocation and record encoding over a [`StorageBackend`].

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::backend::StorageBackend;
use crate::config::StoreLimits;
use crate::error::{NotesError, Result};
use crate::model::{ContactRecord, NoteRecord, Settings};
use crate::store::RecordKind;

/// Fixed-capacity record store: one slot array plus one occupancy mask
/// per [`RecordKind`], and a single settings record.
///
/// Allocation scans the mask for the first clear bit, writes the payload,
/// then sets the bit. Deletion only clears the bit; the payload stays
/// behind as a tombstone and is overwritten on the next allocation of
/// that slot.
pub struct SlotStore<B: StorageBackend> {
    backend: B,
    limits: StoreLimits,
}

/// Slots per record kind are addressed by one `u32` occupancy mask.
pub const MAX_SLOTS: usize = 32;

impl<B: StorageBackend> SlotStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self::with_limits(backend, StoreLimits::default())
    }

    /// Panics if either per-kind capacity exceeds [`MAX_SLOTS`]: the
    /// occupancy mask is a single 32-bit word, so larger capacities are
    /// a configuration error, not a runtime condition.
    pub fn with_limits(backend: B, limits: StoreLimits) -> Self {
        assert!(
            limits.max_notes <= MAX_SLOTS && limits.max_contacts <= MAX_SLOTS,
            "slot capacity is limited to {MAX_SLOTS} by the occupancy mask"
        );
        Self { backend, limits }
    }

    pub fn limits(&self) -> &StoreLimits {
        &self.limits
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Notes ---

    /// Stores a new note in the first free slot, returning the slot index.
    pub fn add_note(&mut self, note: &NoteRecord) -> Result<usize> {
        note.validate(&self.limits)?;
        self.add_record(RecordKind::Note, note)
    }

    /// Reads the live note at `slot`.
    pub fn note(&self, slot: usize) -> Result<NoteRecord> {
        self.read_record(RecordKind::Note, slot)
    }

    /// Overwrites the live note at `slot` in place. The slot keeps its
    /// index, so references held by the caller stay valid.
    pub fn modify_note(&mut self, slot: usize, note: &NoteRecord) -> Result<()> {
        note.validate(&self.limits)?;
        self.modify_record(RecordKind::Note, slot, note)
    }

    /// Deletes the note at `slot` by clearing its mask bit.
    pub fn delete_note(&mut self, slot: usize) -> Result<()> {
        self.delete_record(RecordKind::Note, slot)
    }

    /// All live notes in ascending slot order, paired with their slots.
    pub fn notes(&self) -> Result<Vec<(usize, NoteRecord)>> {
        self.all_records(RecordKind::Note)
    }

    // --- Contacts ---

    pub fn add_contact(&mut self, contact: &ContactRecord) -> Result<usize> {
        contact.validate(&self.limits)?;
        self.add_record(RecordKind::Contact, contact)
    }

    pub fn contact(&self, slot: usize) -> Result<ContactRecord> {
        self.read_record(RecordKind::Contact, slot)
    }

    pub fn modify_contact(&mut self, slot: usize, contact: &ContactRecord) -> Result<()> {
        contact.validate(&self.limits)?;
        self.modify_record(RecordKind::Contact, slot, contact)
    }

    pub fn delete_contact(&mut self, slot: usize) -> Result<()> {
        self.delete_record(RecordKind::Contact, slot)
    }

    pub fn contacts(&self) -> Result<Vec<(usize, ContactRecord)>> {
        self.all_records(RecordKind::Contact)
    }

    // --- Occupancy ---

    /// Number of live records of a kind.
    pub fn count(&self, kind: RecordKind) -> Result<usize> {
        Ok(self.backend.read_mask(kind)?.count_ones() as usize)
    }

    pub fn is_full(&self, kind: RecordKind) -> Result<bool> {
        Ok(self.count(kind)? >= self.limits.capacity(kind))
    }

    /// Whether `slot` holds a live record.
    pub fn is_used(&self, kind: RecordKind, slot: usize) -> Result<bool> {
        let mask = self.backend.read_mask(kind)?;
        Ok(slot < self.limits.capacity(kind) && mask & (1 << slot) != 0)
    }

    // --- Settings ---

    /// The persisted settings, or defaults (unlocked, no passcode) when
    /// none were ever written.
    pub fn settings(&self) -> Result<Settings> {
        match self.backend.read_settings()? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(Settings::default()),
        }
    }

    pub fn set_settings(&mut self, settings: &Settings) -> Result<()> {
        let payload = serde_json::to_string(settings)?;
        self.backend.write_settings(&payload)
    }

    // --- Generic slot plumbing ---

    fn add_record<T: Serialize>(&mut self, kind: RecordKind, record: &T) -> Result<usize> {
        let mask = self.backend.read_mask(kind)?;
        let capacity = self.limits.capacity(kind);
        let slot = (0..capacity)
            .find(|s| mask & (1 << s) == 0)
            .ok_or(NotesError::StoreFull(kind))?;

        // Payload first, bit second: a crash in between leaves the slot
        // free and the half-written payload unreachable.
        let payload = serde_json::to_string(record)?;
        self.backend.write_slot(kind, slot, &payload)?;
        self.backend.write_mask(kind, mask | (1 << slot))?;
        debug!("allocated {kind} slot {slot}");
        Ok(slot)
    }

    fn read_record<T: DeserializeOwned>(&self, kind: RecordKind, slot: usize) -> Result<T> {
        self.check_used(kind, slot)?;
        let payload = self
            .backend
            .read_slot(kind, slot)?
            .ok_or(NotesError::SlotNotFound(kind, slot))?;
        Ok(serde_json::from_str(&payload)?)
    }

    fn modify_record<T: Serialize>(&mut self, kind: RecordKind, slot: usize, record: &T) -> Result<()> {
        self.check_used(kind, slot)?;
        let payload = serde_json::to_string(record)?;
        self.backend.write_slot(kind, slot, &payload)
    }

    fn delete_record(&mut self, kind: RecordKind, slot: usize) -> Result<()> {
        let mask = self.backend.read_mask(kind)?;
        if slot >= self.limits.capacity(kind) || mask & (1 << slot) == 0 {
            return Err(NotesError::SlotNotFound(kind, slot));
        }
        // Tombstone: only the bit is cleared, the payload stays.
        self.backend.write_mask(kind, mask & !(1 << slot))?;
        debug!("freed {kind} slot {slot}");
        Ok(())
    }

    fn all_records<T: DeserializeOwned>(&self, kind: RecordKind) -> Result<Vec<(usize, T)>> {
        let mask = self.backend.read_mask(kind)?;
        let mut records = Vec::new();
        for slot in 0..self.limits.capacity(kind) {
            if mask & (1 << slot) != 0 {
                records.push((slot, self.read_record(kind, slot)?));
            }
        }
        Ok(records)
    }

    fn check_used(&self, kind: RecordKind, slot: usize) -> Result<()> {
        if !self.is_used(kind, slot)? {
            return Err(NotesError::SlotNotFound(kind, slot));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn store() -> SlotStore<MemBackend> {
        SlotStore::with_backend(MemBackend::new())
    }

    fn note(n: usize) -> NoteRecord {
        NoteRecord::new(format!("Note {n}"), format!("Body {n}"))
    }

    #[test]
    fn test_add_allocates_ascending_slots() {
        let mut store = store();
        assert_eq!(store.add_note(&note(0)).unwrap(), 0);
        assert_eq!(store.add_note(&note(1)).unwrap(), 1);
        assert_eq!(store.add_note(&note(2)).unwrap(), 2);
        assert_eq!(store.count(RecordKind::Note).unwrap(), 3);
    }

    #[test]
    fn test_add_reuses_first_freed_slot() {
        let mut store = store();
        for n in 0..3 {
            store.add_note(&note(n)).unwrap();
        }
        store.delete_note(1).unwrap();
        // First clear bit wins, not the highest.
        assert_eq!(store.add_note(&note(9)).unwrap(), 1);
        assert_eq!(store.note(1).unwrap().title, "Note 9");
    }

    #[test]
    fn test_store_full() {
        let mut store = store();
        let capacity = store.limits().max_notes;
        for n in 0..capacity {
            store.add_note(&note(n)).unwrap();
        }
        match store.add_note(&note(99)) {
            Err(NotesError::StoreFull(RecordKind::Note)) => {}
            other => panic!("expected StoreFull, got {other:?}"),
        }
        // A failed add changes nothing.
        assert_eq!(store.count(RecordKind::Note).unwrap(), capacity);
    }

    #[test]
    fn test_deleted_slot_reads_as_not_found() {
        let mut store = store();
        let slot = store.add_note(&note(0)).unwrap();
        store.delete_note(slot).unwrap();
        assert!(matches!(
            store.note(slot),
            Err(NotesError::SlotNotFound(RecordKind::Note, 0))
        ));
    }

    #[test]
    fn test_delete_leaves_payload_as_tombstone() {
        let mut store = store();
        let slot = store.add_note(&note(0)).unwrap();
        store.delete_note(slot).unwrap();
        // The raw payload is still behind the cleared bit.
        let raw = store
            .backend()
            .read_slot(RecordKind::Note, slot)
            .unwrap()
            .unwrap();
        assert!(raw.contains("Note 0"));
        assert!(!store.is_used(RecordKind::Note, slot).unwrap());
    }

    #[test]
    fn test_delete_unused_slot_fails() {
        let mut store = store();
        assert!(matches!(
            store.delete_note(4),
            Err(NotesError::SlotNotFound(RecordKind::Note, 4))
        ));
    }

    #[test]
    fn test_modify_keeps_slot_and_mask() {
        let mut store = store();
        store.add_note(&note(0)).unwrap();
        let slot = store.add_note(&note(1)).unwrap();

        let updated = NoteRecord::new("Edited", "New body");
        store.modify_note(slot, &updated).unwrap();

        assert_eq!(store.note(slot).unwrap(), updated);
        assert_eq!(store.count(RecordKind::Note).unwrap(), 2);
    }

    #[test]
    fn test_modify_unused_slot_fails() {
        let mut store = store();
        assert!(matches!(
            store.modify_note(0, &note(0)),
            Err(NotesError::SlotNotFound(RecordKind::Note, 0))
        ));
    }

    #[test]
    fn test_listing_skips_holes_in_slot_order() {
        let mut store = store();
        for n in 0..4 {
            store.add_note(&note(n)).unwrap();
        }
        store.delete_note(1).unwrap();
        store.delete_note(3).unwrap();

        let notes = store.notes().unwrap();
        let slots: Vec<usize> = notes.iter().map(|(s, _)| *s).collect();
        assert_eq!(slots, vec![0, 2]);
        assert_eq!(notes[1].1.title, "Note 2");
    }

    #[test]
    fn test_notes_and_contacts_are_independent() {
        let mut store = store();
        store.add_note(&note(0)).unwrap();
        let slot = store
            .add_contact(&ContactRecord::new("Bob", "addr-1"))
            .unwrap();
        assert_eq!(slot, 0);
        assert_eq!(store.count(RecordKind::Note).unwrap(), 1);
        assert_eq!(store.count(RecordKind::Contact).unwrap(), 1);

        store.delete_note(0).unwrap();
        assert_eq!(store.contact(0).unwrap().name, "Bob");
    }

    #[test]
    fn test_contact_capacity_is_separate() {
        let mut store = store();
        let capacity = store.limits().max_contacts;
        for n in 0..capacity {
            store
                .add_contact(&ContactRecord::new(format!("c{n}"), format!("a{n}")))
                .unwrap();
        }
        assert!(store.is_full(RecordKind::Contact).unwrap());
        assert!(!store.is_full(RecordKind::Note).unwrap());
    }

    #[test]
    fn test_oversized_record_rejected_before_any_write() {
        let mut store = store();
        let oversized = NoteRecord::new("t", "x".repeat(513));
        assert!(matches!(
            store.add_note(&oversized),
            Err(NotesError::TooLong { .. })
        ));
        assert_eq!(store.count(RecordKind::Note).unwrap(), 0);
        assert!(store
            .backend()
            .read_slot(RecordKind::Note, 0)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let mut store = store();
        store.add_note(&note(0)).unwrap();

        store.backend().set_simulate_write_error(true);
        assert!(store.add_note(&note(1)).is_err());
        store.backend().set_simulate_write_error(false);

        assert_eq!(store.count(RecordKind::Note).unwrap(), 1);
    }

    #[test]
    fn test_crash_between_payload_and_mask_keeps_slot_free() {
        let mut store = store();
        store.add_note(&note(0)).unwrap();

        // Fail on the mask write, after the payload landed.
        store.backend().fail_after_writes(1);
        assert!(store.add_note(&note(1)).is_err());

        // Slot 1 still reads as free and is handed out again.
        assert_eq!(store.count(RecordKind::Note).unwrap(), 1);
        assert_eq!(store.add_note(&note(2)).unwrap(), 1);
        assert_eq!(store.note(1).unwrap().title, "Note 2");
    }

    #[test]
    #[should_panic(expected = "occupancy mask")]
    fn test_capacity_beyond_mask_width_is_rejected() {
        let limits = StoreLimits {
            max_notes: 33,
            ..Default::default()
        };
        SlotStore::with_limits(MemBackend::new(), limits);
    }

    #[test]
    fn test_capacity_at_mask_width_is_accepted() {
        let limits = StoreLimits {
            max_notes: 32,
            max_contacts: 32,
            ..Default::default()
        };
        let mut store = SlotStore::with_limits(MemBackend::new(), limits);
        for n in 0..32 {
            assert_eq!(store.add_note(&note(n)).unwrap(), n);
        }
        assert!(store.is_full(RecordKind::Note).unwrap());
    }

    #[test]
    fn test_settings_default_when_never_written() {
        let store = store();
        let settings = store.settings().unwrap();
        assert!(!settings.locked);
        assert!(settings.digits.is_empty());
    }

    #[test]
    fn test_settings_roundtrip() {
        let mut store = store();
        let mut settings = Settings::default();
        settings.set_passcode(&[1, 2, 3, 4]).unwrap();
        store.set_settings(&settings).unwrap();

        assert_eq!(store.settings().unwrap(), settings);
    }
}
