use crate::error::Result;
use crate::store::RecordKind;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while SlotStore handles the "what" (allocation, masks, encoding).
///
/// Each method maps to one persistent field write or read. Backends must
/// make every write atomic (e.g. write to tmp then rename): the store's
/// crash-safety argument relies on a field being either its old or its
/// new value, never a torn mix.
pub trait StorageBackend {
    // --- Slot payloads ---

    /// Read the raw payload of a slot.
    /// Returns Ok(None) if the slot was never written.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_slot(&self, kind: RecordKind, slot: usize) -> Result<Option<String>>;

    /// Write a slot payload. MUST be atomic.
    fn write_slot(&self, kind: RecordKind, slot: usize, payload: &str) -> Result<()>;

    // --- Occupancy masks ---

    /// Read the occupancy bitmask for a record kind. Bit `n` set means
    /// slot `n` holds a live record. Missing mask reads as 0.
    fn read_mask(&self, kind: RecordKind) -> Result<u32>;

    /// Write the occupancy bitmask. MUST be atomic.
    fn write_mask(&self, kind: RecordKind, mask: u32) -> Result<()>;

    // --- Settings record ---

    /// Read the raw settings payload, Ok(None) if never written.
    fn read_settings(&self) -> Result<Option<String>>;

    /// Write the settings payload. MUST be atomic.
    fn write_settings(&self, payload: &str) -> Result<()>;
}
