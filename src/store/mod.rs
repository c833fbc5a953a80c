//! # Storage Layer
//!
//! This module defines the fixed-capacity slot store and its backends. The
//! [`StorageBackend`] trait handles the "how" of persistence (filesystem vs
//! memory), while [`SlotStore`] handles the "what": slot allocation,
//! occupancy masks and record encoding.
//!
//! ## Slot + mask model
//!
//! Records live in a fixed array of slots per kind (notes, contacts). A
//! per-kind occupancy bitmask says which slots hold live records; slot
//! payloads are never erased on delete, only the mask bit is cleared.
//! This mirrors NVRAM-style storage where clearing a flag is cheap and
//! rewriting a record field is not.
//!
//! ## Crash-safety ordering
//!
//! Allocation writes the payload *before* setting the mask bit. A crash
//! between the two leaves a stale payload behind an unset bit, which the
//! store treats as free space. The reverse order could expose a
//! half-written record as live.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one JSON file per field, atomic tmp+rename writes.
//! - [`mem_backend::MemBackend`]: `RefCell` maps, for tests.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod slot_store;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use memory::InMemoryStore;
pub use slot_store::{SlotStore, MAX_SLOTS};

/// The two record families the store keeps, each with its own slot array
/// and occupancy mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    Note,
    Contact,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Note => write!(f, "note"),
            RecordKind::Contact => write!(f, "contact"),
        }
    }
}
