use super::mem_backend::MemBackend;
use super::slot_store::SlotStore;

pub type InMemoryStore = SlotStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        SlotStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{ContactRecord, NoteRecord, Settings};
    use crate::store::RecordKind;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_notes(mut self, count: usize) -> Self {
            for i in 0..count {
                let note = NoteRecord::new(
                    format!("Test Note {}", i + 1),
                    format!("Content for note {}", i + 1),
                );
                self.store.add_note(&note).unwrap();
            }
            self
        }

        pub fn with_note(mut self, title: &str, content: &str) -> Self {
            self.store
                .add_note(&NoteRecord::new(title, content))
                .unwrap();
            self
        }

        pub fn with_contacts(mut self, count: usize) -> Self {
            for i in 0..count {
                let contact = ContactRecord::new(
                    format!("Contact {}", i + 1),
                    format!("addr-{}", i + 1),
                );
                self.store.add_contact(&contact).unwrap();
            }
            self
        }

        /// Fills every note slot.
        pub fn full(self) -> Self {
            let remaining =
                self.store.limits().max_notes - self.store.count(RecordKind::Note).unwrap();
            self.with_notes(remaining)
        }

        pub fn with_passcode(mut self, digits: &[u8]) -> Self {
            let mut settings = Settings::default();
            settings.set_passcode(digits).unwrap();
            self.store.set_settings(&settings).unwrap();
            self
        }
    }
}
