use std::fs;
use std::path::{Path, PathBuf};

use super::backend::StorageBackend;
use crate::error::{NotesError, Result};
use crate::store::RecordKind;

/// Filesystem storage backend: one JSON file per persistent field.
///
/// Layout under the root directory:
///
/// ```text
/// root/
/// ├── note-0.json .. note-9.json        # slot payloads
/// ├── contact-0.json .. contact-15.json
/// ├── note-mask.json                    # occupancy masks
/// ├── contact-mask.json
/// └── settings.json
/// ```
///
/// Every write goes to a `.tmp` sibling first and is renamed into place,
/// so a field is always either its old or its new value.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, kind: RecordKind, slot: usize) -> PathBuf {
        self.root.join(format!("{kind}-{slot}.json"))
    }

    fn mask_path(&self, kind: RecordKind) -> PathBuf {
        self.root.join(format!("{kind}-mask.json"))
    }

    fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(NotesError::Io)?;
        }
        Ok(())
    }

    fn read_field(&self, path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path).map_err(NotesError::Io)?))
    }

    fn write_field(&self, path: &Path, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(NotesError::Io)?;
        fs::rename(&tmp, path).map_err(NotesError::Io)?;
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_slot(&self, kind: RecordKind, slot: usize) -> Result<Option<String>> {
        self.read_field(&self.slot_path(kind, slot))
    }

    fn write_slot(&self, kind: RecordKind, slot: usize, payload: &str) -> Result<()> {
        self.write_field(&self.slot_path(kind, slot), payload)
    }

    fn read_mask(&self, kind: RecordKind) -> Result<u32> {
        match self.read_field(&self.mask_path(kind))? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(0),
        }
    }

    fn write_mask(&self, kind: RecordKind, mask: u32) -> Result<()> {
        self.write_field(&self.mask_path(kind), &serde_json::to_string(&mask)?)
    }

    fn read_settings(&self) -> Result<Option<String>> {
        self.read_field(&self.settings_path())
    }

    fn write_settings(&self, payload: &str) -> Result<()> {
        self.write_field(&self.settings_path(), payload)
    }
}
