//! # Domain Model: Records and Settings
//!
//! This module defines the payloads the slot store persists: [`NoteRecord`],
//! [`ContactRecord`] and the single [`Settings`] record.
//!
//! ## Field capacities
//!
//! The reference device stores records in fixed-size NVRAM fields, so every
//! string field has a hard byte cap (title 128, content 512, contact
//! name/address 32). The caps are configured through
//! [`StoreLimits`](crate::config::StoreLimits) and validated on entry —
//! a record that does not fit is rejected with `TooLong` *before* anything
//! is written, never truncated silently.
//!
//! ## Title fallback
//!
//! A note may be saved before its title is typed. For list views the title
//! falls back to the first paragraph of the content, trimmed for display —
//! same spirit as extracting a title line from raw pad text.

use serde::{Deserialize, Serialize};

use crate::config::StoreLimits;
use crate::error::{NotesError, Result};

/// Maximum passcode digits.
pub const MAX_PIN_LENGTH: usize = 8;
/// Minimum passcode digits.
pub const MIN_PIN_LENGTH: usize = 4;

/// One stored note: a title plus flat content where paragraphs are
/// separated by `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub title: String,
    pub content: String,
}

impl NoteRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Checks both fields against the configured caps.
    pub fn validate(&self, limits: &StoreLimits) -> Result<()> {
        check_len("title", &self.title, limits.title_max_len)?;
        check_len("content", &self.content, limits.content_max_len)?;
        Ok(())
    }

    /// Title for list views, falling back to the first content paragraph
    /// when no title was entered.
    pub fn display_title(&self) -> &str {
        if !self.title.is_empty() {
            return &self.title;
        }
        self.content.split('\n').next().unwrap_or("")
    }
}

/// One stored contact: a display name and a receiving address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub address: String,
}

impl ContactRecord {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    pub fn validate(&self, limits: &StoreLimits) -> Result<()> {
        check_len("name", &self.name, limits.contact_field_max_len)?;
        check_len("address", &self.address, limits.contact_field_max_len)?;
        Ok(())
    }
}

/// The single persisted settings record: lock flag plus passcode digits.
///
/// `digits` holds raw digit values (0..=9), not ASCII. It is empty while
/// no passcode has ever been chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub locked: bool,
    pub digits: Vec<u8>,
}

impl Settings {
    /// Enables the lock with the given passcode.
    ///
    /// Rejects passcodes outside 4..=8 digits without touching the
    /// current state.
    pub fn set_passcode(&mut self, digits: &[u8]) -> Result<()> {
        if digits.len() < MIN_PIN_LENGTH || digits.len() > MAX_PIN_LENGTH {
            return Err(NotesError::PasscodeLength(digits.len()));
        }
        self.locked = true;
        self.digits = digits.to_vec();
        Ok(())
    }

    /// Disables the lock. The old digits are dropped.
    pub fn clear_passcode(&mut self) {
        self.locked = false;
        self.digits.clear();
    }

    /// Length and digit comparison, as the device firmware does it.
    pub fn passcode_matches(&self, digits: &[u8]) -> bool {
        self.locked && self.digits.len() == digits.len() && self.digits == digits
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    // Byte length: the device reserves fixed byte arrays, not char counts.
    if value.len() > max {
        return Err(NotesError::TooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}
