//! # Configuration
//!
//! All capacity and geometry constants the host chrome hands to the core.
//! Nothing here is read from disk or environment: the display driver knows
//! its pixel budget and the firmware knows its storage shape, so both are
//! passed in as plain values with compiled defaults matching the reference
//! device (10 notes, 16 contacts, 128/512 byte note fields).

use serde::{Deserialize, Serialize};

/// Geometry of one display page, in pixels.
///
/// `footer_height` is the reservation subtracted on the refit of a
/// tentative last page, so that a page which turns out not to be last
/// still has room for the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Full usable content height of a page.
    pub page_height: u16,
    /// Height reserved for the page-navigation footer.
    pub footer_height: u16,
    /// Margin above the first paragraph of a page.
    pub top_margin: u16,
    /// Margin between two consecutive paragraphs.
    pub paragraph_margin: u16,
    /// Width available to the text measurer.
    pub available_width: u16,
    /// Content length (bytes) at or above which the small font is used.
    pub small_font_threshold: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_height: 536,
            footer_height: 96,
            top_margin: 12,
            paragraph_margin: 28,
            available_width: 440,
            small_font_threshold: 50,
        }
    }
}

impl LayoutConfig {
    /// Budget of a page that must also fit the navigation footer.
    pub fn reduced_height(&self) -> u16 {
        self.page_height.saturating_sub(self.footer_height)
    }
}

/// Capacities of the slot store and its record fields, in bytes/slots.
///
/// Per-kind slot capacities are bounded by the 32-bit occupancy mask;
/// the store rejects configurations above 32 slots per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLimits {
    pub max_notes: usize,
    pub max_contacts: usize,
    pub title_max_len: usize,
    pub content_max_len: usize,
    pub contact_field_max_len: usize,
    /// Maximum number of paragraphs a single note may hold.
    pub max_paragraphs: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_notes: 10,
            max_contacts: 16,
            title_max_len: 128,
            content_max_len: 512,
            contact_field_max_len: 32,
            max_paragraphs: 10,
        }
    }
}

impl StoreLimits {
    /// Slot capacity for the given record kind.
    pub fn capacity(&self, kind: crate::store::RecordKind) -> usize {
        match kind {
            crate::store::RecordKind::Note => self.max_notes,
            crate::store::RecordKind::Contact => self.max_contacts,
        }
    }
}
