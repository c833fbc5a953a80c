//! # API Facade
//!
//! The API layer is a **thin facade** over the document, layout, session
//! and store modules. It is the single entry point for a host UI: screens
//! call these methods and render the structured results.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Gates** protected operations on the session lock
//! - **Normalizes inputs** (an empty edit becomes a paragraph delete)
//! - **Keeps views consistent**: every edit persists the note and
//!   recomputes font and pagination before returning
//!
//! ## What the API Does NOT Do
//!
//! - **Rendering**: no strings for screens, no pixel drawing. Text
//!   measurement stays on the host side behind [`TextMeasure`].
//! - **Storage mechanics**: slot allocation and masks live in the store.
//!
//! ## Generic Over StorageBackend
//!
//! `NotesApi<B: StorageBackend>` is generic over the backend:
//! - Production: `NotesApi<FsBackend>`
//! - Testing: `NotesApi<MemBackend>`

use log::info;

use crate::config::{LayoutConfig, StoreLimits};
use crate::document::Document;
use crate::error::{NotesError, Result};
use crate::layout::{font_for_content, FontSize, Pagination, TextMeasure};
use crate::model::{ContactRecord, NoteRecord, Settings};
use crate::session::Session;
use crate::store::{SlotStore, StorageBackend};

/// One row of a note list: the slot plus the display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub slot: usize,
    pub title: String,
}

/// An opened note: the editable document plus its computed layout.
///
/// The view is a snapshot. Edits go through
/// [`NotesApi::edit_paragraph`] and friends, which mutate the document,
/// persist it and refresh `font` and `pagination` together, so the three
/// never drift apart.
#[derive(Debug)]
pub struct NoteView {
    slot: usize,
    document: Document,
    font: FontSize,
    pagination: Pagination,
}

impl NoteView {
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn font(&self) -> FontSize {
        self.font
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }
}

/// The main API facade for the notes application.
pub struct NotesApi<B: StorageBackend> {
    store: SlotStore<B>,
    session: Session,
    layout: LayoutConfig,
}

impl<B: StorageBackend> NotesApi<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, LayoutConfig::default(), StoreLimits::default())
    }

    pub fn with_config(backend: B, layout: LayoutConfig, limits: StoreLimits) -> Self {
        Self {
            store: SlotStore::with_limits(backend, limits),
            session: Session::new(),
            layout,
        }
    }

    pub fn store(&self) -> &SlotStore<B> {
        &self.store
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    // --- Lock handling ---

    /// Whether protected operations currently require an unlock.
    pub fn is_locked(&self) -> Result<bool> {
        Ok(!self.session.is_open(&self.store.settings()?))
    }

    /// Tries a passcode; returns whether the session is now open.
    pub fn unlock(&mut self, digits: &[u8]) -> Result<bool> {
        let settings = self.store.settings()?;
        Ok(self.session.unlock(&settings, digits))
    }

    /// Relocks the session without touching the stored passcode.
    pub fn lock(&mut self) {
        self.session.lock();
    }

    /// Sets (or changes) the passcode and enables the lock. The session
    /// stays open: the user just typed the new code.
    pub fn set_passcode(&mut self, digits: &[u8]) -> Result<()> {
        self.check_unlocked()?;
        let mut settings = self.store.settings()?;
        settings.set_passcode(digits)?;
        self.store.set_settings(&settings)?;
        self.session.grant();
        info!("passcode enabled");
        Ok(())
    }

    /// Drops the passcode; notes become open to everyone.
    pub fn remove_passcode(&mut self) -> Result<()> {
        self.check_unlocked()?;
        let mut settings = self.store.settings()?;
        settings.clear_passcode();
        self.store.set_settings(&settings)?;
        info!("passcode removed");
        Ok(())
    }

    fn check_unlocked(&self) -> Result<()> {
        if self.is_locked()? {
            return Err(NotesError::Locked);
        }
        Ok(())
    }

    /// The persisted settings record.
    pub fn settings(&self) -> Result<Settings> {
        self.store.settings()
    }

    // --- Notes ---

    /// Live notes in slot order, titled for list display.
    pub fn list_notes(&self) -> Result<Vec<NoteSummary>> {
        self.check_unlocked()?;
        Ok(self
            .store
            .notes()?
            .into_iter()
            .map(|(slot, note)| NoteSummary {
                slot,
                title: note.display_title().to_string(),
            })
            .collect())
    }

    /// Stores a new note, returning its slot.
    pub fn create_note(&mut self, title: &str, content: &str) -> Result<usize> {
        self.check_unlocked()?;
        self.store.add_note(&NoteRecord::new(title, content))
    }

    pub fn delete_note(&mut self, slot: usize) -> Result<()> {
        self.check_unlocked()?;
        self.store.delete_note(slot)
    }

    /// Opens a note for display and editing: loads it, picks the font by
    /// content length and computes the page partition.
    pub fn open_note<M: TextMeasure + ?Sized>(&self, slot: usize, measure: &M) -> Result<NoteView> {
        self.check_unlocked()?;
        let record = self.store.note(slot)?;
        let document = Document::new(
            &record.title,
            &record.content,
            // The device buffer includes a trailing terminator byte.
            self.store.limits().content_max_len + 1,
        );
        let font = font_for_content(document.content(), &self.layout);
        let pagination =
            Pagination::paginate(&document.paragraphs(), measure, &self.layout, font);
        Ok(NoteView {
            slot,
            document,
            font,
            pagination,
        })
    }

    /// Replaces one paragraph of an opened note. Empty text deletes the
    /// paragraph instead, as typing nothing over a paragraph means
    /// removing it. Persists and relayouts on success.
    pub fn edit_paragraph<M: TextMeasure + ?Sized>(
        &mut self,
        view: &mut NoteView,
        index: usize,
        new_text: &str,
        measure: &M,
    ) -> Result<()> {
        self.check_unlocked()?;
        if new_text.is_empty() {
            view.document.delete_paragraph(index)?;
        } else {
            view.document.update_paragraph(index, new_text)?;
        }
        self.persist(view)?;
        self.relayout(view, measure);
        Ok(())
    }

    /// Appends a paragraph, subject to the per-note paragraph cap.
    pub fn append_paragraph<M: TextMeasure + ?Sized>(
        &mut self,
        view: &mut NoteView,
        text: &str,
        measure: &M,
    ) -> Result<()> {
        self.check_unlocked()?;
        let max = self.store.limits().max_paragraphs;
        if !view.document.can_add_paragraph(max) {
            return Err(NotesError::TooManyParagraphs(max));
        }
        view.document.append_paragraph(text)?;
        self.persist(view)?;
        self.relayout(view, measure);
        Ok(())
    }

    /// Retitles an opened note and persists it. Layout is untouched:
    /// the title renders outside the paginated content area.
    pub fn edit_title(&mut self, view: &mut NoteView, title: &str) -> Result<()> {
        self.check_unlocked()?;
        // Validate before touching the view, so a rejected title cannot
        // linger in the document and fail later unrelated edits.
        let record = NoteRecord::new(title, view.document.content());
        record.validate(self.store.limits())?;
        view.document.set_title(title);
        self.store.modify_note(view.slot, &record)
    }

    fn persist(&mut self, view: &NoteView) -> Result<()> {
        let record = NoteRecord::new(view.document.title(), view.document.content());
        self.store.modify_note(view.slot, &record)
    }

    fn relayout<M: TextMeasure + ?Sized>(&self, view: &mut NoteView, measure: &M) {
        view.font = font_for_content(view.document.content(), &self.layout);
        let paragraphs = view.document.paragraphs();
        view.pagination = Pagination::paginate(&paragraphs, measure, &self.layout, view.font);
    }

    // --- Contacts ---

    pub fn list_contacts(&self) -> Result<Vec<(usize, ContactRecord)>> {
        self.check_unlocked()?;
        self.store.contacts()
    }

    pub fn add_contact(&mut self, name: &str, address: &str) -> Result<usize> {
        self.check_unlocked()?;
        self.store.add_contact(&ContactRecord::new(name, address))
    }

    pub fn update_contact(&mut self, slot: usize, name: &str, address: &str) -> Result<()> {
        self.check_unlocked()?;
        self.store
            .modify_contact(slot, &ContactRecord::new(name, address))
    }

    pub fn delete_contact(&mut self, slot: usize) -> Result<()> {
        self.check_unlocked()?;
        self.store.delete_contact(slot)
    }

    // --- Sharing ---

    /// The full record of a note, for handing to the transport layer.
    pub fn shared_note(&self, slot: usize) -> Result<NoteRecord> {
        self.check_unlocked()?;
        let note = self.store.note(slot)?;
        info!("sharing note from slot {slot}");
        Ok(note)
    }

    /// Stores a note received from a peer. Validation and capacity rules
    /// are the same as for locally created notes.
    pub fn receive_note(&mut self, title: &str, content: &str) -> Result<usize> {
        self.check_unlocked()?;
        let slot = self.store.add_note(&NoteRecord::new(title, content))?;
        info!("received note into slot {slot}");
        Ok(slot)
    }
}
