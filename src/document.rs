//! # Document: paragraph arena and in-place editing
//!
//! A [`Document`] is the transient editing form of one note: the flat
//! content string (paragraphs separated by `\n`) plus a span table of
//! `(start, len)` pairs, one per paragraph. The spans always index into a
//! single owned arena — there are no per-paragraph copies, and the flat
//! form is the arena itself, so flattening after an edit is free and
//! `split` followed by `join` reproduces the stored bytes exactly.
//!
//! ## Invariants
//!
//! - Spans are non-overlapping, contiguous and in document order; between
//!   two consecutive spans sits exactly one delimiter byte.
//! - `content.len() + 1 <= capacity` after every mutation (the reference
//!   device keeps one byte for the terminator). An edit that would break
//!   this fails with `TooLong` and leaves the document byte-identical.
//! - An empty arena has zero paragraphs; a non-empty arena has
//!   `1 + number of delimiters` paragraphs (consecutive delimiters yield
//!   empty paragraphs, as the device splitter does).
//!
//! ## Editing model
//!
//! Editing one paragraph moves the whole tail of the arena once (grow or
//! shrink), rewrites the slot, then shifts the recorded start offsets of
//! every following span by the size delta. Appending never shifts
//! anything; deleting closes the gap including the freed delimiter.

use crate::error::{NotesError, Result};

/// Paragraph delimiter in the flat stored representation.
pub const PARAGRAPH_DELIMITER: char = '\n';

/// One paragraph's position inside the content arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphSpan {
    pub start: usize,
    pub len: usize,
}

/// A note opened for editing: owned title, owned content arena, span table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    content: String,
    spans: Vec<ParagraphSpan>,
    capacity: usize,
}

impl Document {
    /// Opens a document over the given flat content.
    ///
    /// `capacity` is the byte budget of the backing field (content plus
    /// one terminator byte must fit).
    pub fn new(title: impl Into<String>, content: impl Into<String>, capacity: usize) -> Self {
        let content = content.into();
        let spans = split(&content);
        Self {
            title: title.into(),
            content,
            spans,
            capacity,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The flat stored representation. Identical to joining all
    /// paragraphs with the delimiter.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn paragraph_count(&self) -> usize {
        self.spans.len()
    }

    /// Text of one paragraph.
    pub fn paragraph(&self, index: usize) -> Result<&str> {
        let span = self
            .spans
            .get(index)
            .ok_or(NotesError::InvalidIndex(index))?;
        Ok(&self.content[span.start..span.start + span.len])
    }

    /// All paragraphs in document order.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.spans
            .iter()
            .map(|s| &self.content[s.start..s.start + s.len])
            .collect()
    }

    /// Whether another paragraph may be added under the given cap.
    pub fn can_add_paragraph(&self, max_paragraphs: usize) -> bool {
        self.spans.len() < max_paragraphs
    }

    /// Replaces the text of one paragraph.
    ///
    /// When the length changes, the tail of the arena is moved once and
    /// all following span starts are shifted by the delta. Fails with
    /// `TooLong` (and changes nothing) if the result would exceed the
    /// capacity budget.
    pub fn update_paragraph(&mut self, index: usize, new_text: &str) -> Result<()> {
        check_paragraph_text(new_text)?;
        let span = *self
            .spans
            .get(index)
            .ok_or(NotesError::InvalidIndex(index))?;

        let new_len = self.content.len() - span.len + new_text.len();
        self.check_capacity(new_len)?;

        if new_text.len() == span.len {
            // Same size: overwrite the slot bytes directly.
            self.content
                .replace_range(span.start..span.start + span.len, new_text);
            return Ok(());
        }

        // Tail move and slot rewrite in one splice, then fix the offsets.
        self.content
            .replace_range(span.start..span.start + span.len, new_text);
        let delta = new_text.len() as isize - span.len as isize;
        self.spans[index].len = new_text.len();
        for later in &mut self.spans[index + 1..] {
            later.start = (later.start as isize + delta) as usize;
        }
        Ok(())
    }

    /// Appends a new paragraph after the last one. No existing bytes move.
    pub fn append_paragraph(&mut self, text: &str) -> Result<()> {
        check_paragraph_text(text)?;
        if self.spans.is_empty() {
            self.check_capacity(text.len())?;
            self.content.push_str(text);
            self.spans.push(ParagraphSpan {
                start: 0,
                len: text.len(),
            });
            return Ok(());
        }

        self.check_capacity(self.content.len() + 1 + text.len())?;
        self.content.push(PARAGRAPH_DELIMITER);
        let start = self.content.len();
        self.content.push_str(text);
        self.spans.push(ParagraphSpan {
            start,
            len: text.len(),
        });
        Ok(())
    }

    /// Removes one paragraph and closes the gap.
    ///
    /// Interior paragraphs take their trailing delimiter with them; the
    /// last of several paragraphs degenerates to a truncation that also
    /// drops the preceding delimiter; the sole paragraph empties the
    /// arena.
    pub fn delete_paragraph(&mut self, index: usize) -> Result<()> {
        let span = *self
            .spans
            .get(index)
            .ok_or(NotesError::InvalidIndex(index))?;

        if self.spans.len() == 1 {
            self.content.clear();
            self.spans.clear();
            return Ok(());
        }

        if index == self.spans.len() - 1 {
            // Truncation: the delimiter before the last paragraph goes too.
            self.content.truncate(span.start - 1);
            self.spans.pop();
            return Ok(());
        }

        // Interior: remove slot plus its trailing delimiter, shift the rest.
        let removed = span.len + 1;
        self.content
            .replace_range(span.start..span.start + removed, "");
        self.spans.remove(index);
        for later in &mut self.spans[index..] {
            later.start -= removed;
        }
        Ok(())
    }

    fn check_capacity(&self, content_len: usize) -> Result<()> {
        if content_len + 1 > self.capacity {
            return Err(NotesError::TooLong {
                field: "content",
                len: content_len,
                max: self.capacity.saturating_sub(1),
            });
        }
        Ok(())
    }
}

/// Edit text must stay one split unit: a delimiter inside it would make
/// the span table and the re-split flat form disagree.
fn check_paragraph_text(text: &str) -> Result<()> {
    if text.contains(PARAGRAPH_DELIMITER) {
        return Err(NotesError::EmbeddedDelimiter);
    }
    Ok(())
}

/// Computes the span table of a flat buffer: one span per
/// delimiter-separated paragraph, empty buffer yields no spans.
pub fn split(content: &str) -> Vec<ParagraphSpan> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut spans = Vec::new();
    let mut start = 0;
    for (pos, ch) in content.char_indices() {
        if ch == PARAGRAPH_DELIMITER {
            spans.push(ParagraphSpan {
                start,
                len: pos - start,
            });
            start = pos + 1;
        }
    }
    spans.push(ParagraphSpan {
        start,
        len: content.len() - start,
    });
    spans
}

/// Joins paragraphs back into the flat stored representation.
///
/// Inverse of [`split`]: `join(&split_texts(x)) == x` for any buffer `x`.
pub fn join<S: AsRef<str>>(paragraphs: &[S]) -> String {
    let mut out = String::new();
    for (i, p) in paragraphs.iter().enumerate() {
        if i > 0 {
            out.push(PARAGRAPH_DELIMITER);
        }
        out.push_str(p.as_ref());
    }
    out
}
