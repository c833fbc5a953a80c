//! # Page Layout Engine
//!
//! Partitions an ordered paragraph sequence into display pages under a
//! pixel-height budget. Text measurement is injected ([`TextMeasure`]):
//! the core never rasterizes anything, it only adds up heights the host's
//! font engine reports.
//!
//! ## Packing rules
//!
//! Greedy: a page accumulates paragraphs (top margin once, inter-paragraph
//! margin between neighbors) until the next addition would reach the
//! budget. A page always takes at least one paragraph; when that sole
//! paragraph already exceeds a full page the page is marked
//! [`PageSpan::overflow`] instead of failing.
//!
//! ## The last-page second pass
//!
//! A page that looks final during the greedy walk, while earlier pages
//! exist, is refit with `page_height - footer_height`: a multi-page note
//! shows a navigation footer on every page, so the tentative last page
//! must leave room for it too (and the refit may push paragraphs onto a
//! further page). The walk is deterministic, so re-running it reproduces
//! the same partition.
//!
//! ## Consistency
//!
//! The partition is computed once; `page_count`, `page_of` and
//! `first_paragraph_of` are all reads of that one result, so
//! `page_of(first_paragraph_of(p)) == p` holds for every page.

use log::debug;

use crate::config::LayoutConfig;
use crate::error::{NotesError, Result};

/// Font mode for measurement. Long notes drop to the small font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Large,
    Small,
}

/// Host-provided text measurement: height in pixels of `text` rendered
/// with `font` inside `width`.
pub trait TextMeasure {
    fn text_height(&self, text: &str, font: FontSize, width: u16) -> u16;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, FontSize, u16) -> u16,
{
    fn text_height(&self, text: &str, font: FontSize, width: u16) -> u16 {
        self(text, font, width)
    }
}

/// Font choice for a note body, by content length.
pub fn font_for_content(content: &str, config: &LayoutConfig) -> FontSize {
    if content.len() > config.small_font_threshold {
        FontSize::Small
    } else {
        FontSize::Large
    }
}

/// One page of the partition: a contiguous run of paragraph indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    /// Index of the first paragraph on this page.
    pub first: usize,
    /// Number of paragraphs on this page (>= 1 for paragraph pages).
    pub count: usize,
    /// The sole paragraph is taller than a full page budget.
    pub overflow: bool,
}

impl PageSpan {
    /// Paragraph index range covered by this page.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.first..self.first + self.count
    }
}

/// The computed page partition of one note (or one fixed-row list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pages: Vec<PageSpan>,
}

impl Pagination {
    /// Lays out paragraphs into pages. Zero paragraphs yield zero pages.
    pub fn paginate<M: TextMeasure + ?Sized>(
        paragraphs: &[&str],
        measure: &M,
        config: &LayoutConfig,
        font: FontSize,
    ) -> Self {
        let fit = |start: usize, budget: u16| -> (usize, bool) {
            let mut height = config.top_margin;
            let mut count = 0;
            while start + count < paragraphs.len() {
                if count > 0 {
                    height += config.paragraph_margin;
                }
                height = height.saturating_add(measure.text_height(
                    paragraphs[start + count],
                    font,
                    config.available_width,
                ));
                if height >= budget {
                    break;
                }
                count += 1;
            }
            if count == 0 {
                // Too tall for the whole budget: take it anyway, flagged.
                (1, true)
            } else {
                (count, false)
            }
        };

        let mut pages = Vec::new();
        let mut i = 0;
        while i < paragraphs.len() {
            let (mut count, mut overflow) = fit(i, config.page_height);
            // Tentative last page of a multi-page note: refit with the
            // footer reservation.
            if !pages.is_empty() && i + count == paragraphs.len() {
                (count, overflow) = fit(i, config.reduced_height());
            }
            pages.push(PageSpan {
                first: i,
                count,
                overflow,
            });
            i += count;
        }

        if pages.iter().any(|p| p.overflow) {
            debug!(
                "pagination produced {} page(s) with overflow out of {}",
                pages.iter().filter(|p| p.overflow).count(),
                pages.len()
            );
        }
        Self { pages }
    }

    /// Lays out `count` fixed-height rows (list views: note bars, contact
    /// bars). Zero rows still yield one empty page, as list screens
    /// always render.
    pub fn rows(count: usize, row_height: u16, config: &LayoutConfig) -> Self {
        let fit = |start: usize, budget: u16| -> usize {
            let mut height = 0u16;
            let mut n = 0;
            while start + n < count {
                height = height.saturating_add(row_height);
                if height >= budget {
                    break;
                }
                n += 1;
            }
            n.max(1)
        };

        if count == 0 {
            return Self {
                pages: vec![PageSpan {
                    first: 0,
                    count: 0,
                    overflow: false,
                }],
            };
        }

        let mut pages = Vec::new();
        let mut i = 0;
        while i < count {
            let mut n = fit(i, config.page_height);
            // A footer is shown whenever the list spans several pages,
            // which is known as soon as the first page cannot take all.
            if !pages.is_empty() || count - i > n {
                n = fit(i, config.reduced_height());
            }
            pages.push(PageSpan {
                first: i,
                count: n,
                overflow: false,
            });
            i += n;
        }
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The page holding the given paragraph index.
    pub fn page_of(&self, paragraph: usize) -> Result<usize> {
        self.pages
            .iter()
            .position(|p| p.range().contains(&paragraph))
            .ok_or(NotesError::InvalidIndex(paragraph))
    }

    /// Index of the first paragraph on the given page.
    pub fn first_paragraph_of(&self, page: usize) -> Result<usize> {
        Ok(self.page(page)?.first)
    }

    pub fn page(&self, page: usize) -> Result<&PageSpan> {
        self.pages.get(page).ok_or(NotesError::InvalidIndex(page))
    }

    pub fn pages(&self) -> &[PageSpan] {
        &self.pages
    }

    /// Whether any page carries a taller-than-budget paragraph.
    pub fn has_overflow(&self) -> bool {
        self.pages.iter().any(|p| p.overflow)
    }
}
