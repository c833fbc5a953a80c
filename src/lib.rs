//! # Secnotes Architecture
//!
//! Secnotes is a **UI-agnostic secure-notes core**: the data model, page
//! layout and storage logic of a small notes device, with every screen
//! and pixel concern left to the host. This is not an application that
//! happens to have some library code — it's a library a host UI drives.
//!
//! ## The Layer Stack
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host UI (not in this crate)                                │
//! │  - Draws screens, measures text, reads input                │
//! │  - The ONLY place that knows about pixels and fonts         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: lock gating, view consistency               │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                       │
//!                  ▼                       ▼
//! ┌───────────────────────────┐ ┌─────────────────────────────┐
//! │  Document + Layout        │ │  Session (session.rs)       │
//! │  (document.rs, layout.rs) │ │  - Runtime unlock state     │
//! │  - Paragraph arena/edits  │ └─────────────────────────────┘
//! │  - Page partition         │
//! └───────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - SlotStore over an abstract StorageBackend                │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns
//! regular Rust types, never writes to stdout/stderr and never assumes a
//! display. Text measurement is injected through
//! [`layout::TextMeasure`], so the same core serves a device firmware
//! shim, a desktop app or a test harness with a fake font engine.
//!
//! ## Consistency Guarantees
//!
//! - A note's page partition is computed once per edit; all page queries
//!   read that single partition, so page-of and first-paragraph-of can
//!   never disagree.
//! - The store writes slot payloads before occupancy bits; a crash in
//!   between leaves free space, never a half-visible record.

pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod model;
pub mod session;
pub mod store;

pub use api::{NoteSummary, NoteView, NotesApi};
pub use config::{LayoutConfig, StoreLimits};
pub use document::{Document, PARAGRAPH_DELIMITER};
pub use error::{NotesError, Result};
pub use layout::{FontSize, PageSpan, Pagination, TextMeasure};
pub use model::{ContactRecord, NoteRecord, Settings};
pub use session::Session;
pub use store::{FsBackend, InMemoryStore, MemBackend, RecordKind, SlotStore, StorageBackend};
