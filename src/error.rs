use crate::store::RecordKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("No {0} record at slot {1}")]
    SlotNotFound(RecordKind, usize),

    #[error("No free {0} slot left")]
    StoreFull(RecordKind),

    #[error("{field} is {len} bytes, maximum is {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Index {0} is out of range")]
    InvalidIndex(usize),

    #[error("Note already holds the maximum of {0} paragraphs")]
    TooManyParagraphs(usize),

    #[error("Paragraph text must not contain the paragraph delimiter")]
    EmbeddedDelimiter,

    #[error("Passcode must be 4 to 8 digits, got {0}")]
    PasscodeLength(usize),

    #[error("Notes are locked")]
    Locked,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, NotesError>;
