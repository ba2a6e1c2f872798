//! Error types for the protocol layer.
//!
//! Only decoding can fail: encoding a [`Command`](crate::Command) is plain
//! string concatenation. A `DecodeError` is never shown to the user; the
//! receive loop logs it and drops the line.

/// Why a received line is not a [`Message`](crate::Message).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The line was empty or whitespace only.
    #[error("blank line")]
    Blank,

    /// Fewer than the four `|`-separated fields were present.
    #[error("expected 4 fields, found {found}")]
    MissingFields { found: usize },

    /// The first field is not a known message type name.
    #[error("unknown message type {0:?}")]
    UnknownType(String),
}
