//! Unified error type for termitalk.

use termitalk_client::ClientError;
use termitalk_protocol::DecodeError;
use termitalk_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `termitalk` facade you deal with this single error type
/// instead of importing errors from each sub-crate. `#[from]` on each
/// variant lets `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TermitalkError {
    /// A transport-level error (connect, send, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A line that could not be decoded.
    #[error(transparent)]
    Protocol(#[from] DecodeError),

    /// A controller operation that was refused or failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}
