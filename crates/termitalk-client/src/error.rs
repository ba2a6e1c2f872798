//! Error types for the client layer.

use termitalk_transport::TransportError;

use crate::ClientState;

/// Errors returned by [`ChatController`](crate::ChatController) operations.
///
/// None of these are fatal: the controller is always left in a usable
/// state, and the view has already been told whatever the user needs to
/// see.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Opening the connection failed. The state is back to `Disconnected`.
    #[error("connection failed: {0}")]
    Connection(#[from] TransportError),

    /// A room reference contained no digits, so no `JOIN` was sent.
    #[error("invalid room id {0:?}")]
    InvalidRoomId(String),

    /// The operation is not allowed in the current state. Nothing was sent.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: ClientState,
    },
}
