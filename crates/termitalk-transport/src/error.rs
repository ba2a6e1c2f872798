/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the TCP stream failed (unreachable host, refused, ...).
    #[error("could not connect to {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// `connect` was called while a connection is still live.
    #[error("already connected")]
    AlreadyConnected,

    /// Writing a request line failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading from the server failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
