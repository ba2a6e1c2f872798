//! Connection management for TermiTalk.
//!
//! Provides the [`NetworkService`] trait the client controller talks to and
//! [`TcpNetworkService`], its implementation over a plain TCP stream.
//!
//! Inbound traffic is not handed over through a callback: the service is
//! given a [`MessageSender`] and pushes every decoded [`Message`] into it,
//! in wire order, from its receive task. Whoever owns the matching
//! receiver is the single consumer of server traffic.
//!
//! # Feature Flags
//!
//! - `tcp` (default): the tokio TCP implementation

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "tcp")]
mod tcp;

pub use error::TransportError;
#[cfg(feature = "tcp")]
pub use tcp::{TcpNetworkService, MAX_LINE_BYTES};

use std::fmt;

use termitalk_protocol::{Command, Message};
use tokio::sync::mpsc;

/// Channel end the receive loop delivers decoded messages into.
pub type MessageSender = mpsc::UnboundedSender<Message>;

/// Channel end a consumer reads delivered messages from.
pub type MessageReceiver = mpsc::UnboundedReceiver<Message>;

/// Opaque identifier for a connection, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A client-side connection to one chat server.
///
/// At most one connection is live at a time. Implementations must make
/// [`disconnect`](Self::disconnect) idempotent and safe to call from their
/// own receive loop.
pub trait NetworkService {
    /// Opens the connection and starts the receive loop.
    async fn connect(&self, host: &str, port: u16) -> Result<(), TransportError>;

    /// Queues one request for sending.
    ///
    /// Fire-and-forget: never blocks, and silently does nothing when not
    /// connected.
    fn send_request(&self, command: &Command);

    /// Closes the connection and stops the receive loop.
    ///
    /// The first call delivers a "disconnected" notice to the listener;
    /// later calls do nothing.
    fn disconnect(&self);

    /// Registers where inbound messages go, replacing any previous target.
    fn set_message_listener(&self, listener: MessageSender);

    /// Whether a connection is currently live.
    fn is_connected(&self) -> bool;
}
