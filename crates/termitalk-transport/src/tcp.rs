//! Line-oriented TCP transport using tokio.
//!
//! A live connection is two tasks sharing one socket:
//!
//! ```text
//!   send_request ──(mpsc)──→ writer task ──→ OwnedWriteHalf
//!   listener    ←──(mpsc)─── reader task ←── OwnedReadHalf
//! ```
//!
//! The reader is the only place that reads the socket. Each connection has
//! its own `running` latch: whoever flips it from `true` to `false` (the
//! controller, the reader on EOF, or the writer on a failed write) owns the
//! close-and-notify sequence, so the notices are delivered exactly once.
//! Tasks only ever tear down the connection they were spawned for, and a
//! closed connection has both of its tasks aborted, so nothing left over
//! from an old connection can touch a newer one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use termitalk_protocol::{
    replies, Codec, Command, Message, PipeCodec,
};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{
    ConnectionId, MessageSender, NetworkService, TransportError,
};

/// Longest inbound line accepted, terminator included. Longer lines are
/// skipped up to their next `\n`.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A [`NetworkService`] speaking newline-terminated lines over TCP.
///
/// Must be used from within a tokio runtime: `connect` spawns the reader
/// and writer tasks onto the current runtime.
pub struct TcpNetworkService<C: Codec = PipeCodec> {
    shared: Arc<Shared<C>>,
}

/// State shared between the service handle and its tasks.
struct Shared<C> {
    codec: C,
    listener: Mutex<Option<MessageSender>>,
    session: Mutex<Option<LiveSession>>,
}

/// Handles for one connection.
///
/// Dropping it aborts both tasks. The tasks own the socket halves, so
/// that closes the socket, even with writes still queued.
struct LiveSession {
    id: ConnectionId,
    running: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl LiveSession {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

/// What a connection's tasks know about it.
#[derive(Clone)]
struct Link {
    id: ConnectionId,
    running: Arc<AtomicBool>,
}

impl TcpNetworkService<PipeCodec> {
    /// Creates a disconnected service using the standard line codec.
    pub fn new() -> Self {
        Self::with_codec(PipeCodec)
    }
}

impl Default for TcpNetworkService<PipeCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> TcpNetworkService<C> {
    /// Creates a disconnected service using the given codec.
    pub fn with_codec(codec: C) -> Self {
        Self {
            shared: Arc::new(Shared {
                codec,
                listener: Mutex::new(None),
                session: Mutex::new(None),
            }),
        }
    }

    /// The id of the live connection, if any.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        lock(&self.shared.session)
            .as_ref()
            .filter(|s| s.is_running())
            .map(|s| s.id)
    }
}

impl<C: Codec> NetworkService for TcpNetworkService<C> {
    async fn connect(&self, host: &str, port: u16) -> Result<(), TransportError> {
        if self.is_connected() {
            return Err(TransportError::AlreadyConnected);
        }

        let stream = TcpStream::connect((host, port)).await.map_err(|source| {
            TransportError::ConnectFailed {
                addr: format!("{host}:{port}"),
                source,
            }
        })?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "could not disable Nagle");
        }
        let (read_half, write_half) = stream.into_split();

        let link = Link {
            id: ConnectionId::new(
                NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            ),
            running: Arc::new(AtomicBool::new(true)),
        };
        let id = link.id;
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        // Hold the session lock while spawning so a reader that hits EOF
        // immediately cannot look for its session before it is stored.
        let mut session = lock(&self.shared.session);
        if session.as_ref().is_some_and(LiveSession::is_running) {
            // Another connect won the race while we were dialing.
            return Err(TransportError::AlreadyConnected);
        }
        let reader = tokio::spawn(receive_loop(
            Arc::clone(&self.shared),
            read_half,
            link.clone(),
        ));
        let writer = tokio::spawn(write_loop(
            Arc::clone(&self.shared),
            write_half,
            outbound_rx,
            link.clone(),
        ));
        // A previous session whose loss is still being reported is
        // replaced here; dropping it aborts whatever is left of it.
        *session = Some(LiveSession {
            id,
            running: link.running,
            outbound: outbound_tx,
            reader,
            writer,
        });
        drop(session);

        tracing::info!(%id, host, port, "connected to chat server");
        Ok(())
    }

    fn send_request(&self, command: &Command) {
        let session = lock(&self.shared.session);
        let Some(live) = session.as_ref().filter(|s| s.is_running()) else {
            tracing::debug!(kind = %command.kind(), "not connected, request dropped");
            return;
        };

        let mut line = self.shared.codec.encode(command);
        line.push('\n');
        if live.outbound.send(line).is_err() {
            tracing::debug!(id = %live.id, "writer gone, request dropped");
        }
    }

    fn disconnect(&self) {
        self.shared.disconnect();
    }

    fn set_message_listener(&self, listener: MessageSender) {
        *lock(&self.shared.listener) = Some(listener);
    }

    fn is_connected(&self) -> bool {
        lock(&self.shared.session)
            .as_ref()
            .is_some_and(LiveSession::is_running)
    }
}

impl<C: Codec> Drop for TcpNetworkService<C> {
    fn drop(&mut self) {
        self.shared.disconnect();
    }
}

impl<C: Codec> Shared<C> {
    /// Hands a message to the registered listener, if any.
    fn deliver(&self, message: Message) {
        if let Some(listener) = lock(&self.listener).as_ref() {
            if listener.send(message).is_err() {
                tracing::debug!("listener closed, message dropped");
            }
        }
    }

    /// Local teardown of whatever connection is live. Only the first
    /// caller gets past that connection's latch.
    fn disconnect(&self) {
        let session = {
            let mut slot = lock(&self.session);
            let won = slot
                .as_ref()
                .is_some_and(|s| s.running.swap(false, Ordering::AcqRel));
            if won { slot.take() } else { None }
        };
        if let Some(session) = session {
            self.close(session);
        }
    }

    /// Teardown after connection `link` failed underneath us. Only the
    /// first caller gets past the latch, and only it reports the loss.
    fn connection_lost(&self, link: &Link) {
        if !link.running.swap(false, Ordering::AcqRel) {
            return;
        }

        // The slot may already hold a newer connection; leave that alone.
        let session = {
            let mut slot = lock(&self.session);
            if slot.as_ref().is_some_and(|s| s.id == link.id) {
                slot.take()
            } else {
                None
            }
        };

        self.deliver(Message::system(
            replies::SOCKET_DISCONNECT,
            replies::CONNECTION_LOST,
        ));
        match session {
            Some(session) => self.close(session),
            None => self.deliver(Message::system(
                replies::CLIENT_SENDER,
                replies::DISCONNECTED,
            )),
        }
    }

    /// Closes the socket and emits the final notice. Callers must have
    /// won the session's latch.
    fn close(&self, session: LiveSession) {
        let id = session.id;
        drop(session);
        tracing::info!(%id, "disconnected from chat server");
        self.deliver(Message::system(
            replies::CLIENT_SENDER,
            replies::DISCONNECTED,
        ));
    }
}

/// Reads lines until EOF, error, or abort, delivering decodable ones.
async fn receive_loop<C: Codec>(
    shared: Arc<Shared<C>>,
    read_half: OwnedReadHalf,
    link: Link,
) {
    let id = link.id;
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::with_capacity(512);
    // Set while skipping the rest of an oversized line.
    let mut skipping = false;

    while link.running.load(Ordering::Acquire) {
        buf.clear();
        let read = (&mut reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await;
        match read {
            Ok(0) => {
                tracing::info!(%id, "server closed the connection");
                break;
            }
            Ok(n) => {
                let complete = buf.last() == Some(&b'\n');
                if skipping {
                    skipping = !complete;
                    continue;
                }
                if !complete && n == MAX_LINE_BYTES {
                    tracing::debug!(%id, limit = MAX_LINE_BYTES, "skipping oversized line");
                    skipping = true;
                    continue;
                }

                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                match shared.codec.decode(line) {
                    Ok(message) => shared.deliver(message),
                    Err(e) => {
                        tracing::debug!(%id, error = %e, line, "dropping undecodable line");
                    }
                }
            }
            Err(e) => {
                let err = TransportError::ReceiveFailed(e);
                tracing::warn!(%id, error = %err, "read failed");
                break;
            }
        }
    }

    shared.connection_lost(&link);
}

/// Writes queued lines until the queue closes or a write fails.
async fn write_loop<C: Codec, W: AsyncWrite + Unpin>(
    shared: Arc<Shared<C>>,
    mut write_half: W,
    mut outbound: mpsc::UnboundedReceiver<String>,
    link: Link,
) {
    while let Some(line) = outbound.recv().await {
        if let Err(e) = write_half.write_all(line.as_bytes()).await {
            let err = TransportError::SendFailed(e);
            tracing::warn!(id = %link.id, error = %err, "write failed");
            shared.connection_lost(&link);
            return;
        }
    }
}

/// Locks a mutex, recovering the data if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
