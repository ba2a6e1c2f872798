//! Wire protocol for TermiTalk.
//!
//! This crate defines the "language" the client and the chat server speak:
//!
//! - **Types** ([`Message`], [`Command`], [`MessageType`], [`CommandType`],
//!   [`Room`], [`User`]): the records that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`PipeCodec`]): how those records are
//!   converted to and from text lines.
//! - **Replies** ([`replies`]): the reply texts the client must recognize,
//!   since the protocol carries no status codes.
//! - **Errors** ([`DecodeError`]): why a line could not be decoded.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (lines on a socket) and the
//! client state machine. It does no I/O and holds no state.
//!
//! ```text
//! Transport (lines) → Protocol (Message) → Client (ClientState, view)
//! ```

mod codec;
mod error;
pub mod replies;
mod types;

pub use codec::{Codec, PipeCodec, DELIMITER, REQUEST_PREFIX};
pub use error::DecodeError;
pub use replies::ServerReply;
pub use types::{Command, CommandType, Message, MessageType, Room, User};
