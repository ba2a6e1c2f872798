//! Core protocol types for TermiTalk's wire format.
//!
//! Everything in this module either arrives from the server as one
//! pipe-delimited line ([`Message`]) or leaves the client as one
//! ([`Command`]). The display-only [`Room`] and [`User`] records describe
//! what the server echoed back about the session.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::DecodeError;

// ---------------------------------------------------------------------------
// MessageType
// ---------------------------------------------------------------------------

/// The kind of a server → client line, taken from its first field.
///
/// The wire names are the SCREAMING_SNAKE_CASE spellings (`OK`, `NOK`,
/// `SYSTEM`, ...). Parsing is case-sensitive: `ok|...` is not a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    /// Successful response to a client request.
    Ok,
    /// Error response to a client request.
    Nok,
    /// Server/system notification.
    System,
    /// Normal chat message in a room.
    User,
    /// Private message between users.
    Private,
    /// A client command. Servers never send these, but the name decodes.
    Command,
}

impl MessageType {
    /// Every variant, in wire order.
    pub const ALL: [MessageType; 6] = [
        MessageType::Ok,
        MessageType::Nok,
        MessageType::System,
        MessageType::User,
        MessageType::Private,
        MessageType::Command,
    ];

    /// The name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Ok => "OK",
            MessageType::Nok => "NOK",
            MessageType::System => "SYSTEM",
            MessageType::User => "USER",
            MessageType::Private => "PRIVATE",
            MessageType::Command => "COMMAND",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One decoded server → client line.
///
/// Messages are immutable once built: the fields are private and only
/// readable through accessors. `kind`, `sender` and `content` are always
/// present (possibly empty strings); `recipient` is `None` for broadcast
/// and system traffic. The wire carries no timestamp, so [`Message::new`]
/// stamps the moment of construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    kind: MessageType,
    sender: String,
    recipient: Option<String>,
    content: String,
    timestamp: SystemTime,
}

impl Message {
    /// Builds a message stamped with the current time.
    pub fn new(
        kind: MessageType,
        sender: impl Into<String>,
        recipient: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            sender: sender.into(),
            recipient,
            content: content.into(),
            timestamp: SystemTime::now(),
        }
    }

    /// Shorthand for a `SYSTEM` message with no recipient.
    pub fn system(
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(MessageType::System, sender, None, content)
    }

    pub fn kind(&self) -> MessageType {
        self.kind
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

// ---------------------------------------------------------------------------
// CommandType / Command
// ---------------------------------------------------------------------------

/// The kind of a client → server request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Login,
    Nick,
    ListRooms,
    CreateRoom,
    Join,
    Leave,
    Who,
    Msg,
    Privmsg,
    Quit,
    Help,
    /// Anything the client could not map to a real command.
    Unknown,
}

impl CommandType {
    /// The name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Login => "LOGIN",
            CommandType::Nick => "NICK",
            CommandType::ListRooms => "LIST_ROOMS",
            CommandType::CreateRoom => "CREATE_ROOM",
            CommandType::Join => "JOIN",
            CommandType::Leave => "LEAVE",
            CommandType::Who => "WHO",
            CommandType::Msg => "MSG",
            CommandType::Privmsg => "PRIVMSG",
            CommandType::Quit => "QUIT",
            CommandType::Help => "HELP",
            CommandType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request: a command type plus free-text payload.
///
/// Built by the controller, encoded by the connection manager. The payload
/// is sent as-is; see [`crate::Codec`] for why a `|` inside it is unsafe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    kind: CommandType,
    payload: String,
}

impl Command {
    pub fn new(kind: CommandType, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    pub fn login(username: impl Into<String>) -> Self {
        Self::new(CommandType::Login, username)
    }

    pub fn list_rooms() -> Self {
        Self::new(CommandType::ListRooms, "")
    }

    pub fn create_room(name: impl Into<String>) -> Self {
        Self::new(CommandType::CreateRoom, name)
    }

    pub fn join(room_id: impl Into<String>) -> Self {
        Self::new(CommandType::Join, room_id)
    }

    pub fn leave() -> Self {
        Self::new(CommandType::Leave, "")
    }

    pub fn msg(text: impl Into<String>) -> Self {
        Self::new(CommandType::Msg, text)
    }

    pub fn kind(&self) -> CommandType {
        self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

// ---------------------------------------------------------------------------
// Display-only records
// ---------------------------------------------------------------------------

/// A chat room as the client knows it: the id it asked to join and the
/// name the server confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub id: u64,
    pub name: String,
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[#{}] {}", self.id, self.name)
    }
}

/// The logged-in user.
///
/// The server never sends a numeric id for the user over this protocol,
/// so `id` stays 0 unless a caller fills it in from elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

impl User {
    /// A user known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// =========================================================================
// Tests
// =========================================================================
