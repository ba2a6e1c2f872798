//! Recognized reply content.
//!
//! The protocol has no status codes and no request ids: the only way to
//! tell a room listing from a join confirmation is to look at the text of
//! an `OK` line. These prefixes and sentences are therefore part of the
//! wire contract and must match the server byte for byte.

/// Sender used for the message synthesized when the connection drops.
pub const SOCKET_DISCONNECT: &str = "SOCKET_DISCONNECT";

/// Sender used for notices the client generates itself.
pub const CLIENT_SENDER: &str = "CLIENT";

/// Content of the synthesized connection-lost message.
pub const CONNECTION_LOST: &str = "Connection lost to server.";

/// Content of the notice delivered once a connection is torn down.
pub const DISCONNECTED: &str = "You have been disconnected.";

/// Start of the banner the server sends right after accepting a socket.
pub const WELCOME_BANNER_PREFIX: &str = "Welcome!";

/// Start of the reply to a successful `LOGIN`.
pub const LOGIN_SUCCESS_PREFIX: &str = "Welcome,";

/// Start of the reply to `LIST_ROOMS`.
pub const ROOM_LIST_PREFIX: &str = "Available rooms:";

/// Start of the reply to a successful `JOIN`.
pub const JOINED_ROOM_PREFIX: &str = "Joined room:";

/// Exact reply to a successful `LEAVE`.
pub const LEFT_ROOM: &str = "You have left the room.";

/// Room name used when a join confirmation carries no quoted name.
pub const UNKNOWN_ROOM_NAME: &str = "Unknown";

/// Whether `content` is the greeting sent on connect.
pub fn is_welcome_banner(content: &str) -> bool {
    content.starts_with(WELCOME_BANNER_PREFIX)
}

/// Whether `content` confirms a login.
pub fn is_login_success(content: &str) -> bool {
    content.starts_with(LOGIN_SUCCESS_PREFIX)
}

/// The shape of an `OK` reply received while logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerReply {
    /// `Available rooms: r1, r2, ...` with entries trimmed, empties dropped.
    RoomList(Vec<String>),
    /// `Joined room: '<name>'`.
    JoinedRoom(String),
    /// `You have left the room.`
    LeftRoom,
    /// Anything else; shown to the user as-is.
    Other,
}

impl ServerReply {
    /// Classifies the content of an `OK` line.
    pub fn classify(content: &str) -> ServerReply {
        if let Some(rest) = content.strip_prefix(ROOM_LIST_PREFIX) {
            let rooms = rest
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
            ServerReply::RoomList(rooms)
        } else if content.starts_with(JOINED_ROOM_PREFIX) {
            let name = first_quoted(content).unwrap_or(UNKNOWN_ROOM_NAME);
            ServerReply::JoinedRoom(name.to_string())
        } else if content == LEFT_ROOM {
            ServerReply::LeftRoom
        } else {
            ServerReply::Other
        }
    }
}

/// Returns the text between the first pair of single quotes.
fn first_quoted(content: &str) -> Option<&str> {
    let (_, after_open) = content.split_once('\'')?;
    let (inner, _) = after_open.split_once('\'')?;
    Some(inner)
}
