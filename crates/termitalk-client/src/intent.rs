//! User intents: the view → controller interface as values.
//!
//! A UI thread that cannot call the controller directly sends these over a
//! channel instead; [`ChatController::handle_intent`](crate::ChatController::handle_intent)
//! maps each one to the matching operation.

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Connect to a server.
    Start { host: String, port: u16 },
    /// Log in with a username.
    Login(String),
    /// Refresh the lobby's room list.
    RequestRoomList,
    /// Create a room with this name.
    CreateRoom(String),
    /// Join a room; only the digits of the reference are used.
    JoinRoom(String),
    /// Say something in the current room.
    SendMessage(String),
    /// Leave the current room.
    LeaveRoom,
    /// Disconnect and stop.
    Shutdown,
}
