//! Session state and view screens.

use std::fmt;

// ---------------------------------------------------------------------------
// ClientState
// ---------------------------------------------------------------------------

/// Where the client is in the connection/login sequence.
///
/// ```text
///   Disconnected ──start──→ Connecting ──banner──→ AwaitingLogin ──login ok──→ Authenticated
///        ↑                      │                        │                         │
///        └──────────────────────┴──── connection lost / shutdown ─────────────────┘
/// ```
///
/// Only the controller mutates this, either because the user asked it to
/// (`start`, `shutdown`) or because of a server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientState {
    /// No connection. Only `start` does anything here.
    #[default]
    Disconnected,

    /// Socket open, waiting for the server's welcome banner.
    Connecting,

    /// Banner received; a `LOGIN` may be sent.
    AwaitingLogin,

    /// Logged in. Lobby and room operations are allowed.
    Authenticated,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClientState::Disconnected => "disconnected",
            ClientState::Connecting => "connecting",
            ClientState::AwaitingLogin => "awaiting login",
            ClientState::Authenticated => "authenticated",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// The page the view should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Username prompt.
    #[default]
    Login,
    /// Room list.
    Lobby,
    /// Inside a room, chatting.
    InRoom,
    /// The user is quitting.
    Quit,
}
