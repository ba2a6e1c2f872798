//! The inbound-message transition table.
//!
//! [`transition`] is a pure function from (current state, inbound message)
//! to (next state, effect). The controller applies the effect to the view;
//! keeping the decision separate makes every row testable on its own.
//!
//! Responses carry no status code or request id, so `OK` lines are told
//! apart by their text (see [`termitalk_protocol::replies`]). That is
//! fragile, but it is what the server speaks.

use termitalk_protocol::{replies, Message, MessageType, ServerReply};

use crate::ClientState;

/// What the controller must do after a message, besides changing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The connection dropped; show the reason where the login error goes.
    ConnectionLost(String),
    /// Put the message in the chat log.
    Append(Message),
    /// Login accepted; switch to the lobby.
    EnterLobby,
    /// Replace the lobby's room list.
    ReplaceRooms(Vec<String>),
    /// Join confirmed; enter the named room.
    EnterRoom { name: String },
    /// Leave confirmed; back to the lobby.
    LeftRoom,
    /// Login refused; show the server's reason.
    LoginRejected(String),
    /// Nothing to do.
    Ignore,
}

/// One row of the table: the state to move to and the effect to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ClientState,
    pub effect: Effect,
}

impl Transition {
    fn to(next: ClientState, effect: Effect) -> Self {
        Self { next, effect }
    }
}

/// Whether `message` is the marker the transport sends when the socket dies.
pub fn is_socket_disconnect(message: &Message) -> bool {
    message.kind() == MessageType::System
        && message.sender() == replies::SOCKET_DISCONNECT
}

/// Decides how `state` reacts to `message`.
pub fn transition(state: ClientState, message: Message) -> Transition {
    use ClientState::{Authenticated, AwaitingLogin, Connecting, Disconnected};

    if is_socket_disconnect(&message) {
        return Transition::to(
            Disconnected,
            Effect::ConnectionLost(message.content().to_string()),
        );
    }

    let stay = |effect| Transition::to(state, effect);

    match (state, message.kind()) {
        (Connecting, MessageType::Ok)
            if replies::is_welcome_banner(message.content()) =>
        {
            // The banner is shown on the login screen.
            Transition::to(AwaitingLogin, Effect::Append(message))
        }
        (AwaitingLogin, MessageType::Ok)
            if replies::is_login_success(message.content()) =>
        {
            Transition::to(Authenticated, Effect::EnterLobby)
        }
        (Authenticated, MessageType::Ok) => {
            match ServerReply::classify(message.content()) {
                ServerReply::RoomList(rooms) => stay(Effect::ReplaceRooms(rooms)),
                ServerReply::JoinedRoom(name) => stay(Effect::EnterRoom { name }),
                ServerReply::LeftRoom => stay(Effect::LeftRoom),
                ServerReply::Other => stay(Effect::Append(message)),
            }
        }
        (_, MessageType::Ok) => stay(Effect::Ignore),

        (AwaitingLogin, MessageType::Nok) => {
            stay(Effect::LoginRejected(message.content().to_string()))
        }
        (_, MessageType::Nok) => stay(Effect::Append(message)),

        (_, MessageType::System | MessageType::User | MessageType::Private) => {
            stay(Effect::Append(message))
        }
        (_, MessageType::Command) => stay(Effect::Ignore),
    }
}
