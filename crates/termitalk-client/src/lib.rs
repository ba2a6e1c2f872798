//! Client-side session logic for termitalk.
//!
//! This crate sits between the network and whatever draws the screen:
//!
//! 1. **State machine**: [`ClientState`] and the pure [`transition`] table
//!    that decides how each server message moves it.
//! 2. **Controller**: [`ChatController`] validates user intents against
//!    the state, turns them into protocol commands, and applies the effects
//!    of inbound messages to a [`ChatView`].
//! 3. **Headless view**: [`ViewState`] and its bounded [`MessageHistory`],
//!    enough to drive a renderer or to assert on in tests.
//!
//! # How it fits in the stack
//!
//! ```text
//! UI (above)  ← implements ChatView, sends Intents
//!     ↕
//! Client Layer (this crate)  ← owns the session state
//!     ↕
//! Transport Layer (below)  ← NetworkService, delivers decoded Messages
//! ```

mod controller;
mod error;
mod history;
mod intent;
mod state;
mod transition;
mod view;

pub use controller::{ChatController, INVALID_ROOM_ID};
pub use error::ClientError;
pub use history::{MessageHistory, DEFAULT_HISTORY_CAPACITY};
pub use intent::Intent;
pub use state::{ClientState, Screen};
pub use transition::{is_socket_disconnect, transition, Effect, Transition};
pub use view::{ChatView, Feedback, ViewState};
