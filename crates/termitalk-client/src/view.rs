//! The controller → view boundary.
//!
//! The controller never draws anything. It tells a [`ChatView`] what
//! changed, and the view (a terminal UI, a test double, or the headless
//! [`ViewState`] below) decides how to present it.

use std::sync::{Arc, Mutex, PoisonError};

use termitalk_protocol::Message;

use crate::{MessageHistory, Screen};

/// What the controller can ask of the user interface.
///
/// All calls come from the controller's task, one at a time.
pub trait ChatView {
    /// Switch to another screen.
    fn show_screen(&mut self, screen: Screen);

    /// Replace the lobby's room list.
    fn update_room_list(&mut self, rooms: Vec<String>);

    /// Append one entry to the chat log.
    fn add_message(&mut self, message: Message);

    /// Show an error on the login screen. The typed username is expected
    /// to be cleared.
    fn show_login_error(&mut self, reason: &str);

    /// Name and id of the room just entered. `id` is `None` when the
    /// server confirmed a join the client never asked for.
    fn set_room_details(&mut self, name: &str, id: Option<&str>);

    /// Show a short-lived status line.
    fn show_feedback(&mut self, text: &str, is_error: bool);
}

/// Lets a render thread share a view with the controller.
impl<V: ChatView> ChatView for Arc<Mutex<V>> {
    fn show_screen(&mut self, screen: Screen) {
        self.lock().unwrap_or_else(PoisonError::into_inner).show_screen(screen);
    }

    fn update_room_list(&mut self, rooms: Vec<String>) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update_room_list(rooms);
    }

    fn add_message(&mut self, message: Message) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add_message(message);
    }

    fn show_login_error(&mut self, reason: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .show_login_error(reason);
    }

    fn set_room_details(&mut self, name: &str, id: Option<&str>) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_room_details(name, id);
    }

    fn show_feedback(&mut self, text: &str, is_error: bool) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .show_feedback(text, is_error);
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// A transient status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub is_error: bool,
}

/// Everything a renderer needs to draw the client, kept up to date by the
/// controller.
///
/// Entering the lobby or a room starts a fresh chat log, and a login error
/// clears the username being typed.
///
/// Not `Clone`: the history is a shared handle, so a copy would alias it.
/// Share the whole view behind `Arc<Mutex<_>>` instead.
#[derive(Debug, Default)]
pub struct ViewState {
    pub screen: Screen,
    pub rooms: Vec<String>,
    pub history: MessageHistory,
    pub login_error: Option<String>,
    pub username_input: String,
    pub room_name: Option<String>,
    pub room_id: Option<String>,
    pub feedback: Option<Feedback>,
}

impl ViewState {
    /// A view whose chat log keeps at most `capacity` messages.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            history: MessageHistory::new(capacity),
            ..Self::default()
        }
    }
}

impl ChatView for ViewState {
    fn show_screen(&mut self, screen: Screen) {
        self.screen = screen;
        match screen {
            Screen::Lobby => {
                self.history.clear();
                self.room_name = None;
                self.room_id = None;
            }
            Screen::Login => self.username_input.clear(),
            Screen::InRoom | Screen::Quit => {}
        }
    }

    fn update_room_list(&mut self, rooms: Vec<String>) {
        self.rooms = rooms;
    }

    fn add_message(&mut self, message: Message) {
        self.history.push(message);
    }

    fn show_login_error(&mut self, reason: &str) {
        self.login_error = Some(format!("ERROR: {reason}"));
        self.username_input.clear();
    }

    fn set_room_details(&mut self, name: &str, id: Option<&str>) {
        self.room_name = Some(name.to_string());
        self.room_id = id.map(str::to_string);
        self.history.clear();
    }

    fn show_feedback(&mut self, text: &str, is_error: bool) {
        self.feedback = Some(Feedback {
            text: text.to_string(),
            is_error,
        });
    }
}
