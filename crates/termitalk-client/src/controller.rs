//! The chat controller: turns user intents into requests and server
//! messages into state changes and view updates.
//!
//! The controller is the single owner of [`ClientState`]. Server traffic
//! reaches it through an mpsc channel whose sender is handed to the
//! network service on `start`; whoever drives the controller (usually
//! `termitalk::TermitalkClient::run`) pulls from that channel with
//! [`next_inbound`](ChatController::next_inbound) or
//! [`pump`](ChatController::pump) and feeds [`on_message`](ChatController::on_message).
//! Nothing else touches the state or the view.

use termitalk_protocol::{Command, Message, Room, User};
use termitalk_transport::{MessageReceiver, MessageSender, NetworkService};
use tokio::sync::mpsc;

use crate::transition::{transition, Effect};
use crate::{ChatView, ClientError, ClientState, Intent, Screen};

/// Feedback shown when a room reference has no digits in it.
pub const INVALID_ROOM_ID: &str = "Invalid Room ID format.";

/// Drives one chat session.
pub struct ChatController<N, V> {
    network: N,
    view: V,
    state: ClientState,

    /// The `#<digits>` id a `JOIN` is waiting to have confirmed.
    pending_room_id: Option<String>,
    /// Username from the last `LOGIN` sent.
    pending_username: Option<String>,
    current_user: Option<User>,
    current_room: Option<Room>,

    inbound_tx: MessageSender,
    inbound_rx: MessageReceiver,
}

impl<N: NetworkService, V: ChatView> ChatController<N, V> {
    pub fn new(network: N, view: V) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            network,
            view,
            state: ClientState::Disconnected,
            pending_room_id: None,
            pending_username: None,
            current_user: None,
            current_room: None,
            inbound_tx,
            inbound_rx,
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn pending_room_id(&self) -> Option<&str> {
        self.pending_room_id.as_deref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.current_room.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    // -----------------------------------------------------------------------
    // User intents
    // -----------------------------------------------------------------------

    /// Connects to `host:port`. Only valid while disconnected.
    ///
    /// # Errors
    /// [`ClientError::InvalidState`] if not disconnected (nothing happens),
    /// or [`ClientError::Connection`] if the connect failed, in which case
    /// the view has been shown the reason and the state is back to
    /// `Disconnected`.
    pub async fn start(&mut self, host: &str, port: u16) -> Result<(), ClientError> {
        self.require(ClientState::Disconnected, "connect")?;

        self.state = ClientState::Connecting;
        self.network.set_message_listener(self.inbound_tx.clone());

        match self.network.connect(host, port).await {
            Ok(()) => {
                tracing::info!(host, port, "waiting for welcome banner");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(host, port, error = %e, "connect failed");
                self.view.show_login_error(&format!("Connection failed: {e}"));
                self.state = ClientState::Disconnected;
                Err(ClientError::Connection(e))
            }
        }
    }

    /// Sends `LOGIN`. The state only advances when the server agrees.
    pub fn attempt_login(&mut self, username: &str) -> Result<(), ClientError> {
        self.require(ClientState::AwaitingLogin, "log in")?;
        self.pending_username = Some(username.to_string());
        self.network.send_request(&Command::login(username));
        Ok(())
    }

    /// Sends `CREATE_ROOM` followed by a room list refresh.
    pub fn create_room(&mut self, name: &str) -> Result<(), ClientError> {
        self.require(ClientState::Authenticated, "create a room")?;
        self.network.send_request(&Command::create_room(name));
        self.network.send_request(&Command::list_rooms());
        Ok(())
    }

    pub fn request_room_list(&mut self) -> Result<(), ClientError> {
        self.require(ClientState::Authenticated, "list rooms")?;
        self.network.send_request(&Command::list_rooms());
        Ok(())
    }

    /// Sends `JOIN` for the digits found in `room_ref`.
    ///
    /// `"room #42!"` joins room `42`. A reference without digits is
    /// reported to the view and never reaches the server.
    pub fn join_room(&mut self, room_ref: &str) -> Result<(), ClientError> {
        self.require(ClientState::Authenticated, "join a room")?;

        let room_id: String = room_ref.chars().filter(char::is_ascii_digit).collect();
        if room_id.is_empty() {
            self.view.show_feedback(INVALID_ROOM_ID, true);
            return Err(ClientError::InvalidRoomId(room_ref.to_string()));
        }

        self.pending_room_id = Some(format!("#{room_id}"));
        self.network.send_request(&Command::join(room_id));
        Ok(())
    }

    pub fn leave_room(&mut self) -> Result<(), ClientError> {
        self.require(ClientState::Authenticated, "leave a room")?;
        self.network.send_request(&Command::leave());
        Ok(())
    }

    pub fn send_message(&mut self, text: &str) -> Result<(), ClientError> {
        self.require(ClientState::Authenticated, "send a message")?;
        self.network.send_request(&Command::msg(text));
        Ok(())
    }

    /// Disconnects and forces `Disconnected`, whatever the current state,
    /// then shows the quit screen.
    pub fn shutdown(&mut self) {
        self.network.disconnect();
        self.state = ClientState::Disconnected;
        self.forget_session();
        self.view.show_screen(Screen::Quit);
        tracing::info!("client shut down");
    }

    /// Runs the operation an [`Intent`] names.
    pub async fn handle_intent(&mut self, intent: Intent) -> Result<(), ClientError> {
        match intent {
            Intent::Start { host, port } => self.start(&host, port).await,
            Intent::Login(username) => self.attempt_login(&username),
            Intent::RequestRoomList => self.request_room_list(),
            Intent::CreateRoom(name) => self.create_room(&name),
            Intent::JoinRoom(room_ref) => self.join_room(&room_ref),
            Intent::SendMessage(text) => self.send_message(&text),
            Intent::LeaveRoom => self.leave_room(),
            Intent::Shutdown => {
                self.shutdown();
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Server traffic
    // -----------------------------------------------------------------------

    /// Waits for the next message the network delivered.
    ///
    /// The controller keeps a sender alive itself, so this only returns
    /// `None` if the channel is somehow closed; normally it waits.
    pub async fn next_inbound(&mut self) -> Option<Message> {
        self.inbound_rx.recv().await
    }

    /// Applies every already-delivered message without waiting. Returns
    /// how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.inbound_rx.try_recv() {
            self.on_message(message);
            handled += 1;
        }
        handled
    }

    /// Applies one server message: state transition, then view update.
    pub fn on_message(&mut self, message: Message) {
        let previous = self.state;
        let step = transition(previous, message);
        self.state = step.next;

        if previous != step.next {
            tracing::debug!(from = %previous, to = %step.next, "state changed");
        }

        match step.effect {
            Effect::ConnectionLost(reason) => {
                tracing::info!(%reason, "connection lost");
                self.forget_session();
                self.view.show_login_error(&reason);
            }
            Effect::Append(message) => self.view.add_message(message),
            Effect::EnterLobby => {
                self.current_user = self.pending_username.take().map(User::named);
                self.enter_lobby();
            }
            Effect::ReplaceRooms(rooms) => self.view.update_room_list(rooms),
            Effect::EnterRoom { name } => {
                let pending = self.pending_room_id.take();
                self.current_room = pending
                    .as_deref()
                    .and_then(|id| id.trim_start_matches('#').parse().ok())
                    .map(|id| Room {
                        id,
                        name: name.clone(),
                    });
                self.view.set_room_details(&name, pending.as_deref());
                self.view.show_screen(Screen::InRoom);
            }
            Effect::LeftRoom => {
                self.current_room = None;
                self.enter_lobby();
            }
            Effect::LoginRejected(reason) => {
                self.pending_username = None;
                self.view.show_login_error(&reason);
            }
            Effect::Ignore => {}
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Shows the lobby and asks for a fresh room list.
    fn enter_lobby(&mut self) {
        self.view.show_screen(Screen::Lobby);
        self.network.send_request(&Command::list_rooms());
    }

    fn forget_session(&mut self) {
        self.pending_room_id = None;
        self.pending_username = None;
        self.current_user = None;
        self.current_room = None;
    }

    fn require(
        &self,
        wanted: ClientState,
        operation: &'static str,
    ) -> Result<(), ClientError> {
        if self.state == wanted {
            Ok(())
        } else {
            tracing::debug!(operation, state = %self.state, "ignoring intent");
            Err(ClientError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}
