//! Controller tests against an in-memory network and a recording view.

use std::sync::{Arc, Mutex};

use termitalk_client::{
    ChatController, ChatView, ClientError, ClientState, Intent, Screen, ViewState,
};
use termitalk_protocol::{
    replies, Codec, Command, CommandType, Message, MessageType, PipeCodec,
};
use termitalk_transport::{MessageSender, NetworkService, TransportError};

// =========================================================================
// Fakes
// =========================================================================

/// Records every request and lets the test push inbound messages through
/// the listener the controller registered.
#[derive(Clone, Default)]
struct FakeNetwork {
    sent: Arc<Mutex<Vec<Command>>>,
    listener: Arc<Mutex<Option<MessageSender>>>,
    refuse_connect: bool,
    disconnects: Arc<Mutex<usize>>,
}

impl FakeNetwork {
    fn refusing() -> Self {
        Self {
            refuse_connect: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<Command> {
        self.sent.lock().unwrap().clone()
    }

    fn clear_sent(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn deliver(&self, raw: &str) {
        let message = PipeCodec.decode(raw).unwrap();
        self.listener
            .lock()
            .unwrap()
            .as_ref()
            .expect("listener registered")
            .send(message)
            .unwrap();
    }
}

impl NetworkService for FakeNetwork {
    async fn connect(&self, host: &str, port: u16) -> Result<(), TransportError> {
        if self.refuse_connect {
            return Err(TransportError::ConnectFailed {
                addr: format!("{host}:{port}"),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(())
    }

    fn send_request(&self, command: &Command) {
        self.sent.lock().unwrap().push(command.clone());
    }

    fn disconnect(&self) {
        *self.disconnects.lock().unwrap() += 1;
    }

    fn set_message_listener(&self, listener: MessageSender) {
        *self.listener.lock().unwrap() = Some(listener);
    }

    fn is_connected(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ViewCall {
    Screen(Screen),
    Rooms(Vec<String>),
    Message(MessageType, String),
    LoginError(String),
    RoomDetails(String, Option<String>),
    Feedback(String, bool),
}

#[derive(Default)]
struct RecordingView {
    calls: Vec<ViewCall>,
}

impl ChatView for RecordingView {
    fn show_screen(&mut self, screen: Screen) {
        self.calls.push(ViewCall::Screen(screen));
    }

    fn update_room_list(&mut self, rooms: Vec<String>) {
        self.calls.push(ViewCall::Rooms(rooms));
    }

    fn add_message(&mut self, message: Message) {
        self.calls
            .push(ViewCall::Message(message.kind(), message.content().to_string()));
    }

    fn show_login_error(&mut self, reason: &str) {
        self.calls.push(ViewCall::LoginError(reason.to_string()));
    }

    fn set_room_details(&mut self, name: &str, id: Option<&str>) {
        self.calls
            .push(ViewCall::RoomDetails(name.to_string(), id.map(str::to_string)));
    }

    fn show_feedback(&mut self, text: &str, is_error: bool) {
        self.calls.push(ViewCall::Feedback(text.to_string(), is_error));
    }
}

type Controller = ChatController<FakeNetwork, RecordingView>;

fn line(raw: &str) -> Message {
    PipeCodec.decode(raw).unwrap()
}

fn commands(sent: &[Command]) -> Vec<(CommandType, &str)> {
    sent.iter().map(|c| (c.kind(), c.payload())).collect()
}

async fn connected() -> (Controller, FakeNetwork) {
    let network = FakeNetwork::default();
    let mut controller = ChatController::new(network.clone(), RecordingView::default());
    controller.start("127.0.0.1", 9000).await.unwrap();
    (controller, network)
}

async fn logged_in() -> (Controller, FakeNetwork) {
    let (mut controller, network) = connected().await;
    controller.on_message(line("OK|srv||Welcome! to server"));
    controller.attempt_login("bob").unwrap();
    controller.on_message(line("OK|srv||Welcome, bob"));
    assert_eq!(controller.state(), ClientState::Authenticated);
    network.clear_sent();
    controller.view_mut().calls.clear();
    (controller, network)
}

// =========================================================================
// Connecting and login
// =========================================================================

#[tokio::test]
async fn test_start_moves_to_connecting() {
    let (controller, network) = connected().await;
    assert_eq!(controller.state(), ClientState::Connecting);
    assert!(network.is_connected());
    assert!(network.sent().is_empty());
}

#[tokio::test]
async fn test_failed_start_reports_and_stays_disconnected() {
    let network = FakeNetwork::refusing();
    let mut controller = ChatController::new(network, RecordingView::default());

    let err = controller.start("127.0.0.1", 1).await.unwrap_err();

    assert!(matches!(err, ClientError::Connection(_)));
    assert_eq!(controller.state(), ClientState::Disconnected);
    match &controller.view().calls[..] {
        [ViewCall::LoginError(reason)] => {
            assert!(reason.starts_with("Connection failed: "), "{reason}")
        }
        other => panic!("unexpected view calls: {other:?}"),
    }
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let (mut controller, _network) = connected().await;
    let err = controller.start("127.0.0.1", 9000).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::InvalidState {
            state: ClientState::Connecting,
            ..
        }
    ));
}

#[tokio::test]
async fn test_login_flow_reaches_lobby() {
    let (mut controller, network) = connected().await;

    controller.on_message(line("OK|srv||Welcome! to server"));
    assert_eq!(controller.state(), ClientState::AwaitingLogin);

    controller.attempt_login("bob").unwrap();
    assert_eq!(commands(&network.sent()), [(CommandType::Login, "bob")]);
    assert_eq!(controller.state(), ClientState::AwaitingLogin);

    controller.on_message(line("OK|srv||Welcome, bob"));

    assert_eq!(controller.state(), ClientState::Authenticated);
    assert_eq!(controller.current_user().map(|u| u.name.as_str()), Some("bob"));
    assert_eq!(
        controller.view().calls,
        [
            ViewCall::Message(MessageType::Ok, "Welcome! to server".into()),
            ViewCall::Screen(Screen::Lobby),
        ]
    );
    assert_eq!(
        commands(&network.sent()),
        [(CommandType::Login, "bob"), (CommandType::ListRooms, "")]
    );
}

#[tokio::test]
async fn test_rejected_login_shows_reason_and_allows_retry() {
    let (mut controller, network) = connected().await;
    controller.on_message(line("OK|srv||Welcome! to server"));
    controller.attempt_login("b0b!").unwrap();

    controller.on_message(line("NOK|srv||Invalid username"));

    assert_eq!(controller.state(), ClientState::AwaitingLogin);
    assert_eq!(
        controller.view().calls.last(),
        Some(&ViewCall::LoginError("Invalid username".into()))
    );
    assert!(controller.current_user().is_none());

    controller.attempt_login("bob").unwrap();
    assert_eq!(network.sent().len(), 2);
}

#[tokio::test]
async fn test_login_before_banner_is_rejected() {
    let (mut controller, network) = connected().await;
    let err = controller.attempt_login("bob").unwrap_err();
    assert!(matches!(err, ClientError::InvalidState { .. }));
    assert!(network.sent().is_empty());
}

// =========================================================================
// Invalid-state no-ops
// =========================================================================

#[test]
fn test_operations_while_disconnected_send_nothing() {
    let network = FakeNetwork::default();
    let mut controller = ChatController::new(network.clone(), RecordingView::default());

    assert!(controller.attempt_login("bob").is_err());
    assert!(controller.create_room("x").is_err());
    assert!(controller.request_room_list().is_err());
    assert!(controller.join_room("42").is_err());
    assert!(controller.leave_room().is_err());
    assert!(controller.send_message("hi").is_err());

    assert!(network.sent().is_empty());
    assert!(controller.view().calls.is_empty());
    assert_eq!(controller.state(), ClientState::Disconnected);
}

#[tokio::test]
async fn test_room_operations_require_authentication() {
    let (mut controller, network) = connected().await;
    controller.on_message(line("OK|srv||Welcome! to server"));

    let err = controller.send_message("hi").unwrap_err();
    assert_eq!(err.to_string(), "cannot send a message while awaiting login");
    assert!(network.sent().is_empty());
}

// =========================================================================
// Lobby and rooms
// =========================================================================

#[tokio::test]
async fn test_create_room_sends_create_then_list() {
    let (mut controller, network) = logged_in().await;
    controller.create_room("Arena").unwrap();
    assert_eq!(
        commands(&network.sent()),
        [(CommandType::CreateRoom, "Arena"), (CommandType::ListRooms, "")]
    );
}

#[tokio::test]
async fn test_room_list_reply_updates_view() {
    let (mut controller, _network) = logged_in().await;
    controller.on_message(line("OK|srv||Available rooms: [#1] a, [#2] b"));
    assert_eq!(
        controller.view().calls,
        [ViewCall::Rooms(vec!["[#1] a".into(), "[#2] b".into()])]
    );
}

#[tokio::test]
async fn test_join_uses_digits_only() {
    let (mut controller, network) = logged_in().await;

    controller.join_room("room #42!").unwrap();

    assert_eq!(commands(&network.sent()), [(CommandType::Join, "42")]);
    assert_eq!(controller.pending_room_id(), Some("#42"));
    assert_eq!(
        PipeCodec.encode(&network.sent()[0]),
        "REQ|JOIN|42"
    );
}

#[tokio::test]
async fn test_join_without_digits_is_refused_locally() {
    let (mut controller, network) = logged_in().await;

    let err = controller.join_room("lobby").unwrap_err();

    assert!(matches!(err, ClientError::InvalidRoomId(ref r) if r == "lobby"));
    assert!(network.sent().is_empty());
    assert_eq!(controller.pending_room_id(), None);
    assert_eq!(
        controller.view().calls,
        [ViewCall::Feedback("Invalid Room ID format.".into(), true)]
    );
}

#[tokio::test]
async fn test_join_confirmation_enters_room() {
    let (mut controller, _network) = logged_in().await;
    controller.join_room("42").unwrap();

    controller.on_message(line("OK|srv||Joined room: 'Arena'"));

    assert_eq!(controller.state(), ClientState::Authenticated);
    assert_eq!(controller.pending_room_id(), None);
    let room = controller.current_room().unwrap();
    assert_eq!((room.id, room.name.as_str()), (42, "Arena"));
    assert_eq!(
        controller.view().calls,
        [
            ViewCall::RoomDetails("Arena".into(), Some("#42".into())),
            ViewCall::Screen(Screen::InRoom),
        ]
    );
}

#[tokio::test]
async fn test_unsolicited_join_has_no_id() {
    let (mut controller, _network) = logged_in().await;
    controller.on_message(line("OK|srv||Joined room: no quotes"));
    assert_eq!(
        controller.view().calls[0],
        ViewCall::RoomDetails("Unknown".into(), None)
    );
    assert!(controller.current_room().is_none());
}

#[tokio::test]
async fn test_leave_confirmation_returns_to_lobby() {
    let (mut controller, network) = logged_in().await;
    controller.join_room("7").unwrap();
    controller.on_message(line("OK|srv||Joined room: 'x'"));
    controller.leave_room().unwrap();
    network.clear_sent();
    controller.view_mut().calls.clear();

    controller.on_message(line("OK|srv||You have left the room."));

    assert!(controller.current_room().is_none());
    assert_eq!(controller.view().calls, [ViewCall::Screen(Screen::Lobby)]);
    assert_eq!(commands(&network.sent()), [(CommandType::ListRooms, "")]);
}

#[tokio::test]
async fn test_chat_and_unrecognised_ok_are_appended() {
    let (mut controller, network) = logged_in().await;
    controller.send_message("hello").unwrap();
    assert_eq!(commands(&network.sent()), [(CommandType::Msg, "hello")]);

    controller.on_message(line("USER|alice|Arena|hi bob"));
    controller.on_message(line("OK|srv||Room 'x' created."));
    controller.on_message(line("NOK|srv||No such room"));

    assert_eq!(
        controller.view().calls,
        [
            ViewCall::Message(MessageType::User, "hi bob".into()),
            ViewCall::Message(MessageType::Ok, "Room 'x' created.".into()),
            ViewCall::Message(MessageType::Nok, "No such room".into()),
        ]
    );
}

// =========================================================================
// Disconnects
// =========================================================================

#[tokio::test]
async fn test_socket_disconnect_resets_from_any_state() {
    let (mut controller, _network) = logged_in().await;
    controller.join_room("3").unwrap();

    controller.on_message(Message::system(
        replies::SOCKET_DISCONNECT,
        replies::CONNECTION_LOST,
    ));

    assert_eq!(controller.state(), ClientState::Disconnected);
    assert!(controller.current_user().is_none());
    assert_eq!(controller.pending_room_id(), None);
    assert_eq!(
        controller.view().calls,
        [ViewCall::LoginError("Connection lost to server.".into())]
    );
}

#[tokio::test]
async fn test_can_start_again_after_connection_loss() {
    let (mut controller, _network) = connected().await;
    controller.on_message(line("SYSTEM|SOCKET_DISCONNECT||Connection lost to server."));
    controller.start("127.0.0.1", 9000).await.unwrap();
    assert_eq!(controller.state(), ClientState::Connecting);
}

#[tokio::test]
async fn test_shutdown_forces_disconnected() {
    let (mut controller, network) = logged_in().await;
    controller.join_room("5").unwrap();

    controller.shutdown();

    assert_eq!(controller.state(), ClientState::Disconnected);
    assert_eq!(*network.disconnects.lock().unwrap(), 1);
    assert_eq!(controller.pending_room_id(), None);
    assert!(controller.current_user().is_none());
    assert!(controller.current_room().is_none());
    assert_eq!(controller.view().calls.last(), Some(&ViewCall::Screen(Screen::Quit)));
}

// =========================================================================
// Intents and the inbound channel
// =========================================================================

#[tokio::test]
async fn test_intents_map_to_operations() {
    let network = FakeNetwork::default();
    let mut controller = ChatController::new(network.clone(), RecordingView::default());

    controller
        .handle_intent(Intent::Start {
            host: "127.0.0.1".into(),
            port: 9000,
        })
        .await
        .unwrap();
    controller.on_message(line("OK|srv||Welcome! hi"));
    controller
        .handle_intent(Intent::Login("bob".into()))
        .await
        .unwrap();
    controller.on_message(line("OK|srv||Welcome, bob"));

    for intent in [
        Intent::RequestRoomList,
        Intent::CreateRoom("Arena".into()),
        Intent::JoinRoom("#9".into()),
        Intent::SendMessage("hey".into()),
        Intent::LeaveRoom,
    ] {
        controller.handle_intent(intent).await.unwrap();
    }
    controller.handle_intent(Intent::Shutdown).await.unwrap();

    assert_eq!(
        commands(&network.sent()),
        [
            (CommandType::Login, "bob"),
            (CommandType::ListRooms, ""),
            (CommandType::ListRooms, ""),
            (CommandType::CreateRoom, "Arena"),
            (CommandType::ListRooms, ""),
            (CommandType::Join, "9"),
            (CommandType::Msg, "hey"),
            (CommandType::Leave, ""),
        ]
    );
    assert_eq!(controller.state(), ClientState::Disconnected);
}

#[tokio::test]
async fn test_pump_applies_delivered_messages_in_order() {
    let (mut controller, network) = connected().await;

    network.deliver("OK|srv||Welcome! to server");
    network.deliver("SYSTEM|srv||motd");

    assert_eq!(controller.pump(), 2);
    assert_eq!(controller.state(), ClientState::AwaitingLogin);
    assert_eq!(
        controller.view().calls,
        [
            ViewCall::Message(MessageType::Ok, "Welcome! to server".into()),
            ViewCall::Message(MessageType::System, "motd".into()),
        ]
    );
    assert_eq!(controller.pump(), 0);
}

#[tokio::test]
async fn test_next_inbound_returns_delivered_message() {
    let (mut controller, network) = connected().await;
    network.deliver("USER|alice||hi");
    let message = controller.next_inbound().await.unwrap();
    assert_eq!(message.sender(), "alice");
}

#[tokio::test]
async fn test_drives_headless_view() {
    let network = FakeNetwork::default();
    let mut controller = ChatController::new(network.clone(), ViewState::default());
    controller.start("127.0.0.1", 9000).await.unwrap();
    controller.on_message(line("OK|srv||Welcome! to server"));
    assert_eq!(controller.view().history.len(), 1);

    controller.attempt_login("bob").unwrap();
    controller.on_message(line("OK|srv||Welcome, bob"));
    controller.on_message(line("OK|srv||Available rooms: [#1] Arena"));
    controller.join_room("1").unwrap();
    controller.on_message(line("OK|srv||Joined room: 'Arena'"));
    controller.on_message(line("USER|alice|Arena|hi"));

    let view = controller.view();
    assert_eq!(view.screen, Screen::InRoom);
    assert_eq!(view.rooms, ["[#1] Arena"]);
    assert_eq!(view.room_name.as_deref(), Some("Arena"));
    assert_eq!(view.room_id.as_deref(), Some("#1"));
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.history.snapshot()[0].content(), "hi");
}
