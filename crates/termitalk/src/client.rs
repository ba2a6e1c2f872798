//! `TermitalkClient` builder and event loop.
//!
//! This is the entry point for running a chat client. It ties together all
//! the layers: transport → protocol → client state → view.

use std::sync::{Arc, Mutex};

use termitalk_client::{ChatController, ChatView, ClientState, Intent, ViewState};
use termitalk_transport::TcpNetworkService;
use tokio::sync::mpsc;

use crate::{ClientConfig, TermitalkError};

/// A headless view shared between the client and a renderer.
pub type SharedView = Arc<Mutex<ViewState>>;

/// Builder for configuring a termitalk client.
///
/// # Example
///
/// ```rust,no_run
/// use termitalk::prelude::*;
///
/// # async fn demo() -> Result<(), TermitalkError> {
/// let mut client = TermitalkClient::builder()
///     .host("chat.example.org")
///     .port(9000)
///     .build_headless();
/// let view = client.view().clone();
///
/// let (intents_tx, mut intents) = tokio::sync::mpsc::unbounded_channel();
/// intents_tx.send(Intent::Start {
///     host: "chat.example.org".into(),
///     port: 9000,
/// }).ok();
/// client.run(&mut intents).await;
/// # drop(view);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TermitalkClientBuilder {
    config: ClientConfig,
}

impl TermitalkClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server host.
    pub fn host(mut self, host: &str) -> Self {
        self.config.host = host.to_string();
        self
    }

    /// Sets the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets how many messages the headless view keeps.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds a client that reports to `view`.
    pub fn build<V: ChatView>(self, view: V) -> TermitalkClient<V> {
        TermitalkClient {
            controller: ChatController::new(TcpNetworkService::new(), view),
            config: self.config,
        }
    }

    /// Builds a client that keeps its state in a [`ViewState`] sized by
    /// the configured history capacity.
    pub fn build_headless(self) -> TermitalkClient<SharedView> {
        let view = ViewState::with_history_capacity(self.config.history_capacity);
        self.build(Arc::new(Mutex::new(view)))
    }
}

/// A chat client over TCP.
///
/// Call [`connect()`](Self::connect) and then drive it with
/// [`run()`](Self::run), or step the [`controller`](Self::controller_mut)
/// by hand.
pub struct TermitalkClient<V: ChatView> {
    controller: ChatController<TcpNetworkService, V>,
    config: ClientConfig,
}

impl TermitalkClient<SharedView> {
    /// Creates a new builder.
    pub fn builder() -> TermitalkClientBuilder {
        TermitalkClientBuilder::new()
    }
}

impl<V: ChatView> TermitalkClient<V> {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> ClientState {
        self.controller.state()
    }

    pub fn view(&self) -> &V {
        self.controller.view()
    }

    pub fn controller(&self) -> &ChatController<TcpNetworkService, V> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ChatController<TcpNetworkService, V> {
        &mut self.controller
    }

    /// Connects to the configured endpoint.
    pub async fn connect(&mut self) -> Result<(), TermitalkError> {
        let ClientConfig { host, port, .. } = &self.config;
        self.controller.start(host, *port).await?;
        Ok(())
    }

    /// Runs the event loop until the user quits or the connection drops.
    ///
    /// Intents and server messages are handled one at a time, in arrival
    /// order, on the calling task. The loop ends on [`Intent::Shutdown`],
    /// when every intent sender is gone (both disconnect first), or once a
    /// connection loss has put the client back in `Disconnected`. There is
    /// no reconnect.
    pub async fn run(&mut self, intents: &mut mpsc::UnboundedReceiver<Intent>) {
        tracing::info!(host = %self.config.host, port = self.config.port, "client loop started");

        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(Intent::Shutdown) | None => {
                        self.controller.shutdown();
                        break;
                    }
                    Some(intent) => {
                        if let Err(e) = self.controller.handle_intent(intent).await {
                            tracing::debug!(error = %e, "intent not applied");
                        }
                    }
                },
                Some(message) = self.controller.next_inbound() => {
                    let before = self.controller.state();
                    self.controller.on_message(message);
                    if before != ClientState::Disconnected
                        && self.controller.state() == ClientState::Disconnected
                    {
                        tracing::info!("connection lost, leaving client loop");
                        break;
                    }
                }
            }
        }

        tracing::info!("client loop stopped");
    }
}
