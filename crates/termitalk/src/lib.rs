//! # TermiTalk
//!
//! Core of a terminal chat client for a line-oriented TCP chat server.
//!
//! The facade wires the layers together: a [`TcpNetworkService`] speaking
//! the pipe-delimited wire format, a [`ChatController`] owning the
//! session state machine, and any [`ChatView`] to show the result. Drawing
//! the screen is left to the caller; [`ViewState`] holds everything a
//! renderer needs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use termitalk::prelude::*;
//!
//! # async fn demo() -> Result<(), TermitalkError> {
//! termitalk::init_tracing("info");
//!
//! let mut client = TermitalkClient::builder().port(9000).build_headless();
//! client.connect().await?;
//!
//! let (_intents_tx, mut intents) = tokio::sync::mpsc::unbounded_channel();
//! // Hand `_intents_tx` to the UI thread, then:
//! client.run(&mut intents).await;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::{SharedView, TermitalkClient, TermitalkClientBuilder};
pub use config::ClientConfig;
pub use error::TermitalkError;

pub use termitalk_client::{
    ChatController, ChatView, ClientError, ClientState, Feedback, Intent, MessageHistory,
    Screen, ViewState,
};
pub use termitalk_protocol::{
    Codec, Command, CommandType, DecodeError, Message, MessageType, PipeCodec, Room, User,
};
pub use termitalk_transport::{NetworkService, TcpNetworkService, TransportError};

use tracing_subscriber::EnvFilter;

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG`, falling
/// back to `default_filter` when the variable is unset or invalid.
///
/// Calling it again, or after another subscriber was installed, does
/// nothing.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Everything needed to build and drive a client.
pub mod prelude {
    pub use crate::{
        ChatView, ClientConfig, ClientState, Intent, Message, MessageType, Screen,
        SharedView, TermitalkClient, TermitalkError, ViewState,
    };
}
