//! Client configuration.

use serde::{Deserialize, Serialize};
use termitalk_client::DEFAULT_HISTORY_CAPACITY;

/// Where to connect and how much chat to keep.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,

    /// Server TCP port.
    pub port: u16,

    /// Messages kept in the chat log before the oldest is dropped.
    pub history_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9000,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
