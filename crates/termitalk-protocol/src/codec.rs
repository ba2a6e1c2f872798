//! Codec trait and the pipe-delimited line codec.
//!
//! A codec converts between protocol types and single text lines. The
//! connection manager only needs something implementing [`Codec`]; framing
//! (the trailing newline) is the transport's job, not the codec's.
//!
//! The wire grammar:
//!
//! ```text
//! client → server:  REQ|<COMMAND_TYPE>|<payload>
//! server → client:  <MESSAGE_TYPE>|<sender>|<recipient-or-empty>|<content>
//! ```
//!
//! Nothing is escaped. A payload containing `|` reaches the server as
//! extra fields, and server content containing `|` survives only because
//! decoding stops splitting after the fourth field.

use crate::{Command, DecodeError, Message};

/// Prefix of every client → server line.
pub const REQUEST_PREFIX: &str = "REQ";

/// Field separator in both directions.
pub const DELIMITER: char = '|';

/// Number of fields in a server → client line.
const MESSAGE_FIELDS: usize = 4;

/// Converts commands to lines and lines to messages.
///
/// `Send + Sync + 'static` because the codec is shared between the
/// controller's send path and the receive task.
pub trait Codec: Send + Sync + 'static {
    /// Renders a command as one line, without a line terminator.
    fn encode(&self, command: &Command) -> String;

    /// Parses one line (terminator already stripped) into a message.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] for blank lines, lines with fewer than
    /// four fields, and unknown message types. Never panics.
    fn decode(&self, line: &str) -> Result<Message, DecodeError>;
}

// ---------------------------------------------------------------------------
// PipeCodec
// ---------------------------------------------------------------------------

/// The [`Codec`] for TermiTalk's `|`-delimited text protocol.
///
/// ## Example
///
/// ```rust
/// use termitalk_protocol::{Codec, Command, MessageType, PipeCodec};
///
/// let codec = PipeCodec;
/// assert_eq!(codec.encode(&Command::login("bob")), "REQ|LOGIN|bob");
///
/// let msg = codec.decode("USER|alice|lobby|hi there").unwrap();
/// assert_eq!(msg.kind(), MessageType::User);
/// assert_eq!(msg.recipient(), Some("lobby"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PipeCodec;

impl Codec for PipeCodec {
    fn encode(&self, command: &Command) -> String {
        format!(
            "{REQUEST_PREFIX}{DELIMITER}{}{DELIMITER}{}",
            command.kind(),
            command.payload()
        )
    }

    fn decode(&self, line: &str) -> Result<Message, DecodeError> {
        if line.trim().is_empty() {
            return Err(DecodeError::Blank);
        }

        // `splitn` keeps everything after the third `|` in the last field,
        // so content may itself contain the delimiter.
        let fields: Vec<&str> = line.splitn(MESSAGE_FIELDS, DELIMITER).collect();
        let [kind, sender, recipient, content] = fields[..] else {
            return Err(DecodeError::MissingFields {
                found: fields.len(),
            });
        };

        let kind = kind.parse()?;
        let recipient = (!recipient.is_empty()).then(|| recipient.to_string());

        Ok(Message::new(kind, sender, recipient, content))
    }
}
