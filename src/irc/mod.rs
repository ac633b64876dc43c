//! IRC chat session boundary.
//!
//! The dispatcher and controller talk to a [`ChatSession`]; inbound traffic
//! crosses to the presenter as [`ChatEvent`] records over an mpsc channel,
//! so presenter state never needs a lock.

pub mod protocol;
mod session;

pub use session::{IrcReader, IrcSession};

use crate::error::Result;
use async_trait::async_trait;

/// One inbound chat notification, already reduced to what the presenter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Registration with the server completed.
    Connected,
    /// The server connection ended.
    Disconnected,
    /// A plain channel message.
    Message { sender: String, text: String },
    /// A third-person action ("X waves").
    Action { sender: String, text: String },
}

/// Outbound operations the client performs against the chat network.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Send a plain message to a channel.
    async fn send_message(&self, channel: &str, text: &str) -> Result<()>;

    /// Send a third-person action to a channel.
    async fn send_action(&self, channel: &str, text: &str) -> Result<()>;

    /// Request a nickname change.
    async fn change_nickname(&self, name: &str) -> Result<()>;

    /// Quit the server, optionally with a parting message.
    ///
    /// Calling this more than once is harmless; later calls are no-ops.
    async fn disconnect(&self, parting: Option<&str>) -> Result<()>;
}
