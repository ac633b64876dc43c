//! Talking IRC client: vocalizes channel activity through the platform
//! speech synthesizer and relays locally typed input back into the channel.
//!
//! # Architecture
//!
//! Two concurrent flows meet in the middle:
//! - **Inbound**: the IRC reader task pushes [`irc::ChatEvent`] records over
//!   an mpsc channel into the [`presenter`], which runs on a dedicated
//!   thread, decides the utterance (collapsing redundant sender
//!   announcements), and blocks until each utterance finishes playing.
//! - **Outbound**: the [`controller`] reads local input lines and hands each
//!   to the [`dispatcher`], which interprets `/`-commands or sends plain
//!   chat through the [`irc::ChatSession`].

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod irc;
pub mod presenter;
pub mod speech;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
