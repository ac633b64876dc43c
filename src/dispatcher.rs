//! Local input dispatch: one typed line becomes chat, an action, or a
//! client command.

use crate::error::Result;
use crate::irc::ChatSession;
use crate::presenter::{action_line, message_line};
use std::sync::Arc;

/// Parse result of one input line. Created per line, dropped after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// No leading `/`: sent verbatim as a channel message.
    PlainChat(String),
    /// `/name [args]`. Name matching is case-insensitive; the original
    /// spelling is kept for the unknown-command report.
    Command { name: String, args: String },
}

impl InputLine {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return InputLine::PlainChat(line.to_owned());
        };
        match rest.split_once(char::is_whitespace) {
            Some((name, args)) => InputLine::Command {
                name: name.trim().to_owned(),
                args: args.trim().to_owned(),
            },
            None => InputLine::Command {
                name: rest.trim().to_owned(),
                args: String::new(),
            },
        }
    }
}

/// Whether the input loop should keep reading after a dispatched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// `/quit` was dispatched; read no further lines.
    Quit,
}

/// Executes parsed input lines against the chat session and local echo.
pub struct Dispatcher {
    session: Arc<dyn ChatSession>,
    channel: String,
    /// The local user's current display name, updated by `/nick`.
    identity: String,
}

impl Dispatcher {
    pub fn new(session: Arc<dyn ChatSession>, channel: String, identity: String) -> Self {
        Self {
            session,
            channel,
            identity,
        }
    }

    /// Current local display name.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Classify and execute one line of local input.
    ///
    /// # Errors
    ///
    /// Propagates chat session failures; the caller still runs teardown.
    pub async fn dispatch(&mut self, line: &str) -> Result<Outcome> {
        match InputLine::parse(line) {
            InputLine::PlainChat(text) => {
                self.session.send_message(&self.channel, &text).await?;
                println!("{}", message_line(&self.identity, &text));
            }
            InputLine::Command { name, args } => match name.to_ascii_lowercase().as_str() {
                "nick" => {
                    self.session.change_nickname(&args).await?;
                    self.identity = args.clone();
                    println!("Changed nick to {args}");
                }
                "quit" => {
                    let parting = (!args.is_empty()).then_some(args.as_str());
                    self.session.disconnect(parting).await?;
                    println!("Quit server");
                    return Ok(Outcome::Quit);
                }
                "me" => {
                    self.session.send_action(&self.channel, &args).await?;
                    println!("{}", action_line(&self.identity, &args));
                }
                _ => println!("{name} command not implemented"),
            },
        }
        Ok(Outcome::Continue)
    }
}
