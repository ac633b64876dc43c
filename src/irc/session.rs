//! IRC session over TCP: registration, reader task, outbound commands.

use crate::error::{ClientError, Result};
use crate::irc::protocol::{
    self, ERR_NICKNAMEINUSE, IrcMessage, RPL_WELCOME, decode_action, nick_of, parse_line,
};
use crate::irc::{ChatEvent, ChatSession};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

type SharedWriter = Arc<Mutex<OwnedWriteHalf>>;

/// Write half of an established IRC connection.
///
/// Cheap to share behind an `Arc`; every method writes one protocol line.
pub struct IrcSession {
    writer: SharedWriter,
    closed: AtomicBool,
}

/// Read half of an established IRC connection.
///
/// [`IrcReader::run`] consumes the reader and forwards [`ChatEvent`] records
/// until the connection ends.
pub struct IrcReader {
    lines: Lines<BufReader<OwnedReadHalf>>,
    /// Shared with the session so PING can be answered from the read loop.
    writer: SharedWriter,
}

async fn send_line(writer: &SharedWriter, line: &str) -> Result<()> {
    let mut guard = writer.lock().await;
    guard.write_all(line.as_bytes()).await?;
    guard.write_all(b"\r\n").await?;
    guard.flush().await?;
    Ok(())
}

impl IrcSession {
    /// Connect to `host:port` and register as `nick`.
    ///
    /// Blocks until the server acknowledges registration (numeric 001),
    /// answering PINGs along the way. No retries: any failure abandons the
    /// single attempt.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, a rejected nickname, or a
    /// server `ERROR` during registration.
    pub async fn connect(host: &str, port: u16, nick: &str) -> Result<(IrcSession, IrcReader)> {
        let stream = TcpStream::connect((host, port)).await?;
        let (read_half, write_half) = stream.into_split();
        let writer = Arc::new(Mutex::new(write_half));
        let mut lines = BufReader::new(read_half).lines();

        send_line(&writer, &format!("NICK {nick}")).await?;
        send_line(&writer, &format!("USER {nick} 8 * :{nick}")).await?;

        // Drain server traffic until registration completes.
        loop {
            let line = lines.next_line().await?.ok_or_else(|| {
                ClientError::Chat("server closed the connection during registration".to_owned())
            })?;
            let Some(message) = parse_line(&line) else {
                continue;
            };
            match message.command.as_str() {
                RPL_WELCOME => break,
                "PING" => answer_ping(&writer, &message).await?,
                ERR_NICKNAMEINUSE => {
                    return Err(ClientError::Chat(format!(
                        "nickname {nick} is already in use"
                    )));
                }
                "ERROR" => {
                    return Err(ClientError::Chat(format!(
                        "server refused registration: {}",
                        message.params.last().map(String::as_str).unwrap_or("")
                    )));
                }
                _ => debug!("ignoring pre-registration line: {line}"),
            }
        }
        info!("registered with {host} as {nick}");

        let session = IrcSession {
            writer: Arc::clone(&writer),
            closed: AtomicBool::new(false),
        };
        let reader = IrcReader { lines, writer };
        Ok((session, reader))
    }

    /// Join a channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the JOIN line cannot be written.
    pub async fn join_channel(&self, channel: &str) -> Result<()> {
        send_line(&self.writer, &format!("JOIN {channel}")).await
    }
}

#[async_trait]
impl ChatSession for IrcSession {
    async fn send_message(&self, channel: &str, text: &str) -> Result<()> {
        send_line(&self.writer, &format!("PRIVMSG {channel} :{text}")).await
    }

    async fn send_action(&self, channel: &str, text: &str) -> Result<()> {
        let payload = protocol::encode_action(text);
        send_line(&self.writer, &format!("PRIVMSG {channel} :{payload}")).await
    }

    async fn change_nickname(&self, name: &str) -> Result<()> {
        send_line(&self.writer, &format!("NICK {name}")).await
    }

    async fn disconnect(&self, parting: Option<&str>) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let quit = match parting {
            Some(message) => format!("QUIT :{message}"),
            None => "QUIT".to_owned(),
        };
        send_line(&self.writer, &quit).await?;
        self.writer.lock().await.shutdown().await?;
        Ok(())
    }
}

async fn answer_ping(writer: &SharedWriter, message: &IrcMessage) -> Result<()> {
    let token = message.params.first().map(String::as_str).unwrap_or("");
    send_line(writer, &format!("PONG :{token}")).await
}

/// PRIVMSG targets starting with a channel sigil; private messages are not
/// vocalized.
fn is_channel_target(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}

impl IrcReader {
    /// Forward inbound traffic as [`ChatEvent`] records until the connection
    /// ends, then emit [`ChatEvent::Disconnected`].
    ///
    /// Emits [`ChatEvent::Connected`] first: registration has already
    /// completed by the time the reader exists.
    pub async fn run(mut self, events: mpsc::Sender<ChatEvent>) {
        let _ = events.send(ChatEvent::Connected).await;

        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("chat connection read failed: {e}");
                    break;
                }
            };
            let Some(message) = parse_line(&line) else {
                continue;
            };
            match message.command.as_str() {
                "PING" => {
                    if let Err(e) = answer_ping(&self.writer, &message).await {
                        warn!("failed to answer server PING: {e}");
                    }
                }
                "PRIVMSG" => {
                    if let Some(event) = privmsg_event(&message)
                        && events.send(event).await.is_err()
                    {
                        break;
                    }
                }
                "ERROR" => {
                    debug!("server closed the session: {line}");
                    break;
                }
                _ => {}
            }
        }

        let _ = events.send(ChatEvent::Disconnected).await;
    }
}

/// Reduce a PRIVMSG to a presenter event, if it concerns a channel.
fn privmsg_event(message: &IrcMessage) -> Option<ChatEvent> {
    let sender = nick_of(message.prefix.as_deref()?).to_owned();
    let target = message.params.first()?;
    if !is_channel_target(target) {
        return None;
    }
    let body = message.params.get(1)?;
    let event = match decode_action(body) {
        Some(action) => ChatEvent::Action {
            sender,
            text: action.trim().to_owned(),
        },
        None => ChatEvent::Message {
            sender,
            text: body.trim().to_owned(),
        },
    };
    Some(event)
}
