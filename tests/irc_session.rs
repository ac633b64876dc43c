//! Session integration tests against a scripted in-process IRC server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use talking_irc::irc::{ChatEvent, ChatSession, IrcSession};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

struct ScriptedServer {
    lines: tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>,
    writer: tokio::net::tcp::OwnedWriteHalf,
}

impl ScriptedServer {
    async fn accept(listener: &TcpListener) -> Self {
        let (stream, _) = listener.accept().await.expect("accept");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn recv(&mut self) -> String {
        self.lines
            .next_line()
            .await
            .expect("read from client")
            .expect("client closed early")
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .expect("write to client");
    }

    /// Consume the registration exchange and acknowledge it, throwing in a
    /// PING the client must answer first.
    async fn register(&mut self, nick: &str) {
        assert_eq!(self.recv().await, format!("NICK {nick}"));
        assert!(self.recv().await.starts_with(&format!("USER {nick} ")));
        self.send("PING :pre-registration").await;
        assert_eq!(self.recv().await, "PONG :pre-registration");
        self.send(&format!(":irc.test 001 {nick} :Welcome to the test net"))
            .await;
    }
}

async fn connected_pair() -> (ScriptedServer, IrcSession, mpsc::Receiver<ChatEvent>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let server_task = tokio::spawn(async move {
        let mut server = ScriptedServer::accept(&listener).await;
        server.register("crier").await;
        server
    });

    let (session, reader) = IrcSession::connect(&addr.ip().to_string(), addr.port(), "crier")
        .await
        .expect("connect");
    let (event_tx, event_rx) = mpsc::channel(16);
    tokio::spawn(reader.run(event_tx));

    let server = server_task.await.expect("server task");
    (server, session, event_rx)
}

#[tokio::test]
async fn registration_and_inbound_events() {
    let (mut server, session, mut events) = connected_pair().await;
    assert_eq!(events.recv().await, Some(ChatEvent::Connected));

    session.join_channel("#talk").await.expect("join");
    assert_eq!(server.recv().await, "JOIN #talk");

    server.send(":alice!a@host PRIVMSG #talk :hello there").await;
    assert_eq!(
        events.recv().await,
        Some(ChatEvent::Message {
            sender: "alice".to_owned(),
            text: "hello there".to_owned(),
        })
    );

    server
        .send(":alice!a@host PRIVMSG #talk :\u{1}ACTION waves\u{1}")
        .await;
    assert_eq!(
        events.recv().await,
        Some(ChatEvent::Action {
            sender: "alice".to_owned(),
            text: "waves".to_owned(),
        })
    );

    // Private messages are not vocalized.
    server.send(":bob!b@host PRIVMSG crier :psst").await;
    server.send(":carol!c@host PRIVMSG #talk :after").await;
    assert_eq!(
        events.recv().await,
        Some(ChatEvent::Message {
            sender: "carol".to_owned(),
            text: "after".to_owned(),
        })
    );
}

#[tokio::test]
async fn outbound_commands_write_protocol_lines() {
    let (mut server, session, mut events) = connected_pair().await;
    assert_eq!(events.recv().await, Some(ChatEvent::Connected));

    session.send_message("#talk", "hi all").await.expect("message");
    assert_eq!(server.recv().await, "PRIVMSG #talk :hi all");

    session.send_action("#talk", "waves").await.expect("action");
    assert_eq!(server.recv().await, "PRIVMSG #talk :\u{1}ACTION waves\u{1}");

    session.change_nickname("other").await.expect("nick");
    assert_eq!(server.recv().await, "NICK other");
}

#[tokio::test]
async fn disconnect_sends_quit_and_ends_the_event_stream() {
    let (mut server, session, mut events) = connected_pair().await;
    assert_eq!(events.recv().await, Some(ChatEvent::Connected));

    session.disconnect(Some("bye all")).await.expect("quit");
    assert_eq!(server.recv().await, "QUIT :bye all");

    // Second disconnect is a no-op.
    session.disconnect(None).await.expect("second quit");

    drop(server);
    assert_eq!(events.recv().await, Some(ChatEvent::Disconnected));
    assert_eq!(events.recv().await, None);
}

#[tokio::test]
async fn keepalive_pings_are_answered() {
    let (mut server, _session, mut events) = connected_pair().await;
    assert_eq!(events.recv().await, Some(ChatEvent::Connected));

    server.send("PING :tick").await;
    assert_eq!(server.recv().await, "PONG :tick");
}

#[tokio::test]
async fn rejected_nickname_fails_registration() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let mut server = ScriptedServer::accept(&listener).await;
        let _ = server.recv().await;
        let _ = server.recv().await;
        server
            .send(":irc.test 433 * crier :Nickname is already in use")
            .await;
        // Hold the socket open so the client decides on the numeric alone.
        let _ = server.lines.next_line().await;
    });

    let result = IrcSession::connect(&addr.ip().to_string(), addr.port(), "crier").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn connection_refused_surfaces_as_error() {
    // Bind then drop to get a port with nothing listening on it.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let result = IrcSession::connect(&addr.ip().to_string(), addr.port(), "crier").await;
    assert!(result.is_err());
}
