//! Session wiring: startup order, local input loop, orderly teardown.

use crate::config::ClientConfig;
use crate::dispatcher::{Dispatcher, Outcome};
use crate::error::Result;
use crate::irc::{ChatEvent, ChatSession, IrcSession};
use crate::presenter;
use crate::speech::{NativeEngine, NullEngine, SpeechEngine};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::warn;

/// Inbound event queue depth. Chat is low-volume; the queue exists so the
/// reader keeps draining the socket while an utterance plays.
const EVENT_QUEUE_SIZE: usize = 64;

/// Run a full session with the platform speech engine.
///
/// # Errors
///
/// Returns an error if the engine cannot be acquired (before any chat
/// activity), the connection fails, or the input loop hits an I/O failure.
/// Teardown runs in every case.
pub async fn run(config: &ClientConfig) -> Result<()> {
    if config.speech.enabled {
        let options = config.speech.clone();
        run_with_engine(config, move || NativeEngine::acquire(&options)).await
    } else {
        run_with_engine(config, || Ok(NullEngine)).await
    }
}

/// Run a full session with an engine supplied by `acquire`.
///
/// The presenter thread is started (and the engine acquired) before any
/// connection attempt; an acquisition failure aborts startup.
///
/// # Errors
///
/// See [`run`].
pub async fn run_with_engine<E, F>(config: &ClientConfig, acquire: F) -> Result<()>
where
    E: SpeechEngine,
    F: FnOnce() -> Result<E> + Send + 'static,
{
    let (event_tx, event_rx) = mpsc::channel::<ChatEvent>(EVENT_QUEUE_SIZE);
    let presenter = presenter::spawn(acquire, event_rx)?;

    let result = run_session(config, event_tx).await;

    // The session and its reader are gone; the presenter drains what is
    // left and releases the engine.
    presenter.join();
    result
}

async fn run_session(config: &ClientConfig, events: mpsc::Sender<ChatEvent>) -> Result<()> {
    let server = &config.server;
    let (session, reader) = IrcSession::connect(&server.host, server.port, &server.nick).await?;
    let session = Arc::new(session);
    let reader_task = tokio::spawn(reader.run(events));

    let loop_result = match session.join_channel(&server.channel).await {
        Ok(()) => input_loop(Arc::clone(&session), server).await,
        Err(e) => Err(e),
    };

    // Teardown always runs, whatever ended the loop. A failing step never
    // skips the remaining ones.
    if let Err(e) = session.disconnect(None).await {
        warn!("disconnect during teardown failed: {e}");
    }
    if reader_task.await.is_err() {
        warn!("chat reader task panicked");
    }
    loop_result
}

/// Read local input lines until the dispatcher signals stop or stdin ends.
async fn input_loop(
    session: Arc<IrcSession>,
    server: &crate::config::ServerConfig,
) -> Result<()> {
    let mut dispatcher = Dispatcher::new(
        session as Arc<dyn ChatSession>,
        server.channel.clone(),
        server.nick.clone(),
    );
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if dispatcher.dispatch(&line).await? == Outcome::Quit {
            break;
        }
    }
    Ok(())
}
