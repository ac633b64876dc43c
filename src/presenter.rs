//! Event-to-speech translation.
//!
//! The presenter runs on its own OS thread, draining a `ChatEvent` channel.
//! The single consumer serializes every read-compare-write over the speaker
//! memory and guarantees at most one utterance is in flight, because the
//! same thread performs the blocking wait for playback.

use crate::error::{ClientError, Result};
use crate::irc::ChatEvent;
use crate::speech::SpeechEngine;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// How long sender context stays fresh. After a gap longer than this, the
/// sender's name is announced again even for consecutive lines.
const CONTINUITY_WINDOW: Duration = Duration::from_secs(10);

/// Console line for a plain message, angle-bracket convention.
pub(crate) fn message_line(sender: &str, text: &str) -> String {
    format!("<{sender}> {text}")
}

/// Console line for an action.
pub(crate) fn action_line(sender: &str, text: &str) -> String {
    format!("{sender} {text}")
}

/// Maps inbound chat events to utterances and drives the speech engine.
pub struct Presenter<E: SpeechEngine> {
    engine: E,
    /// Last announced sender and when they were last spoken. Both present or
    /// both absent, by construction.
    memory: Option<(String, Instant)>,
}

impl<E: SpeechEngine> Presenter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            memory: None,
        }
    }

    /// Echo the event to the console (always with the full sender prefix),
    /// then speak it. Errors are swallowed here: one bad event must not take
    /// down the session loop.
    pub fn handle_event(&mut self, event: &ChatEvent) {
        match event {
            ChatEvent::Connected => println!("Connected"),
            ChatEvent::Disconnected => println!("Disconnected"),
            ChatEvent::Message { sender, text } => println!("{}", message_line(sender, text)),
            ChatEvent::Action { sender, text } => println!("{}", action_line(sender, text)),
        }

        let utterance = self.utterance_for(event, Instant::now());
        self.speak(&utterance);
    }

    /// Decide the literal utterance and update speaker memory.
    ///
    /// Messages collapse the sender prefix when the same sender spoke within
    /// the continuity window; actions always announce their actor and clear
    /// the memory.
    fn utterance_for(&mut self, event: &ChatEvent, now: Instant) -> String {
        match event {
            ChatEvent::Connected => "Connected".to_owned(),
            ChatEvent::Disconnected => "Disconnected".to_owned(),
            ChatEvent::Action { sender, text } => {
                self.memory = None;
                format!("{sender} {text}")
            }
            ChatEvent::Message { sender, text } => {
                let announce = match &self.memory {
                    Some((last_sender, last_at)) => {
                        last_sender != sender
                            || now.duration_since(*last_at) > CONTINUITY_WINDOW
                    }
                    None => true,
                };
                let utterance = if announce {
                    format!("{sender}: {text}")
                } else {
                    text.clone()
                };
                self.memory = Some((sender.clone(), now));
                utterance
            }
        }
    }

    /// Speak one utterance and block until playback finishes, so utterances
    /// never interleave.
    fn speak(&mut self, text: &str) {
        if let Err(e) = self.engine.speak(text) {
            warn!("dropping utterance: {e}");
            return;
        }
        self.engine.wait_until_idle();
    }

    fn release(&mut self) {
        self.engine.release();
    }
}

/// Handle to the presenter thread.
pub struct PresenterHandle {
    thread: std::thread::JoinHandle<()>,
}

impl PresenterHandle {
    /// Wait for the presenter to drain its channel and release the engine.
    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("speech presenter thread panicked");
        }
    }
}

/// Spawn the presenter thread.
///
/// The engine is acquired on the presenter thread itself (platform
/// synthesizer handles are not generally sendable); the acquisition result
/// is reported back before this function returns, so a missing synthesizer
/// aborts startup before any chat activity.
///
/// The thread exits when every `ChatEvent` sender is dropped.
///
/// # Errors
///
/// Returns the engine acquisition error, or an I/O error if the thread
/// cannot be spawned.
pub fn spawn<E, F>(acquire: F, mut events: mpsc::Receiver<ChatEvent>) -> Result<PresenterHandle>
where
    E: SpeechEngine,
    F: FnOnce() -> Result<E> + Send + 'static,
{
    let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel(1);
    let thread = std::thread::Builder::new()
        .name("speech-presenter".to_owned())
        .spawn(move || {
            let engine = match acquire() {
                Ok(engine) => {
                    let _ = ready_tx.send(Ok(()));
                    engine
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            let mut presenter = Presenter::new(engine);
            while let Some(event) = events.blocking_recv() {
                presenter.handle_event(&event);
            }
            presenter.release();
        })?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(PresenterHandle { thread }),
        Ok(Err(e)) => {
            let _ = thread.join();
            Err(e)
        }
        Err(_) => {
            let _ = thread.join();
            Err(ClientError::Speech(
                "presenter thread exited before acquiring the engine".to_owned(),
            ))
        }
    }
}
