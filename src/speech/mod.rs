//! Speech synthesis boundary.
//!
//! The presenter only ever talks to a [`SpeechEngine`]; the production
//! backend lives in [`native`] and wraps the platform synthesizer.

mod native;

pub use native::NativeEngine;

use crate::error::Result;
use tracing::debug;

/// Narrow contract the presenter drives.
///
/// Implementations are created on the thread that uses them and are never
/// shared, so no `Send` bound is required.
pub trait SpeechEngine {
    /// Enqueue `text` for synthesis. Does not wait for playback.
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Block until the playback queue is empty.
    ///
    /// An interrupted or failed wait is a non-fatal no-op: the call simply
    /// returns as if playback had finished.
    fn wait_until_idle(&mut self);

    /// Release engine resources. Called once when the presenter shuts down.
    fn release(&mut self);
}

/// Engine used when speech is disabled in the configuration: utterances are
/// discarded, console echo still happens upstream.
pub struct NullEngine;

impl SpeechEngine for NullEngine {
    fn speak(&mut self, text: &str) -> Result<()> {
        debug!("speech disabled, dropping utterance: {text}");
        Ok(())
    }

    fn wait_until_idle(&mut self) {}

    fn release(&mut self) {}
}
