//! Platform speech synthesizer backend via the `tts` crate.

use crate::config::SpeechOptions;
use crate::error::{ClientError, Result};
use crate::speech::SpeechEngine;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};
use tts::Tts;

/// How often the idle wait re-checks the synthesizer between callbacks.
const WAIT_TICK: Duration = Duration::from_millis(200);

/// Poll interval when the platform lacks utterance callbacks.
const POLL_TICK: Duration = Duration::from_millis(50);

/// Speech engine backed by the platform synthesizer
/// (speech-dispatcher on Linux, SAPI on Windows, AVFoundation on macOS).
pub struct NativeEngine {
    tts: Tts,
    /// Number of utterances queued but not yet finished.
    pending: Arc<(Mutex<usize>, Condvar)>,
    /// Whether the platform delivers utterance-end callbacks.
    callbacks: bool,
}

impl NativeEngine {
    /// Acquire the platform synthesizer and apply configured rate/volume.
    ///
    /// # Errors
    ///
    /// Returns an error if no synthesizer is available. Unsupported rate or
    /// volume settings are logged and skipped, not fatal.
    pub fn acquire(options: &SpeechOptions) -> Result<Self> {
        let mut tts = Tts::default()
            .map_err(|e| ClientError::Speech(format!("no speech synthesizer available: {e}")))?;
        let features = tts.supported_features();

        if let Some(rate) = options.rate {
            if features.rate {
                if let Err(e) = tts.set_rate(rate) {
                    warn!("failed to set speech rate {rate}: {e}");
                }
            } else {
                warn!("synthesizer does not support rate adjustment; ignoring");
            }
        }
        if let Some(volume) = options.volume {
            if features.volume {
                if let Err(e) = tts.set_volume(volume) {
                    warn!("failed to set speech volume {volume}: {e}");
                }
            } else {
                warn!("synthesizer does not support volume adjustment; ignoring");
            }
        }

        let pending = Arc::new((Mutex::new(0usize), Condvar::new()));
        let mut callbacks = features.utterance_callbacks;
        if callbacks {
            let signal = Arc::clone(&pending);
            let registered = tts.on_utterance_end(Some(Box::new(move |_id| {
                let (count, cond) = &*signal;
                if let Ok(mut n) = count.lock() {
                    *n = n.saturating_sub(1);
                }
                cond.notify_all();
            })));
            if let Err(e) = registered {
                warn!("utterance callbacks unavailable, falling back to polling: {e}");
                callbacks = false;
            }
        }

        info!("speech synthesizer ready");
        Ok(Self {
            tts,
            pending,
            callbacks,
        })
    }
}

impl SpeechEngine for NativeEngine {
    fn speak(&mut self, text: &str) -> Result<()> {
        if self.callbacks {
            let (count, _) = &*self.pending;
            if let Ok(mut n) = count.lock() {
                *n += 1;
            }
        }
        match self.tts.speak(text, false) {
            Ok(_) => Ok(()),
            Err(e) => {
                if self.callbacks {
                    let (count, _) = &*self.pending;
                    if let Ok(mut n) = count.lock() {
                        *n = n.saturating_sub(1);
                    }
                }
                Err(ClientError::Speech(format!("synthesis failed: {e}")))
            }
        }
    }

    fn wait_until_idle(&mut self) {
        let pending = Arc::clone(&self.pending);
        if self.callbacks {
            let (count, cond) = &*pending;
            let Ok(mut n) = count.lock() else {
                return;
            };
            while *n > 0 {
                match cond.wait_timeout(n, WAIT_TICK) {
                    Ok((guard, timeout)) => {
                        n = guard;
                        // Safety net for a lost callback: trust the
                        // synthesizer when it reports idle.
                        if timeout.timed_out() && !matches!(self.tts.is_speaking(), Ok(true)) {
                            *n = 0;
                            break;
                        }
                    }
                    // Interrupted wait is a deliberate no-op.
                    Err(_) => return,
                }
            }
        } else {
            while matches!(self.tts.is_speaking(), Ok(true)) {
                std::thread::sleep(POLL_TICK);
            }
        }
    }

    fn release(&mut self) {
        if self.callbacks {
            let _ = self.tts.on_utterance_end(None);
        }
        if let Err(e) = self.tts.stop() {
            debug!("failed to stop synthesizer cleanly: {e}");
        }
        info!("speech synthesizer released");
    }
}
