//! Sentence-by-sentence playback of one utterance at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error};
use tts::SynthesisCache;

use crate::cancel::CancelToken;
use crate::sanitize::sanitize;
use crate::segment::segment;
use crate::sink::AudioSink;
use crate::PlaybackError;

/// How one utterance ended.
#[derive(Debug)]
pub enum SpeechOutcome {
    /// Every unit played to the end.
    Completed,
    /// A stop request ended playback early. Not a failure.
    Cancelled,
    /// Synthesis or playback broke; the remaining units were abandoned.
    Failed(PlaybackError),
}

/// One utterance in flight: the ordered units and the play cursor. The
/// active clip itself lives in the sink; the session drives it and is
/// dropped when the loop exits.
struct PlaybackSession {
    units: Vec<String>,
    cursor: usize,
}

/// Drives utterances through the shared cache and the audio sink.
///
/// One narrator serves the whole session. Starting a new utterance
/// supersedes the previous one; concurrent `speak` calls are not supported.
pub struct Narrator {
    cache: Arc<SynthesisCache>,
    sink: Arc<dyn AudioSink>,
    voice: String,
    token: CancelToken,
    speaking: AtomicBool,
}

impl Narrator {
    pub fn new(
        cache: Arc<SynthesisCache>,
        sink: Arc<dyn AudioSink>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            sink,
            voice: voice.into(),
            token: CancelToken::new(),
            speaking: AtomicBool::new(false),
        }
    }

    /// Handle to the stop flag shared with whoever may interrupt playback.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Whether an utterance is currently being spoken.
    pub fn speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    /// Stop the current utterance at once and skip its remaining units.
    pub async fn interrupt(&self) {
        self.token.cancel();
        self.sink.stop().await;
    }

    /// Speak `text` sentence by sentence, honoring the stop flag.
    ///
    /// Failures are absorbed into the returned [`SpeechOutcome`]; the
    /// narrator is always back to idle when this resolves. A stop requested
    /// between two utterances is forgotten by the reset at the top.
    pub async fn speak(&self, text: &str) -> SpeechOutcome {
        self.token.reset();
        self.speaking.store(true, Ordering::SeqCst);

        let mut session = PlaybackSession {
            units: segment(&sanitize(text)),
            cursor: 0,
        };
        let outcome = self.run(&mut session).await;

        self.sink.stop().await;
        self.speaking.store(false, Ordering::SeqCst);
        self.token.reset();

        match &outcome {
            SpeechOutcome::Completed => debug!("utterance finished"),
            SpeechOutcome::Cancelled => debug!("utterance stopped on request"),
            SpeechOutcome::Failed(e) => error!("utterance abandoned: {e}"),
        }
        outcome
    }

    async fn run(&self, session: &mut PlaybackSession) -> SpeechOutcome {
        while session.cursor < session.units.len() {
            if self.token.is_cancelled() {
                return SpeechOutcome::Cancelled;
            }
            let unit = session.units[session.cursor].trim().to_string();
            session.cursor += 1;
            if unit.is_empty() {
                continue;
            }

            let clip = match self.cache.get_or_synthesize(&self.voice, &unit).await {
                Ok(clip) => clip,
                Err(e) => {
                    error!("synthesis failed for {unit:?}: {e}");
                    return SpeechOutcome::Failed(e.into());
                }
            };

            // The request may have outlived a stop; honor it before the
            // clip becomes audible.
            if self.token.is_cancelled() {
                return SpeechOutcome::Cancelled;
            }

            debug!("speaking unit: {unit}");
            if let Err(e) = self.sink.play(clip).await {
                error!("playback failed for {unit:?}: {e}");
                return SpeechOutcome::Failed(e);
            }

            tokio::select! {
                _ = self.sink.wait_until_done() => {}
                _ = self.token.cancelled() => {
                    self.sink.stop().await;
                    return SpeechOutcome::Cancelled;
                }
            }
        }
        SpeechOutcome::Completed
    }
}
