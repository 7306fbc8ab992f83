//! Turn a finished assistant reply into audible speech.
//!
//! The pipeline cleans the text, cuts it into sentences, fetches each
//! sentence's clip through the shared [`tts::SynthesisCache`] and plays the
//! clips back in order on an [`AudioSink`]. A shared [`CancelToken`] stops
//! the whole thing at the next checkpoint.

use thiserror::Error;

pub mod cancel;
pub mod narrator;
pub mod sanitize;
pub mod segment;
pub mod sink;

pub use cancel::CancelToken;
pub use narrator::{Narrator, SpeechOutcome};
pub use sanitize::sanitize;
pub use segment::segment;
pub use sink::{AudioSink, RodioSink};

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Synthesis(#[from] tts::SynthesisError),
    #[error("audio device unavailable: {0}")]
    Device(String),
    #[error("undecodable clip: {0}")]
    Decode(String),
    #[error("audio thread is gone")]
    SinkClosed,
}
