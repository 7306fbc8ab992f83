//! Streaming client for the chat completion service.
//!
//! A reply arrives as raw UTF-8 fragments with no delimiters; the
//! [`session::StreamConsumer`] concatenates them verbatim, keeps the visible
//! message log in sync after every fragment and hands the finished text to
//! whoever wants to narrate it. Transcription of recorded audio into a user
//! turn lives here too.

use thiserror::Error;

pub mod attachment;
pub mod client;
pub mod decode;
pub mod history;
pub mod session;
pub mod transcribe;

pub use client::{ChatClient, HttpChatClient};
pub use decode::Utf8Decoder;
pub use history::{Message, MessageLog, Role};
pub use session::{ChatEvent, StreamConsumer};
pub use transcribe::{HttpTranscriber, Transcriber, TranscriptionError};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("completion server returned {0}")]
    Status(reqwest::StatusCode),
}

/// Convenience result type used throughout this crate.
pub type Result<T> = std::result::Result<T, StreamError>;
