//! Client for a remote narration service plus a bounded audio cache.
//!
//! Synthesized clips are keyed by `(voice, text)` so a repeated sentence is
//! served without a second network round trip. The cache holds at most
//! [`cache::DEFAULT_CAPACITY`] clips and evicts in insertion order.

use thiserror::Error;

pub mod cache;
pub mod synth;

pub use cache::{AudioClip, CacheKey, SynthesisCache};
pub use synth::{HttpSynthesizer, Synthesizer};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("synthesis server returned {0}")]
    Status(reqwest::StatusCode),
}

/// Convenience result type used throughout this crate.
pub type Result<T> = std::result::Result<T, SynthesisError>;
