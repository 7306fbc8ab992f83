//! HTTP client for the remote speech synthesis service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{Result, SynthesisError};

/// Convert a sentence into audio bytes in the given voice.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>>;
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

/// Client for a narration server.
pub struct HttpSynthesizer {
    url: String,
    client: Client,
}

impl HttpSynthesizer {
    /// Create a new client targeting `url`
    /// (e.g. `http://localhost:5002/synthesize`).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, voice: &str, text: &str) -> Result<Vec<u8>> {
        let res = self
            .client
            .post(&self.url)
            .json(&SynthesisRequest { text, voice })
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(SynthesisError::Status(res.status()));
        }
        let bytes = res.bytes().await?;
        Ok(bytes.to_vec())
    }
}
