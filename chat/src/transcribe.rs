//! Client for the external transcription service.
//!
//! Recorded audio goes out as a multipart upload; the transcript comes back
//! as a plain user turn for the stream consumer.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("transcription server returned {0}")]
    Status(reqwest::StatusCode),
}

/// Turn recorded audio bytes into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, TranscriptionError>;
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Client for a hosted transcription endpoint.
pub struct HttpTranscriber {
    url: String,
    api_key: Option<String>,
    model: String,
    language: String,
    client: Client,
}

impl HttpTranscriber {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            url: url.into(),
            api_key,
            model: "whisper-large-v3".into(),
            language: "fr".into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, TranscriptionError> {
        let form = Form::new()
            .part("file", Part::bytes(audio).file_name("audio.webm"))
            .text("model", self.model.clone())
            .text("language", self.language.clone());

        let mut req = self.client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(TranscriptionError::Status(res.status()));
        }
        let body: TranscriptionResponse = res.json().await?;
        Ok(body.text.unwrap_or_default().trim().to_string())
    }
}
