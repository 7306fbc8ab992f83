//! HTTP client for the streaming completion endpoint.

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::pin::Pin;

use crate::history::Message;
use crate::{Result, StreamError};

/// Raw reply fragments as they arrive off the wire.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>> + Send>>;

/// Issues one completion request for a full conversation history.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `messages` (oldest first) and stream back the reply bytes.
    /// `image` is an optional embedded attachment payload.
    async fn stream_chat(&self, messages: &[Message], image: Option<&str>) -> Result<ByteStream>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

/// Client for the completion server.
pub struct HttpChatClient {
    url: String,
    client: Client,
}

impl HttpChatClient {
    /// Create a new client targeting `url`
    /// (e.g. `http://localhost:8000/api/chat-stream`).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn stream_chat(&self, messages: &[Message], image: Option<&str>) -> Result<ByteStream> {
        let res = self
            .client
            .post(&self.url)
            .json(&CompletionRequest { messages, image })
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(StreamError::Status(res.status()));
        }
        let stream = res
            .bytes_stream()
            .map(|b| b.map(|bytes| bytes.to_vec()).map_err(StreamError::from));
        Ok(Box::pin(stream))
    }
}
