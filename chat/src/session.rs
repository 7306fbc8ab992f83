//! Per-turn consumption of a streaming reply into the message log.

use std::sync::Arc;

use log::{error, warn};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;

use crate::client::ChatClient;
use crate::decode::Utf8Decoder;
use crate::history::{MessageLog, Role};
use crate::Result;

/// Shown in place of a reply when the completion request breaks.
pub const STREAM_FAILURE_NOTICE: &str = "Erreur lors de la récupération de la réponse.";

/// Progress of the reply currently being streamed. `Partial` always carries
/// the full accumulated text so far, never a bare fragment.
#[derive(Clone, Debug)]
pub enum ChatEvent {
    Partial(String),
    Completed(String),
    Failed(String),
}

/// Streams one reply at a time into a [`MessageLog`].
///
/// Every decoded fragment overwrites the last log entry with the whole
/// accumulator, so the displayed text is always a strict extension of what
/// was displayed before. Subscribers get the same values as [`ChatEvent`]s.
pub struct StreamConsumer {
    client: Arc<dyn ChatClient>,
    events: broadcast::Sender<ChatEvent>,
}

impl StreamConsumer {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        let (events, _) = broadcast::channel(32);
        Self { client, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Request a reply to the history already in `log` and stream it into a
    /// fresh assistant entry. Returns the final text on success; on failure
    /// the entry holds a single diagnostic notice and no playback should
    /// happen.
    pub async fn stream_reply(&self, log: &mut MessageLog, image: Option<&str>) -> Result<String> {
        let history = log.messages().to_vec();
        let mut stream = match self.client.stream_chat(&history, image).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("completion request rejected: {e}");
                log.push(Role::Assistant, STREAM_FAILURE_NOTICE);
                let _ = self
                    .events
                    .send(ChatEvent::Failed(STREAM_FAILURE_NOTICE.to_string()));
                return Err(e);
            }
        };

        log.push(Role::Assistant, "");
        let mut decoder = Utf8Decoder::new();
        let mut accumulated = String::new();

        loop {
            match stream.next().await {
                Some(Ok(bytes)) => {
                    accumulated.push_str(&decoder.push(&bytes));
                    log.replace_last(&accumulated);
                    let _ = self.events.send(ChatEvent::Partial(accumulated.clone()));
                }
                Some(Err(e)) => {
                    error!("reply stream broke: {e}");
                    log.replace_last(STREAM_FAILURE_NOTICE);
                    let _ = self
                        .events
                        .send(ChatEvent::Failed(STREAM_FAILURE_NOTICE.to_string()));
                    return Err(e);
                }
                None => break,
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            warn!("reply ended inside a multi-byte character");
            accumulated.push_str(&tail);
            log.replace_last(&accumulated);
        }

        let _ = self.events.send(ChatEvent::Completed(accumulated.clone()));
        Ok(accumulated)
    }
}
