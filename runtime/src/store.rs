//! Interface to the persisted conversation store.
//!
//! The pipeline only ever appends the final text of a turn; it never reads
//! anything back. The real backend lives elsewhere — the in-memory
//! implementation here is what the client runs against locally.

use std::sync::Mutex;
use std::time::SystemTime;

use async_trait::async_trait;
use chat::Role;

/// One persisted turn. The timestamp is assigned by the store, not the
/// caller.
#[derive(Clone, Debug)]
pub struct StoredTurn {
    pub sender: Role,
    pub text: String,
    pub at: SystemTime,
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append one finished turn.
    async fn append(&self, sender: Role, text: &str) -> anyhow::Result<()>;
    /// Rename the conversation (first user message becomes the title).
    async fn set_title(&self, title: &str) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    turns: Mutex<Vec<StoredTurn>>,
    title: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> Vec<StoredTurn> {
        self.turns.lock().unwrap().clone()
    }

    pub fn title(&self) -> Option<String> {
        self.title.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn append(&self, sender: Role, text: &str) -> anyhow::Result<()> {
        self.turns.lock().unwrap().push(StoredTurn {
            sender,
            text: text.to_string(),
            at: SystemTime::now(),
        });
        Ok(())
    }

    async fn set_title(&self, title: &str) -> anyhow::Result<()> {
        *self.title.lock().unwrap() = Some(title.to_string());
        Ok(())
    }
}
