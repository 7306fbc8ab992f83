//! Bounded clip cache keyed by `(voice, text)`.
//!
//! Eviction is strictly insertion-ordered: a lookup does not refresh an
//! entry's position, so the oldest inserted clip always goes first.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use log::debug;

use crate::{Result, Synthesizer};

/// Number of clips kept before the oldest is dropped.
pub const DEFAULT_CAPACITY: usize = 50;

/// Identifies one synthesized sentence in one voice.
///
/// The sentence text is used verbatim; casing and punctuation are part of
/// the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub voice: String,
    pub text: String,
}

impl CacheKey {
    pub fn new(voice: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            text: text.into(),
        }
    }
}

/// Playable audio bytes.
///
/// Clones share the same buffer; the buffer is freed when the last clone is
/// dropped.
#[derive(Clone, Debug)]
pub struct AudioClip {
    bytes: Arc<Vec<u8>>,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for AudioClip {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<CacheKey, AudioClip>,
    order: VecDeque<CacheKey>,
}

/// Shared clip store in front of a [`Synthesizer`].
///
/// One instance serves the whole session; the lock is held only across map
/// operations, never across the synthesis request itself.
pub struct SynthesisCache {
    synth: Arc<dyn Synthesizer>,
    capacity: usize,
    state: Mutex<State>,
}

impl SynthesisCache {
    pub fn new(synth: Arc<dyn Synthesizer>) -> Self {
        Self::with_capacity(synth, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(synth: Arc<dyn Synthesizer>, capacity: usize) -> Self {
        Self {
            synth,
            capacity,
            state: Mutex::new(State::default()),
        }
    }

    /// Return the clip for `(voice, text)`, synthesizing it on a miss.
    ///
    /// A hit costs no network traffic. A miss that pushes the cache past its
    /// capacity drops the oldest inserted clip.
    pub async fn get_or_synthesize(&self, voice: &str, text: &str) -> Result<AudioClip> {
        let key = CacheKey::new(voice, text);
        if let Some(clip) = self.lookup(&key) {
            debug!("clip cache hit: {:?}", key.text);
            return Ok(clip);
        }
        let bytes = self.synth.synthesize(voice, text).await?;
        let clip = AudioClip::new(bytes);
        self.insert(key, clip.clone());
        Ok(clip)
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, voice: &str, text: &str) -> bool {
        let key = CacheKey::new(voice, text);
        self.state.lock().unwrap().entries.contains_key(&key)
    }

    fn lookup(&self, key: &CacheKey) -> Option<AudioClip> {
        self.state.lock().unwrap().entries.get(key).cloned()
    }

    fn insert(&self, key: CacheKey, clip: AudioClip) {
        let mut state = self.state.lock().unwrap();
        if state.entries.insert(key.clone(), clip).is_none() {
            state.order.push_back(key);
        }
        while state.entries.len() > self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            if let Some(old) = state.entries.remove(&oldest) {
                debug!("evicting oldest clip ({} bytes): {:?}", old.len(), oldest.text);
            }
        }
    }
}
