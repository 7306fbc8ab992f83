use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tts::{Result, SynthesisCache, SynthesisError, Synthesizer};

/// Counts requests and answers with the text's bytes.
struct CountingSynth {
    calls: AtomicUsize,
}

impl CountingSynth {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for CountingSynth {
    async fn synthesize(&self, _voice: &str, text: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(text.as_bytes().to_vec())
    }
}

/// Fails every request with a fixed status.
struct FailingSynth;

#[async_trait]
impl Synthesizer for FailingSynth {
    async fn synthesize(&self, _voice: &str, _text: &str) -> Result<Vec<u8>> {
        Err(SynthesisError::Status(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
        ))
    }
}

#[tokio::test]
async fn repeated_request_is_served_from_cache() {
    let synth = CountingSynth::new();
    let cache = SynthesisCache::new(synth.clone());

    let first = cache
        .get_or_synthesize("denise", "Bonjour.")
        .await
        .unwrap();
    let second = cache
        .get_or_synthesize("denise", "Bonjour.")
        .await
        .unwrap();

    assert_eq!(synth.calls(), 1);
    assert_eq!(first.bytes(), second.bytes());
}

#[tokio::test]
async fn distinct_voices_are_distinct_entries() {
    let synth = CountingSynth::new();
    let cache = SynthesisCache::new(synth.clone());

    cache.get_or_synthesize("denise", "Salut.").await.unwrap();
    cache.get_or_synthesize("henri", "Salut.").await.unwrap();

    assert_eq!(synth.calls(), 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn size_never_exceeds_capacity() {
    let synth = CountingSynth::new();
    let cache = SynthesisCache::new(synth.clone());

    for i in 0..51 {
        let text = format!("Phrase {i}.");
        cache.get_or_synthesize("denise", &text).await.unwrap();
        assert!(cache.len() <= 50);
    }
    assert_eq!(cache.len(), 50);
}

#[tokio::test]
async fn overflow_evicts_the_oldest_entry() {
    let synth = CountingSynth::new();
    let cache = SynthesisCache::new(synth.clone());

    for i in 0..51 {
        let text = format!("Phrase {i}.");
        cache.get_or_synthesize("denise", &text).await.unwrap();
    }

    assert!(!cache.contains("denise", "Phrase 0."));
    assert!(cache.contains("denise", "Phrase 1."));
    assert!(cache.contains("denise", "Phrase 50."));

    // The dropped clip is gone for good: asking again goes back to the
    // synthesizer.
    assert_eq!(synth.calls(), 51);
    cache
        .get_or_synthesize("denise", "Phrase 0.")
        .await
        .unwrap();
    assert_eq!(synth.calls(), 52);
}

#[tokio::test]
async fn small_capacity_evicts_one_at_a_time() {
    let synth = CountingSynth::new();
    let cache = SynthesisCache::with_capacity(synth.clone(), 2);

    cache.get_or_synthesize("denise", "Un.").await.unwrap();
    cache.get_or_synthesize("denise", "Deux.").await.unwrap();
    cache.get_or_synthesize("denise", "Trois.").await.unwrap();

    assert_eq!(cache.len(), 2);
    assert!(!cache.contains("denise", "Un."));
    assert!(cache.contains("denise", "Deux."));
    assert!(cache.contains("denise", "Trois."));
}

#[tokio::test]
async fn failures_are_not_cached() {
    let cache = SynthesisCache::new(Arc::new(FailingSynth));

    let err = cache
        .get_or_synthesize("denise", "Bonjour.")
        .await
        .unwrap_err();
    assert!(matches!(err, SynthesisError::Status(s) if s.as_u16() == 503));
    assert!(cache.is_empty());
}
