//! Audio output seam and the default device-backed implementation.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::{oneshot, Notify};
use tts::AudioClip;

use crate::PlaybackError;

/// Renders clips audible, one at a time.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Begin playing `clip`, replacing and silencing any active clip.
    async fn play(&self, clip: AudioClip) -> Result<(), PlaybackError>;
    /// Resolve once the active clip has drained. Resolves immediately when
    /// nothing is playing.
    async fn wait_until_done(&self);
    /// Silence and discard the active clip.
    async fn stop(&self);
    /// Whether a clip is currently audible.
    fn active(&self) -> bool;
}

enum SinkCommand {
    Play {
        clip: AudioClip,
        reply: oneshot::Sender<Result<(), PlaybackError>>,
    },
    Stop,
}

/// [`AudioSink`] backed by the default output device.
///
/// `rodio::OutputStream` is `!Send` on some platforms, so the device lives
/// on a dedicated OS thread; this handle proxies commands over a channel
/// and is freely shareable across tasks.
pub struct RodioSink {
    cmd_tx: mpsc::Sender<SinkCommand>,
    playing: Arc<AtomicBool>,
    drained: Arc<Notify>,
}

impl RodioSink {
    /// Spawn the audio thread and open the default output device.
    pub fn spawn() -> Result<Self, PlaybackError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<SinkCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), PlaybackError>>();
        let playing = Arc::new(AtomicBool::new(false));
        let drained = Arc::new(Notify::new());

        let thread_playing = playing.clone();
        let thread_drained = drained.clone();
        thread::Builder::new()
            .name("audio-out".into())
            .spawn(move || run(cmd_rx, init_tx, thread_playing, thread_drained))
            .map_err(|e| PlaybackError::Device(e.to_string()))?;

        init_rx.recv().map_err(|_| PlaybackError::SinkClosed)??;

        Ok(Self {
            cmd_tx,
            playing,
            drained,
        })
    }
}

fn run(
    cmd_rx: mpsc::Receiver<SinkCommand>,
    init_tx: mpsc::Sender<Result<(), PlaybackError>>,
    playing: Arc<AtomicBool>,
    drained: Arc<Notify>,
) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = init_tx.send(Err(PlaybackError::Device(e.to_string())));
            return;
        }
    };
    // Keeps the device open for the thread's lifetime.
    let _stream = stream;
    let _ = init_tx.send(Ok(()));

    let mut current: Option<Sink> = None;
    loop {
        match cmd_rx.recv_timeout(Duration::from_millis(25)) {
            Ok(SinkCommand::Play { clip, reply }) => {
                if let Some(old) = current.take() {
                    old.stop();
                }
                let result = Sink::try_new(&handle)
                    .map_err(|e| PlaybackError::Device(e.to_string()))
                    .and_then(|sink| {
                        let source = Decoder::new(Cursor::new(clip))
                            .map_err(|e| PlaybackError::Decode(e.to_string()))?;
                        sink.append(source);
                        Ok(sink)
                    });
                match result {
                    Ok(sink) => {
                        current = Some(sink);
                        playing.store(true, Ordering::SeqCst);
                        let _ = reply.send(Ok(()));
                    }
                    Err(e) => {
                        playing.store(false, Ordering::SeqCst);
                        drained.notify_waiters();
                        let _ = reply.send(Err(e));
                    }
                }
            }
            Ok(SinkCommand::Stop) => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
                playing.store(false, Ordering::SeqCst);
                drained.notify_waiters();
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if current.as_ref().is_some_and(|s| s.empty()) {
                    current = None;
                    playing.store(false, Ordering::SeqCst);
                    drained.notify_waiters();
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[async_trait]
impl AudioSink for RodioSink {
    async fn play(&self, clip: AudioClip) -> Result<(), PlaybackError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(SinkCommand::Play { clip, reply })
            .map_err(|_| PlaybackError::SinkClosed)?;
        rx.await.map_err(|_| PlaybackError::SinkClosed)?
    }

    async fn wait_until_done(&self) {
        while self.playing.load(Ordering::SeqCst) {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.playing.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }

    async fn stop(&self) {
        let _ = self.cmd_tx.send(SinkCommand::Stop);
    }

    fn active(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}
