//! Speech-to-gesture screen controller
//!
//! Wires a recognizer, a listening session and a gesture player together:
//! every final transcript is tokenized and played as one background task.
//! Recognizer errors and failed clips are surfaced through the notifier.

use crate::error::AppError;
use kineia_avatar::{GesturePlayer, PlaybackReport};
use kineia_core::{Notification, Notifier};
use kineia_speech::{ListenState, ListeningSession, RecognitionEvent, SpeechError, SpeechRecognizer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const REPORT_BUFFER_SIZE: usize = 32;

struct ScreenInner {
    recognizer: Arc<dyn SpeechRecognizer>,
    player: Arc<GesturePlayer>,
    notifier: Arc<dyn Notifier>,
    session: Mutex<ListeningSession>,
    playbacks: parking_lot::Mutex<Vec<JoinHandle<()>>>,
    reports: broadcast::Sender<PlaybackReport>,
    closed: AtomicBool,
}

impl ScreenInner {
    async fn handle_event(self: &Arc<Self>, event: RecognitionEvent) {
        if let RecognitionEvent::Error(kind) = &event {
            self.notifier.notify(Notification::warning(format!("Error: {}", kind)));
        }

        let utterance = self.session.lock().await.on_event(event);
        match utterance {
            Some(utterance) if !utterance.is_empty() => self.spawn_playback(utterance.into_words()),
            Some(utterance) => debug!("Nothing to sign in '{}'", utterance.transcript()),
            None => {}
        }
    }

    fn spawn_playback(self: &Arc<Self>, words: Vec<String>) {
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let report = inner.player.play_words(&words).await;
            for failure in &report.failed {
                inner.notifier.notify(Notification::error(format!(
                    "Could not sign '{}': {}",
                    failure.word, failure.reason
                )));
            }
            // nobody listening for reports is fine
            let _ = inner.reports.send(report);
        });

        let mut playbacks = self.playbacks.lock();
        playbacks.retain(|h| !h.is_finished());
        playbacks.push(handle);
    }

    fn abort_playbacks(&self) -> Vec<JoinHandle<()>> {
        let handles: Vec<JoinHandle<()>> = self.playbacks.lock().drain(..).collect();
        for handle in &handles {
            handle.abort();
        }
        handles
    }
}

async fn run_events(mut events: mpsc::Receiver<RecognitionEvent>, inner: Arc<ScreenInner>) {
    while let Some(event) = events.recv().await {
        if inner.closed.load(Ordering::Acquire) {
            break;
        }
        inner.handle_event(event).await;
    }
    debug!("Recognition event loop finished");
}

/// The screen where the user speaks and the avatar signs.
///
/// Must be opened inside a tokio runtime.
pub struct SpeechScreen {
    inner: Arc<ScreenInner>,
    event_loop: JoinHandle<()>,
}

impl SpeechScreen {
    pub fn open(
        recognizer: Arc<dyn SpeechRecognizer>,
        player: Arc<GesturePlayer>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        let events = recognizer.take_events().ok_or(AppError::EventsTaken)?;
        let (reports, _) = broadcast::channel(REPORT_BUFFER_SIZE);

        let inner = Arc::new(ScreenInner {
            recognizer,
            player,
            notifier,
            session: Mutex::new(ListeningSession::new()),
            playbacks: parking_lot::Mutex::new(Vec::new()),
            reports,
            closed: AtomicBool::new(false),
        });
        let event_loop = tokio::spawn(run_events(events, Arc::clone(&inner)));

        info!("Speech screen opened with recognizer {}", inner.recognizer.name());
        Ok(Self { inner, event_loop })
    }

    /// Outcome of the microphone permission request
    pub async fn set_permission(&self, granted: bool) {
        self.inner.session.lock().await.set_permission(granted);
        if !granted {
            self.inner
                .notifier
                .notify(Notification::warning("Microphone permission is required to listen"));
        }
    }

    /// The listen button
    pub async fn toggle(&self) -> Result<ListenState, AppError> {
        if self.is_closed() {
            return Err(AppError::ScreenClosed);
        }

        let mut session = self.inner.session.lock().await;
        match session.toggle(self.inner.recognizer.as_ref()).await {
            Ok(state) => Ok(state),
            Err(SpeechError::PermissionDenied) => {
                self.inner
                    .notifier
                    .notify(Notification::warning("Microphone permission is required to listen"));
                Err(SpeechError::PermissionDenied.into())
            }
            Err(e) => {
                warn!("Could not toggle listening: {}", e);
                self.inner.notifier.notify(Notification::error(e.to_string()));
                Err(e.into())
            }
        }
    }

    pub async fn state(&self) -> ListenState {
        self.inner.session.lock().await.state()
    }

    /// Transcript or error shown above the avatar
    pub async fn display_text(&self) -> String {
        self.inner.session.lock().await.display_text().to_string()
    }

    pub async fn button_label(&self) -> &'static str {
        self.inner.session.lock().await.button_label()
    }

    /// Receive a report for every utterance that finishes playing
    pub fn subscribe_reports(&self) -> broadcast::Receiver<PlaybackReport> {
        self.inner.reports.subscribe()
    }

    /// Playback tasks spawned and not yet finished
    pub fn active_playbacks(&self) -> usize {
        self.inner.playbacks.lock().iter().filter(|h| !h.is_finished()).count()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Leave the screen: release the recognizer and stop any running playback
    pub async fn exit(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.inner.recognizer.destroy().await;
        self.event_loop.abort();
        // a cancelled clip may be mid-poll on another worker
        for handle in self.inner.abort_playbacks() {
            let _ = handle.await;
        }
        self.inner.session.lock().await.reset();
        info!("Speech screen closed");
    }
}

impl Drop for SpeechScreen {
    fn drop(&mut self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            debug!("Speech screen dropped without exit, aborting tasks");
        }
        self.event_loop.abort();
        self.inner.abort_playbacks();
    }
}
