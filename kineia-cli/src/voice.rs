//! Typed lines standing in for the microphone

use anyhow::{anyhow, Result};
use kineia_avatar::PlaybackReport;
use kineia_app::SpeechScreen;
use kineia_speech::{ListenState, RecognizerErrorKind, SpokenUtterance, TranscriptFeeder};
use std::time::Duration;
use tokio::sync::broadcast;

const IDLE_POLL: Duration = Duration::from_millis(5);

/// Feeds typed lines to an open speech screen, one listening turn per line
pub struct VoiceInput {
    screen: SpeechScreen,
    feeder: TranscriptFeeder,
    reports: broadcast::Receiver<PlaybackReport>,
}

impl VoiceInput {
    pub fn new(screen: SpeechScreen, feeder: TranscriptFeeder) -> Self {
        let reports = screen.subscribe_reports();
        Self { screen, feeder, reports }
    }

    pub fn screen(&self) -> &SpeechScreen {
        &self.screen
    }

    pub fn into_screen(self) -> SpeechScreen {
        self.screen
    }

    /// Speak one line and wait until the avatar has signed it.
    ///
    /// `!error <code>` simulates a recognizer failure instead.
    pub async fn utter(&mut self, line: &str) -> Result<Option<PlaybackReport>> {
        let failure = match line.trim().strip_prefix("!error") {
            Some(code) => Some(code.trim().parse::<i32>().map_err(|_| anyhow!("usage: !error <code>"))?),
            None => None,
        };

        self.screen.toggle().await?;

        if let Some(code) = failure {
            self.feeder.fail(RecognizerErrorKind::from_code(code));
            self.wait_idle().await;
            return Ok(None);
        }

        let signs_something = !SpokenUtterance::parse(line).is_empty();
        if !self.feeder.say(line) {
            return Err(anyhow!("recognizer is not listening"));
        }
        self.wait_idle().await;

        if !signs_something {
            return Ok(None);
        }
        match self.reports.recv().await {
            Ok(report) => Ok(Some(report)),
            Err(e) => Err(anyhow!("playback report lost: {}", e)),
        }
    }

    async fn wait_idle(&self) {
        while self.screen.state().await == ListenState::Listening {
            tokio::time::sleep(IDLE_POLL).await;
        }
    }
}

pub fn print_report(report: &PlaybackReport) {
    if !report.played.is_empty() {
        println!("signed:  {}", report.played.join(" "));
    }
    if !report.skipped.is_empty() {
        println!("no sign: {}", report.skipped.join(" "));
    }
    for failure in &report.failed {
        println!("failed:  {} ({}): {}", failure.word, failure.clip, failure.reason);
    }
}
