//! Gesture player - turns recognized words into timed joint rotations

use crate::error::AvatarError;
use crate::gesture::{GestureClip, GestureStep};
use crate::library::GestureLibrary;
use crate::skeleton::SkeletonRig;
use kineia_core::PlaybackConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A word whose clip could not be played
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackFailure {
    pub word: String,
    pub clip: String,
    pub reason: String,
}

/// Outcome of one utterance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackReport {
    /// Words whose clip played to the end
    pub played: Vec<String>,
    /// Words without a gesture
    pub skipped: Vec<String>,
    pub failed: Vec<PlaybackFailure>,
}

impl PlaybackReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Plays clips from a [`GestureLibrary`] onto a [`SkeletonRig`].
///
/// Only one sequence runs at a time; concurrent calls wait their turn.
pub struct GesturePlayer {
    library: Arc<GestureLibrary>,
    rig: Arc<dyn SkeletonRig>,
    config: PlaybackConfig,
    sequence: Mutex<()>,
}

impl GesturePlayer {
    /// Create a new gesture player
    pub fn new(
        library: Arc<GestureLibrary>,
        rig: Arc<dyn SkeletonRig>,
        config: PlaybackConfig,
    ) -> Result<Self, AvatarError> {
        config.validate().map_err(AvatarError::Config)?;
        Ok(Self {
            library,
            rig,
            config,
            sequence: Mutex::new(()),
        })
    }

    pub fn library(&self) -> &GestureLibrary {
        &self.library
    }

    pub fn rig(&self) -> &Arc<dyn SkeletonRig> {
        &self.rig
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Play every mapped word in order, holding after each clip.
    ///
    /// Unmapped words are skipped silently. A clip that fails is reported and
    /// playback moves on to the next word.
    pub async fn play_words<S: AsRef<str>>(&self, words: &[S]) -> PlaybackReport {
        let mut report = PlaybackReport::default();

        if !self.config.enabled {
            debug!("Gesture playback disabled, skipping {} words", words.len());
            report.skipped = words.iter().map(|w| w.as_ref().to_string()).collect();
            return report;
        }

        let _turn = self.sequence.lock().await;

        for word in words {
            let word = word.as_ref();
            let entry = match self.library.lookup(word) {
                Some(entry) => entry.clone(),
                None => {
                    debug!("No gesture for '{}'", word);
                    report.skipped.push(word.to_string());
                    continue;
                }
            };

            match self.run_clip(&entry.clip).await {
                Ok(()) => {
                    report.played.push(word.to_string());
                    self.hold(entry.hold_after).await;
                }
                Err(e) => {
                    warn!("Gesture '{}' for '{}' failed: {}", entry.clip.name(), word, e);
                    report.failed.push(PlaybackFailure {
                        word: word.to_string(),
                        clip: entry.clip.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Utterance done: {} played, {} skipped, {} failed",
            report.played.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    /// Play a single clip, waiting for any running sequence first
    pub async fn play_clip(&self, clip: &GestureClip) -> Result<(), AvatarError> {
        let _turn = self.sequence.lock().await;
        self.run_clip(clip).await
    }

    async fn run_clip(&self, clip: &GestureClip) -> Result<(), AvatarError> {
        // resolve every joint before moving any of them
        if let Some(missing) = clip.joints().into_iter().find(|joint| !self.rig.has_joint(*joint)) {
            return Err(AvatarError::JointNotFound(missing));
        }

        debug!("Playing '{}' on {}", clip.name(), self.rig.rig_name());
        for step in clip.steps() {
            match *step {
                GestureStep::Rotate { joint, delta } => {
                    self.rig.rotate(joint, delta, self.config.smooth).await?;
                }
                GestureStep::Pause { ms } => {
                    self.hold(Duration::from_millis(ms)).await;
                }
            }
        }
        Ok(())
    }

    async fn hold(&self, duration: Duration) {
        let scaled = self.scaled(duration);
        if !scaled.is_zero() {
            tokio::time::sleep(scaled).await;
        }
    }

    fn scaled(&self, duration: Duration) -> Duration {
        duration.div_f64(self.config.animation_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::SceneSkeleton;

    fn player(speed: f64) -> GesturePlayer {
        let config = PlaybackConfig { animation_speed: speed, ..PlaybackConfig::default() };
        GesturePlayer::new(
            Arc::new(GestureLibrary::builtin()),
            Arc::new(SceneSkeleton::humanoid()),
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_speed_scales_pauses() {
        assert_eq!(player(2.0).scaled(Duration::from_millis(800)), Duration::from_millis(400));
        assert_eq!(player(0.5).scaled(Duration::from_millis(800)), Duration::from_millis(1600));
    }

    #[test]
    fn test_rejects_invalid_speed() {
        let config = PlaybackConfig { animation_speed: 3.0, ..PlaybackConfig::default() };
        let result = GesturePlayer::new(
            Arc::new(GestureLibrary::builtin()),
            Arc::new(SceneSkeleton::humanoid()),
            config,
        );
        assert!(matches!(result, Err(AvatarError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_playback_skips_everything() {
        let config = PlaybackConfig { enabled: false, ..PlaybackConfig::default() };
        let rig = Arc::new(SceneSkeleton::humanoid());
        let player = GesturePlayer::new(Arc::new(GestureLibrary::builtin()), rig.clone(), config).unwrap();

        let report = player.play_words(&["hola"]).await;
        assert!(report.played.is_empty());
        assert_eq!(report.skipped, vec!["hola"]);
        assert!(rig.is_at_rest());
    }
}
