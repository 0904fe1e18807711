//! Word → gesture dictionary

use crate::error::AvatarError;
use crate::gesture::{GestureClip, GestureStep, MAX_PAUSE_MS};
use crate::signs;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Pause after a whole-word sign before the next word starts
pub const WORD_HOLD: Duration = Duration::from_millis(1000);

/// Dictionary value: the clip plus how long to hold after it
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub clip: Arc<GestureClip>,
    pub hold_after: Duration,
}

/// Fixed lookup table from normalized words to gesture clips
#[derive(Debug, Clone, Default)]
pub struct GestureLibrary {
    entries: HashMap<String, LibraryEntry>,
}

impl GestureLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in sign table
    pub fn builtin() -> Self {
        let mut library = Self::new();

        let saludo = Arc::new(signs::saludo());
        for word in ["hola", "hi", "hello"] {
            library.insert_shared(word, Arc::clone(&saludo), WORD_HOLD);
        }
        library.insert_shared("how", Arc::new(signs::how()), WORD_HOLD);
        library.insert_shared("you", Arc::new(signs::you()), WORD_HOLD);
        library.insert_shared("feel", Arc::new(signs::feel()), WORD_HOLD);

        // fingerspelled letters chain without a hold
        library.insert_shared("b", Arc::new(signs::letter_b()), Duration::ZERO);
        library.insert_shared("e", Arc::new(signs::letter_e()), Duration::ZERO);

        library
    }

    /// Map `word` to `clip`, replacing any previous mapping
    pub fn insert(&mut self, word: &str, clip: GestureClip, hold_after: Duration) {
        self.insert_shared(word, Arc::new(clip), hold_after);
    }

    fn insert_shared(&mut self, word: &str, clip: Arc<GestureClip>, hold_after: Duration) {
        let key = word.trim().to_lowercase();
        if let Some(previous) = self.entries.insert(key.clone(), LibraryEntry { clip, hold_after }) {
            debug!("Replaced gesture for '{}' (was '{}')", key, previous.clip.name());
        }
    }

    /// Exact lookup of a normalized word
    pub fn lookup(&self, word: &str) -> Option<&LibraryEntry> {
        self.entries.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Mapped words, sorted
    pub fn words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        words.sort_unstable();
        words
    }

    /// Clip name → words that trigger it, sorted by clip name
    pub fn clips(&self) -> BTreeMap<String, (Arc<GestureClip>, Vec<String>)> {
        let mut clips: BTreeMap<String, (Arc<GestureClip>, Vec<String>)> = BTreeMap::new();
        for word in self.words() {
            if let Some(entry) = self.entries.get(word) {
                clips
                    .entry(entry.clip.name().to_string())
                    .or_insert_with(|| (Arc::clone(&entry.clip), Vec::new()))
                    .1
                    .push(word.to_string());
            }
        }
        clips
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` onto this library; its words win
    pub fn merge(&mut self, other: GestureLibrary) {
        for (word, entry) in other.entries {
            self.insert_shared(&word, entry.clip, entry.hold_after);
        }
    }

    /// Parse extra hand-authored clips from TOML
    ///
    /// ```toml
    /// [[clip]]
    /// name = "thanks"
    /// words = ["gracias", "thanks"]
    /// hold_after_ms = 1000
    /// steps = [
    ///   { op = "rotate", joint = "hand.R", delta = { x = 45.0, y = 0.0, z = 0.0 } },
    ///   { op = "pause", ms = 500 },
    ///   { op = "rotate", joint = "hand.R", delta = { x = -45.0, y = 0.0, z = 0.0 } },
    /// ]
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, AvatarError> {
        let file: ClipFile = toml::from_str(content)?;
        let mut library = Self::new();

        for authored in file.clip {
            if authored.words.is_empty() {
                return Err(AvatarError::Clip(format!(
                    "clip '{}' is not mapped to any word",
                    authored.name
                )));
            }
            if authored.hold_after_ms > MAX_PAUSE_MS {
                return Err(AvatarError::Clip(format!(
                    "clip '{}' holds {} ms after playing (max {} ms)",
                    authored.name, authored.hold_after_ms, MAX_PAUSE_MS
                )));
            }

            let clip = Arc::new(GestureClip::from_steps(authored.name, authored.steps)?);
            let hold_after = Duration::from_millis(authored.hold_after_ms);
            for word in &authored.words {
                if word.trim().is_empty() {
                    return Err(AvatarError::Clip(format!(
                        "clip '{}' has an empty trigger word",
                        clip.name()
                    )));
                }
                library.insert_shared(word, Arc::clone(&clip), hold_after);
            }
        }

        Ok(library)
    }

    /// Load a clip file from disk
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, AvatarError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let library = Self::from_toml_str(&content)?;
        info!("Loaded {} gesture words from {}", library.len(), path.display());
        Ok(library)
    }
}

#[derive(Debug, Deserialize)]
struct ClipFile {
    #[serde(default)]
    clip: Vec<AuthoredClip>,
}

#[derive(Debug, Deserialize)]
struct AuthoredClip {
    name: String,
    words: Vec<String>,
    #[serde(default)]
    hold_after_ms: u64,
    steps: Vec<GestureStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greetings_share_one_clip() {
        let library = GestureLibrary::builtin();
        let hola = library.lookup("hola").unwrap();
        let hello = library.lookup("hello").unwrap();
        assert!(Arc::ptr_eq(&hola.clip, &hello.clip));
        assert_eq!(hola.clip.name(), "saludo");
    }

    #[test]
    fn test_clips_groups_words() {
        let clips = GestureLibrary::builtin().clips();
        let (_, words) = &clips["saludo"];
        assert_eq!(words, &vec!["hello", "hi", "hola"]);
        assert_eq!(clips.len(), 6);
    }

    #[test]
    fn test_insert_normalizes_key() {
        let mut library = GestureLibrary::new();
        library.insert(" Hola ", signs::saludo(), WORD_HOLD);
        assert!(library.contains("hola"));
        assert!(!library.contains(" Hola "));
    }
}
