//! Transcript tokenization
//!
//! Recognized text is split on whitespace and each token is reduced to the
//! lowercase letters the gesture dictionary is keyed on: `a-z` plus the Spanish
//! vowels with accents, `ü` and `ñ`. Everything else (punctuation, digits,
//! inverted marks) is dropped.

use serde::{Deserialize, Serialize};

/// Letters kept besides ASCII `a-z`
const EXTRA_LETTERS: [char; 7] = ['á', 'é', 'í', 'ó', 'ú', 'ü', 'ñ'];

fn is_word_char(c: char) -> bool {
    c.is_ascii_lowercase() || EXTRA_LETTERS.contains(&c)
}

/// Normalize one raw token; the result may be empty
pub fn normalize_word(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c))
        .collect()
}

/// A final transcript and the normalized words it contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenUtterance {
    transcript: String,
    words: Vec<String>,
}

impl SpokenUtterance {
    pub fn parse(transcript: impl Into<String>) -> Self {
        let transcript = transcript.into();
        let words = transcript
            .split_whitespace()
            .map(normalize_word)
            .filter(|word| !word.is_empty())
            .collect();
        Self { transcript, words }
    }

    /// Text as the recognizer produced it (for display)
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Hola "), "hola");
        assert_eq!(normalize_word("¡Hola!"), "hola");
        assert_eq!(normalize_word("HÉLLO"), "héllo");
        assert_eq!(normalize_word("Niño,"), "niño");
        assert_eq!(normalize_word("pingüino"), "pingüino");
        assert_eq!(normalize_word("you're"), "youre");
        assert_eq!(normalize_word("42"), "");
        assert_eq!(normalize_word("..."), "");
    }

    #[test]
    fn test_non_spanish_accents_are_dropped() {
        assert_eq!(normalize_word("çà"), "");
        assert_eq!(normalize_word("naïve"), "nave");
    }

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        let utterance = SpokenUtterance::parse("Hola, hola ¿how are you?");
        assert_eq!(utterance.words(), &["hola", "hola", "how", "are", "you"]);
        assert_eq!(utterance.transcript(), "Hola, hola ¿how are you?");
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        let utterance = SpokenUtterance::parse("  b \t e  !! 3 ");
        assert_eq!(utterance.words(), &["b", "e"]);
        assert!(SpokenUtterance::parse("").is_empty());
        assert!(SpokenUtterance::parse("¿? ...").is_empty());
    }
}
