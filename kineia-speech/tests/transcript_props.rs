//! Normalizer properties

use kineia_speech::{normalize_word, SpokenUtterance};
use proptest::prelude::*;

const ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzáéíóúüñ";

proptest! {
    #[test]
    fn normalized_words_only_hold_dictionary_letters(raw in "\\PC{0,24}") {
        let word = normalize_word(&raw);
        prop_assert!(word.chars().all(|c| ALLOWED.contains(c)));
    }

    #[test]
    fn normalizing_is_idempotent(raw in "\\PC{0,24}") {
        let once = normalize_word(&raw);
        prop_assert_eq!(normalize_word(&once), once);
    }

    #[test]
    fn utterance_words_are_never_empty(text in "[a-zA-Z¡!¿?,. 0-9]{0,60}") {
        let utterance = SpokenUtterance::parse(text.clone());
        prop_assert!(utterance.words().iter().all(|w| !w.is_empty()));
        prop_assert!(utterance.words().len() <= text.split_whitespace().count());
        prop_assert_eq!(utterance.transcript(), text.as_str());
    }

    #[test]
    fn lowercase_words_pass_through(word in "[a-zñ]{1,12}") {
        prop_assert_eq!(normalize_word(&word), word);
    }
}
