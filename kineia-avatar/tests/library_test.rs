//! Gesture dictionary tests for kineia-avatar

use kineia_avatar::{AvatarError, GestureLibrary, GestureStep, WORD_HOLD};
use kineia_core::{Joint, Rotation};
use std::io::Write;
use std::time::Duration;

const CLIP_FILE: &str = r#"
[[clip]]
name = "gracias"
words = ["gracias", "Thanks"]
hold_after_ms = 600
steps = [
  { op = "rotate", joint = "hand.R", delta = { x = 45.0, y = 0.0, z = 0.0 } },
  { op = "pause", ms = 400 },
  { op = "rotate", joint = "hand.R", delta = { x = -45.0, y = 0.0, z = 0.0 } },
]

[[clip]]
name = "wave"
words = ["hola"]
steps = [
  { op = "rotate", joint = "upper_arm.L", delta = { x = 90.0, y = 0.0, z = 0.0 } },
  { op = "rotate", joint = "upper_arm.L", delta = { x = -90.0, y = 0.0, z = 0.0 } },
]
"#;

#[test]
fn test_builtin_vocabulary() {
    let library = GestureLibrary::builtin();
    assert_eq!(
        library.words(),
        vec!["b", "e", "feel", "hello", "hi", "hola", "how", "you"]
    );
    assert!(library.lookup("adiós").is_none());
    assert!(library.lookup("Hola").is_none(), "lookup expects normalized words");
}

#[test]
fn test_hold_after_whole_words_only() {
    let library = GestureLibrary::builtin();
    for word in ["hola", "hi", "hello", "how", "you", "feel"] {
        assert_eq!(library.lookup(word).unwrap().hold_after, WORD_HOLD, "{}", word);
    }
    for letter in ["b", "e"] {
        assert_eq!(library.lookup(letter).unwrap().hold_after, Duration::ZERO);
    }
}

#[test]
fn test_hola_documented_steps() {
    let library = GestureLibrary::builtin();
    let clip = &library.lookup("hola").unwrap().clip;
    assert_eq!(
        clip.steps(),
        &[
            GestureStep::Rotate { joint: Joint::UpperArmR, delta: Rotation::new(90.0, 0.0, 0.0) },
            GestureStep::Rotate { joint: Joint::ForearmR, delta: Rotation::new(64.0, 0.0, 0.0) },
            GestureStep::Pause { ms: 500 },
            GestureStep::Rotate { joint: Joint::ForearmR, delta: Rotation::new(-64.0, 0.0, 0.0) },
            GestureStep::Pause { ms: 500 },
            GestureStep::Rotate { joint: Joint::UpperArmR, delta: Rotation::new(-90.0, 0.0, 0.0) },
        ]
    );
}

#[test]
fn test_every_builtin_clip_returns_to_rest() {
    for (name, (clip, _)) in GestureLibrary::builtin().clips() {
        assert!(clip.returns_to_rest(), "{} leaves a joint rotated", name);
    }
}

#[test]
fn test_clip_file_parses() {
    let library = GestureLibrary::from_toml_str(CLIP_FILE).unwrap();
    assert_eq!(library.words(), vec!["gracias", "hola", "thanks"]);

    let gracias = library.lookup("thanks").unwrap();
    assert_eq!(gracias.clip.name(), "gracias");
    assert_eq!(gracias.hold_after, Duration::from_millis(600));
    assert_eq!(gracias.clip.total_pause(), Duration::from_millis(400));
    assert_eq!(library.lookup("hola").unwrap().hold_after, Duration::ZERO);
}

#[test]
fn test_merge_overrides_builtin_words() {
    let mut library = GestureLibrary::builtin();
    library.merge(GestureLibrary::from_toml_str(CLIP_FILE).unwrap());

    assert_eq!(library.lookup("hola").unwrap().clip.name(), "wave");
    // the other greetings keep the built-in clip
    assert_eq!(library.lookup("hello").unwrap().clip.name(), "saludo");
    assert!(library.contains("gracias"));
    assert_eq!(library.len(), 10);
}

#[test]
fn test_load_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(CLIP_FILE.as_bytes()).unwrap();
    let library = GestureLibrary::load_file(file.path()).unwrap();
    assert_eq!(library.len(), 3);

    let missing = GestureLibrary::load_file("/definitely/not/here.toml");
    assert!(matches!(missing, Err(AvatarError::Io(_))));
}

#[test]
fn test_clip_file_errors() {
    let unknown_joint = r#"
[[clip]]
name = "bad"
words = ["bad"]
steps = [ { op = "rotate", joint = "spine", delta = { x = 1.0, y = 0.0, z = 0.0 } } ]
"#;
    assert!(matches!(
        GestureLibrary::from_toml_str(unknown_joint),
        Err(AvatarError::Parse(_))
    ));

    let no_words = r#"
[[clip]]
name = "orphan"
words = []
steps = [ { op = "pause", ms = 10 } ]
"#;
    assert!(matches!(
        GestureLibrary::from_toml_str(no_words),
        Err(AvatarError::Clip(_))
    ));

    let long_pause = r#"
[[clip]]
name = "sleepy"
words = ["sleepy"]
steps = [ { op = "pause", ms = 60000 } ]
"#;
    assert!(matches!(
        GestureLibrary::from_toml_str(long_pause),
        Err(AvatarError::Clip(_))
    ));

    assert!(GestureLibrary::from_toml_str("").unwrap().is_empty());
}
