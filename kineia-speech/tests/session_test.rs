//! Listening session driven through the channel recognizer

use kineia_core::SpeechConfig;
use kineia_speech::*;

fn setup() -> (ChannelRecognizer, TranscriptFeeder, ListeningSession) {
    let (recognizer, feeder) = ChannelRecognizer::new(&SpeechConfig::default()).unwrap();
    (recognizer, feeder, ListeningSession::new())
}

#[tokio::test]
async fn test_toggle_requires_permission() {
    let (recognizer, _feeder, mut session) = setup();

    let result = session.toggle(&recognizer).await;
    assert!(matches!(result, Err(SpeechError::PermissionDenied)));
    assert_eq!(session.state(), ListenState::Idle);
    assert!(!recognizer.is_listening());
}

#[tokio::test]
async fn test_toggle_starts_and_stops() {
    let (recognizer, _feeder, mut session) = setup();
    session.set_permission(true);
    assert_eq!(session.button_label(), "Start listening");

    assert_eq!(session.toggle(&recognizer).await.unwrap(), ListenState::Listening);
    assert!(recognizer.is_listening());
    assert_eq!(session.button_label(), "Stop listening");

    assert_eq!(session.toggle(&recognizer).await.unwrap(), ListenState::Idle);
    assert!(!recognizer.is_listening());
}

#[tokio::test]
async fn test_final_transcript_returns_to_idle() {
    let (recognizer, feeder, mut session) = setup();
    let mut events = recognizer.take_events().unwrap();
    session.set_permission(true);

    session.toggle(&recognizer).await.unwrap();
    assert!(feeder.say("¡Hola! How are you"));

    let event = events.recv().await.unwrap();
    let utterance = session.on_event(event).unwrap();
    assert_eq!(utterance.words(), &["hola", "how", "are", "you"]);
    assert_eq!(session.display_text(), "¡Hola! How are you");
    assert_eq!(session.state(), ListenState::Idle);

    // next turn starts cleanly without a stop
    assert_eq!(session.toggle(&recognizer).await.unwrap(), ListenState::Listening);
}

#[tokio::test]
async fn test_error_is_displayed() {
    let (recognizer, feeder, mut session) = setup();
    let mut events = recognizer.take_events().unwrap();
    session.set_permission(true);

    session.toggle(&recognizer).await.unwrap();
    assert!(feeder.fail(RecognizerErrorKind::from_code(7)));

    let event = events.recv().await.unwrap();
    assert!(session.on_event(event).is_none());
    assert_eq!(session.display_text(), "Error: no match found");
    assert!(!session.is_listening());
}

#[tokio::test]
async fn test_destroyed_recognizer_cannot_listen() {
    let (recognizer, _feeder, mut session) = setup();
    session.set_permission(true);
    recognizer.destroy().await;

    let result = session.toggle(&recognizer).await;
    assert!(matches!(result, Err(SpeechError::Destroyed)));
    assert_eq!(session.state(), ListenState::Idle);
}

#[test]
fn test_revoking_permission() {
    let mut session = ListeningSession::new();
    session.set_permission(true);
    assert!(session.has_permission());
    session.set_permission(false);
    assert!(!session.has_permission());
}
