//! Navigation through login, menu and the speech screen

use kineia_account::{HashingCost, InMemoryAuthProvider, InMemoryProfileStore};
use kineia_app::*;
use kineia_avatar::GestureLibrary;
use kineia_core::{CollectingNotifier, KineiaConfig, SpeechConfig};
use kineia_speech::ChannelRecognizer;
use std::sync::Arc;
use std::time::Duration;

fn app() -> (KineiaApp, Arc<InMemoryAuthProvider>, Arc<CollectingNotifier>) {
    let cost = HashingCost { memory_kib: 64, iterations: 1, parallelism: 1 };
    let auth = Arc::new(InMemoryAuthProvider::with_cost(cost).unwrap());
    let notifier = Arc::new(CollectingNotifier::new());
    let app = KineiaApp::new(
        KineiaConfig::default(),
        GestureLibrary::builtin(),
        auth.clone(),
        Arc::new(InMemoryProfileStore::new()),
        notifier.clone(),
    )
    .unwrap();
    (app, auth, notifier)
}

#[tokio::test]
async fn test_starts_at_login() {
    let (app, _, _) = app();
    assert_eq!(app.current_screen(), Screen::Login);
    assert!(app.signed_in().is_none());
}

#[tokio::test]
async fn test_register_goes_to_menu() {
    let (app, _, notifier) = app();
    app.register("Ana", "ana@example.com", "s3cret-pass").await.unwrap();

    assert_eq!(app.current_screen(), Screen::Menu);
    let session = app.signed_in().unwrap();
    assert_eq!(session.profile.unwrap().name, "Ana");
    assert_eq!(notifier.messages(), vec!["Welcome Ana!"]);
}

#[tokio::test]
async fn test_failed_login_stays_on_login() {
    let (app, _, _) = app();
    assert!(app.login("ana@example.com", "s3cret-pass").await.is_err());
    assert_eq!(app.current_screen(), Screen::Login);
    assert!(app.signed_in().is_none());
}

#[tokio::test]
async fn test_token_login_goes_to_menu() {
    let (app, auth, _) = app();
    auth.register_identity("token", Some("eva@example.com".to_string()), Some("Eva".to_string()));
    app.login_with_token("token").await.unwrap();
    assert_eq!(app.current_screen(), Screen::Menu);
}

#[tokio::test]
async fn test_resumed_session_skips_login() {
    let (first, _, _) = app();
    first.register("Ana", "ana@example.com", "s3cret-pass").await.unwrap();
    let session = first.signed_in().unwrap();

    let (app, _, notifier) = app();
    assert_eq!(app.resume(session.clone()), Screen::Menu);
    assert_eq!(app.history(), vec![Screen::Login, Screen::Menu]);
    assert_eq!(app.signed_in().unwrap().user.uid, session.user.uid);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_sign_out_returns_to_login() {
    let (app, _, _) = app();
    app.register("Ana", "ana@example.com", "s3cret-pass").await.unwrap();
    app.choose(MenuAction::ReadSigns);

    let session = app.sign_out().unwrap();
    assert_eq!(session.profile.unwrap().name, "Ana");
    assert!(app.signed_in().is_none());
    assert_eq!(app.history(), vec![Screen::Login]);
    assert!(app.sign_out().is_none());

    app.login("ana@example.com", "s3cret-pass").await.unwrap();
    assert_eq!(app.current_screen(), Screen::Menu);
}

#[tokio::test]
async fn test_menu_and_speech_screen() {
    let (app, _, _) = app();
    app.register("Ana", "ana@example.com", "s3cret-pass").await.unwrap();

    assert_eq!(app.choose(MenuAction::ReadSigns), Screen::Camera);
    assert_eq!(app.current_screen().content(), Screen::Menu);
    assert_eq!(app.back(), Some(Screen::Camera));

    app.choose(MenuAction::Speak);
    let (recognizer, _feeder) = ChannelRecognizer::new(&SpeechConfig::default()).unwrap();
    let screen = app.open_speech_screen(Arc::new(recognizer)).unwrap();
    assert_eq!(app.current_screen(), Screen::Model);
    assert_eq!(app.history(), vec![Screen::Login, Screen::Menu, Screen::Model]);

    app.close_speech_screen(screen).await;
    assert_eq!(app.current_screen(), Screen::Menu);
}

#[tokio::test(start_paused = true)]
async fn test_interrupted_gesture_does_not_leak_into_next_screen() {
    let (app, _, _) = app();
    app.choose(MenuAction::Speak);

    let (recognizer, feeder) = ChannelRecognizer::new(&SpeechConfig::default()).unwrap();
    let screen = app.open_speech_screen(Arc::new(recognizer)).unwrap();
    screen.set_permission(true).await;
    screen.toggle().await.unwrap();
    assert!(feeder.say("hola"));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!app.skeleton().is_at_rest());
    app.close_speech_screen(screen).await;
    assert!(app.skeleton().is_at_rest());

    let (recognizer, feeder) = ChannelRecognizer::new(&SpeechConfig::default()).unwrap();
    let screen = app.open_speech_screen(Arc::new(recognizer)).unwrap();
    let mut reports = screen.subscribe_reports();
    screen.set_permission(true).await;
    screen.toggle().await.unwrap();
    assert!(feeder.say("hola"));

    let report = reports.recv().await.unwrap();
    assert_eq!(report.played, vec!["hola"]);
    assert!(app.skeleton().is_at_rest());
    app.close_speech_screen(screen).await;
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = KineiaConfig::default();
    config.playback.animation_speed = 0.1;
    let result = KineiaApp::in_memory(config, Arc::new(CollectingNotifier::new()));
    assert!(matches!(result, Err(AppError::Config(_))));
}
