//! Reads lines from stdin as if they were recognizer transcripts and prints
//! the words the gesture dictionary would be queried with.

use kineia_core::SpeechConfig;
use kineia_speech::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let (recognizer, feeder) = ChannelRecognizer::new(&SpeechConfig::default())?;
    let mut events = recognizer.take_events().ok_or("event stream already taken")?;

    let mut session = ListeningSession::new();
    session.set_permission(true);

    info!("Type a phrase per line, Ctrl-D to quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        session.toggle(&recognizer).await?;
        feeder.say(line);

        if let Some(event) = events.recv().await {
            if let Some(utterance) = session.on_event(event) {
                println!("{:?}", utterance.words());
            } else {
                println!("{}", session.display_text());
            }
        }
    }

    recognizer.destroy().await;
    Ok(())
}
