//! Play a phrase on the in-memory humanoid and print every joint update

use kineia_avatar::{GestureLibrary, GesturePlayer, SceneSkeleton};
use kineia_core::PlaybackConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), kineia_avatar::AvatarError> {
    tracing_subscriber::fmt::init();

    let rig = Arc::new(SceneSkeleton::humanoid());
    let mut updates = rig.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(update) = updates.recv().await {
            println!("{:<14} {} -> {}", update.joint, update.delta, update.rotation);
        }
    });

    let config = PlaybackConfig { animation_speed: 2.0, ..PlaybackConfig::default() };
    let player = GesturePlayer::new(Arc::new(GestureLibrary::builtin()), rig.clone(), config)?;

    let report = player.play_words(&["hola", "how", "you", "feel"]).await;
    println!("\nplayed: {:?}", report.played);
    println!("at rest: {}", rig.is_at_rest());

    drop(player);
    drop(rig);
    let _ = printer.await;
    Ok(())
}
