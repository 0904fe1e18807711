// Kineia command line interface
// Plays sign gestures for typed or "spoken" text on an in-memory avatar

mod console;
mod voice;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kineia_app::KineiaApp;
use kineia_avatar::{GestureLibrary, GesturePlayer, SceneSkeleton};
use kineia_core::{KineiaConfig, TracingNotifier};
use kineia_speech::{normalize_word, ChannelRecognizer, SpokenUtterance};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

#[derive(Parser)]
#[command(name = "kineia")]
#[command(about = "Speech to sign-language avatar gestures", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON, TOML or YAML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Extra gesture clips (TOML)
    #[arg(long, global = true)]
    clips: Option<PathBuf>,

    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a phrase and print every joint rotation
    Play {
        text: Vec<String>,

        /// Animation speed multiplier (0.5 - 2.0)
        #[arg(long, short)]
        speed: Option<f64>,

        /// Apply rotations without renderer smoothing
        #[arg(long)]
        no_smooth: bool,

        /// Print the playback report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Treat every stdin line as a recognized transcript and sign it
    Listen,

    /// Interactive console (sign in, menu, speak)
    Console,

    /// List the gesture dictionary
    Gestures {
        #[arg(long)]
        json: bool,
    },

    /// Show how a phrase is tokenized
    Normalize { text: Vec<String> },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Check a configuration file
    Validate { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter = init_tracing(cli.verbose, std::env::var("RUST_LOG").ok());
    let config = load_config(cli.config.as_deref())?;
    if let Some(filter) = filter {
        if let Err(e) = filter.reload(EnvFilter::new(&config.instance.log_level)) {
            warn!("Could not apply log level {}: {}", config.instance.log_level, e);
        }
    }

    match cli.command {
        Commands::Play { text, speed, no_smooth, json } => {
            let mut config = config;
            if let Some(speed) = speed {
                config.playback.animation_speed = speed;
            }
            if no_smooth {
                config.playback.smooth = false;
            }
            play(&config, cli.clips.as_deref(), &text.join(" "), json).await?;
        }
        Commands::Listen => {
            listen(config, cli.clips.as_deref()).await?;
        }
        Commands::Console => {
            let app = build_app(config, cli.clips.as_deref())?;
            console::InteractiveConsole::new(app).run().await?;
        }
        Commands::Gestures { json } => {
            list_gestures(&load_library(cli.clips.as_deref())?, json)?;
        }
        Commands::Normalize { text } => {
            normalize(&text.join(" "));
        }
        Commands::Config(cmd) => {
            handle_config_command(&config, cmd)?;
        }
    }

    Ok(())
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Starting filter, and whether the config file's log level may replace it
fn startup_directive(verbose: bool, rust_log: Option<String>) -> (String, bool) {
    match rust_log.filter(|directive| !directive.trim().is_empty()) {
        Some(directive) => (directive, false),
        None if verbose => ("debug".to_string(), false),
        None => ("info".to_string(), true),
    }
}

/// Installed before the config loads so its warnings are not lost.
/// Returns a handle when the config's `log_level` should take over.
fn init_tracing(verbose: bool, rust_log: Option<String>) -> Option<FilterHandle> {
    let (directive, reloadable) = startup_directive(verbose, rust_log);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
    reloadable.then_some(handle)
}

/// Defaults, then the file, then `KINEIA_*` variables
fn load_config(path: Option<&Path>) -> anyhow::Result<KineiaConfig> {
    let mut config = match path {
        Some(path) => KineiaConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => KineiaConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

fn load_library(clips: Option<&Path>) -> anyhow::Result<GestureLibrary> {
    let mut library = GestureLibrary::builtin();
    if let Some(path) = clips {
        let extra = GestureLibrary::load_file(path)
            .with_context(|| format!("Failed to load clips from {}", path.display()))?;
        library.merge(extra);
    }
    Ok(library)
}

fn build_app(config: KineiaConfig, clips: Option<&Path>) -> anyhow::Result<KineiaApp> {
    let library = load_library(clips)?;
    let auth = Arc::new(kineia_account::InMemoryAuthProvider::new()?);
    let app = KineiaApp::new(
        config,
        library,
        auth,
        Arc::new(kineia_account::InMemoryProfileStore::new()),
        Arc::new(TracingNotifier),
    )?;
    Ok(app)
}

/// Print joint updates as they happen until the skeleton goes away
fn spawn_pose_printer(skeleton: &SceneSkeleton) -> tokio::task::JoinHandle<()> {
    let mut updates = skeleton.subscribe();
    tokio::spawn(async move {
        let start = Instant::now();
        loop {
            match updates.recv().await {
                Ok(update) => println!(
                    "{:>6} ms  {:<14} {} -> {}",
                    start.elapsed().as_millis(),
                    update.joint,
                    update.delta,
                    update.rotation
                ),
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {} joint updates", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn play(config: &KineiaConfig, clips: Option<&Path>, text: &str, json: bool) -> anyhow::Result<()> {
    config.validate()?;
    let library = load_library(clips)?;
    let skeleton = Arc::new(SceneSkeleton::humanoid());
    let player = GesturePlayer::new(Arc::new(library), skeleton.clone(), config.playback.clone())?;

    let utterance = SpokenUtterance::parse(text);
    info!("Signing {:?}", utterance.words());

    let printer = if json { None } else { Some(spawn_pose_printer(&skeleton)) };
    let report = player.play_words(utterance.words()).await;
    let at_rest = skeleton.is_at_rest();

    // the printer ends once every handle on the skeleton is gone
    drop(player);
    drop(skeleton);
    if let Some(printer) = printer {
        printer.await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        voice::print_report(&report);
        println!("at rest: {}", at_rest);
    }
    Ok(())
}

async fn listen(config: KineiaConfig, clips: Option<&Path>) -> anyhow::Result<()> {
    let speech = config.speech.clone();
    let app = build_app(config, clips)?;
    let printer = spawn_pose_printer(app.skeleton());

    let (recognizer, feeder) = ChannelRecognizer::new(&speech)?;
    let screen = app.open_speech_screen(Arc::new(recognizer))?;
    screen.set_permission(true).await;
    let mut voice = voice::VoiceInput::new(screen, feeder);

    info!("Listening on stdin ({}), one phrase per line", speech.language);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match voice.utter(&line).await {
            Ok(Some(report)) => voice::print_report(&report),
            Ok(None) => println!("{}", voice.screen().display_text().await),
            Err(e) => warn!("{}", e),
        }
    }

    app.close_speech_screen(voice.into_screen()).await;
    drop(app);
    printer.await?;
    Ok(())
}

fn list_gestures(library: &GestureLibrary, json: bool) -> anyhow::Result<()> {
    let clips = library.clips();
    if json {
        let listing: Vec<serde_json::Value> = clips
            .values()
            .map(|(clip, words)| {
                serde_json::json!({
                    "clip": &**clip,
                    "words": words,
                    "hold_after_ms": words
                        .first()
                        .and_then(|w| library.lookup(w))
                        .map(|entry| entry.hold_after.as_millis() as u64)
                        .unwrap_or_default(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{:<10} {:>8} {:>7}  words", "clip", "steps", "pause");
    for (name, (clip, words)) in &clips {
        println!(
            "{:<10} {:>8} {:>5}ms  {}",
            name,
            clip.steps().len(),
            clip.total_pause().as_millis(),
            words.join(", ")
        );
    }
    Ok(())
}

fn normalize(text: &str) {
    for raw in text.split_whitespace() {
        let word = normalize_word(raw);
        if word.is_empty() {
            println!("{:<16} (dropped)", raw);
        } else {
            println!("{:<16} {}", raw, word);
        }
    }
}

fn handle_config_command(config: &KineiaConfig, cmd: ConfigCommands) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Validate { file } => {
            let loaded = KineiaConfig::from_file(&file)?;
            loaded.validate()?;
            println!("{} is valid", file.display());
        }
    }
    Ok(())
}
