// Kineia interactive console
// Walks through the app the way a user would: sign in, open the menu, speak

use crate::voice::{print_report, VoiceInput};
use anyhow::Result;
use kineia_app::{KineiaApp, MenuAction, Screen};
use kineia_avatar::SkeletonRig;
use kineia_core::{Joint, SpeechConfig};
use kineia_speech::ChannelRecognizer;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

enum CommandResult {
    Continue,
    Exit,
    Success(String),
    Error(String),
}

pub struct InteractiveConsole {
    app: KineiaApp,
    speech: SpeechConfig,
    voice: Option<VoiceInput>,
}

impl InteractiveConsole {
    pub fn new(app: KineiaApp) -> Self {
        let speech = app.config().speech.clone();
        Self { app, speech, voice: None }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();
        self.print_help();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("kineia[{}]> ", self.app.current_screen());
            io::stdout().flush()?;

            let line = match lines.next_line().await? {
                Some(line) => line,
                None => break,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.handle_command(line).await {
                Ok(CommandResult::Continue) => continue,
                Ok(CommandResult::Exit) => break,
                Ok(CommandResult::Success(msg)) => println!("{}", msg),
                Ok(CommandResult::Error(msg)) => println!("Error: {}", msg),
                Err(e) => println!("Error: {}", e),
            }
        }

        self.close_speech().await;
        println!("Bye");
        Ok(())
    }

    fn print_banner(&self) {
        println!();
        println!("kineia console: {} gesture words loaded", self.app.player().library().len());
        println!("Type 'help' for commands, 'exit' to quit");
        println!();
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  register <name> <email> <password>  Create an account");
        println!("  login <email> <password>            Sign in");
        println!("  menu speak|read                     Pick a menu entry");
        println!("  say <text>                          Speak on the model screen");
        println!("  logout                              Sign out");
        println!("  back                                Previous screen");
        println!("  screen                              Show the screen stack");
        println!("  pose                                Joints away from rest");
        println!("  help, exit");
        println!();
    }

    async fn handle_command(&mut self, line: &str) -> Result<CommandResult> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "exit" | "quit" | "q" => Ok(CommandResult::Exit),
            "help" | "?" => {
                self.print_help();
                Ok(CommandResult::Continue)
            }
            "register" => {
                if parts.len() != 4 {
                    return Ok(CommandResult::Error("Usage: register <name> <email> <password>".to_string()));
                }
                // the notifier already told the user what went wrong
                let _ = self.app.register(parts[1], parts[2], parts[3]).await;
                Ok(CommandResult::Continue)
            }
            "login" => {
                if parts.len() != 3 {
                    return Ok(CommandResult::Error("Usage: login <email> <password>".to_string()));
                }
                let _ = self.app.login(parts[1], parts[2]).await;
                Ok(CommandResult::Continue)
            }
            "menu" => {
                if self.app.current_screen().content() != Screen::Menu {
                    return Ok(CommandResult::Error("The menu is not on screen".to_string()));
                }
                match parts.get(1).copied() {
                    Some("speak") => self.open_speech().await,
                    Some("read") => {
                        let screen = self.app.choose(MenuAction::ReadSigns);
                        Ok(CommandResult::Success(format!("{} (shows the menu)", screen)))
                    }
                    _ => Ok(CommandResult::Error("Usage: menu speak|read".to_string())),
                }
            }
            "say" => {
                let voice = match self.voice.as_mut() {
                    Some(voice) => voice,
                    None => return Ok(CommandResult::Error("Open the model screen first: menu speak".to_string())),
                };
                let text = parts[1..].join(" ");
                if let Some(report) = voice.utter(&text).await? {
                    print_report(&report);
                }
                let shown = voice.screen().display_text().await;
                Ok(CommandResult::Success(format!("> {}", shown)))
            }
            "logout" => {
                self.close_speech().await;
                match self.app.sign_out() {
                    Some(_) => Ok(CommandResult::Success("Signed out".to_string())),
                    None => Ok(CommandResult::Error("Nobody is signed in".to_string())),
                }
            }
            "back" => {
                if self.app.current_screen() == Screen::Model {
                    self.close_speech().await;
                    return Ok(CommandResult::Success(self.app.current_screen().to_string()));
                }
                match self.app.back() {
                    Some(_) => Ok(CommandResult::Success(self.app.current_screen().to_string())),
                    None => Ok(CommandResult::Error("Already on the first screen".to_string())),
                }
            }
            "screen" => {
                let history: Vec<String> = self.app.history().iter().map(|s| s.to_string()).collect();
                Ok(CommandResult::Success(history.join(" > ")))
            }
            "pose" => Ok(CommandResult::Success(self.pose())),
            _ => Ok(CommandResult::Error(format!(
                "Unknown command: {}. Type 'help' for available commands.",
                command
            ))),
        }
    }

    async fn open_speech(&mut self) -> Result<CommandResult> {
        self.app.choose(MenuAction::Speak);
        let (recognizer, feeder) = ChannelRecognizer::new(&self.speech)?;
        let screen = self.app.open_speech_screen(Arc::new(recognizer))?;
        // typing stands in for the microphone
        screen.set_permission(true).await;
        self.voice = Some(VoiceInput::new(screen, feeder));
        Ok(CommandResult::Success("Model screen. Use 'say <text>'".to_string()))
    }

    async fn close_speech(&mut self) {
        if let Some(voice) = self.voice.take() {
            self.app.close_speech_screen(voice.into_screen()).await;
        }
    }

    fn pose(&self) -> String {
        let skeleton = self.app.skeleton();
        let moved: Vec<String> = Joint::ALL
            .iter()
            .filter(|joint| skeleton.has_joint(**joint))
            .filter_map(|joint| {
                skeleton
                    .rotation_of(*joint)
                    .filter(|rotation| !rotation.is_zero())
                    .map(|rotation| format!("  {:<14} {}", joint, rotation))
            })
            .collect();

        if moved.is_empty() {
            "At rest".to_string()
        } else {
            moved.join("\n")
        }
    }
}
