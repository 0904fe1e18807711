//! kineia-app: screens and wiring
//!
//! - Screen stack (login, menu, model, camera)
//! - Speech-to-gesture screen controller
//! - [`KineiaApp`], which builds the player, the accounts and the navigator from configuration

pub mod error;
pub mod navigation;
pub mod speech_screen;
pub mod app;

pub use error::AppError;
pub use navigation::{MenuAction, Navigator, Screen};
pub use speech_screen::SpeechScreen;
pub use app::KineiaApp;
