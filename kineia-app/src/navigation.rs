//! Screen stack

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Login,
    Menu,
    /// Speech to gesture, with the avatar
    Model,
    /// Sign reading; not built yet, shows the menu
    Camera,
}

impl Screen {
    pub fn route(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Menu => "Menu",
            Screen::Model => "Model",
            Screen::Camera => "Camera",
        }
    }

    /// Screen whose content is actually rendered for this route
    pub fn content(&self) -> Screen {
        match self {
            Screen::Camera => Screen::Menu,
            other => *other,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

/// Buttons on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    ReadSigns,
    Speak,
}

impl MenuAction {
    pub fn target(&self) -> Screen {
        match self {
            MenuAction::ReadSigns => Screen::Camera,
            MenuAction::Speak => Screen::Model,
        }
    }
}

/// Back stack of screens, starting at [`Screen::Login`]
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self { stack: vec![Screen::Login] }
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Login)
    }

    pub fn navigate(&mut self, screen: Screen) {
        debug!("Navigate {} -> {}", self.current(), screen);
        self.stack.push(screen);
    }

    /// Pop the current screen. The start screen is never popped.
    pub fn back(&mut self) -> Option<Screen> {
        if self.stack.len() <= 1 {
            return None;
        }
        let left = self.stack.pop();
        debug!("Back to {}", self.current());
        left
    }

    pub fn history(&self) -> &[Screen] {
        &self.stack
    }
}
