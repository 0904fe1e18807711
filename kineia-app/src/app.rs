//! Application wiring

use crate::error::AppError;
use crate::navigation::{MenuAction, Navigator, Screen};
use crate::speech_screen::SpeechScreen;
use kineia_account::{
    AccountError, AccountService, AccountSession, AuthProvider, InMemoryAuthProvider, InMemoryProfileStore,
    ProfileStore,
};
use kineia_avatar::{GestureLibrary, GesturePlayer, SceneSkeleton};
use kineia_core::{KineiaConfig, Notifier};
use kineia_speech::SpeechRecognizer;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything a running kineia front-end needs
pub struct KineiaApp {
    config: KineiaConfig,
    notifier: Arc<dyn Notifier>,
    navigator: Mutex<Navigator>,
    accounts: AccountService,
    signed_in: Mutex<Option<AccountSession>>,
    skeleton: Arc<SceneSkeleton>,
    player: Arc<GesturePlayer>,
}

impl KineiaApp {
    pub fn new(
        config: KineiaConfig,
        library: GestureLibrary,
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let skeleton = Arc::new(SceneSkeleton::humanoid());
        let player = Arc::new(GesturePlayer::new(
            Arc::new(library),
            skeleton.clone(),
            config.playback.clone(),
        )?);

        info!(
            "{} ready: {} gesture words, model {}",
            config.instance.name,
            player.library().len(),
            config.model.asset_path
        );

        Ok(Self {
            accounts: AccountService::new(auth, profiles, notifier.clone()),
            config,
            notifier,
            navigator: Mutex::new(Navigator::new()),
            signed_in: Mutex::new(None),
            skeleton,
            player,
        })
    }

    /// Built-in gestures with in-memory accounts
    pub fn in_memory(config: KineiaConfig, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        config.validate()?;
        let auth = Arc::new(InMemoryAuthProvider::new()?);
        Self::new(
            config,
            GestureLibrary::builtin(),
            auth,
            Arc::new(InMemoryProfileStore::new()),
            notifier,
        )
    }

    pub fn config(&self) -> &KineiaConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn player(&self) -> &Arc<GesturePlayer> {
        &self.player
    }

    pub fn skeleton(&self) -> &Arc<SceneSkeleton> {
        &self.skeleton
    }

    pub fn current_screen(&self) -> Screen {
        self.navigator.lock().current()
    }

    pub fn history(&self) -> Vec<Screen> {
        self.navigator.lock().history().to_vec()
    }

    pub fn back(&self) -> Option<Screen> {
        self.navigator.lock().back()
    }

    pub fn signed_in(&self) -> Option<AccountSession> {
        self.signed_in.lock().clone()
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AccountError> {
        let session = self.accounts.register(name, email, password).await?;
        self.enter_menu(session);
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), AccountError> {
        let session = self.accounts.login(email, password).await?;
        self.enter_menu(session);
        Ok(())
    }

    pub async fn login_with_token(&self, token: &str) -> Result<(), AccountError> {
        let session = self.accounts.login_with_token(token).await?;
        self.enter_menu(session);
        Ok(())
    }

    /// Pick up a session that is still signed in and skip the login screen
    pub fn resume(&self, session: AccountSession) -> Screen {
        info!("Resuming session for user {}", session.user.uid);
        if self.current_screen() == Screen::Login {
            self.enter_menu(session);
        } else {
            *self.signed_in.lock() = Some(session);
        }
        self.current_screen()
    }

    /// Forget the signed-in user and start over at the login screen
    pub fn sign_out(&self) -> Option<AccountSession> {
        let session = self.signed_in.lock().take();
        *self.navigator.lock() = Navigator::new();
        if let Some(session) = &session {
            info!("User {} signed out", session.user.uid);
        }
        session
    }

    fn enter_menu(&self, session: AccountSession) {
        *self.signed_in.lock() = Some(session);
        self.navigator.lock().navigate(Screen::Menu);
    }

    /// Follow a menu button. Speaking opens the speech screen separately.
    pub fn choose(&self, action: MenuAction) -> Screen {
        let target = action.target();
        self.navigator.lock().navigate(target);
        target
    }

    /// Navigate to the model screen and start handling `recognizer`'s events
    pub fn open_speech_screen(&self, recognizer: Arc<dyn SpeechRecognizer>) -> Result<SpeechScreen, AppError> {
        let screen = SpeechScreen::open(recognizer, self.player.clone(), self.notifier.clone())?;
        let mut navigator = self.navigator.lock();
        if navigator.current() != Screen::Model {
            navigator.navigate(Screen::Model);
        }
        Ok(screen)
    }

    /// Tear the speech screen down and go back.
    ///
    /// A clip cut off by the exit leaves joints rotated, so the shared
    /// skeleton is put back at rest for the next screen.
    pub async fn close_speech_screen(&self, screen: SpeechScreen) {
        screen.exit().await;
        if !self.skeleton.is_at_rest() {
            debug!("Returning the avatar to rest after an interrupted gesture");
            self.skeleton.reset();
        }
        let mut navigator = self.navigator.lock();
        if navigator.current() == Screen::Model {
            navigator.back();
        }
    }
}
