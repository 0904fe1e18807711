//! Registration and sign-in flows

use crate::auth::{AuthProvider, AuthUser};
use crate::error::AccountError;
use crate::profile::UserProfile;
use crate::store::ProfileStore;
use kineia_core::{Notification, Notifier};
use std::sync::Arc;
use tracing::{error, info};

/// Name given to federated users whose provider shares none
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// A signed-in user
#[derive(Debug, Clone)]
pub struct AccountSession {
    pub user: AuthUser,
    /// `None` when the profile could not be read or written
    pub profile: Option<UserProfile>,
    /// The profile was created by this sign-in
    pub first_sign_in: bool,
}

/// Ties the auth provider, the profile store and user notifications together.
///
/// Each call reports its outcome through the notifier exactly once; nothing
/// is retried.
pub struct AccountService {
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    notifier: Arc<dyn Notifier>,
}

fn required(value: &str, field: &'static str) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        Err(AccountError::MissingField(field))
    } else {
        Ok(())
    }
}

impl AccountService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { auth, profiles, notifier }
    }

    /// Create an email/password account and its profile
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AccountSession, AccountError> {
        let checked = required(name, "Name")
            .and_then(|_| required(email, "Email"))
            .and_then(|_| required(password, "Password"));
        if let Err(e) = checked {
            self.notifier.notify(Notification::warning("Please fill in all fields"));
            return Err(e);
        }

        let user = match self.auth.create_user(email, password).await {
            Ok(user) => user,
            Err(e) => {
                error!("Registration failed: {}", e);
                self.notifier.notify(Notification::error(format!("Registration failed: {}", e)));
                return Err(e);
            }
        };

        let name = name.trim();
        let profile = UserProfile::new(name, user.email.clone().unwrap_or_default());
        if let Err(e) = self.profiles.put(&user.uid, profile.clone()).await {
            error!("Could not create profile for {}: {}", user.uid, e);
            self.notifier.notify(Notification::error(format!("Could not create profile: {}", e)));
            return Err(e);
        }

        info!("Registered user {}", user.uid);
        self.notifier.notify(Notification::info(format!("Welcome {}!", name)));
        Ok(AccountSession {
            user,
            profile: Some(profile),
            first_sign_in: true,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AccountSession, AccountError> {
        let checked = required(email, "Email").and_then(|_| required(password, "Password"));
        if let Err(e) = checked {
            self.notifier.notify(Notification::warning("Please enter email and password"));
            return Err(e);
        }

        let user = match self.auth.sign_in(email, password).await {
            Ok(user) => user,
            Err(e) => {
                error!("Sign-in failed: {}", e);
                self.notifier.notify(Notification::error(format!("Sign-in failed: {}", e)));
                return Err(e);
            }
        };

        // the profile is informational here; a read failure does not block sign-in
        let profile = match self.profiles.get(&user.uid).await {
            Ok(profile) => profile,
            Err(e) => {
                error!("Could not load profile for {}: {}", user.uid, e);
                None
            }
        };

        info!("User {} signed in", user.uid);
        self.notifier.notify(Notification::info("Signed in"));
        Ok(AccountSession {
            user,
            profile,
            first_sign_in: false,
        })
    }

    /// Federated sign-in. The profile is created the first time only.
    ///
    /// Failing to write that first profile is reported but the sign-in stands.
    pub async fn login_with_token(&self, token: &str) -> Result<AccountSession, AccountError> {
        let user = match self.auth.sign_in_with_token(token).await {
            Ok(user) => user,
            Err(e) => {
                error!("Federated sign-in failed: {}", e);
                self.notifier.notify(Notification::error(format!("Federated sign-in failed: {}", e)));
                return Err(e);
            }
        };

        let existing = match self.profiles.get(&user.uid).await {
            Ok(existing) => existing,
            Err(e) => {
                error!("Could not check profile for {}: {}", user.uid, e);
                self.notifier.notify(Notification::error(format!("Connection error: {}", e)));
                return Err(e);
            }
        };

        if let Some(profile) = existing {
            info!("User {} signed in with token", user.uid);
            self.notifier.notify(Notification::info("Signed in"));
            return Ok(AccountSession {
                user,
                profile: Some(profile),
                first_sign_in: false,
            });
        }

        let name = user
            .display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
        let profile = UserProfile::new(name.clone(), user.email.clone().unwrap_or_default());

        let profile = match self.profiles.put(&user.uid, profile.clone()).await {
            Ok(()) => {
                info!("Created profile for federated user {}", user.uid);
                self.notifier.notify(Notification::info(format!("Welcome {}!", name)));
                Some(profile)
            }
            Err(e) => {
                error!("Could not create profile for {}: {}", user.uid, e);
                self.notifier.notify(Notification::error(format!("Could not create profile: {}", e)));
                None
            }
        };

        Ok(AccountSession {
            user,
            profile,
            first_sign_in: true,
        })
    }
}
