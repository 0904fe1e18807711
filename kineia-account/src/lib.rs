//! kineia-account: users, credentials and lesson progress
//!
//! Credentials live only in the [`AuthProvider`]'s store, hashed. The profile
//! kept in the [`ProfileStore`] carries name, email and lesson progress.

pub mod error;
pub mod profile;
pub mod auth;
pub mod store;
pub mod service;

pub use error::AccountError;
pub use profile::{LessonId, LessonProgress, UserProfile};
pub use auth::{AuthProvider, AuthUser, HashingCost, InMemoryAuthProvider, MIN_PASSWORD_BYTES, MAX_PASSWORD_BYTES};
pub use store::{InMemoryProfileStore, ProfileStore};
pub use service::{AccountService, AccountSession, DEFAULT_DISPLAY_NAME};
