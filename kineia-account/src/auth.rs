//! Authentication contract and the in-memory credential store
//!
//! Passwords only ever reach an [`AuthProvider`]. The in-memory provider keeps
//! Argon2id hashes with a per-user random salt, encoded as
//! `argon2id$<salt hex>$<hash hex>`.

use crate::error::AccountError;
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const MIN_PASSWORD_BYTES: usize = 6;
pub const MAX_PASSWORD_BYTES: usize = 128;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const HASH_SCHEME: &str = "argon2id";

/// Identity returned by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an email/password account
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, AccountError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AccountError>;

    /// Federated sign-in with an identity token from an external provider
    async fn sign_in_with_token(&self, token: &str) -> Result<AuthUser, AccountError>;
}

/// Trim and lowercase, then check the basic `local@domain.tld` shape
pub fn normalize_email(email: &str) -> Result<String, AccountError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(|c| c.is_whitespace() || c.is_control())
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(AccountError::InvalidEmail(email))
    }
}

pub fn validate_password(password: &str) -> Result<(), AccountError> {
    let len = password.as_bytes().len();
    if !(MIN_PASSWORD_BYTES..=MAX_PASSWORD_BYTES).contains(&len) || password.contains('\0') {
        return Err(AccountError::InvalidPassword {
            min: MIN_PASSWORD_BYTES,
            max: MAX_PASSWORD_BYTES,
        });
    }
    Ok(())
}

/// Argon2id cost settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingCost {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone)]
struct CredentialRecord {
    user: AuthUser,
    password_hash: String,
}

/// Auth provider keeping hashed credentials in memory
pub struct InMemoryAuthProvider {
    argon2: Argon2<'static>,
    credentials: RwLock<HashMap<String, CredentialRecord>>,
    identities: RwLock<HashMap<String, AuthUser>>,
    /// Verified against when the email is unknown, so both paths cost one Argon2 run
    decoy_hash: String,
    #[cfg(test)]
    digests: std::sync::atomic::AtomicUsize,
}

impl InMemoryAuthProvider {
    pub fn new() -> Result<Self, AccountError> {
        Self::with_cost(HashingCost::default())
    }

    pub fn with_cost(cost: HashingCost) -> Result<Self, AccountError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, Some(HASH_LEN))
            .map_err(|e| AccountError::Hashing(format!("Argon2 params error: {}", e)))?;

        let mut provider = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            credentials: RwLock::new(HashMap::new()),
            identities: RwLock::new(HashMap::new()),
            decoy_hash: String::new(),
            #[cfg(test)]
            digests: std::sync::atomic::AtomicUsize::new(0),
        };

        let mut decoy = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut decoy);
        provider.decoy_hash = provider.hash(&hex::encode(decoy))?;
        Ok(provider)
    }

    /// Register an identity an external provider would vouch for.
    ///
    /// `sign_in_with_token(token)` then resolves to the returned user.
    pub fn register_identity(
        &self,
        token: impl Into<String>,
        email: Option<String>,
        display_name: Option<String>,
    ) -> AuthUser {
        let user = AuthUser {
            uid: new_uid(),
            email,
            display_name,
            created_at: Utc::now(),
        };
        self.identities.write().insert(token.into(), user.clone());
        user
    }

    pub fn user_count(&self) -> usize {
        self.credentials.read().len() + self.identities.read().len()
    }

    /// Stored hash string for an email, if any
    pub fn password_hash_of(&self, email: &str) -> Option<String> {
        let email = normalize_email(email).ok()?;
        self.credentials.read().get(&email).map(|record| record.password_hash.clone())
    }

    fn hash(&self, password: &str) -> Result<String, AccountError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);

        let digest = self.digest(password, &salt)?;
        Ok(format!("{}${}${}", HASH_SCHEME, hex::encode(salt), hex::encode(digest)))
    }

    fn digest(&self, password: &str, salt: &[u8]) -> Result<[u8; HASH_LEN], AccountError> {
        #[cfg(test)]
        self.digests.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        let mut out = [0u8; HASH_LEN];
        self.argon2
            .hash_password_into(password.as_bytes(), salt, &mut out)
            .map_err(|e| AccountError::Hashing(format!("Argon2 error: {}", e)))?;
        Ok(out)
    }

    fn verify(&self, password: &str, encoded: &str) -> Result<bool, AccountError> {
        let mut parts = encoded.splitn(3, '$');
        let (scheme, salt, expected) = match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(salt), Some(expected)) => (scheme, salt, expected),
            _ => return Err(AccountError::Hashing("malformed password hash".to_string())),
        };
        if scheme != HASH_SCHEME {
            return Err(AccountError::Hashing(format!("unsupported hash scheme '{}'", scheme)));
        }

        let salt = hex::decode(salt).map_err(|e| AccountError::Hashing(e.to_string()))?;
        let expected = hex::decode(expected).map_err(|e| AccountError::Hashing(e.to_string()))?;
        let actual = self.digest(password, &salt)?;

        Ok(constant_time_eq(&actual, &expected))
    }
}

fn new_uid() -> String {
    Uuid::new_v4().simple().to_string()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, AccountError> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        if self.credentials.read().contains_key(&email) {
            return Err(AccountError::EmailTaken(email));
        }

        let password_hash = self.hash(password)?;
        let user = AuthUser {
            uid: new_uid(),
            email: Some(email.clone()),
            display_name: None,
            created_at: Utc::now(),
        };

        let mut credentials = self.credentials.write();
        // another registration may have won while hashing
        if credentials.contains_key(&email) {
            return Err(AccountError::EmailTaken(email));
        }
        credentials.insert(email, CredentialRecord { user: user.clone(), password_hash });
        info!("Created user {}", user.uid);
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AccountError> {
        let known = normalize_email(email)
            .ok()
            .and_then(|email| self.credentials.read().get(&email).cloned());
        let record = match known {
            Some(record) => record,
            None => {
                debug!("Sign-in for unknown email");
                self.verify(password, &self.decoy_hash)?;
                return Err(AccountError::InvalidCredentials);
            }
        };

        if self.verify(password, &record.password_hash)? {
            debug!("User {} signed in", record.user.uid);
            Ok(record.user)
        } else {
            warn!("Wrong password for user {}", record.user.uid);
            Err(AccountError::InvalidCredentials)
        }
    }

    async fn sign_in_with_token(&self, token: &str) -> Result<AuthUser, AccountError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AccountError::InvalidToken);
        }
        self.identities
            .read()
            .get(token)
            .cloned()
            .ok_or(AccountError::InvalidToken)
    }
}
