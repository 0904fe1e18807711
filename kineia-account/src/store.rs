//! Profile persistence contract

use crate::error::AccountError;
use crate::profile::UserProfile;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Document store holding one profile per user id
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>, AccountError>;

    /// Create or replace the profile of `uid`
    async fn put(&self, uid: &str, profile: UserProfile) -> Result<(), AccountError>;
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }

    /// Every stored document as JSON, keyed by user id
    pub fn export_json(&self) -> Result<String, AccountError> {
        let profiles: BTreeMap<String, UserProfile> = self
            .profiles
            .read()
            .iter()
            .map(|(uid, profile)| (uid.clone(), profile.clone()))
            .collect();
        serde_json::to_string_pretty(&profiles).map_err(|e| AccountError::Store(e.to_string()))
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>, AccountError> {
        Ok(self.profiles.read().get(uid).cloned())
    }

    async fn put(&self, uid: &str, profile: UserProfile) -> Result<(), AccountError> {
        if uid.is_empty() {
            return Err(AccountError::Store("empty user id".to_string()));
        }
        debug!("Storing profile for {}", uid);
        self.profiles.write().insert(uid.to_string(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::LessonId;

    #[test]
    fn test_put_replaces_profile() {
        let store = InMemoryProfileStore::new();
        let mut profile = UserProfile::new("Ana", "ana@example.com");
        tokio_test::block_on(store.put("u1", profile.clone())).unwrap();

        profile.lessons.mark_completed(LessonId::L2_3);
        tokio_test::block_on(store.put("u1", profile.clone())).unwrap();

        let stored = tokio_test::block_on(store.get("u1")).unwrap();
        assert_eq!(stored, Some(profile));
        assert_eq!(store.len(), 1);
        assert_eq!(tokio_test::block_on(store.get("u2")).unwrap(), None);
    }

    #[test]
    fn test_rejects_empty_uid() {
        let store = InMemoryProfileStore::new();
        let result = tokio_test::block_on(store.put("", UserProfile::new("Ana", "ana@example.com")));
        assert!(matches!(result, Err(AccountError::Store(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_export_is_keyed_by_uid() {
        let store = InMemoryProfileStore::new();
        tokio_test::block_on(store.put("u1", UserProfile::new("Ana", "ana@example.com"))).unwrap();
        let exported: serde_json::Value = serde_json::from_str(&store.export_json().unwrap()).unwrap();
        assert_eq!(exported["u1"]["email"], "ana@example.com");
        assert_eq!(exported["u1"]["lessons"]["L1-1"], false);
    }
}
