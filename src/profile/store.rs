//! Profile container backed by the `profiles` collection

use std::sync::Arc;
use tracing::debug;

use crate::backend::{Backend, ItemQuery, RequestStatus};
use crate::profile::models::{ProfilePatch, UserProfile};
use crate::{AlchemistError, Result};

pub const PROFILES_COLLECTION: &str = "profiles";

pub struct ProfileStore {
    backend: Arc<dyn Backend>,
    profile: Option<UserProfile>,
    status: RequestStatus,
}

impl ProfileStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            profile: None,
            status: RequestStatus::default(),
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Replace the local profile without a backend round trip
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    /// Completion percentage of the loaded profile, 0 when none
    pub fn completion(&self) -> u8 {
        self.profile.as_ref().map_or(0, UserProfile::completion)
    }

    pub async fn load(&mut self, user_id: &str) -> Result<&UserProfile> {
        self.status.begin();
        let result = self
            .backend
            .get_items(PROFILES_COLLECTION, &ItemQuery::by_id(user_id).limit(1))
            .await;
        let page = self.status.settle(result)?;

        let Some(item) = page.items.into_iter().next() else {
            return Err(self
                .status
                .fail(AlchemistError::NotFound(format!("profile {}", user_id))));
        };
        let profile: UserProfile = match serde_json::from_value(item) {
            Ok(profile) => profile,
            Err(e) => return Err(self.status.fail(e.into())),
        };

        debug!("Loaded profile {}", profile.id);
        Ok(&*self.profile.insert(profile))
    }

    /// Merge `patch` into the loaded profile and save it
    pub async fn update(&mut self, patch: ProfilePatch) -> Result<&UserProfile> {
        let Some(current) = self.profile.as_ref() else {
            return Err(self
                .status
                .fail(AlchemistError::NotFound("no profile loaded".to_string())));
        };

        let mut updated = current.clone();
        patch.apply(&mut updated);
        let data = match serde_json::to_value(&updated) {
            Ok(data) => data,
            Err(e) => return Err(self.status.fail(e.into())),
        };

        self.status.begin();
        let result = self.backend.update_item(PROFILES_COLLECTION, data).await;
        self.status.settle(result)?;

        Ok(&*self.profile.insert(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, StubBackend};
    use serde_json::json;

    fn seeded() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new().with_items(
            PROFILES_COLLECTION,
            vec![json!({
                "id": "u1",
                "name": "Ada",
                "email": "ada@example.com",
                "skills": ["Rust"]
            })],
        ))
    }

    #[tokio::test]
    async fn load_and_update_round_trip() {
        let backend = seeded();
        let mut store = ProfileStore::new(backend.clone());

        let profile = store.load("u1").await.unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(store.completion(), 50);

        store
            .update(ProfilePatch {
                title: Some("Engineer".to_string()),
                ..ProfilePatch::default()
            })
            .await
            .unwrap();

        assert_eq!(store.completion(), 70);
        assert_eq!(backend.items(PROFILES_COLLECTION)[0]["title"], "Engineer");
        assert_eq!(backend.items(PROFILES_COLLECTION)[0]["name"], "Ada");
    }

    #[tokio::test]
    async fn missing_profile_sets_error() {
        let mut store = ProfileStore::new(seeded());
        assert!(store.load("nobody").await.is_err());
        assert!(store.profile().is_none());
        assert_eq!(store.status().error.as_deref(), Some("Not found: profile nobody"));
    }

    #[tokio::test]
    async fn failed_update_keeps_prior_profile() {
        let mut store = ProfileStore::new(Arc::new(StubBackend));
        store.set_profile(UserProfile {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            ..UserProfile::default()
        });

        let result = store
            .update(ProfilePatch {
                name: Some("Grace".to_string()),
                ..ProfilePatch::default()
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.profile().unwrap().name, "Ada");
        assert_eq!(store.status().error.as_deref(), Some("Backend not implemented"));
        assert!(!store.status().is_loading);
    }
}
