//! Account settings container
//!
//! Notification, privacy and preference blocks are kept locally and
//! persisted whole under [`SETTINGS_STORAGE_KEY`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{Backend, RequestStatus};
use crate::storage::{load_snapshot, save_snapshot, KeyValueStore};
use crate::Result;

pub const SETTINGS_STORAGE_KEY: &str = "settings-storage";
pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email_alerts: bool,
    pub job_matches: bool,
    pub interview_reminders: bool,
    pub weekly_digest: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_alerts: true,
            job_matches: true,
            interview_reminders: true,
            weekly_digest: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    Public,
    #[default]
    Recruiters,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacySettings {
    pub profile_visibility: ProfileVisibility,
    pub show_salary_expectations: bool,
    pub allow_recruiter_contact: bool,
    pub share_usage_data: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visibility: ProfileVisibility::default(),
            show_salary_expectations: false,
            allow_recruiter_contact: true,
            share_usage_data: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSettings {
    pub theme: Theme,
    pub language: String,
    pub timezone: String,
    pub currency: String,
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            currency: "USD".to_string(),
        }
    }
}

/// The persisted part of the settings container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub preferences: PreferenceSettings,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationPatch {
    pub email_alerts: Option<bool>,
    pub job_matches: Option<bool>,
    pub interview_reminders: Option<bool>,
    pub weekly_digest: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrivacyPatch {
    pub profile_visibility: Option<ProfileVisibility>,
    pub show_salary_expectations: Option<bool>,
    pub allow_recruiter_contact: Option<bool>,
    pub share_usage_data: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencePatch {
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

pub struct SettingsStore {
    backend: Arc<dyn Backend>,
    storage: Box<dyn KeyValueStore>,
    settings: AccountSettings,
    status: RequestStatus,
}

impl SettingsStore {
    pub fn open(backend: Arc<dyn Backend>, storage: Box<dyn KeyValueStore>) -> Self {
        let settings = match load_snapshot::<AccountSettings>(storage.as_ref(), SETTINGS_STORAGE_KEY)
        {
            Ok(Some(settings)) => settings,
            Ok(None) => AccountSettings::default(),
            Err(e) => {
                warn!("Discarding unreadable account settings: {:#}", e);
                AccountSettings::default()
            }
        };

        Self {
            backend,
            storage,
            settings,
            status: RequestStatus::default(),
        }
    }

    pub fn settings(&self) -> &AccountSettings {
        &self.settings
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn update_notifications(&mut self, patch: NotificationPatch) {
        let n = &mut self.settings.notifications;
        merge(&mut n.email_alerts, patch.email_alerts);
        merge(&mut n.job_matches, patch.job_matches);
        merge(&mut n.interview_reminders, patch.interview_reminders);
        merge(&mut n.weekly_digest, patch.weekly_digest);
        self.persist();
    }

    pub fn update_privacy(&mut self, patch: PrivacyPatch) {
        let p = &mut self.settings.privacy;
        merge(&mut p.profile_visibility, patch.profile_visibility);
        merge(&mut p.show_salary_expectations, patch.show_salary_expectations);
        merge(&mut p.allow_recruiter_contact, patch.allow_recruiter_contact);
        merge(&mut p.share_usage_data, patch.share_usage_data);
        self.persist();
    }

    pub fn update_preferences(&mut self, patch: PreferencePatch) {
        let p = &mut self.settings.preferences;
        merge(&mut p.theme, patch.theme);
        merge(&mut p.language, patch.language);
        merge(&mut p.timezone, patch.timezone);
        merge(&mut p.currency, patch.currency);
        self.persist();
    }

    pub fn reset(&mut self) {
        self.settings = AccountSettings::default();
        self.persist();
    }

    /// Delete the user record remotely, then drop local settings
    pub async fn delete_account(&mut self, user_id: &str) -> Result<()> {
        self.status.begin();
        let result = self
            .backend
            .delete_item(USERS_COLLECTION, serde_json::json!({ "id": user_id }))
            .await;
        self.status.settle(result)?;

        info!("Deleted account {}", user_id);
        self.reset();
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = save_snapshot(self.storage.as_ref(), SETTINGS_STORAGE_KEY, &self.settings) {
            warn!("Failed to persist account settings: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, StubBackend};
    use crate::storage::MemoryStorage;
    use serde_json::json;

    #[test]
    fn updates_persist_and_rehydrate() {
        let storage = MemoryStorage::new();
        let mut store = SettingsStore::open(Arc::new(StubBackend), Box::new(storage.clone()));

        store.update_preferences(PreferencePatch {
            theme: Some(Theme::Dark),
            ..PreferencePatch::default()
        });
        store.update_privacy(PrivacyPatch {
            profile_visibility: Some(ProfileVisibility::Private),
            ..PrivacyPatch::default()
        });

        let reopened = SettingsStore::open(Arc::new(StubBackend), Box::new(storage));
        assert_eq!(reopened.settings(), store.settings());
        assert_eq!(reopened.settings().preferences.theme, Theme::Dark);
        assert_eq!(reopened.settings().preferences.language, "en");
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage.set(SETTINGS_STORAGE_KEY, "not json").unwrap();

        let store = SettingsStore::open(Arc::new(StubBackend), Box::new(storage));
        assert_eq!(store.settings(), &AccountSettings::default());
    }

    #[tokio::test]
    async fn delete_account_resets_on_success_only() {
        let backend = Arc::new(
            MemoryBackend::new().with_items(USERS_COLLECTION, vec![json!({ "id": "u1" })]),
        );
        let mut store = SettingsStore::open(backend.clone(), Box::new(MemoryStorage::new()));
        store.update_notifications(NotificationPatch {
            weekly_digest: Some(true),
            ..NotificationPatch::default()
        });

        assert!(store.delete_account("missing").await.is_err());
        assert!(store.settings().notifications.weekly_digest);
        assert!(store.status().error.is_some());

        store.delete_account("u1").await.unwrap();
        assert!(backend.items(USERS_COLLECTION).is_empty());
        assert_eq!(store.settings(), &AccountSettings::default());
        assert!(store.status().error.is_none());
    }
}
