//! User profile and account settings containers

mod models;
mod settings;
mod store;

pub use models::{ProfilePatch, UserProfile};
pub use settings::{
    AccountSettings, NotificationPatch, NotificationSettings, PreferencePatch, PreferenceSettings,
    PrivacyPatch, PrivacySettings, ProfileVisibility, SettingsStore, Theme, SETTINGS_STORAGE_KEY,
    USERS_COLLECTION,
};
pub use store::{ProfileStore, PROFILES_COLLECTION};
