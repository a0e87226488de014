use crate::config::AppConfig;
use crate::models::{ProfilePatch, UserProfile};
use crate::services::sync::SyncEvent;

/// The single local identity. Mutations return the event to broadcast.
pub struct ProfileStore {
    profile: UserProfile,
}

impl ProfileStore {
    pub fn new(profile: UserProfile) -> Self {
        Self { profile }
    }

    /// Seeds from the stored record, or generates a fresh identity.
    pub fn load_or_generate(stored: Option<UserProfile>, config: &AppConfig) -> Self {
        let profile = stored.unwrap_or_else(|| {
            let fresh = UserProfile::generate(config);
            tracing::info!("generated profile {} ({})", fresh.username, fresh.id);
            fresh
        });
        Self::new(profile)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn update(&mut self, patch: ProfilePatch) -> (UserProfile, SyncEvent) {
        patch.apply_to(&mut self.profile);
        tracing::debug!("profile {} updated", self.profile.id);
        (
            self.profile.clone(),
            SyncEvent::UserUpdate {
                user: self.profile.clone(),
            },
        )
    }

    /// Adopts a record received from another tab. Returns whether anything changed.
    pub fn replace(&mut self, profile: UserProfile) -> bool {
        if profile.id != self.profile.id || profile == self.profile {
            return false;
        }
        self.profile = profile;
        true
    }
}
