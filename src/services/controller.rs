//! Wires the profile and session stores to durable storage and the tab
//! channel. Views call into this; it never renders anything.

use crate::config::AppConfig;
use crate::error::{BotWaveError, Result};
use crate::models::{
    ChatMessage, ChatSession, Participant, ProfilePatch, SubscriptionPlan, UserProfile, VoiceName,
};
use crate::services::profile_store::ProfileStore;
use crate::services::session_store::SessionStore;
use crate::services::storage::KeyValueStore;
use crate::services::sync::{SyncEvent, SyncTransport};

pub struct Controller<S: KeyValueStore, T: SyncTransport> {
    config: AppConfig,
    storage: S,
    transport: T,
    profile: ProfileStore,
    sessions: SessionStore,
    logged_in: bool,
}

impl<S: KeyValueStore, T: SyncTransport> Controller<S, T> {
    /// Seeds the profile and, for an authenticated browser, the sessions.
    ///
    /// Fails only when a stored record is present but unreadable.
    pub fn start(config: AppConfig, storage: S, transport: T) -> Result<Self> {
        let logged_in = storage
            .load::<bool>(&config.keys.authenticated)?
            .unwrap_or(false);
        let stored = storage.load::<UserProfile>(&config.keys.profile)?;
        let profile = ProfileStore::load_or_generate(stored, &config);

        let stored_sessions = if logged_in {
            storage.load::<Vec<ChatSession>>(&config.keys.sessions)?
        } else {
            None
        };

        let mut controller = Self {
            config,
            storage,
            transport,
            profile,
            sessions: SessionStore::default(),
            logged_in,
        };
        controller.publish_profile();
        if logged_in {
            controller.hydrate_sessions(stored_sessions);
        }
        Ok(controller)
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn profile(&self) -> &UserProfile {
        self.profile.profile()
    }

    pub fn sessions(&self) -> &[ChatSession] {
        self.sessions.sessions()
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.sessions.current_id()
    }

    pub fn current_session(&self) -> Option<&ChatSession> {
        self.sessions.current()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // --- auth ---

    /// Nothing about the login is recorded when the stored sessions are unreadable.
    pub fn log_in(&mut self, email: &str) -> Result<()> {
        let email = email.trim();
        let Some((local, _domain)) = email.split_once('@') else {
            return Err(BotWaveError::InvalidEmail(email.to_string()));
        };
        if local.is_empty() {
            return Err(BotWaveError::InvalidEmail(email.to_string()));
        }

        let stored = self
            .storage
            .load::<Vec<ChatSession>>(&self.config.keys.sessions)?;

        self.storage.save(&self.config.keys.authenticated, &true);
        if let Err(e) = self.storage.set_raw(&self.config.keys.email, email) {
            tracing::warn!("failed to store email: {}", e);
        }
        self.logged_in = true;
        tracing::info!("logged in as {}", email);

        if self.profile.profile().has_generated_name(&self.config) {
            self.update_username(local.to_string());
        }
        self.hydrate_sessions(stored);
        Ok(())
    }

    pub fn log_out(&mut self) {
        self.logged_in = false;
        self.storage.remove(&self.config.keys.authenticated);
        self.storage.remove(&self.config.keys.email);
        tracing::info!("logged out");
    }

    pub fn email(&self) -> Option<String> {
        self.storage.get_raw(&self.config.keys.email).ok().flatten()
    }

    fn hydrate_sessions(&mut self, stored: Option<Vec<ChatSession>>) {
        match stored {
            Some(stored) => {
                tracing::info!("hydrated {} sessions", stored.len());
                self.sessions = SessionStore::from_sessions(stored);
            }
            None => {
                tracing::info!("no stored sessions, starting a new one");
                self.sessions = SessionStore::default();
                self.create_session();
            }
        }
    }

    // --- sessions ---

    pub fn select_session(&mut self, id: &str) {
        self.sessions.select(id);
    }

    pub fn create_session(&mut self) {
        let owner = Participant::from_profile(self.profile.profile());
        let event = self.sessions.create_session(owner, &self.config);
        self.commit_sessions(Some(event));
    }

    pub fn delete_session(&mut self, id: &str) {
        let event = self.sessions.delete_session(id);
        self.commit_sessions(event);
    }

    /// No-op when no session is selected.
    pub fn send_message(&mut self, text: String, image: Option<String>) {
        let Some(session_id) = self.sessions.current_id().map(str::to_string) else {
            tracing::debug!("send: no current session");
            return;
        };
        let message = ChatMessage::from_user(self.profile.profile(), text, image);
        let sender = self.profile.id().to_string();
        let event = self
            .sessions
            .append_message(&session_id, message, &sender, &self.config);
        self.commit_sessions(event);
    }

    /// Acts on the current session.
    pub fn toggle_collaborator(&mut self, collaborator_id: &str) {
        let Some(session_id) = self.sessions.current_id().map(str::to_string) else {
            return;
        };
        let event = self.sessions.toggle_collaborator(&session_id, collaborator_id);
        self.commit_sessions(event);
    }

    pub fn replace_messages(&mut self, session_id: &str, messages: Vec<ChatMessage>) {
        let event = self.sessions.replace_messages(session_id, messages);
        self.commit_sessions(event);
    }

    // --- profile ---

    pub fn update_profile(&mut self, patch: ProfilePatch) -> UserProfile {
        let (updated, event) = self.profile.update(patch);
        self.storage.save(&self.config.keys.profile, &updated);
        self.transport.post(&event);
        updated
    }

    pub fn update_username(&mut self, username: String) {
        self.update_profile(ProfilePatch {
            username: Some(username),
            ..Default::default()
        });
    }

    pub fn update_avatar(&mut self, avatar: String) {
        self.update_profile(ProfilePatch {
            avatar: Some(avatar),
            ..Default::default()
        });
    }

    pub fn update_voice(&mut self, voice: VoiceName) {
        self.update_profile(ProfilePatch {
            preferred_voice: Some(voice),
            ..Default::default()
        });
    }

    pub fn subscribe(&mut self, plan: SubscriptionPlan) {
        tracing::info!("subscribed to {:?} plan", plan);
        self.update_profile(ProfilePatch {
            is_pro: Some(true),
            subscription_plan: Some(plan),
            ..Default::default()
        });
    }

    // --- cross-tab ---

    /// Applies an event from another tab. Nothing is re-broadcast.
    pub fn handle_incoming(&mut self, event: SyncEvent) {
        tracing::debug!("received {}", event.kind());
        match event {
            SyncEvent::NewMessage {
                session_id,
                data,
                sender_id,
            } => {
                if sender_id == self.profile.id() {
                    tracing::trace!("ignoring own message {}", data.id);
                    return;
                }
                if self.sessions.apply_remote_message(&session_id, data) {
                    self.persist_sessions();
                }
            }
            SyncEvent::SyncSessions { data } => {
                self.sessions.replace_all(data);
                self.persist_sessions();
            }
            SyncEvent::UserUpdate { user } => {
                if self.profile.replace(user) {
                    self.storage
                        .save(&self.config.keys.profile, self.profile.profile());
                }
            }
        }
    }

    pub fn shutdown(&self) {
        self.transport.close();
    }

    fn publish_profile(&self) {
        let profile = self.profile.profile();
        self.storage.save(&self.config.keys.profile, profile);
        self.transport.post(&SyncEvent::UserUpdate {
            user: profile.clone(),
        });
    }

    fn commit_sessions(&mut self, event: Option<SyncEvent>) {
        if let Some(event) = event {
            self.persist_sessions();
            self.transport.post(&event);
        }
    }

    fn persist_sessions(&self) {
        if self.logged_in {
            self.storage
                .save(&self.config.keys.sessions, self.sessions.sessions());
        }
    }
}
