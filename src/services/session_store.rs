use crate::config::AppConfig;
use crate::models::{ChatMessage, ChatSession, Participant};
use crate::services::sync::SyncEvent;
use crate::utils::now_ms;

/// Newest-first collection of sessions plus the current selection.
///
/// Every mutation is a synchronous read-modify-write. It returns the event
/// to broadcast, or `None` when the input named an unknown session and
/// nothing changed.
#[derive(Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    current: Option<String>,
}

impl SessionStore {
    /// Loaded collections select their first entry.
    pub fn from_sessions(sessions: Vec<ChatSession>) -> Self {
        let current = sessions.first().map(|s| s.id.clone());
        Self { sessions, current }
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&ChatSession> {
        let id = self.current.as_deref()?;
        self.get(id)
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    fn snapshot(&self) -> SyncEvent {
        SyncEvent::SyncSessions {
            data: self.sessions.clone(),
        }
    }

    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            tracing::debug!("select: unknown session {}", id);
            return false;
        }
        self.current = Some(id.to_string());
        true
    }

    pub fn create_session(&mut self, owner: Participant, config: &AppConfig) -> SyncEvent {
        let session = ChatSession::new(config.new_session_title.clone(), owner);
        tracing::debug!("created session {}", session.id);
        self.current = Some(session.id.clone());
        self.sessions.insert(0, session);
        self.snapshot()
    }

    pub fn delete_session(&mut self, id: &str) -> Option<SyncEvent> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            tracing::debug!("delete: unknown session {}", id);
            return None;
        }
        if self.current.as_deref() == Some(id) {
            self.current = self.sessions.first().map(|s| s.id.clone());
        }
        tracing::debug!("deleted session {}", id);
        Some(self.snapshot())
    }

    /// Appends without broadcasting the whole collection; the first message
    /// names the session.
    pub fn append_message(
        &mut self,
        session_id: &str,
        message: ChatMessage,
        sender_id: &str,
        config: &AppConfig,
    ) -> Option<SyncEvent> {
        let Some(session) = self.get_mut(session_id) else {
            tracing::debug!("append: unknown session {}", session_id);
            return None;
        };
        if session.messages.is_empty() {
            session.title = config.title_from(message.text());
        }
        session.messages.push(message.clone());
        session.last_updated = now_ms();
        Some(SyncEvent::NewMessage {
            session_id: session_id.to_string(),
            data: message,
            sender_id: sender_id.to_string(),
        })
    }

    /// A message another tab already appended. The title is left alone
    /// until that tab's next snapshot arrives. Returns whether it landed.
    pub fn apply_remote_message(&mut self, session_id: &str, message: ChatMessage) -> bool {
        let Some(session) = self.get_mut(session_id) else {
            tracing::debug!("remote append: unknown session {}", session_id);
            return false;
        };
        session.messages.push(message);
        session.last_updated = now_ms();
        true
    }

    pub fn toggle_collaborator(&mut self, session_id: &str, collaborator_id: &str) -> Option<SyncEvent> {
        let Some(session) = self.get_mut(session_id) else {
            tracing::debug!("toggle: unknown session {}", session_id);
            return None;
        };
        if session.collaborators.iter().any(|c| c == collaborator_id) {
            session.collaborators.retain(|c| c != collaborator_id);
        } else {
            session.collaborators.push(collaborator_id.to_string());
        }
        Some(self.snapshot())
    }

    pub fn replace_messages(&mut self, session_id: &str, messages: Vec<ChatMessage>) -> Option<SyncEvent> {
        let Some(session) = self.get_mut(session_id) else {
            tracing::debug!("replace: unknown session {}", session_id);
            return None;
        };
        session.messages = messages;
        Some(self.snapshot())
    }

    /// Overwrites everything with a snapshot from another tab. The selection
    /// survives only if the snapshot still contains it.
    pub fn replace_all(&mut self, sessions: Vec<ChatSession>) {
        self.sessions = sessions;
        let keep = self
            .current
            .as_deref()
            .is_some_and(|id| self.sessions.iter().any(|s| s.id == id));
        if !keep {
            self.current = self.sessions.first().map(|s| s.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageContent, MessageRole};

    fn owner() -> Participant {
        Participant {
            id: "me".into(),
            name: "Me".into(),
            avatar: "me.svg".into(),
            last_active: 0.0,
        }
    }

    fn msg(text: &str) -> ChatMessage {
        ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: MessageContent {
                text: Some(text.into()),
                ..Default::default()
            },
            timestamp: 0.0,
        }
    }

    fn ids(store: &SessionStore) -> Vec<String> {
        store.sessions().iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn create_is_newest_first_and_selects() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let a = store.current_id().unwrap().to_string();
        let event = store.create_session(owner(), &config);
        let b = store.current_id().unwrap().to_string();

        assert_eq!(ids(&store), vec![b.clone(), a]);
        assert_eq!(event, SyncEvent::SyncSessions { data: store.sessions().to_vec() });
        let created = store.get(&b).unwrap();
        assert_eq!(created.title, "New Wave");
        assert_eq!(created.participants, vec![owner()]);
        assert!(created.collaborators.is_empty());
    }

    #[test]
    fn delete_non_current_keeps_selection() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let a = store.current_id().unwrap().to_string();
        store.create_session(owner(), &config);
        let b = store.current_id().unwrap().to_string();

        assert!(store.delete_session(&a).is_some());
        assert_eq!(ids(&store), vec![b.clone()]);
        assert_eq!(store.current_id(), Some(b.as_str()));
    }

    #[test]
    fn delete_current_falls_back_to_first() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let a = store.current_id().unwrap().to_string();
        store.create_session(owner(), &config);
        let b = store.current_id().unwrap().to_string();
        store.select(&a);

        store.delete_session(&a);
        assert_eq!(store.current_id(), Some(b.as_str()));

        store.delete_session(&b);
        assert!(store.sessions().is_empty());
        assert_eq!(store.current_id(), None);
    }

    #[test]
    fn current_always_survives_create_delete_sequences() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        let mut created = Vec::new();
        for round in 0..12 {
            if round % 3 == 2 {
                let victim: String = created.remove(round % created.len());
                store.delete_session(&victim);
            } else {
                store.create_session(owner(), &config);
                created.push(store.current_id().unwrap().to_string());
            }
            match store.current_id() {
                Some(id) => assert!(store.get(id).is_some()),
                None => assert!(store.sessions().is_empty()),
            }
        }
    }

    #[test]
    fn unknown_ids_are_noops() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let before = store.sessions().to_vec();

        assert!(store.delete_session("missing").is_none());
        assert!(store.append_message("missing", msg("x"), "me", &config).is_none());
        assert!(store.toggle_collaborator("missing", "muse").is_none());
        assert!(store.replace_messages("missing", vec![]).is_none());
        assert!(!store.select("missing"));
        assert_eq!(store.sessions(), before.as_slice());
    }

    #[test]
    fn append_grows_by_one_and_keeps_order() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let id = store.current_id().unwrap().to_string();

        let mut expected = Vec::new();
        for i in 0..4 {
            let m = msg(&format!("m{}", i));
            expected.push(m.id.clone());
            store.append_message(&id, m, "me", &config);
            let got: Vec<String> = store.get(&id).unwrap().messages.iter().map(|m| m.id.clone()).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn first_message_sets_title_once() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let id = store.current_id().unwrap().to_string();

        let first = "Plan a trip to the mountains next summer please";
        let event = store.append_message(&id, msg(first), "me", &config).unwrap();
        assert!(matches!(event, SyncEvent::NewMessage { ref session_id, .. } if *session_id == id));
        assert_eq!(store.get(&id).unwrap().title, first.chars().take(30).collect::<String>());

        store.append_message(&id, msg("something else"), "me", &config);
        assert_eq!(store.get(&id).unwrap().title, first.chars().take(30).collect::<String>());
    }

    #[test]
    fn empty_first_message_uses_fallback_title() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let id = store.current_id().unwrap().to_string();
        store.append_message(&id, msg(""), "me", &config);
        assert_eq!(store.get(&id).unwrap().title, "Creative Task");
    }

    #[test]
    fn remote_message_keeps_title() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let id = store.current_id().unwrap().to_string();
        let before = store.get(&id).unwrap().last_updated;

        assert!(store.apply_remote_message(&id, msg("from elsewhere")));
        let session = store.get(&id).unwrap();
        assert_eq!(session.title, "New Wave");
        assert_eq!(session.messages.len(), 1);
        assert!(session.last_updated >= before);
        assert!(!store.apply_remote_message("missing", msg("lost")));
    }

    #[test]
    fn toggle_twice_restores_collaborators() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let id = store.current_id().unwrap().to_string();
        store.toggle_collaborator(&id, "muse");
        let original = store.get(&id).unwrap().collaborators.clone();

        store.toggle_collaborator(&id, "coder");
        assert_eq!(store.get(&id).unwrap().collaborators, vec!["muse", "coder"]);
        store.toggle_collaborator(&id, "coder");
        assert_eq!(store.get(&id).unwrap().collaborators, original);
    }

    #[test]
    fn replace_messages_rewrites_sequence() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);
        let id = store.current_id().unwrap().to_string();
        store.append_message(&id, msg("one"), "me", &config);

        let rewritten = vec![msg("voice transcript")];
        let event = store.replace_messages(&id, rewritten.clone()).unwrap();
        assert_eq!(store.get(&id).unwrap().messages, rewritten);
        assert!(matches!(event, SyncEvent::SyncSessions { .. }));
    }

    #[test]
    fn replace_all_reselects_when_current_vanishes() {
        let config = AppConfig::default();
        let mut store = SessionStore::default();
        store.create_session(owner(), &config);

        let mut other = SessionStore::default();
        other.create_session(owner(), &config);
        other.create_session(owner(), &config);
        let snapshot = other.sessions().to_vec();

        store.replace_all(snapshot.clone());
        assert_eq!(store.sessions(), snapshot.as_slice());
        assert_eq!(store.current_id(), Some(snapshot[0].id.as_str()));

        store.select(&snapshot[1].id);
        store.replace_all(snapshot.clone());
        assert_eq!(store.current_id(), Some(snapshot[1].id.as_str()));

        store.replace_all(vec![]);
        assert_eq!(store.current_id(), None);
    }
}
