use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::utils::now_ms;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum VoiceName {
    #[default]
    Zephyr,
    Puck,
    Charon,
    Kore,
    Fenrir,
}

impl VoiceName {
    pub const ALL: [VoiceName; 5] = [
        VoiceName::Zephyr,
        VoiceName::Puck,
        VoiceName::Charon,
        VoiceName::Kore,
        VoiceName::Fenrir,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceName::Zephyr => "Zephyr",
            VoiceName::Puck => "Puck",
            VoiceName::Charon => "Charon",
            VoiceName::Kore => "Kore",
            VoiceName::Fenrir => "Fenrir",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Data URL of an attached image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_avatar: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: MessageContent,
    pub timestamp: f64,
}

impl ChatMessage {
    /// A user message stamped with the sender fields of `author`.
    pub fn from_user(author: &UserProfile, text: String, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: MessageContent {
                text: Some(text),
                image,
                sender_id: Some(author.id.clone()),
                sender_name: Some(author.username.clone()),
                sender_avatar: Some(author.avatar.clone()),
                ..Default::default()
            },
            timestamp: now_ms(),
        }
    }

    pub fn text(&self) -> &str {
        self.content.text.as_deref().unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub last_active: f64,
}

impl Participant {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.username.clone(),
            avatar: profile.avatar.clone(),
            last_active: now_ms(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub last_updated: f64,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl ChatSession {
    pub fn new(title: String, owner: Participant) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            messages: Vec::new(),
            last_updated: now_ms(),
            collaborators: Vec::new(),
            participants: vec![owner],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub avatar: String,
    pub preferred_voice: VoiceName,
    pub is_pro: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<SubscriptionPlan>,
}

impl UserProfile {
    /// Fresh identity for a browser profile that has none stored yet.
    pub fn generate(config: &AppConfig) -> Self {
        let id = Uuid::new_v4();
        let seed = Uuid::new_v4().simple().to_string();
        Self {
            id: id.to_string(),
            username: format!("{}{}", config.username_prefix, id.as_u128() % 1000),
            avatar: format!("{}{}", config.avatar_base_url, seed),
            preferred_voice: config.default_voice,
            is_pro: false,
            subscription_plan: None,
        }
    }

    pub fn has_generated_name(&self, config: &AppConfig) -> bool {
        self.username.starts_with(&config.username_prefix)
    }
}

/// An AI persona a session can switch on. Sessions only store the ids.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AICollaborator {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub instruction: String,
    #[serde(default)]
    pub is_active: bool,
}

impl AICollaborator {
    fn persona(id: &str, name: &str, role: &str, instruction: &str, config: &AppConfig) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            avatar: format!("{}{}", config.avatar_base_url, id),
            instruction: instruction.to_string(),
            is_active: false,
        }
    }

    pub fn roster(config: &AppConfig) -> Vec<Self> {
        vec![
            Self::persona("muse", "Muse", "Creative", "Offer imaginative angles and bold ideas.", config),
            Self::persona("coder", "Coder", "Engineer", "Answer with working code and short explanations.", config),
            Self::persona("critic", "Critic", "Reviewer", "Point out weaknesses and suggest fixes.", config),
        ]
    }

    /// The roster with `is_active` set from the session's collaborator ids.
    pub fn roster_for(session: &ChatSession, config: &AppConfig) -> Vec<Self> {
        Self::roster(config)
            .into_iter()
            .map(|mut c| {
                c.is_active = session.collaborators.iter().any(|id| *id == c.id);
                c
            })
            .collect()
    }
}

/// Partial update of a [`UserProfile`]; `None` fields are left untouched.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub preferred_voice: Option<VoiceName>,
    pub is_pro: Option<bool>,
    pub subscription_plan: Option<SubscriptionPlan>,
}

impl ProfilePatch {
    pub fn apply_to(self, profile: &mut UserProfile) {
        if let Some(username) = self.username {
            profile.username = username;
        }
        if let Some(avatar) = self.avatar {
            profile.avatar = avatar;
        }
        if let Some(voice) = self.preferred_voice {
            profile.preferred_voice = voice;
        }
        if let Some(is_pro) = self.is_pro {
            profile.is_pro = is_pro;
        }
        if let Some(plan) = self.subscription_plan {
            profile.subscription_plan = Some(plan);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_session_json_uses_camel_case() {
        let json = r#"{
            "id": "s1",
            "title": "Hello",
            "messages": [{
                "id": "m1",
                "role": "user",
                "content": { "text": "hi", "senderId": "u1" },
                "timestamp": 1700000000000
            }],
            "lastUpdated": 1700000000000,
            "collaborators": ["muse"],
            "participants": [{ "id": "u1", "name": "Ada", "avatar": "a.svg", "lastActive": 1 }]
        }"#;
        let session: ChatSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.messages[0].role, MessageRole::User);
        assert_eq!(session.messages[0].content.sender_id.as_deref(), Some("u1"));
        assert_eq!(session.participants[0].last_active, 1.0);

        let out = serde_json::to_value(&session).unwrap();
        assert!(out.get("lastUpdated").is_some());
        assert!(out["messages"][0]["content"].get("image").is_none());
    }

    #[test]
    fn profile_serializes_voice_and_plan() {
        let profile = UserProfile {
            id: "u1".into(),
            username: "Ada".into(),
            avatar: "a.svg".into(),
            preferred_voice: VoiceName::Kore,
            is_pro: true,
            subscription_plan: Some(SubscriptionPlan::Yearly),
        };
        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["preferredVoice"], "Kore");
        assert_eq!(out["subscriptionPlan"], "yearly");
        assert_eq!(out["isPro"], true);
    }

    #[test]
    fn generated_profile_uses_config_defaults() {
        let config = AppConfig::default();
        let profile = UserProfile::generate(&config);
        assert!(profile.has_generated_name(&config));
        assert!(profile.avatar.starts_with(&config.avatar_base_url));
        assert_eq!(profile.preferred_voice, VoiceName::Zephyr);
        assert!(!profile.is_pro);
        assert_ne!(profile.id, UserProfile::generate(&config).id);
    }

    #[test]
    fn roster_marks_session_collaborators_active() {
        let config = AppConfig::default();
        let owner = Participant::from_profile(&UserProfile::generate(&config));
        let mut session = ChatSession::new("t".into(), owner);
        session.collaborators.push("coder".into());

        let roster = AICollaborator::roster_for(&session, &config);
        let active: Vec<&str> = roster.iter().filter(|c| c.is_active).map(|c| c.id.as_str()).collect();
        assert_eq!(active, vec!["coder"]);
        assert_eq!(roster.len(), AICollaborator::roster(&config).len());
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut profile = UserProfile::generate(&AppConfig::default());
        let before = profile.clone();
        ProfilePatch {
            preferred_voice: Some(VoiceName::Puck),
            ..Default::default()
        }
        .apply_to(&mut profile);
        assert_eq!(profile.preferred_voice, VoiceName::Puck);
        assert_eq!(profile.username, before.username);
        assert_eq!(profile.avatar, before.avatar);
    }
}
