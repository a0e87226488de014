use serde::{Deserialize, Serialize};

use crate::models::VoiceName;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct StorageKeys {
    pub authenticated: String,
    pub email: String,
    pub profile: String,
    pub sessions: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            authenticated: "botwave_authenticated".to_string(),
            email: "botwave_email".to_string(),
            profile: "botwave_user_v2".to_string(),
            sessions: "botwave_sessions_v2".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct AppConfig {
    pub keys: StorageKeys,
    pub channel_name: String,
    /// Characters of the first message kept as the session title.
    pub title_max_chars: usize,
    pub fallback_title: String,
    pub new_session_title: String,
    pub username_prefix: String,
    pub avatar_base_url: String,
    pub default_voice: VoiceName,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            channel_name: "botwave_sync".to_string(),
            title_max_chars: 30,
            fallback_title: "Creative Task".to_string(),
            new_session_title: "New Wave".to_string(),
            username_prefix: "Explorer_".to_string(),
            avatar_base_url: "https://api.dicebear.com/7.x/avataaars/svg?seed=".to_string(),
            default_voice: VoiceName::Zephyr,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }

    /// Title for a session whose first message is `text`.
    pub fn title_from(&self, text: &str) -> String {
        let title: String = text.chars().take(self.title_max_chars).collect();
        if title.is_empty() {
            self.fallback_title.clone()
        } else {
            title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_truncated_to_prefix() {
        let config = AppConfig::default();
        let long = "a".repeat(50);
        assert_eq!(config.title_from(&long).chars().count(), 30);
        assert_eq!(config.title_from("short"), "short");
        assert_eq!(config.title_from(""), "Creative Task");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "channel_name": "other" }"#).unwrap();
        assert_eq!(config.channel_name, "other");
        assert_eq!(config.keys.sessions, "botwave_sessions_v2");
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
