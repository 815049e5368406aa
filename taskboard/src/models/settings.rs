//! User settings
//!
//! Process-wide record stored inside the state blob. Every field is
//! defaulted so older saves load cleanly.

use serde::{Deserialize, Serialize};

/// AI provider keys and cloud credentials
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub gemini_api_key: String,
    #[serde(default)]
    pub ai_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_api_key: Option<String>,
}

impl UserSettings {
    /// True when either provider key is non-empty
    pub fn has_ai_keys(&self) -> bool {
        !self.openai_api_key.is_empty() || !self.gemini_api_key.is_empty()
    }

    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(key) = patch.openai_api_key {
            self.openai_api_key = key;
        }
        if let Some(key) = patch.gemini_api_key {
            self.gemini_api_key = key;
        }
        if let Some(enabled) = patch.ai_enabled {
            self.ai_enabled = enabled;
        }
        if let Some(url) = patch.cloud_url {
            self.cloud_url = url;
        }
        if let Some(key) = patch.cloud_api_key {
            self.cloud_api_key = key;
        }
    }
}

/// Update settings request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub ai_enabled: Option<bool>,
    pub cloud_url: Option<Option<String>>,
    pub cloud_api_key: Option<Option<String>>,
}
