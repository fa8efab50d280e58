//! AgentProfile - Fixed metadata attached to every created agent

use serde::{Deserialize, Serialize};

pub const DEFAULT_AGENT_NAME: &str = "Restaurant Assistant";
pub const DEFAULT_VOICE_ID: &str = "11labs-Adrian";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Name, voice and language sent with create-agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentProfile {
    pub agent_name: String,
    pub voice_id: String,
    pub language: String,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AgentProfile {
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
