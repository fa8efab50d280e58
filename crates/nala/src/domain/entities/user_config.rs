//! UserConfig - Per-user assistant configuration document
//!
//! Pure domain entity without infrastructure dependencies.
//! The serialized form is the stored document, so field names are camelCase.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::value_objects::LlmModel;

pub const DEFAULT_GENERAL_PROMPT: &str = "You are a helpful assistant for our restaurant...";
pub const DEFAULT_BEGIN_MESSAGE: &str = "Hi, I am Nala, how can I assist you today?";

/// Reference to a hosted LLM resource, as returned by create-llm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LlmRef {
    pub llm_id: String,
    pub llm_websocket_url: String,
}

/// Reference to a hosted voice agent, as returned by create-agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentRef {
    pub agent_id: String,
}

/// UserConfig - the prompt/model form plus the provisioned references
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub general_prompt: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub begin_message: String,
    #[serde(default, deserialize_with = "lenient_model")]
    pub model: LlmModel,
    #[serde(default)]
    pub llm_data: Option<LlmRef>,
    #[serde(default)]
    pub agent_data: Option<AgentRef>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            general_prompt: DEFAULT_GENERAL_PROMPT.to_string(),
            begin_message: DEFAULT_BEGIN_MESSAGE.to_string(),
            model: LlmModel::default(),
            llm_data: None,
            agent_data: None,
        }
    }
}

impl UserConfig {
    /// Parse a stored document
    ///
    /// Missing prompt fields load as empty strings and a missing or unknown
    /// model loads as the default model. An agent without an LLM is dropped.
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<Self>(document).map(Self::without_orphan_agent)
    }

    /// Drop an agent reference that has no LLM reference behind it
    pub fn without_orphan_agent(self) -> Self {
        match (&self.llm_data, &self.agent_data) {
            (None, Some(agent)) => {
                warn!(agent_id = %agent.agent_id, "Agent stored without an LLM, discarding it");
                Self {
                    agent_data: None,
                    ..self
                }
            }
            _ => self,
        }
    }

    /// Serialize to the stored document shape
    pub fn to_document(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Copy of this config carrying freshly provisioned references
    pub fn with_references(&self, llm: LlmRef, agent: AgentRef) -> Self {
        Self {
            llm_data: Some(llm),
            agent_data: Some(agent),
            ..self.clone()
        }
    }

    /// Agent to call, if one has been provisioned
    pub fn agent(&self) -> Option<&AgentRef> {
        self.agent_data.as_ref()
    }
}

/// Partial edit of the form fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<LlmModel>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.general_prompt.is_none() && self.begin_message.is_none() && self.model.is_none()
    }

    /// Apply the edit, leaving provisioned references untouched
    pub fn apply_to(&self, config: &UserConfig) -> UserConfig {
        UserConfig {
            general_prompt: self
                .general_prompt
                .clone()
                .unwrap_or_else(|| config.general_prompt.clone()),
            begin_message: self
                .begin_message
                .clone()
                .unwrap_or_else(|| config.begin_message.clone()),
            model: self.model.unwrap_or(config.model),
            llm_data: config.llm_data.clone(),
            agent_data: config.agent_data.clone(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

fn lenient_model<'de, D>(deserializer: D) -> Result<LlmModel, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<LlmModel>().ok())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert_eq!(config.general_prompt, DEFAULT_GENERAL_PROMPT);
        assert_eq!(config.begin_message, DEFAULT_BEGIN_MESSAGE);
        assert_eq!(config.model, LlmModel::Gpt4o);
        assert!(config.agent().is_none());
    }

    #[test]
    fn test_document_uses_camel_case_keys() {
        let config = UserConfig::default().with_references(
            LlmRef {
                llm_id: "llm_1".into(),
                llm_websocket_url: "wss://llm/1".into(),
            },
            AgentRef {
                agent_id: "agent_1".into(),
            },
        );

        let doc = config.to_document().unwrap();
        assert_eq!(doc["generalPrompt"], DEFAULT_GENERAL_PROMPT);
        assert_eq!(doc["model"], "gpt-4o");
        assert_eq!(doc["llmData"]["llm_websocket_url"], "wss://llm/1");
        assert_eq!(doc["agentData"]["agent_id"], "agent_1");
    }

    #[test]
    fn test_sparse_document_loads_with_fallbacks() {
        let config = UserConfig::from_document(json!({
            "generalPrompt": null,
            "model": "something-else",
        }))
        .unwrap();

        assert_eq!(config.general_prompt, "");
        assert_eq!(config.begin_message, "");
        assert_eq!(config.model, LlmModel::Gpt4o);
        assert!(config.llm_data.is_none());
        assert!(config.agent_data.is_none());
    }

    #[test]
    fn test_non_string_fields_fall_back() {
        let config = UserConfig::from_document(json!({
            "generalPrompt": 42,
            "beginMessage": "Hello",
            "model": 4,
        }))
        .unwrap();

        assert_eq!(config.general_prompt, "");
        assert_eq!(config.begin_message, "Hello");
        assert_eq!(config.model, LlmModel::Gpt4o);
    }

    #[test]
    fn test_agent_without_llm_is_dropped() {
        let config = UserConfig::from_document(json!({
            "generalPrompt": "x",
            "agentData": {"agent_id": "a1"},
        }))
        .unwrap();

        assert!(config.llm_data.is_none());
        assert!(config.agent().is_none());
    }

    #[test]
    fn test_agent_with_llm_is_kept() {
        let config = UserConfig::from_document(json!({
            "llmData": {"llm_id": "l1", "llm_websocket_url": "wss://llm/l1"},
            "agentData": {"agent_id": "a1"},
        }))
        .unwrap();

        assert_eq!(config.agent().map(|a| a.agent_id.as_str()), Some("a1"));
    }

    #[test]
    fn test_patch_keeps_references() {
        let config = UserConfig::default().with_references(
            LlmRef {
                llm_id: "llm_1".into(),
                llm_websocket_url: "wss://llm/1".into(),
            },
            AgentRef {
                agent_id: "agent_1".into(),
            },
        );
        let patch = ConfigPatch {
            model: Some(LlmModel::Gpt35Turbo),
            ..Default::default()
        };

        let edited = patch.apply_to(&config);
        assert_eq!(edited.model, LlmModel::Gpt35Turbo);
        assert_eq!(edited.general_prompt, config.general_prompt);
        assert_eq!(edited.agent_data, config.agent_data);
        assert!(ConfigPatch::default().is_empty());
    }
}
