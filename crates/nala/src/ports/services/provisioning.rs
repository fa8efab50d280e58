//! Provisioning Port
//!
//! The three calls the dashboard makes against the conversational-AI
//! platform. Request bodies are the wire bodies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::{AgentProfile, AgentRef, LlmModel, LlmRef, UserConfig, WebCall};

/// Body of create-llm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateLlmRequest {
    pub model: LlmModel,
    pub general_prompt: String,
    pub begin_message: String,
}

impl From<&UserConfig> for CreateLlmRequest {
    fn from(config: &UserConfig) -> Self {
        Self {
            model: config.model,
            general_prompt: config.general_prompt.clone(),
            begin_message: config.begin_message.clone(),
        }
    }
}

/// Body of create-agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateAgentRequest {
    pub llm_websocket_url: String,
    pub agent_name: String,
    pub voice_id: String,
    pub language: String,
}

impl CreateAgentRequest {
    pub fn new(llm: &LlmRef, profile: &AgentProfile) -> Self {
        Self {
            llm_websocket_url: llm.llm_websocket_url.clone(),
            agent_name: profile.agent_name.clone(),
            voice_id: profile.voice_id.clone(),
            language: profile.language.clone(),
        }
    }
}

/// Body of create-web-call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateWebCallRequest {
    pub agent_id: String,
}

impl From<&AgentRef> for CreateWebCallRequest {
    fn from(agent: &AgentRef) -> Self {
        Self {
            agent_id: agent.agent_id.clone(),
        }
    }
}

/// Provisioning API interface
///
/// Any non-success status must surface as [`DomainError::ApiStatus`] and any
/// failure to get a response as [`DomainError::Transport`].
#[async_trait]
pub trait ProvisioningService: Send + Sync {
    /// Create a hosted LLM resource
    async fn create_llm(&self, request: &CreateLlmRequest) -> Result<LlmRef, DomainError>;

    /// Create a voice agent bound to an LLM resource
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<AgentRef, DomainError>;

    /// Request short-lived credentials for a web call with an agent
    async fn create_web_call(&self, request: &CreateWebCallRequest)
        -> Result<WebCall, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_llm_body_shape() {
        let body = serde_json::to_value(CreateLlmRequest::from(&UserConfig::default())).unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(
            body["general_prompt"],
            "You are a helpful assistant for our restaurant..."
        );
        assert_eq!(
            body["begin_message"],
            "Hi, I am Nala, how can I assist you today?"
        );
    }

    #[test]
    fn test_create_agent_uses_profile() {
        let llm = LlmRef {
            llm_id: "llm_1".into(),
            llm_websocket_url: "wss://llm/1".into(),
        };
        let request = CreateAgentRequest::new(&llm, &AgentProfile::default());

        assert_eq!(request.llm_websocket_url, "wss://llm/1");
        assert_eq!(request.agent_name, "Restaurant Assistant");
        assert_eq!(request.voice_id, "11labs-Adrian");
        assert_eq!(request.language, "en-US");
    }
}
