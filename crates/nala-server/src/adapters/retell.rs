//! Retell provisioning client
//!
//! Implements the ProvisioningService port against the Retell HTTP API
//! using reqwest. No retries: every failure goes straight back to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use nala::{
    AgentRef, CreateAgentRequest, CreateLlmRequest, CreateWebCallRequest, DomainError, LlmRef,
    ProvisioningService, WebCall,
};

use crate::config::RetellConfig;

const CREATE_LLM: &str = "create-retell-llm";
const CREATE_AGENT: &str = "create-agent";
const CREATE_WEB_CALL: &str = "v2/create-web-call";

/// HTTP implementation of ProvisioningService
pub struct RetellClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RetellClient {
    pub fn new(config: &RetellConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("nala-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, DomainError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("{endpoint}: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("Retell {} returned {}: {}", endpoint, status, body);
            return Err(DomainError::api_status(endpoint, status.as_u16(), body));
        }

        resp.json::<R>()
            .await
            .map_err(|e| DomainError::Transport(format!("Failed to parse {endpoint} response: {e}")))
    }
}

#[async_trait]
impl ProvisioningService for RetellClient {
    async fn create_llm(&self, request: &CreateLlmRequest) -> Result<LlmRef, DomainError> {
        self.post(CREATE_LLM, request).await
    }

    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<AgentRef, DomainError> {
        self.post(CREATE_AGENT, request).await
    }

    async fn create_web_call(
        &self,
        request: &CreateWebCallRequest,
    ) -> Result<WebCall, DomainError> {
        self.post(CREATE_WEB_CALL, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nala::{AgentProfile, LlmModel, UserConfig};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> RetellClient {
        RetellClient::new(&RetellConfig::new(server.uri(), "key_test")).unwrap()
    }

    #[tokio::test]
    async fn test_create_llm_sends_bearer_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-retell-llm"))
            .and(header("Authorization", "Bearer key_test"))
            .and(body_json(json!({
                "model": "gpt-3.5-turbo",
                "general_prompt": "You take pizza orders.",
                "begin_message": "Ciao!"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "llm_id": "llm_123",
                "llm_websocket_url": "wss://api.retellai.com/llm-websocket/llm_123",
                "last_modification_timestamp": 1714608475945u64
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = UserConfig {
            general_prompt: "You take pizza orders.".into(),
            begin_message: "Ciao!".into(),
            model: LlmModel::Gpt35Turbo,
            llm_data: None,
            agent_data: None,
        };
        let llm = client_for(&server)
            .await
            .create_llm(&CreateLlmRequest::from(&config))
            .await
            .unwrap();

        assert_eq!(llm.llm_id, "llm_123");
        assert_eq!(
            llm.llm_websocket_url,
            "wss://api.retellai.com/llm-websocket/llm_123"
        );
    }

    #[tokio::test]
    async fn test_create_agent_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-agent"))
            .and(body_json(json!({
                "llm_websocket_url": "wss://llm/1",
                "agent_name": "Restaurant Assistant",
                "voice_id": "11labs-Adrian",
                "language": "en-US"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"agent_id": "agent_9"})))
            .expect(1)
            .mount(&server)
            .await;

        let llm = LlmRef {
            llm_id: "llm_1".into(),
            llm_websocket_url: "wss://llm/1".into(),
        };
        let agent = client_for(&server)
            .await
            .create_agent(&CreateAgentRequest::new(&llm, &AgentProfile::default()))
            .await
            .unwrap();

        assert_eq!(agent.agent_id, "agent_9");
    }

    #[tokio::test]
    async fn test_create_web_call_uses_v2_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/create-web-call"))
            .and(body_json(json!({"agent_id": "agent_9"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "access_token": "tok_1",
                "call_id": "call_1",
                "call_type": "web_call"
            })))
            .mount(&server)
            .await;

        let call = client_for(&server)
            .await
            .create_web_call(&CreateWebCallRequest {
                agent_id: "agent_9".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            call,
            WebCall {
                access_token: "tok_1".into(),
                call_id: "call_1".into()
            }
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-retell-llm"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .create_llm(&CreateLlmRequest::from(&UserConfig::default()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::api_status("create-retell-llm", 500, "upstream exploded")
        );
    }

    #[tokio::test]
    async fn test_unparseable_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let llm = LlmRef {
            llm_id: "llm_1".into(),
            llm_websocket_url: "wss://llm/1".into(),
        };
        let err = client_for(&server)
            .await
            .create_agent(&CreateAgentRequest::new(&llm, &AgentProfile::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Transport(_)));
    }
}
