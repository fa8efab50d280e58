//! Nala API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// API Client for Nala
pub struct NalaClient {
    client: Client,
    base_url: String,
    token: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct ConfigView {
    pub general_prompt: String,
    pub begin_message: String,
    pub model: String,
    pub llm_id: Option<String>,
    pub agent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationView {
    pub level: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardResponse {
    pub config: ConfigView,
    pub call_status: String,
    pub provisioning: String,
    pub notification: Option<NotificationView>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleCallResponse {
    pub outcome: String,
    pub call_id: Option<String>,
    pub call_status: String,
}

#[derive(Debug, Deserialize)]
pub struct CallSessionView {
    pub call_id: String,
    pub sample_rate: u32,
}

#[derive(Debug, Deserialize)]
pub struct CallStateResponse {
    pub call_status: String,
    pub session: Option<CallSessionView>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateConfigRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl UpdateConfigRequest {
    pub fn is_empty(&self) -> bool {
        self.general_prompt.is_none() && self.begin_message.is_none() && self.model.is_none()
    }
}

impl NalaClient {
    /// Create a new API client
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let resp = request
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .context("Failed to connect to Nala API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        Ok(resp)
    }

    async fn send_json<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        self.send(request)
            .await?
            .json()
            .await
            .context("Failed to parse response")
    }

    /// Current dashboard state (also verifies the token)
    pub async fn dashboard(&self) -> Result<DashboardResponse> {
        self.send_json(self.client.get(self.url("/dashboard"))).await
    }

    /// Edit the configuration draft
    pub async fn update_config(&self, request: &UpdateConfigRequest) -> Result<DashboardResponse> {
        self.send_json(self.client.put(self.url("/dashboard/config")).json(request))
            .await
    }

    /// Provision and persist, optionally applying edits first
    pub async fn save(&self, request: &UpdateConfigRequest) -> Result<DashboardResponse> {
        let builder = self.client.post(self.url("/dashboard/config/save"));
        let builder = if request.is_empty() {
            builder
        } else {
            builder.json(request)
        };
        self.send_json(builder).await
    }

    pub async fn toggle_call(&self) -> Result<ToggleCallResponse> {
        self.send_json(self.client.post(self.url("/dashboard/call/toggle")))
            .await
    }

    pub async fn call_state(&self) -> Result<CallStateResponse> {
        self.send_json(self.client.get(self.url("/dashboard/call")))
            .await
    }

    /// End the server-side dashboard session
    pub async fn sign_out(&self) -> Result<()> {
        self.send(self.client.delete(self.url("/dashboard/session")))
            .await?;
        Ok(())
    }
}
