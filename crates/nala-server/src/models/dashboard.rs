//! Dashboard DTOs
//!
//! Wire shapes for the dashboard API, converted from the domain types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use nala::{
    CallEvent, CallUpdate, ConfigPatch, DashboardState, DomainError, LlmModel, Notification, ToggleOutcome,
    UserConfig, Utterance,
};

use crate::adapters::CallSession;

// ============================================
// Configuration
// ============================================

/// Form fields plus provisioned references
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfigView {
    pub general_prompt: String,
    pub begin_message: String,
    /// `gpt-4o` or `gpt-3.5-turbo`
    pub model: String,
    pub llm_id: Option<String>,
    pub llm_websocket_url: Option<String>,
    pub agent_id: Option<String>,
}

impl From<&UserConfig> for ConfigView {
    fn from(config: &UserConfig) -> Self {
        Self {
            general_prompt: config.general_prompt.clone(),
            begin_message: config.begin_message.clone(),
            model: config.model.to_string(),
            llm_id: config.llm_data.as_ref().map(|l| l.llm_id.clone()),
            llm_websocket_url: config
                .llm_data
                .as_ref()
                .map(|l| l.llm_websocket_url.clone()),
            agent_id: config.agent_data.as_ref().map(|a| a.agent_id.clone()),
        }
    }
}

/// Edit the draft form fields
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateConfigRequest {
    pub general_prompt: Option<String>,
    pub begin_message: Option<String>,
    /// `gpt-4o` or `gpt-3.5-turbo`
    pub model: Option<String>,
}

impl UpdateConfigRequest {
    pub fn into_patch(self) -> Result<ConfigPatch, DomainError> {
        let model = self
            .model
            .map(|m| m.parse::<LlmModel>())
            .transpose()
            .map_err(DomainError::Validation)?;

        Ok(ConfigPatch {
            general_prompt: self.general_prompt,
            begin_message: self.begin_message,
            model,
        })
    }
}

// ============================================
// Dashboard
// ============================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationView {
    /// `success` or `error`
    pub level: String,
    pub title: String,
    pub description: Option<String>,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        Self {
            level: serde_json::to_value(n.level)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            title: n.title.clone(),
            description: n.description.clone(),
        }
    }
}

/// Dashboard state snapshot
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub config: ConfigView,
    /// `not-started`, `active` or `inactive`
    pub call_status: String,
    /// `idle`, `in_flight`, `succeeded` or `failed`
    pub provisioning: String,
    pub notification: Option<NotificationView>,
}

impl From<&DashboardState> for DashboardResponse {
    fn from(state: &DashboardState) -> Self {
        Self {
            config: ConfigView::from(&state.config),
            call_status: state.call_status.to_string(),
            provisioning: serde_json::to_value(state.provisioning)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            notification: state.notification.as_ref().map(NotificationView::from),
        }
    }
}

// ============================================
// Call
// ============================================

/// Result of toggling the call
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleCallResponse {
    /// `started`, `stopped` or `no_agent`
    pub outcome: String,
    pub call_id: Option<String>,
    pub call_status: String,
}

impl ToggleCallResponse {
    pub fn new(outcome: &ToggleOutcome, state: &DashboardState) -> Self {
        let (outcome, call_id) = match outcome {
            ToggleOutcome::Started(call) => ("started", Some(call.call_id.clone())),
            ToggleOutcome::Stopped => ("stopped", None),
            ToggleOutcome::NoAgent => ("no_agent", None),
        };
        Self {
            outcome: outcome.to_string(),
            call_id,
            call_status: state.call_status.to_string(),
        }
    }
}

/// Credentials the page passes to the SDK's startCall
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CallSessionView {
    pub access_token: String,
    pub call_id: String,
    pub sample_rate: u32,
    pub enable_update: bool,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}

impl From<CallSession> for CallSessionView {
    fn from(session: CallSession) -> Self {
        Self {
            access_token: session.params.access_token,
            call_id: session.params.call_id,
            sample_rate: session.params.sample_rate,
            enable_update: session.params.enable_update,
            issued_at: session.issued_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CallStateResponse {
    pub call_status: String,
    /// Present while the page should be connected
    pub session: Option<CallSessionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranscriptLine {
    #[serde(alias = "role")]
    pub speaker: String,
    #[serde(alias = "content")]
    pub text: String,
}

/// SDK event forwarded by the page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallEventRequest {
    ConversationStarted,
    ConversationEnded {
        code: u16,
        reason: String,
    },
    Error {
        message: String,
    },
    Update {
        #[serde(default)]
        transcript: Vec<TranscriptLine>,
    },
}

impl From<CallEventRequest> for CallEvent {
    fn from(request: CallEventRequest) -> Self {
        match request {
            CallEventRequest::ConversationStarted => CallEvent::ConversationStarted,
            CallEventRequest::ConversationEnded { code, reason } => {
                CallEvent::ConversationEnded { code, reason }
            }
            CallEventRequest::Error { message } => CallEvent::Error { message },
            CallEventRequest::Update { transcript } => CallEvent::Update(CallUpdate {
                transcript: transcript
                    .into_iter()
                    .map(|line| Utterance {
                        speaker: line.speaker,
                        text: line.text,
                    })
                    .collect(),
            }),
        }
    }
}
