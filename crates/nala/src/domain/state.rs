//! Dashboard State - Single state object driven by an explicit action set
//!
//! All dashboard mutations go through [`DashboardState::apply`], so the
//! save and call sequences can be replayed and audited action by action.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AgentRef, LlmRef, UserConfig};
use crate::domain::value_objects::CallStatus;

pub const SAVE_SUCCESS_TITLE: &str = "Changes saved successfully.";
pub const SAVE_ERROR_TITLE: &str = "Error saving changes.";

/// Progress of the save (provisioning) sequence
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningPhase {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient user-facing message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notification {
    pub fn saved() -> Self {
        Self {
            level: NotificationLevel::Success,
            title: SAVE_SUCCESS_TITLE.to_string(),
            description: None,
        }
    }

    pub fn save_failed(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: SAVE_ERROR_TITLE.to_string(),
            description: Some(description.into()),
        }
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardState {
    pub config: UserConfig,
    pub call_status: CallStatus,
    pub provisioning: ProvisioningPhase,
    pub notification: Option<Notification>,
}

/// The only ways the dashboard state can change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardAction {
    /// The draft config was edited or loaded (replaced wholesale)
    ConfigChanged { config: UserConfig },
    ProvisioningStarted,
    ProvisioningSucceeded { llm: LlmRef, agent: AgentRef },
    ProvisioningFailed { message: String },
    CallStatusChanged { status: CallStatus },
}

impl DashboardAction {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardAction::ConfigChanged { .. } => "config_changed",
            DashboardAction::ProvisioningStarted => "provisioning_started",
            DashboardAction::ProvisioningSucceeded { .. } => "provisioning_succeeded",
            DashboardAction::ProvisioningFailed { .. } => "provisioning_failed",
            DashboardAction::CallStatusChanged { .. } => "call_status_changed",
        }
    }
}

impl DashboardState {
    /// Apply an action in place. Returns whether anything changed.
    pub fn apply(&mut self, action: &DashboardAction) -> bool {
        let before = self.clone();

        match action {
            DashboardAction::ConfigChanged { config } => {
                self.config = config.clone();
            }
            DashboardAction::ProvisioningStarted => {
                self.provisioning = ProvisioningPhase::InFlight;
                self.notification = None;
            }
            DashboardAction::ProvisioningSucceeded { llm, agent } => {
                self.config = self.config.with_references(llm.clone(), agent.clone());
                self.provisioning = ProvisioningPhase::Succeeded;
                self.notification = Some(Notification::saved());
            }
            DashboardAction::ProvisioningFailed { message } => {
                self.provisioning = ProvisioningPhase::Failed;
                self.notification = Some(Notification::save_failed(message.clone()));
            }
            DashboardAction::CallStatusChanged { status } => {
                self.call_status = *status;
            }
        }

        *self != before
    }

    /// Forget the outcome of the last save. Returns whether anything changed.
    pub fn clear_feedback(&mut self) -> bool {
        let changed = self.provisioning != ProvisioningPhase::Idle || self.notification.is_some();
        self.provisioning = ProvisioningPhase::Idle;
        self.notification = None;
        changed
    }

    /// Consuming variant of [`apply`](Self::apply)
    pub fn reduce(mut self, action: &DashboardAction) -> Self {
        self.apply(action);
        self
    }
}
