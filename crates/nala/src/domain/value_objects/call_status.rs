//! CallStatus - Transient state of the live voice call

use serde::{Deserialize, Serialize};

/// Status of the voice call as seen by the dashboard
///
/// Never persisted; every new session starts at `NotStarted`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    #[default]
    NotStarted,
    Active,
    Inactive,
}

impl CallStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CallStatus::Active)
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallStatus::NotStarted => write!(f, "not-started"),
            CallStatus::Active => write!(f, "active"),
            CallStatus::Inactive => write!(f, "inactive"),
        }
    }
}
