//! Call Client Port
//!
//! Narrow interface over the real-time call SDK: start, stop, subscribe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::errors::DomainError;
use crate::domain::StartCallParams;

/// One line of the live transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Utterance {
    #[serde(alias = "role")]
    pub speaker: String,
    #[serde(alias = "content")]
    pub text: String,
}

/// Transcript update pushed by the call client
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallUpdate {
    #[serde(default)]
    pub transcript: Vec<Utterance>,
}

/// Lifecycle and transcript events emitted by the call client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallEvent {
    ConversationStarted,
    ConversationEnded { code: u16, reason: String },
    Error { message: String },
    Update(CallUpdate),
}

/// Call client interface
///
/// One instance backs one dashboard for its whole lifetime.
#[async_trait]
pub trait CallClient: Send + Sync {
    /// Start the audio session. Resolves once the client accepted the request.
    async fn start_call(&self, params: StartCallParams) -> Result<(), DomainError>;

    /// Stop the current audio session
    async fn stop_call(&self) -> Result<(), DomainError>;

    /// Subscribe to lifecycle/transcript events
    fn subscribe(&self) -> broadcast::Receiver<CallEvent>;
}
