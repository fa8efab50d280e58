//! Session Port
//!
//! Identity provider interface. Authentication itself happens outside
//! this system; the dashboard only needs a stable user id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Authenticated user as reported by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserIdentity {
    pub user_id: String,
}

impl UserIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Identity provider interface
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve a session token to the signed-in user, if any
    async fn current_user(&self, token: &str) -> Result<Option<UserIdentity>, DomainError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}
