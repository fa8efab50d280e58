//! UserConfig Repository Port
//!
//! One document per user id; writes replace the whole document.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, UserConfig};

/// Repository interface for per-user configuration documents
#[async_trait]
pub trait UserConfigRepository: Send + Sync {
    /// Find the document for a user. `None` means first use.
    async fn find_by_user(&self, user_id: &str) -> Result<Option<UserConfig>, DomainError>;

    /// Create or overwrite the document for a user
    async fn save(&self, user_id: &str, config: &UserConfig) -> Result<(), DomainError>;
}
