//! PostgreSQL implementation of UserConfigRepository
//!
//! Stores each user's config as one JSONB document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nala::{DomainError, UserConfig, UserConfigRepository};

/// PostgreSQL implementation of UserConfigRepository
pub struct PgUserConfigRepository {
    pool: PgPool,
}

impl PgUserConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserConfigRow {
    user_id: String,
    document: serde_json::Value,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserConfigRow> for UserConfig {
    type Error = DomainError;

    fn try_from(row: UserConfigRow) -> Result<Self, Self::Error> {
        UserConfig::from_document(row.document).map_err(|e| {
            DomainError::Repository(format!(
                "Malformed configuration document for {}: {}",
                row.user_id, e
            ))
        })
    }
}

#[async_trait]
impl UserConfigRepository for PgUserConfigRepository {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<UserConfig>, DomainError> {
        let row = sqlx::query_as::<_, UserConfigRow>(
            "SELECT user_id, document, updated_at FROM user_configs WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        match row {
            Some(row) => {
                tracing::debug!("Configuration for {} last saved at {}", user_id, row.updated_at);
                UserConfig::try_from(row).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, user_id: &str, config: &UserConfig) -> Result<(), DomainError> {
        let document = config
            .to_document()
            .map_err(|e| DomainError::Repository(format!("Failed to serialize config: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO user_configs (user_id, document, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET document = EXCLUDED.document, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(&document)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }
}
