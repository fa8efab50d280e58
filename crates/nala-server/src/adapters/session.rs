//! Static session store
//!
//! Token table resolved from configuration at startup. Stands in for the
//! hosted identity provider, which issues the tokens.

use std::collections::HashMap;

use async_trait::async_trait;

use nala::{DomainError, SessionStore, UserIdentity};

/// SessionStore backed by a fixed token -> user table
pub struct StaticSessionStore {
    tokens: HashMap<String, UserIdentity>,
}

impl StaticSessionStore {
    pub fn new(tokens: HashMap<String, UserIdentity>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl SessionStore for StaticSessionStore {
    async fn current_user(&self, token: &str) -> Result<Option<UserIdentity>, DomainError> {
        Ok(self.tokens.get(token).cloned())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_known_tokens_only() {
        let store = StaticSessionStore::new(HashMap::from([(
            "tok-a".to_string(),
            UserIdentity::new("alice"),
        )]));

        assert_eq!(
            store.current_user("tok-a").await.unwrap(),
            Some(UserIdentity::new("alice"))
        );
        assert_eq!(store.current_user("tok-x").await.unwrap(), None);
        assert!(!store.is_empty());
    }
}
