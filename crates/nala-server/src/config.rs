//! Server configuration
//!
//! Resolved once at startup from Shuttle secrets (or any key lookup).
//! Nothing secret is compiled into the binary.

use std::collections::HashMap;
use std::fmt;

use nala::{AgentProfile, UserIdentity};
use thiserror::Error;

pub const DEFAULT_RETELL_BASE_URL: &str = "https://api.retellai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required secret: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Provisioning API connection settings
#[derive(Clone)]
pub struct RetellConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for RetellConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetellConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RetellConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Everything the server needs at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub retell: RetellConfig,
    pub agent_profile: AgentProfile,
    /// Session token -> signed-in user
    pub session_tokens: HashMap<String, UserIdentity>,
}

impl AppConfig {
    /// Build from a key lookup such as `SecretStore::get`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("RETELL_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("RETELL_API_KEY"))?;

        let base_url =
            lookup("RETELL_BASE_URL").unwrap_or_else(|| DEFAULT_RETELL_BASE_URL.to_string());

        let mut retell = RetellConfig::new(base_url, api_key);
        if let Some(raw) = lookup("RETELL_TIMEOUT_SECS") {
            retell.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "RETELL_TIMEOUT_SECS",
                message: format!("'{}' is not a number of seconds", raw),
            })?;
        }

        let mut agent_profile = AgentProfile::default();
        if let Some(name) = lookup("NALA_AGENT_NAME") {
            agent_profile = agent_profile.with_agent_name(name);
        }
        if let Some(voice) = lookup("NALA_VOICE_ID") {
            agent_profile = agent_profile.with_voice_id(voice);
        }
        if let Some(language) = lookup("NALA_LANGUAGE") {
            agent_profile = agent_profile.with_language(language);
        }

        let session_tokens = match lookup("NALA_SESSION_TOKENS") {
            Some(raw) => parse_session_tokens(&raw)?,
            None => HashMap::new(),
        };

        Ok(Self {
            retell,
            agent_profile,
            session_tokens,
        })
    }
}

/// Parse `token=user_id` pairs separated by commas
fn parse_session_tokens(raw: &str) -> Result<HashMap<String, UserIdentity>, ConfigError> {
    let mut tokens = HashMap::new();

    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (token, user_id) = pair
            .split_once('=')
            .map(|(t, u)| (t.trim(), u.trim()))
            .filter(|(t, u)| !t.is_empty() && !u.is_empty())
            .ok_or_else(|| ConfigError::Invalid {
                key: "NALA_SESSION_TOKENS",
                message: format!("expected token=user_id, got '{}'", pair),
            })?;
        tokens.insert(token.to_string(), UserIdentity::new(user_id));
    }

    Ok(tokens)
}
