//! LlmModel - Language models offered by the provisioning API

use serde::{Deserialize, Serialize};

/// Language model backing the assistant
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LlmModel {
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl LlmModel {
    /// Identifier sent to the provisioning API
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmModel::Gpt4o => "gpt-4o",
            LlmModel::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

impl std::fmt::Display for LlmModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LlmModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gpt-4o" => Ok(LlmModel::Gpt4o),
            "gpt-3.5-turbo" => Ok(LlmModel::Gpt35Turbo),
            _ => Err(format!("Unknown model: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("GPT-4o".parse::<LlmModel>(), Ok(LlmModel::Gpt4o));
        assert_eq!("gpt-3.5-turbo".parse::<LlmModel>(), Ok(LlmModel::Gpt35Turbo));
        assert!("claude".parse::<LlmModel>().is_err());
    }

    #[test]
    fn test_serializes_as_api_identifier() {
        let json = serde_json::to_string(&LlmModel::Gpt35Turbo).unwrap();
        assert_eq!(json, "\"gpt-3.5-turbo\"");
    }
}
