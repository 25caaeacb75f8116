//! Model selection for answer generation

use docqa_core::error::{DocqaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default Bedrock model id for [`ModelChoice::Claude`]
pub const CLAUDE_MODEL_ID: &str = "anthropic.claude-v2";

/// Default Bedrock model id for [`ModelChoice::Llama3`]
pub const LLAMA3_MODEL_ID: &str = "meta.llama3-8b-instruct-v1:0";

/// The generation models a caller can pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    Claude,
    Llama3,
}

impl ModelChoice {
    pub fn all() -> [ModelChoice; 2] {
        [ModelChoice::Claude, ModelChoice::Llama3]
    }

    /// Model family, which decides the request body layout
    pub fn family(&self) -> ModelFamily {
        match self {
            ModelChoice::Claude => ModelFamily::Anthropic,
            ModelChoice::Llama3 => ModelFamily::Meta,
        }
    }

    /// Default model id
    pub fn default_model_id(&self) -> &'static str {
        match self {
            ModelChoice::Claude => CLAUDE_MODEL_ID,
            ModelChoice::Llama3 => LLAMA3_MODEL_ID,
        }
    }

    /// Default generation parameters
    pub fn default_params(&self) -> GenerationParams {
        match self {
            ModelChoice::Claude => GenerationParams { max_output_tokens: 200 },
            ModelChoice::Llama3 => GenerationParams { max_output_tokens: 512 },
        }
    }

    /// Resolve to a concrete spec, optionally with a configured model id
    pub fn spec(&self, model_id_override: Option<&str>) -> ModelSpec {
        ModelSpec {
            choice: *self,
            model_id: model_id_override.unwrap_or(self.default_model_id()).to_string(),
            family: self.family(),
            params: self.default_params(),
        }
    }
}

impl FromStr for ModelChoice {
    type Err = DocqaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "claude" => Ok(ModelChoice::Claude),
            "llama3" | "llama" => Ok(ModelChoice::Llama3),
            _ => Err(DocqaError::invalid_config(
                "model",
                format!("Unknown model '{}'. Use claude or llama3", s),
            )),
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelChoice::Claude => f.write_str("claude"),
            ModelChoice::Llama3 => f.write_str("llama3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFamily {
    Anthropic,
    Meta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
}

/// Everything a generator needs to invoke one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub choice: ModelChoice,
    pub model_id: String,
    pub family: ModelFamily,
    pub params: GenerationParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_specs() {
        let claude = ModelChoice::Claude.spec(None);
        assert_eq!(claude.model_id, "anthropic.claude-v2");
        assert_eq!(claude.family, ModelFamily::Anthropic);
        assert_eq!(claude.params.max_output_tokens, 200);

        let llama = ModelChoice::Llama3.spec(None);
        assert_eq!(llama.model_id, "meta.llama3-8b-instruct-v1:0");
        assert_eq!(llama.family, ModelFamily::Meta);
        assert_eq!(llama.params.max_output_tokens, 512);
    }

    #[test]
    fn test_model_id_override_keeps_family() {
        let spec = ModelChoice::Llama3.spec(Some("llama3:8b"));
        assert_eq!(spec.model_id, "llama3:8b");
        assert_eq!(spec.family, ModelFamily::Meta);
    }

    #[test]
    fn test_parse_model_choice() {
        assert_eq!("Claude".parse::<ModelChoice>().unwrap(), ModelChoice::Claude);
        assert_eq!("llama3".parse::<ModelChoice>().unwrap(), ModelChoice::Llama3);
        assert_eq!("llama".parse::<ModelChoice>().unwrap(), ModelChoice::Llama3);

        let err = "gpt".parse::<ModelChoice>().unwrap_err();
        assert!(matches!(err, DocqaError::InvalidConfig { ref key, .. } if key == "model"));
    }

    #[test]
    fn test_display_round_trips() {
        for choice in ModelChoice::all() {
            assert_eq!(choice.to_string().parse::<ModelChoice>().unwrap(), choice);
        }
    }
}
