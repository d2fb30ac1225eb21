//! Model value object representing an LLM participant

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An LLM model that can sit in a Fire Circle (Value Object)
///
/// Participants are addressed by their model identifier; unknown
/// identifiers are preserved verbatim as [`Model::Custom`] so the circle
/// composition is never limited to the models known at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Claude models
    ClaudeSonnet45,
    ClaudeHaiku45,
    ClaudeOpus45,
    // GPT models
    Gpt52,
    Gpt5Mini,
    // Gemini models
    Gemini3Pro,
    // Open-weight models
    DeepseekR1,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::ClaudeSonnet45 => "claude-sonnet-4.5",
            Model::ClaudeHaiku45 => "claude-haiku-4.5",
            Model::ClaudeOpus45 => "claude-opus-4.5",
            Model::Gpt52 => "gpt-5.2",
            Model::Gpt5Mini => "gpt-5-mini",
            Model::Gemini3Pro => "gemini-3-pro-preview",
            Model::DeepseekR1 => "deepseek-r1",
            Model::Custom(s) => s,
        }
    }

    /// Default circle composition for a deliberation
    ///
    /// Three models from three different providers, so a blind spot shared
    /// by one model family does not silently become the circle's blind spot.
    pub fn default_circle() -> Vec<Model> {
        vec![Model::ClaudeSonnet45, Model::Gpt52, Model::Gemini3Pro]
    }

    /// Short display name (e.g., "claude-sonnet-4.5" -> "claude")
    pub fn short_name(&self) -> &str {
        let s = self.as_str();
        s.split(['-', '_']).next().unwrap_or(s)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "claude-sonnet-4.5" => Model::ClaudeSonnet45,
            "claude-haiku-4.5" => Model::ClaudeHaiku45,
            "claude-opus-4.5" => Model::ClaudeOpus45,
            "gpt-5.2" => Model::Gpt52,
            "gpt-5-mini" => Model::Gpt5Mini,
            "gemini-3-pro-preview" => Model::Gemini3Pro,
            "deepseek-r1" => Model::DeepseekR1,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().expect("Model::from_str is infallible"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in Model::default_circle() {
            let s = model.to_string();
            let parsed: Model = s.parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "local-llama-70b".parse().unwrap();
        assert_eq!(model, Model::Custom("local-llama-70b".to_string()));
        assert_eq!(model.to_string(), "local-llama-70b");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(Model::ClaudeSonnet45.short_name(), "claude");
        assert_eq!(Model::Gpt52.short_name(), "gpt");
    }

    #[test]
    fn test_default_circle_is_cross_provider() {
        let circle = Model::default_circle();
        assert_eq!(circle.len(), 3);
        let ids: Vec<&str> = circle.iter().map(|m| m.short_name()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"claude"));
    }
}
