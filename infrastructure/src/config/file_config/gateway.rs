//! `[gateway]` section — LLM endpoint settings

use serde::{Deserialize, Serialize};

/// Environment variable consulted for the API key when the config file
/// does not name one
pub const DEFAULT_API_KEY_ENV: &str = "FIRE_CIRCLE_API_KEY";

/// OpenAI-compatible endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Base URL of the chat-completions endpoint (without the
    /// `/chat/completions` suffix)
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl GatewaySection {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let section = GatewaySection::default();
        assert!(section.base_url.starts_with("https://"));
        assert_eq!(section.api_key_env, DEFAULT_API_KEY_ENV);
    }

    #[test]
    fn test_local_endpoint_from_toml() {
        let section: GatewaySection = toml::from_str(
            r#"
            base_url = "http://localhost:8000/v1"
            api_key_env = "LOCAL_KEY"
            "#,
        )
        .unwrap();
        assert_eq!(section.base_url, "http://localhost:8000/v1");
        assert_eq!(section.api_key_env, "LOCAL_KEY");
    }
}
