//! File-backed configuration schema
//!
//! The TOML file mirrors the sections below:
//!
//! ```toml
//! [circle]
//! max_rounds = 3
//! min_viable_circle = 2
//! failure_mode = "resilient"
//!
//! [models]
//! participants = ["claude-sonnet-4.5", "gpt-5.2", "gemini-3-pro-preview"]
//!
//! [storage]
//! root = "/var/lib/fire-circle/deliberations"
//!
//! [gateway]
//! base_url = "http://localhost:8000/v1"
//! ```

mod circle;
mod gateway;
mod models;
mod storage;

pub use circle::CircleSection;
pub use gateway::GatewaySection;
pub use models::ModelsSection;
pub use storage::StorageSection;

use serde::{Deserialize, Serialize};

/// Root of the merged configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub circle: CircleSection,
    pub models: ModelsSection,
    pub storage: StorageSection,
    pub gateway: GatewaySection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_complete() {
        let config = FileConfig::default();
        assert_eq!(config.circle.max_rounds, 3);
        assert_eq!(config.models.participant_models().len(), 3);
        assert!(config.storage.root.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [circle]
            max_rounds = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.circle.max_rounds, 5);
        assert_eq!(config.circle.min_viable_circle, 2, "untouched defaults survive");
    }
}
