//! `[models]` section — circle composition

use circle_domain::Model;
use serde::{Deserialize, Serialize};

/// Which models sit in the circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsSection {
    /// Participant model identifiers
    pub participants: Vec<String>,
}

impl Default for ModelsSection {
    fn default() -> Self {
        Self {
            participants: Model::default_circle()
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl ModelsSection {
    /// Parse the configured identifiers into model value objects
    pub fn participant_models(&self) -> Vec<Model> {
        self.participants
            .iter()
            .map(|s| s.parse().expect("Model::from_str is infallible"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_participants() {
        let section = ModelsSection::default();
        assert_eq!(section.participant_models(), Model::default_circle());
    }

    #[test]
    fn test_custom_participants_from_toml() {
        let section: ModelsSection = toml::from_str(
            r#"
            participants = ["claude-haiku-4.5", "local-model"]
            "#,
        )
        .unwrap();
        let models = section.participant_models();
        assert_eq!(models.len(), 2);
        assert_eq!(models[1], Model::Custom("local-model".to_string()));
    }
}
