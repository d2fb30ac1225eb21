//! `[storage]` section — deliberation store location

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where deliberation records live
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Storage root; defaults to the platform data directory
    pub root: Option<PathBuf>,
}

impl StorageSection {
    /// Resolve the effective storage root
    pub fn resolved_root(&self) -> PathBuf {
        if let Some(root) = &self.root {
            return root.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fire-circle")
            .join("deliberations")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_root_wins() {
        let section: StorageSection = toml::from_str(
            r#"
            root = "/srv/circle"
            "#,
        )
        .unwrap();
        assert_eq!(section.resolved_root(), PathBuf::from("/srv/circle"));
    }

    #[test]
    fn test_default_root_is_under_data_dir() {
        let section = StorageSection::default();
        let root = section.resolved_root();
        assert!(root.ends_with("fire-circle/deliberations"));
    }
}
