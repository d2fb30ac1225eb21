//! Metadata index entries for the deliberation store
//!
//! One JSON line per stored deliberation. The entry carries everything a
//! metadata query can ask about — category, patterns, dissent magnitude,
//! time — plus the partition path, so queries never open record
//! directories unless full documents are requested.

use chrono::{DateTime, Utc};
use circle_application::{DeliberationMetadata, StoreTags};
use circle_domain::{Consensus, FireCircleResult, PatternObservation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One line of `index.jsonl`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub fire_circle_id: String,
    /// Relative partition directory, e.g. "2026/08"
    pub partition: String,
    pub started_at: DateTime<Utc>,
    pub participants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub consensus: Consensus,
    pub quorum_valid: bool,
    pub round_count: usize,
    pub patterns: Vec<PatternObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_f_delta: Option<f64>,
    pub dissent_count: usize,
    pub duration: Duration,
}

impl IndexEntry {
    /// Build the index line for a result being stored
    pub fn from_result(result: &FireCircleResult, tags: &StoreTags, partition: String) -> Self {
        Self {
            fire_circle_id: result.fire_circle_id.clone(),
            partition,
            started_at: result.started_at,
            participants: result.participants.clone(),
            category: tags.category.clone(),
            source_id: tags.source_id.clone(),
            consensus: result.consensus,
            quorum_valid: result.quorum_valid,
            round_count: result.round_count(),
            patterns: result.patterns.clone(),
            max_f_delta: result.max_dissent_delta(),
            dissent_count: result.dissents.len(),
            duration: result.duration,
        }
    }

    /// Project into the port's metadata type
    pub fn to_metadata(&self) -> DeliberationMetadata {
        DeliberationMetadata {
            fire_circle_id: self.fire_circle_id.clone(),
            started_at: self.started_at,
            participants: self.participants.clone(),
            category: self.category.clone(),
            source_id: self.source_id.clone(),
            consensus: self.consensus,
            quorum_valid: self.quorum_valid,
            round_count: self.round_count,
            patterns: self.patterns.clone(),
            max_f_delta: self.max_f_delta,
            dissent_count: self.dissent_count,
            duration: self.duration,
        }
    }

    /// Whether the entry exhibits a named pattern at or above the agreement
    pub fn has_pattern(&self, name: &str, min_agreement: f64) -> bool {
        self.patterns
            .iter()
            .any(|p| p.name == name && p.agreement_score >= min_agreement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(patterns: Vec<(&str, f64)>) -> IndexEntry {
        IndexEntry {
            fire_circle_id: "fc-1".to_string(),
            partition: "2026/08".to_string(),
            started_at: Utc::now(),
            participants: vec!["a".to_string()],
            category: Some("extractive".to_string()),
            source_id: None,
            consensus: Consensus {
                truth: 0.4,
                indeterminacy: 0.2,
                falsehood: 0.7,
            },
            quorum_valid: true,
            round_count: 2,
            patterns: patterns
                .into_iter()
                .map(|(name, agreement_score)| PatternObservation {
                    name: name.to_string(),
                    agreement_score,
                })
                .collect(),
            max_f_delta: Some(0.4),
            dissent_count: 1,
            duration: Duration::from_secs(12),
        }
    }

    #[test]
    fn test_has_pattern_respects_min_agreement() {
        let e = entry(vec![("urgency-pressure", 0.66)]);
        assert!(e.has_pattern("urgency-pressure", 0.5));
        assert!(e.has_pattern("urgency-pressure", 0.66));
        assert!(!e.has_pattern("urgency-pressure", 0.7));
        assert!(!e.has_pattern("role-reversal", 0.0));
    }

    #[test]
    fn test_jsonl_line_roundtrip() {
        let e = entry(vec![("false-premise", 1.0)]);
        let line = serde_json::to_string(&e).unwrap();
        assert!(!line.contains('\n'));
        let back: IndexEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(e, back);
    }
}
