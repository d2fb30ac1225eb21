//! Deliberation store port
//!
//! Persists completed deliberations in four logically separate
//! sub-documents sharing one id — metadata (small, indexed), rounds
//! (full transcript), synthesis, and dissents — so metadata-only queries
//! never load round transcripts. Records are write-once: a
//! `fire_circle_id` is never updated in place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use circle_domain::{Consensus, Dissent, FireCircleResult, PatternObservation, Round};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Identifier of a stored deliberation (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredId(String);

impl StoredId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoredId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StoredId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Optional classification attached at store time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreTags {
    /// Dataset or evaluation category (e.g., "extractive")
    pub category: Option<String>,
    /// Identifier of the source item in its dataset
    pub source_id: Option<String>,
}

impl StoreTags {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }
}

/// The small, indexed projection of a stored deliberation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationMetadata {
    pub fire_circle_id: String,
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

impl DeliberationMetadata {
    /// Project the indexed fields out of a full result
    pub fn from_result(result: &FireCircleResult, tags: &StoreTags) -> Self {
        Self {
            fire_circle_id: result.fire_circle_id.clone(),
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
}

/// Synthesis sub-document: consensus details and pattern observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisDocument {
    pub consensus: Consensus,
    pub patterns: Vec<PatternObservation>,
    pub empty_chair_influence: f64,
}

/// The full reproducible record of one stored deliberation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationRecord {
    pub metadata: DeliberationMetadata,
    pub rounds: Vec<Round>,
    pub synthesis: SynthesisDocument,
    pub dissents: Vec<Dissent>,
}

/// A dissent joined with the metadata of the deliberation it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDissent {
    pub fire_circle_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub dissent: Dissent,
}

/// Errors from the deliberation store
///
/// Write errors are fatal for the caller: a deliberation that cannot be
/// durably recorded must be surfaced, never silently dropped.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Deliberation {0} already stored (records are write-once)")]
    AlreadyExists(String),

    #[error("Deliberation {0} not found")]
    NotFound(String),

    #[error("Write failed at {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Read failed at {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record {0}: {1}")]
    Corrupt(String, String),
}

/// Persistence port for completed deliberations
#[async_trait]
pub trait DeliberationStore: Send + Sync {
    /// Durably store a result. Write-once per `fire_circle_id`.
    async fn store(
        &self,
        result: &FireCircleResult,
        tags: StoreTags,
    ) -> Result<StoredId, StoreError>;

    /// Load the full reproducible record
    async fn get(&self, id: &StoredId) -> Result<DeliberationRecord, StoreError>;

    /// Metadata of deliberations in a category, most recent first
    async fn query_by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<DeliberationMetadata>, StoreError>;

    /// Metadata of deliberations exhibiting a named pattern at or above
    /// the given agreement, most recent first
    async fn query_by_pattern(
        &self,
        name: &str,
        min_agreement: f64,
        limit: usize,
    ) -> Result<Vec<DeliberationMetadata>, StoreError>;

    /// Dissents with `f_delta >= min_f_delta` across stored
    /// deliberations, most recent first
    async fn find_dissents(
        &self,
        min_f_delta: f64,
        limit: usize,
    ) -> Result<Vec<StoredDissent>, StoreError>;
}
