//! Filesystem adapter for the deliberation store port.
//!
//! Layout under the storage root:
//!
//! ```text
//! <root>/<YYYY>/<MM>/<fire_circle_id>/metadata.json
//!                                     rounds.json
//!                                     synthesis.json
//!                                     dissents.json
//! <root>/index.jsonl
//! ```
//!
//! Records are write-once and partitioned by the month the deliberation
//! started. The JSONL index is appended through a buffered writer and
//! flushed per write; metadata queries read only the index.

use crate::storage::index::IndexEntry;
use async_trait::async_trait;
use circle_application::{
    DeliberationMetadata, DeliberationRecord, DeliberationStore, StoreError, StoreTags,
    StoredDissent, StoredId, SynthesisDocument,
};
use circle_domain::{Dissent, FireCircleResult, Round};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cmp::Reverse;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

const INDEX_FILE: &str = "index.jsonl";
const METADATA_FILE: &str = "metadata.json";
const ROUNDS_FILE: &str = "rounds.json";
const SYNTHESIS_FILE: &str = "synthesis.json";
const DISSENTS_FILE: &str = "dissents.json";

/// Filesystem-backed deliberation store.
///
/// Thread-safe: the index writer sits behind a mutex, record writes go
/// to per-id directories that are claimed exactly once, and reads never
/// take the lock.
pub struct FsDeliberationStore {
    root: PathBuf,
    index: Mutex<BufWriter<File>>,
}

impl FsDeliberationStore {
    /// Open (or initialize) a store under the given root directory
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::WriteFailed {
            path: root.display().to_string(),
            source,
        })?;

        let index_path = root.join(INDEX_FILE);
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&index_path)
            .map_err(|source| StoreError::WriteFailed {
                path: index_path.display().to_string(),
                source,
            })?;

        Ok(Self {
            root,
            index: Mutex::new(BufWriter::new(file)),
        })
    }

    /// The storage root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_dir(&self, partition: &str, id: &str) -> PathBuf {
        self.root.join(partition).join(id)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        std::fs::write(path, bytes).map_err(|source| StoreError::WriteFailed {
            path: path.display().to_string(),
            source,
        })
    }

    fn read_json<T: DeserializeOwned>(&self, id: &str, path: &Path) -> Result<T, StoreError> {
        let bytes = std::fs::read(path).map_err(|source| StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(id.to_string(), e.to_string()))
    }

    /// Read the whole metadata index. A missing file is an empty store;
    /// a malformed line is skipped with a warning rather than poisoning
    /// every query.
    fn load_index(&self) -> Result<Vec<IndexEntry>, StoreError> {
        let path = self.root.join(INDEX_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let mut entries = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<IndexEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping malformed index line: {}", e),
            }
        }
        Ok(entries)
    }

    fn find_entry(&self, id: &str) -> Result<IndexEntry, StoreError> {
        self.load_index()?
            .into_iter()
            .find(|e| e.fire_circle_id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn append_index_entry(&self, entry: &IndexEntry) -> Result<(), StoreError> {
        let line = serde_json::to_string(entry)?;
        let index_path = self.root.join(INDEX_FILE).display().to_string();
        let mut writer = self
            .index
            .lock()
            .map_err(|_| StoreError::Corrupt(entry.fire_circle_id.clone(), "index writer poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|source| StoreError::WriteFailed {
            path: index_path.clone(),
            source,
        })?;
        // Flush per write: the index is the source of truth for queries
        writer.flush().map_err(|source| StoreError::WriteFailed {
            path: index_path,
            source,
        })
    }
}

#[async_trait]
impl DeliberationStore for FsDeliberationStore {
    async fn store(
        &self,
        result: &FireCircleResult,
        tags: StoreTags,
    ) -> Result<StoredId, StoreError> {
        let id = result.fire_circle_id.as_str();
        let partition = result.started_at.format("%Y/%m").to_string();
        let dir = self.record_dir(&partition, id);

        if dir.exists() || self.load_index()?.iter().any(|e| e.fire_circle_id == id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }

        std::fs::create_dir_all(&dir).map_err(|source| StoreError::WriteFailed {
            path: dir.display().to_string(),
            source,
        })?;

        let metadata = DeliberationMetadata::from_result(result, &tags);
        let synthesis = SynthesisDocument {
            consensus: result.consensus,
            patterns: result.patterns.clone(),
            empty_chair_influence: result.empty_chair_influence,
        };

        self.write_json(&dir.join(METADATA_FILE), &metadata)?;
        self.write_json(&dir.join(ROUNDS_FILE), &result.rounds)?;
        self.write_json(&dir.join(SYNTHESIS_FILE), &synthesis)?;
        self.write_json(&dir.join(DISSENTS_FILE), &result.dissents)?;

        let entry = IndexEntry::from_result(result, &tags, partition);
        self.append_index_entry(&entry)?;

        info!(
            "Stored deliberation {} ({} rounds, {} dissents)",
            id,
            result.round_count(),
            result.dissents.len()
        );
        Ok(StoredId::new(id))
    }

    async fn get(&self, id: &StoredId) -> Result<DeliberationRecord, StoreError> {
        let entry = self.find_entry(id.as_str())?;
        let dir = self.record_dir(&entry.partition, id.as_str());
        if !dir.exists() {
            return Err(StoreError::Corrupt(
                id.to_string(),
                "indexed but record directory is missing".to_string(),
            ));
        }

        let metadata: DeliberationMetadata = self.read_json(id.as_str(), &dir.join(METADATA_FILE))?;
        let rounds: Vec<Round> = self.read_json(id.as_str(), &dir.join(ROUNDS_FILE))?;
        let synthesis: SynthesisDocument = self.read_json(id.as_str(), &dir.join(SYNTHESIS_FILE))?;
        let dissents: Vec<Dissent> = self.read_json(id.as_str(), &dir.join(DISSENTS_FILE))?;

        Ok(DeliberationRecord {
            metadata,
            rounds,
            synthesis,
            dissents,
        })
    }

    async fn query_by_category(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<DeliberationMetadata>, StoreError> {
        let mut entries: Vec<IndexEntry> = self
            .load_index()?
            .into_iter()
            .filter(|e| e.category.as_deref() == Some(category))
            .collect();
        entries.sort_by_key(|e| Reverse(e.started_at));
        Ok(entries.iter().take(limit).map(IndexEntry::to_metadata).collect())
    }

    async fn query_by_pattern(
        &self,
        name: &str,
        min_agreement: f64,
        limit: usize,
    ) -> Result<Vec<DeliberationMetadata>, StoreError> {
        let mut entries: Vec<IndexEntry> = self
            .load_index()?
            .into_iter()
            .filter(|e| e.has_pattern(name, min_agreement))
            .collect();
        entries.sort_by_key(|e| Reverse(e.started_at));
        Ok(entries.iter().take(limit).map(IndexEntry::to_metadata).collect())
    }

    async fn find_dissents(
        &self,
        min_f_delta: f64,
        limit: usize,
    ) -> Result<Vec<StoredDissent>, StoreError> {
        // The index narrows candidates; dissents.json is opened only for
        // records that can actually contribute
        let mut candidates: Vec<IndexEntry> = self
            .load_index()?
            .into_iter()
            .filter(|e| e.dissent_count > 0 && e.max_f_delta.is_some_and(|d| d >= min_f_delta))
            .collect();
        candidates.sort_by_key(|e| Reverse(e.started_at));

        let mut results = Vec::new();
        for entry in candidates {
            if results.len() >= limit {
                break;
            }
            let dir = self.record_dir(&entry.partition, &entry.fire_circle_id);
            let dissents: Vec<Dissent> =
                self.read_json(&entry.fire_circle_id, &dir.join(DISSENTS_FILE))?;
            for dissent in dissents.into_iter().filter(|d| d.f_delta >= min_f_delta) {
                if results.len() >= limit {
                    break;
                }
                results.push(StoredDissent {
                    fire_circle_id: entry.fire_circle_id.clone(),
                    started_at: entry.started_at,
                    category: entry.category.clone(),
                    dissent,
                });
            }
        }
        Ok(results)
    }
}
