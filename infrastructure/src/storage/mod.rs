//! Filesystem-backed deliberation storage
//!
//! One write-once record per deliberation, time-partitioned by
//! year/month, with an append-only JSONL metadata index kept separate
//! from the bulk transcripts.

pub mod fs_store;
pub mod index;

pub use fs_store::FsDeliberationStore;
pub use index::IndexEntry;
