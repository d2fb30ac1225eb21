//! Infrastructure layer for fire-circle
//!
//! Adapters for the application-layer ports: filesystem deliberation
//! storage, figment-based configuration loading, and an
//! OpenAI-compatible HTTP gateway (feature `http-gateway`).

pub mod config;
pub mod storage;

#[cfg(feature = "http-gateway")]
pub mod gateway;

pub use config::{ConfigLoader, FileConfig};
pub use storage::FsDeliberationStore;

#[cfg(feature = "http-gateway")]
pub use gateway::OpenAiCompatGateway;
