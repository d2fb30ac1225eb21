//! Application layer for fire-circle
//!
//! Use cases and ports. The deliberation engine lives here; adapters for
//! its ports (LLM gateway, deliberation store) live in the
//! infrastructure layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DeliberationParams, FailureMode};
pub use ports::deliberation_store::{
    DeliberationMetadata, DeliberationRecord, DeliberationStore, StoreError, StoreTags, StoredDissent,
    StoredId, SynthesisDocument,
};
pub use ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
pub use ports::progress::{DeliberationProgress, EvaluationOutcomeKind, NoProgress};
pub use use_cases::run_deliberation::{
    RunDeliberationUseCase,
    types::{DeliberationError, RunDeliberationInput},
};
