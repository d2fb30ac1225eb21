//! Post-deliberation synthesis: dissent extraction, pattern observations,
//! and the empty-chair influence signal.
//!
//! Synthesis runs only after all rounds are final, so it observes an
//! immutable snapshot.

pub mod dissent;
pub mod pattern;
pub mod synthesizer;
