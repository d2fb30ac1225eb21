//! Neutrosophic evaluation types and response parsing

pub mod neutrosophic;
pub mod parsing;
