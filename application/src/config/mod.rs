//! Application-layer configuration

pub mod params;

pub use params::{DeliberationParams, FailureMode};
