//! Core domain types shared across the crate

pub mod error;
pub mod model;
pub mod target;
