//! Prompt templates for Fire Circle rounds

pub mod template;

pub use template::PromptTemplate;
