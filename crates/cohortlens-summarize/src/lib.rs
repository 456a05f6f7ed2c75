//! cohortlens-summarize
//!
//! Prompt construction, the summarizer capability, its Bedrock backend, and
//! the two-call summarization workflow.

pub mod bedrock;
pub mod error;
pub mod orchestrate;
pub mod prompt;
pub mod service;
