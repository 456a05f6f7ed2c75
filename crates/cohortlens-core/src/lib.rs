//! cohortlens-core
//!
//! Pure domain types for the cohort summarization pipeline.
//! No AWS or I/O dependency. This is the shared vocabulary of the system.

pub mod error;
pub mod models;
