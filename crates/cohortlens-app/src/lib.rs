//! cohortlens-app library root.
//!
//! Session state, configuration, and the terminal front end. Exposed as a
//! library so integration tests can drive a session without the binary.

pub mod aws;
pub mod chart;
pub mod commands;
pub mod config;
pub mod display;
pub mod session;
