use std::future::Future;

use cohortlens_core::models::prompt::{ModelParameters, PromptPair};

use crate::error::SummarizerError;

/// Anything that can turn a system/user prompt pair into text.
///
/// The orchestrator only relies on succeed-or-fail; any hosted API or local
/// model can sit behind this.
pub trait Summarizer {
    fn summarize(
        &self,
        prompt: &PromptPair,
        params: &ModelParameters,
    ) -> impl Future<Output = Result<String, SummarizerError>>;
}
