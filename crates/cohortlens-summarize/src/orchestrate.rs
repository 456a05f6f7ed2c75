//! Runs the patient-level and population-level summarization calls.
//!
//! The calls run one after the other and fail independently. Whatever
//! happens, the caller gets back a complete [`Summaries`] value: a failed or
//! timed-out call is replaced by [`SUMMARY_ERROR_TEXT`].
//!
//! [`SUMMARY_ERROR_TEXT`]: cohortlens_core::models::summary::SUMMARY_ERROR_TEXT

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use cohortlens_core::models::prompt::{ModelParameters, PromptPair};
use cohortlens_core::models::summary::{Summaries, SummaryResult};

use crate::prompt::SummaryPrompts;
use crate::service::Summarizer;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Patient,
    Population,
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patient => write!(f, "patient"),
            Self::Population => write!(f, "population"),
        }
    }
}

/// Per-call settings for a generate action.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub params: ModelParameters,
    pub timeout: Duration,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            params: ModelParameters::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Issue the patient call, then the population call, and return both results.
///
/// Never fails. Results are only handed back once both calls have resolved,
/// so a caller that stores the returned value replaces both slots at once.
pub async fn generate_summaries<S: Summarizer>(
    service: &S,
    prompts: &SummaryPrompts,
    options: &GenerateOptions,
) -> Summaries {
    let patient = run_call(service, SummaryKind::Patient, &prompts.patient, options).await;
    let population =
        run_call(service, SummaryKind::Population, &prompts.population, options).await;

    Summaries {
        patient,
        population,
    }
}

async fn run_call<S: Summarizer>(
    service: &S,
    kind: SummaryKind,
    prompt: &PromptPair,
    options: &GenerateOptions,
) -> SummaryResult {
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, kind = %kind, "starting summarization");

    let call = service.summarize(prompt, &options.params);

    match tokio::time::timeout(options.timeout, call).await {
        Ok(Ok(text)) => {
            info!(
                request_id = %request_id,
                kind = %kind,
                text_len = text.len(),
                "summarization complete"
            );
            SummaryResult::complete(request_id, prompt.clone(), text)
        }
        Ok(Err(e)) => {
            warn!(request_id = %request_id, kind = %kind, error = %e, "summarization failed");
            SummaryResult::failed(request_id, prompt.clone())
        }
        Err(_) => {
            warn!(
                request_id = %request_id,
                kind = %kind,
                timeout_secs = options.timeout.as_secs(),
                "summarization timed out"
            );
            SummaryResult::failed(request_id, prompt.clone())
        }
    }
}
