use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::prompt::PromptPair;

/// Text shown in place of a summary when its call failed for any reason
/// (missing credential, service error, timeout).
pub const SUMMARY_ERROR_TEXT: &str =
    "Error generating summary. Check the summarization service configuration and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Complete,
    Failed,
}

/// The outcome of one summarization call.
///
/// `prompt` is the exact pair that was sent. It is a snapshot; editing the
/// live templates afterwards does not touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub request_id: Uuid,
    pub prompt: PromptPair,
    pub text: String,
    pub status: SummaryStatus,
    pub generated_at: jiff::Timestamp,
}

impl SummaryResult {
    pub fn complete(request_id: Uuid, prompt: PromptPair, text: String) -> Self {
        Self {
            request_id,
            prompt,
            text,
            status: SummaryStatus::Complete,
            generated_at: jiff::Timestamp::now(),
        }
    }

    pub fn failed(request_id: Uuid, prompt: PromptPair) -> Self {
        Self {
            request_id,
            prompt,
            text: SUMMARY_ERROR_TEXT.to_string(),
            status: SummaryStatus::Failed,
            generated_at: jiff::Timestamp::now(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == SummaryStatus::Complete
    }
}

/// Both results of one generate action. Always replaced as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summaries {
    pub patient: SummaryResult,
    pub population: SummaryResult,
}
