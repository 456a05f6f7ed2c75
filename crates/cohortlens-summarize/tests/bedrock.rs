//! Bedrock backend tests.
//!
//! The ignored test calls the real Converse API and needs valid AWS
//! credentials in the environment.
//!
//! Run with: `cargo test -p cohortlens-summarize --test bedrock -- --ignored`

use cohortlens_core::models::prompt::{ModelParameters, PromptPair};
use cohortlens_core::models::summary::SUMMARY_ERROR_TEXT;
use cohortlens_summarize::bedrock::{BedrockSummarizer, DEFAULT_MODEL_ID};
use cohortlens_summarize::error::SummarizerError;
use cohortlens_summarize::orchestrate::{GenerateOptions, generate_summaries};
use cohortlens_summarize::prompt::SummaryPrompts;
use cohortlens_summarize::service::Summarizer;

#[tokio::test]
async fn missing_credential_fails_without_network() {
    let summarizer = BedrockSummarizer::without_credentials(DEFAULT_MODEL_ID);
    assert!(!summarizer.has_credentials());

    let err = summarizer
        .summarize(&PromptPair::new("s", "u"), &ModelParameters::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SummarizerError::MissingCredential));
}

#[tokio::test]
async fn missing_credential_yields_error_text_for_both_summaries() {
    let summarizer = BedrockSummarizer::without_credentials(DEFAULT_MODEL_ID);
    let prompts = SummaryPrompts {
        patient: PromptPair::new("s1", "u1"),
        population: PromptPair::new("s2", "u2"),
    };

    let summaries = generate_summaries(&summarizer, &prompts, &GenerateOptions::default()).await;

    assert_eq!(summaries.patient.text, SUMMARY_ERROR_TEXT);
    assert_eq!(summaries.population.text, SUMMARY_ERROR_TEXT);
}

#[tokio::test]
#[ignore]
async fn live_converse_returns_text() {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new("us-east-1"))
        .load()
        .await;
    let summarizer = BedrockSummarizer::new(&config, DEFAULT_MODEL_ID);

    let text = summarizer
        .summarize(
            &PromptPair::new("Answer in one word.", "What organ pumps blood?"),
            &ModelParameters::default(),
        )
        .await
        .expect("converse should succeed");

    assert!(!text.trim().is_empty());
}
