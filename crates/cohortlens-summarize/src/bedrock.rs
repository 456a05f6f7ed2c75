//! Summarizer backed by the Bedrock Converse API.
//!
//! The runtime client is only built when the application found a credential
//! source. Without one, every call fails with
//! [`SummarizerError::MissingCredential`] instead of reaching AWS.

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use tracing::{debug, info};

use cohortlens_core::models::prompt::{ModelParameters, PromptPair};

use crate::error::SummarizerError;
use crate::service::Summarizer;

/// Default Claude inference profile used when the config does not name one.
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

pub struct BedrockSummarizer {
    client: Option<Client>,
    model_id: String,
}

impl BedrockSummarizer {
    /// Build a summarizer that talks to Bedrock using `config`.
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self {
            client: Some(Client::new(config)),
            model_id: model_id.into(),
        }
    }

    /// Build a summarizer for a session with no credential configured.
    pub fn without_credentials(model_id: impl Into<String>) -> Self {
        Self {
            client: None,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn has_credentials(&self) -> bool {
        self.client.is_some()
    }
}

impl Summarizer for BedrockSummarizer {
    async fn summarize(
        &self,
        prompt: &PromptPair,
        params: &ModelParameters,
    ) -> Result<String, SummarizerError> {
        let client = self
            .client
            .as_ref()
            .ok_or(SummarizerError::MissingCredential)?;

        invoke_converse(client, &self.model_id, prompt, params).await
    }
}

/// Single-turn Converse call: one system block, one user message.
async fn invoke_converse(
    client: &Client,
    model_id: &str,
    prompt: &PromptPair,
    params: &ModelParameters,
) -> Result<String, SummarizerError> {
    let message = Message::builder()
        .role(ConversationRole::User)
        .content(ContentBlock::Text(prompt.user_text.clone()))
        .build()
        .map_err(|e| SummarizerError::Invocation(e.to_string()))?;

    let inference_config = InferenceConfiguration::builder()
        .max_tokens(i32::try_from(params.max_tokens).unwrap_or(i32::MAX))
        .temperature(params.temperature)
        .set_top_p(params.top_p)
        .build();

    debug!(model = model_id, "invoking converse");

    let response = client
        .converse()
        .model_id(model_id)
        .system(SystemContentBlock::Text(prompt.system_text.clone()))
        .messages(message)
        .inference_config(inference_config)
        .send()
        .await
        .map_err(|e| SummarizerError::Invocation(e.into_service_error().to_string()))?;

    let output_message = response
        .output()
        .and_then(|o| o.as_message().ok())
        .ok_or_else(|| SummarizerError::ResponseParse("no message in response".to_string()))?;

    let text = output_message
        .content()
        .iter()
        .filter_map(|block| {
            if let ContentBlock::Text(text) = block {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("");

    if let Some(usage) = response.usage() {
        info!(
            model = model_id,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "converse usage"
        );
    }

    if text.trim().is_empty() {
        return Err(SummarizerError::EmptyResponse);
    }

    Ok(text)
}
