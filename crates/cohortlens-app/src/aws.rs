use serde::{Deserialize, Serialize};
use tracing::warn;

use cohortlens_summarize::bedrock::BedrockSummarizer;

use crate::config::{AppConfig, CredentialSource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub account_id: String,
    pub arn: String,
    pub user_id: String,
}

/// Build an `SdkConfig` from a region and credential source.
pub async fn build_aws_config(region: &str, creds: &CredentialSource) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    match creds {
        CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token,
        } => {
            builder = builder.credentials_provider(aws_sdk_sts::config::Credentials::new(
                access_key_id,
                secret_access_key,
                session_token.clone(),
                None,
                "cohortlens-config",
            ));
        }
        CredentialSource::Profile { profile_name } => {
            builder = builder.profile_name(profile_name);
        }
        CredentialSource::DefaultChain => {}
    }

    builder.load().await
}

/// The SDK config for the configured credential, if there is one.
pub async fn load_sdk_config(config: &AppConfig) -> Option<aws_config::SdkConfig> {
    match &config.credentials {
        Some(creds) => Some(build_aws_config(&config.region, creds).await),
        None => None,
    }
}

/// Build the summarizer for this session.
///
/// With no SDK config the summarizer is still usable; each call reports a
/// missing credential.
pub fn build_summarizer(
    config: &AppConfig,
    sdk_config: Option<&aws_config::SdkConfig>,
) -> BedrockSummarizer {
    match sdk_config {
        Some(sdk) => BedrockSummarizer::new(sdk, &config.model_id),
        None => {
            warn!("no AWS credential configured; summaries will show an error");
            BedrockSummarizer::without_credentials(&config.model_id)
        }
    }
}

/// Call STS GetCallerIdentity to validate credentials.
pub async fn validate_credentials(config: &aws_config::SdkConfig) -> eyre::Result<CallerIdentity> {
    let sts = aws_sdk_sts::Client::new(config);
    let resp = sts
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| eyre::eyre!("STS GetCallerIdentity failed: {e}"))?;

    Ok(CallerIdentity {
        account_id: resp.account().unwrap_or_default().to_string(),
        arn: resp.arn().unwrap_or_default().to_string(),
        user_id: resp.user_id().unwrap_or_default().to_string(),
    })
}
