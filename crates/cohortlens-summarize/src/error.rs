use thiserror::Error;

/// Why a summarization call produced no text.
///
/// Backends map their own failures onto these variants so callers never see
/// backend-specific error types.
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("no credential configured for the summarization service")]
    MissingCredential,

    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("model returned no text")]
    EmptyResponse,
}
