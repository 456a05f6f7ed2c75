use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown prompt field: {0}")]
    UnknownPromptField(String),
}
