use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no patient selected")]
    NoSelection,

    #[error("patient not found: {0}")]
    NotFound(String),
}
