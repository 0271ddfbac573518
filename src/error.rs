use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("profile lookup failed: {0}")]
    Lookup(String),

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("collaborator failure: {0}")]
    Collaborator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransferError {
    /// Errors that abort the current query but say nothing about the run's setup.
    pub fn is_fatal_for_query(&self) -> bool {
        matches!(
            self,
            TransferError::Lookup(_)
                | TransferError::DegenerateInput(_)
                | TransferError::Collaborator(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
