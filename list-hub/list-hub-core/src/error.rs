use thiserror::Error;

/// Outcome taxonomy shared by every list, sharing and identity operation.
///
/// `NotFound` doubles as "precondition unmet": a conditional update that
/// matched no document is indistinguishable from a missing one, which keeps
/// list existence hidden from callers without access.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("unauthorized")]
    NotAuthorized,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl HubError {
    pub fn validation(msg: impl Into<String>) -> Self {
        HubError::Validation(msg.into())
    }
}

pub type HubResult<T> = std::result::Result<T, HubError>;
