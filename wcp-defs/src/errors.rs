use thiserror::Error;

/// Contract-level error taxonomy (see spec §7). These names cross service
/// boundaries; they are mapped to HTTP status classes in `wcp-api` and to
/// bus behavior (retry vs. drop) in `wcp-common`.
#[derive(Debug, Error)]
pub enum WcpError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("external service error: {0}")]
    ExternalService(String),

    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}

impl WcpError {
    pub fn validation(msg: impl Into<String>) -> Self {
        WcpError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        WcpError::Conflict(msg.into())
    }
}
