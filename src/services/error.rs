use thiserror::Error;

/// Failures of portal operations, surfaced to callers as user-visible messages.
#[derive(Debug, Error)]
pub(crate) enum PortalError {
    #[error("This exam is not currently active")]
    ExamInactive,
    #[error("You have already completed this exam")]
    AlreadyCompleted,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("storage failure")]
    Storage(#[from] sqlx::Error),
}

impl PortalError {
    pub(crate) fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
