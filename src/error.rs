use thiserror::Error;

pub type LifeResult<T> = Result<T, LifeError>;

#[derive(Debug, Error)]
pub enum LifeError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: i64 },

    #[error("assistant unavailable: {0}")]
    BackendUnavailable(String),

    #[error("invalid assistant response: {0}")]
    InvalidResponse(String),

    #[error("invalid import file: {0}")]
    ImportFormat(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LifeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LifeError::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LifeError::NotFound { .. })
    }

    /// Assistant failures that the chat thread turns into a fallback bubble.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            LifeError::BackendUnavailable(_) | LifeError::InvalidResponse(_)
        )
    }
}
