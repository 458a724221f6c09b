use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Malformed local input, never sent over the wire
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from database: {status} - {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DbError {
    pub fn is_validation(&self) -> bool {
        matches!(self, DbError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }

    /// Connectivity failures plus anything the backend answered that cannot be interpreted
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DbError::Transport(_) | DbError::UnexpectedStatus { .. } | DbError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
