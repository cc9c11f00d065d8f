use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("token error: {0}")]
    Token(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: &str) -> Self { Self::NotFound(format!("{} {}", entity, id)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Duplicate(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Malformed(_) => 1004,
            ServiceError::Token(_) => 1102,
            ServiceError::Storage(_) => 1200,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Malformed(m) => ServiceError::Malformed(m),
            ModelError::Validation(m) => ServiceError::Validation(m),
        }
    }
}
