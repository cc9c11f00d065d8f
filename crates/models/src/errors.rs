use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("validation error: {0}")]
    Validation(String),
}

impl ModelError {
    pub fn missing(field: &str) -> Self { Self::Malformed(format!("missing field `{}`", field)) }
}
