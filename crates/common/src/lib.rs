use thiserror::Error;

pub mod utils;

#[derive(Debug, Error)]
pub enum CommonError {
    #[error("unknown log format: {0}")]
    UnknownLogFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_names_the_input() {
        let e = CommonError::UnknownLogFormat("xml".into());
        assert_eq!(e.to_string(), "unknown log format: xml");
    }
}
