use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GreeterError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("missing dependency: {0}")]
    MissingDependency(String),

    #[error("no element matches selector '{0}'")]
    ElementNotFound(String),

    /// Non-200 status, transport failure, or an unexpected response body.
    #[error("translation failed: {0}")]
    Translation(String),

    #[error("background task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, GreeterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GreeterError::InvalidArgument("Must designate a new language".into()).to_string(),
            "invalid argument: Must designate a new language"
        );
        assert_eq!(
            GreeterError::ElementNotFound("#greeting".into()).to_string(),
            "no element matches selector '#greeting'"
        );
        assert!(GreeterError::Translation("HTTP 403".into())
            .to_string()
            .contains("403"));
    }
}
