use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderTallyError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    PromptError(String),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required value: {field}")]
    MissingConfigError { field: String },
}

impl OrderTallyError {
    pub fn recovery_suggestion(&self) -> String {
        match self {
            OrderTallyError::HttpClientError(_) => {
                "Check the endpoint URL and your network connection".to_string()
            }
            OrderTallyError::IoError(_) => {
                "Make sure the file exists and is readable from the current directory".to_string()
            }
            OrderTallyError::SerializationError(_) => "Re-run with --format text".to_string(),
            OrderTallyError::PromptError(_) => {
                "Pass the values as flags when running without a terminal".to_string()
            }
            OrderTallyError::ConfigValidationError { .. } => {
                "Check the TOML syntax of the session file".to_string()
            }
            OrderTallyError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of {} and try again", field)
            }
            OrderTallyError::MissingConfigError { field } => {
                format!("Provide {} via a flag, the session file or the prompt", field)
            }
        }
    }
}

/// Why a single order lookup did not produce a status text.
///
/// Always folded into `LookupOutcome::Failure`, never returned to the caller
/// of the aggregator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("lookup task did not complete: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, OrderTallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_display() {
        assert_eq!(
            LookupError::Status(404).to_string(),
            "unexpected HTTP status 404"
        );
        assert!(LookupError::Transport("connection refused".into())
            .to_string()
            .contains("connection refused"));
        assert!(LookupError::Task("task 7 panicked".into())
            .to_string()
            .starts_with("lookup task did not complete"));
    }

    #[test]
    fn test_recovery_suggestion_names_field() {
        let err = OrderTallyError::MissingConfigError {
            field: "postcode".to_string(),
        };
        assert!(err.recovery_suggestion().contains("postcode"));
    }
}
