use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A required field is missing, negative, or not drawn from its
    /// enumeration.
    #[error("invalid input: {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalyticsError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        AnalyticsError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalyticsError::InvalidInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
