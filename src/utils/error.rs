use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{message}")]
    SigningError { message: String },

    #[error("Storage {operation} failed: {message}")]
    StorageError {
        operation: &'static str,
        message: String,
    },

    #[error("Object content is not valid UTF-8: {0}")]
    DecodeError(#[from] std::string::FromUtf8Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Gateway responded with status {status}: {body}")]
    GatewayResponseError { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Signing,
    Storage,
    Data,
    Network,
    Configuration,
    System,
}

impl GatewayError {
    pub fn storage(operation: &'static str, message: impl Into<String>) -> Self {
        Self::StorageError {
            operation,
            message: message.into(),
        }
    }

    pub fn signing(message: impl Into<String>) -> Self {
        Self::SigningError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SigningError { .. } => ErrorCategory::Signing,
            Self::StorageError { .. } => ErrorCategory::Storage,
            Self::DecodeError(_) | Self::SerializationError(_) => ErrorCategory::Data,
            Self::ApiError(_) | Self::GatewayResponseError { .. } => ErrorCategory::Network,
            Self::UrlError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    /// Message suitable for printing to a terminal user.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::GatewayResponseError { status: 403, .. } => {
                "The gateway rejected the API key (403 Forbidden)".to_string()
            }
            Self::MissingConfigError { field } => {
                format!("{} is not set; pass it as a flag or environment variable", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
