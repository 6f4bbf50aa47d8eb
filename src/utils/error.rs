use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP client error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Publish failed: {message}")]
    PublishError { message: String },
}

impl EtlError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(_) => "Could not set up the HTTP client".to_string(),
            EtlError::IoError(e) => format!("File system error: {}", e),
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            EtlError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            EtlError::PublishError { message } => format!("Upload failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check the TLS setup of this machine",
            EtlError::IoError(_) => "Check that the output directory is writable",
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Fix the command line flags or the TOML configuration file"
            }
            EtlError::MissingConfigError { .. } => {
                "Pass the value on the command line or set it in the configuration file"
            }
            EtlError::PublishError { .. } => {
                "Check that the output directory is a git repository with a reachable remote"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
