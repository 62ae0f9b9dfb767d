use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response status {status} at {url}")]
    Status { status: u16, url: String },

    #[error("provider data malformed or missing field: {0}")]
    Data(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("message build failed: {0}")]
    Mail(#[from] lettre::error::Error),

    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Transient remote failure, worth retrying on the next sweep.
    Medium,
    /// Data or delivery problem that needs operator attention.
    High,
    /// Startup cannot proceed at all.
    Critical,
}

impl AlertError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AlertError::Http(_) | AlertError::Status { .. } => ErrorSeverity::Medium,
            AlertError::Data(_)
            | AlertError::Json(_)
            | AlertError::Smtp(_)
            | AlertError::Mail(_)
            | AlertError::Address(_) => ErrorSeverity::High,
            AlertError::Io(_)
            | AlertError::Toml(_)
            | AlertError::MissingConfig { .. }
            | AlertError::InvalidConfigValue { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AlertError::Http(_) => "Check network connectivity and the provider endpoint URL",
            AlertError::Status { .. } => {
                "The provider rejected the request; verify the API key and rate limits"
            }
            AlertError::Data(_) | AlertError::Json(_) => {
                "The provider response did not match the expected shape; it may be an error payload"
            }
            AlertError::Smtp(_) | AlertError::Mail(_) => {
                "Verify SMTP_USER/SMTP_PASSWORD and that the relay allows this sender"
            }
            AlertError::Address(_) => "Fix the malformed address in sender/recipients",
            AlertError::Io(_) | AlertError::Toml(_) => {
                "Check that the config file exists and is valid TOML"
            }
            AlertError::MissingConfig { .. } | AlertError::InvalidConfigValue { .. } => {
                "Fix the named field in the config file or environment"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AlertError::Status { status, url } => {
                format!("A data provider returned HTTP {status} ({url})")
            }
            AlertError::MissingConfig { field } => {
                format!("Required configuration '{field}' was not supplied")
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
