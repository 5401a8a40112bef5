//! Error types shared by the console crates

/// Standard result type for console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the panel server or handling local state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The server refused the session (HTTP 401/403 or an explicit "not authed")
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Network failure, aborted request or anything else that may succeed later
    #[error("Request failed: {message}")]
    Transient { message: String },

    /// Server answered with a non-success status other than 401/403
    #[error("Server error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Unexpected response: {message}")]
    Decode { message: String },

    #[error("Invalid cookie name: {name:?}")]
    InvalidCookieName { name: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a transient error
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create error from an HTTP status code
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized { message },
            _ => Self::Status { status, message },
        }
    }

    /// True when the server explicitly rejected the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}
