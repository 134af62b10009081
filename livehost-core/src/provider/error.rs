// Provider Error Types

/// Errors raised by the remote room and ingress services
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider API error {status} ({code}): {msg}")]
    Twirp {
        status: u16,
        code: String,
        msg: String,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Access token error: {0}")]
    Token(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProviderError {
    /// Twirp error code, if the provider answered with one
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Twirp { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ProviderError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
