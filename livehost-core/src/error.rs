use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("User identity not available")]
    IdentityUnavailable,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cache invalidation error: {0}")]
    Cache(String),

    /// The ingress exists and its credentials are stored; only the page
    /// invalidation failed
    #[error("Ingress {ingress_id} provisioned but page invalidation failed: {source}")]
    InvalidationFailed {
        ingress_id: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("Stream record not found".to_string()),
            _ => Self::Database(err),
        }
    }
}

impl Error {
    /// True when the failure came from the remote media provider
    #[must_use]
    pub const fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// True when the ingress was created and persisted despite the error
    #[must_use]
    pub const fn is_provisioned(&self) -> bool {
        matches!(self, Self::InvalidationFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
