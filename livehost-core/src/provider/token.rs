//! Admin access tokens for the provider API
//!
//! Every admin call carries a short-lived HS256 JWT signed with the API
//! secret. The `video` claim lists the grants the call needs.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::error::{ProviderError, Result};

/// Permissions carried in the `video` claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub room_create: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub room_list: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub room_admin: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ingress_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl VideoGrant {
    #[must_use]
    pub fn room_list() -> Self {
        Self {
            room_list: true,
            ..Self::default()
        }
    }

    /// Grant needed to delete a room
    #[must_use]
    pub fn room_create() -> Self {
        Self {
            room_create: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn ingress_admin() -> Self {
        Self {
            ingress_admin: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// API key
    pub iss: String,
    pub sub: String,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
    pub video: VideoGrant,
}

/// Signs admin tokens with the configured API key pair
#[derive(Clone)]
pub struct TokenSigner {
    api_key: String,
    encoding_key: Arc<EncodingKey>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("api_key", &self.api_key)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    pub fn new(api_key: &str, api_secret: &str, ttl: Duration) -> Result<Self> {
        if api_key.is_empty() || api_secret.is_empty() {
            return Err(ProviderError::InvalidConfig(
                "API key and secret are required".to_string(),
            ));
        }

        Ok(Self {
            api_key: api_key.to_string(),
            encoding_key: Arc::new(EncodingKey::from_secret(api_secret.as_bytes())),
            ttl,
        })
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a token carrying the given grant
    pub fn sign(&self, grant: VideoGrant) -> Result<String> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);

        let claims = AccessClaims {
            iss: self.api_key.clone(),
            sub: String::new(),
            nbf: now,
            exp: now.saturating_add(ttl),
            jti: nanoid::nanoid!(16),
            video: grant,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }
}
