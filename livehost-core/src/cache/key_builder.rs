//! Redis key and page path construction
//!
//! All Redis keys share the configured prefix so several deployments can use
//! one Redis instance.

use crate::Config;

/// Route of the page that renders a host's ingest credentials
#[must_use]
pub fn stream_keys_path(username: &str) -> String {
    format!("/u/{username}/keys")
}

pub struct KeyBuilder {
    prefix: String,
}

impl KeyBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.redis.key_prefix.clone())
    }

    /// Pub/Sub channel carrying page invalidations
    #[must_use]
    pub fn invalidation_channel(&self) -> String {
        format!("{}cache:invalidation", self.prefix)
    }
}
