//! Page invalidation
//!
//! Pages that render ingest credentials are cached by the web tier. After the
//! credentials change, the affected route is announced on a local broadcast
//! channel and, when Redis is configured, published so other replicas drop
//! their copy too.

use async_trait::async_trait;
use redis::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::key_builder::KeyBuilder;
use crate::{Error, Result};

/// Invalidation message types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvalidationMessage {
    /// Drop the cached rendering of one route
    Path { path: String },
}

/// Marks cached page renderings stale
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
    async fn invalidate_path(&self, path: &str) -> Result<()>;
}

/// Broadcasts page invalidations locally and over Redis Pub/Sub
#[derive(Clone)]
pub struct PageInvalidationService {
    redis_client: Option<Client>,
    channel: String,
    local_sender: broadcast::Sender<InvalidationMessage>,
    node_id: String,
}

impl PageInvalidationService {
    /// Create a new invalidation service
    ///
    /// Without a Redis client only local subscribers are notified.
    pub fn new(redis_client: Option<Client>, keys: &KeyBuilder, node_id: String) -> Self {
        let (local_sender, _) = broadcast::channel(256);

        Self {
            redis_client,
            channel: keys.invalidation_channel(),
            local_sender,
            node_id,
        }
    }

    /// Subscribe to invalidations raised by this process
    pub fn subscribe(&self) -> broadcast::Receiver<InvalidationMessage> {
        self.local_sender.subscribe()
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Send `message` to local subscribers and, if configured, to Redis
    pub async fn broadcast(&self, message: InvalidationMessage) -> Result<()> {
        // No local subscribers is not an error
        if self.local_sender.send(message.clone()).is_err() {
            debug!(?message, "No local invalidation subscribers");
        }

        let Some(ref client) = self.redis_client else {
            return Ok(());
        };

        let json = serde_json::to_string(&message)?;
        let mut conn = client.get_multiplexed_async_connection().await.map_err(|e| {
            warn!(error = %e, "Redis connection failed");
            Error::Cache(format!("Redis connection failed: {e}"))
        })?;

        redis::AsyncCommands::publish::<_, _, ()>(&mut conn, &self.channel, json)
            .await
            .map_err(|e| Error::Cache(format!("Failed to publish invalidation: {e}")))?;

        debug!(
            node_id = %self.node_id,
            channel = %self.channel,
            ?message,
            "Published page invalidation"
        );

        Ok(())
    }
}

#[async_trait]
impl PageCache for PageInvalidationService {
    async fn invalidate_path(&self, path: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(Error::InvalidInput(format!("Page path must be absolute: {path}")));
        }
        self.broadcast(InvalidationMessage::Path {
            path: path.to_string(),
        })
        .await
    }
}

impl std::fmt::Debug for PageInvalidationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageInvalidationService")
            .field("redis_enabled", &self.redis_client.is_some())
            .field("channel", &self.channel)
            .field("node_id", &self.node_id)
            .finish()
    }
}
