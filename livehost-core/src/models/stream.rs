use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::ingress::IngressCredentials;

/// A host's stream record
///
/// Owned by the persistence layer and created when the user signs up; the
/// provisioning flow only ever updates its ingest columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    pub user_id: UserId,
    pub name: String,
    pub ingress_id: Option<String>,
    pub server_url: Option<String>,
    pub stream_key: Option<String>,
    pub is_live: bool,
    pub updated_at: DateTime<Utc>,
}

impl Stream {
    /// Current ingest credentials, if the stream has been provisioned
    #[must_use]
    pub fn credentials(&self) -> Option<IngressCredentials> {
        match (&self.ingress_id, &self.server_url, &self.stream_key) {
            (Some(id), Some(url), Some(key)) if !id.is_empty() && !url.is_empty() && !key.is_empty() => {
                Some(IngressCredentials {
                    ingress_id: id.clone(),
                    server_url: url.clone(),
                    stream_key: key.clone(),
                })
            }
            _ => None,
        }
    }
}
