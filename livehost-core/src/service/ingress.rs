//! Ingress provisioning
//!
//! A host owns at most one ingress. Provisioning tears down whatever the
//! provider still holds for the host (rooms first, then ingress endpoints),
//! creates a fresh ingress, stores its credentials on the host's stream
//! record and invalidates the page that displays them.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::host_lock::HostLocks;
use super::identity::IdentityResolver;
use crate::cache::{stream_keys_path, PageCache};
use crate::models::{
    CreateIngressOptions, Identity, IngressAudioOptions, IngressCredentials, IngressInfo,
    IngressInput, IngressVideoOptions, Stream, UserId,
};
use crate::provider::{IngressApi, RoomServiceApi};
use crate::repository::StreamStore;
use crate::resilience::clock::{Sleeper, TokioSleeper};
use crate::resilience::pacing::Pacer;
use crate::resilience::retry::RetryPolicy;
use crate::{Error, Result};

/// Builds ingest endpoints for hosts
#[derive(Clone)]
pub struct IngressProvisioner {
    rooms: Arc<dyn RoomServiceApi>,
    ingress: Arc<dyn IngressApi>,
    identity: Arc<dyn IdentityResolver>,
    streams: Arc<dyn StreamStore>,
    pages: Arc<dyn PageCache>,
    retry: RetryPolicy,
    pacer: Pacer,
    sleeper: Arc<dyn Sleeper>,
    host_locks: Option<HostLocks>,
}

impl std::fmt::Debug for IngressProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngressProvisioner")
            .field("retry", &self.retry)
            .field("pacer", &self.pacer)
            .field("serialize_per_host", &self.host_locks.is_some())
            .finish_non_exhaustive()
    }
}

impl IngressProvisioner {
    /// Create a provisioner with the default retry policy, a 200ms settle
    /// interval and per-host serialization
    pub fn new(
        rooms: Arc<dyn RoomServiceApi>,
        ingress: Arc<dyn IngressApi>,
        identity: Arc<dyn IdentityResolver>,
        streams: Arc<dyn StreamStore>,
        pages: Arc<dyn PageCache>,
    ) -> Self {
        Self {
            rooms,
            ingress,
            identity,
            streams,
            pages,
            retry: RetryPolicy::default(),
            pacer: Pacer::default(),
            sleeper: Arc::new(TokioSleeper),
            host_locks: Some(HostLocks::new()),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Enable or disable per-host serialization of `create`
    #[must_use]
    pub fn with_host_locks(mut self, enabled: bool) -> Self {
        self.host_locks = enabled.then(HostLocks::new);
        self
    }

    /// Replace the identity resolver
    #[must_use]
    pub fn with_identity(mut self, identity: Arc<dyn IdentityResolver>) -> Self {
        self.identity = identity;
        self
    }

    /// Remove every room and ingress the provider holds for `host_id`
    ///
    /// Calls run strictly in sequence and the first failure aborts the rest;
    /// resources deleted before it stay deleted.
    #[tracing::instrument(skip(self), fields(host_id = %host_id))]
    pub async fn reset(&self, host_id: &UserId) -> Result<()> {
        if host_id.is_empty() {
            return Err(Error::InvalidInput("Host id must not be empty".to_string()));
        }
        let host = host_id.as_str();
        let sleeper = self.sleeper.as_ref();

        let ingresses = self
            .retry
            .run(sleeper, "list_ingress", || self.ingress.list_ingress(host))
            .await?;
        let rooms = self
            .retry
            .run(sleeper, "list_rooms", || self.rooms.list_rooms(vec![host.to_string()]))
            .await?;

        debug!(rooms = rooms.len(), ingresses = ingresses.len(), "Tearing down host resources");

        for room in &rooms {
            self.pacer.acquire().await;
            self.retry
                .run(sleeper, "delete_room", || self.rooms.delete_room(&room.name))
                .await?;
            debug!(room = %room.name, "Deleted room");
            self.pacer.settle(sleeper).await;
        }

        for item in &ingresses {
            if item.ingress_id.is_empty() {
                debug!(name = %item.name, "Skipping ingress without id");
                continue;
            }
            self.pacer.acquire().await;
            self.retry
                .run(sleeper, "delete_ingress", || {
                    self.ingress.delete_ingress(&item.ingress_id)
                })
                .await?;
            debug!(ingress_id = %item.ingress_id, "Deleted ingress");
            self.pacer.settle(sleeper).await;
        }

        Ok(())
    }

    /// Provision a fresh ingress for the signed-in caller
    pub async fn create(&self, input: IngressInput) -> Result<IngressInfo> {
        let identity = self
            .identity
            .current()
            .await
            .filter(Identity::is_complete)
            .ok_or(Error::IdentityUnavailable)?;

        self.create_for(&identity, input).await
    }

    /// Provision a fresh ingress for `identity`
    #[tracing::instrument(skip(self, identity), fields(host_id = %identity.id, input = %input))]
    pub async fn create_for(&self, identity: &Identity, input: IngressInput) -> Result<IngressInfo> {
        if !identity.is_complete() {
            return Err(Error::IdentityUnavailable);
        }

        let _guard = match &self.host_locks {
            Some(locks) => Some(locks.lock(identity.id.as_str()).await),
            None => None,
        };

        self.reset(&identity.id).await?;

        let options = build_options(identity, input);
        let info = self
            .retry
            .run(self.sleeper.as_ref(), "create_ingress", || {
                self.ingress.create_ingress(input, options.clone())
            })
            .await?;

        let credentials = IngressCredentials::from_info(&info)?;
        self.streams.update_ingress(&identity.id, &credentials).await?;
        // The new credentials are already stored, so report a stale page apart
        // from a failed provisioning
        self.pages
            .invalidate_path(&stream_keys_path(&identity.username))
            .await
            .map_err(|e| {
                warn!(ingress_id = %credentials.ingress_id, error = %e, "Page invalidation failed");
                Error::InvalidationFailed {
                    ingress_id: credentials.ingress_id.clone(),
                    source: Box::new(e),
                }
            })?;

        info!(
            ingress_id = %credentials.ingress_id,
            server_url = %credentials.server_url,
            "Ingress provisioned"
        );

        Ok(info)
    }

    /// Stored stream record of `user_id`, readable only by its owner
    pub async fn keys(&self, user_id: &UserId) -> Result<Stream> {
        let caller = self
            .identity
            .current()
            .await
            .filter(Identity::is_complete)
            .ok_or(Error::IdentityUnavailable)?;
        if caller.id != *user_id {
            return Err(Error::Unauthorized(format!(
                "{} may not read the stream of {user_id}",
                caller.id
            )));
        }

        self.streams
            .get_by_user_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Stream for user {user_id} not found")))
    }
}

/// Request options for `identity`'s ingress
///
/// WHIP input is transcoded by the provider and carries no encoding profiles;
/// RTMP input forwards a 1080p three-layer camera track and a stereo
/// microphone track.
#[must_use]
pub fn build_options(identity: &Identity, input: IngressInput) -> CreateIngressOptions {
    let base = CreateIngressOptions {
        name: identity.username.clone(),
        room_name: identity.id.as_str().to_string(),
        participant_identity: identity.id.as_str().to_string(),
        participant_name: identity.username.clone(),
        ..CreateIngressOptions::default()
    };

    if input.is_whip() {
        CreateIngressOptions {
            enable_transcoding: Some(true),
            ..base
        }
    } else {
        CreateIngressOptions {
            video: Some(IngressVideoOptions::hd_camera()),
            audio: Some(IngressAudioOptions::stereo_microphone()),
            ..base
        }
    }
}
