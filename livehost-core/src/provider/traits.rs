// Remote service interfaces
//
// The provisioner only sees these traits; the HTTP clients implement them and
// tests substitute fakes.

use async_trait::async_trait;

use super::error::Result;
use crate::models::{CreateIngressOptions, IngressInfo, IngressInput, Room};

/// Room lifecycle on the media provider, keyed by room name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomServiceApi: Send + Sync {
    /// List rooms whose name is in `names`
    async fn list_rooms(&self, names: Vec<String>) -> Result<Vec<Room>>;

    async fn delete_room(&self, name: &str) -> Result<()>;
}

/// Ingress endpoint lifecycle on the media provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngressApi: Send + Sync {
    /// List ingress endpoints that publish into `room_name`
    async fn list_ingress(&self, room_name: &str) -> Result<Vec<IngressInfo>>;

    async fn delete_ingress(&self, ingress_id: &str) -> Result<IngressInfo>;

    async fn create_ingress(
        &self,
        input: IngressInput,
        options: CreateIngressOptions,
    ) -> Result<IngressInfo>;
}
