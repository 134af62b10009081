// Media provider clients
//
// Two thin clients over one Twirp transport:
//
//   RoomServiceClient ──┐
//                       ├── TwirpClient ── TokenSigner (HS256 admin tokens)
//   IngressClient ──────┘
//
// The provisioner depends on `RoomServiceApi` / `IngressApi`, not on the
// concrete clients.

pub mod error;
pub mod ingress_client;
pub mod room_service;
pub mod token;
pub mod traits;
pub mod twirp;

pub use error::ProviderError;
pub use ingress_client::IngressClient;
pub use room_service::RoomServiceClient;
pub use token::{TokenSigner, VideoGrant};
pub use traits::{IngressApi, RoomServiceApi};
pub use twirp::TwirpClient;

#[cfg(test)]
pub use traits::{MockIngressApi, MockRoomServiceApi};
