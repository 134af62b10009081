pub mod id;
pub mod identity;
pub mod ingress;
pub mod room;
pub mod stream;

pub use id::UserId;
pub use identity::Identity;
pub use ingress::{
    CreateIngressOptions, IngressAudioEncodingPreset, IngressAudioOptions, IngressCredentials,
    IngressInfo, IngressInput, IngressState, IngressVideoEncodingPreset, IngressVideoOptions,
    TrackSource,
};
pub use room::Room;
pub use stream::Stream;
