pub mod host_lock;
pub mod identity;
pub mod ingress;

pub use host_lock::{HostGuard, HostLocks};
pub use identity::{IdentityResolver, StaticIdentity};
pub use ingress::{build_options, IngressProvisioner};

#[cfg(test)]
pub use identity::MockIdentityResolver;
