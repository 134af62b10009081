//! Caller identity resolution

use async_trait::async_trait;

use crate::models::Identity;

/// Resolves the authenticated caller
///
/// Token verification happens upstream; implementations only report who the
/// caller is, or `None` when nobody is signed in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn current(&self) -> Option<Identity>;
}

/// Resolver returning a fixed identity, used by the CLI
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    identity: Option<Identity>,
}

impl StaticIdentity {
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Nobody signed in
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn current(&self) -> Option<Identity> {
        self.identity.clone()
    }
}
