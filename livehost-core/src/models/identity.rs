use serde::{Deserialize, Serialize};

use super::id::UserId;

/// The authenticated caller as resolved by the identity collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }

    /// An identity is usable only when both the id and the display name are known
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.username.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_completeness() {
        assert!(Identity::new("u1", "alice").is_complete());
        assert!(!Identity::new("", "alice").is_complete());
        assert!(!Identity::new("u1", "").is_complete());
    }
}
