//! Caller identity used to scope uploads to a per-user folder.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The signed-in user an upload is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Source of the current caller, usually backed by the auth session.
///
/// Returns `None` when nobody is signed in.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Option<Identity>;
}

/// Identity provider with a fixed answer, for jobs and tests that act on behalf
/// of a known user (or explicitly of nobody).
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<Identity>);

impl StaticIdentity {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self(Some(Identity::new(id)))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Option<Identity> {
        self.0.clone()
    }
}
