//! Conversation session registry.
//!
//! Maps a platform sender id to the NLU session id used for that
//! conversation. Ids are created lazily on first contact and live for the
//! lifetime of the process; there is no eviction, so the registry grows with
//! the number of distinct senders seen since startup.

mod memory;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::MemorySessionStore;

/// Shared session store handle used across handlers.
pub type SharedSessionStore = Arc<dyn SessionStore>;

/// Opaque conversation-session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh time-ordered identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session id for `sender`, creating one on first contact.
    ///
    /// Exactly one id is ever assigned per sender; every later call with the
    /// same sender returns the identical value.
    async fn get_or_create(&self, sender: &str) -> SessionId;
}

/// Returns an in-memory session store wrapped in an [`Arc`].
pub fn shared_memory_store() -> SharedSessionStore {
    Arc::new(MemorySessionStore::new())
}
