use async_trait::async_trait;
use dashmap::DashMap;

use crate::{SessionId, SessionStore};

/// Process-local session registry. State is lost on restart; the platform
/// simply gets a fresh id on the next contact.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, SessionId>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_or_create(&self, sender: &str) -> SessionId {
        // entry() serialises concurrent first contacts for the same sender.
        self.sessions
            .entry(sender.to_string())
            .or_insert_with(SessionId::generate)
            .value()
            .clone()
    }
}
