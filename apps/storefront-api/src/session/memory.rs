//! Process-local session store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use storefront_core::cart::LineItems;

use super::SessionId;
use crate::ports::{SessionError, SessionStore};

/// Session data held in memory. Lost on restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<(SessionId, String), LineItems>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored `(session, key)` entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session: &SessionId, key: &str) -> Result<LineItems, SessionError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&(*session, key.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn set(
        &self,
        session: &SessionId,
        key: &str,
        items: &LineItems,
    ) -> Result<(), SessionError> {
        self.entries
            .write()
            .await
            .insert((*session, key.to_string()), items.clone());
        Ok(())
    }

    async fn remove(&self, session: &SessionId, key: &str) -> Result<(), SessionError> {
        self.entries
            .write()
            .await
            .remove(&(*session, key.to_string()));
        Ok(())
    }
}
