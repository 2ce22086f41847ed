//! SQLite-backed session store (adapter over `storefront_db`).

use async_trait::async_trait;
use chrono::Duration;
use tracing::info;

use storefront_core::cart::LineItems;
use storefront_db::Database;

use super::SessionId;
use crate::ports::{SessionError, SessionStore};

/// Session data persisted in the `session_data` table.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    db: Database,
}

impl SqliteSessionStore {
    pub fn new(db: Database) -> Self {
        SqliteSessionStore { db }
    }

    /// Deletes sessions untouched for more than `idle_days`.
    pub async fn purge_idle(&self, idle_days: u32) -> Result<u64, SessionError> {
        let purged = self
            .db
            .sessions()
            .purge_idle(Duration::days(i64::from(idle_days)))
            .await?;

        info!(purged, idle_days, "Purged idle sessions");
        Ok(purged)
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, session: &SessionId, key: &str) -> Result<LineItems, SessionError> {
        let items = self
            .db
            .sessions()
            .load_line_items(&session.to_string(), key)
            .await?;
        Ok(items.unwrap_or_default())
    }

    async fn set(
        &self,
        session: &SessionId,
        key: &str,
        items: &LineItems,
    ) -> Result<(), SessionError> {
        self.db
            .sessions()
            .save_line_items(&session.to_string(), key, items)
            .await?;
        Ok(())
    }

    async fn remove(&self, session: &SessionId, key: &str) -> Result<(), SessionError> {
        self.db.sessions().remove(&session.to_string(), key).await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.db.health_check().await
    }
}
