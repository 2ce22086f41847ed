//! # Session Repository
//!
//! Per-session key/value storage. The cart keeps its line-item mapping here.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  session_data                                                           │
//! │                                                                         │
//! │  session_id (TEXT) │ data_key (TEXT) │ payload (JSON) │ updated_at (s)  │
//! │  ──────────────────┼─────────────────┼────────────────┼──────────────── │
//! │  9b1c…             │ cart            │ [{"productId":1,"quantity":2}]   │
//! │                                                                         │
//! │  PRIMARY KEY (session_id, data_key)                                     │
//! │  save = UPSERT (whole mapping replaced, order preserved)                │
//! │  remove = DELETE (key gone, not an empty array)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use storefront_core::cart::LineItems;

/// Repository for session data.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Loads the line-item mapping stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(Some(items))` - Mapping found
    /// * `Ok(None)` - Nothing stored for this session/key
    pub async fn load_line_items(&self, session_id: &str, key: &str) -> DbResult<Option<LineItems>> {
        let payload: Option<String> = sqlx::query_scalar(
            r#"
            SELECT payload
            FROM session_data
            WHERE session_id = ?1 AND data_key = ?2
            "#,
        )
        .bind(session_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Replaces the mapping stored under `key`.
    pub async fn save_line_items(
        &self,
        session_id: &str,
        key: &str,
        items: &LineItems,
    ) -> DbResult<()> {
        let payload = serde_json::to_string(items)?;
        let now = Utc::now().timestamp();

        debug!(session_id = %session_id, key = %key, entries = items.len(), "Saving session data");

        sqlx::query(
            r#"
            INSERT INTO session_data (session_id, data_key, payload, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (session_id, data_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session_id)
        .bind(key)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes the entry stored under `key`.
    ///
    /// ## Returns
    /// Whether a row was deleted.
    pub async fn remove(&self, session_id: &str, key: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM session_data
            WHERE session_id = ?1 AND data_key = ?2
            "#,
        )
        .bind(session_id)
        .bind(key)
        .execute(&self.pool)
        .await?;

        debug!(session_id = %session_id, key = %key, "Removed session data");
        Ok(result.rows_affected() > 0)
    }

    /// Deletes every row not written within `max_idle`.
    ///
    /// ## Returns
    /// Number of deleted rows.
    pub async fn purge_idle(&self, max_idle: Duration) -> DbResult<u64> {
        let cutoff = (Utc::now() - max_idle).timestamp();

        let result = sqlx::query("DELETE FROM session_data WHERE updated_at < ?1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Number of stored session entries (diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM session_data")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
