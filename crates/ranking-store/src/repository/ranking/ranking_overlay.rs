//! Ranking Overlay Operations
//!
//! The display-settings document is stored as opaque JSON. Only its shape
//! (an object) is checked here.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use super::ranking_repo::{require_ranking, touch_ranking};
use crate::domain::{DomainError, DomainResult};

#[async_trait]
pub trait RankingOverlayOperations {
    async fn get_overlay(&self, ranking_id: &str) -> DomainResult<Option<serde_json::Value>>;

    /// Replace the whole document. `null` clears it.
    async fn replace_overlay(&self, ranking_id: &str, overlay: &serde_json::Value) -> DomainResult<()>;

    async fn clear_overlay(&self, ranking_id: &str) -> DomainResult<()>;
}

#[async_trait]
impl RankingOverlayOperations for super::ranking_repo::RankingRepository {
    async fn get_overlay(&self, ranking_id: &str) -> DomainResult<Option<serde_json::Value>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let stored: Option<Option<String>> = conn
            .query_row("SELECT overlay FROM rankings WHERE id = ?", params![ranking_id], |row| row.get(0))
            .optional()?;
        let stored = stored.ok_or_else(|| DomainError::NotFound(format!("ranking {}", ranking_id)))?;
        Ok(stored.as_deref().map(serde_json::from_str).transpose()?)
    }

    async fn replace_overlay(&self, ranking_id: &str, overlay: &serde_json::Value) -> DomainResult<()> {
        let document = match overlay {
            serde_json::Value::Null => None,
            serde_json::Value::Object(_) => Some(serde_json::to_string(overlay)?),
            other => {
                return Err(DomainError::InvalidInput(format!(
                    "overlay must be an object, got {}",
                    other
                )))
            }
        };

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        require_ranking(conn, ranking_id)?;
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE rankings SET overlay = ? WHERE id = ?",
            params![document, ranking_id],
        )?;
        touch_ranking(&tx, ranking_id)?;
        tx.commit()?;

        log::info!("[RANKING] Replaced overlay of {}", ranking_id);
        Ok(())
    }

    async fn clear_overlay(&self, ranking_id: &str) -> DomainResult<()> {
        self.replace_overlay(ranking_id, &serde_json::Value::Null).await
    }
}
