//! Ranking Placement Operations
//!
//! The placement set of a ranking is only ever replaced whole. Concurrent
//! writers overwrite each other; the last write wins.

use async_trait::async_trait;
use rusqlite::params;

use super::ranking_repo::{require_ranking, touch_ranking};
use crate::domain::{DomainError, DomainResult, Placement};

#[async_trait]
pub trait RankingPlacementOperations {
    /// Placements ordered by cell, then order index
    async fn list_placements(&self, ranking_id: &str) -> DomainResult<Vec<Placement>>;

    /// Replace every placement of the ranking. A card listed twice keeps its
    /// last entry. Returns the number of stored placements.
    async fn replace_placements(&self, ranking_id: &str, placements: &[Placement]) -> DomainResult<usize>;
}

#[async_trait]
impl RankingPlacementOperations for super::ranking_repo::RankingRepository {
    async fn list_placements(&self, ranking_id: &str) -> DomainResult<Vec<Placement>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        require_ranking(conn, ranking_id)?;
        let mut stmt = conn.prepare(
            "SELECT card_id, tier_id, column_id, order_index FROM placements
             WHERE ranking_id = ?
             ORDER BY tier_id NULLS FIRST, column_id NULLS FIRST, order_index, card_id",
        )?;
        let placements = stmt
            .query_map(params![ranking_id], |row| {
                Ok(Placement {
                    card_id: row.get(0)?,
                    tier_id: row.get(1)?,
                    column_id: row.get(2)?,
                    order_index: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(placements)
    }

    async fn replace_placements(&self, ranking_id: &str, placements: &[Placement]) -> DomainResult<usize> {
        for placement in placements {
            placement.validate()?;
        }

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        require_ranking(conn, ranking_id)?;
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM placements WHERE ranking_id = ?", params![ranking_id])?;
        for placement in placements {
            tx.execute(
                "INSERT OR REPLACE INTO placements (ranking_id, card_id, tier_id, column_id, order_index)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    ranking_id,
                    placement.card_id,
                    placement.tier_id,
                    placement.column_id,
                    placement.order_index
                ],
            )?;
        }
        let stored: i64 = tx.query_row(
            "SELECT COUNT(*) FROM placements WHERE ranking_id = ?",
            params![ranking_id],
            |row| row.get(0),
        )?;
        touch_ranking(&tx, ranking_id)?;
        tx.commit()?;

        log::info!("[RANKING] Replaced placements of {} ({} stored)", ranking_id, stored);
        Ok(stored as usize)
    }
}
