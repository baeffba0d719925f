//! Ranking Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Ranking CRUD operations.
//! Specialized operations are in separate modules:
//! - ranking_placements: Placement replacement
//! - ranking_overlay: Overlay document
//! - ranking_sharing: Tokens and co-owners

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{
    mint_id, mint_token, DomainError, DomainResult, Placement, Ranking, ShareTokens, Template,
};
use crate::repository::db::SharedConnection;
use crate::repository::traits::Repository;

const RANKING_COLUMNS: &str =
    "id, template_id, owner, snapshot, overlay, view_token, edit_token, created_at, updated_at";

/// SQLite implementation of Ranking repository
pub struct RankingRepository {
    pub(super) conn: SharedConnection,
}

impl RankingRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Snapshot the template and seed one unranked placement per card, in
    /// card order
    pub async fn create_from_template(&self, template: &Template, owner: &str) -> DomainResult<Ranking> {
        if owner.is_empty() {
            return Err(DomainError::InvalidInput("owner is empty".to_string()));
        }
        let id = mint_id(&[&template.id, owner]);
        let now = chrono::Utc::now().timestamp_millis();
        let ranking = Ranking {
            tokens: ShareTokens {
                view_token: mint_token(&id, "view"),
                edit_token: mint_token(&id, "edit"),
            },
            id,
            template_id: template.id.clone(),
            owner: owner.to_string(),
            snapshot: template.grid.clone(),
            overlay: None,
            created_at: now,
            updated_at: now,
        };

        let mut cards: Vec<_> = template.grid.cards.iter().collect();
        cards.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        let seeded: Vec<Placement> = cards
            .iter()
            .enumerate()
            .map(|(order, card)| Placement::unranked(card.id.clone(), order as i32))
            .collect();

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.unchecked_transaction()?;
        insert_ranking(&tx, &ranking)?;
        for placement in &seeded {
            tx.execute(
                "INSERT INTO placements (ranking_id, card_id, tier_id, column_id, order_index) VALUES (?1, ?2, NULL, NULL, ?3)",
                params![ranking.id, placement.card_id, placement.order_index],
            )?;
        }
        tx.commit()?;

        log::info!(
            "[RANKING] Created {} from template {} for {} ({} cards)",
            ranking.id,
            template.id,
            owner,
            seeded.len()
        );
        Ok(ranking)
    }
}

#[async_trait]
impl Repository<Ranking> for RankingRepository {
    async fn create(&self, entity: &Ranking) -> DomainResult<Ranking> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let exists: Option<String> = conn
            .query_row("SELECT id FROM rankings WHERE id = ?", params![entity.id], |row| row.get(0))
            .optional()?;
        if exists.is_some() {
            return Err(DomainError::Conflict(format!("ranking {} already exists", entity.id)));
        }
        insert_ranking(conn, entity)?;
        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Ranking>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;
        find_ranking(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Ranking>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM rankings ORDER BY created_at, id",
            RANKING_COLUMNS
        ))?;
        let mut rows = stmt.query([])?;

        let mut rankings = Vec::new();
        while let Some(row) = rows.next()? {
            rankings.push(row_to_ranking(row)?);
        }
        Ok(rankings)
    }

    async fn update(&self, entity: &Ranking) -> DomainResult<Ranking> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let snapshot = serde_json::to_string(&entity.snapshot)?;
        let overlay = entity.overlay.as_ref().map(serde_json::to_string).transpose()?;
        let now = chrono::Utc::now().timestamp_millis();
        let changed = conn.execute(
            "UPDATE rankings SET owner = ?1, snapshot = ?2, overlay = ?3, view_token = ?4, edit_token = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                entity.owner,
                snapshot,
                overlay,
                entity.tokens.view_token,
                entity.tokens.edit_token,
                now,
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("ranking {}", entity.id)));
        }

        let mut updated = entity.clone();
        updated.updated_at = now;
        Ok(updated)
    }

    async fn delete(&self, id: &String) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        conn.execute("DELETE FROM rankings WHERE id = ?", params![id])?;
        Ok(())
    }
}

fn insert_ranking(conn: &Connection, ranking: &Ranking) -> DomainResult<()> {
    let snapshot = serde_json::to_string(&ranking.snapshot)?;
    let overlay = ranking.overlay.as_ref().map(serde_json::to_string).transpose()?;
    conn.execute(
        &format!(
            "INSERT INTO rankings ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            RANKING_COLUMNS
        ),
        params![
            ranking.id,
            ranking.template_id,
            ranking.owner,
            snapshot,
            overlay,
            ranking.tokens.view_token,
            ranking.tokens.edit_token,
            ranking.created_at,
            ranking.updated_at
        ],
    )?;
    Ok(())
}

pub(super) fn find_ranking(conn: &Connection, id: &str) -> DomainResult<Option<Ranking>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM rankings WHERE id = ?", RANKING_COLUMNS))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_ranking(row)?)),
        None => Ok(None),
    }
}

/// NotFound unless the ranking exists
pub(super) fn require_ranking(conn: &Connection, id: &str) -> DomainResult<()> {
    let exists: Option<String> = conn
        .query_row("SELECT id FROM rankings WHERE id = ?", params![id], |row| row.get(0))
        .optional()?;
    exists
        .map(|_| ())
        .ok_or_else(|| DomainError::NotFound(format!("ranking {}", id)))
}

pub(super) fn touch_ranking(conn: &Connection, id: &str) -> DomainResult<()> {
    conn.execute(
        "UPDATE rankings SET updated_at = ? WHERE id = ?",
        params![chrono::Utc::now().timestamp_millis(), id],
    )?;
    Ok(())
}

/// Convert a database row to Ranking
fn row_to_ranking(row: &rusqlite::Row) -> DomainResult<Ranking> {
    let snapshot: String = row.get(3)?;
    let overlay: Option<String> = row.get(4)?;
    Ok(Ranking {
        id: row.get(0)?,
        template_id: row.get(1)?,
        owner: row.get(2)?,
        snapshot: serde_json::from_str(&snapshot)?,
        overlay: overlay.as_deref().map(serde_json::from_str).transpose()?,
        tokens: ShareTokens {
            view_token: row.get(5)?,
            edit_token: row.get(6)?,
        },
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
