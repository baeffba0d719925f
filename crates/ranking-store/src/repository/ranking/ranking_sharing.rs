//! Ranking Sharing Operations
//!
//! View and edit tokens back the share links. Regenerating them revokes
//! every co-owner but keeps the overlay.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use super::ranking_repo::{require_ranking, touch_ranking};
use crate::domain::{mint_token, DomainError, DomainResult, ShareAccess, ShareTokens};

#[async_trait]
pub trait RankingSharingOperations {
    async fn regenerate_share_tokens(&self, ranking_id: &str) -> DomainResult<ShareTokens>;

    /// Returns false when the user already co-owns the ranking or owns it
    async fn add_co_owner(&self, ranking_id: &str, user_id: &str) -> DomainResult<bool>;

    async fn list_co_owners(&self, ranking_id: &str) -> DomainResult<Vec<String>>;

    /// Ranking id and granted access for a share token
    async fn find_by_token(&self, token: &str) -> DomainResult<Option<(String, ShareAccess)>>;
}

#[async_trait]
impl RankingSharingOperations for super::ranking_repo::RankingRepository {
    async fn regenerate_share_tokens(&self, ranking_id: &str) -> DomainResult<ShareTokens> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        require_ranking(conn, ranking_id)?;
        let tokens = ShareTokens {
            view_token: mint_token(ranking_id, "view"),
            edit_token: mint_token(ranking_id, "edit"),
        };

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE rankings SET view_token = ?1, edit_token = ?2 WHERE id = ?3",
            params![tokens.view_token, tokens.edit_token, ranking_id],
        )?;
        let revoked = tx.execute("DELETE FROM ranking_co_owners WHERE ranking_id = ?", params![ranking_id])?;
        touch_ranking(&tx, ranking_id)?;
        tx.commit()?;

        log::info!("[SHARE] New tokens for {}, {} co-owners revoked", ranking_id, revoked);
        Ok(tokens)
    }

    async fn add_co_owner(&self, ranking_id: &str, user_id: &str) -> DomainResult<bool> {
        if user_id.is_empty() {
            return Err(DomainError::InvalidInput("user id is empty".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let owner: Option<String> = conn
            .query_row("SELECT owner FROM rankings WHERE id = ?", params![ranking_id], |row| row.get(0))
            .optional()?;
        let owner = owner.ok_or_else(|| DomainError::NotFound(format!("ranking {}", ranking_id)))?;
        if owner == user_id {
            return Ok(false);
        }

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO ranking_co_owners (ranking_id, user_id, added_at) VALUES (?1, ?2, ?3)",
            params![ranking_id, user_id, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(inserted > 0)
    }

    async fn list_co_owners(&self, ranking_id: &str) -> DomainResult<Vec<String>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        require_ranking(conn, ranking_id)?;
        let mut stmt = conn.prepare(
            "SELECT user_id FROM ranking_co_owners WHERE ranking_id = ? ORDER BY added_at, user_id",
        )?;
        let users = stmt
            .query_map(params![ranking_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(users)
    }

    async fn find_by_token(&self, token: &str) -> DomainResult<Option<(String, ShareAccess)>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let found: Option<(String, String)> = conn
            .query_row(
                "SELECT id, edit_token FROM rankings WHERE view_token = ?1 OR edit_token = ?1",
                params![token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(found.map(|(id, edit_token)| {
            let access = if edit_token == token { ShareAccess::Edit } else { ShareAccess::View };
            (id, access)
        }))
    }
}
