//! Template Repository
//!
//! SQLite-backed storage of template grids: one row per template plus its
//! tiers, columns and cards.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::db::SharedConnection;
use super::traits::Repository;
use crate::domain::{Card, Column, DomainError, DomainResult, GridBase, Template, Tier};

/// SQLite implementation of Template repository
pub struct TemplateRepository {
    conn: SharedConnection,
}

impl TemplateRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Insert or fully replace a template
    pub async fn save(&self, template: &Template) -> DomainResult<Template> {
        template.validate()?;
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO templates (id, name, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, updated_at = excluded.updated_at",
            params![template.id, template.name, chrono::Utc::now().timestamp_millis()],
        )?;
        write_grid(&tx, &template.id, &template.grid)?;
        tx.commit()?;

        log::info!(
            "[TEMPLATE] Saved {} ({} tiers, {} columns, {} cards)",
            template.id,
            template.grid.tiers.len(),
            template.grid.columns.len(),
            template.grid.cards.len()
        );
        Ok(template.clone())
    }
}

#[async_trait]
impl Repository<Template> for TemplateRepository {
    async fn create(&self, entity: &Template) -> DomainResult<Template> {
        if self.find_by_id(&entity.id).await?.is_some() {
            return Err(DomainError::Conflict(format!("template {} already exists", entity.id)));
        }
        self.save(entity).await
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Template>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let name: Option<String> = conn
            .query_row("SELECT name FROM templates WHERE id = ?", params![id], |row| row.get(0))
            .optional()?;

        match name {
            Some(name) => Ok(Some(Template::new(id.clone(), name, load_grid(conn, id)?))),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<Template>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let mut stmt = conn.prepare("SELECT id, name FROM templates ORDER BY name, id")?;
        let heads = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut templates = Vec::with_capacity(heads.len());
        for (id, name) in heads {
            let grid = load_grid(conn, &id)?;
            templates.push(Template::new(id, name, grid));
        }
        Ok(templates)
    }

    async fn update(&self, entity: &Template) -> DomainResult<Template> {
        if self.find_by_id(&entity.id).await?.is_none() {
            return Err(DomainError::NotFound(format!("template {}", entity.id)));
        }
        self.save(entity).await
    }

    async fn delete(&self, id: &String) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        // Rankings keep their snapshot
        conn.execute("DELETE FROM templates WHERE id = ?", params![id])?;
        Ok(())
    }
}

fn write_grid(conn: &Connection, template_id: &str, grid: &GridBase) -> DomainResult<()> {
    for table in ["template_tiers", "template_columns", "template_cards"] {
        conn.execute(
            &format!("DELETE FROM {} WHERE template_id = ?", table),
            params![template_id],
        )?;
    }

    for tier in &grid.tiers {
        conn.execute(
            "INSERT INTO template_tiers (id, template_id, name, color, order_index) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![tier.id, template_id, tier.name, tier.color, tier.order_index],
        )?;
    }
    for column in &grid.columns {
        conn.execute(
            "INSERT INTO template_columns (id, template_id, name, color, order_index) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![column.id, template_id, column.name, column.color, column.order_index],
        )?;
    }
    for card in &grid.cards {
        conn.execute(
            "INSERT INTO template_cards (id, template_id, title, image_url, description, order_index)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![card.id, template_id, card.title, card.image_url, card.description, card.order_index],
        )?;
    }
    Ok(())
}

fn load_grid(conn: &Connection, template_id: &str) -> DomainResult<GridBase> {
    let mut stmt = conn.prepare(
        "SELECT id, name, color, order_index FROM template_tiers WHERE template_id = ? ORDER BY order_index, id",
    )?;
    let tiers = stmt
        .query_map(params![template_id], |row| {
            Ok(Tier {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
                order_index: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT id, name, color, order_index FROM template_columns WHERE template_id = ? ORDER BY order_index, id",
    )?;
    let columns = stmt
        .query_map(params![template_id], |row| {
            Ok(Column {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
                order_index: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT id, title, image_url, description, order_index FROM template_cards
         WHERE template_id = ? ORDER BY order_index, id",
    )?;
    let cards = stmt
        .query_map(params![template_id], |row| {
            Ok(Card {
                id: row.get(0)?,
                title: row.get(1)?,
                image_url: row.get(2)?,
                description: row.get(3)?,
                order_index: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GridBase { tiers, columns, cards })
}
