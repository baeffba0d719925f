//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared connection slot; `None` until `init_db` has run
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone, Default)]
pub struct DbState {
    pub conn: SharedConnection,
}

impl DbState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Initialize database with path (`:memory:` for an in-memory database)
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = Connection::open(db_path).map_err(|e| format!("Failed to open db: {}", e))?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| format!("Failed to enable foreign keys: {}", e))?;

    // Run migrations
    run_migrations(&conn)?;

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS templates (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS template_tiers (
            id TEXT NOT NULL,
            template_id TEXT NOT NULL REFERENCES templates(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            order_index INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (template_id, id)
        );

        CREATE TABLE IF NOT EXISTS template_columns (
            id TEXT NOT NULL,
            template_id TEXT NOT NULL REFERENCES templates(id) ON DELETE CASCADE,
            name TEXT,
            color TEXT,
            order_index INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (template_id, id)
        );

        CREATE TABLE IF NOT EXISTS template_cards (
            id TEXT NOT NULL,
            template_id TEXT NOT NULL REFERENCES templates(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            image_url TEXT,
            description TEXT,
            order_index INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (template_id, id)
        );

        CREATE TABLE IF NOT EXISTS rankings (
            id TEXT PRIMARY KEY,
            template_id TEXT NOT NULL,
            owner TEXT NOT NULL,
            snapshot TEXT NOT NULL,
            overlay TEXT,
            view_token TEXT NOT NULL UNIQUE,
            edit_token TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS ranking_co_owners (
            ranking_id TEXT NOT NULL REFERENCES rankings(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            added_at INTEGER NOT NULL,
            PRIMARY KEY (ranking_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS placements (
            ranking_id TEXT NOT NULL REFERENCES rankings(id) ON DELETE CASCADE,
            card_id TEXT NOT NULL,
            tier_id TEXT,
            column_id TEXT,
            order_index INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (ranking_id, card_id)
        );

        CREATE INDEX IF NOT EXISTS idx_rankings_template ON rankings(template_id);
        CREATE INDEX IF NOT EXISTS idx_placements_cell ON placements(ranking_id, tier_id, column_id);",
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
