//! UI Components
//!
//! Board rendering on top of the engine modules.

mod board;
mod card_tile;
mod grid_cell;
mod quick_edit_bar;
mod save_status;
mod unranked_pool;

pub use board::Board;
pub use card_tile::CardTile;
pub use grid_cell::GridCell;
pub use quick_edit_bar::QuickEditBar;
pub use save_status::SaveStatusPill;
pub use unranked_pool::UnrankedPool;
