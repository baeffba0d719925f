//! Ranking Store
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - commands: Handlers behind the board's persistence calls

pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;

pub use commands::StoreState;
pub use config::{open_store, StoreConfig};
