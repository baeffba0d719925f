//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod grid;
mod placement;
mod ranking;
mod template;
mod token;

pub use entity::{DomainError, DomainResult, Entity};
pub use grid::{BaseSource, Card, Column, GridBase, Tier};
pub use placement::Placement;
pub use ranking::{EffectiveBase, Ranking, ShareAccess, ShareTokens};
pub use template::Template;
pub use token::{mint_id, mint_token};
