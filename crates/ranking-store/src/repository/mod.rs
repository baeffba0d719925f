//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod template_repo;
mod traits;
pub mod ranking;

#[cfg(test)]
mod tests;

pub use db::{init_db, DbState, SharedConnection};
pub use ranking::{
    RankingOverlayOperations, RankingPlacementOperations, RankingRepository,
    RankingSharingOperations,
};
pub use template_repo::TemplateRepository;
pub use traits::Repository;
