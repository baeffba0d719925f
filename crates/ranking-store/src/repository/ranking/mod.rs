//! Ranking Repository Module
//!
//! This module provides ranking repository functionality split into specialized sub-modules:
//! - ranking_repo: Core CRUD operations and creation from a template
//! - ranking_placements: Full-replace placement storage
//! - ranking_overlay: Display-settings document storage
//! - ranking_sharing: Share tokens and co-owners

mod ranking_overlay;
mod ranking_placements;
mod ranking_repo;
mod ranking_sharing;

pub use ranking_repo::RankingRepository;

// Re-export all operation traits so they can be used by importing RankingRepository
pub use ranking_overlay::RankingOverlayOperations;
pub use ranking_placements::RankingPlacementOperations;
pub use ranking_sharing::RankingSharingOperations;
