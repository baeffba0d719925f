//! Frontend Models
//!
//! Data structures matching the Persistence Service payloads.

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;
use crate::overlay::DisplaySettings;

/// A tier row (S, A, B, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub id: EntityId,
    pub name: String,
    pub color: String,
    pub order_index: i32,
}

/// A grid column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub order_index: i32,
}

/// A rankable card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub order_index: i32,
}

/// Coordinate of a grid cell. No tier means the unranked pool, and the pool
/// never carries a column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CellKey {
    tier_id: Option<EntityId>,
    column_id: Option<EntityId>,
}

impl CellKey {
    pub fn new(tier_id: Option<EntityId>, column_id: Option<EntityId>) -> Self {
        match tier_id {
            Some(tier_id) => Self {
                tier_id: Some(tier_id),
                column_id,
            },
            None => Self::unranked(),
        }
    }

    pub fn unranked() -> Self {
        Self::default()
    }

    pub fn ranked(tier_id: EntityId, column_id: Option<EntityId>) -> Self {
        Self::new(Some(tier_id), column_id)
    }

    pub fn is_unranked(&self) -> bool {
        self.tier_id.is_none()
    }

    pub fn tier_id(&self) -> Option<&EntityId> {
        self.tier_id.as_ref()
    }

    pub fn column_id(&self) -> Option<&EntityId> {
        self.column_id.as_ref()
    }
}

/// One card's position in a ranking (wire shape of the Placement Index)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub card_id: EntityId,
    pub tier_id: Option<EntityId>,
    pub column_id: Option<EntityId>,
    pub order_index: i32,
}

impl Placement {
    pub fn new(card_id: EntityId, cell: &CellKey, order_index: i32) -> Self {
        Self {
            card_id,
            tier_id: cell.tier_id().cloned(),
            column_id: cell.column_id().cloned(),
            order_index,
        }
    }

    pub fn cell(&self) -> CellKey {
        CellKey::new(self.tier_id.clone(), self.column_id.clone())
    }
}

/// The tiers, columns and cards a ranking is built on (live template or snapshot)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBase {
    #[serde(default)]
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Where the base came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseSource {
    #[default]
    Live,
    Snapshot,
}

/// Response of `get_effective_base`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveBase {
    #[serde(flatten)]
    pub base: GridBase,
    #[serde(default)]
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub overlay: Option<DisplaySettings>,
    #[serde(default)]
    pub source: BaseSource,
}
