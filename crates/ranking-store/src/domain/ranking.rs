//! Ranking Entity
//!
//! One user's filled grid for a template. The template grid is snapshotted
//! at creation so the ranking survives template deletion.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::grid::{BaseSource, GridBase};
use super::placement::Placement;

/// Capability tokens for share links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTokens {
    pub view_token: String,
    pub edit_token: String,
}

/// What a share token grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareAccess {
    View,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub id: String,
    pub template_id: String,
    pub owner: String,
    pub snapshot: GridBase,
    /// Opaque display-settings document written by co-editors
    pub overlay: Option<serde_json::Value>,
    pub tokens: ShareTokens,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Entity for Ranking {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Response of `get_effective_base`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveBase {
    #[serde(flatten)]
    pub base: GridBase,
    pub placements: Vec<Placement>,
    pub overlay: Option<serde_json::Value>,
    pub source: BaseSource,
}
