//! Display Settings
//!
//! The sparse overlay attached to a ranking. Every field is independently
//! optional; consumers go through the accessor methods so an absent list and
//! an empty list behave the same.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;
use crate::models::{Card, Column, Tier};

/// Name/color override for a tier
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TierOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Name/color override for a column
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Per-card field overrides
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CardOverride {
    /// Later fields win, absent fields keep what was there
    pub fn merge(&mut self, other: CardOverride) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.image_url.is_some() {
            self.image_url = other.image_url;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
    }
}

/// A tier added by a quick edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticTier {
    pub id: EntityId,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

impl SyntheticTier {
    pub fn to_tier(&self, fallback_order: i32) -> Tier {
        Tier {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
            order_index: self.order_index.unwrap_or(fallback_order),
        }
    }
}

/// A column added by a quick edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticColumn {
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

impl SyntheticColumn {
    pub fn to_column(&self, fallback_order: i32) -> Column {
        Column {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
            order_index: self.order_index.unwrap_or(fallback_order),
        }
    }
}

/// A card added by a quick edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticCard {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

impl SyntheticCard {
    pub fn to_card(&self, fallback_order: i32) -> Card {
        Card {
            id: self.id.clone(),
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            description: self.description.clone(),
            order_index: self.order_index.unwrap_or(fallback_order),
        }
    }
}

/// Sparse overlay document (`displaySettings` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_order: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_order: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_overrides: Option<BTreeMap<EntityId, TierOverride>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_overrides: Option<BTreeMap<EntityId, ColumnOverride>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_tiers: Option<Vec<SyntheticTier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_columns: Option<Vec<SyntheticColumn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_cards: Option<Vec<SyntheticCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_tier_ids: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_column_ids: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_card_ids: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_overrides: Option<BTreeMap<EntityId, CardOverride>>,
}

impl DisplaySettings {
    /// True when the overlay changes nothing
    pub fn is_empty(&self) -> bool {
        *self == DisplaySettings::default()
    }

    pub fn tier_order(&self) -> Option<&[EntityId]> {
        self.tier_order.as_deref()
    }

    pub fn column_order(&self) -> Option<&[EntityId]> {
        self.column_order.as_deref()
    }

    pub fn tier_override(&self, id: &EntityId) -> Option<&TierOverride> {
        self.tier_overrides.as_ref().and_then(|map| map.get(id))
    }

    pub fn column_override(&self, id: &EntityId) -> Option<&ColumnOverride> {
        self.column_overrides.as_ref().and_then(|map| map.get(id))
    }

    pub fn card_override(&self, id: &EntityId) -> Option<&CardOverride> {
        self.card_overrides.as_ref().and_then(|map| map.get(id))
    }

    pub fn additional_tiers(&self) -> &[SyntheticTier] {
        self.additional_tiers.as_deref().unwrap_or_default()
    }

    pub fn additional_columns(&self) -> &[SyntheticColumn] {
        self.additional_columns.as_deref().unwrap_or_default()
    }

    pub fn additional_cards(&self) -> &[SyntheticCard] {
        self.additional_cards.as_deref().unwrap_or_default()
    }

    pub fn hidden_tier_ids(&self) -> &[EntityId] {
        self.hidden_tier_ids.as_deref().unwrap_or_default()
    }

    pub fn hidden_column_ids(&self) -> &[EntityId] {
        self.hidden_column_ids.as_deref().unwrap_or_default()
    }

    pub fn removed_card_ids(&self) -> &[EntityId] {
        self.removed_card_ids.as_deref().unwrap_or_default()
    }

    pub fn is_tier_hidden(&self, id: &EntityId) -> bool {
        self.hidden_tier_ids().contains(id)
    }

    pub fn is_column_hidden(&self, id: &EntityId) -> bool {
        self.hidden_column_ids().contains(id)
    }

    pub fn is_card_removed(&self, id: &EntityId) -> bool {
        self.removed_card_ids().contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_read_as_empty() {
        let settings: DisplaySettings = serde_json::from_str("{}").unwrap();
        assert!(settings.is_empty());
        assert!(settings.hidden_tier_ids().is_empty());
        assert!(settings.tier_order().is_none());
        assert!(settings.card_override(&EntityId::from("c1")).is_none());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = r##"{
            "hiddenTierIds": ["A"],
            "additionalTiers": [{"id": "local_tier_1_a", "name": "X", "color": "#fff"}],
            "cardOverrides": {"c1": {"title": "Renamed", "imageUrl": "x.png"}}
        }"##;
        let settings: DisplaySettings = serde_json::from_str(json).unwrap();
        assert!(settings.is_tier_hidden(&EntityId::from("A")));
        assert!(settings.additional_tiers()[0].id.is_synthetic());
        assert_eq!(settings.additional_tiers()[0].order_index, None);
        let card = settings.card_override(&EntityId::from("c1")).unwrap();
        assert_eq!(card.title.as_deref(), Some("Renamed"));
        assert_eq!(card.description, None);

        // Absent fields stay absent when written back
        let out = serde_json::to_value(&settings).unwrap();
        assert!(out.get("tierOrder").is_none());
        assert!(out.get("hiddenTierIds").is_some());
    }

    #[test]
    fn test_card_override_merge_keeps_unset_fields() {
        let mut base = CardOverride {
            title: Some("A".to_string()),
            image_url: Some("a.png".to_string()),
            description: None,
        };
        base.merge(CardOverride {
            title: Some("B".to_string()),
            ..Default::default()
        });
        assert_eq!(base.title.as_deref(), Some("B"));
        assert_eq!(base.image_url.as_deref(), Some("a.png"));
    }
}
