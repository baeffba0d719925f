//! Quick Edits
//!
//! Non-destructive edits a co-editor applies to a shared ranking. They only
//! ever touch the overlay and the ranking's own Placement Index; the base
//! (template or snapshot) is read-only here.

use crate::ids::EntityId;
use crate::models::{CellKey, GridBase};
use crate::placement::PlacementIndex;

use super::resolver::{resolve_grid, EffectiveGrid};
use super::settings::{
    CardOverride, ColumnOverride, DisplaySettings, SyntheticCard, SyntheticColumn, SyntheticTier,
    TierOverride,
};

/// Grid axis an ordering edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Tiers,
    Columns,
}

/// Applies quick edits to one ranking's overlay and placements
pub struct QuickEditor<'a> {
    base: &'a GridBase,
    settings: &'a mut DisplaySettings,
    placements: &'a mut PlacementIndex,
}

impl<'a> QuickEditor<'a> {
    pub fn new(
        base: &'a GridBase,
        settings: &'a mut DisplaySettings,
        placements: &'a mut PlacementIndex,
    ) -> Self {
        Self {
            base,
            settings,
            placements,
        }
    }

    /// Effective grid as of the edits applied so far
    pub fn grid(&self) -> EffectiveGrid {
        resolve_grid(self.base, Some(self.settings))
    }

    pub fn add_tier(&mut self, id: EntityId, name: String, color: String) {
        self.settings
            .additional_tiers
            .get_or_insert_with(Vec::new)
            .push(SyntheticTier {
                id,
                name,
                color,
                order_index: None,
            });
    }

    pub fn add_column(&mut self, id: EntityId, name: Option<String>, color: Option<String>) {
        self.settings
            .additional_columns
            .get_or_insert_with(Vec::new)
            .push(SyntheticColumn {
                id,
                name,
                color,
                order_index: None,
            });
        // Column-less cells stop existing once the first column appears
        let grid = self.grid();
        self.placements.sync_with_grid(&grid);
    }

    /// Add a card; it lands at the end of the unranked pool
    pub fn add_card(
        &mut self,
        id: EntityId,
        title: String,
        image_url: Option<String>,
        description: Option<String>,
    ) {
        self.settings
            .additional_cards
            .get_or_insert_with(Vec::new)
            .push(SyntheticCard {
                id: id.clone(),
                title,
                image_url,
                description,
                order_index: None,
            });
        self.placements.append_to_cell(id, &CellKey::unranked());
    }

    pub fn rename_tier(&mut self, id: &EntityId, name: String) -> bool {
        self.edit_tier(id, |ov| ov.name = Some(name))
    }

    pub fn recolor_tier(&mut self, id: &EntityId, color: String) -> bool {
        self.edit_tier(id, |ov| ov.color = Some(color))
    }

    pub fn rename_column(&mut self, id: &EntityId, name: String) -> bool {
        self.edit_column(id, |ov| ov.name = Some(name))
    }

    pub fn recolor_column(&mut self, id: &EntityId, color: String) -> bool {
        self.edit_column(id, |ov| ov.color = Some(color))
    }

    /// Merge field overrides into a card
    pub fn override_card(&mut self, id: &EntityId, fields: CardOverride) -> bool {
        if !self.grid().has_card(id) {
            return false;
        }
        self.settings
            .card_overrides
            .get_or_insert_with(Default::default)
            .entry(id.clone())
            .or_default()
            .merge(fields);
        true
    }

    /// Hide a tier. Its placements move to the unranked pool.
    pub fn hide_tier(&mut self, id: &EntityId) -> bool {
        if !self.grid().has_tier(id) {
            return false;
        }
        if id.is_synthetic() {
            if let Some(extra) = self.settings.additional_tiers.as_mut() {
                extra.retain(|tier| &tier.id != id);
            }
        } else {
            self.settings
                .hidden_tier_ids
                .get_or_insert_with(Vec::new)
                .push(id.clone());
        }
        if let Some(overrides) = self.settings.tier_overrides.as_mut() {
            overrides.remove(id);
        }
        if let Some(order) = self.settings.tier_order.as_mut() {
            order.retain(|other| other != id);
        }
        let grid = self.grid();
        self.placements.sync_with_grid(&grid);
        true
    }

    /// Hide a column. Its placements move to the unranked pool.
    pub fn hide_column(&mut self, id: &EntityId) -> bool {
        if !self.grid().has_column(id) {
            return false;
        }
        if id.is_synthetic() {
            if let Some(extra) = self.settings.additional_columns.as_mut() {
                extra.retain(|column| &column.id != id);
            }
        } else {
            self.settings
                .hidden_column_ids
                .get_or_insert_with(Vec::new)
                .push(id.clone());
        }
        if let Some(overrides) = self.settings.column_overrides.as_mut() {
            overrides.remove(id);
        }
        if let Some(order) = self.settings.column_order.as_mut() {
            order.retain(|other| other != id);
        }
        let grid = self.grid();
        self.placements.sync_with_grid(&grid);
        true
    }

    /// Remove a card from this ranking and drop its placement
    pub fn remove_card(&mut self, id: &EntityId) -> bool {
        if !self.grid().has_card(id) {
            return false;
        }
        if id.is_synthetic() {
            if let Some(extra) = self.settings.additional_cards.as_mut() {
                extra.retain(|card| &card.id != id);
            }
        } else {
            self.settings
                .removed_card_ids
                .get_or_insert_with(Vec::new)
                .push(id.clone());
        }
        if let Some(overrides) = self.settings.card_overrides.as_mut() {
            overrides.remove(id);
        }
        if let Some(removed) = self.placements.remove(id) {
            self.placements.renumber_cell(&removed.cell());
        }
        true
    }

    /// Move a tier or column to `to` in the effective order, writing the
    /// whole permutation to the overlay
    pub fn move_to(&mut self, axis: Axis, id: &EntityId, to: usize) -> bool {
        let grid = self.grid();
        let mut order: Vec<EntityId> = match axis {
            Axis::Tiers => grid.tiers.iter().map(|tier| tier.id.clone()).collect(),
            Axis::Columns => grid.columns.iter().map(|column| column.id.clone()).collect(),
        };
        let Some(from) = order.iter().position(|other| other == id) else {
            return false;
        };
        let to = to.min(order.len() - 1);
        if from == to {
            return false;
        }
        let moved = order.remove(from);
        order.insert(to, moved);
        match axis {
            Axis::Tiers => self.settings.tier_order = Some(order),
            Axis::Columns => self.settings.column_order = Some(order),
        }
        true
    }

    pub fn move_tier(&mut self, id: &EntityId, to: usize) -> bool {
        self.move_to(Axis::Tiers, id, to)
    }

    pub fn move_column(&mut self, id: &EntityId, to: usize) -> bool {
        self.move_to(Axis::Columns, id, to)
    }

    /// Owner reset: drop every overlay entry. Placements into cells that no
    /// longer exist go back to the pool.
    pub fn clear(&mut self) {
        *self.settings = DisplaySettings::default();
        let grid = self.grid();
        self.placements.sync_with_grid(&grid);
    }

    fn edit_tier(&mut self, id: &EntityId, apply: impl FnOnce(&mut TierOverride)) -> bool {
        if !self.grid().has_tier(id) {
            return false;
        }
        let overrides = self.settings.tier_overrides.get_or_insert_with(Default::default);
        apply(overrides.entry(id.clone()).or_default());
        true
    }

    fn edit_column(&mut self, id: &EntityId, apply: impl FnOnce(&mut ColumnOverride)) -> bool {
        if !self.grid().has_column(id) {
            return false;
        }
        let overrides = self.settings.column_overrides.get_or_insert_with(Default::default);
        apply(overrides.entry(id.clone()).or_default());
        true
    }
}
