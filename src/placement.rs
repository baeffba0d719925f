//! Placement Index
//!
//! Maps each card to its cell and its order inside that cell. Order is always
//! re-derived by sorting; the index is kept dense by renumbering a cell after
//! every structural change to it.

use std::collections::{BTreeMap, BTreeSet};

use crate::ids::EntityId;
use crate::models::{CellKey, Placement};
use crate::overlay::EffectiveGrid;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    cell: CellKey,
    order_index: i32,
}

/// Card → (cell, order) mapping for one ranking
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlacementIndex {
    slots: BTreeMap<EntityId, Slot>,
}

impl PlacementIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a wire list. A card listed twice keeps its last entry.
    pub fn from_placements(placements: impl IntoIterator<Item = Placement>) -> Self {
        let mut index = Self::new();
        for placement in placements {
            let cell = placement.cell();
            index.slots.insert(
                placement.card_id,
                Slot {
                    cell,
                    order_index: placement.order_index,
                },
            );
        }
        index
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, card_id: &EntityId) -> bool {
        self.slots.contains_key(card_id)
    }

    pub fn get(&self, card_id: &EntityId) -> Option<Placement> {
        self.slots
            .get(card_id)
            .map(|slot| Placement::new(card_id.clone(), &slot.cell, slot.order_index))
    }

    pub fn cell_of(&self, card_id: &EntityId) -> Option<&CellKey> {
        self.slots.get(card_id).map(|slot| &slot.cell)
    }

    /// Placements of one cell, ascending by order (card id breaks ties)
    pub fn placements_for_cell(&self, cell: &CellKey) -> Vec<Placement> {
        let mut placements: Vec<Placement> = self
            .slots
            .iter()
            .filter(|(_, slot)| &slot.cell == cell)
            .map(|(card_id, slot)| Placement::new(card_id.clone(), &slot.cell, slot.order_index))
            .collect();
        placements.sort_by(|a, b| {
            a.order_index
                .cmp(&b.order_index)
                .then_with(|| a.card_id.cmp(&b.card_id))
        });
        placements
    }

    /// Card ids of one cell in display order
    pub fn cards_in_cell(&self, cell: &CellKey) -> Vec<EntityId> {
        self.placements_for_cell(cell)
            .into_iter()
            .map(|placement| placement.card_id)
            .collect()
    }

    /// Replace a card's entry. Ids are not checked against any grid.
    pub fn set_placement(
        &mut self,
        card_id: EntityId,
        tier_id: Option<EntityId>,
        column_id: Option<EntityId>,
        order_index: i32,
    ) {
        let cell = CellKey::new(tier_id, column_id);
        self.slots.insert(card_id, Slot { cell, order_index });
    }

    pub fn remove(&mut self, card_id: &EntityId) -> Option<Placement> {
        self.slots
            .remove(card_id)
            .map(|slot| Placement::new(card_id.clone(), &slot.cell, slot.order_index))
    }

    /// Reassign 0..n-1 to the members of a cell, keeping their relative order
    pub fn renumber_cell(&mut self, cell: &CellKey) {
        let order = self.cards_in_cell(cell);
        self.write_cell_order(cell, &order);
    }

    /// Put `order` into `cell` with dense indices following the slice order
    pub fn write_cell_order(&mut self, cell: &CellKey, order: &[EntityId]) {
        for (pos, card_id) in order.iter().enumerate() {
            self.slots.insert(
                card_id.clone(),
                Slot {
                    cell: cell.clone(),
                    order_index: pos as i32,
                },
            );
        }
    }

    /// Add (or move) a card to the end of a cell, returning its order
    pub fn append_to_cell(&mut self, card_id: EntityId, cell: &CellKey) -> i32 {
        let next = self
            .slots
            .iter()
            .filter(|(id, slot)| &slot.cell == cell && *id != &card_id)
            .map(|(_, slot)| slot.order_index + 1)
            .max()
            .unwrap_or(0);
        self.slots.insert(
            card_id,
            Slot {
                cell: cell.clone(),
                order_index: next,
            },
        );
        next
    }

    pub fn occupied_cells(&self) -> BTreeSet<CellKey> {
        self.slots.values().map(|slot| slot.cell.clone()).collect()
    }

    /// Full list, grouped by cell and ordered within each cell
    pub fn to_placements(&self) -> Vec<Placement> {
        self.occupied_cells()
            .iter()
            .flat_map(|cell| self.placements_for_cell(cell))
            .collect()
    }

    /// Full list with placements to cards the grid cannot resolve stripped
    pub fn emitted_placements(&self, grid: &EffectiveGrid) -> Vec<Placement> {
        self.to_placements()
            .into_iter()
            .filter(|placement| grid.has_card(&placement.card_id))
            .collect()
    }

    /// Bring the index in line with a grid: placements in cells the grid no
    /// longer has go to the end of the unranked pool, and cards without a
    /// placement are appended to the pool. Placements of unknown cards are
    /// left alone. Returns whether anything changed.
    pub fn sync_with_grid(&mut self, grid: &EffectiveGrid) -> bool {
        let pool = CellKey::unranked();
        let mut touched: BTreeSet<CellKey> = BTreeSet::new();

        let mut orphaned: Vec<(CellKey, i32, EntityId)> = self
            .slots
            .iter()
            .filter(|(_, slot)| !grid.has_cell(&slot.cell))
            .map(|(card_id, slot)| (slot.cell.clone(), slot.order_index, card_id.clone()))
            .collect();
        orphaned.sort();

        for (cell, _, card_id) in orphaned {
            log::debug!("[PLACEMENT] {} left missing cell, moving to pool", card_id);
            touched.insert(cell);
            self.append_to_cell(card_id, &pool);
            touched.insert(pool.clone());
        }

        for card in grid.ordered_cards() {
            if !self.slots.contains_key(&card.id) {
                self.append_to_cell(card.id.clone(), &pool);
                touched.insert(pool.clone());
            }
        }

        for cell in &touched {
            self.renumber_cell(cell);
        }
        !touched.is_empty()
    }
}
