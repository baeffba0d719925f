//! Overlay Resolver
//!
//! Computes the effective grid from a base and an optional overlay. Pure: the
//! same inputs always produce the same grid, so it is re-derived on every
//! render instead of cached.

use std::collections::{BTreeMap, HashMap};

use crate::ids::EntityId;
use crate::models::{Card, CellKey, Column, GridBase, Tier};

use super::settings::DisplaySettings;

/// Sort offset for ids missing from an explicit order list, so they land
/// after every explicitly ordered id.
pub const MISSING_ORDER_OFFSET: i64 = 10_000;

/// Order index given to synthetic cards (plus their position)
pub const SYNTHETIC_CARD_ORDER_BASE: i32 = 100_000;

/// The grid the board renders and drags against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EffectiveGrid {
    pub tiers: Vec<Tier>,
    pub columns: Vec<Column>,
    pub cards: BTreeMap<EntityId, Card>,
}

impl EffectiveGrid {
    pub fn has_tier(&self, id: &EntityId) -> bool {
        self.tiers.iter().any(|tier| &tier.id == id)
    }

    pub fn has_column(&self, id: &EntityId) -> bool {
        self.columns.iter().any(|column| &column.id == id)
    }

    pub fn card(&self, id: &EntityId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn has_card(&self, id: &EntityId) -> bool {
        self.cards.contains_key(id)
    }

    /// Whether a cell exists in this grid. A grid without columns has one
    /// column-less cell per tier.
    pub fn has_cell(&self, cell: &CellKey) -> bool {
        let Some(tier_id) = cell.tier_id() else {
            return true;
        };
        if !self.has_tier(tier_id) {
            return false;
        }
        match cell.column_id() {
            Some(column_id) => self.has_column(column_id),
            None => self.columns.is_empty(),
        }
    }

    /// All ranked cells, tier-major
    pub fn cells(&self) -> Vec<CellKey> {
        let mut cells = Vec::new();
        for tier in &self.tiers {
            if self.columns.is_empty() {
                cells.push(CellKey::ranked(tier.id.clone(), None));
            } else {
                for column in &self.columns {
                    cells.push(CellKey::ranked(tier.id.clone(), Some(column.id.clone())));
                }
            }
        }
        cells
    }

    /// Cards in template order (synthetic additions last)
    pub fn ordered_cards(&self) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.values().collect();
        cards.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        cards
    }
}

/// Something with an id and an order position
trait Ordered {
    fn id(&self) -> &EntityId;
    fn order_index(&self) -> i32;
}

impl Ordered for Tier {
    fn id(&self) -> &EntityId {
        &self.id
    }
    fn order_index(&self) -> i32 {
        self.order_index
    }
}

impl Ordered for Column {
    fn id(&self) -> &EntityId {
        &self.id
    }
    fn order_index(&self) -> i32 {
        self.order_index
    }
}

/// Final ordering step shared by tiers and columns
fn sort_axis<T: Ordered>(items: &mut [T], explicit: Option<&[EntityId]>) {
    match explicit {
        Some(order) => {
            let rank: HashMap<&EntityId, i64> = order
                .iter()
                .enumerate()
                .map(|(pos, id)| (id, pos as i64))
                .collect();
            items.sort_by_key(|item| {
                rank.get(item.id())
                    .copied()
                    .unwrap_or(item.order_index() as i64 + MISSING_ORDER_OFFSET)
            });
        }
        None => items.sort_by_key(|item| item.order_index()),
    }
}

fn sorted_base<T: Ordered + Clone>(items: &[T]) -> Vec<T> {
    let mut items = items.to_vec();
    items.sort_by_key(|item| item.order_index());
    items
}

fn resolve_tiers(base: &[Tier], overlay: Option<&DisplaySettings>) -> Vec<Tier> {
    let mut tiers = sorted_base(base);
    let Some(overlay) = overlay else {
        return tiers;
    };

    tiers.retain(|tier| !overlay.is_tier_hidden(&tier.id));

    let base_len = base.len() as i32;
    tiers.extend(
        overlay
            .additional_tiers()
            .iter()
            .enumerate()
            .map(|(pos, extra)| extra.to_tier(base_len + pos as i32)),
    );

    for tier in tiers.iter_mut() {
        if let Some(ov) = overlay.tier_override(&tier.id) {
            if let Some(name) = &ov.name {
                tier.name = name.clone();
            }
            if let Some(color) = &ov.color {
                tier.color = color.clone();
            }
        }
    }

    sort_axis(&mut tiers, overlay.tier_order());
    tiers
}

fn resolve_columns(base: &[Column], overlay: Option<&DisplaySettings>) -> Vec<Column> {
    let mut columns = sorted_base(base);
    let Some(overlay) = overlay else {
        return columns;
    };

    columns.retain(|column| !overlay.is_column_hidden(&column.id));

    let base_len = base.len() as i32;
    columns.extend(
        overlay
            .additional_columns()
            .iter()
            .enumerate()
            .map(|(pos, extra)| extra.to_column(base_len + pos as i32)),
    );

    for column in columns.iter_mut() {
        if let Some(ov) = overlay.column_override(&column.id) {
            if let Some(name) = &ov.name {
                column.name = Some(name.clone());
            }
            if let Some(color) = &ov.color {
                column.color = Some(color.clone());
            }
        }
    }

    sort_axis(&mut columns, overlay.column_order());
    columns
}

fn resolve_cards(base: &[Card], overlay: Option<&DisplaySettings>) -> BTreeMap<EntityId, Card> {
    let mut cards: BTreeMap<EntityId, Card> =
        base.iter().map(|card| (card.id.clone(), card.clone())).collect();
    let Some(overlay) = overlay else {
        return cards;
    };

    for (pos, extra) in overlay.additional_cards().iter().enumerate() {
        let card = extra.to_card(SYNTHETIC_CARD_ORDER_BASE + pos as i32);
        cards.insert(card.id.clone(), card);
    }

    if let Some(overrides) = &overlay.card_overrides {
        for (id, ov) in overrides {
            if let Some(card) = cards.get_mut(id) {
                if let Some(title) = &ov.title {
                    card.title = title.clone();
                }
                if let Some(image_url) = &ov.image_url {
                    card.image_url = Some(image_url.clone());
                }
                if let Some(description) = &ov.description {
                    card.description = Some(description.clone());
                }
            }
        }
    }

    for id in overlay.removed_card_ids() {
        cards.remove(id);
    }

    cards
}

/// Resolve the effective grid for a base and an optional overlay
pub fn resolve_grid(base: &GridBase, overlay: Option<&DisplaySettings>) -> EffectiveGrid {
    EffectiveGrid {
        tiers: resolve_tiers(&base.tiers, overlay),
        columns: resolve_columns(&base.columns, overlay),
        cards: resolve_cards(&base.cards, overlay),
    }
}
