//! Drag Reconciliation Engine
//!
//! One drag gesture at a time: Idle → Dragging → Idle. While dragging, the
//! engine keeps a preview copy of the Placement Index that follows the
//! pointer inside the dragged card's cell. The drop is always computed
//! against the authoritative index, through the same `apply_move`.

use std::mem;

use crate::ids::EntityId;
use crate::models::CellKey;
use crate::overlay::{Axis, EffectiveGrid};
use crate::placement::PlacementIndex;

use super::apply::{apply_move, CardMove, MoveEffect, MoveMode};
use super::handle::DragHandle;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSubject {
    Card(EntityId),
    Tier(EntityId),
    Column(EntityId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    subject: DragSubject,
    over: Option<DragHandle>,
    preview: Option<PlacementIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Result of ending a gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released outside any valid target, or cancelled
    Cancelled,
    /// Target not reachable in the current mode
    Rejected,
    /// Valid target, nothing to reorder
    Unchanged,
    /// New Placement Index to emit in full
    Placements {
        index: PlacementIndex,
        effect: MoveEffect,
    },
    /// Tier or column order change, applied to the overlay
    Reorder { axis: Axis, id: EntityId, to: usize },
}

/// Mode switches for a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragOptions {
    /// Only the unranked pool accepts drops (anonymous preview of a template)
    pub cells_blocked: bool,
    /// Tier and column rows can be reordered into the overlay
    pub overlay_editing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DragEngine {
    state: DragState,
    options: DragOptions,
}

impl DragEngine {
    pub fn new(options: DragOptions) -> Self {
        Self {
            state: DragState::Idle,
            options,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn active(&self) -> Option<&DragSubject> {
        match &self.state {
            DragState::Dragging(active) => Some(&active.subject),
            DragState::Idle => None,
        }
    }

    pub fn over(&self) -> Option<&DragHandle> {
        match &self.state {
            DragState::Dragging(active) => active.over.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Placement Index to render while a card is being dragged
    pub fn preview(&self) -> Option<&PlacementIndex> {
        match &self.state {
            DragState::Dragging(active) => active.preview.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Begin a gesture. Returns false when the handle cannot be dragged.
    pub fn start(&mut self, handle: &DragHandle, index: &PlacementIndex, grid: &EffectiveGrid) -> bool {
        if self.is_dragging() {
            return false;
        }
        let (subject, preview) = match handle {
            DragHandle::Card(id) if grid.has_card(id) && index.contains(id) => {
                (DragSubject::Card(id.clone()), Some(index.clone()))
            }
            DragHandle::Tier(id) if self.options.overlay_editing && grid.has_tier(id) => {
                (DragSubject::Tier(id.clone()), None)
            }
            DragHandle::Column(id) if self.options.overlay_editing && grid.has_column(id) => {
                (DragSubject::Column(id.clone()), None)
            }
            _ => return false,
        };
        self.state = DragState::Dragging(ActiveDrag {
            subject,
            over: None,
            preview,
        });
        true
    }

    /// Track the current drop candidate. Returns true when the preview moved.
    pub fn drag_over(&mut self, over: Option<DragHandle>, grid: &EffectiveGrid) -> bool {
        let DragState::Dragging(active) = &mut self.state else {
            return false;
        };
        active.over = over;

        let (DragSubject::Card(card), Some(DragHandle::Card(target)), Some(preview)) =
            (&active.subject, &active.over, active.preview.as_mut())
        else {
            return false;
        };
        if card == target || !grid.has_card(target) {
            return false;
        }
        let Some(target_cell) = preview.cell_of(target).cloned() else {
            return false;
        };
        let mv = CardMove {
            card: card.clone(),
            target: target_cell,
            onto: Some(target.clone()),
        };
        apply_move(preview, &mv, MoveMode::Preview) != MoveEffect::Unchanged
    }

    /// Abort the gesture (Escape, pointer lost)
    pub fn cancel(&mut self) -> DropOutcome {
        self.state = DragState::Idle;
        DropOutcome::Cancelled
    }

    /// End the gesture on the last tracked target
    pub fn drop(&mut self, index: &PlacementIndex, grid: &EffectiveGrid) -> DropOutcome {
        let DragState::Dragging(active) = mem::take(&mut self.state) else {
            return DropOutcome::Cancelled;
        };
        let Some(over) = active.over else {
            return DropOutcome::Cancelled;
        };

        match active.subject {
            DragSubject::Card(card) => self.drop_card(card, &over, index, grid),
            DragSubject::Tier(id) => match over {
                DragHandle::Tier(target) => reorder(Axis::Tiers, id, &target, grid),
                _ => DropOutcome::Cancelled,
            },
            DragSubject::Column(id) => match over {
                DragHandle::Column(target) => reorder(Axis::Columns, id, &target, grid),
                _ => DropOutcome::Cancelled,
            },
        }
    }

    fn drop_card(
        &self,
        card: EntityId,
        over: &DragHandle,
        index: &PlacementIndex,
        grid: &EffectiveGrid,
    ) -> DropOutcome {
        if matches!(over, DragHandle::Tier(_) | DragHandle::Column(_)) {
            return DropOutcome::Cancelled;
        }
        if !grid.has_card(&card) {
            return DropOutcome::Unchanged;
        }
        let Some(target) = resolve_target_cell(over, index, grid) else {
            return DropOutcome::Unchanged;
        };
        if self.options.cells_blocked && !target.is_unranked() {
            log::warn!("[DND] Drop of {} on a ranked cell rejected (cells blocked)", card);
            return DropOutcome::Rejected;
        }

        let onto = match over {
            DragHandle::Card(target_card) if *target_card != card => Some(target_card.clone()),
            _ => None,
        };
        let mv = CardMove { card, target, onto };
        let mut next = index.clone();
        match apply_move(&mut next, &mv, MoveMode::Commit) {
            MoveEffect::Unchanged => DropOutcome::Unchanged,
            effect => {
                log::debug!("[DND] {} {:?} into {:?}", mv.card, effect, mv.target);
                DropOutcome::Placements { index: next, effect }
            }
        }
    }
}

/// Cell a drop handle points at: the pool, a cell of the grid, or the cell
/// currently holding the card under the pointer
pub fn resolve_target_cell(
    handle: &DragHandle,
    index: &PlacementIndex,
    grid: &EffectiveGrid,
) -> Option<CellKey> {
    match handle {
        DragHandle::Unranked => Some(CellKey::unranked()),
        DragHandle::Cell(cell) => grid.has_cell(cell).then(|| cell.clone()),
        DragHandle::Card(card) => {
            if !grid.has_card(card) {
                return None;
            }
            index.cell_of(card).filter(|cell| grid.has_cell(cell)).cloned()
        }
        DragHandle::Tier(_) | DragHandle::Column(_) => None,
    }
}

fn reorder(axis: Axis, id: EntityId, target: &EntityId, grid: &EffectiveGrid) -> DropOutcome {
    let position = match axis {
        Axis::Tiers => grid.tiers.iter().position(|tier| &tier.id == target),
        Axis::Columns => grid.columns.iter().position(|column| &column.id == target),
    };
    match position {
        Some(_) if &id == target => DropOutcome::Unchanged,
        Some(to) => DropOutcome::Reorder { axis, id, to },
        None => DropOutcome::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Column, GridBase, Tier};
    use crate::overlay::resolve_grid;

    fn id(raw: &str) -> EntityId {
        EntityId::from(raw)
    }

    fn grid() -> EffectiveGrid {
        let base = GridBase {
            tiers: ["S", "A"]
                .iter()
                .enumerate()
                .map(|(pos, raw)| Tier {
                    id: id(raw),
                    name: raw.to_string(),
                    color: "#888".to_string(),
                    order_index: pos as i32,
                })
                .collect(),
            columns: ["col1", "col2"]
                .iter()
                .enumerate()
                .map(|(pos, raw)| Column {
                    id: id(raw),
                    name: Some(raw.to_string()),
                    color: None,
                    order_index: pos as i32,
                })
                .collect(),
            cards: ["c1", "c2", "c3", "p1", "p2"]
                .iter()
                .enumerate()
                .map(|(pos, raw)| Card {
                    id: id(raw),
                    title: raw.to_string(),
                    image_url: None,
                    description: None,
                    order_index: pos as i32,
                })
                .collect(),
        };
        resolve_grid(&base, None)
    }

    fn s_col1() -> CellKey {
        CellKey::ranked(id("S"), Some(id("col1")))
    }

    fn a_col2() -> CellKey {
        CellKey::ranked(id("A"), Some(id("col2")))
    }

    fn index() -> PlacementIndex {
        let mut index = PlacementIndex::new();
        index.write_cell_order(&s_col1(), &[id("c1"), id("c2"), id("c3")]);
        index.write_cell_order(&CellKey::unranked(), &[id("p1"), id("p2")]);
        index
    }

    fn drag(engine: &mut DragEngine, card: &str, over: DragHandle, index: &PlacementIndex) -> DropOutcome {
        let grid = grid();
        assert!(engine.start(&DragHandle::Card(id(card)), index, &grid));
        engine.drag_over(Some(over), &grid);
        engine.drop(index, &grid)
    }

    #[test]
    fn test_drop_onto_card_in_same_cell() {
        let mut engine = DragEngine::default();
        let index = index();
        let outcome = drag(&mut engine, "c3", DragHandle::Card(id("c1")), &index);
        let DropOutcome::Placements { index: next, effect } = outcome else {
            panic!("expected placements, got {:?}", outcome);
        };
        assert_eq!(effect, MoveEffect::Reordered);
        assert_eq!(next.cards_in_cell(&s_col1()), vec![id("c3"), id("c1"), id("c2")]);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_drop_on_own_cell_is_noop() {
        let mut engine = DragEngine::default();
        let index = index();
        let outcome = drag(&mut engine, "c2", DragHandle::for_cell(&s_col1()), &index);
        assert_eq!(outcome, DropOutcome::Unchanged);
    }

    #[test]
    fn test_drop_into_empty_cell() {
        let mut engine = DragEngine::default();
        let index = index();
        let outcome = drag(&mut engine, "c1", DragHandle::for_cell(&a_col2()), &index);
        let DropOutcome::Placements { index: next, .. } = outcome else {
            panic!("expected placements");
        };
        assert_eq!(next.cards_in_cell(&s_col1()), vec![id("c2"), id("c3")]);
        let moved = next.placements_for_cell(&a_col2());
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].order_index, 0);
    }

    #[test]
    fn test_blocked_cells_reject_and_leave_index_untouched() {
        let mut engine = DragEngine::new(DragOptions {
            cells_blocked: true,
            overlay_editing: false,
        });
        let index = index();
        let before = index.clone();
        let outcome = drag(&mut engine, "p1", DragHandle::for_cell(&s_col1()), &index);
        assert_eq!(outcome, DropOutcome::Rejected);
        assert_eq!(index, before);

        // Dropping on a card that lives in a ranked cell is rejected too
        let outcome = drag(&mut engine, "p1", DragHandle::Card(id("c1")), &index);
        assert_eq!(outcome, DropOutcome::Rejected);
    }

    #[test]
    fn test_blocked_cells_still_allow_pool_reorder() {
        let mut engine = DragEngine::new(DragOptions {
            cells_blocked: true,
            overlay_editing: false,
        });
        let index = index();
        let outcome = drag(&mut engine, "p2", DragHandle::Card(id("p1")), &index);
        let DropOutcome::Placements { index: next, .. } = outcome else {
            panic!("expected placements");
        };
        assert_eq!(next.cards_in_cell(&CellKey::unranked()), vec![id("p2"), id("p1")]);
    }

    #[test]
    fn test_preview_follows_pointer_inside_cell_only() {
        let mut engine = DragEngine::default();
        let index = index();
        let grid = grid();
        engine.start(&DragHandle::Card(id("c3")), &index, &grid);

        assert!(engine.drag_over(Some(DragHandle::Card(id("c1"))), &grid));
        let preview = engine.preview().unwrap();
        assert_eq!(preview.cards_in_cell(&s_col1()), vec![id("c3"), id("c1"), id("c2")]);

        // Hovering a card of another cell does not relocate the preview
        assert!(!engine.drag_over(Some(DragHandle::Card(id("p1"))), &grid));
        assert_eq!(engine.preview().unwrap().cell_of(&id("c3")), Some(&s_col1()));

        // Pool reorder preview is discarded when the drop leaves the pool
        let outcome = engine.drop(&index, &grid);
        let DropOutcome::Placements { index: next, effect } = outcome else {
            panic!("expected placements");
        };
        assert_eq!(effect, MoveEffect::Relocated);
        assert_eq!(next.cards_in_cell(&CellKey::unranked()), vec![id("c3"), id("p1"), id("p2")]);
        assert_eq!(next.cards_in_cell(&s_col1()), vec![id("c1"), id("c2")]);
    }

    #[test]
    fn test_release_outside_and_cancel() {
        let mut engine = DragEngine::default();
        let index = index();
        let grid = grid();

        engine.start(&DragHandle::Card(id("c1")), &index, &grid);
        assert_eq!(engine.drop(&index, &grid), DropOutcome::Cancelled);

        engine.start(&DragHandle::Card(id("c1")), &index, &grid);
        engine.drag_over(Some(DragHandle::Unranked), &grid);
        assert_eq!(engine.cancel(), DropOutcome::Cancelled);
        assert!(!engine.is_dragging());
        assert!(engine.preview().is_none());
    }

    #[test]
    fn test_unknown_cards_cannot_be_dragged() {
        let mut engine = DragEngine::default();
        let grid = grid();
        assert!(!engine.start(&DragHandle::Card(id("ghost")), &index(), &grid));
        assert!(!engine.start(&DragHandle::Unranked, &index(), &grid));
    }

    #[test]
    fn test_tier_reorder_requires_overlay_editing() {
        let grid = grid();
        let index = index();

        let mut engine = DragEngine::default();
        assert!(!engine.start(&DragHandle::Tier(id("A")), &index, &grid));

        let mut engine = DragEngine::new(DragOptions {
            cells_blocked: false,
            overlay_editing: true,
        });
        assert!(engine.start(&DragHandle::Tier(id("A")), &index, &grid));
        engine.drag_over(Some(DragHandle::Tier(id("S"))), &grid);
        assert_eq!(
            engine.drop(&index, &grid),
            DropOutcome::Reorder {
                axis: Axis::Tiers,
                id: id("A"),
                to: 0
            }
        );
    }

    #[test]
    fn test_resolve_target_cell() {
        let grid = grid();
        let index = index();
        assert_eq!(
            resolve_target_cell(&DragHandle::Card(id("c2")), &index, &grid),
            Some(s_col1())
        );
        assert_eq!(
            resolve_target_cell(&DragHandle::Unranked, &index, &grid),
            Some(CellKey::unranked())
        );
        let missing = CellKey::ranked(id("Z"), Some(id("col1")));
        assert_eq!(resolve_target_cell(&DragHandle::Cell(missing), &index, &grid), None);
    }
}
