//! Card Moves
//!
//! The single move routine behind both the live drag preview and the
//! committed drop.

use crate::ids::EntityId;
use crate::models::CellKey;
use crate::placement::PlacementIndex;

/// Whether a move is a transient preview or the authoritative drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Only reorders inside the card's current cell
    Preview,
    /// Reorders and relocates
    Commit,
}

/// A card going to a cell, optionally onto another card in that cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMove {
    pub card: EntityId,
    pub target: CellKey,
    /// Card the drop landed on, if any
    pub onto: Option<EntityId>,
}

/// What a move did to the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEffect {
    Unchanged,
    Reordered,
    Relocated,
}

/// Apply a move in place.
///
/// Same cell: the card is spliced to the position of `onto` (no `onto` is a
/// no-op). Different cell (commit only): removed from the source, inserted
/// before `onto` or appended, and both cells renumbered.
pub fn apply_move(index: &mut PlacementIndex, mv: &CardMove, mode: MoveMode) -> MoveEffect {
    let Some(source) = index.cell_of(&mv.card).cloned() else {
        return MoveEffect::Unchanged;
    };

    if source == mv.target {
        let Some(onto) = mv.onto.as_ref().filter(|onto| **onto != mv.card) else {
            return MoveEffect::Unchanged;
        };
        let mut order = index.cards_in_cell(&source);
        let from = order.iter().position(|id| *id == mv.card);
        let to = order.iter().position(|id| id == onto);
        let (Some(from), Some(to)) = (from, to) else {
            return MoveEffect::Unchanged;
        };
        let moved = order.remove(from);
        order.insert(to, moved);
        index.write_cell_order(&source, &order);
        return MoveEffect::Reordered;
    }

    if mode == MoveMode::Preview {
        return MoveEffect::Unchanged;
    }

    let mut remaining = index.cards_in_cell(&source);
    remaining.retain(|id| *id != mv.card);

    let mut order = index.cards_in_cell(&mv.target);
    let at = mv
        .onto
        .as_ref()
        .and_then(|onto| order.iter().position(|id| id == onto))
        .unwrap_or(order.len());
    order.insert(at, mv.card.clone());

    // Both writes are dense, which renumbers the two cells
    index.write_cell_order(&mv.target, &order);
    index.write_cell_order(&source, &remaining);
    MoveEffect::Relocated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> EntityId {
        EntityId::from(raw)
    }

    fn s_col1() -> CellKey {
        CellKey::ranked(id("S"), Some(id("col1")))
    }

    fn a_col2() -> CellKey {
        CellKey::ranked(id("A"), Some(id("col2")))
    }

    fn seeded() -> PlacementIndex {
        let mut index = PlacementIndex::new();
        index.write_cell_order(&s_col1(), &[id("c1"), id("c2"), id("c3")]);
        index
    }

    fn orders(index: &PlacementIndex, cell: &CellKey) -> Vec<(String, i32)> {
        index
            .placements_for_cell(cell)
            .into_iter()
            .map(|p| (p.card_id.to_string(), p.order_index))
            .collect()
    }

    #[test]
    fn test_drag_last_onto_first() {
        let mut index = seeded();
        let mv = CardMove {
            card: id("c3"),
            target: s_col1(),
            onto: Some(id("c1")),
        };
        assert_eq!(apply_move(&mut index, &mv, MoveMode::Commit), MoveEffect::Reordered);
        assert_eq!(
            orders(&index, &s_col1()),
            vec![("c3".to_string(), 0), ("c1".to_string(), 1), ("c2".to_string(), 2)]
        );
    }

    #[test]
    fn test_drag_first_onto_last_lands_after_it() {
        let mut index = seeded();
        let mv = CardMove {
            card: id("c1"),
            target: s_col1(),
            onto: Some(id("c3")),
        };
        apply_move(&mut index, &mv, MoveMode::Commit);
        assert_eq!(index.cards_in_cell(&s_col1()), vec![id("c2"), id("c3"), id("c1")]);
    }

    #[test]
    fn test_same_cell_without_card_is_noop() {
        let mut index = seeded();
        let before = index.clone();
        let mv = CardMove {
            card: id("c2"),
            target: s_col1(),
            onto: None,
        };
        assert_eq!(apply_move(&mut index, &mv, MoveMode::Commit), MoveEffect::Unchanged);
        assert_eq!(index, before);
    }

    #[test]
    fn test_cross_cell_into_empty_cell() {
        let mut index = seeded();
        let mv = CardMove {
            card: id("c2"),
            target: a_col2(),
            onto: None,
        };
        assert_eq!(apply_move(&mut index, &mv, MoveMode::Commit), MoveEffect::Relocated);
        assert_eq!(
            orders(&index, &s_col1()),
            vec![("c1".to_string(), 0), ("c3".to_string(), 1)]
        );
        assert_eq!(orders(&index, &a_col2()), vec![("c2".to_string(), 0)]);
    }

    #[test]
    fn test_cross_cell_onto_card_inserts_before_it() {
        let mut index = seeded();
        index.write_cell_order(&a_col2(), &[id("d1"), id("d2")]);
        let mv = CardMove {
            card: id("c1"),
            target: a_col2(),
            onto: Some(id("d2")),
        };
        apply_move(&mut index, &mv, MoveMode::Commit);
        assert_eq!(index.cards_in_cell(&a_col2()), vec![id("d1"), id("c1"), id("d2")]);
    }

    #[test]
    fn test_preview_never_relocates() {
        let mut index = seeded();
        let before = index.clone();
        let mv = CardMove {
            card: id("c1"),
            target: a_col2(),
            onto: None,
        };
        assert_eq!(apply_move(&mut index, &mv, MoveMode::Preview), MoveEffect::Unchanged);
        assert_eq!(index, before);
    }

    #[test]
    fn test_preview_and_commit_agree_within_a_cell() {
        let mv = CardMove {
            card: id("c3"),
            target: s_col1(),
            onto: Some(id("c2")),
        };
        let mut preview = seeded();
        let mut commit = seeded();
        apply_move(&mut preview, &mv, MoveMode::Preview);
        apply_move(&mut commit, &mv, MoveMode::Commit);
        assert_eq!(preview, commit);
    }
}
