//! Drag Handles
//!
//! String ids exchanged with the DOM drag layer. Parsed once here so the
//! engine only ever sees typed targets.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::ids::EntityId;
use crate::models::CellKey;

const CARD_PREFIX: &str = "card:";
const TIER_PREFIX: &str = "tier:";
const COLUMN_PREFIX: &str = "column:";
const CELL_PREFIX: &str = "cell:";
const UNRANKED: &str = "unranked";
const NO_COLUMN: &str = "-";

/// Characters escaped inside a handle segment
const SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'%').add(b':').add(b'-');

/// A draggable or droppable thing on the board
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DragHandle {
    Card(EntityId),
    Tier(EntityId),
    Column(EntityId),
    /// A ranked cell (never the pool)
    Cell(CellKey),
    Unranked,
}

impl DragHandle {
    /// Container handle for a cell (the pool maps to `Unranked`)
    pub fn for_cell(cell: &CellKey) -> Self {
        if cell.is_unranked() {
            DragHandle::Unranked
        } else {
            DragHandle::Cell(cell.clone())
        }
    }

    pub fn encode(&self) -> String {
        match self {
            DragHandle::Card(id) => format!("{}{}", CARD_PREFIX, encode_segment(id)),
            DragHandle::Tier(id) => format!("{}{}", TIER_PREFIX, encode_segment(id)),
            DragHandle::Column(id) => format!("{}{}", COLUMN_PREFIX, encode_segment(id)),
            DragHandle::Cell(cell) => {
                let tier = cell.tier_id().map(encode_segment).unwrap_or_default();
                let column = cell
                    .column_id()
                    .map(encode_segment)
                    .unwrap_or_else(|| NO_COLUMN.to_string());
                format!("{}{}:{}", CELL_PREFIX, tier, column)
            }
            DragHandle::Unranked => UNRANKED.to_string(),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        if raw == UNRANKED {
            return Some(DragHandle::Unranked);
        }
        if let Some(rest) = raw.strip_prefix(CARD_PREFIX) {
            return decode_segment(rest).map(DragHandle::Card);
        }
        if let Some(rest) = raw.strip_prefix(TIER_PREFIX) {
            return decode_segment(rest).map(DragHandle::Tier);
        }
        if let Some(rest) = raw.strip_prefix(COLUMN_PREFIX) {
            return decode_segment(rest).map(DragHandle::Column);
        }
        if let Some(rest) = raw.strip_prefix(CELL_PREFIX) {
            let (tier, column) = rest.split_once(':')?;
            let tier = decode_segment(tier)?;
            let column = if column == NO_COLUMN {
                None
            } else {
                Some(decode_segment(column)?)
            };
            return Some(DragHandle::Cell(CellKey::ranked(tier, column)));
        }
        None
    }
}

fn encode_segment(id: &EntityId) -> String {
    utf8_percent_encode(id.as_str(), SEGMENT).to_string()
}

fn decode_segment(raw: &str) -> Option<EntityId> {
    if raw.is_empty() {
        return None;
    }
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    Some(EntityId::parse(&decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_handle_escapes_separators() {
        let cell = CellKey::ranked(EntityId::from("a:b"), Some(EntityId::from("-")));
        let handle = DragHandle::for_cell(&cell);
        let encoded = handle.encode();
        assert_eq!(encoded, "cell:a%3Ab:%2D");
        assert_eq!(DragHandle::parse(&encoded), Some(handle));
    }

    #[test]
    fn test_columnless_cell_and_pool() {
        let cell = CellKey::ranked(EntityId::from("S"), None);
        assert_eq!(DragHandle::for_cell(&cell).encode(), "cell:S:-");
        assert_eq!(DragHandle::for_cell(&CellKey::unranked()), DragHandle::Unranked);
        assert_eq!(DragHandle::parse("unranked"), Some(DragHandle::Unranked));
    }

    #[test]
    fn test_card_handle_keeps_synthetic_ids() {
        let parsed = DragHandle::parse("card:local_card_1_a").unwrap();
        match parsed {
            DragHandle::Card(id) => assert!(id.is_synthetic()),
            other => panic!("unexpected handle {:?}", other),
        }
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(DragHandle::parse("card:"), None);
        assert_eq!(DragHandle::parse("cell:S"), None);
        assert_eq!(DragHandle::parse("whatever"), None);
    }
}
