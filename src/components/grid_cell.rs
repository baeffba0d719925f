//! Grid Cell Component
//!
//! One droppable (tier, column) cell, or the unranked pool.

use leptos::prelude::*;
use leptos_dragdrop::DndSignals;

use crate::components::CardTile;
use crate::context::{use_board, BoardContext};
use crate::drag::DragHandle;
use crate::ids::EntityId;
use crate::models::CellKey;
use crate::store::BoardStateStoreFields;

/// Cards to render in a cell: the drag preview while dragging, otherwise the
/// authoritative index. Cards missing from the grid are skipped.
pub fn visible_cards(ctx: BoardContext, cell: &CellKey) -> Vec<EntityId> {
    let ids = ctx.preview.with(|preview| match preview {
        Some(preview) => preview.cards_in_cell(cell),
        None => ctx.store.placements().with(|index| index.cards_in_cell(cell)),
    });
    ctx.store
        .grid()
        .with(|grid| ids.into_iter().filter(|id| grid.has_card(id)).collect())
}

#[component]
pub fn GridCell(cell: CellKey) -> impl IntoView {
    let ctx = use_board();
    let dnd = expect_context::<DndSignals>();
    let handle = DragHandle::for_cell(&cell).encode();
    let base_class = if cell.is_unranked() { "grid-cell pool-cell" } else { "grid-cell" };

    let over_handle = handle.clone();
    let class = move || {
        if dnd.over.get().as_deref() == Some(over_handle.as_str()) {
            format!("{} drop-over", base_class)
        } else {
            base_class.to_string()
        }
    };
    let cards = move || visible_cards(ctx, &cell);

    view! {
        <div class=class data-dnd-id=handle data-dnd-kind="container">
            <For
                each=cards
                key=|id| id.clone()
                children=move |card_id| view! { <CardTile card_id=card_id /> }
            />
        </div>
    }
}
