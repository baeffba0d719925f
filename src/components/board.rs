//! Board Component
//!
//! Tier rows × columns, headers, and the unranked pool. Owns the global drag
//! listeners and the initial load.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_dragdrop::{bind_global_handlers, create_dnd_signals, make_on_mousedown, DndHandlers, DndSignals};

use crate::components::card_tile::prompt;
use crate::components::{GridCell, QuickEditBar, SaveStatusPill, UnrankedPool};
use crate::context::use_board;
use crate::drag::DragHandle;
use crate::models::{CellKey, Column, Tier};
use crate::store::BoardStateStoreFields;

#[component]
pub fn Board() -> impl IntoView {
    let ctx = use_board();
    let store = ctx.store;
    let dnd = create_dnd_signals();
    provide_context(dnd);

    bind_global_handlers(
        dnd,
        DndHandlers {
            on_start: Rc::new(move |handle| ctx.drag_start(handle)),
            accepts: Rc::new(move |active, candidate| ctx.accepts(active, candidate)),
            on_over: Rc::new(move |over| ctx.drag_over(over)),
            on_drop: Rc::new(move |_, _| ctx.drag_drop()),
            on_cancel: Rc::new(move || ctx.drag_cancel()),
        },
    );

    ctx.fetch(true);

    // Server refresh after each successful write
    Effect::new(move |prev: Option<u32>| {
        let version = ctx.autosave.saved_version().get();
        if prev.is_some() {
            ctx.fetch(false);
        }
        version
    });

    let tiers = move || store.grid().with(|grid| grid.tiers.clone());
    let columns = move || store.grid().with(|grid| grid.columns.clone());

    view! {
        <div class="board">
            <div class="board-toolbar">
                <SaveStatusPill />
                <Show when=move || ctx.mode().can_quick_edit()>
                    <QuickEditBar />
                </Show>
            </div>

            {move || store.load_error().get().map(|e| view! { <p class="board-error">{e}</p> })}

            <Show when=move || store.loaded().get() fallback=|| view! { <p class="board-loading">"Loading…"</p> }>
                <div class="tier-grid">
                    <div class="tier-grid-header">
                        <div class="tier-label-spacer"></div>
                        <For
                            each=columns
                            key=|column| (column.id.clone(), column.name.clone(), column.color.clone())
                            children=move |column| view! { <ColumnHeader column=column /> }
                        />
                    </div>
                    <For
                        each=tiers
                        key=|tier| (tier.id.clone(), tier.name.clone(), tier.color.clone())
                        children=move |tier| view! { <TierRow tier=tier /> }
                    />
                </div>
                <UnrankedPool />
            </Show>
        </div>
    }
}

/// Tier label followed by one cell per column, or a single cell when the
/// grid has no columns
#[component]
fn TierRow(tier: Tier) -> impl IntoView {
    let ctx = use_board();
    let tier_id = tier.id.clone();

    let cells = move || {
        let columns = ctx.store.grid().with(|grid| grid.columns.clone());
        if columns.is_empty() {
            vec![CellKey::ranked(tier_id.clone(), None)]
        } else {
            columns
                .into_iter()
                .map(|column| CellKey::ranked(tier_id.clone(), Some(column.id)))
                .collect()
        }
    };

    view! {
        <div class="tier-row">
            <TierLabel tier=tier />
            <For
                each=cells
                key=|cell| cell.clone()
                children=move |cell| view! { <GridCell cell=cell /> }
            />
        </div>
    }
}

#[component]
fn TierLabel(tier: Tier) -> impl IntoView {
    let ctx = use_board();
    let dnd = expect_context::<DndSignals>();
    let editable = ctx.mode().can_quick_edit();
    let handle = DragHandle::Tier(tier.id.clone()).encode();
    let style = format!("background-color: {};", tier.color);

    let rename_id = tier.id.clone();
    let current_name = tier.name.clone();
    let on_rename = move |_| {
        if !editable {
            return;
        }
        let Some(name) = prompt("Tier name", &current_name) else {
            return;
        };
        let id = rename_id.clone();
        ctx.quick_edit(move |editor| editor.rename_tier(&id, name));
    };

    let hide_id = tier.id.clone();
    let on_hide = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let id = hide_id.clone();
        ctx.quick_edit(move |editor| editor.hide_tier(&id));
    };

    let over_handle = handle.clone();
    let class = move || {
        if dnd.over.get().as_deref() == Some(over_handle.as_str()) {
            "tier-label drop-over"
        } else {
            "tier-label"
        }
    };

    view! {
        <div
            class=class
            style=style
            data-dnd-id=handle.clone()
            data-dnd-kind="item"
            on:mousedown=make_on_mousedown(dnd, handle.clone())
            on:dblclick=on_rename
        >
            <span class="tier-name">{tier.name.clone()}</span>
            <Show when=move || editable>
                <button class="tier-hide-btn" title="Hide tier" on:click=on_hide.clone()>"×"</button>
            </Show>
        </div>
    }
}

#[component]
fn ColumnHeader(column: Column) -> impl IntoView {
    let ctx = use_board();
    let dnd = expect_context::<DndSignals>();
    let editable = ctx.mode().can_quick_edit();
    let handle = DragHandle::Column(column.id.clone()).encode();
    let style = column
        .color
        .as_ref()
        .map(|color| format!("border-bottom: 3px solid {};", color))
        .unwrap_or_default();

    let rename_id = column.id.clone();
    let current_name = column.name.clone().unwrap_or_default();
    let on_rename = move |_| {
        if !editable {
            return;
        }
        let Some(name) = prompt("Column name", &current_name) else {
            return;
        };
        let id = rename_id.clone();
        ctx.quick_edit(move |editor| editor.rename_column(&id, name));
    };

    let hide_id = column.id.clone();
    let on_hide = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let id = hide_id.clone();
        ctx.quick_edit(move |editor| editor.hide_column(&id));
    };

    view! {
        <div
            class="column-header"
            style=style
            data-dnd-id=handle.clone()
            data-dnd-kind="item"
            on:mousedown=make_on_mousedown(dnd, handle.clone())
            on:dblclick=on_rename
        >
            <span class="column-name">{column.name.clone().unwrap_or_default()}</span>
            <Show when=move || editable>
                <button class="column-hide-btn" title="Hide column" on:click=on_hide.clone()>"×"</button>
            </Show>
        </div>
    }
}
