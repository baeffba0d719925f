//! Card Tile Component

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, DndSignals};

use crate::context::use_board;
use crate::drag::DragHandle;
use crate::ids::EntityId;
use crate::overlay::CardOverride;
use crate::store::BoardStateStoreFields;

/// Draggable card; double-click renames, × removes (quick edit modes only)
#[component]
pub fn CardTile(card_id: EntityId) -> impl IntoView {
    let ctx = use_board();
    let dnd = expect_context::<DndSignals>();
    let handle = DragHandle::Card(card_id.clone()).encode();
    let editable = ctx.mode().can_quick_edit();

    let lookup_id = card_id.clone();
    let card = move || ctx.store.grid().with(|grid| grid.card(&lookup_id).cloned());

    let drag_handle = handle.clone();
    let is_dragging = move || dnd.dragging.get().as_deref() == Some(drag_handle.as_str());
    let dragging_class = is_dragging.clone();
    let style = move || {
        if is_dragging() {
            let (dx, dy) = dnd.offset.get();
            format!("transform: translate({}px, {}px); z-index: 10; pointer-events: none;", dx, dy)
        } else {
            String::new()
        }
    };

    let rename_id = card_id.clone();
    let on_rename = move |_| {
        if !editable {
            return;
        }
        let current = ctx
            .store
            .grid()
            .with_untracked(|grid| grid.card(&rename_id).map(|card| card.title.clone()))
            .unwrap_or_default();
        let Some(title) = prompt("Card title", &current) else {
            return;
        };
        let id = rename_id.clone();
        ctx.quick_edit(move |editor| {
            editor.override_card(
                &id,
                CardOverride {
                    title: Some(title),
                    ..Default::default()
                },
            )
        });
    };

    let remove_id = card_id.clone();
    let on_remove = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let id = remove_id.clone();
        ctx.quick_edit(move |editor| editor.remove_card(&id));
    };

    view! {
        <div
            class=move || if dragging_class() { "card-tile dragging" } else { "card-tile" }
            style=style
            data-dnd-id=handle.clone()
            data-dnd-kind="item"
            on:mousedown=make_on_mousedown(dnd, handle.clone())
            on:dblclick=on_rename
        >
            {move || card().map(|card| {
                let image = card.image_url.clone();
                view! {
                    {image.map(|src| view! { <img class="card-image" src=src alt="" draggable="false" /> })}
                    <span class="card-title">{card.title.clone()}</span>
                }
            })}
            <Show when=move || editable>
                <button class="card-remove-btn" on:click=on_remove.clone()>"×"</button>
            </Show>
        </div>
    }
}

/// Browser prompt; None when dismissed or left empty
pub fn prompt(message: &str, current: &str) -> Option<String> {
    web_sys::window()?
        .prompt_with_message_and_default(message, current)
        .ok()
        .flatten()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
