//! Quick Edit Bar
//!
//! Adds tiers, columns and cards to the overlay. Owners can also reset it.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::AccessMode;
use crate::context::use_board;
use crate::ids::{mint_browser_id, SyntheticKind};

const DEFAULT_TIER_COLOR: &str = "#9e9e9e";

#[derive(Clone, Copy, PartialEq, Eq)]
enum AddKind {
    Tier,
    Column,
    Card,
}

#[component]
pub fn QuickEditBar() -> impl IntoView {
    let ctx = use_board();
    let (text, set_text) = signal(String::new());
    let (kind, set_kind) = signal(AddKind::Card);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = text.get().trim().to_string();
        if value.is_empty() {
            return;
        }
        match kind.get() {
            AddKind::Tier => ctx.quick_edit(move |editor| {
                editor.add_tier(
                    mint_browser_id(SyntheticKind::Tier),
                    value,
                    DEFAULT_TIER_COLOR.to_string(),
                );
                true
            }),
            AddKind::Column => ctx.quick_edit(move |editor| {
                editor.add_column(mint_browser_id(SyntheticKind::Column), Some(value), None);
                true
            }),
            AddKind::Card => ctx.quick_edit(move |editor| {
                editor.add_card(mint_browser_id(SyntheticKind::Card), value, None, None);
                true
            }),
        }
        set_text.set(String::new());
    };

    let on_kind_change = move |ev: web_sys::Event| {
        let target = ev.target().unwrap();
        let select = target.dyn_ref::<web_sys::HtmlSelectElement>().unwrap();
        set_kind.set(match select.value().as_str() {
            "tier" => AddKind::Tier,
            "column" => AddKind::Column,
            _ => AddKind::Card,
        });
    };

    let on_reset = move |_| {
        ctx.quick_edit(|editor| {
            editor.clear();
            true
        });
    };

    view! {
        <form class="quick-edit-bar" on:submit=on_submit>
            <select on:change=on_kind_change>
                <option value="card" selected=true>"Card"</option>
                <option value="tier">"Tier"</option>
                <option value="column">"Column"</option>
            </select>
            <input
                type="text"
                placeholder="Name..."
                prop:value=move || text.get()
                on:input=move |ev| {
                    let target = ev.target().unwrap();
                    let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                    set_text.set(input.value());
                }
            />
            <button type="submit">"+"</button>
            <Show when=move || ctx.mode() == AccessMode::Owner>
                <button type="button" class="reset-overlay-btn" on:click=on_reset>"Reset edits"</button>
            </Show>
        </form>
    }
}
