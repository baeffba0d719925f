//! Tierlist Frontend App

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::Board;
use crate::config::BoardConfig;
use crate::context::BoardContext;
use crate::store::BoardState;

#[component]
pub fn App() -> impl IntoView {
    let config = BoardConfig::from_location();
    let has_ranking = config.ranking_id.is_some();

    let store = Store::new(BoardState::default());
    provide_context(BoardContext::new(store, config));

    view! {
        <main class="app-layout">
            <Show
                when=move || has_ranking
                fallback=|| view! { <p class="board-error">"No ranking selected. Open this page with ?ranking=<id>."</p> }
            >
                <Board />
            </Show>
        </main>
    }
}
