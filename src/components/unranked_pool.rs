//! Unranked Pool Component

use leptos::prelude::*;

use crate::components::GridCell;
use crate::models::CellKey;

#[component]
pub fn UnrankedPool() -> impl IntoView {
    view! {
        <section class="unranked-pool">
            <h2>"Unranked"</h2>
            <GridCell cell=CellKey::unranked() />
        </section>
    }
}
