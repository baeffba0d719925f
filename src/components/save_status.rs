//! Save Status Pill

use leptos::prelude::*;

use crate::autosave::SaveStatus;
use crate::context::use_board;

#[component]
pub fn SaveStatusPill() -> impl IntoView {
    let ctx = use_board();
    let status = ctx.autosave.status();

    let class = move || match status.get() {
        SaveStatus::Idle => "save-status idle",
        SaveStatus::Saving => "save-status saving",
        SaveStatus::Saved => "save-status saved",
        SaveStatus::Error => "save-status error",
    };

    view! {
        <span class=class>{move || status.get().label()}</span>
    }
}
