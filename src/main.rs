//! Tierlist Frontend Entry Point

mod app;
mod autosave;
mod commands;
mod components;
mod config;
mod context;
mod drag;
mod ids;
mod logging;
mod models;
mod overlay;
mod placement;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    mount_to_body(App);
}
