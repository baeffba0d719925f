//! Board State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{BaseSource, EffectiveBase, GridBase, Placement};
use crate::overlay::{resolve_grid, DisplaySettings, EffectiveGrid, QuickEditor};
use crate::placement::PlacementIndex;

/// One ranking as the board sees it
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    /// Tiers, columns and cards from the server
    pub base: GridBase,
    pub source: BaseSource,
    /// Co-editor quick edits layered over the base
    pub overlay: DisplaySettings,
    /// Authoritative placements
    pub placements: PlacementIndex,
    /// base + overlay, re-derived after every base or overlay change
    pub grid: EffectiveGrid,
    pub loaded: bool,
    pub load_error: Option<String>,
}

/// Type alias for the store
pub type BoardStore = Store<BoardState>;

// ========================
// Store Helper Functions
// ========================

/// Replace everything with a server response
pub fn store_load(store: &BoardStore, response: EffectiveBase) {
    let overlay = response.overlay.unwrap_or_default();
    let grid = resolve_grid(&response.base, Some(&overlay));
    let mut placements = PlacementIndex::from_placements(response.placements);
    placements.sync_with_grid(&grid);

    store.base().set(response.base);
    store.source().set(response.source);
    store.overlay().set(overlay);
    store.grid().set(grid);
    store.placements().set(placements);
    store.load_error().set(None);
    store.loaded().set(true);
}

pub fn store_set_placements(store: &BoardStore, placements: PlacementIndex) {
    store.placements().set(placements);
}

/// Placement list as it goes over the wire
pub fn store_emitted_placements(store: &BoardStore) -> Vec<Placement> {
    let grid = store.grid().read_untracked();
    store.placements().read_untracked().emitted_placements(&grid)
}

/// Run a quick edit against the current state. Returns the new overlay when
/// the edit changed anything.
pub fn store_quick_edit<F>(store: &BoardStore, edit: F) -> Option<DisplaySettings>
where
    F: FnOnce(&mut QuickEditor) -> bool,
{
    let base = store.base().get_untracked();
    let mut overlay = store.overlay().get_untracked();
    let mut placements = store.placements().get_untracked();

    let changed = {
        let mut editor = QuickEditor::new(&base, &mut overlay, &mut placements);
        edit(&mut editor)
    };
    if !changed {
        return None;
    }

    let grid = resolve_grid(&base, Some(&overlay));
    store.overlay().set(overlay.clone());
    store.grid().set(grid);
    store.placements().set(placements);
    Some(overlay)
}
