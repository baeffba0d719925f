//! Board Context
//!
//! Shared handles provided via Leptos Context API. Every gesture and quick
//! edit on the board goes through here so that local state, the drag engine
//! and autosave stay in step.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::autosave::{Autosave, LocalChange, RefreshGate};
use crate::commands;
use crate::config::{AccessMode, BoardConfig};
use crate::drag::{DragEngine, DragHandle, DropOutcome};
use crate::overlay::QuickEditor;
use crate::placement::PlacementIndex;
use crate::store::{self, BoardStateStoreFields, BoardStore};

#[derive(Clone, Copy)]
pub struct BoardContext {
    pub store: BoardStore,
    pub autosave: Autosave,
    config: StoredValue<BoardConfig>,
    engine: StoredValue<DragEngine>,
    /// Placement Index rendered while a card drag is in progress
    pub preview: RwSignal<Option<PlacementIndex>>,
}

impl BoardContext {
    pub fn new(store: BoardStore, config: BoardConfig) -> Self {
        let persisted_id = if config.mode.persists() {
            config.ranking_id.clone()
        } else {
            None
        };
        Self {
            store,
            autosave: Autosave::new(persisted_id),
            engine: StoredValue::new(DragEngine::new(config.mode.drag_options())),
            config: StoredValue::new(config),
            preview: RwSignal::new(None),
        }
    }

    pub fn mode(&self) -> AccessMode {
        self.config.with_value(|config| config.mode)
    }

    /// Fetch the ranking. A refresh (not the first load) is dropped once if
    /// it would overwrite a local edit that raced it, and always while a drag
    /// is in progress.
    pub fn fetch(&self, initial: bool) {
        let Some(ranking_id) = self.config.with_value(|config| config.ranking_id.clone()) else {
            return;
        };
        let ctx = *self;
        spawn_local(async move {
            match commands::get_effective_base(&ranking_id).await {
                Ok(response) => {
                    let dragging = ctx.engine.with_value(|engine| engine.is_dragging());
                    match ctx.autosave.gate_refresh(initial, dragging) {
                        RefreshGate::Apply => {}
                        RefreshGate::SuppressedEcho => return,
                        RefreshGate::SkippedDuringDrag => {
                            log::debug!("[BOARD] Refresh skipped during drag");
                            return;
                        }
                    }
                    log::info!(
                        "[BOARD] Loaded {} tiers, {} cards, {} placements",
                        response.base.tiers.len(),
                        response.base.cards.len(),
                        response.placements.len()
                    );
                    store::store_load(&ctx.store, response);
                }
                Err(e) => {
                    log::error!("[BOARD] Failed to load ranking {}: {}", ranking_id, e);
                    ctx.store.load_error().set(Some(e));
                }
            }
        });
    }

    // ========================
    // Drag
    // ========================

    pub fn drag_start(&self, raw: &str) -> bool {
        if !self.mode().can_drag() {
            return false;
        }
        let Some(handle) = DragHandle::parse(raw) else {
            return false;
        };
        let started = {
            let placements = self.store.placements().read_untracked();
            let grid = self.store.grid().read_untracked();
            self.engine
                .try_update_value(|engine| engine.start(&handle, &placements, &grid))
                .unwrap_or(false)
        };
        if started {
            self.sync_preview();
        }
        started
    }

    /// Cards drop on cards and containers, headers only on headers of the
    /// same axis
    pub fn accepts(&self, active: &str, candidate: &str) -> bool {
        match (DragHandle::parse(active), DragHandle::parse(candidate)) {
            (Some(DragHandle::Card(_)), Some(target)) => {
                !matches!(target, DragHandle::Tier(_) | DragHandle::Column(_))
            }
            (Some(DragHandle::Tier(_)), Some(DragHandle::Tier(_))) => true,
            (Some(DragHandle::Column(_)), Some(DragHandle::Column(_))) => true,
            _ => false,
        }
    }

    pub fn drag_over(&self, raw: Option<&str>) {
        let over = raw.and_then(DragHandle::parse);
        let moved = {
            let grid = self.store.grid().read_untracked();
            self.engine
                .try_update_value(|engine| engine.drag_over(over, &grid))
                .unwrap_or(false)
        };
        if moved {
            self.sync_preview();
        }
    }

    pub fn drag_drop(&self) {
        let grid = self.store.grid().get_untracked();
        let outcome = {
            let placements = self.store.placements().read_untracked();
            self.engine
                .try_update_value(|engine| engine.drop(&placements, &grid))
                .unwrap_or(DropOutcome::Cancelled)
        };
        self.preview.set(None);

        match outcome {
            DropOutcome::Placements { index, .. } => {
                let emitted = index.emitted_placements(&grid);
                store::store_set_placements(&self.store, index);
                self.autosave.schedule(LocalChange::Placements(emitted));
            }
            DropOutcome::Reorder { axis, id, to } => {
                self.quick_edit(|editor| editor.move_to(axis, &id, to));
            }
            DropOutcome::Rejected | DropOutcome::Unchanged | DropOutcome::Cancelled => {}
        }
    }

    pub fn drag_cancel(&self) {
        self.engine.update_value(|engine| {
            engine.cancel();
        });
        self.preview.set(None);
    }

    fn sync_preview(&self) {
        let preview = self.engine.with_value(|engine| engine.preview().cloned());
        self.preview.set(preview);
    }

    // ========================
    // Quick edits
    // ========================

    /// Apply an overlay edit locally and queue the overlay and placements
    pub fn quick_edit<F>(&self, edit: F)
    where
        F: FnOnce(&mut QuickEditor) -> bool,
    {
        if !self.mode().can_quick_edit() {
            return;
        }
        let Some(overlay) = store::store_quick_edit(&self.store, edit) else {
            return;
        };
        self.autosave.schedule(LocalChange::Overlay(overlay));
        self.autosave
            .schedule(LocalChange::Placements(store::store_emitted_placements(&self.store)));
    }
}

pub fn use_board() -> BoardContext {
    use_context::<BoardContext>().expect("BoardContext should be provided")
}
