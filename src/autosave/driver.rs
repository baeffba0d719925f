//! Autosave timers and network writes

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::{AutosaveReconciler, LocalChange, PendingWrite, RefreshGate, SaveStatus, WriteId};
use crate::commands;
use crate::config::AUTOSAVE_DEBOUNCE_MS;

/// Reactive handle around the reconciler. Without a ranking id nothing is
/// ever written (template preview).
#[derive(Clone, Copy)]
pub struct Autosave {
    reconciler: StoredValue<AutosaveReconciler>,
    ranking_id: StoredValue<Option<String>>,
    status: RwSignal<SaveStatus>,
    /// Bumped after each successful write, watched to refresh from the server
    saved_version: RwSignal<u32>,
}

impl Autosave {
    pub fn new(ranking_id: Option<String>) -> Self {
        let autosave = Self {
            reconciler: StoredValue::new(AutosaveReconciler::new()),
            ranking_id: StoredValue::new(ranking_id),
            status: RwSignal::new(SaveStatus::Idle),
            saved_version: RwSignal::new(0),
        };
        on_cleanup(move || autosave.flush());
        flush_on_pagehide(autosave);
        autosave
    }

    pub fn status(&self) -> ReadSignal<SaveStatus> {
        self.status.read_only()
    }

    pub fn saved_version(&self) -> ReadSignal<u32> {
        self.saved_version.read_only()
    }

    fn enabled(&self) -> bool {
        self.ranking_id
            .try_with_value(|id| id.is_some())
            .unwrap_or(false)
    }

    /// Queue a committed change; the write goes out once the debounce window
    /// closes without another change
    pub fn schedule(&self, change: LocalChange) {
        if !self.enabled() {
            return;
        }
        let Some(ticket) = self.reconciler.try_update_value(|r| r.record(change)) else {
            return;
        };
        self.status.set(SaveStatus::Saving);

        let this = *self;
        spawn_local(async move {
            TimeoutFuture::new(AUTOSAVE_DEBOUNCE_MS).await;
            let due = this.reconciler.try_update_value(|r| r.take_due(ticket)).flatten();
            if let Some((id, write)) = due {
                this.send(id, write).await;
            }
        });
    }

    /// Best-effort write of anything still pending, ignoring the debounce
    pub fn flush(&self) {
        if !self.enabled() {
            return;
        }
        let Some((id, write)) = self.reconciler.try_update_value(|r| r.flush()).flatten() else {
            return;
        };
        log::info!("[AUTOSAVE] Flushing pending write");
        let this = *self;
        spawn_local(async move {
            this.send(id, write).await;
        });
    }

    /// Gate for a server response, see `AutosaveReconciler::gate_refresh`
    pub fn gate_refresh(&self, initial: bool, dragging: bool) -> RefreshGate {
        self.reconciler
            .try_update_value(|r| r.gate_refresh(initial, dragging))
            .unwrap_or(RefreshGate::Apply)
    }

    async fn send(self, id: WriteId, write: PendingWrite) {
        let Some(ranking_id) = self.ranking_id.try_get_value().flatten() else {
            return;
        };
        let result = commands::send_pending_write(&ranking_id, &write).await;
        let ok = result.is_ok();
        if let Some(status) = self.reconciler.try_update_value(|r| r.write_finished(id, result)) {
            self.status.try_set(status);
            if ok {
                self.saved_version.try_update(|v| *v += 1);
            }
        }
    }
}

/// The app root is never unmounted, so leaving the page is the real
/// teardown
fn flush_on_pagehide(autosave: Autosave) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let on_pagehide = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
        autosave.flush();
    });
    if window
        .add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("[AUTOSAVE] Could not listen for pagehide");
    }
    on_pagehide.forget();
}
