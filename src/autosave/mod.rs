//! Autosave Reconciler
//!
//! Local mutations are applied optimistically by the caller and recorded
//! here. Writes are coalesced per debounce window: every `record` bumps the
//! generation, and only the ticket of the latest generation may take the
//! pending write. A recorded mutation also arms `pending_local_echo`, which
//! swallows exactly one remote refresh.
//!
//! Every taken write gets a `WriteId`. When a write fails, the kinds it
//! carried are held until a newer write of the same kind succeeds or the
//! next write picks them up again. Failures are never retried on a timer.

mod driver;

pub use driver::Autosave;

use std::collections::BTreeMap;

use crate::models::Placement;
use crate::overlay::DisplaySettings;

/// Save indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Saving => "Saving…",
            SaveStatus::Saved => "Saved",
            SaveStatus::Error => "Save failed",
        }
    }
}

/// A committed local mutation, carried in full
#[derive(Debug, Clone, PartialEq)]
pub enum LocalChange {
    Placements(Vec<Placement>),
    Overlay(DisplaySettings),
}

/// What the next network write must carry. Later changes of the same kind
/// replace earlier ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingWrite {
    pub placements: Option<Vec<Placement>>,
    pub overlay: Option<DisplaySettings>,
}

impl PendingWrite {
    pub fn is_empty(&self) -> bool {
        self.placements.is_none() && self.overlay.is_none()
    }

    fn merge(&mut self, change: LocalChange) {
        match change {
            LocalChange::Placements(placements) => self.placements = Some(placements),
            LocalChange::Overlay(overlay) => self.overlay = Some(overlay),
        }
    }
}

/// Identifies the debounce window a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Identifies one network write, increasing in the order writes were taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WriteId(u64);

/// Decision for a server response arriving at the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshGate {
    Apply,
    /// A local edit raced the response
    SuppressedEcho,
    /// A drag is in progress; the echo flag is left armed
    SkippedDuringDrag,
}

/// Content of a failed write kept for the next attempt
#[derive(Debug, Clone, PartialEq)]
struct Held<T> {
    from: WriteId,
    value: T,
}

/// Keep `value` unless a write at least as new already covers that kind
fn hold<T>(slot: &mut Option<Held<T>>, acked: Option<WriteId>, from: WriteId, value: Option<T>) -> bool {
    let Some(value) = value else {
        return false;
    };
    if acked.is_some_and(|acked| acked >= from) {
        return false;
    }
    if slot.as_ref().is_some_and(|held| held.from > from) {
        return false;
    }
    *slot = Some(Held { from, value });
    true
}

/// Drop a held value that a newer successful write replaced
fn release<T>(slot: &mut Option<Held<T>>, acked: WriteId) {
    if slot.as_ref().is_some_and(|held| held.from < acked) {
        *slot = None;
    }
}

#[derive(Debug, Default)]
pub struct AutosaveReconciler {
    status: SaveStatus,
    pending: PendingWrite,
    generation: u64,
    next_write: u64,
    in_flight: BTreeMap<WriteId, PendingWrite>,
    held_placements: Option<Held<Vec<Placement>>>,
    held_overlay: Option<Held<DisplaySettings>>,
    acked_placements: Option<WriteId>,
    acked_overlay: Option<WriteId>,
    pending_local_echo: bool,
    last_error: Option<String>,
}

impl AutosaveReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Failed content waiting for the next write
    pub fn has_unsaved_failure(&self) -> bool {
        self.held_placements.is_some() || self.held_overlay.is_some()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn pending_local_echo(&self) -> bool {
        self.pending_local_echo
    }

    /// Record a committed local mutation and open a new debounce window
    pub fn record(&mut self, change: LocalChange) -> DebounceTicket {
        self.pending.merge(change);
        self.generation += 1;
        self.pending_local_echo = true;
        self.status = SaveStatus::Saving;
        DebounceTicket(self.generation)
    }

    /// Called when a debounce timer fires. Only the newest window's timer
    /// gets the write; older timers find nothing.
    pub fn take_due(&mut self, ticket: DebounceTicket) -> Option<(WriteId, PendingWrite)> {
        if ticket.0 != self.generation {
            return None;
        }
        self.take()
    }

    /// Take whatever is pending regardless of the debounce window (teardown)
    pub fn flush(&mut self) -> Option<(WriteId, PendingWrite)> {
        self.take()
    }

    fn take(&mut self) -> Option<(WriteId, PendingWrite)> {
        let mut write = std::mem::take(&mut self.pending);
        // Newer local state wins over held failures of the same kind
        if let Some(held) = self.held_placements.take() {
            write.placements.get_or_insert(held.value);
        }
        if let Some(held) = self.held_overlay.take() {
            write.overlay.get_or_insert(held.value);
        }
        if write.is_empty() {
            return None;
        }
        self.next_write += 1;
        let id = WriteId(self.next_write);
        self.in_flight.insert(id, write.clone());
        Some((id, write))
    }

    /// Settle one in-flight write. A failure keeps its content for the next
    /// write; a success releases held content it supersedes.
    pub fn write_finished(&mut self, id: WriteId, result: Result<(), String>) -> SaveStatus {
        let Some(write) = self.in_flight.remove(&id) else {
            return self.status;
        };
        match result {
            Ok(()) => {
                if write.placements.is_some() {
                    self.acked_placements = self.acked_placements.max(Some(id));
                    release(&mut self.held_placements, id);
                }
                if write.overlay.is_some() {
                    self.acked_overlay = self.acked_overlay.max(Some(id));
                    release(&mut self.held_overlay, id);
                }
                self.settle_status();
            }
            Err(message) => {
                log::warn!("[AUTOSAVE] Write failed: {}", message);
                let held_placements =
                    hold(&mut self.held_placements, self.acked_placements, id, write.placements);
                let held_overlay = hold(&mut self.held_overlay, self.acked_overlay, id, write.overlay);
                if held_placements || held_overlay {
                    self.last_error = Some(message);
                }
                self.settle_status();
            }
        }
        self.status
    }

    /// Held failures show as an error until released; otherwise saved once
    /// nothing is pending or in flight
    fn settle_status(&mut self) {
        self.status = if self.has_unsaved_failure() {
            SaveStatus::Error
        } else if self.in_flight.is_empty() && self.pending.is_empty() {
            self.last_error = None;
            SaveStatus::Saved
        } else {
            SaveStatus::Saving
        };
    }

    /// Decide whether a server refresh may replace local state. Returns false
    /// once after each local mutation.
    pub fn accept_remote_refresh(&mut self) -> bool {
        if self.pending_local_echo {
            self.pending_local_echo = false;
            log::debug!("[AUTOSAVE] Suppressed remote refresh racing a local edit");
            return false;
        }
        true
    }

    /// Gate for a server response. The first load always applies; during a
    /// drag a refresh is skipped without consuming the echo flag.
    pub fn gate_refresh(&mut self, initial: bool, dragging: bool) -> RefreshGate {
        if initial {
            return RefreshGate::Apply;
        }
        if dragging {
            return RefreshGate::SkippedDuringDrag;
        }
        if self.accept_remote_refresh() {
            RefreshGate::Apply
        } else {
            RefreshGate::SuppressedEcho
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityId;
    use crate::models::CellKey;

    fn placements(card: &str) -> Vec<Placement> {
        vec![Placement::new(EntityId::from(card), &CellKey::unranked(), 0)]
    }

    fn overlay_hiding(tier: &str) -> DisplaySettings {
        DisplaySettings {
            hidden_tier_ids: Some(vec![EntityId::from(tier)]),
            ..Default::default()
        }
    }

    #[test]
    fn test_burst_collapses_into_one_write() {
        let mut reconciler = AutosaveReconciler::new();
        let first = reconciler.record(LocalChange::Placements(placements("a")));
        let second = reconciler.record(LocalChange::Placements(placements("b")));
        let third = reconciler.record(LocalChange::Placements(placements("c")));
        assert_eq!(reconciler.status(), SaveStatus::Saving);

        assert_eq!(reconciler.take_due(first), None);
        assert_eq!(reconciler.take_due(second), None);
        let (_, write) = reconciler.take_due(third).unwrap();
        assert_eq!(write.placements, Some(placements("c")));
        assert_eq!(write.overlay, None);
        assert!(!reconciler.has_pending());
    }

    #[test]
    fn test_placements_and_overlay_travel_together() {
        let mut reconciler = AutosaveReconciler::new();
        reconciler.record(LocalChange::Overlay(DisplaySettings::default()));
        let ticket = reconciler.record(LocalChange::Placements(placements("a")));
        let (_, write) = reconciler.take_due(ticket).unwrap();
        assert!(write.overlay.is_some());
        assert!(write.placements.is_some());
    }

    #[test]
    fn test_status_transitions() {
        let mut reconciler = AutosaveReconciler::new();
        assert_eq!(reconciler.status(), SaveStatus::Idle);

        let ticket = reconciler.record(LocalChange::Placements(placements("a")));
        let (id, _) = reconciler.take_due(ticket).unwrap();
        assert_eq!(reconciler.write_finished(id, Ok(())), SaveStatus::Saved);

        let ticket = reconciler.record(LocalChange::Placements(placements("b")));
        let (id, _) = reconciler.take_due(ticket).unwrap();
        assert_eq!(
            reconciler.write_finished(id, Err("offline".to_string())),
            SaveStatus::Error
        );
        assert_eq!(reconciler.last_error(), Some("offline"));
        assert!(!reconciler.has_pending());
        assert!(reconciler.has_unsaved_failure());

        // The next mutation re-attempts
        let ticket = reconciler.record(LocalChange::Placements(placements("c")));
        assert_eq!(reconciler.status(), SaveStatus::Saving);
        let (id, _) = reconciler.take_due(ticket).unwrap();
        assert_eq!(reconciler.write_finished(id, Ok(())), SaveStatus::Saved);
        assert_eq!(reconciler.last_error(), None);
    }

    #[test]
    fn test_failed_overlay_rides_along_with_next_write() {
        let mut reconciler = AutosaveReconciler::new();
        let ticket = reconciler.record(LocalChange::Overlay(overlay_hiding("A")));
        let (id, _) = reconciler.take_due(ticket).unwrap();
        reconciler.write_finished(id, Err("offline".to_string()));

        // Failed content is not sent on its own
        assert_eq!(reconciler.in_flight(), 0);
        assert!(!reconciler.has_pending());

        let ticket = reconciler.record(LocalChange::Placements(placements("a")));
        let (id, write) = reconciler.take_due(ticket).unwrap();
        assert_eq!(write.overlay, Some(overlay_hiding("A")));
        assert_eq!(write.placements, Some(placements("a")));
        assert_eq!(reconciler.write_finished(id, Ok(())), SaveStatus::Saved);
        assert!(!reconciler.has_unsaved_failure());
    }

    #[test]
    fn test_newer_local_state_beats_held_failure() {
        let mut reconciler = AutosaveReconciler::new();
        let ticket = reconciler.record(LocalChange::Placements(placements("old")));
        let (id, _) = reconciler.take_due(ticket).unwrap();
        reconciler.write_finished(id, Err("offline".to_string()));

        let ticket = reconciler.record(LocalChange::Placements(placements("new")));
        let (_, write) = reconciler.take_due(ticket).unwrap();
        assert_eq!(write.placements, Some(placements("new")));
    }

    #[test]
    fn test_newer_success_clears_older_failure() {
        let mut reconciler = AutosaveReconciler::new();
        let ticket = reconciler.record(LocalChange::Placements(placements("a")));
        let (first, _) = reconciler.take_due(ticket).unwrap();
        let ticket = reconciler.record(LocalChange::Placements(placements("b")));
        let (second, _) = reconciler.take_due(ticket).unwrap();
        assert_eq!(reconciler.in_flight(), 2);

        assert_eq!(
            reconciler.write_finished(first, Err("timeout".to_string())),
            SaveStatus::Error
        );
        assert_eq!(reconciler.write_finished(second, Ok(())), SaveStatus::Saved);
        assert!(!reconciler.has_unsaved_failure());
    }

    #[test]
    fn test_late_failure_after_newer_success_is_ignored() {
        let mut reconciler = AutosaveReconciler::new();
        let ticket = reconciler.record(LocalChange::Placements(placements("a")));
        let (first, _) = reconciler.take_due(ticket).unwrap();
        let ticket = reconciler.record(LocalChange::Placements(placements("b")));
        let (second, _) = reconciler.take_due(ticket).unwrap();

        assert_eq!(reconciler.write_finished(second, Ok(())), SaveStatus::Saving);
        assert_eq!(
            reconciler.write_finished(first, Err("timeout".to_string())),
            SaveStatus::Saved
        );
        assert_eq!(reconciler.last_error(), None);
        assert!(!reconciler.has_unsaved_failure());
        assert_eq!(reconciler.flush(), None);
    }

    #[test]
    fn test_partial_supersede_keeps_error() {
        let mut reconciler = AutosaveReconciler::new();
        reconciler.record(LocalChange::Overlay(overlay_hiding("A")));
        let ticket = reconciler.record(LocalChange::Placements(placements("a")));
        let (first, _) = reconciler.take_due(ticket).unwrap();
        let ticket = reconciler.record(LocalChange::Placements(placements("b")));
        let (second, _) = reconciler.take_due(ticket).unwrap();

        reconciler.write_finished(first, Err("offline".to_string()));
        // Placements were replaced, the overlay was not
        assert_eq!(reconciler.write_finished(second, Ok(())), SaveStatus::Error);
        let (_, write) = reconciler.flush().unwrap();
        assert_eq!(write.overlay, Some(overlay_hiding("A")));
        assert_eq!(write.placements, None);
    }

    #[test]
    fn test_saved_waits_for_newer_pending_write() {
        let mut reconciler = AutosaveReconciler::new();
        let ticket = reconciler.record(LocalChange::Placements(placements("a")));
        let (id, _) = reconciler.take_due(ticket).unwrap();
        reconciler.record(LocalChange::Placements(placements("b")));
        assert_eq!(reconciler.write_finished(id, Ok(())), SaveStatus::Saving);
    }

    #[test]
    fn test_echo_suppressed_exactly_once() {
        let mut reconciler = AutosaveReconciler::new();
        assert!(reconciler.accept_remote_refresh());

        reconciler.record(LocalChange::Placements(placements("a")));
        reconciler.record(LocalChange::Placements(placements("b")));
        assert!(reconciler.pending_local_echo());
        assert!(!reconciler.accept_remote_refresh());
        assert!(reconciler.accept_remote_refresh());
    }

    #[test]
    fn test_refresh_gate() {
        let mut reconciler = AutosaveReconciler::new();
        assert_eq!(reconciler.gate_refresh(false, false), RefreshGate::Apply);

        reconciler.record(LocalChange::Placements(placements("a")));
        assert_eq!(reconciler.gate_refresh(true, false), RefreshGate::Apply);
        assert!(reconciler.pending_local_echo());

        // A refresh during a drag leaves the echo flag for the next one
        assert_eq!(reconciler.gate_refresh(false, true), RefreshGate::SkippedDuringDrag);
        assert!(reconciler.pending_local_echo());
        assert_eq!(reconciler.gate_refresh(false, false), RefreshGate::SuppressedEcho);
        assert_eq!(reconciler.gate_refresh(false, false), RefreshGate::Apply);
    }

    #[test]
    fn test_flush_ignores_debounce_window() {
        let mut reconciler = AutosaveReconciler::new();
        assert_eq!(reconciler.flush(), None);
        reconciler.record(LocalChange::Placements(placements("a")));
        assert!(reconciler.flush().is_some());
        assert_eq!(reconciler.in_flight(), 1);
        assert_eq!(reconciler.flush(), None);
    }
}
