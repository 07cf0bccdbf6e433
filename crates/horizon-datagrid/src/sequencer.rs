//! Sequencing of accessibility commands against the grid's edit lifecycle.
//!
//! A selection or invoke command that arrives while the grid holds an
//! uncommitted edit in a different row or cell must not interleave with the
//! grid's own focus-loss protocol. The sequencer captures such a command as
//! a one-shot continuation, re-runs it when the grid reports
//! `focus_loss_complete`, and tracks the command chain through an explicit
//! state machine:
//!
//! ```text
//! Idle -> AwaitingFocusLoss -> Committing -> Applying -> Idle
//!                 |                  |
//!                 |                  +--(commit fails)--> Idle, command fails
//!                 +--(re-entrant submission)--> continuation re-armed
//! ```
//!
//! Only one continuation is armed at a time: a re-entrant submission with
//! the same command key re-arms it, and a newer command supersedes an older
//! one. The calling thread never blocks — deferral returns immediately and
//! the continuation runs later on the same thread.

use parking_lot::Mutex;

use horizon_datagrid_core::{DataGridHost, EditingUnit, GroupId, ItemId};

use crate::error::{AutomationError, Result};

/// Phase of the currently running command chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerState {
    /// No command chain in progress.
    #[default]
    Idle,
    /// A command is parked, waiting for the grid's focus-loss protocol.
    AwaitingFocusLoss,
    /// The pending edit is being committed (or canceled) on the command's
    /// behalf.
    Committing,
    /// The command itself is being applied.
    Applying,
}

/// Identifies a deferred command for re-arm/supersede decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandKey {
    SelectItem(ItemId),
    RemoveItem(ItemId),
    InvokeItem(ItemId),
    SelectCell(ItemId, usize),
    InvokeCell(ItemId, usize),
    ExpandGroup(GroupId),
    CollapseGroup(GroupId),
}

struct Pending {
    key: CommandKey,
    run: Box<dyn FnOnce() + Send>,
}

/// The per-grid command sequencer.
pub struct EditSequencer {
    state: Mutex<SequencerState>,
    pending: Mutex<Option<Pending>>,
}

impl EditSequencer {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SequencerState::Idle),
            pending: Mutex::new(None),
        }
    }

    /// Current phase.
    pub fn state(&self) -> SequencerState {
        *self.state.lock()
    }

    /// Returns `true` if a continuation is armed.
    pub fn has_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Parks `run` until focus loss completes, if the grid is currently
    /// waiting for it. Returns `false` when the grid is not in that window
    /// and the caller should proceed synchronously.
    pub(crate) fn defer_until_focus_loss(
        &self,
        host: &dyn DataGridHost,
        key: CommandKey,
        run: Box<dyn FnOnce() + Send>,
    ) -> bool {
        if !host.is_awaiting_focus_loss() {
            return false;
        }
        let mut pending = self.pending.lock();
        match pending.as_ref() {
            Some(previous) if previous.key == key => {
                tracing::debug!(?key, "re-arming deferred command");
            }
            Some(previous) => {
                tracing::debug!(superseded = ?previous.key, ?key, "superseding deferred command");
            }
            None => {
                tracing::debug!(?key, "deferring command until focus loss completes");
            }
        }
        *pending = Some(Pending { key, run });
        *self.state.lock() = SequencerState::AwaitingFocusLoss;
        true
    }

    /// Commits the grid's pending edit on behalf of a command chain.
    ///
    /// On success the chain moves to `Applying`; on failure the chain is
    /// abandoned and the command fails without partial effects.
    pub(crate) fn commit_pending_edit(&self, host: &dyn DataGridHost) -> Result<()> {
        *self.state.lock() = SequencerState::Committing;
        if host.commit_edit(EditingUnit::Row, true) {
            *self.state.lock() = SequencerState::Applying;
            Ok(())
        } else {
            tracing::warn!("pending edit failed to commit; command chain aborted");
            *self.state.lock() = SequencerState::Idle;
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    /// Cancels the grid's pending edit (exit-editing-mode) on behalf of a
    /// command chain whose semantics forbid committing side effects.
    pub(crate) fn cancel_pending_edit(&self, host: &dyn DataGridHost) -> Result<()> {
        *self.state.lock() = SequencerState::Committing;
        if host.cancel_edit(EditingUnit::Row) {
            *self.state.lock() = SequencerState::Applying;
            Ok(())
        } else {
            *self.state.lock() = SequencerState::Idle;
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    /// Ends a command chain, successful or not.
    pub(crate) fn finish(&self) {
        *self.state.lock() = SequencerState::Idle;
    }

    /// Runs the armed continuation, if any. Invoked when the grid reports
    /// that its focus-loss protocol completed.
    pub(crate) fn on_focus_loss_complete(&self) {
        let pending = self.pending.lock().take();
        *self.state.lock() = SequencerState::Idle;
        if let Some(pending) = pending {
            tracing::debug!(key = ?pending.key, "focus loss complete; re-running deferred command");
            (pending.run)();
        }
    }
}

impl std::fmt::Debug for EditSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSequencer")
            .field("state", &self.state())
            .field("has_pending", &self.has_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_datagrid_core::{ColumnInfo, SelectionAction, SimpleDataGrid, Slot};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn editing_grid() -> SimpleDataGrid {
        let grid = SimpleDataGrid::new(vec![ColumnInfo::new("A")])
            .with_rows(vec![vec!["x".into()], vec!["y".into()]]);
        assert!(grid.update_selection_and_currency(
            0,
            Slot(0),
            SelectionAction::SelectCurrent,
            false
        ));
        assert!(grid.begin_edit());
        grid.hold_focus();
        grid
    }

    #[test]
    fn test_no_deferral_when_focus_settled() {
        let grid = SimpleDataGrid::new(vec![ColumnInfo::new("A")]);
        let sequencer = EditSequencer::new();
        let deferred = sequencer.defer_until_focus_loss(
            &grid,
            CommandKey::SelectItem(horizon_datagrid_core::ItemId(1)),
            Box::new(|| {}),
        );
        assert!(!deferred);
        assert_eq!(sequencer.state(), SequencerState::Idle);
    }

    #[test]
    fn test_continuation_runs_once_after_focus_loss() {
        let grid = editing_grid();
        let sequencer = EditSequencer::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let runs_clone = runs.clone();
        let deferred = sequencer.defer_until_focus_loss(
            &grid,
            CommandKey::SelectItem(horizon_datagrid_core::ItemId(2)),
            Box::new(move || {
                runs_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert!(deferred);
        assert_eq!(sequencer.state(), SequencerState::AwaitingFocusLoss);

        sequencer.on_focus_loss_complete();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!sequencer.has_pending());

        // A second completion finds nothing to run.
        sequencer.on_focus_loss_complete();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rearm_replaces_previous_continuation() {
        let grid = editing_grid();
        let sequencer = EditSequencer::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let key = CommandKey::SelectItem(horizon_datagrid_core::ItemId(2));
        let first_clone = first.clone();
        assert!(sequencer.defer_until_focus_loss(
            &grid,
            key,
            Box::new(move || {
                first_clone.fetch_add(1, Ordering::SeqCst);
            })
        ));
        let second_clone = second.clone();
        assert!(sequencer.defer_until_focus_loss(
            &grid,
            key,
            Box::new(move || {
                second_clone.fetch_add(1, Ordering::SeqCst);
            })
        ));

        sequencer.on_focus_loss_complete();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_commit_failure_aborts_chain() {
        let grid = editing_grid();
        grid.complete_focus_loss();
        grid.set_commit_allowed(false);

        let sequencer = EditSequencer::new();
        assert_eq!(
            sequencer.commit_pending_edit(&grid),
            Err(AutomationError::OperationCannotBePerformed)
        );
        assert_eq!(sequencer.state(), SequencerState::Idle);
    }
}
