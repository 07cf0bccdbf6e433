//! Operations of item (logical row) peers.
//!
//! An item peer represents a data row whether or not the row is realized.
//! Selection commands targeting a row other than the one being edited are
//! sequenced against the grid's focus-loss protocol: deferred while the
//! grid waits for focus loss, committing the pending edit before applying.

use std::sync::Arc;

use horizon_datagrid_core::{DataGridHost, EditingUnit, SelectionAction, SelectionMode};

use crate::error::{AutomationError, Result};
use crate::realization;
use crate::sequencer::CommandKey;

use super::{Capability, Peer, PeerKind, RowBacking};

impl Peer {
    fn item_id_of(&self) -> horizon_datagrid_core::ItemId {
        match self.kind {
            PeerKind::Item(item) => item,
            _ => unreachable!("item operation dispatched to a non-item peer"),
        }
    }

    /// Begins editing the row, committing first when the row is already
    /// being edited.
    pub(super) fn item_invoke(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        self.require_capability(Capability::Invoke)?;
        let item = self.item_id_of();
        let row = host
            .row_index_of(item)
            .ok_or(AutomationError::OperationCannotBePerformed)?;

        if matches!(self.backing(), RowBacking::Unrealized) {
            realization::ensure_row_realized(&ctx, row, None)?;
        }

        if host.editing_row_index() == Some(row) {
            // Invoking the row being edited commits it.
            return if host.commit_edit(EditingUnit::Row, true) {
                Ok(())
            } else {
                Err(AutomationError::OperationCannotBePerformed)
            };
        }

        let mut chained = false;
        if host.editing_row_index().is_some() {
            let this = ctx.registry.get_or_create(&ctx, self.kind);
            let deferred = ctx.sequencer.defer_until_focus_loss(
                host,
                CommandKey::InvokeItem(item),
                Box::new(move || {
                    if let Err(err) = this.invoke() {
                        tracing::warn!(?err, "deferred invoke failed");
                    }
                }),
            );
            if deferred {
                return Ok(());
            }
            ctx.sequencer.commit_pending_edit(host)?;
            chained = true;
        }

        let layout = host.group_layout();
        let slot = layout
            .slot_from_row_index(row)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        let column = host.current_column().unwrap_or(0);
        let ok = host.update_selection_and_currency(column, slot, SelectionAction::SelectCurrent, false)
            && host.begin_edit();
        if chained {
            ctx.sequencer.finish();
        }
        if ok {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    pub(super) fn item_scroll_into_view(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        self.require_capability(Capability::ScrollItem)?;
        let row = ctx
            .host
            .row_index_of(self.item_id_of())
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        if ctx.host.scroll_row_into_view(row, None) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    pub(super) fn item_is_selected(&self) -> Result<bool> {
        let ctx = self.context()?;
        let row = ctx
            .host
            .row_index_of(self.item_id_of())
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok(ctx.host.is_row_selected(row))
    }

    /// Clears the selection and selects this row, sequencing against a
    /// pending edit in another row.
    pub(super) fn item_select(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let item = self.item_id_of();
        let row = host
            .row_index_of(item)
            .ok_or(AutomationError::OperationCannotBePerformed)?;

        let mut chained = false;
        if host.editing_row_index().is_some_and(|editing| editing != row) {
            let this = ctx.registry.get_or_create(&ctx, self.kind);
            let deferred = ctx.sequencer.defer_until_focus_loss(
                host,
                CommandKey::SelectItem(item),
                Box::new(move || {
                    if let Err(err) = this.select() {
                        tracing::warn!(?err, "deferred select failed");
                    }
                }),
            );
            if deferred {
                return Ok(());
            }
            ctx.sequencer.commit_pending_edit(host)?;
            chained = true;
        }

        let layout = host.group_layout();
        let slot = layout
            .slot_from_row_index(row)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        let column = host.current_column().unwrap_or(0);
        let ok =
            host.update_selection_and_currency(column, slot, SelectionAction::SelectCurrent, false);
        if chained {
            ctx.sequencer.finish();
        }
        if ok {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    /// Adds this row to the selection.
    ///
    /// In single-selection mode, adding an unselected row while another row
    /// is selected is a precondition violation; the selection is left
    /// untouched.
    pub(super) fn item_add_to_selection(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let row = host
            .row_index_of(self.item_id_of())
            .ok_or(AutomationError::OperationCannotBePerformed)?;

        if host.selection_mode() == SelectionMode::Single
            && !host.selected_rows().is_empty()
            && !host.is_row_selected(row)
        {
            return Err(AutomationError::OperationCannotBePerformed);
        }

        let slot = host
            .group_layout()
            .slot_from_row_index(row)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        if host.set_row_selection(slot, true, false) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    /// Removes this row from the selection.
    ///
    /// Removing the row currently being edited cancels the edit via
    /// exit-editing-mode instead of committing, so no edit side effects
    /// leak out of a deselection.
    pub(super) fn item_remove_from_selection(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let item = self.item_id_of();
        let row = host
            .row_index_of(item)
            .ok_or(AutomationError::OperationCannotBePerformed)?;

        let mut chained = false;
        if host.editing_row_index() == Some(row) {
            let this = ctx.registry.get_or_create(&ctx, self.kind);
            let deferred = ctx.sequencer.defer_until_focus_loss(
                host,
                CommandKey::RemoveItem(item),
                Box::new(move || {
                    if let Err(err) = this.remove_from_selection() {
                        tracing::warn!(?err, "deferred deselect failed");
                    }
                }),
            );
            if deferred {
                return Ok(());
            }
            ctx.sequencer.cancel_pending_edit(host)?;
            chained = true;
        }

        let slot = host
            .group_layout()
            .slot_from_row_index(row)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        let ok = host.set_row_selection(slot, false, false);
        if chained {
            ctx.sequencer.finish();
        }
        if ok {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    /// The current cell of this row, when the row is realized and current.
    pub(super) fn item_selection(&self) -> Result<Vec<Arc<Peer>>> {
        let ctx = self.context()?;
        let host = ctx.host.as_ref();
        let item = self.item_id_of();
        let Some(row) = host.row_index_of(item) else {
            return Ok(Vec::new());
        };
        let layout = host.group_layout();
        let Some(slot) = layout.slot_from_row_index(row) else {
            return Ok(Vec::new());
        };
        if host.current_slot() != Some(slot) || !host.is_slot_realized(slot) {
            return Ok(Vec::new());
        }
        let Some(column) = host.current_column() else {
            return Ok(Vec::new());
        };
        Ok(vec![
            ctx.registry
                .get_or_create(&ctx, PeerKind::Cell { item, column }),
        ])
    }
}
