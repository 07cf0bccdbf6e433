//! Operations of cell peers.

use std::sync::Arc;

use horizon_datagrid_core::{DataGridHost, EditingUnit, ItemId, SelectionAction, Slot};

use crate::error::{AutomationError, Result};
use crate::sequencer::CommandKey;

use super::{Capability, Peer, PeerKind};

/// A cell's position within its containing grid.
///
/// Row and column are in the canonical automation coordinate spaces: data
/// rows and data columns only, zero-based. Spans are always 1 — the grid
/// has no merged cells.
#[derive(Debug, Clone)]
pub struct GridItemInfo {
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub column_span: usize,
    /// The root peer of the grid containing this cell.
    pub containing_grid: Arc<Peer>,
}

impl Peer {
    fn cell_of(&self) -> (ItemId, usize) {
        match self.kind {
            PeerKind::Cell { item, column } => (item, column),
            _ => unreachable!("cell operation dispatched to a non-cell peer"),
        }
    }

    fn cell_position(&self) -> Result<(ItemId, usize, usize, Slot)> {
        let ctx = self.context()?;
        let (item, column) = self.cell_of();
        let host = ctx.host.as_ref();
        let row = host
            .row_index_of(item)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        let slot = host
            .group_layout()
            .slot_from_row_index(row)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok((item, column, row, slot))
    }

    pub(super) fn cell_grid_item(&self) -> Result<GridItemInfo> {
        let ctx = self.context()?;
        let (item, column) = self.cell_of();
        let row = ctx
            .host
            .row_index_of(item)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok(GridItemInfo {
            row,
            column,
            row_span: 1,
            column_span: 1,
            containing_grid: ctx.registry.get_or_create(&ctx, PeerKind::Grid),
        })
    }

    /// Begins editing this cell, or commits when this exact cell is already
    /// being edited.
    pub(super) fn cell_invoke(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        self.require_capability(Capability::Invoke)?;
        let host = ctx.host.as_ref();
        let (item, column, row, slot) = self.cell_position()?;

        if host.editing_row_index() == Some(row) && host.editing_column() == Some(column) {
            return if host.commit_edit(EditingUnit::Cell, true) {
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
                CommandKey::InvokeCell(item, column),
                Box::new(move || {
                    if let Err(err) = this.invoke() {
                        tracing::warn!(?err, "deferred cell invoke failed");
                    }
                }),
            );
            if deferred {
                return Ok(());
            }
            ctx.sequencer.commit_pending_edit(host)?;
            chained = true;
        }

        let ok = host.update_selection_and_currency(column, slot, SelectionAction::SelectCurrent, true)
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

    /// Makes this cell current and its row the selection.
    pub(super) fn cell_select(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let (item, column, row, slot) = self.cell_position()?;

        let editing_elsewhere = match (host.editing_row_index(), host.editing_column()) {
            (Some(editing_row), editing_column) => {
                editing_row != row || editing_column != Some(column)
            }
            (None, _) => false,
        };

        let mut chained = false;
        if editing_elsewhere {
            let this = ctx.registry.get_or_create(&ctx, self.kind);
            let deferred = ctx.sequencer.defer_until_focus_loss(
                host,
                CommandKey::SelectCell(item, column),
                Box::new(move || {
                    if let Err(err) = this.select() {
                        tracing::warn!(?err, "deferred cell select failed");
                    }
                }),
            );
            if deferred {
                return Ok(());
            }
            ctx.sequencer.commit_pending_edit(host)?;
            chained = true;
        }

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

    /// Adding a cell to the selection is valid only for the current cell —
    /// a no-op success then, a precondition violation otherwise.
    pub(super) fn cell_add_to_selection(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let (_, column, _, slot) = self.cell_position()?;
        if host.current_slot() == Some(slot) && host.current_column() == Some(column) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    /// Removing the current cell from the selection is refused; any other
    /// cell is already outside the cell-level selection and the request is
    /// a no-op success.
    pub(super) fn cell_remove_from_selection(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let (_, column, _, slot) = self.cell_position()?;
        if host.current_slot() == Some(slot) && host.current_column() == Some(column) {
            Err(AutomationError::OperationCannotBePerformed)
        } else {
            Ok(())
        }
    }

    pub(super) fn cell_is_selected(&self) -> Result<bool> {
        let ctx = self.context()?;
        let (item, _) = self.cell_of();
        let row = ctx
            .host
            .row_index_of(item)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok(ctx.host.is_row_selected(row))
    }

    pub(super) fn cell_scroll_into_view(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        self.require_capability(Capability::ScrollItem)?;
        let (_, column, row, _) = self.cell_position()?;
        if ctx.host.scroll_row_into_view(row, Some(column)) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    /// The header peer of this cell's column, when headers are shown.
    pub(super) fn cell_column_header_items(&self) -> Result<Vec<Arc<Peer>>> {
        let ctx = self.context()?;
        let (_, column) = self.cell_of();
        if !ctx.host.are_column_headers_visible() || ctx.host.column(column).is_none() {
            return Ok(Vec::new());
        }
        Ok(vec![
            ctx.registry.get_or_create(&ctx, PeerKind::ColumnHeader(column)),
        ])
    }

    /// The header peer of this cell's row, when row headers are shown.
    pub(super) fn cell_row_header_items(&self) -> Result<Vec<Arc<Peer>>> {
        let ctx = self.context()?;
        let (item, _) = self.cell_of();
        if !ctx.host.are_row_headers_visible() || ctx.host.row_index_of(item).is_none() {
            return Ok(Vec::new());
        }
        Ok(vec![
            ctx.registry.get_or_create(&ctx, PeerKind::RowHeader(item)),
        ])
    }
}
