//! Operations of the grid root peer.

use std::sync::Arc;

use horizon_datagrid_core::DataGridHost;

use crate::error::{AutomationError, Result};
use crate::realization;

use super::{Peer, PeerKind};

impl Peer {
    pub(super) fn grid_row_count(&self) -> Result<usize> {
        let ctx = self.context()?;
        Ok(ctx.host.row_count())
    }

    /// Resolves the cell at absolute `(row, column)`, realizing its row
    /// first.
    pub(super) fn grid_get_item(&self, row: usize, column: usize) -> Result<Arc<Peer>> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        if row >= host.row_count() || column >= host.column_count() {
            return Err(AutomationError::OperationCannotBePerformed);
        }
        realization::ensure_row_realized(&ctx, row, Some(column))?;
        let item = host
            .item_id(row)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok(ctx
            .registry
            .get_or_create(&ctx, PeerKind::Cell { item, column }))
    }

    /// Item peers of all selected rows, ascending by row index.
    pub(super) fn grid_selection(&self) -> Result<Vec<Arc<Peer>>> {
        let ctx = self.context()?;
        let host = ctx.host.as_ref();
        Ok(host
            .selected_rows()
            .into_iter()
            .filter_map(|row| host.item_id(row))
            .map(|item| ctx.registry.get_or_create(&ctx, PeerKind::Item(item)))
            .collect())
    }

    /// Header peers of every column, when column headers are shown.
    pub(super) fn grid_column_headers(&self) -> Result<Vec<Arc<Peer>>> {
        let ctx = self.context()?;
        if !ctx.host.are_column_headers_visible() {
            return Ok(Vec::new());
        }
        Ok((0..ctx.host.column_count())
            .map(|column| ctx.registry.get_or_create(&ctx, PeerKind::ColumnHeader(column)))
            .collect())
    }

    /// Header peers of every row, when row headers are shown.
    pub(super) fn grid_row_headers(&self) -> Result<Vec<Arc<Peer>>> {
        let ctx = self.context()?;
        let host = ctx.host.as_ref();
        if !host.are_row_headers_visible() {
            return Ok(Vec::new());
        }
        Ok((0..host.row_count())
            .filter_map(|row| host.item_id(row))
            .map(|item| ctx.registry.get_or_create(&ctx, PeerKind::RowHeader(item)))
            .collect())
    }
}
