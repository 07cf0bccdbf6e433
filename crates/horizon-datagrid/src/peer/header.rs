//! Operations of column header peers.
//!
//! Row header peers carry no operations; they only describe themselves.

use horizon_datagrid_core::DataGridHost;

use crate::error::{AutomationError, Result};

use super::{Capability, Peer, PeerKind};

impl Peer {
    fn column_of(&self) -> usize {
        match self.kind {
            PeerKind::ColumnHeader(column) => column,
            _ => unreachable!("header operation dispatched to a non-header peer"),
        }
    }

    /// Sorts by this column, toggling direction on repeat invocations.
    pub(super) fn column_header_invoke(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        self.require_capability(Capability::Invoke)?;
        if ctx.host.sort_column(self.column_of()) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    /// Resizes the column to `width`.
    pub(super) fn column_header_resize(&self, width: f32) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        self.require_capability(Capability::Transform)?;
        if !width.is_finite() || width <= 0.0 {
            return Err(AutomationError::OperationCannotBePerformed);
        }
        if ctx.host.set_column_width(self.column_of(), width) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    pub(super) fn column_header_scroll_into_view(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        self.require_capability(Capability::ScrollItem)?;
        if ctx.host.scroll_column_into_view(self.column_of()) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }
}
