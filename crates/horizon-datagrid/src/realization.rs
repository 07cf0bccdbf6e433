//! Realization of off-screen elements.
//!
//! Any operation that needs live geometry or a concrete on-screen element
//! for a logical row or group goes through here: if the target is not
//! currently realized, the grid is asked to scroll it into view, and the
//! element is re-resolved afterwards. A target that cannot be realized —
//! removed, out of range, hidden inside a collapsed group — fails the
//! operation instead of yielding a stale or fabricated snapshot.

use horizon_datagrid_core::{DataGridHost, GroupId, RealizedRow};

use crate::automation::AutomationContext;
use crate::error::{AutomationError, Result};

/// Resolves the realized element for a data row, scrolling it into view
/// first when necessary.
pub(crate) fn ensure_row_realized(
    ctx: &AutomationContext,
    row_index: usize,
    column: Option<usize>,
) -> Result<RealizedRow> {
    let host = ctx.host.as_ref();
    let slot = host
        .group_layout()
        .slot_from_row_index(row_index)
        .ok_or(AutomationError::OperationCannotBePerformed)?;
    if let Some(realized) = host.realized_row(slot) {
        return Ok(realized);
    }

    tracing::debug!(row_index, slot = slot.0, "realizing off-screen row");
    if !host.scroll_row_into_view(row_index, column) {
        tracing::warn!(row_index, "row could not be scrolled into view");
        return Err(AutomationError::OperationCannotBePerformed);
    }

    // Scrolling shifts the realized window, so re-resolve from scratch.
    let slot = host
        .group_layout()
        .slot_from_row_index(row_index)
        .ok_or(AutomationError::OperationCannotBePerformed)?;
    host.realized_row(slot).ok_or_else(|| {
        tracing::warn!(row_index, "row did not realize after scrolling");
        AutomationError::OperationCannotBePerformed
    })
}

/// Resolves the realized header element for a group, scrolling it into view
/// first when necessary.
pub(crate) fn ensure_group_realized(ctx: &AutomationContext, group: GroupId) -> Result<RealizedRow> {
    let host = ctx.host.as_ref();
    let slot = host
        .group_layout()
        .group(group)
        .map(|g| g.slot)
        .ok_or(AutomationError::OperationCannotBePerformed)?;
    if let Some(realized) = host.realized_row(slot) {
        return Ok(realized);
    }

    tracing::debug!(group = group.0, slot = slot.0, "realizing off-screen group header");
    if !host.scroll_group_into_view(group) {
        tracing::warn!(group = group.0, "group could not be scrolled into view");
        return Err(AutomationError::OperationCannotBePerformed);
    }

    let slot = host
        .group_layout()
        .group(group)
        .map(|g| g.slot)
        .ok_or(AutomationError::OperationCannotBePerformed)?;
    host.realized_row(slot).ok_or_else(|| {
        tracing::warn!(group = group.0, "group header did not realize after scrolling");
        AutomationError::OperationCannotBePerformed
    })
}
