//! Operations of group peers.
//!
//! A group peer is always a navigable container: it can expand and
//! collapse, enumerate its selection, and resolve contained cells by
//! group-relative coordinates. Item addressing relative to a group is
//! translated to absolute row indices before standard slot resolution.

use std::sync::Arc;

use horizon_datagrid_core::{DataGridHost, GroupId};

use crate::error::{AutomationError, Result};
use crate::realization;
use crate::sequencer::CommandKey;

use super::{Capability, Peer, PeerKind};

/// Expansion state of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandCollapseState {
    Expanded,
    Collapsed,
}

impl Peer {
    fn group_id_of(&self) -> GroupId {
        match self.kind {
            PeerKind::Group(group) => group,
            _ => unreachable!("group operation dispatched to a non-group peer"),
        }
    }

    /// Expands or collapses the group, sequencing against a pending edit.
    pub(super) fn group_set_expanded(&self, expanded: bool) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let group = self.group_id_of();

        let mut chained = false;
        if host.editing_row_index().is_some() {
            let this = ctx.registry.get_or_create(&ctx, self.kind);
            let key = if expanded {
                CommandKey::ExpandGroup(group)
            } else {
                CommandKey::CollapseGroup(group)
            };
            let deferred = ctx.sequencer.defer_until_focus_loss(
                host,
                key,
                Box::new(move || {
                    let result = if expanded { this.expand() } else { this.collapse() };
                    if let Err(err) = result {
                        tracing::warn!(?err, expanded, "deferred expand/collapse failed");
                    }
                }),
            );
            if deferred {
                return Ok(());
            }
            ctx.sequencer.commit_pending_edit(host)?;
            chained = true;
        }

        let ok = if expanded {
            host.expand_group(group)
        } else {
            host.collapse_group(group)
        };
        if chained {
            ctx.sequencer.finish();
        }
        if ok {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    pub(super) fn group_expand_collapse_state(&self) -> Result<ExpandCollapseState> {
        let ctx = self.context()?;
        let layout = ctx.host.group_layout();
        let info = layout
            .group(self.group_id_of())
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok(if info.expanded {
            ExpandCollapseState::Expanded
        } else {
            ExpandCollapseState::Collapsed
        })
    }

    /// Number of data rows in the group's subtree.
    pub(super) fn group_row_count(&self) -> Result<usize> {
        let ctx = self.context()?;
        let layout = ctx.host.group_layout();
        layout
            .group(self.group_id_of())
            .map(|g| g.item_count)
            .ok_or(AutomationError::OperationCannotBePerformed)
    }

    /// Resolves the cell at group-relative `(row, column)`.
    ///
    /// The group-relative row is translated to an absolute row index by
    /// adding the group's starting offset — its header slot minus the
    /// cumulative header count at or before it, plus one — then resolved
    /// through the standard realization path.
    pub(super) fn group_get_item(&self, row: usize, column: usize) -> Result<Arc<Peer>> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let group = self.group_id_of();
        let layout = host.group_layout();
        let info = layout
            .group(group)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        if row >= info.item_count || column >= host.column_count() {
            return Err(AutomationError::OperationCannotBePerformed);
        }
        let absolute_row = layout
            .group_start_row_index(group)
            .ok_or(AutomationError::OperationCannotBePerformed)?
            + row;

        realization::ensure_row_realized(&ctx, absolute_row, Some(column))?;

        let item = host
            .item_id(absolute_row)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok(ctx
            .registry
            .get_or_create(&ctx, PeerKind::Cell { item, column }))
    }

    /// The selected items that fall inside this group's row span.
    pub(super) fn group_selection(&self) -> Result<Vec<Arc<Peer>>> {
        let ctx = self.ensure_enabled()?;
        let host = ctx.host.as_ref();
        let layout = host.group_layout();
        let range = layout
            .group_row_range(self.group_id_of())
            .ok_or(AutomationError::OperationCannotBePerformed)?;

        Ok(host
            .selected_rows()
            .into_iter()
            .filter(|row| range.contains(row))
            .filter_map(|row| host.item_id(row))
            .map(|item| ctx.registry.get_or_create(&ctx, PeerKind::Item(item)))
            .collect())
    }

    pub(super) fn group_scroll_into_view(&self) -> Result<()> {
        let ctx = self.ensure_enabled()?;
        self.require_capability(Capability::ScrollItem)?;
        if ctx.host.scroll_group_into_view(self.group_id_of()) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }
}
