//! The automation entry point for one grid instance.

use std::sync::Arc;

use horizon_datagrid_core::{ConnectionId, DataGridHost, GroupId};

use crate::error::{AutomationError, Result};
use crate::peer::{Peer, PeerKind};
use crate::realization;
use crate::registry::PeerRegistry;
use crate::sequencer::{EditSequencer, SequencerState};

/// Shared state behind every peer of one grid: the host, the peer registry,
/// and the command sequencer. Peers hold a weak back-reference to this
/// context, mirroring the back-reference every peer keeps to its grid peer.
pub(crate) struct AutomationContext {
    pub(crate) host: Arc<dyn DataGridHost>,
    pub(crate) registry: PeerRegistry,
    pub(crate) sequencer: EditSequencer,
}

/// Accessibility automation for one grid.
///
/// `DataGridAutomation` owns the peer registry and the edit/selection
/// sequencer for a grid, and wires itself to the grid's notification
/// signals: a virtualization pass invalidates the registry, and focus-loss
/// completion resumes any deferred command.
///
/// All operations execute on the grid's owning thread; the only suspension
/// point is the focus-loss deferral inside the sequencer, which returns
/// immediately and re-invokes the command later on the same thread.
pub struct DataGridAutomation {
    ctx: Arc<AutomationContext>,
    virtualization_conn: ConnectionId,
    focus_loss_conn: ConnectionId,
}

impl DataGridAutomation {
    /// Creates the automation layer for `host` and connects to its signals.
    pub fn new(host: Arc<dyn DataGridHost>) -> Self {
        let ctx = Arc::new(AutomationContext {
            host,
            registry: PeerRegistry::new(),
            sequencer: EditSequencer::new(),
        });

        let weak = Arc::downgrade(&ctx);
        let virtualization_conn = ctx.host.signals().virtualization_changed.connect(move |_| {
            if let Some(ctx) = weak.upgrade() {
                ctx.registry.invalidate(ctx.host.as_ref());
            }
        });
        let weak = Arc::downgrade(&ctx);
        let focus_loss_conn = ctx.host.signals().focus_loss_complete.connect(move |_| {
            if let Some(ctx) = weak.upgrade() {
                ctx.sequencer.on_focus_loss_complete();
            }
        });

        Self {
            ctx,
            virtualization_conn,
            focus_loss_conn,
        }
    }

    /// The grid root peer.
    pub fn root_peer(&self) -> Arc<Peer> {
        self.ctx.registry.get_or_create(&self.ctx, PeerKind::Grid)
    }

    /// The peer for the data row at `row_index`, realizing the row first.
    ///
    /// An off-screen row is scrolled into view before the peer is returned,
    /// so its bounds and focusability answers are live. Fails when the row
    /// does not exist or cannot be realized.
    pub fn item_peer(&self, row_index: usize) -> Result<Arc<Peer>> {
        realization::ensure_row_realized(&self.ctx, row_index, None)?;
        let item = self
            .ctx
            .host
            .item_id(row_index)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok(self.ctx.registry.get_or_create(&self.ctx, PeerKind::Item(item)))
    }

    /// The peer for a group, realizing its header line first.
    pub fn group_peer(&self, group: GroupId) -> Result<Arc<Peer>> {
        realization::ensure_group_realized(&self.ctx, group)?;
        Ok(self
            .ctx
            .registry
            .get_or_create(&self.ctx, PeerKind::Group(group)))
    }

    /// The peer for the cell at `(row_index, column)`, realizing its row
    /// first.
    pub fn cell_peer(&self, row_index: usize, column: usize) -> Result<Arc<Peer>> {
        if column >= self.ctx.host.column_count() {
            return Err(AutomationError::OperationCannotBePerformed);
        }
        realization::ensure_row_realized(&self.ctx, row_index, Some(column))?;
        let item = self
            .ctx
            .host
            .item_id(row_index)
            .ok_or(AutomationError::OperationCannotBePerformed)?;
        Ok(self
            .ctx
            .registry
            .get_or_create(&self.ctx, PeerKind::Cell { item, column }))
    }

    /// The peer for a column's header.
    pub fn column_header_peer(&self, column: usize) -> Result<Arc<Peer>> {
        if column >= self.ctx.host.column_count() {
            return Err(AutomationError::OperationCannotBePerformed);
        }
        Ok(self
            .ctx
            .registry
            .get_or_create(&self.ctx, PeerKind::ColumnHeader(column)))
    }

    /// Looks up a live peer by its AccessKit node ID.
    pub fn peer_from_node_id(&self, id: accesskit::NodeId) -> Option<Arc<Peer>> {
        self.ctx.registry.peer_by_node_id(id)
    }

    /// The registry's current realization epoch.
    pub fn epoch(&self) -> u64 {
        self.ctx.registry.epoch()
    }

    /// Number of live peers in the registry.
    pub fn live_peer_count(&self) -> usize {
        self.ctx.registry.len()
    }

    /// Current phase of the command sequencer.
    pub fn sequencer_state(&self) -> SequencerState {
        self.ctx.sequencer.state()
    }

    pub(crate) fn ctx(&self) -> &Arc<AutomationContext> {
        &self.ctx
    }
}

impl Drop for DataGridAutomation {
    fn drop(&mut self) {
        let signals = self.ctx.host.signals();
        signals
            .virtualization_changed
            .disconnect(self.virtualization_conn);
        signals.focus_loss_complete.disconnect(self.focus_loss_conn);
    }
}
