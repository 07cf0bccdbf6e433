//! Identity cache for peers.
//!
//! Exactly one live peer exists per domain object: requesting a peer for
//! the same object twice returns the same instance until the registry is
//! invalidated. Invalidation happens on every virtualization pass
//! (scrolling, sorting, grouping changes, row/column changes): the epoch
//! counter advances, peers whose domain object no longer resolves are
//! dropped, and survivors are re-stamped so their identity carries over.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use accesskit::NodeId;
use parking_lot::Mutex;

use horizon_datagrid_core::{DataGridHost, GroupLayout};

use crate::automation::AutomationContext;
use crate::peer::{Peer, PeerKind};

/// The per-grid peer cache.
pub struct PeerRegistry {
    peers: Mutex<HashMap<PeerKind, Arc<Peer>>>,
    epoch: AtomicU64,
    next_node_id: AtomicU64,
}

impl PeerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            peers: Mutex::new(HashMap::new()),
            epoch: AtomicU64::new(0),
            // NodeId 0 is reserved by some AccessKit consumers; start above it.
            next_node_id: AtomicU64::new(1),
        }
    }

    /// The current realization epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Number of live peers.
    pub fn len(&self) -> usize {
        self.peers.lock().len()
    }

    /// Returns `true` if no peer is cached.
    pub fn is_empty(&self) -> bool {
        self.peers.lock().is_empty()
    }

    /// Returns the live peer for `kind`, creating it on first request.
    ///
    /// # Panics
    ///
    /// Panics when the domain object behind `kind` does not exist in the
    /// host — requesting a peer for a nonexistent object is a caller
    /// contract violation and fails fast rather than returning a dangling
    /// peer.
    pub(crate) fn get_or_create(
        &self,
        ctx: &Arc<AutomationContext>,
        kind: PeerKind,
    ) -> Arc<Peer> {
        let layout = ctx.host.group_layout();
        assert!(
            domain_object_exists(ctx.host.as_ref(), &layout, &kind),
            "peer requested for a domain object that does not exist: {kind:?}"
        );

        let epoch = self.epoch();
        let mut peers = self.peers.lock();
        if let Some(peer) = peers.get(&kind) {
            if peer.creation_epoch() == epoch {
                return Arc::clone(peer);
            }
            // Stale entry that survived without re-stamping; replace it.
            peers.remove(&kind);
        }

        let node_id = NodeId(self.next_node_id.fetch_add(1, Ordering::Relaxed));
        let peer = Peer::new(ctx, kind, node_id, epoch);
        peers.insert(kind, Arc::clone(&peer));
        peer
    }

    /// Advances the epoch, drops peers whose domain object left the grid,
    /// and re-stamps the survivors.
    pub(crate) fn invalidate(&self, host: &dyn DataGridHost) {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        let layout = host.group_layout();
        let mut peers = self.peers.lock();
        peers.retain(|kind, peer| {
            let alive = domain_object_exists(host, &layout, kind);
            if alive {
                peer.stamp_epoch(epoch);
            }
            alive
        });
        tracing::debug!(epoch, live_peers = peers.len(), "peer registry invalidated");
    }

    /// Looks up a live peer by its AccessKit node ID.
    pub(crate) fn peer_by_node_id(&self, id: NodeId) -> Option<Arc<Peer>> {
        self.peers
            .lock()
            .values()
            .find(|p| p.node_id() == id)
            .cloned()
    }
}

fn domain_object_exists(host: &dyn DataGridHost, layout: &GroupLayout, kind: &PeerKind) -> bool {
    match kind {
        PeerKind::Grid => true,
        PeerKind::Item(item) | PeerKind::RowHeader(item) => host.row_index_of(*item).is_some(),
        PeerKind::Cell { item, column } => {
            host.row_index_of(*item).is_some() && *column < host.column_count()
        }
        PeerKind::Group(group) => layout.group(*group).is_some(),
        PeerKind::ColumnHeader(column) => *column < host.column_count(),
    }
}
