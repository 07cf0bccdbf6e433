//! Accessibility automation for virtualized, groupable data grids.
//!
//! This crate exposes a grid's logical row/column/group model to assistive
//! technology through a stable tree of capability-bearing peers, while the
//! grid itself only realizes a small visible window of its data at any time.
//! It is the glue between a [`DataGridHost`](horizon_datagrid_core::DataGridHost)
//! implementation and an AccessKit consumer:
//!
//! - **Peers** ([`Peer`], [`PeerKind`]): one cached adapter object per
//!   logical element — grid, row item, group, cell, column header, row
//!   header — created lazily and held in the [`PeerRegistry`]
//! - **Capabilities** ([`Capability`], [`CapabilitySet`]): the interaction
//!   patterns a peer offers, negotiated fresh on every query from live grid
//!   configuration
//! - **Realization**: operations referencing off-screen elements scroll
//!   them into view before proceeding, and fail cleanly when the target no
//!   longer exists
//! - **Sequencing** ([`EditSequencer`]): selection and invoke commands are
//!   serialized against the grid's pending-edit and focus-loss protocol
//! - **AccessKit**: peers build `accesskit::Node`s, the automation builds
//!   `TreeUpdate`s, and incoming `ActionRequest`s are routed back to typed
//!   peer operations
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_datagrid::DataGridAutomation;
//! use horizon_datagrid_core::{ColumnInfo, GroupDesc, SimpleDataGrid};
//!
//! let grid = Arc::new(
//!     SimpleDataGrid::new(vec![ColumnInfo::new("Task"), ColumnInfo::new("Owner")])
//!         .with_rows(vec![
//!             vec!["Triage".into(), "ana".into()],
//!             vec!["Review".into(), "ben".into()],
//!         ])
//!         .with_groups(vec![GroupDesc::rows("Open", 2)]),
//! );
//! let automation = DataGridAutomation::new(grid.clone());
//!
//! let root = automation.root_peer();
//! assert_eq!(root.row_count().unwrap(), 2);
//!
//! // Column headers plus the "Open" group.
//! let children = root.children();
//! assert_eq!(children.len(), 3);
//!
//! // The same logical object always resolves to the same peer.
//! let first = automation.item_peer(0).unwrap();
//! assert!(Arc::ptr_eq(&first, &automation.item_peer(0).unwrap()));
//! ```

mod automation;
mod capability;
mod error;
mod node;
mod peer;
mod realization;
mod registry;
mod sequencer;

pub use automation::DataGridAutomation;
pub use capability::{Capability, CapabilitySet};
pub use error::{AutomationError, Result};
pub use node::ControlType;
pub use peer::{ExpandCollapseState, GridItemInfo, Peer, PeerKind};
pub use registry::PeerRegistry;
pub use sequencer::{EditSequencer, SequencerState};
