//! Core grid model for Horizon DataGrid.
//!
//! This crate provides the model layer that the `horizon-datagrid` automation
//! adapter is built against:
//!
//! - **Slot layout**: the mapping between the grid's dense slot coordinate
//!   space (every visible line, group headers included) and the group-free
//!   data row index space
//! - **Groups**: nested row group metadata with expand/collapse state
//! - **Columns**: column metadata (kind, read-only, sort, resize policy)
//! - **Host contract**: the [`DataGridHost`] trait describing the surface a
//!   grid implementation exposes to the automation layer
//! - **Signals**: direct-invocation change notifications
//! - **SimpleDataGrid**: an in-memory, headless reference grid for tests,
//!   examples, and embedding without a rendering stack
//!
//! # Slot Example
//!
//! ```
//! use horizon_datagrid_core::{GroupDesc, SimpleDataGrid, ColumnInfo, DataGridHost, Slot};
//!
//! let grid = SimpleDataGrid::new(vec![ColumnInfo::new("Name")])
//!     .with_rows(vec![vec!["a".into()], vec!["b".into()], vec!["c".into()]])
//!     .with_groups(vec![GroupDesc::rows("Group A", 2), GroupDesc::rows("Group B", 1)]);
//!
//! let layout = grid.group_layout();
//! // Slot 0 is Group A's header, slots 1-2 its rows, slot 3 Group B's header.
//! assert_eq!(layout.row_index_from_slot(Slot(1)), Some(0));
//! assert_eq!(layout.slot_from_row_index(2), Some(Slot(4)));
//! ```

mod column;
mod geometry;
mod host;
mod layout;
mod signal;
mod simple;

pub use column::{ColumnInfo, ColumnKind, SortDirection, DEFAULT_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
pub use geometry::Rect;
pub use host::{
    DataGridHost, EditingUnit, GridSignals, ItemId, Orientation, RealizedRow, ScrollExtent,
    SelectionAction, SelectionMode,
};
pub use layout::{GroupId, GroupLayout, RowGroupInfo, Slot, SlotContent};
pub use signal::{ConnectionId, Signal};
pub use simple::{GroupChildren, GroupDesc, SimpleDataGrid};
