//! The contract a grid implementation exposes to the automation layer.
//!
//! [`DataGridHost`] is the consumed surface of the adapter: state queries,
//! realization requests, selection/currency updates, the edit lifecycle, and
//! group metadata. Mutating methods return `bool` — `true` when the request
//! was carried out — and the adapter translates refusals into its own error
//! taxonomy. All methods take `&self`; implementations use interior
//! mutability and are pinned to the grid's owning thread by convention even
//! though the types are `Send + Sync`.

use crate::column::ColumnInfo;
use crate::geometry::Rect;
use crate::layout::{GroupId, GroupLayout, Slot};
use crate::signal::Signal;

/// Stable identity of one data item (logical row) in the grid's item source.
///
/// Item IDs survive sorting and virtualization; they are only retired when
/// the item itself leaves the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

/// How many items may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one row selected at a time.
    #[default]
    Single,
    /// Any number of rows selected.
    Extended,
}

/// The selection change requested alongside a currency update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Clear the selection and select the target row.
    SelectCurrent,
    /// Add the target row to the selection.
    AddToSelection,
    /// Remove the target row from the selection.
    RemoveFromSelection,
}

/// Granularity of an edit commit or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingUnit {
    /// The editing cell only.
    Cell,
    /// The whole editing row.
    Row,
}

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// The extent of one scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollExtent {
    /// Total content length along the axis, in viewport units.
    pub extent: f32,
    /// Visible viewport length along the axis.
    pub viewport: f32,
}

impl ScrollExtent {
    /// Returns `true` if there is anything to scroll to.
    #[inline]
    pub fn can_scroll(&self) -> bool {
        self.extent > self.viewport
    }
}

/// Snapshot of a realized (on-screen) line.
///
/// Produced by [`DataGridHost::realized_row`] for slots inside the grid's
/// current display window. Off-screen slots have no snapshot; peers for them
/// answer with degraded defaults instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RealizedRow {
    /// The slot this element occupies.
    pub slot: Slot,
    /// Bounds of the whole line in viewport coordinates.
    pub bounds: Rect,
    /// Per-column cell bounds. Empty for group header lines.
    pub cell_bounds: Vec<Rect>,
    /// Bounds of the row header, when row headers are shown.
    pub header_bounds: Option<Rect>,
    /// Whether this line currently holds keyboard focus.
    pub has_focus: bool,
}

/// Signals a grid emits toward its automation layer.
#[derive(Debug, Default)]
pub struct GridSignals {
    /// Emitted after any pass that changes which slots are realized or how
    /// slots map to rows: scrolling, sorting, grouping changes, row or
    /// column insertion/removal. Cached peers re-validate on this signal.
    pub virtualization_changed: Signal<()>,
    /// Emitted when a pending focus-loss protocol has completed and deferred
    /// commands may run.
    pub focus_loss_complete: Signal<()>,
}

impl GridSignals {
    /// Creates a fresh set of signals with no connections.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The surface a grid exposes to its accessibility automation layer.
pub trait DataGridHost: Send + Sync {
    // -------------------------------------------------------------------------
    // State queries
    // -------------------------------------------------------------------------

    /// Whether the grid accepts interaction at all.
    fn is_enabled(&self) -> bool;

    /// Whether the grid as a whole refuses editing.
    fn is_read_only(&self) -> bool;

    /// Current selection mode.
    fn selection_mode(&self) -> SelectionMode;

    /// Slot of the current (focused) line, if any.
    fn current_slot(&self) -> Option<Slot>;

    /// Column index of the current cell, if any.
    fn current_column(&self) -> Option<usize>;

    /// Scroll extent along an axis.
    fn scroll_extent(&self, orientation: Orientation) -> ScrollExtent;

    /// Whether column headers are shown.
    fn are_column_headers_visible(&self) -> bool;

    /// Whether row headers are shown.
    fn are_row_headers_visible(&self) -> bool;

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Number of data columns.
    fn column_count(&self) -> usize;

    /// Metadata snapshot for one column.
    fn column(&self, index: usize) -> Option<ColumnInfo>;

    /// Resizes a column. Fails when the column does not exist or refuses
    /// resizing.
    fn set_column_width(&self, index: usize, width: f32) -> bool;

    /// Sorts by a column, toggling direction on repeat requests. Fails when
    /// the column does not exist or refuses sorting.
    fn sort_column(&self, index: usize) -> bool;

    // -------------------------------------------------------------------------
    // Rows and items
    // -------------------------------------------------------------------------

    /// Number of data rows.
    fn row_count(&self) -> usize;

    /// Stable identity of the item at a row index.
    fn item_id(&self, row_index: usize) -> Option<ItemId>;

    /// Current row index of an item, or `None` if it left the source.
    fn row_index_of(&self, item: ItemId) -> Option<usize>;

    /// Display text of one cell.
    fn cell_text(&self, row_index: usize, column: usize) -> Option<String>;

    /// Display text of a row's header, when row headers are shown.
    fn row_header_text(&self, row_index: usize) -> Option<String>;

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Snapshot of the current group layout.
    fn group_layout(&self) -> GroupLayout;

    /// Total number of slots (rows plus group headers).
    fn slot_count(&self) -> usize {
        self.group_layout().slot_count()
    }

    // -------------------------------------------------------------------------
    // Realization
    // -------------------------------------------------------------------------

    /// Snapshot of the realized element at `slot`, or `None` when the slot
    /// is off-screen or hidden.
    fn realized_row(&self, slot: Slot) -> Option<RealizedRow>;

    /// Returns `true` if the slot is currently realized.
    fn is_slot_realized(&self, slot: Slot) -> bool {
        self.realized_row(slot).is_some()
    }

    /// Scrolls the given data row into view, realizing it. Fails when the
    /// row does not exist or is hidden inside a collapsed group.
    fn scroll_row_into_view(&self, row_index: usize, column: Option<usize>) -> bool;

    /// Scrolls a group's header line into view. Fails when the group does
    /// not exist or its header is hidden by a collapsed ancestor.
    fn scroll_group_into_view(&self, group: GroupId) -> bool;

    /// Scrolls a column into view. Grids that realize all columns may keep
    /// the default no-op.
    fn scroll_column_into_view(&self, _column: usize) -> bool {
        true
    }

    // -------------------------------------------------------------------------
    // Selection and currency
    // -------------------------------------------------------------------------

    /// Returns `true` if the row's item is selected.
    fn is_row_selected(&self, row_index: usize) -> bool;

    /// Row indices of all selected items, ascending.
    fn selected_rows(&self) -> Vec<usize>;

    /// Moves currency to `(column, slot)` and applies the selection action.
    ///
    /// With `scroll` set, the target is scrolled into view first. Fails when
    /// the slot does not hold a visible data row, the column is out of
    /// range, or the selection mode refuses the action.
    fn update_selection_and_currency(
        &self,
        column: usize,
        slot: Slot,
        action: SelectionAction,
        scroll: bool,
    ) -> bool;

    /// Selects or deselects the row at `slot` without moving currency.
    fn set_row_selection(&self, slot: Slot, selected: bool, clear_others: bool) -> bool;

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Row index of the row being edited, if an edit is in progress.
    fn editing_row_index(&self) -> Option<usize>;

    /// Column index of the cell being edited, if an edit is in progress.
    fn editing_column(&self) -> Option<usize>;

    /// Begins editing the current cell.
    fn begin_edit(&self) -> bool;

    /// Commits the pending edit. Returns `true` when there was nothing to
    /// commit. With `exit_editing` set, editing mode ends on success.
    fn commit_edit(&self, unit: EditingUnit, exit_editing: bool) -> bool;

    /// Cancels the pending edit without committing, exiting editing mode.
    fn cancel_edit(&self, unit: EditingUnit) -> bool;

    /// Returns `true` while the grid is waiting for an editing element to
    /// resolve focus loss. Commands arriving in this window are deferred by
    /// the automation layer and re-run after
    /// [`GridSignals::focus_loss_complete`].
    fn is_awaiting_focus_loss(&self) -> bool;

    // -------------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------------

    /// Expands a group. Returns `true` if the group exists (expanding an
    /// expanded group is a no-op success).
    fn expand_group(&self, group: GroupId) -> bool;

    /// Collapses a group. Returns `true` if the group exists.
    fn collapse_group(&self, group: GroupId) -> bool;

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// The grid's notification signals.
    fn signals(&self) -> &GridSignals;
}
