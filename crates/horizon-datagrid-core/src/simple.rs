//! In-memory reference implementation of [`DataGridHost`].
//!
//! `SimpleDataGrid` is a headless grid: rows of string cells, column
//! metadata, nested contiguous grouping, a movable realized-slot window that
//! stands in for a virtualization engine, selection and currency, and a
//! cell editing lifecycle with an explicit focus-loss latch. It exists so
//! the automation layer can be exercised — in tests, examples, and
//! embeddings without a rendering stack — against a grid with honest
//! virtualization behavior.
//!
//! # Example
//!
//! ```
//! use horizon_datagrid_core::{ColumnInfo, DataGridHost, GroupDesc, SimpleDataGrid};
//!
//! let grid = SimpleDataGrid::new(vec![ColumnInfo::new("Task"), ColumnInfo::new("Owner")])
//!     .with_rows(vec![
//!         vec!["Triage".into(), "ana".into()],
//!         vec!["Review".into(), "ben".into()],
//!     ])
//!     .with_groups(vec![GroupDesc::rows("Open", 2)]);
//!
//! assert_eq!(grid.row_count(), 2);
//! assert_eq!(grid.slot_count(), 3); // one group header plus two rows
//! ```

use std::collections::HashSet;

use parking_lot::RwLock;

use crate::column::{ColumnInfo, MIN_COLUMN_WIDTH};
use crate::geometry::Rect;
use crate::host::{
    DataGridHost, EditingUnit, GridSignals, ItemId, Orientation, RealizedRow, ScrollExtent,
    SelectionAction, SelectionMode,
};
use crate::layout::{GroupId, GroupLayout, RowGroupInfo, Slot, SlotContent};

const DEFAULT_ROW_HEIGHT: f32 = 24.0;
const DEFAULT_WINDOW_LEN: usize = 32;
const DEFAULT_VIEWPORT_WIDTH: f32 = 600.0;
const ROW_HEADER_WIDTH: f32 = 30.0;

/// Children of a [`GroupDesc`]: either a run of data rows or nested
/// subgroups.
#[derive(Debug, Clone)]
pub enum GroupChildren {
    /// The group directly contains the next `n` data rows.
    Rows(usize),
    /// The group contains subgroups; its rows are theirs.
    Groups(Vec<GroupDesc>),
}

/// Describes one group when building a grouped grid.
///
/// Groups partition the row sequence contiguously and may nest; the
/// described row counts must add up to the grid's row count.
#[derive(Debug, Clone)]
pub struct GroupDesc {
    name: String,
    children: GroupChildren,
}

impl GroupDesc {
    /// A bottom-level group holding the next `count` data rows.
    pub fn rows(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            children: GroupChildren::Rows(count),
        }
    }

    /// A group whose children are subgroups.
    pub fn nested(name: impl Into<String>, groups: Vec<GroupDesc>) -> Self {
        Self {
            name: name.into(),
            children: GroupChildren::Groups(groups),
        }
    }
}

struct RowEntry {
    id: ItemId,
    cells: Vec<String>,
}

struct GridState {
    columns: Vec<ColumnInfo>,
    rows: Vec<RowEntry>,
    next_item: u64,
    group_infos: Vec<RowGroupInfo>,
    slot_count: usize,
    enabled: bool,
    read_only: bool,
    selection_mode: SelectionMode,
    column_headers_visible: bool,
    row_headers_visible: bool,
    selected: HashSet<ItemId>,
    current: Option<(Slot, usize)>,
    editing: Option<(ItemId, usize)>,
    awaiting_focus_loss: bool,
    commit_allowed: bool,
    window_start: usize,
    window_len: usize,
    row_height: f32,
    viewport_width: f32,
}

impl GridState {
    fn layout(&self) -> GroupLayout {
        GroupLayout::new(self.group_infos.clone(), self.slot_count)
    }

    fn row_index_of(&self, item: ItemId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == item)
    }

    fn in_window(&self, slot: Slot) -> bool {
        slot.0 >= self.window_start && slot.0 < self.window_start + self.window_len
    }

    /// Moves the window so `slot` is inside it. Returns `true` if it moved.
    fn bring_into_window(&mut self, slot: Slot) -> bool {
        if self.in_window(slot) {
            return false;
        }
        if slot.0 < self.window_start {
            self.window_start = slot.0;
        } else {
            self.window_start = slot.0 + 1 - self.window_len;
        }
        true
    }

    fn realized_row(&self, layout: &GroupLayout, slot: Slot) -> Option<RealizedRow> {
        if slot.0 >= self.slot_count || !self.in_window(slot) || !layout.is_slot_visible(slot) {
            return None;
        }
        let visible_offset = (self.window_start..slot.0)
            .filter(|&s| layout.is_slot_visible(Slot(s)))
            .count();
        let y = visible_offset as f32 * self.row_height;
        let header_width = if self.row_headers_visible {
            ROW_HEADER_WIDTH
        } else {
            0.0
        };
        let content_width: f32 = self.columns.iter().map(|c| c.width).sum();

        let is_data_row = !layout.is_group_header(slot);
        let mut cell_bounds = Vec::new();
        if is_data_row {
            let mut x = header_width;
            for column in &self.columns {
                cell_bounds.push(Rect::new(x, y, column.width, self.row_height));
                x += column.width;
            }
        }
        let header_bounds = (self.row_headers_visible && is_data_row)
            .then(|| Rect::new(0.0, y, ROW_HEADER_WIDTH, self.row_height));

        Some(RealizedRow {
            slot,
            bounds: Rect::new(0.0, y, header_width + content_width, self.row_height),
            cell_bounds,
            header_bounds,
            has_focus: self.current.is_some_and(|(s, _)| s == slot),
        })
    }
}

/// A headless, in-memory grid implementing [`DataGridHost`].
pub struct SimpleDataGrid {
    state: RwLock<GridState>,
    signals: GridSignals,
}

impl SimpleDataGrid {
    /// Creates an empty grid with the given columns.
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self {
            state: RwLock::new(GridState {
                columns,
                rows: Vec::new(),
                next_item: 1,
                group_infos: Vec::new(),
                slot_count: 0,
                enabled: true,
                read_only: false,
                selection_mode: SelectionMode::default(),
                column_headers_visible: true,
                row_headers_visible: false,
                selected: HashSet::new(),
                current: None,
                editing: None,
                awaiting_focus_loss: false,
                commit_allowed: true,
                window_start: 0,
                window_len: DEFAULT_WINDOW_LEN,
                row_height: DEFAULT_ROW_HEIGHT,
                viewport_width: DEFAULT_VIEWPORT_WIDTH,
            }),
            signals: GridSignals::new(),
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Sets the row data using builder pattern. Each inner vector holds one
    /// row's cell texts.
    pub fn with_rows(self, rows: Vec<Vec<String>>) -> Self {
        {
            let mut s = self.state.write();
            for cells in rows {
                let id = ItemId(s.next_item);
                s.next_item += 1;
                s.rows.push(RowEntry { id, cells });
            }
            if s.group_infos.is_empty() {
                s.slot_count = s.rows.len();
            }
        }
        self
    }

    /// Groups the rows using builder pattern.
    ///
    /// # Panics
    ///
    /// Panics if the described row counts do not add up to the grid's row
    /// count.
    pub fn with_groups(self, groups: Vec<GroupDesc>) -> Self {
        {
            let mut s = self.state.write();
            let (infos, rows_described, slot_count) = build_group_infos(&groups);
            assert_eq!(
                rows_described,
                s.rows.len(),
                "group descriptions must cover every row exactly once"
            );
            s.group_infos = infos;
            s.slot_count = slot_count;
        }
        self
    }

    /// Sets the selection mode using builder pattern.
    pub fn with_selection_mode(self, mode: SelectionMode) -> Self {
        self.state.write().selection_mode = mode;
        self
    }

    /// Sets the read-only flag using builder pattern.
    pub fn with_read_only(self, read_only: bool) -> Self {
        self.state.write().read_only = read_only;
        self
    }

    /// Sets the realized window length (in slots) using builder pattern.
    pub fn with_realized_window(self, len: usize) -> Self {
        self.state.write().window_len = len.max(1);
        self
    }

    /// Sets the horizontal viewport width using builder pattern.
    pub fn with_viewport_width(self, width: f32) -> Self {
        self.state.write().viewport_width = width;
        self
    }

    /// Shows or hides row headers using builder pattern.
    pub fn with_row_headers(self, visible: bool) -> Self {
        self.state.write().row_headers_visible = visible;
        self
    }

    /// Shows or hides column headers using builder pattern.
    pub fn with_column_headers(self, visible: bool) -> Self {
        self.state.write().column_headers_visible = visible;
        self
    }

    // =========================================================================
    // Runtime configuration
    // =========================================================================

    /// Enables or disables the grid.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.write().enabled = enabled;
    }

    /// Sets the grid-wide read-only flag.
    pub fn set_read_only(&self, read_only: bool) {
        self.state.write().read_only = read_only;
    }

    /// Allows or refuses edit commits.
    ///
    /// Simulates an edit whose pending value fails validation; used to
    /// exercise commit-failure paths.
    pub fn set_commit_allowed(&self, allowed: bool) {
        self.state.write().commit_allowed = allowed;
    }

    /// Marks the grid as waiting for its editing element to resolve focus
    /// loss. Only meaningful while an edit is in progress.
    pub fn hold_focus(&self) {
        let mut s = self.state.write();
        if s.editing.is_some() {
            s.awaiting_focus_loss = true;
        }
    }

    /// Completes the pending focus-loss protocol and notifies listeners.
    pub fn complete_focus_loss(&self) {
        {
            let mut s = self.state.write();
            if !s.awaiting_focus_loss {
                return;
            }
            s.awaiting_focus_loss = false;
        }
        self.signals.focus_loss_complete.emit(());
    }

    // =========================================================================
    // Row mutation (ungrouped grids)
    // =========================================================================

    /// Appends a row. Returns its item ID, or `None` when the grid is
    /// grouped (regroup instead).
    pub fn push_row(&self, cells: Vec<String>) -> Option<ItemId> {
        let id = {
            let mut s = self.state.write();
            if !s.group_infos.is_empty() {
                return None;
            }
            let id = ItemId(s.next_item);
            s.next_item += 1;
            s.rows.push(RowEntry { id, cells });
            s.slot_count = s.rows.len();
            id
        };
        self.signals.virtualization_changed.emit(());
        Some(id)
    }

    /// Removes the row at `row_index`. Fails when the grid is grouped or
    /// the index is out of range.
    pub fn remove_row(&self, row_index: usize) -> bool {
        {
            let mut s = self.state.write();
            if !s.group_infos.is_empty() || row_index >= s.rows.len() {
                return false;
            }
            let removed = s.rows.remove(row_index);
            s.selected.remove(&removed.id);
            if s.editing.is_some_and(|(item, _)| item == removed.id) {
                s.editing = None;
                s.awaiting_focus_loss = false;
            }
            s.slot_count = s.rows.len();
            s.current = None;
        }
        self.signals.virtualization_changed.emit(());
        true
    }
}

impl DataGridHost for SimpleDataGrid {
    fn is_enabled(&self) -> bool {
        self.state.read().enabled
    }

    fn is_read_only(&self) -> bool {
        self.state.read().read_only
    }

    fn selection_mode(&self) -> SelectionMode {
        self.state.read().selection_mode
    }

    fn current_slot(&self) -> Option<Slot> {
        self.state.read().current.map(|(slot, _)| slot)
    }

    fn current_column(&self) -> Option<usize> {
        self.state.read().current.map(|(_, column)| column)
    }

    fn scroll_extent(&self, orientation: Orientation) -> ScrollExtent {
        let s = self.state.read();
        match orientation {
            Orientation::Vertical => {
                let layout = s.layout();
                let visible = (0..s.slot_count)
                    .filter(|&slot| layout.is_slot_visible(Slot(slot)))
                    .count();
                ScrollExtent {
                    extent: visible as f32 * s.row_height,
                    viewport: s.window_len as f32 * s.row_height,
                }
            }
            Orientation::Horizontal => ScrollExtent {
                extent: s.columns.iter().map(|c| c.width).sum(),
                viewport: s.viewport_width,
            },
        }
    }

    fn are_column_headers_visible(&self) -> bool {
        self.state.read().column_headers_visible
    }

    fn are_row_headers_visible(&self) -> bool {
        self.state.read().row_headers_visible
    }

    fn column_count(&self) -> usize {
        self.state.read().columns.len()
    }

    fn column(&self, index: usize) -> Option<ColumnInfo> {
        self.state.read().columns.get(index).cloned()
    }

    fn set_column_width(&self, index: usize, width: f32) -> bool {
        {
            let mut s = self.state.write();
            let Some(column) = s.columns.get_mut(index) else {
                return false;
            };
            if !column.can_resize {
                return false;
            }
            column.width = width.max(MIN_COLUMN_WIDTH);
        }
        self.signals.virtualization_changed.emit(());
        true
    }

    fn sort_column(&self, index: usize) -> bool {
        {
            let mut s = self.state.write();
            let Some(column) = s.columns.get(index) else {
                return false;
            };
            if !column.can_sort {
                return false;
            }
            let direction = column
                .sort_direction
                .map(|d| d.toggled())
                .unwrap_or(crate::column::SortDirection::Ascending);
            for (i, column) in s.columns.iter_mut().enumerate() {
                column.sort_direction = (i == index).then_some(direction);
            }

            // Sort within each bottom-level group's span; the whole grid
            // when ungrouped.
            let layout = s.layout();
            let mut ranges = Vec::new();
            if layout.is_grouped() {
                for info in layout.groups() {
                    if !layout.has_child_groups(info.id) {
                        if let Some(range) = layout.group_row_range(info.id) {
                            ranges.push(range);
                        }
                    }
                }
            } else {
                ranges.push(0..s.rows.len());
            }
            let descending = direction == crate::column::SortDirection::Descending;
            for range in ranges {
                s.rows[range].sort_by(|a, b| {
                    let empty = String::new();
                    let ka = a.cells.get(index).unwrap_or(&empty);
                    let kb = b.cells.get(index).unwrap_or(&empty);
                    if descending { kb.cmp(ka) } else { ka.cmp(kb) }
                });
            }
        }
        self.signals.virtualization_changed.emit(());
        true
    }

    fn row_count(&self) -> usize {
        self.state.read().rows.len()
    }

    fn item_id(&self, row_index: usize) -> Option<ItemId> {
        self.state.read().rows.get(row_index).map(|r| r.id)
    }

    fn row_index_of(&self, item: ItemId) -> Option<usize> {
        self.state.read().row_index_of(item)
    }

    fn cell_text(&self, row_index: usize, column: usize) -> Option<String> {
        self.state
            .read()
            .rows
            .get(row_index)
            .and_then(|r| r.cells.get(column))
            .cloned()
    }

    fn row_header_text(&self, row_index: usize) -> Option<String> {
        let s = self.state.read();
        (s.row_headers_visible && row_index < s.rows.len()).then(|| (row_index + 1).to_string())
    }

    fn group_layout(&self) -> GroupLayout {
        self.state.read().layout()
    }

    fn realized_row(&self, slot: Slot) -> Option<RealizedRow> {
        let s = self.state.read();
        let layout = s.layout();
        s.realized_row(&layout, slot)
    }

    fn scroll_row_into_view(&self, row_index: usize, _column: Option<usize>) -> bool {
        let moved = {
            let mut s = self.state.write();
            let layout = s.layout();
            let Some(slot) = layout.slot_from_row_index(row_index) else {
                return false;
            };
            if !layout.is_slot_visible(slot) {
                tracing::debug!(row_index, %slot, "cannot scroll to a row hidden in a collapsed group");
                return false;
            }
            s.bring_into_window(slot)
        };
        if moved {
            self.signals.virtualization_changed.emit(());
        }
        true
    }

    fn scroll_group_into_view(&self, group: GroupId) -> bool {
        let moved = {
            let mut s = self.state.write();
            let layout = s.layout();
            let Some(info) = layout.group(group) else {
                return false;
            };
            let slot = info.slot;
            if !layout.is_slot_visible(slot) {
                return false;
            }
            s.bring_into_window(slot)
        };
        if moved {
            self.signals.virtualization_changed.emit(());
        }
        true
    }

    fn is_row_selected(&self, row_index: usize) -> bool {
        let s = self.state.read();
        s.rows
            .get(row_index)
            .is_some_and(|r| s.selected.contains(&r.id))
    }

    fn selected_rows(&self) -> Vec<usize> {
        let s = self.state.read();
        s.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| s.selected.contains(&r.id))
            .map(|(i, _)| i)
            .collect()
    }

    fn update_selection_and_currency(
        &self,
        column: usize,
        slot: Slot,
        action: SelectionAction,
        scroll: bool,
    ) -> bool {
        let moved = {
            let mut s = self.state.write();
            let layout = s.layout();
            let SlotContent::DataRow(row) = layout.resolve_slot(slot) else {
                return false;
            };
            if column >= s.columns.len() || !layout.is_slot_visible(slot) {
                return false;
            }
            let item = s.rows[row].id;
            match action {
                SelectionAction::SelectCurrent => {
                    s.selected.clear();
                    s.selected.insert(item);
                }
                SelectionAction::AddToSelection => {
                    if s.selection_mode == SelectionMode::Single
                        && !s.selected.is_empty()
                        && !s.selected.contains(&item)
                    {
                        return false;
                    }
                    s.selected.insert(item);
                }
                SelectionAction::RemoveFromSelection => {
                    s.selected.remove(&item);
                }
            }
            s.current = Some((slot, column));
            if scroll { s.bring_into_window(slot) } else { false }
        };
        if moved {
            self.signals.virtualization_changed.emit(());
        }
        true
    }

    fn set_row_selection(&self, slot: Slot, selected: bool, clear_others: bool) -> bool {
        let mut s = self.state.write();
        let layout = s.layout();
        let SlotContent::DataRow(row) = layout.resolve_slot(slot) else {
            return false;
        };
        let item = s.rows[row].id;
        if clear_others {
            s.selected.clear();
        }
        if selected {
            if s.selection_mode == SelectionMode::Single
                && !s.selected.is_empty()
                && !s.selected.contains(&item)
            {
                return false;
            }
            s.selected.insert(item);
        } else {
            s.selected.remove(&item);
        }
        true
    }

    fn editing_row_index(&self) -> Option<usize> {
        let s = self.state.read();
        s.editing.and_then(|(item, _)| s.row_index_of(item))
    }

    fn editing_column(&self) -> Option<usize> {
        self.state.read().editing.map(|(_, column)| column)
    }

    fn begin_edit(&self) -> bool {
        let mut s = self.state.write();
        if s.editing.is_some() {
            return true;
        }
        if s.read_only {
            return false;
        }
        let Some((slot, column)) = s.current else {
            return false;
        };
        let layout = s.layout();
        let SlotContent::DataRow(row) = layout.resolve_slot(slot) else {
            return false;
        };
        if s.columns.get(column).is_none_or(|c| c.read_only) {
            return false;
        }
        let item = s.rows[row].id;
        s.editing = Some((item, column));
        true
    }

    fn commit_edit(&self, unit: EditingUnit, exit_editing: bool) -> bool {
        let mut s = self.state.write();
        if s.editing.is_none() {
            return true;
        }
        if !s.commit_allowed {
            tracing::warn!(?unit, "edit commit refused");
            return false;
        }
        if exit_editing {
            s.editing = None;
            s.awaiting_focus_loss = false;
        }
        true
    }

    fn cancel_edit(&self, _unit: EditingUnit) -> bool {
        let mut s = self.state.write();
        s.editing = None;
        s.awaiting_focus_loss = false;
        true
    }

    fn is_awaiting_focus_loss(&self) -> bool {
        self.state.read().awaiting_focus_loss
    }

    fn expand_group(&self, group: GroupId) -> bool {
        self.set_group_expanded(group, true)
    }

    fn collapse_group(&self, group: GroupId) -> bool {
        self.set_group_expanded(group, false)
    }

    fn signals(&self) -> &GridSignals {
        &self.signals
    }
}

impl SimpleDataGrid {
    fn set_group_expanded(&self, group: GroupId, expanded: bool) -> bool {
        let changed = {
            let mut s = self.state.write();
            let Some(info) = s.group_infos.get_mut(group.0) else {
                return false;
            };
            let changed = info.expanded != expanded;
            info.expanded = expanded;
            changed
        };
        if changed {
            self.signals.virtualization_changed.emit(());
        }
        true
    }
}

fn build_group_infos(descs: &[GroupDesc]) -> (Vec<RowGroupInfo>, usize, usize) {
    fn walk(
        descs: &[GroupDesc],
        level: usize,
        next_slot: &mut usize,
        next_row: &mut usize,
        infos: &mut Vec<RowGroupInfo>,
    ) {
        for desc in descs {
            let index = infos.len();
            infos.push(RowGroupInfo {
                id: GroupId(index),
                name: desc.name.clone(),
                level,
                slot: Slot(*next_slot),
                last_sub_item_slot: Slot(*next_slot),
                expanded: true,
                item_count: 0,
            });
            *next_slot += 1;
            let rows_before = *next_row;
            match &desc.children {
                GroupChildren::Rows(count) => {
                    *next_slot += count;
                    *next_row += count;
                }
                GroupChildren::Groups(subgroups) => {
                    walk(subgroups, level + 1, next_slot, next_row, infos);
                }
            }
            infos[index].last_sub_item_slot = Slot(*next_slot - 1);
            infos[index].item_count = *next_row - rows_before;
        }
    }

    let mut infos = Vec::new();
    let mut next_slot = 0;
    let mut next_row = 0;
    walk(descs, 0, &mut next_slot, &mut next_row, &mut infos);
    (infos, next_row, next_slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_columns() -> Vec<ColumnInfo> {
        vec![ColumnInfo::new("Name"), ColumnInfo::new("Value")]
    }

    fn sample_rows(count: usize) -> Vec<Vec<String>> {
        (0..count)
            .map(|i| vec![format!("row {i}"), i.to_string()])
            .collect()
    }

    #[test]
    fn test_flat_grid_slots_match_rows() {
        let grid = SimpleDataGrid::new(sample_columns()).with_rows(sample_rows(4));
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.slot_count(), 4);
        assert_eq!(grid.group_layout().row_index_from_slot(Slot(2)), Some(2));
    }

    #[test]
    fn test_grouped_slot_layout() {
        let grid = SimpleDataGrid::new(sample_columns())
            .with_rows(sample_rows(5))
            .with_groups(vec![
                GroupDesc::nested(
                    "A",
                    vec![GroupDesc::rows("A.1", 2), GroupDesc::rows("A.2", 1)],
                ),
                GroupDesc::rows("B", 2),
            ]);

        let layout = grid.group_layout();
        assert_eq!(layout.slot_count(), 9);
        assert_eq!(layout.groups().len(), 4);
        assert_eq!(layout.group(GroupId(0)).unwrap().item_count, 3);
        assert_eq!(layout.group(GroupId(3)).unwrap().item_count, 2);
        assert_eq!(layout.slot_from_row_index(3), Some(Slot(7)));
    }

    #[test]
    #[should_panic(expected = "cover every row")]
    fn test_group_descriptions_must_cover_rows() {
        let _ = SimpleDataGrid::new(sample_columns())
            .with_rows(sample_rows(3))
            .with_groups(vec![GroupDesc::rows("A", 2)]);
    }

    #[test]
    fn test_realization_window() {
        let grid = SimpleDataGrid::new(sample_columns())
            .with_rows(sample_rows(10))
            .with_realized_window(3);

        assert!(grid.realized_row(Slot(0)).is_some());
        assert!(grid.realized_row(Slot(5)).is_none());

        assert!(grid.scroll_row_into_view(5, None));
        assert!(grid.realized_row(Slot(5)).is_some());
        assert!(grid.realized_row(Slot(0)).is_none());
    }

    #[test]
    fn test_collapsed_rows_are_not_realized() {
        let grid = SimpleDataGrid::new(sample_columns())
            .with_rows(sample_rows(3))
            .with_groups(vec![GroupDesc::rows("A", 3)]);

        assert!(grid.realized_row(Slot(1)).is_some());
        assert!(grid.collapse_group(GroupId(0)));
        assert!(grid.realized_row(Slot(0)).is_some()); // header stays
        assert!(grid.realized_row(Slot(1)).is_none());
        assert!(!grid.scroll_row_into_view(0, None));
    }

    #[test]
    fn test_selection_modes() {
        let grid = SimpleDataGrid::new(sample_columns()).with_rows(sample_rows(3));

        assert!(grid.update_selection_and_currency(
            0,
            Slot(0),
            SelectionAction::SelectCurrent,
            false
        ));
        assert!(grid.is_row_selected(0));

        // Single mode refuses adding a second row.
        assert!(!grid.update_selection_and_currency(
            0,
            Slot(2),
            SelectionAction::AddToSelection,
            false
        ));
        assert_eq!(grid.selected_rows(), vec![0]);
    }

    #[test]
    fn test_edit_lifecycle_and_focus_latch() {
        let grid = SimpleDataGrid::new(sample_columns()).with_rows(sample_rows(3));
        assert!(grid.update_selection_and_currency(
            1,
            Slot(1),
            SelectionAction::SelectCurrent,
            false
        ));
        assert!(grid.begin_edit());
        assert_eq!(grid.editing_row_index(), Some(1));
        assert_eq!(grid.editing_column(), Some(1));

        grid.hold_focus();
        assert!(grid.is_awaiting_focus_loss());
        grid.complete_focus_loss();
        assert!(!grid.is_awaiting_focus_loss());

        assert!(grid.commit_edit(EditingUnit::Row, true));
        assert_eq!(grid.editing_row_index(), None);
    }

    #[test]
    fn test_commit_can_be_refused() {
        let grid = SimpleDataGrid::new(sample_columns()).with_rows(sample_rows(2));
        assert!(grid.update_selection_and_currency(
            0,
            Slot(0),
            SelectionAction::SelectCurrent,
            false
        ));
        assert!(grid.begin_edit());
        grid.set_commit_allowed(false);
        assert!(!grid.commit_edit(EditingUnit::Row, true));
        assert_eq!(grid.editing_row_index(), Some(0));
    }

    #[test]
    fn test_sort_keeps_selection_by_item() {
        let grid = SimpleDataGrid::new(sample_columns()).with_rows(vec![
            vec!["c".into(), "2".into()],
            vec!["a".into(), "0".into()],
            vec!["b".into(), "1".into()],
        ]);
        assert!(grid.update_selection_and_currency(
            0,
            Slot(1),
            SelectionAction::SelectCurrent,
            false
        )); // select "a"

        assert!(grid.sort_column(0));
        assert_eq!(grid.cell_text(0, 0), Some("a".into()));
        assert_eq!(grid.selected_rows(), vec![0]); // selection followed the item

        // Toggling sorts descending.
        assert!(grid.sort_column(0));
        assert_eq!(grid.cell_text(0, 0), Some("c".into()));
    }

    #[test]
    fn test_sort_within_groups() {
        let grid = SimpleDataGrid::new(sample_columns())
            .with_rows(vec![
                vec!["b".into(), "1".into()],
                vec!["a".into(), "0".into()],
                vec!["z".into(), "3".into()],
                vec!["y".into(), "2".into()],
            ])
            .with_groups(vec![GroupDesc::rows("G1", 2), GroupDesc::rows("G2", 2)]);

        assert!(grid.sort_column(0));
        assert_eq!(grid.cell_text(0, 0), Some("a".into()));
        assert_eq!(grid.cell_text(1, 0), Some("b".into()));
        assert_eq!(grid.cell_text(2, 0), Some("y".into()));
        assert_eq!(grid.cell_text(3, 0), Some("z".into()));
    }

    #[test]
    fn test_scroll_extents() {
        let grid = SimpleDataGrid::new(sample_columns())
            .with_rows(sample_rows(50))
            .with_realized_window(10);
        assert!(grid.scroll_extent(Orientation::Vertical).can_scroll());

        let narrow = SimpleDataGrid::new(sample_columns()).with_viewport_width(150.0);
        assert!(narrow.scroll_extent(Orientation::Horizontal).can_scroll());
    }

    #[test]
    fn test_row_removal_clears_derived_state() {
        let grid = SimpleDataGrid::new(sample_columns()).with_rows(sample_rows(3));
        let second = grid.item_id(1).unwrap();
        assert!(grid.update_selection_and_currency(
            0,
            Slot(1),
            SelectionAction::SelectCurrent,
            false
        ));
        assert!(grid.begin_edit());

        assert!(grid.remove_row(1));
        assert_eq!(grid.row_index_of(second), None);
        assert!(grid.selected_rows().is_empty());
        assert_eq!(grid.editing_row_index(), None);
    }
}
