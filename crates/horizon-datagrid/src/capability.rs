//! Capability negotiation for peers.
//!
//! A capability is an interaction pattern a peer currently supports. Which
//! capabilities a peer offers depends on live grid configuration — read-only
//! state, sort and resize policy, scroll extents, selection mode — so the
//! set is recomputed on every query and never cached: the grid can
//! reconfigure at any time without any peer being recreated.

use horizon_datagrid_core::{ColumnInfo, DataGridHost, Orientation};

/// An interaction pattern a peer may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Activate the element (begin or commit an edit, trigger a sort).
    Invoke,
    /// Scroll the element into view.
    ScrollItem,
    /// Report grid coordinates (row, column, spans, containing grid).
    GridItem,
    /// Participate in selection (select, add, remove, query).
    SelectionItem,
    /// Resolve row/column headers for a cell.
    TableItem,
    /// Enumerate the current selection.
    Selection,
    /// Navigate contained items by (row, column).
    Grid,
    /// Enumerate header elements.
    Table,
    /// Expand or collapse the element.
    ExpandCollapse,
    /// Resize the element.
    Transform,
}

impl Capability {
    /// All capabilities, in declaration order.
    pub const ALL: [Capability; 10] = [
        Capability::Invoke,
        Capability::ScrollItem,
        Capability::GridItem,
        Capability::SelectionItem,
        Capability::TableItem,
        Capability::Selection,
        Capability::Grid,
        Capability::Table,
        Capability::ExpandCollapse,
        Capability::Transform,
    ];
}

/// The set of capabilities a peer offers at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet {
    pub invoke: bool,
    pub scroll_item: bool,
    pub grid_item: bool,
    pub selection_item: bool,
    pub table_item: bool,
    pub selection: bool,
    pub grid: bool,
    pub table: bool,
    pub expand_collapse: bool,
    pub transform: bool,
}

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: Self = Self {
        invoke: false,
        scroll_item: false,
        grid_item: false,
        selection_item: false,
        table_item: false,
        selection: false,
        grid: false,
        table: false,
        expand_collapse: false,
        transform: false,
    };

    /// Returns `true` if the set contains `capability`.
    pub fn contains(&self, capability: Capability) -> bool {
        match capability {
            Capability::Invoke => self.invoke,
            Capability::ScrollItem => self.scroll_item,
            Capability::GridItem => self.grid_item,
            Capability::SelectionItem => self.selection_item,
            Capability::TableItem => self.table_item,
            Capability::Selection => self.selection,
            Capability::Grid => self.grid,
            Capability::Table => self.table,
            Capability::ExpandCollapse => self.expand_collapse,
            Capability::Transform => self.transform,
        }
    }

    /// Iterates over the contained capabilities, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }

    /// Number of contained capabilities.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no capability is contained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Negotiation
    // =========================================================================

    /// Capabilities of the grid root peer.
    pub(crate) fn for_grid() -> Self {
        Self {
            grid: true,
            table: true,
            selection: true,
            ..Self::EMPTY
        }
    }

    /// Capabilities of an item (logical row) peer.
    pub(crate) fn for_item(host: &dyn DataGridHost) -> Self {
        Self {
            invoke: !host.is_read_only(),
            scroll_item: host.scroll_extent(Orientation::Vertical).can_scroll(),
            selection_item: true,
            selection: true,
            ..Self::EMPTY
        }
    }

    /// Capabilities of a group peer.
    ///
    /// Groups are always navigable containers, so everything except
    /// scrolling is unconditional.
    pub(crate) fn for_group(host: &dyn DataGridHost) -> Self {
        Self {
            scroll_item: host.scroll_extent(Orientation::Vertical).can_scroll(),
            selection: true,
            grid: true,
            table: true,
            expand_collapse: true,
            ..Self::EMPTY
        }
    }

    /// Capabilities of a cell peer. `column` is the cell's column metadata,
    /// absent when the column has been removed.
    pub(crate) fn for_cell(host: &dyn DataGridHost, column: Option<&ColumnInfo>) -> Self {
        Self {
            invoke: !host.is_read_only() && column.is_some_and(|c| !c.read_only),
            scroll_item: host.scroll_extent(Orientation::Horizontal).can_scroll(),
            grid_item: true,
            selection_item: true,
            table_item: true,
            ..Self::EMPTY
        }
    }

    /// Capabilities of a column header peer.
    pub(crate) fn for_column_header(host: &dyn DataGridHost, column: Option<&ColumnInfo>) -> Self {
        Self {
            invoke: column.is_some_and(|c| c.can_sort),
            scroll_item: host.scroll_extent(Orientation::Horizontal).can_scroll(),
            transform: column.is_some_and(|c| c.can_resize),
            ..Self::EMPTY
        }
    }

    /// Capabilities of a row header peer: none.
    pub(crate) fn for_row_header() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_datagrid_core::{ColumnInfo, SimpleDataGrid};

    #[test]
    fn test_contains_and_iter() {
        let set = CapabilitySet {
            invoke: true,
            grid: true,
            ..CapabilitySet::EMPTY
        };
        assert!(set.contains(Capability::Invoke));
        assert!(!set.contains(Capability::Transform));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Capability::Invoke, Capability::Grid]
        );
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_read_only_gates_invoke() {
        let grid = SimpleDataGrid::new(vec![ColumnInfo::new("A")])
            .with_rows(vec![vec!["x".into()]]);

        let column = grid.column(0);
        assert!(CapabilitySet::for_cell(&grid, column.as_ref()).invoke);

        grid.set_read_only(true);
        assert!(!CapabilitySet::for_cell(&grid, column.as_ref()).invoke);
        assert!(!CapabilitySet::for_item(&grid).invoke);
    }

    #[test]
    fn test_read_only_column_gates_cell_invoke() {
        let grid = SimpleDataGrid::new(vec![ColumnInfo::new("A").with_read_only(true)])
            .with_rows(vec![vec!["x".into()]]);
        assert!(!CapabilitySet::for_cell(&grid, grid.column(0).as_ref()).invoke);
        // The row itself still offers Invoke; only the cell is locked.
        assert!(CapabilitySet::for_item(&grid).invoke);
    }

    #[test]
    fn test_scroll_item_requires_scrollable_extent() {
        let small = SimpleDataGrid::new(vec![ColumnInfo::new("A")])
            .with_rows(vec![vec!["x".into()]]);
        assert!(!CapabilitySet::for_item(&small).scroll_item);

        let tall = SimpleDataGrid::new(vec![ColumnInfo::new("A")])
            .with_rows((0..100).map(|i| vec![i.to_string()]).collect())
            .with_realized_window(5);
        assert!(CapabilitySet::for_item(&tall).scroll_item);
    }

    #[test]
    fn test_group_capabilities_are_unconditional() {
        let grid = SimpleDataGrid::new(vec![ColumnInfo::new("A")]);
        let set = CapabilitySet::for_group(&grid);
        assert!(set.expand_collapse);
        assert!(set.grid);
        assert!(set.selection);
        assert!(set.table);
    }

    #[test]
    fn test_resize_policy_gates_transform() {
        let grid = SimpleDataGrid::new(vec![
            ColumnInfo::new("A"),
            ColumnInfo::new("B").with_resizable(false),
        ]);
        assert!(CapabilitySet::for_column_header(&grid, grid.column(0).as_ref()).transform);
        assert!(!CapabilitySet::for_column_header(&grid, grid.column(1).as_ref()).transform);
    }
}
