//! Property-style tests of slot/row translation over generated layouts.

use horizon_datagrid_core::{
    ColumnInfo, DataGridHost, GroupDesc, GroupId, SimpleDataGrid, Slot,
};

/// Builds a grid with a deterministic family of nested groupings.
///
/// `shape` lists (depth, rows-per-bottom-group); every bottom group gets the
/// same row count, nested under `depth` ancestors.
fn grid_with_shape(bottom_groups: usize, depth: usize, rows_per_group: usize) -> SimpleDataGrid {
    fn nest(name: String, depth: usize, rows: usize) -> GroupDesc {
        if depth == 0 {
            GroupDesc::rows(name, rows)
        } else {
            GroupDesc::nested(name.clone(), vec![nest(format!("{name}.x"), depth - 1, rows)])
        }
    }

    let total_rows = bottom_groups * rows_per_group;
    let rows = (0..total_rows)
        .map(|i| vec![format!("r{i}")])
        .collect::<Vec<_>>();
    let groups = (0..bottom_groups)
        .map(|g| nest(format!("g{g}"), depth, rows_per_group))
        .collect();

    SimpleDataGrid::new(vec![ColumnInfo::new("Col")])
        .with_rows(rows)
        .with_groups(groups)
}

#[test]
fn test_round_trip_across_layout_family() {
    for bottom_groups in 1..4 {
        for depth in 0..3 {
            for rows_per_group in 1..4 {
                let grid = grid_with_shape(bottom_groups, depth, rows_per_group);
                let layout = grid.group_layout();

                let expected_rows = bottom_groups * rows_per_group;
                let expected_headers = bottom_groups * (depth + 1);
                assert_eq!(layout.row_count(), expected_rows);
                assert_eq!(layout.slot_count(), expected_rows + expected_headers);

                for slot in 0..layout.slot_count() {
                    match layout.row_index_from_slot(Slot(slot)) {
                        Some(row) => {
                            assert_eq!(layout.slot_from_row_index(row), Some(Slot(slot)));
                        }
                        None => assert!(layout.is_group_header(Slot(slot))),
                    }
                }
                for row in 0..layout.row_count() {
                    let slot = layout.slot_from_row_index(row).unwrap();
                    assert_eq!(layout.row_index_from_slot(slot), Some(row));
                }
            }
        }
    }
}

#[test]
fn test_row_indices_are_dense_and_ordered() {
    let grid = grid_with_shape(3, 2, 2);
    let layout = grid.group_layout();

    let mut seen = Vec::new();
    for slot in 0..layout.slot_count() {
        if let Some(row) = layout.row_index_from_slot(Slot(slot)) {
            seen.push(row);
        }
    }
    let expected: Vec<usize> = (0..layout.row_count()).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_every_group_span_is_nested_or_disjoint() {
    let grid = grid_with_shape(3, 2, 2);
    let layout = grid.group_layout();

    for a in layout.groups() {
        for b in layout.groups() {
            if a.id == b.id {
                continue;
            }
            let a_range = a.slot.0..=a.last_sub_item_slot.0;
            let b_range = b.slot.0..=b.last_sub_item_slot.0;
            let disjoint = a_range.end() < b_range.start() || b_range.end() < a_range.start();
            let a_inside_b = b_range.contains(a_range.start()) && b_range.contains(a_range.end());
            let b_inside_a = a_range.contains(b_range.start()) && a_range.contains(b_range.end());
            assert!(
                disjoint || a_inside_b || b_inside_a,
                "group spans must form a tree: {a:?} vs {b:?}"
            );
        }
    }
}

#[test]
fn test_group_start_matches_slot_arithmetic() {
    let grid = grid_with_shape(3, 1, 2);
    let layout = grid.group_layout();

    for info in layout.groups() {
        let start = layout.group_start_row_index(info.id).unwrap();
        let headers = layout.header_count_at_or_before(info.slot);
        assert_eq!(start, info.slot.0 - headers + 1);
    }
}

#[test]
fn test_collapse_hides_exactly_the_subtree() {
    let grid = grid_with_shape(2, 1, 3);
    // Layout: g0 (outer), g0.x (inner, 3 rows), g1 (outer), g1.x (inner, 3 rows).
    assert!(grid.collapse_group(GroupId(0)));
    let layout = grid.group_layout();

    let outer = layout.group(GroupId(0)).unwrap();
    for slot in 0..layout.slot_count() {
        let slot = Slot(slot);
        let inside = outer.slot < slot && slot <= outer.last_sub_item_slot;
        assert_eq!(layout.is_slot_visible(slot), !inside);
    }
}
