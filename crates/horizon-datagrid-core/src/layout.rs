//! Slot and group layout for virtualized grids.
//!
//! A grid with row grouping displays two kinds of lines: data rows and group
//! header lines. The *slot* coordinate space is dense and zero-based over all
//! of them; the *row index* space covers data rows only. Because group
//! headers are interleaved above data rows, translating between the two
//! requires the cumulative count of header lines at or above a slot.
//!
//! [`GroupLayout`] is an immutable snapshot of the current group structure.
//! The grid owns the authoritative layout and hands out snapshots through
//! [`DataGridHost::group_layout`](crate::DataGridHost::group_layout); the
//! automation layer performs all of its translation against a snapshot taken
//! at the start of the operation.

use std::fmt;

/// A dense coordinate over all visible lines (data rows and group headers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Slot(pub usize);

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// Identifies a row group within a [`GroupLayout`].
///
/// Group IDs are positions in the layout's depth-first group table and are
/// only meaningful against the layout generation that produced them; a
/// regrouping pass invalidates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub usize);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {}", self.0)
    }
}

/// Metadata for one row group.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroupInfo {
    /// The group's identifier within its layout.
    pub id: GroupId,
    /// Display name of the group (announced by assistive technology).
    pub name: String,
    /// Nesting depth, zero-based; top-level groups are level 0.
    pub level: usize,
    /// The slot occupied by the group's header line.
    pub slot: Slot,
    /// The last slot belonging to the group's subtree (rows and subgroup
    /// headers included).
    pub last_sub_item_slot: Slot,
    /// Whether the group is expanded. A collapsed group keeps its header
    /// visible; everything inside its span is hidden.
    pub expanded: bool,
    /// Number of data rows in the group's subtree.
    pub item_count: usize,
}

impl RowGroupInfo {
    /// Returns `true` if `slot` lies strictly inside the group's span
    /// (header excluded, last sub-item included).
    #[inline]
    pub fn span_contains(&self, slot: Slot) -> bool {
        self.slot < slot && slot <= self.last_sub_item_slot
    }
}

/// What a slot resolves to.
///
/// A slot holds either a data row or a group header, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotContent {
    /// The slot holds the data row with this row index.
    DataRow(usize),
    /// The slot holds the header line of this group.
    GroupHeader(GroupId),
    /// The slot is beyond the end of the layout.
    OutOfRange,
}

/// An immutable snapshot of a grid's group structure.
///
/// Groups are stored in depth-first order, sorted by header slot. An
/// ungrouped grid is represented by [`GroupLayout::flat`], where slots and
/// row indices coincide.
#[derive(Debug, Clone, Default)]
pub struct GroupLayout {
    /// Group infos in depth-first order (ascending header slot).
    infos: Vec<RowGroupInfo>,
    /// Total number of slots: data rows plus group header lines.
    slot_count: usize,
}

impl GroupLayout {
    /// Creates a layout from a depth-first ordered group table.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the infos are not sorted by header slot or
    /// if their IDs do not match their positions.
    pub fn new(infos: Vec<RowGroupInfo>, slot_count: usize) -> Self {
        debug_assert!(
            infos.windows(2).all(|w| w[0].slot < w[1].slot),
            "group infos must be sorted by header slot"
        );
        debug_assert!(
            infos.iter().enumerate().all(|(i, g)| g.id == GroupId(i)),
            "group ids must match their table positions"
        );
        Self { infos, slot_count }
    }

    /// Creates the layout of an ungrouped grid with `row_count` data rows.
    pub fn flat(row_count: usize) -> Self {
        Self {
            infos: Vec::new(),
            slot_count: row_count,
        }
    }

    /// All groups, in depth-first order.
    pub fn groups(&self) -> &[RowGroupInfo] {
        &self.infos
    }

    /// Looks up a group by ID.
    pub fn group(&self, id: GroupId) -> Option<&RowGroupInfo> {
        self.infos.get(id.0)
    }

    /// Total number of slots (data rows plus group headers).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Number of data rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.slot_count - self.infos.len()
    }

    /// Returns `true` if the grid has any groups.
    #[inline]
    pub fn is_grouped(&self) -> bool {
        !self.infos.is_empty()
    }

    // =========================================================================
    // Slot <-> row index translation
    // =========================================================================

    /// Number of group header lines occupying a slot less than or equal to
    /// `slot`.
    pub fn header_count_at_or_before(&self, slot: Slot) -> usize {
        self.infos.partition_point(|g| g.slot <= slot)
    }

    /// Returns the group whose header line occupies `slot`, if any.
    pub fn group_at_slot(&self, slot: Slot) -> Option<GroupId> {
        self.infos
            .binary_search_by(|g| g.slot.cmp(&slot))
            .ok()
            .map(GroupId)
    }

    /// Returns `true` if `slot` holds a group header line.
    #[inline]
    pub fn is_group_header(&self, slot: Slot) -> bool {
        self.group_at_slot(slot).is_some()
    }

    /// Translates a slot to the data row index it holds.
    ///
    /// Returns `None` when the slot holds a group header or is out of range.
    pub fn row_index_from_slot(&self, slot: Slot) -> Option<usize> {
        if slot.0 >= self.slot_count || self.is_group_header(slot) {
            return None;
        }
        Some(slot.0 - self.header_count_at_or_before(slot))
    }

    /// Translates a data row index to the slot it currently occupies.
    ///
    /// Returns `None` for out-of-range row indices rather than panicking,
    /// leaving fallback behavior to the caller.
    pub fn slot_from_row_index(&self, row: usize) -> Option<Slot> {
        if row >= self.row_count() {
            return None;
        }
        // A data row's slot is its row index plus the number of header lines
        // at or before that slot. Iterating slot = row + headers(slot)
        // converges to the least fixpoint, which is always the data slot:
        // any header fixpoint would require a smaller data fixpoint first.
        let mut slot = row;
        loop {
            let next = row + self.header_count_at_or_before(Slot(slot));
            if next == slot {
                break;
            }
            slot = next;
        }
        debug_assert!(!self.is_group_header(Slot(slot)));
        Some(Slot(slot))
    }

    /// Resolves a slot to its content.
    pub fn resolve_slot(&self, slot: Slot) -> SlotContent {
        if slot.0 >= self.slot_count {
            return SlotContent::OutOfRange;
        }
        match self.group_at_slot(slot) {
            Some(id) => SlotContent::GroupHeader(id),
            None => SlotContent::DataRow(slot.0 - self.header_count_at_or_before(slot)),
        }
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Returns `true` if the line at `slot` is visible.
    ///
    /// A slot is hidden when any group whose span strictly contains it is
    /// collapsed. A collapsed group's own header line stays visible unless an
    /// ancestor is itself collapsed.
    pub fn is_slot_visible(&self, slot: Slot) -> bool {
        if slot.0 >= self.slot_count {
            return false;
        }
        !self
            .infos
            .iter()
            .any(|g| !g.expanded && g.span_contains(slot))
    }

    // =========================================================================
    // Group structure
    // =========================================================================

    /// Row index of the first data row in the group's subtree.
    ///
    /// The header occupies `slot`, so the first data row sits at the slot's
    /// row-index position plus one:
    /// `slot - header_count_at_or_before(slot) + 1`.
    pub fn group_start_row_index(&self, id: GroupId) -> Option<usize> {
        let info = self.group(id)?;
        Some(info.slot.0 - self.header_count_at_or_before(info.slot) + 1)
    }

    /// The range of data row indices covered by the group's subtree.
    pub fn group_row_range(&self, id: GroupId) -> Option<std::ops::Range<usize>> {
        let start = self.group_start_row_index(id)?;
        let info = self.group(id)?;
        Some(start..start + info.item_count)
    }

    /// IDs of all top-level groups, in slot order.
    pub fn top_level_groups(&self) -> Vec<GroupId> {
        self.infos
            .iter()
            .filter(|g| g.level == 0)
            .map(|g| g.id)
            .collect()
    }

    /// IDs of the direct subgroups of `id`, in slot order.
    pub fn child_groups(&self, id: GroupId) -> Vec<GroupId> {
        let Some(parent) = self.group(id) else {
            return Vec::new();
        };
        self.infos
            .iter()
            .filter(|g| g.level == parent.level + 1 && parent.span_contains(g.slot))
            .map(|g| g.id)
            .collect()
    }

    /// The innermost group whose span contains `slot`, if any.
    ///
    /// A group's own header slot belongs to its *parent's* span, so passing
    /// a header slot yields the enclosing group, not the group itself.
    pub fn owning_group(&self, slot: Slot) -> Option<GroupId> {
        self.infos
            .iter()
            .filter(|g| g.span_contains(slot))
            .max_by_key(|g| g.level)
            .map(|g| g.id)
    }

    /// The parent group of `id`, or `None` for top-level groups.
    pub fn parent_group(&self, id: GroupId) -> Option<GroupId> {
        let info = self.group(id)?;
        self.owning_group(info.slot)
    }

    /// Returns `true` if the group has subgroups (rather than direct rows).
    pub fn has_child_groups(&self, id: GroupId) -> bool {
        match self.group(id) {
            Some(parent) => self
                .infos
                .iter()
                .any(|g| g.level == parent.level + 1 && parent.span_contains(g.slot)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Layout used throughout: two top-level groups, the first with two
    /// nested subgroups.
    ///
    /// ```text
    /// slot 0: [A]        header, level 0
    /// slot 1:   [A.1]    header, level 1
    /// slot 2:     row 0
    /// slot 3:     row 1
    /// slot 4:   [A.2]    header, level 1
    /// slot 5:     row 2
    /// slot 6: [B]        header, level 0
    /// slot 7:   row 3
    /// slot 8:   row 4
    /// ```
    fn nested_layout() -> GroupLayout {
        GroupLayout::new(
            vec![
                RowGroupInfo {
                    id: GroupId(0),
                    name: "A".into(),
                    level: 0,
                    slot: Slot(0),
                    last_sub_item_slot: Slot(5),
                    expanded: true,
                    item_count: 3,
                },
                RowGroupInfo {
                    id: GroupId(1),
                    name: "A.1".into(),
                    level: 1,
                    slot: Slot(1),
                    last_sub_item_slot: Slot(3),
                    expanded: true,
                    item_count: 2,
                },
                RowGroupInfo {
                    id: GroupId(2),
                    name: "A.2".into(),
                    level: 1,
                    slot: Slot(4),
                    last_sub_item_slot: Slot(5),
                    expanded: true,
                    item_count: 1,
                },
                RowGroupInfo {
                    id: GroupId(3),
                    name: "B".into(),
                    level: 0,
                    slot: Slot(6),
                    last_sub_item_slot: Slot(8),
                    expanded: true,
                    item_count: 2,
                },
            ],
            9,
        )
    }

    #[test]
    fn test_flat_layout_is_identity() {
        let layout = GroupLayout::flat(5);
        for i in 0..5 {
            assert_eq!(layout.row_index_from_slot(Slot(i)), Some(i));
            assert_eq!(layout.slot_from_row_index(i), Some(Slot(i)));
        }
        assert_eq!(layout.row_index_from_slot(Slot(5)), None);
        assert_eq!(layout.slot_from_row_index(5), None);
    }

    #[test]
    fn test_row_index_from_slot() {
        let layout = nested_layout();
        assert_eq!(layout.row_index_from_slot(Slot(0)), None); // header A
        assert_eq!(layout.row_index_from_slot(Slot(2)), Some(0));
        assert_eq!(layout.row_index_from_slot(Slot(3)), Some(1));
        assert_eq!(layout.row_index_from_slot(Slot(5)), Some(2));
        assert_eq!(layout.row_index_from_slot(Slot(7)), Some(3));
        assert_eq!(layout.row_index_from_slot(Slot(8)), Some(4));
        assert_eq!(layout.row_index_from_slot(Slot(9)), None); // out of range
    }

    #[test]
    fn test_slot_from_row_index() {
        let layout = nested_layout();
        assert_eq!(layout.slot_from_row_index(0), Some(Slot(2)));
        assert_eq!(layout.slot_from_row_index(1), Some(Slot(3)));
        assert_eq!(layout.slot_from_row_index(2), Some(Slot(5)));
        assert_eq!(layout.slot_from_row_index(3), Some(Slot(7)));
        assert_eq!(layout.slot_from_row_index(4), Some(Slot(8)));
        assert_eq!(layout.slot_from_row_index(5), None);
    }

    #[test]
    fn test_round_trip() {
        let layout = nested_layout();
        for slot in 0..layout.slot_count() {
            if let Some(row) = layout.row_index_from_slot(Slot(slot)) {
                assert_eq!(layout.slot_from_row_index(row), Some(Slot(slot)));
            }
        }
    }

    #[test]
    fn test_resolve_slot() {
        let layout = nested_layout();
        assert_eq!(layout.resolve_slot(Slot(0)), SlotContent::GroupHeader(GroupId(0)));
        assert_eq!(layout.resolve_slot(Slot(4)), SlotContent::GroupHeader(GroupId(2)));
        assert_eq!(layout.resolve_slot(Slot(7)), SlotContent::DataRow(3));
        assert_eq!(layout.resolve_slot(Slot(9)), SlotContent::OutOfRange);
    }

    #[test]
    fn test_group_start_and_range() {
        let layout = nested_layout();
        assert_eq!(layout.group_start_row_index(GroupId(0)), Some(0));
        assert_eq!(layout.group_start_row_index(GroupId(1)), Some(0));
        assert_eq!(layout.group_start_row_index(GroupId(2)), Some(2));
        assert_eq!(layout.group_start_row_index(GroupId(3)), Some(3));
        assert_eq!(layout.group_row_range(GroupId(0)), Some(0..3));
        assert_eq!(layout.group_row_range(GroupId(3)), Some(3..5));
    }

    #[test]
    fn test_group_members_map_into_span() {
        let layout = nested_layout();
        for info in layout.groups() {
            let range = layout.group_row_range(info.id).unwrap();
            for row in range {
                let slot = layout.slot_from_row_index(row).unwrap();
                assert!(
                    info.span_contains(slot),
                    "row {row} of {} must map between its header and span end",
                    info.name
                );
            }
        }
    }

    #[test]
    fn test_collapsed_visibility() {
        let mut infos = nested_layout().groups().to_vec();
        infos[1].expanded = false; // collapse A.1
        let layout = GroupLayout::new(infos, 9);

        assert!(layout.is_slot_visible(Slot(1))); // A.1's own header stays
        assert!(!layout.is_slot_visible(Slot(2)));
        assert!(!layout.is_slot_visible(Slot(3)));
        assert!(layout.is_slot_visible(Slot(4))); // sibling subgroup unaffected
        assert!(layout.is_slot_visible(Slot(7)));
    }

    #[test]
    fn test_collapsed_ancestor_hides_subgroup_header() {
        let mut infos = nested_layout().groups().to_vec();
        infos[0].expanded = false; // collapse A entirely
        let layout = GroupLayout::new(infos, 9);

        assert!(layout.is_slot_visible(Slot(0)));
        assert!(!layout.is_slot_visible(Slot(1)));
        assert!(!layout.is_slot_visible(Slot(5)));
        assert!(layout.is_slot_visible(Slot(6)));
    }

    #[test]
    fn test_owning_and_parent_groups() {
        let layout = nested_layout();
        assert_eq!(layout.owning_group(Slot(2)), Some(GroupId(1))); // row 0 in A.1
        assert_eq!(layout.owning_group(Slot(5)), Some(GroupId(2))); // row 2 in A.2
        assert_eq!(layout.owning_group(Slot(1)), Some(GroupId(0))); // A.1's header in A
        assert_eq!(layout.owning_group(Slot(0)), None); // A's header is top level
        assert_eq!(layout.parent_group(GroupId(1)), Some(GroupId(0)));
        assert_eq!(layout.parent_group(GroupId(0)), None);
        assert_eq!(layout.parent_group(GroupId(3)), None);
    }

    #[test]
    fn test_child_groups() {
        let layout = nested_layout();
        assert_eq!(layout.top_level_groups(), vec![GroupId(0), GroupId(3)]);
        assert_eq!(layout.child_groups(GroupId(0)), vec![GroupId(1), GroupId(2)]);
        assert!(layout.child_groups(GroupId(1)).is_empty());
        assert!(layout.has_child_groups(GroupId(0)));
        assert!(!layout.has_child_groups(GroupId(3)));
    }
}
