//! Peers: the objects the automation tree is made of.
//!
//! A peer is a lightweight, cached view over one logical grid element. There
//! is a single [`Peer`] type; what an instance represents is its
//! [`PeerKind`], and the operations it supports are negotiated per call
//! through its capability set rather than through interface inheritance.
//!
//! Most peers describe logical elements that may or may not have a realized
//! on-screen backing at any instant. Every property query resolves that
//! once, into [`RowBacking`], and unrealized peers answer with degraded
//! defaults — empty rectangle, not focusable, off-screen — instead of
//! faulting.

mod cell;
mod grid;
mod group;
mod header;
mod item;

pub use cell::GridItemInfo;
pub use group::ExpandCollapseState;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use accesskit::NodeId;

use horizon_datagrid_core::{DataGridHost, GroupId, ItemId, RealizedRow, Rect};

use crate::automation::AutomationContext;
use crate::capability::{Capability, CapabilitySet};
use crate::error::{AutomationError, Result};
use crate::node::ControlType;

/// Nominal header line height used for synthesized column-header bounds.
pub(crate) const HEADER_HEIGHT: f32 = 24.0;

/// What a peer represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerKind {
    /// The grid itself (the automation tree root).
    Grid,
    /// A logical data row, identified by its item.
    Item(ItemId),
    /// A row group.
    Group(GroupId),
    /// One cell of a data row.
    Cell { item: ItemId, column: usize },
    /// A column's header.
    ColumnHeader(usize),
    /// A data row's header.
    RowHeader(ItemId),
}

/// Presence of a realized on-screen element behind a peer.
pub(crate) enum RowBacking {
    /// The element is realized; live geometry is available.
    Realized(RealizedRow),
    /// The element is off-screen or hidden; only degraded answers exist.
    Unrealized,
}

/// One element of the automation tree.
///
/// Peers are created through the registry and always handled as
/// `Arc<Peer>`; the registry guarantees one live instance per domain object
/// per realization epoch, so `Arc::ptr_eq` is an identity test.
pub struct Peer {
    kind: PeerKind,
    node_id: NodeId,
    epoch: AtomicU64,
    ctx: Weak<AutomationContext>,
}

impl Peer {
    pub(crate) fn new(
        ctx: &Arc<AutomationContext>,
        kind: PeerKind,
        node_id: NodeId,
        epoch: u64,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind,
            node_id,
            epoch: AtomicU64::new(epoch),
            ctx: Arc::downgrade(ctx),
        })
    }

    /// What this peer represents.
    pub fn kind(&self) -> PeerKind {
        self.kind
    }

    /// The peer's stable AccessKit node ID.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// The realization epoch this peer was created (or last revalidated) in.
    pub fn creation_epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub(crate) fn stamp_epoch(&self, epoch: u64) {
        self.epoch.store(epoch, Ordering::Release);
    }

    /// Returns `true` once the registry's epoch has advanced past this
    /// peer's without revalidation, or the owning automation was dropped.
    pub fn is_stale(&self) -> bool {
        match self.ctx.upgrade() {
            Some(ctx) => self.creation_epoch() < ctx.registry.epoch(),
            None => true,
        }
    }

    pub(crate) fn context(&self) -> Result<Arc<AutomationContext>> {
        self.ctx
            .upgrade()
            .ok_or(AutomationError::OperationCannotBePerformed)
    }

    /// Fails with [`AutomationError::ElementNotEnabled`] when the grid is
    /// disabled. Every mutating operation calls this first.
    pub(crate) fn ensure_enabled(&self) -> Result<Arc<AutomationContext>> {
        let ctx = self.context()?;
        if !ctx.host.is_enabled() {
            return Err(AutomationError::ElementNotEnabled);
        }
        Ok(ctx)
    }

    /// Whether the grid behind this peer accepts interaction.
    pub fn is_enabled(&self) -> bool {
        self.ctx
            .upgrade()
            .is_some_and(|ctx| ctx.host.is_enabled())
    }

    // =========================================================================
    // Backing resolution
    // =========================================================================

    /// Resolves the realized element behind this peer, once per query.
    pub(crate) fn backing(&self) -> RowBacking {
        let Some(ctx) = self.ctx.upgrade() else {
            return RowBacking::Unrealized;
        };
        let host = ctx.host.as_ref();
        let layout = host.group_layout();
        let slot = match self.kind {
            PeerKind::Item(item) | PeerKind::RowHeader(item) | PeerKind::Cell { item, .. } => host
                .row_index_of(item)
                .and_then(|row| layout.slot_from_row_index(row)),
            PeerKind::Group(group) => layout.group(group).map(|g| g.slot),
            PeerKind::Grid | PeerKind::ColumnHeader(_) => None,
        };
        match slot.and_then(|slot| host.realized_row(slot)) {
            Some(row) => RowBacking::Realized(row),
            None => RowBacking::Unrealized,
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// The accessible name announced for this peer.
    pub fn name(&self) -> String {
        let Some(ctx) = self.ctx.upgrade() else {
            return String::new();
        };
        let host = ctx.host.as_ref();
        match self.kind {
            PeerKind::Grid => String::new(),
            PeerKind::Item(item) => host
                .row_index_of(item)
                .and_then(|row| host.cell_text(row, 0))
                .unwrap_or_default(),
            PeerKind::Group(group) => host
                .group_layout()
                .group(group)
                .map(|g| g.name.clone())
                .unwrap_or_default(),
            PeerKind::Cell { item, column } => host
                .row_index_of(item)
                .and_then(|row| host.cell_text(row, column))
                .unwrap_or_default(),
            PeerKind::ColumnHeader(column) => host
                .column(column)
                .map(|c| c.header)
                .unwrap_or_default(),
            PeerKind::RowHeader(item) => host
                .row_index_of(item)
                .and_then(|row| host.row_header_text(row))
                .unwrap_or_default(),
        }
    }

    /// Supplementary help text; the sort direction for sorted column
    /// headers, empty elsewhere.
    pub fn help_text(&self) -> String {
        let Some(ctx) = self.ctx.upgrade() else {
            return String::new();
        };
        match self.kind {
            PeerKind::ColumnHeader(column) => ctx
                .host
                .column(column)
                .and_then(|c| c.sort_direction)
                .map(|d| {
                    match d {
                        horizon_datagrid_core::SortDirection::Ascending => "Ascending",
                        horizon_datagrid_core::SortDirection::Descending => "Descending",
                    }
                    .to_string()
                })
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// The control-type classification reported to assistive technology.
    pub fn control_type(&self) -> ControlType {
        let column_kind = |ctx: &Arc<AutomationContext>, column: usize| {
            ctx.host.column(column).map(|c| c.kind).unwrap_or_default()
        };
        match self.kind {
            PeerKind::Grid => ControlType::DataGrid,
            PeerKind::Item(_) => ControlType::DataItem,
            PeerKind::Group(_) => ControlType::GroupItem,
            PeerKind::Cell { column, .. } => match self.ctx.upgrade() {
                Some(ctx) => match column_kind(&ctx, column) {
                    horizon_datagrid_core::ColumnKind::CheckBox => ControlType::CheckBoxCell,
                    horizon_datagrid_core::ColumnKind::Text => ControlType::Cell,
                },
                None => ControlType::Cell,
            },
            PeerKind::ColumnHeader(_) => ControlType::ColumnHeader,
            PeerKind::RowHeader(_) => ControlType::RowHeader,
        }
    }

    /// The peer's bounding rectangle in viewport coordinates.
    ///
    /// Unrealized peers answer [`Rect::ZERO`].
    pub fn bounding_rectangle(&self) -> Rect {
        let Some(ctx) = self.ctx.upgrade() else {
            return Rect::ZERO;
        };
        let host = ctx.host.as_ref();
        match self.kind {
            PeerKind::Grid => {
                let h = host.scroll_extent(horizon_datagrid_core::Orientation::Horizontal);
                let v = host.scroll_extent(horizon_datagrid_core::Orientation::Vertical);
                Rect::new(0.0, 0.0, h.viewport, v.viewport)
            }
            PeerKind::ColumnHeader(column) => {
                if !host.are_column_headers_visible() || host.column(column).is_none() {
                    return Rect::ZERO;
                }
                let x: f32 = (0..column)
                    .filter_map(|i| host.column(i))
                    .map(|c| c.width)
                    .sum();
                let width = host.column(column).map(|c| c.width).unwrap_or(0.0);
                Rect::new(x, 0.0, width, HEADER_HEIGHT)
            }
            PeerKind::Item(_) | PeerKind::Group(_) => match self.backing() {
                RowBacking::Realized(row) => row.bounds,
                RowBacking::Unrealized => Rect::ZERO,
            },
            PeerKind::Cell { column, .. } => match self.backing() {
                RowBacking::Realized(row) => {
                    row.cell_bounds.get(column).copied().unwrap_or(Rect::ZERO)
                }
                RowBacking::Unrealized => Rect::ZERO,
            },
            PeerKind::RowHeader(_) => match self.backing() {
                RowBacking::Realized(row) => row.header_bounds.unwrap_or(Rect::ZERO),
                RowBacking::Unrealized => Rect::ZERO,
            },
        }
    }

    /// Returns `true` when the peer's element is not on screen.
    pub fn is_offscreen(&self) -> bool {
        match self.kind {
            PeerKind::Grid | PeerKind::ColumnHeader(_) => false,
            _ => matches!(self.backing(), RowBacking::Unrealized),
        }
    }

    /// Returns `true` when the peer's element can take keyboard focus.
    pub fn is_keyboard_focusable(&self) -> bool {
        match self.kind {
            PeerKind::Cell { .. } => true,
            PeerKind::Item(_) | PeerKind::Group(_) => {
                matches!(self.backing(), RowBacking::Realized(_))
            }
            _ => false,
        }
    }

    /// Returns `true` when the peer's element currently holds focus.
    pub fn has_keyboard_focus(&self) -> bool {
        let RowBacking::Realized(row) = self.backing() else {
            return false;
        };
        if !row.has_focus {
            return false;
        }
        match self.kind {
            PeerKind::Cell { column, .. } => self
                .ctx
                .upgrade()
                .is_some_and(|ctx| ctx.host.current_column() == Some(column)),
            _ => true,
        }
    }

    /// The capabilities this peer offers right now.
    ///
    /// Recomputed on every call from live grid configuration.
    pub fn capabilities(&self) -> CapabilitySet {
        let Some(ctx) = self.ctx.upgrade() else {
            return CapabilitySet::EMPTY;
        };
        let host = ctx.host.as_ref();
        match self.kind {
            PeerKind::Grid => CapabilitySet::for_grid(),
            PeerKind::Item(_) => CapabilitySet::for_item(host),
            PeerKind::Group(_) => CapabilitySet::for_group(host),
            PeerKind::Cell { column, .. } => {
                CapabilitySet::for_cell(host, host.column(column).as_ref())
            }
            PeerKind::ColumnHeader(column) => {
                CapabilitySet::for_column_header(host, host.column(column).as_ref())
            }
            PeerKind::RowHeader(_) => CapabilitySet::for_row_header(),
        }
    }

    pub(crate) fn require_capability(&self, capability: Capability) -> Result<()> {
        if self.capabilities().contains(capability) {
            Ok(())
        } else {
            Err(AutomationError::OperationCannotBePerformed)
        }
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// The peer's child peers, created on demand.
    ///
    /// The tree is complete over the logical model: unrealized rows and
    /// groups appear as children even though they have no on-screen backing
    /// yet. Cells are the exception — a row's cell children exist only
    /// while the row is realized, matching the underlying element tree.
    pub fn children(&self) -> Vec<Arc<Peer>> {
        let Some(ctx) = self.ctx.upgrade() else {
            return Vec::new();
        };
        let host = ctx.host.as_ref();
        let layout = host.group_layout();
        match self.kind {
            PeerKind::Grid => {
                let mut children = Vec::new();
                if host.are_column_headers_visible() {
                    for column in 0..host.column_count() {
                        children
                            .push(ctx.registry.get_or_create(&ctx, PeerKind::ColumnHeader(column)));
                    }
                }
                if layout.is_grouped() {
                    for group in layout.top_level_groups() {
                        children.push(ctx.registry.get_or_create(&ctx, PeerKind::Group(group)));
                    }
                } else {
                    for row in 0..host.row_count() {
                        if let Some(item) = host.item_id(row) {
                            children.push(ctx.registry.get_or_create(&ctx, PeerKind::Item(item)));
                        }
                    }
                }
                children
            }
            PeerKind::Group(group) => {
                let subgroups = layout.child_groups(group);
                if !subgroups.is_empty() {
                    return subgroups
                        .into_iter()
                        .map(|sub| ctx.registry.get_or_create(&ctx, PeerKind::Group(sub)))
                        .collect();
                }
                let Some(range) = layout.group_row_range(group) else {
                    return Vec::new();
                };
                range
                    .filter_map(|row| host.item_id(row))
                    .map(|item| ctx.registry.get_or_create(&ctx, PeerKind::Item(item)))
                    .collect()
            }
            PeerKind::Item(item) => {
                if matches!(self.backing(), RowBacking::Unrealized) {
                    return Vec::new();
                }
                let mut children = Vec::new();
                if host.are_row_headers_visible() {
                    children.push(ctx.registry.get_or_create(&ctx, PeerKind::RowHeader(item)));
                }
                for column in 0..host.column_count() {
                    children.push(
                        ctx.registry
                            .get_or_create(&ctx, PeerKind::Cell { item, column }),
                    );
                }
                children
            }
            PeerKind::Cell { .. } | PeerKind::ColumnHeader(_) | PeerKind::RowHeader(_) => {
                Vec::new()
            }
        }
    }

    /// The peer's parent in the automation tree, `None` for the root.
    ///
    /// Resolved through the peer's owning container: cells and row headers
    /// belong to their item, items to their innermost group (or the grid),
    /// groups to their parent group (or the grid).
    pub fn parent(&self) -> Option<Arc<Peer>> {
        let ctx = self.ctx.upgrade()?;
        let host = ctx.host.as_ref();
        let layout = host.group_layout();
        let parent_kind = match self.kind {
            PeerKind::Grid => return None,
            PeerKind::ColumnHeader(_) => PeerKind::Grid,
            PeerKind::Cell { item, .. } | PeerKind::RowHeader(item) => PeerKind::Item(item),
            PeerKind::Item(item) => {
                let row = host.row_index_of(item)?;
                layout
                    .slot_from_row_index(row)
                    .and_then(|slot| layout.owning_group(slot))
                    .map_or(PeerKind::Grid, PeerKind::Group)
            }
            PeerKind::Group(group) => layout
                .parent_group(group)
                .map_or(PeerKind::Grid, PeerKind::Group),
        };
        Some(ctx.registry.get_or_create(&ctx, parent_kind))
    }

    // =========================================================================
    // Capability operations (dispatched by kind)
    // =========================================================================

    /// Activates the element: begins or commits an edit on rows and cells,
    /// toggles the sort on column headers.
    pub fn invoke(&self) -> Result<()> {
        match self.kind {
            PeerKind::Item(_) => self.item_invoke(),
            PeerKind::Cell { .. } => self.cell_invoke(),
            PeerKind::ColumnHeader(_) => self.column_header_invoke(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Scrolls the element into view.
    pub fn scroll_into_view(&self) -> Result<()> {
        match self.kind {
            PeerKind::Item(_) => self.item_scroll_into_view(),
            PeerKind::Group(_) => self.group_scroll_into_view(),
            PeerKind::Cell { .. } => self.cell_scroll_into_view(),
            PeerKind::ColumnHeader(_) => self.column_header_scroll_into_view(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Makes the element the selection, clearing any other selected items.
    pub fn select(&self) -> Result<()> {
        match self.kind {
            PeerKind::Item(_) => self.item_select(),
            PeerKind::Cell { .. } => self.cell_select(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Adds the element to the selection.
    pub fn add_to_selection(&self) -> Result<()> {
        match self.kind {
            PeerKind::Item(_) => self.item_add_to_selection(),
            PeerKind::Cell { .. } => self.cell_add_to_selection(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Removes the element from the selection.
    pub fn remove_from_selection(&self) -> Result<()> {
        match self.kind {
            PeerKind::Item(_) => self.item_remove_from_selection(),
            PeerKind::Cell { .. } => self.cell_remove_from_selection(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Whether the element is selected.
    pub fn is_selected(&self) -> Result<bool> {
        match self.kind {
            PeerKind::Item(_) => self.item_is_selected(),
            PeerKind::Cell { .. } => self.cell_is_selected(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// The currently selected elements within this container.
    pub fn selection(&self) -> Result<Vec<Arc<Peer>>> {
        match self.kind {
            PeerKind::Grid => self.grid_selection(),
            PeerKind::Item(_) => self.item_selection(),
            PeerKind::Group(_) => self.group_selection(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Whether this container allows more than one selected element.
    pub fn can_select_multiple(&self) -> bool {
        match self.kind {
            PeerKind::Grid | PeerKind::Group(_) => self
                .ctx
                .upgrade()
                .is_some_and(|ctx| {
                    ctx.host.selection_mode() == horizon_datagrid_core::SelectionMode::Extended
                }),
            _ => false,
        }
    }

    /// Whether this container requires a selection. Always `false`.
    pub fn is_selection_required(&self) -> bool {
        false
    }

    /// Expands a group.
    pub fn expand(&self) -> Result<()> {
        match self.kind {
            PeerKind::Group(_) => self.group_set_expanded(true),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Collapses a group.
    pub fn collapse(&self) -> Result<()> {
        match self.kind {
            PeerKind::Group(_) => self.group_set_expanded(false),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// A group's expand/collapse state.
    pub fn expand_collapse_state(&self) -> Result<ExpandCollapseState> {
        match self.kind {
            PeerKind::Group(_) => self.group_expand_collapse_state(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Resizes a column to `width`.
    pub fn resize(&self, width: f32) -> Result<()> {
        match self.kind {
            PeerKind::ColumnHeader(_) => self.column_header_resize(width),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Number of rows this container navigates over.
    pub fn row_count(&self) -> Result<usize> {
        match self.kind {
            PeerKind::Grid => self.grid_row_count(),
            PeerKind::Group(_) => self.group_row_count(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Number of columns this container navigates over.
    pub fn column_count(&self) -> Result<usize> {
        match self.kind {
            PeerKind::Grid | PeerKind::Group(_) => {
                let ctx = self.context()?;
                Ok(ctx.host.column_count())
            }
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Resolves the cell peer at `(row, column)`, realizing its row first.
    ///
    /// On a group peer, `row` is relative to the group.
    pub fn get_item(&self, row: usize, column: usize) -> Result<Arc<Peer>> {
        match self.kind {
            PeerKind::Grid => self.grid_get_item(row, column),
            PeerKind::Group(_) => self.group_get_item(row, column),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// A cell's grid coordinates.
    pub fn grid_item(&self) -> Result<GridItemInfo> {
        match self.kind {
            PeerKind::Cell { .. } => self.cell_grid_item(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Header peers of the column(s) this element belongs to.
    pub fn column_header_items(&self) -> Result<Vec<Arc<Peer>>> {
        match self.kind {
            PeerKind::Grid => self.grid_column_headers(),
            PeerKind::Cell { .. } => self.cell_column_header_items(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }

    /// Header peers of the row(s) this element belongs to.
    pub fn row_header_items(&self) -> Result<Vec<Arc<Peer>>> {
        match self.kind {
            PeerKind::Grid => self.grid_row_headers(),
            PeerKind::Cell { .. } => self.cell_row_header_items(),
            _ => Err(AutomationError::OperationCannotBePerformed),
        }
    }
}

impl std::fmt::Debug for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer")
            .field("kind", &self.kind)
            .field("node_id", &self.node_id)
            .field("epoch", &self.creation_epoch())
            .finish()
    }
}
