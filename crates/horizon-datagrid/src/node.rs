//! AccessKit integration: control types, node building, tree updates, and
//! action routing.

use accesskit::{Action, ActionRequest, Node, NodeId, Role, Tree, TreeUpdate};

use horizon_datagrid_core::{DataGridHost, SlotContent};

use crate::automation::DataGridAutomation;
use crate::capability::Capability;
use crate::error::Result;
use crate::peer::{Peer, PeerKind};

/// The control-type classification of a peer.
///
/// A simplified vocabulary mapped onto AccessKit's `Role` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    /// The grid itself.
    DataGrid,
    /// A data row.
    DataItem,
    /// A row group.
    GroupItem,
    /// A text cell.
    Cell,
    /// A checkbox cell.
    CheckBoxCell,
    /// A column header.
    ColumnHeader,
    /// A row header.
    RowHeader,
}

impl ControlType {
    /// Convert to AccessKit's Role enum.
    pub fn to_accesskit_role(self) -> Role {
        match self {
            ControlType::DataGrid => Role::Grid,
            ControlType::DataItem => Role::Row,
            ControlType::GroupItem => Role::Group,
            ControlType::Cell => Role::Cell,
            ControlType::CheckBoxCell => Role::CheckBox,
            ControlType::ColumnHeader => Role::ColumnHeader,
            ControlType::RowHeader => Role::RowHeader,
        }
    }
}

impl From<ControlType> for Role {
    fn from(control_type: ControlType) -> Self {
        control_type.to_accesskit_role()
    }
}

impl Peer {
    /// Builds the AccessKit node describing this peer.
    ///
    /// Children are not included; tree builders attach them so that a
    /// single-node update never claims structure it did not verify.
    pub fn build_node(&self) -> Node {
        let mut node = Node::new(self.control_type().to_accesskit_role());

        let name = self.name();
        if !name.is_empty() {
            node.set_label(name);
        }
        let help = self.help_text();
        if !help.is_empty() {
            node.set_description(help);
        }

        let bounds = self.bounding_rectangle();
        if !bounds.is_empty() {
            node.set_bounds(accesskit::Rect {
                x0: bounds.x as f64,
                y0: bounds.y as f64,
                x1: (bounds.x + bounds.width) as f64,
                y1: (bounds.y + bounds.height) as f64,
            });
        }
        if self.is_offscreen() {
            node.set_hidden();
        }

        if let Ok(ctx) = self.context() {
            let host = ctx.host.as_ref();
            match self.kind() {
                PeerKind::Grid => {
                    node.set_row_count(host.row_count());
                    node.set_column_count(host.column_count());
                    if host.is_read_only() {
                        node.set_read_only();
                    }
                }
                PeerKind::Item(item) => {
                    if let Some(row) = host.row_index_of(item) {
                        node.set_row_index(row);
                        node.set_selected(host.is_row_selected(row));
                    }
                }
                PeerKind::Group(group) => {
                    if let Some(info) = host.group_layout().group(group) {
                        node.set_expanded(info.expanded);
                        node.set_level(info.level + 1);
                        node.set_row_count(info.item_count);
                        node.set_column_count(host.column_count());
                    }
                }
                PeerKind::Cell { item, column } => {
                    node.set_column_index(column);
                    if let Some(row) = host.row_index_of(item) {
                        node.set_row_index(row);
                        node.set_selected(host.is_row_selected(row));
                    }
                }
                PeerKind::ColumnHeader(_) | PeerKind::RowHeader(_) => {}
            }
        }

        let capabilities = self.capabilities();
        for capability in capabilities.iter() {
            match capability {
                Capability::Invoke => node.add_action(Action::Click),
                Capability::ScrollItem => node.add_action(Action::ScrollIntoView),
                Capability::SelectionItem => node.add_action(Action::Focus),
                Capability::ExpandCollapse => {
                    match self.expand_collapse_state() {
                        Ok(crate::peer::ExpandCollapseState::Expanded) => {
                            node.add_action(Action::Collapse)
                        }
                        _ => node.add_action(Action::Expand),
                    };
                }
                // Transform (column resize) has no AccessKit action; it is
                // reachable through the typed peer API only.
                _ => {}
            }
        }

        node
    }
}

impl DataGridAutomation {
    /// Builds a complete tree update rooted at the grid peer.
    ///
    /// Focus lands on the current cell when it is realized, on the current
    /// group header when currency sits on one, and on the root otherwise.
    pub fn build_tree_update(&self) -> TreeUpdate {
        let root = self.root_peer();
        let mut nodes = Vec::new();
        let mut stack = vec![root.clone()];

        while let Some(peer) = stack.pop() {
            let children = peer.children();
            let mut node = peer.build_node();
            if !children.is_empty() {
                node.set_children(children.iter().map(|c| c.node_id()).collect::<Vec<_>>());
            }
            nodes.push((peer.node_id(), node));
            // Add children to stack in reverse order for correct traversal
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }

        TreeUpdate {
            nodes,
            tree: Some(Tree::new(root.node_id())),
            focus: self.focused_node_id().unwrap_or_else(|| root.node_id()),
        }
    }

    fn focused_node_id(&self) -> Option<NodeId> {
        let ctx = self.ctx();
        let host = ctx.host.as_ref();
        let slot = host.current_slot()?;
        if !host.is_slot_realized(slot) {
            return None;
        }
        let layout = host.group_layout();
        match layout.resolve_slot(slot) {
            SlotContent::DataRow(row) => {
                let item = host.item_id(row)?;
                let column = host.current_column()?;
                Some(
                    ctx.registry
                        .get_or_create(ctx, PeerKind::Cell { item, column })
                        .node_id(),
                )
            }
            SlotContent::GroupHeader(group) => Some(
                ctx.registry
                    .get_or_create(ctx, PeerKind::Group(group))
                    .node_id(),
            ),
            SlotContent::OutOfRange => None,
        }
    }

    /// Routes an AccessKit action request to the typed peer operation.
    pub fn perform_action(&self, request: &ActionRequest) -> Result<()> {
        let peer = self
            .peer_from_node_id(request.target)
            .ok_or(crate::error::AutomationError::OperationCannotBePerformed)?;
        match request.action {
            Action::Click => peer.invoke(),
            Action::Focus => peer.select(),
            Action::ScrollIntoView => peer.scroll_into_view(),
            Action::Expand => peer.expand(),
            Action::Collapse => peer.collapse(),
            _ => Err(crate::error::AutomationError::OperationCannotBePerformed),
        }
    }
}
