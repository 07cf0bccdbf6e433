//! Walks the automation tree of a grouped headless grid and prints it.
//!
//! Run with:
//!
//! ```sh
//! cargo run --example headless_tree
//! ```

use std::sync::Arc;

use horizon_datagrid::{DataGridAutomation, Peer};
use horizon_datagrid_core::{ColumnInfo, GroupDesc, SimpleDataGrid};

fn print_tree(peer: &Arc<Peer>, indent: usize) {
    let name = peer.name();
    let caps: Vec<String> = peer.capabilities().iter().map(|c| format!("{c:?}")).collect();
    println!(
        "{:indent$}{:?} \"{}\" [{}]",
        "",
        peer.control_type(),
        name,
        caps.join(", "),
        indent = indent * 2
    );
    for child in peer.children() {
        print_tree(&child, indent + 1);
    }
}

fn main() {
    let grid = Arc::new(
        SimpleDataGrid::new(vec![
            ColumnInfo::new("Task"),
            ColumnInfo::new("Owner").with_sortable(false),
        ])
        .with_rows(vec![
            vec!["Triage incoming reports".into(), "ana".into()],
            vec!["Review pull requests".into(), "ben".into()],
            vec!["Cut the release".into(), "ana".into()],
            vec!["Update the changelog".into(), "kim".into()],
        ])
        .with_groups(vec![
            GroupDesc::rows("In progress", 2),
            GroupDesc::rows("Done", 2),
        ])
        .with_realized_window(4),
    );
    let automation = DataGridAutomation::new(grid.clone());

    println!("Automation tree:");
    print_tree(&automation.root_peer(), 0);

    // Select a row through the accessibility surface and re-inspect it.
    let item = automation.item_peer(2).expect("row 2 exists");
    item.select().expect("selection is allowed");
    println!(
        "\nAfter select: row 2 selected = {}, bounds = {:?}",
        item.is_selected().unwrap(),
        item.bounding_rectangle()
    );

    let update = automation.build_tree_update();
    println!(
        "\nAccessKit tree update carries {} nodes, focus on {:?}",
        update.nodes.len(),
        update.focus
    );
}
