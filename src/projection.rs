//! The single source of display order and keyboard order.
//!
//! Rendering and keyboard navigation must both consume `project`; nothing else in the crate
//! walks the tree to decide what is on screen.

use crate::tree::FlatIndex;
use std::collections::HashSet;

/// Depth-first, pre-order list of displayable ids.
///
/// Every level (roots included) is filtered by `restriction` when one is given. Only folders
/// in `expanded` are descended into; leaves never are.
pub fn project(
    index: &FlatIndex,
    roots: &[String],
    expanded: &HashSet<String>,
    restriction: Option<&HashSet<String>>,
) -> Vec<String> {
    let mut ordered = Vec::new();
    let mut on_path = HashSet::new();

    for id in roots {
        walk(index, id, expanded, restriction, &mut ordered, &mut on_path);
    }

    ordered
}

fn walk(
    index: &FlatIndex,
    id: &str,
    expanded: &HashSet<String>,
    restriction: Option<&HashSet<String>>,
    ordered: &mut Vec<String>,
    on_path: &mut HashSet<String>,
) {
    if restriction.is_some_and(|allowed| !allowed.contains(id)) {
        return;
    }
    let Some(node) = index.get(id) else {
        return;
    };
    // A repeated id on the current path means malformed input; don't recurse forever
    if !on_path.insert(node.id.clone()) {
        return;
    }

    ordered.push(node.id.clone());

    if node.is_folder() && expanded.contains(&node.id) {
        for child_id in &node.children_ids {
            walk(index, child_id, expanded, restriction, ordered, on_path);
        }
    }

    on_path.remove(&node.id);
}
