//! Incremental reconciliation of fetched children lists into the tree.
//!
//! The server only ever returns the direct children of one directory (or the
//! root folders). [`updated_tree`] merges such a list into the previous tree so
//! that:
//!
//! - nodes whose displayed attributes did not change keep their `Arc`,
//! - only the refreshed node and its ancestors are rebuilt,
//! - children that disappeared are dropped with their whole subtree.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use gridstudy_core::types::ElementId;

use crate::node::{DirectoryNode, DirectoryTree, ElementAttributes, NodeMap};

/// Merges the authoritative children list of `node_id` into `prev`.
///
/// `node_id == None` refreshes the root folders. Returns `prev` itself (same
/// allocations) when the reconciled children are identical to the previous
/// ones.
pub fn updated_tree(
    prev: &DirectoryTree,
    node_id: Option<ElementId>,
    mut children: Vec<ElementAttributes>,
) -> DirectoryTree {
    let prev_nodes = prev.nodes();

    let prev_children: &[Arc<DirectoryNode>] = match node_id {
        None => prev.roots().as_slice(),
        Some(id) => match prev_nodes.get(&id) {
            Some(node) => node.children.as_slice(),
            None => {
                debug!(directory = %id, "Children fetched for a directory absent from the tree");
                return prev.clone();
            }
        },
    };

    children.sort_by_cached_key(|c| (c.element_name.to_lowercase(), c.element_name.clone()));

    let next_children: Vec<Arc<DirectoryNode>> = children
        .iter()
        .map(|attrs| reconciled_child(prev_nodes, node_id, attrs))
        .collect();

    if same_nodes(prev_children, &next_children) {
        return prev.clone();
    }

    let next_ids: HashSet<ElementId> = next_children.iter().map(|n| n.element_uuid).collect();
    let dropped = dropped_ids(prev_nodes, node_id, prev_children, &next_ids);

    let mut nodes: NodeMap = prev_nodes
        .iter()
        .filter(|(id, _)| !dropped.contains(id))
        .map(|(id, node)| (*id, Arc::clone(node)))
        .collect();
    for child in &next_children {
        nodes.insert(child.element_uuid, Arc::clone(child));
    }

    let roots = match node_id {
        None => next_children,
        Some(id) => {
            // Presence checked above.
            if let Some(prev_node) = prev_nodes.get(&id) {
                let subdirectories_count = next_children.len() as u32;
                let mut rebuilt = prev_node.with_children(next_children);
                rebuilt.subdirectories_count = subdirectories_count;
                for node in refreshed_up_nodes(&nodes, Arc::new(rebuilt)) {
                    nodes.insert(node.element_uuid, node);
                }
            }
            prev.roots()
                .iter()
                .map(|root| {
                    nodes
                        .get(&root.element_uuid)
                        .cloned()
                        .unwrap_or_else(|| Arc::clone(root))
                })
                .collect()
        }
    };

    debug!(
        directory = ?node_id,
        dropped = dropped.len(),
        nodes = nodes.len(),
        "Directory tree reconciled"
    );

    DirectoryTree::new(roots, nodes)
}

/// Reuses, updates, or creates the node for one fetched child.
fn reconciled_child(
    prev_nodes: &NodeMap,
    parent: Option<ElementId>,
    attrs: &ElementAttributes,
) -> Arc<DirectoryNode> {
    let Some(prev) = prev_nodes.get(&attrs.element_uuid) else {
        return Arc::new(DirectoryNode::from_attributes(attrs, parent));
    };

    if prev.element_name == attrs.element_name
        && prev.access_rights.is_private == attrs.access_rights.is_private
        && prev.subdirectories_count == attrs.subdirectories_count
        && prev.parent_uuid == parent
    {
        return Arc::clone(prev);
    }

    if prev.parent_uuid != parent {
        warn!(
            element = %attrs.element_uuid,
            from = ?prev.parent_uuid,
            to = ?parent,
            "Directory element reparented"
        );
    }

    let mut updated = prev.with_children(prev.children.clone());
    updated.element_name = attrs.element_name.clone();
    updated.access_rights = attrs.access_rights;
    updated.subdirectories_count = attrs.subdirectories_count;
    updated.parent_uuid = parent;
    Arc::new(updated)
}

/// Ids of the removed children and of everything still attached under them.
///
/// A node is only dropped while the map still records it under its dropped
/// parent (or under `parent` for the removed children themselves), so an
/// element already moved elsewhere survives.
fn dropped_ids(
    prev_nodes: &NodeMap,
    parent: Option<ElementId>,
    prev_children: &[Arc<DirectoryNode>],
    next_ids: &HashSet<ElementId>,
) -> HashSet<ElementId> {
    let mut dropped = HashSet::new();
    for removed in prev_children.iter().filter(|c| {
        !next_ids.contains(&c.element_uuid)
            && prev_nodes
                .get(&c.element_uuid)
                .is_some_and(|current| current.parent_uuid == parent)
    }) {
        let subtree = flatten_down_nodes_with(removed, |node| {
            node.children
                .iter()
                .filter(|c| {
                    prev_nodes
                        .get(&c.element_uuid)
                        .is_some_and(|current| current.parent_uuid == Some(node.element_uuid))
                })
                .cloned()
                .collect()
        });
        dropped.extend(
            subtree
                .iter()
                .map(|n| n.element_uuid)
                .filter(|id| !next_ids.contains(id)),
        );
    }
    dropped
}

fn same_nodes(a: &[Arc<DirectoryNode>], b: &[Arc<DirectoryNode>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

/// The node followed by all its descendants, depth-first, parents first.
pub fn flatten_down_nodes(node: &Arc<DirectoryNode>) -> Vec<Arc<DirectoryNode>> {
    flatten_down_nodes_with(node, |n| n.children.clone())
}

/// Like [`flatten_down_nodes`], descending through `children_of` only.
pub fn flatten_down_nodes_with<F>(node: &Arc<DirectoryNode>, children_of: F) -> Vec<Arc<DirectoryNode>>
where
    F: Fn(&DirectoryNode) -> Vec<Arc<DirectoryNode>>,
{
    let mut out = Vec::new();
    let mut stack = vec![Arc::clone(node)];
    while let Some(current) = stack.pop() {
        let children = children_of(&current);
        stack.extend(children.into_iter().rev());
        out.push(current);
    }
    out
}

/// Rebuilds every ancestor of `node` so that it references the new child.
///
/// Returns `node` followed by the rebuilt parent, grand-parent, and so on up
/// to the root. Siblings are shared, not copied.
pub fn refreshed_up_nodes(nodes: &NodeMap, node: Arc<DirectoryNode>) -> Vec<Arc<DirectoryNode>> {
    let mut out = vec![Arc::clone(&node)];
    let mut current = node;
    while let Some(parent_id) = current.parent_uuid {
        let Some(parent) = nodes.get(&parent_id) else {
            break;
        };
        if out.len() > nodes.len() {
            warn!(directory = %parent_id, "Cycle detected while refreshing ancestors");
            break;
        }
        let children = parent
            .children
            .iter()
            .map(|c| {
                if c.element_uuid == current.element_uuid {
                    Arc::clone(&current)
                } else {
                    Arc::clone(c)
                }
            })
            .collect();
        let rebuilt = Arc::new(parent.with_children(children));
        out.push(Arc::clone(&rebuilt));
        current = rebuilt;
    }
    out
}

/// Rebuilds a complete id to node map from the roots.
pub fn map_from_roots(roots: &[Arc<DirectoryNode>]) -> NodeMap {
    roots
        .iter()
        .flat_map(flatten_down_nodes)
        .map(|n| (n.element_uuid, n))
        .collect()
}

impl DirectoryTree {
    /// Same roots, with the map rebuilt from them. Entries not reachable from
    /// a root are purged.
    pub fn purged(&self) -> DirectoryTree {
        let nodes = map_from_roots(self.roots());
        DirectoryTree::new(self.roots().to_vec(), nodes)
    }
}
