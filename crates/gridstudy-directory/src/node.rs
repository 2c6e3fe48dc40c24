//! Directory element and tree node types.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gridstudy_core::types::ElementId;

/// Kind of a directory element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    /// A directory, the only kind that appears in the tree.
    Directory,
    /// A study.
    Study,
    /// An equipment filter.
    Filter,
    /// A contingency list.
    ContingencyList,
    /// A network modification.
    Modification,
    /// An imported case.
    Case,
    /// A computation parameters set.
    Parameters,
    /// Any element kind this client does not know about.
    #[serde(other)]
    Other,
}

/// Access rights of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRights {
    /// Whether the element is visible to its owner only.
    pub is_private: bool,
}

/// An element as returned by the directory server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAttributes {
    /// Element identifier.
    pub element_uuid: ElementId,
    /// Display name.
    pub element_name: String,
    /// Element kind.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// Access rights.
    #[serde(default)]
    pub access_rights: AccessRights,
    /// Number of direct subdirectories.
    #[serde(default)]
    pub subdirectories_count: u32,
    /// Owner user id.
    #[serde(default)]
    pub owner: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Last modification time.
    #[serde(default)]
    pub last_modification_date: Option<DateTime<Utc>>,
}

impl ElementAttributes {
    /// Whether this element is a directory.
    pub fn is_directory(&self) -> bool {
        self.element_type == ElementType::Directory
    }
}

/// A node of the in-memory directory tree.
///
/// Nodes are shared through `Arc`. `children` holds the same `Arc`s that the
/// node map holds for those children, so identity can be compared with
/// [`Arc::ptr_eq`].
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryNode {
    /// Element identifier.
    pub element_uuid: ElementId,
    /// Display name.
    pub element_name: String,
    /// Parent directory, `None` for roots.
    pub parent_uuid: Option<ElementId>,
    /// Element kind.
    pub element_type: ElementType,
    /// Access rights.
    pub access_rights: AccessRights,
    /// Number of direct subdirectories, as last reported.
    pub subdirectories_count: u32,
    /// Direct children, sorted by name. Empty until the directory is fetched.
    pub children: Vec<Arc<DirectoryNode>>,
}

impl DirectoryNode {
    /// Materializes a node seen for the first time.
    pub fn from_attributes(attrs: &ElementAttributes, parent: Option<ElementId>) -> Self {
        Self {
            element_uuid: attrs.element_uuid,
            element_name: attrs.element_name.clone(),
            parent_uuid: parent,
            element_type: attrs.element_type,
            access_rights: attrs.access_rights,
            subdirectories_count: attrs.subdirectories_count,
            children: Vec::new(),
        }
    }

    /// Copy of this node with another children list.
    pub fn with_children(&self, children: Vec<Arc<DirectoryNode>>) -> Self {
        Self {
            element_uuid: self.element_uuid,
            element_name: self.element_name.clone(),
            parent_uuid: self.parent_uuid,
            element_type: self.element_type,
            access_rights: self.access_rights,
            subdirectories_count: self.subdirectories_count,
            children,
        }
    }
}

/// Map from element id to tree node.
pub type NodeMap = HashMap<ElementId, Arc<DirectoryNode>>;

/// The `[roots, map]` pair describing the whole in-memory tree.
///
/// Cloning is cheap. Two trees are the [`same`](DirectoryTree::same_as) when
/// both their roots list and their map are the same allocations.
#[derive(Debug, Clone, Default)]
pub struct DirectoryTree {
    roots: Arc<Vec<Arc<DirectoryNode>>>,
    nodes: Arc<NodeMap>,
}

impl DirectoryTree {
    /// Creates a tree from its parts.
    pub fn new(roots: Vec<Arc<DirectoryNode>>, nodes: NodeMap) -> Self {
        Self {
            roots: Arc::new(roots),
            nodes: Arc::new(nodes),
        }
    }

    /// Root directories, sorted by name.
    pub fn roots(&self) -> &Arc<Vec<Arc<DirectoryNode>>> {
        &self.roots
    }

    /// Id to node map.
    pub fn nodes(&self) -> &Arc<NodeMap> {
        &self.nodes
    }

    /// Looks up a node.
    pub fn get(&self, id: &ElementId) -> Option<&Arc<DirectoryNode>> {
        self.nodes.get(id)
    }

    /// Whether a node is known.
    pub fn contains(&self, id: &ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of known nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node is known.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether both trees share the same roots list and map allocations.
    pub fn same_as(&self, other: &DirectoryTree) -> bool {
        Arc::ptr_eq(&self.roots, &other.roots) && Arc::ptr_eq(&self.nodes, &other.nodes)
    }

    /// Ids of the nodes from `id` up to its root, starting with `id`.
    pub fn ancestry(&self, id: &ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(node.element_uuid);
            current = node.parent_uuid.and_then(|p| self.nodes.get(&p));
        }
        path
    }
}
