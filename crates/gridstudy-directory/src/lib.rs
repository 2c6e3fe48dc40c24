//! # gridstudy-directory
//!
//! Client-side view of the element directory:
//!
//! - [`node`]: the tree node model and the `[roots, map]` pair
//! - [`tree`]: incremental reconciliation of freshly fetched children lists
//!   into the in-memory tree, preserving `Arc` identity of unchanged nodes
//! - [`explorer`]: a directory browsing session that drives fetches through a
//!   [`DirectoryClient`] and discards stale results

pub mod client;
pub mod explorer;
pub mod node;
pub mod tree;

pub use client::DirectoryClient;
pub use explorer::DirectoryExplorer;
pub use node::{AccessRights, DirectoryNode, DirectoryTree, ElementAttributes, ElementType};
pub use tree::{flatten_down_nodes, map_from_roots, refreshed_up_nodes, updated_tree};
