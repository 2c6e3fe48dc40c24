//! Directory tree replay.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use gridstudy::FixtureBackend;
use gridstudy_core::config::AppConfig;
use gridstudy_core::error::AppError;
use gridstudy_core::types::ElementId;
use gridstudy_directory::{DirectoryExplorer, DirectoryNode, DirectoryTree, flatten_down_nodes};

use crate::output::{self, OutputFormat};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Fixture file with root folders and directory contents
    #[arg(long)]
    pub fixture: PathBuf,

    /// Directory to select after the tree is built; its content is listed too
    #[arg(long)]
    pub select: Option<ElementId>,
}

/// Tree display row
#[derive(Debug, Serialize, Tabled)]
struct TreeRow {
    /// Name, indented by depth
    name: String,
    /// Element ID
    id: String,
    /// Depth below the roots
    depth: usize,
    /// Direct subdirectories known in the tree
    children: usize,
    /// Subdirectory count reported by the server
    reported: u32,
    /// Private flag
    private: bool,
}

/// Content display row
#[derive(Debug, Serialize, Tabled)]
struct ContentRow {
    name: String,
    id: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    element_type: String,
    owner: String,
}

/// Execute the tree command
pub async fn execute(args: &TreeArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let backend = Arc::new(FixtureBackend::from_file(&args.fixture)?);
    let explorer = DirectoryExplorer::new(backend.clone(), config.directory.clone());

    let tree = expand_all(&explorer, &backend).await?;
    let rows: Vec<TreeRow> = tree
        .roots()
        .iter()
        .flat_map(flatten_down_nodes)
        .map(|node| tree_row(&tree, &node))
        .collect();
    output::print_list(&rows, format);

    if let Some(selected) = args.select {
        if !explorer.select_directory(selected).await? {
            output::print_warning(&format!("Directory {} is not in the tree", selected));
            return Ok(());
        }
        let content: Vec<ContentRow> = explorer
            .current_children()
            .map(|children| {
                children
                    .iter()
                    .map(|c| ContentRow {
                        name: c.element_name.clone(),
                        id: c.element_uuid.to_string(),
                        element_type: format!("{:?}", c.element_type),
                        owner: c.owner.clone().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        output::print_list(&content, format);
    }
    Ok(())
}

/// Fetches roots, then every directory the fixture lists, parents first.
async fn expand_all(
    explorer: &DirectoryExplorer,
    backend: &FixtureBackend,
) -> Result<DirectoryTree, AppError> {
    let listed: HashSet<ElementId> = backend.directories().into_iter().collect();
    let mut tree = explorer.refresh_roots().await?;
    let mut pending: VecDeque<ElementId> = tree.roots().iter().map(|n| n.element_uuid).collect();
    let mut visited = HashSet::new();

    while let Some(directory) = pending.pop_front() {
        if !listed.contains(&directory) || !visited.insert(directory) {
            continue;
        }
        tree = explorer.refresh_directory(directory).await?;
        if let Some(node) = tree.get(&directory) {
            pending.extend(node.children.iter().map(|c| c.element_uuid));
        }
    }
    Ok(tree)
}

fn tree_row(tree: &DirectoryTree, node: &DirectoryNode) -> TreeRow {
    let mut depth = 0;
    let mut parent = node.parent_uuid;
    while let Some(id) = parent {
        depth += 1;
        parent = tree.get(&id).and_then(|p| p.parent_uuid);
    }
    TreeRow {
        name: format!("{}{}", "  ".repeat(depth), node.element_name),
        id: node.element_uuid.to_string(),
        depth,
        children: node.children.len(),
        reported: node.subdirectories_count,
        private: node.access_rights.is_private,
    }
}
