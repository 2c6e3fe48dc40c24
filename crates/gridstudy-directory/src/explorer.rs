//! Directory browsing session.
//!
//! Owns the reconciled tree and the currently selected directory. Fetches run
//! without holding the state lock; results for a selection that changed while
//! the fetch was in flight are discarded.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, info};

use gridstudy_core::config::directory::DirectoryConfig;
use gridstudy_core::result::AppResult;
use gridstudy_core::types::ElementId;

use crate::client::DirectoryClient;
use crate::node::{DirectoryTree, ElementAttributes};
use crate::tree::updated_tree;

#[derive(Debug, Default)]
struct ExplorerState {
    tree: DirectoryTree,
    selected: Option<ElementId>,
    current_children: Option<Arc<Vec<ElementAttributes>>>,
    /// Bumped on every selection change; a fetch only lands if unchanged.
    generation: u64,
}

/// A directory browsing session.
pub struct DirectoryExplorer {
    client: Arc<dyn DirectoryClient>,
    config: DirectoryConfig,
    state: Mutex<ExplorerState>,
}

impl std::fmt::Debug for DirectoryExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryExplorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DirectoryExplorer {
    /// Creates an empty session.
    pub fn new(client: Arc<dyn DirectoryClient>, config: DirectoryConfig) -> Self {
        Self {
            client,
            config,
            state: Mutex::new(ExplorerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ExplorerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current tree snapshot.
    pub fn tree(&self) -> DirectoryTree {
        self.lock().tree.clone()
    }

    /// Currently selected directory.
    pub fn selected_directory(&self) -> Option<ElementId> {
        self.lock().selected
    }

    /// Content of the selected directory, once loaded.
    pub fn current_children(&self) -> Option<Arc<Vec<ElementAttributes>>> {
        self.lock().current_children.clone()
    }

    /// Whether `id` is a directory currently present in the tree.
    pub fn contains(&self, id: &ElementId) -> bool {
        self.lock().tree.contains(id)
    }

    /// Fetches the root folders and reconciles them.
    pub async fn refresh_roots(&self) -> AppResult<DirectoryTree> {
        let roots = self.client.fetch_root_folders().await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch root folders");
        })?;

        let mut state = self.lock();
        let prev = state.tree.clone();
        let mut next = updated_tree(&prev, None, roots);
        let lost_root = prev
            .roots()
            .iter()
            .any(|r| !next.roots().iter().any(|n| n.element_uuid == r.element_uuid));
        if lost_root && self.config.purge_on_root_removal {
            next = next.purged();
            info!(nodes = next.len(), "Root directory removed, node map rebuilt from roots");
        }
        Self::install(&mut state, next);
        Ok(state.tree.clone())
    }

    /// Fetches the content of `directory` and reconciles its subdirectories.
    pub async fn refresh_directory(&self, directory: ElementId) -> AppResult<DirectoryTree> {
        let content = self
            .client
            .fetch_directory_content(directory)
            .await
            .inspect_err(|e| {
                error!(directory = %directory, error = %e, "Failed to fetch directory content");
            })?;

        let mut state = self.lock();
        let next = updated_tree(&state.tree, Some(directory), subdirectories(&content));
        Self::install(&mut state, next);
        Ok(state.tree.clone())
    }

    /// Selects `directory` and loads its content.
    ///
    /// Returns `Ok(false)` when another selection happened before the fetch
    /// resolved; the result is then discarded, errors included.
    pub async fn select_directory(&self, directory: ElementId) -> AppResult<bool> {
        let generation = {
            let mut state = self.lock();
            state.selected = Some(directory);
            state.current_children = None;
            state.generation += 1;
            state.generation
        };
        self.load_selected(directory, generation).await
    }

    /// Reloads the content of the selected directory, if any.
    pub async fn refresh_selected(&self) -> AppResult<bool> {
        let (selected, generation) = {
            let state = self.lock();
            (state.selected, state.generation)
        };
        match selected {
            Some(directory) => self.load_selected(directory, generation).await,
            None => Ok(false),
        }
    }

    /// Rebuilds the node map from the roots, purging orphaned entries.
    pub fn purge_orphans(&self) -> DirectoryTree {
        let mut state = self.lock();
        let next = state.tree.purged();
        Self::install(&mut state, next);
        state.tree.clone()
    }

    async fn load_selected(&self, directory: ElementId, generation: u64) -> AppResult<bool> {
        let result = self.client.fetch_directory_content(directory).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(directory = %directory, "Discarding stale directory content");
            return Ok(false);
        }

        let mut content = result.inspect_err(|e| {
            error!(directory = %directory, error = %e, "Failed to fetch selected directory");
        })?;
        content.sort_by_cached_key(|c| (c.element_name.to_lowercase(), c.element_name.clone()));

        let next = updated_tree(&state.tree, Some(directory), subdirectories(&content));
        state.current_children = Some(Arc::new(content));
        Self::install(&mut state, next);
        Ok(state.selected == Some(directory))
    }

    /// Replaces the tree and drops a selection that no longer exists.
    fn install(state: &mut ExplorerState, next: DirectoryTree) {
        state.tree = next;
        if let Some(selected) = state.selected {
            if !state.tree.contains(&selected) {
                info!(directory = %selected, "Selected directory no longer exists, clearing selection");
                state.selected = None;
                state.current_children = None;
                state.generation += 1;
            }
        }
    }
}

fn subdirectories(content: &[ElementAttributes]) -> Vec<ElementAttributes> {
    content.iter().filter(|e| e.is_directory()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::node::{AccessRights, ElementType};
    use gridstudy_core::error::AppError;

    fn element(id: ElementId, name: &str, element_type: ElementType) -> ElementAttributes {
        ElementAttributes {
            element_uuid: id,
            element_name: name.to_string(),
            element_type,
            access_rights: AccessRights::default(),
            subdirectories_count: 0,
            owner: None,
            description: None,
            last_modification_date: None,
        }
    }

    #[derive(Default)]
    struct FakeClient {
        roots: Mutex<Vec<ElementAttributes>>,
        content: Mutex<HashMap<ElementId, Vec<ElementAttributes>>>,
        /// Directory whose fetch waits for `release`.
        gated: Mutex<Option<ElementId>>,
        release: Notify,
    }

    #[async_trait]
    impl DirectoryClient for FakeClient {
        async fn fetch_root_folders(&self) -> AppResult<Vec<ElementAttributes>> {
            Ok(self.roots.lock().unwrap().clone())
        }

        async fn fetch_directory_content(
            &self,
            directory: ElementId,
        ) -> AppResult<Vec<ElementAttributes>> {
            let gated = *self.gated.lock().unwrap() == Some(directory);
            if gated {
                self.release.notified().await;
            }
            self.content
                .lock()
                .unwrap()
                .get(&directory)
                .cloned()
                .ok_or_else(|| AppError::external_service("directory not found"))
        }
    }

    fn setup() -> (Arc<FakeClient>, DirectoryExplorer, ElementId, ElementId) {
        let client = Arc::new(FakeClient::default());
        let (root, sub) = (ElementId::new(), ElementId::new());
        *client.roots.lock().unwrap() = vec![element(root, "Root", ElementType::Directory)];
        client.content.lock().unwrap().insert(
            root,
            vec![
                element(sub, "Sub", ElementType::Directory),
                element(ElementId::new(), "A study", ElementType::Study),
            ],
        );
        client.content.lock().unwrap().insert(sub, Vec::new());
        let explorer = DirectoryExplorer::new(client.clone(), DirectoryConfig::default());
        (client, explorer, root, sub)
    }

    #[tokio::test]
    async fn test_select_loads_content_and_subdirectories() {
        let (_client, explorer, root, sub) = setup();
        explorer.refresh_roots().await.unwrap();

        assert!(explorer.select_directory(root).await.unwrap());
        let children = explorer.current_children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].element_name, "A study");

        let tree = explorer.tree();
        assert_eq!(tree.get(&root).unwrap().children.len(), 1);
        assert!(tree.contains(&sub));
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_state() {
        let (_client, explorer, root, _sub) = setup();
        explorer.refresh_roots().await.unwrap();
        let before = explorer.tree();

        assert!(explorer.refresh_directory(ElementId::new()).await.is_err());
        assert!(explorer.tree().same_as(&before));
        assert!(explorer.contains(&root));
    }

    #[tokio::test]
    async fn test_stale_selection_is_discarded() {
        let (client, explorer, root, sub) = setup();
        explorer.refresh_roots().await.unwrap();
        explorer.refresh_directory(root).await.unwrap();
        *client.gated.lock().unwrap() = Some(root);

        let explorer = Arc::new(explorer);
        let slow = {
            let explorer = explorer.clone();
            tokio::spawn(async move { explorer.select_directory(root).await })
        };
        tokio::task::yield_now().await;
        while explorer.selected_directory() != Some(root) {
            tokio::task::yield_now().await;
        }

        assert!(explorer.select_directory(sub).await.unwrap());
        client.release.notify_one();

        assert!(!slow.await.unwrap().unwrap());
        assert_eq!(explorer.selected_directory(), Some(sub));
        assert!(explorer.current_children().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_selection_is_cleared() {
        let (client, explorer, root, sub) = setup();
        explorer.refresh_roots().await.unwrap();
        explorer.refresh_directory(root).await.unwrap();
        explorer.select_directory(sub).await.unwrap();

        client
            .content
            .lock()
            .unwrap()
            .insert(root, vec![element(ElementId::new(), "Other", ElementType::Directory)]);
        explorer.refresh_directory(root).await.unwrap();

        assert_eq!(explorer.selected_directory(), None);
        assert!(explorer.current_children().is_none());
        assert!(!explorer.contains(&sub));
    }

    #[tokio::test]
    async fn test_removed_root_clears_selection_and_purges() {
        let (client, explorer, root, sub) = setup();
        explorer.refresh_roots().await.unwrap();
        explorer.select_directory(root).await.unwrap();

        client.roots.lock().unwrap().clear();
        let tree = explorer.refresh_roots().await.unwrap();

        assert!(tree.is_empty());
        assert!(!tree.contains(&sub));
        assert_eq!(explorer.selected_directory(), None);
    }
}
