//! Directory server collaborator.

use async_trait::async_trait;

use gridstudy_core::result::AppResult;
use gridstudy_core::types::ElementId;

use crate::node::ElementAttributes;

/// Read access to the directory server.
///
/// Implementations return fully populated element lists. Failures carry the
/// message reported by the server.
#[async_trait]
pub trait DirectoryClient: Send + Sync + 'static {
    /// Lists the root directories visible to the current user.
    async fn fetch_root_folders(&self) -> AppResult<Vec<ElementAttributes>>;

    /// Lists every element (directories and others) directly under `directory`.
    async fn fetch_directory_content(
        &self,
        directory: ElementId,
    ) -> AppResult<Vec<ElementAttributes>>;
}
