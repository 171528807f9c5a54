use super::core::GerritClient;
use crate::error::Result;
use crate::providers::gerrit::types::FileList;

/// Revision used when the caller does not name one.
pub const DEFAULT_REVISION: &str = "current";

impl GerritClient {
    /// Fetch the files touched by `revision_id` of `change_id`.
    ///
    /// `change_id` is used as-is in the path, so the triplet id Gerrit
    /// returns in `ChangeInfo.id` (already URL-encoded) can be passed directly.
    pub async fn list_files(&self, change_id: &str, revision_id: &str) -> Result<FileList> {
        let url = self.url(&format!("/{change_id}/revisions/{revision_id}/files/"))?;
        self.get_decoded(url).await
    }

    pub async fn list_current_files(&self, change_id: &str) -> Result<FileList> {
        self.list_files(change_id, DEFAULT_REVISION).await
    }
}
