use indexmap::IndexMap;
use log::{debug, info, warn};
use std::collections::HashSet;

use crate::auth::Credentials;
use crate::error::Result;
use crate::providers::gerrit::client::GerritClient;

use super::filter::filter_by_project;
use super::types::{EnrichedChange, RawChange};

/// Gerrit change provider.
///
/// Lists changes from the REST API, drops those outside the projects of
/// interest, and attaches the file list of each remaining change's current
/// revision.
pub struct GerritProvider {
    pub client: GerritClient,
}

impl GerritProvider {
    /// Creates a new provider for the given `changes` endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Gerrit changes endpoint (e.g., <https://review.example.org/changes>)
    /// * `credentials` - Optional basic-auth credentials, sent only when challenged
    /// * `max_concurrent_requests` - Upper bound on in-flight file requests
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL.
    pub fn new(
        endpoint: &str,
        credentials: Option<Credentials>,
        max_concurrent_requests: usize,
    ) -> Result<Self> {
        let client = GerritClient::with_concurrency(endpoint, credentials, max_concurrent_requests)?;

        Ok(Self { client })
    }

    /// Fetches changes for `allowed` projects together with their files.
    ///
    /// File lists are requested concurrently, one request per kept change.
    /// The first failing request fails the whole call; requests still in
    /// flight at that point are dropped and nothing is merged.
    ///
    /// # Returns
    ///
    /// Changes keyed by change id, in the order the server listed them.
    ///
    /// # Errors
    ///
    /// Returns an error if listing changes fails, or if any file request fails.
    pub async fn fetch_changes_with_files(
        &self,
        allowed: &HashSet<&str>,
        query: Option<&str>,
    ) -> Result<IndexMap<String, EnrichedChange>> {
        info!("Fetching changes from {}...", self.client.endpoint());

        let changes = self.client.list_changes(query).await?;
        let total = changes.len();

        let changes = filter_by_project(changes, allowed);
        info!(
            "Kept {} of {total} changes in {} configured projects",
            changes.len(),
            allowed.len()
        );

        if changes.is_empty() {
            warn!("No changes found for the configured projects");
            return Ok(IndexMap::new());
        }

        info!("Fetching files for {} changes in parallel...", changes.len());

        let futures = changes.into_iter().map(|change| self.enrich(change));
        let enriched = futures::future::try_join_all(futures).await?;

        Ok(enriched
            .into_iter()
            .map(|change| (change.change.id.clone(), change))
            .collect())
    }

    async fn enrich(&self, change: RawChange) -> Result<EnrichedChange> {
        let files = self.client.list_current_files(&change.id).await?;
        debug!("Change {} touches {} files", change.id, files.len());

        Ok(EnrichedChange { change, files })
    }
}
