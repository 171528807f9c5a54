use log::info;

use crate::auth::Credentials;
use crate::config::Config;
use crate::error::Result;
use crate::labels::{assign_labels, LabelRules};
use crate::providers::gerrit::types::LabeledChange;
use crate::providers::GerritProvider;

/// A configured fetch-and-label run against one Gerrit endpoint.
pub struct Pipeline {
    provider: GerritProvider,
    rules: LabelRules,
    query: Option<String>,
}

impl Pipeline {
    /// Compiles the label rules and prepares the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if a label pattern does not compile or the endpoint
    /// is not a valid URL.
    pub fn new(config: &Config, credentials: Option<Credentials>) -> Result<Self> {
        let rules = config.validate()?;
        let provider = GerritProvider::new(
            &config.endpoint,
            credentials,
            config.max_concurrent_requests,
        )?;

        Ok(Self {
            provider,
            rules,
            query: config.query_string.clone(),
        })
    }

    /// Fetches changes of the configured projects and labels them.
    ///
    /// The result is in the order the server listed the changes. Nothing is
    /// returned for a run where any request failed.
    ///
    /// # Errors
    ///
    /// Returns the first transport, decode or file-fetch error encountered.
    pub async fn run(&self) -> Result<Vec<LabeledChange>> {
        let allowed = self.rules.project_set();
        let changes = self
            .provider
            .fetch_changes_with_files(&allowed, self.query.as_deref())
            .await?;

        let labeled = assign_labels(changes, &self.rules);
        info!("Labeled {} changes", labeled.len());

        Ok(labeled.into_values().collect())
    }

    /// Runs the pipeline and hands each labeled change to `callback`.
    ///
    /// The callback only sees changes from a fully successful run; on error it
    /// is never invoked. Returns the number of changes delivered.
    pub async fn run_with<F>(&self, mut callback: F) -> Result<usize>
    where
        F: FnMut(&LabeledChange),
    {
        let changes = self.run().await?;
        for change in &changes {
            callback(change);
        }
        Ok(changes.len())
    }
}

/// One-shot form of [`Pipeline::run`].
pub async fn run(config: &Config, credentials: Option<Credentials>) -> Result<Vec<LabeledChange>> {
    Pipeline::new(config, credentials)?.run().await
}
