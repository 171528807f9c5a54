//! Label Gerrit changes by the files they touch.
//!
//! Lists changes from a Gerrit REST endpoint, keeps those in configured
//! projects, fetches each change's file list concurrently, and assigns
//! labels by matching file paths against per-project regex rules.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod labels;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod report;

pub use auth::Credentials;
pub use config::Config;
pub use error::{GerritLabelError, Result};
pub use labels::{LabelMap, LabelRules};
pub use pipeline::{run, Pipeline};
pub use providers::gerrit::types::{EnrichedChange, FileInfo, FileList, LabeledChange, RawChange};
