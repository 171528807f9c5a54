use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A change as returned by Gerrit's list-changes endpoint (`ChangeInfo`).
///
/// Only `id` and `project` are required; the remaining typed fields are
/// conveniences for display. Every other attribute the server sends is kept
/// in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChange {
    /// Triplet id `project~branch~Change-Id`, used to address the change
    pub id: String,
    /// Project (repository) name
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Review state (e.g., "NEW", "MERGED", "ABANDONED")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// The `Change-Id` footer value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_id: Option<String>,
    /// Legacy numeric id
    #[serde(rename = "_number", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-file metadata from the revision files endpoint (`FileInfo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// "A", "D", "R", "C", "W"; absent means modified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_inserted: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_deleted: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_delta: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// File path to metadata, in server order.
pub type FileList = IndexMap<String, FileInfo>;

/// A change together with the files of its current revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedChange {
    #[serde(flatten)]
    pub change: RawChange,
    pub files: FileList,
}

impl EnrichedChange {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

/// An enriched change with the labels derived from its files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledChange {
    #[serde(flatten)]
    pub change: EnrichedChange,
    pub labels: Vec<String>,
}

impl LabeledChange {
    pub fn id(&self) -> &str {
        &self.change.change.id
    }

    pub fn project(&self) -> &str {
        &self.change.change.project
    }

    pub fn subject(&self) -> &str {
        self.change.change.subject.as_deref().unwrap_or_default()
    }

    pub fn branch(&self) -> &str {
        self.change.change.branch.as_deref().unwrap_or_default()
    }

    pub fn files(&self) -> &FileList {
        &self.change.files
    }
}
