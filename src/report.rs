use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::providers::gerrit::types::LabeledChange;

/// Result of one labeling run, as written by the JSON export.
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelReport {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub collected_at: DateTime<Utc>,
    pub total_changes: usize,
    pub unlabeled_changes: usize,
    pub label_counts: Vec<LabelCount>,
    pub changes: Vec<LabeledChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub project: String,
    pub label: String,
    pub count: usize,
}

impl LabelReport {
    /// Builds the report; label counts follow the configured label order.
    pub fn new(config: &Config, changes: Vec<LabeledChange>) -> Self {
        let label_counts = config
            .label_map
            .iter()
            .flat_map(|(project, labels)| {
                labels.keys().map(move |label| (project.as_str(), label.as_str()))
            })
            .map(|(project, label)| LabelCount {
                project: project.to_string(),
                label: label.to_string(),
                count: changes
                    .iter()
                    .filter(|c| c.project() == project && c.labels.iter().any(|l| l == label))
                    .count(),
            })
            .collect();

        Self {
            endpoint: config.endpoint.clone(),
            query: config.query_string.clone(),
            collected_at: Utc::now(),
            total_changes: changes.len(),
            unlabeled_changes: changes.iter().filter(|c| c.labels.is_empty()).count(),
            label_counts,
            changes,
        }
    }
}
