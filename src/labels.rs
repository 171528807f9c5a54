use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use std::collections::HashSet;

use crate::error::{GerritLabelError, Result};
use crate::providers::gerrit::types::{EnrichedChange, LabeledChange};

/// Project name to label name to regex fragments, in configuration order.
pub type LabelMap = IndexMap<String, IndexMap<String, Vec<String>>>;

/// One label with its fragments compiled into a single alternation.
#[derive(Debug, Clone)]
pub struct LabelRule {
    name: String,
    pattern: Regex,
}

impl LabelRule {
    /// Joins `fragments` with `|` verbatim; fragments are raw regex syntax.
    fn compile(project: &str, name: &str, fragments: &[String]) -> Result<Self> {
        let pattern =
            Regex::new(&fragments.join("|")).map_err(|source| GerritLabelError::InvalidPattern {
                project: project.to_string(),
                label: name.to_string(),
                source,
            })?;

        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// True if any path contains a match (search, not full-string).
    pub fn matches_any<'a>(&self, mut paths: impl Iterator<Item = &'a str>) -> bool {
        paths.any(|path| self.pattern.is_match(path))
    }
}

/// Compiled labeling policy.
#[derive(Debug, Clone, Default)]
pub struct LabelRules {
    projects: IndexMap<String, Vec<LabelRule>>,
}

impl LabelRules {
    /// Compiles every label regex up front so a bad pattern fails at load time.
    pub fn compile(map: &LabelMap) -> Result<Self> {
        let projects = map
            .iter()
            .map(|(project, labels)| {
                let rules = labels
                    .iter()
                    .map(|(label, fragments)| LabelRule::compile(project, label, fragments))
                    .collect::<Result<Vec<_>>>()?;
                Ok((project.clone(), rules))
            })
            .collect::<Result<IndexMap<_, _>>>()?;

        Ok(Self { projects })
    }

    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    pub fn project_set(&self) -> HashSet<&str> {
        self.projects().collect()
    }

    pub fn rules_for(&self, project: &str) -> Option<&[LabelRule]> {
        self.projects.get(project).map(Vec::as_slice)
    }

    /// Labels whose pattern matches at least one file of `change`.
    ///
    /// Order follows the label order configured for the project. A project
    /// without rules gets no labels.
    pub fn labels_for(&self, change: &EnrichedChange) -> Vec<String> {
        let Some(rules) = self.rules_for(&change.change.project) else {
            return Vec::new();
        };

        rules
            .iter()
            .filter(|rule| rule.matches_any(change.paths()))
            .map(|rule| rule.name.clone())
            .collect()
    }
}

/// Attach labels to every change, keeping the input order and keys.
pub fn assign_labels(
    changes: IndexMap<String, EnrichedChange>,
    rules: &LabelRules,
) -> IndexMap<String, LabeledChange> {
    changes
        .into_iter()
        .map(|(id, change)| {
            let labels = rules.labels_for(&change);
            debug!("Change {id} labeled [{}]", labels.join(", "));
            (id, LabeledChange { change, labels })
        })
        .collect()
}
