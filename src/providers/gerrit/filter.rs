use std::collections::HashSet;

use super::types::RawChange;

/// Keep only changes whose project is in `allowed`, preserving order.
pub fn filter_by_project(changes: Vec<RawChange>, allowed: &HashSet<&str>) -> Vec<RawChange> {
    changes
        .into_iter()
        .filter(|change| allowed.contains(change.project.as_str()))
        .collect()
}
