use std::fmt::Write;

use crate::labels::LabelRules;
use crate::providers::gerrit::types::LabeledChange;
use crate::report::LabelReport;

use super::styling::{blue, bright, bright_yellow, cyan, dim, green, yellow};
use super::tables::{count_cell, create_table, cyan_header};

/// Prints the projects, labels and compiled patterns of a configuration.
pub fn print_rules(rules: &LabelRules) {
    println!("{}", render_rules(rules));
}

/// One console line per change: project in blue, subject in green, labels in yellow.
pub fn format_change(change: &LabeledChange) -> String {
    format!(
        "{} - {} [{}]",
        blue(change.project()),
        green(change.subject()),
        yellow(change.labels.join(", "))
    )
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

/// Renders a human-readable summary of a labeling run.
///
/// Displays:
/// - Overview: endpoint, query, number of changes and unlabeled changes
/// - Changes: one `project - subject [labels]` line per change
/// - Labels: how many changes each configured label was applied to
pub(crate) fn render_summary(report: &LabelReport) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Overview");
    let _ = writeln!(output, "  {} {}", dim("Endpoint:"), cyan(&report.endpoint));
    if let Some(query) = &report.query {
        let _ = writeln!(output, "  {} {}", dim("Query:"), cyan(query));
    }
    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n",
        dim("Changes labeled:"),
        bright_yellow(report.total_changes),
        dim("Without labels:"),
        bright_yellow(report.unlabeled_changes),
    );

    add_section_header(&mut output, "📋", "Changes");
    if report.changes.is_empty() {
        let _ = writeln!(output, "  {}", dim("No changes found for the configured projects"));
    }
    for change in &report.changes {
        let _ = writeln!(output, "  {}", format_change(change));
    }
    output.push('\n');

    add_section_header(&mut output, "🏷️", "Labels");
    let mut table = create_table();
    table.set_header(cyan_header(&["Project", "Label", "Changes"]));
    for count in &report.label_counts {
        table.add_row(vec![
            comfy_table::Cell::new(&count.project),
            comfy_table::Cell::new(&count.label),
            count_cell(count.count),
        ]);
    }
    let _ = writeln!(output, "{table}");

    output
}

pub(crate) fn render_rules(rules: &LabelRules) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "🏷️", "Label rules");
    let mut table = create_table();
    table.set_header(cyan_header(&["Project", "Label", "Pattern"]));
    for project in rules.projects() {
        for rule in rules.rules_for(project).unwrap_or_default() {
            table.add_row(vec![project, rule.name(), rule.pattern()]);
        }
    }
    let _ = writeln!(output, "{table}");

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::labels::LabelMap;

    fn label_map() -> LabelMap {
        serde_json::from_str(r#"{"proj-a": {"py": ["\\.py$"], "test": ["_test\\."]}}"#).unwrap()
    }

    fn labeled(project: &str, subject: &str, labels: &[&str]) -> LabeledChange {
        serde_json::from_value(serde_json::json!({
            "id": format!("{project}~master~I1"),
            "project": project,
            "subject": subject,
            "files": { "mod_test.py": {} },
            "labels": labels,
        }))
        .unwrap()
    }

    #[test]
    fn test_format_change_line() {
        console::set_colors_enabled(false);
        let change = labeled("proj-a", "Add tests", &["py", "test"]);
        assert_eq!(format_change(&change), "proj-a - Add tests [py, test]");
    }

    #[test]
    fn test_render_summary_with_changes() {
        let config = Config::new("https://review.example.org/changes", label_map());
        let report = LabelReport::new(&config, vec![labeled("proj-a", "Add tests", &["py", "test"])]);

        let output = render_summary(&report);

        assert!(output.contains("Overview"));
        assert!(output.contains("https://review.example.org/changes"));
        assert!(output.contains("Add tests"));
        assert!(output.contains("py, test"));
        assert!(output.contains("Labels"));
        assert!(output.contains("proj-a"));
    }

    #[test]
    fn test_render_summary_empty() {
        let config = Config::new("https://review.example.org/changes", label_map());
        let report = LabelReport::new(&config, vec![]);

        let output = render_summary(&report);

        assert!(output.contains("No changes found for the configured projects"));
        assert!(!output.contains("Query:"));
    }

    #[test]
    fn test_render_rules_lists_patterns() {
        let rules = LabelRules::compile(&label_map()).unwrap();

        let output = render_rules(&rules);

        assert!(output.contains("proj-a"));
        assert!(output.contains(r"\.py$"));
        assert!(output.contains(r"_test\."));
    }
}
