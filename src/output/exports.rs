use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;

use crate::report::LabelReport;

use super::summary::render_summary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored console summary
    #[default]
    Summary,
    /// Full report including files and labels
    Json,
    /// One row per change
    Csv,
}

/// Writes a labeling report in the requested format.
pub fn export_report(
    report: &LabelReport,
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            writeln!(output, "{}", render_summary(report))?;
            Ok(())
        }
        OutputFormat::Json => export_json(report, pretty, output),
        OutputFormat::Csv => export_csv(report, output),
    }
}

fn export_json(report: &LabelReport, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}

fn export_csv(report: &LabelReport, output: &mut dyn Write) -> Result<()> {
    writeln!(output, "Id,Project,Branch,Subject,Labels")?;

    for change in &report.changes {
        writeln!(
            output,
            "{},{},{},{},{}",
            csv_field(change.id()),
            csv_field(change.project()),
            csv_field(change.branch()),
            csv_field(change.subject()),
            csv_field(&change.labels.join(";")),
        )?;
    }

    Ok(())
}

/// Quote a field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
