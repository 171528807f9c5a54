mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::{export_report, OutputFormat};
pub use progress::RunProgress;
pub use styling::{dim, magenta_bold};
pub use summary::{format_change, print_rules};

/// Prints the banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🏷️ gerrit-label"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Label Gerrit changes by the files they touch")
    );
}
