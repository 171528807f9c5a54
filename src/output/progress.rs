use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_red, bright_yellow};

/// Spinner shown on stderr while a labeling run is in flight
pub struct RunProgress {
    pb: ProgressBar,
}

impl RunProgress {
    pub fn start(endpoint: &str) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Run").underlined());
        let pb = create_spinner(
            bright_yellow(format!("Fetching and labeling changes from {endpoint}")).to_string(),
        );
        Self { pb }
    }

    pub fn finish(self, change_count: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Labeled {change_count} changes ✓")).to_string(),
        );
        eprintln!();
    }

    pub fn fail(self) {
        self.pb
            .abandon_with_message(bright_red("Run failed ✗").to_string());
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
