use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use crate::auth::Credentials;
use crate::config::Config;
use crate::output::{export_report, print_rules, OutputFormat, RunProgress};
use crate::pipeline::Pipeline;
use crate::report::LabelReport;

#[derive(Parser)]
#[command(name = "gerrit-label")]
#[command(author, version, about = "Label Gerrit changes by the files they touch", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./gerrit-label.{json,toml,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch changes from Gerrit and label them by the files they touch
    Label {
        /// Overrides the configured changes endpoint
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Overrides the configured Gerrit search query
        #[arg(short, long)]
        query: Option<String>,

        #[arg(short, long, env = "GERRIT_USER")]
        user: Option<String>,

        #[arg(long, env = "GERRIT_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
    },
    /// Validate the configuration and list its label rules
    Check,
}

impl Cli {
    async fn execute_label(
        &self,
        endpoint: Option<&str>,
        query: Option<&str>,
        user: Option<&str>,
        password: Option<&str>,
        format: OutputFormat,
    ) -> Result<()> {
        let config = Config::load(self.config.as_deref())?
            .with_overrides(endpoint.map(str::to_owned), query.map(str::to_owned));

        if user.is_some() != password.is_some() {
            warn!("Both --user and --password are needed for authentication; continuing anonymously");
        }
        let credentials =
            Credentials::from_parts(user.map(str::to_owned), password.map(str::to_owned));

        info!("Labeling changes from: {}", config.endpoint);
        let pipeline = Pipeline::new(&config, credentials).context("Invalid configuration")?;

        let progress = RunProgress::start(&config.endpoint);
        let changes = match pipeline.run().await {
            Ok(changes) => {
                progress.finish(changes.len());
                changes
            }
            Err(e) => {
                progress.fail();
                return Err(e).context("Failed to label changes");
            }
        };

        let report = LabelReport::new(&config, changes);

        if let Some(output_path) = &self.output {
            let mut file = File::create(output_path).with_context(|| {
                format!("Failed to create output file: {}", output_path.display())
            })?;
            export_report(&report, format, self.pretty, &mut file)?;
            info!("Report written to: {}", output_path.display());
        } else {
            let mut stdout = std::io::stdout().lock();
            export_report(&report, format, self.pretty, &mut stdout)?;
            stdout.flush()?;
        }

        Ok(())
    }

    fn execute_check(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let rules = config.validate()?;

        info!(
            "Configuration is valid: {} projects",
            rules.projects().count()
        );
        print_rules(&rules);

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Label {
                endpoint,
                query,
                user,
                password,
                format,
            } => {
                self.execute_label(
                    endpoint.as_deref(),
                    query.as_deref(),
                    user.as_deref(),
                    password.as_deref(),
                    *format,
                )
                .await
            }
            Commands::Check => self.execute_check(),
        }
    }
}
