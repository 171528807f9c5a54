use anyhow::Result;
use clap::Parser;
use gerrit_label::cli::Cli;
use gerrit_label::output;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting gerrit-label");
    cli.execute().await?;

    Ok(())
}
