use chef_collector::config::Config;
use chef_collector::run_start;
use chrono::Utc;
use colored::*;
use eyre::{Context, Result};

use crate::cli::RunArgs;

pub fn run(args: &RunArgs, config: &Config) -> Result<()> {
    let identity = super::identity(args, config);
    let run_config = config.run_config();

    log::info!("run_start for {} (run {})", identity.node_name, identity.run_uuid);

    run_start(&identity, &Utc::now(), &run_config).context("Failed to send run_start")?;

    println!(
        "{} run_start sent for {} (run {})",
        "✓".green(),
        identity.node_name.bold(),
        identity.run_uuid.to_string().dimmed()
    );
    Ok(())
}
