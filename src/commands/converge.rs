use chef_collector::chef::{Node, RunList};
use chef_collector::config::Config;
use chef_collector::run_converge;
use chef_collector::simulation::run_window;
use chrono::Utc;
use colored::*;
use eyre::{Context, Result};

use crate::cli::RunArgs;

pub fn run(args: &RunArgs, run_list: &[String], duration: u64, config: &Config) -> Result<()> {
    let identity = super::identity(args, config);
    let run_config = config.run_config();

    let parsed = if run_list.is_empty() {
        config.simulation_run_list()
    } else {
        RunList::parse(run_list)
    };
    let run_list = parsed.context("Invalid run list")?;

    let (start_time, end_time) = run_window(Utc::now(), duration).context("Invalid --duration")?;
    let node = Node::new(&identity.node_name, &run_config.chef_environment, run_list.clone());

    log::info!(
        "run_converge for {} (run {}): {:?}",
        identity.node_name,
        identity.run_uuid,
        run_list.to_string_vec()
    );

    run_converge(&node, &identity, &run_list, &run_list, &start_time, &end_time, &run_config)
        .context("Failed to send run_converge")?;

    println!(
        "{} run_converge sent for {} (run {}, {} items)",
        "✓".green(),
        identity.node_name.bold(),
        identity.run_uuid.to_string().dimmed(),
        run_list.len()
    );
    Ok(())
}
