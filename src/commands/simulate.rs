use chef_collector::config::Config;
use chef_collector::simulation::Simulation;
use colored::*;
use eyre::{Context, Result};
use std::time::Instant;

pub fn run(runs: Option<usize>, concurrency: Option<usize>, config: &Config) -> Result<()> {
    let simulation = Simulation {
        node_prefix: config.simulation.node_prefix.clone(),
        organization: config.chef.organization.clone(),
        run_list: config.simulation_run_list().context("Invalid simulation.run_list")?,
        runs: runs.unwrap_or(config.simulation.runs),
        concurrency: concurrency.unwrap_or(config.simulation.concurrency),
        converge_secs: config.simulation.converge_secs,
    };

    let started = Instant::now();
    let report = simulation
        .run(&config.run_config())
        .context("Invalid simulation.converge_secs")?;
    let elapsed = started.elapsed();

    println!("{}", "Simulation".bold());
    println!("  runs:      {}", report.runs);
    println!("  converged: {}", report.converged.to_string().green());
    if report.failures.is_empty() {
        println!("  failed:    0");
    } else {
        let timeouts = report.failures.iter().filter(|f| f.error.is_timeout()).count();
        println!(
            "  failed:    {} ({} timed out)",
            report.failures.len().to_string().red(),
            timeouts
        );
    }
    println!("  elapsed:   {:.2}s", elapsed.as_secs_f64());

    for failure in report.failures.iter().take(10) {
        println!(
            "  {} {} {:?}: {}",
            "✗".red(),
            failure.node_name,
            failure.message_type,
            failure.error
        );
    }
    if report.failures.len() > 10 {
        println!("  ... and {} more (see log)", report.failures.len() - 10);
    }

    if !report.is_success() {
        eyre::bail!("{} of {} runs failed", report.failures.len(), report.runs);
    }
    Ok(())
}
