use chef_collector::config::Config;
use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&redacted(config))?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&redacted(config))?);
        }
        OutputFormat::Text => {
            println!("{}", "chef-collector configuration".bold());
            println!();

            println!("{}:", "chef".cyan());
            println!("  server_url: {}", config.chef.server_url);
            println!("  organization: {}", config.chef.organization);
            println!("  environment: {}", config.chef.environment);
            println!();

            println!("{}:", "data_collector".cyan());
            println!("  url: {}", config.data_collector.url);
            println!("  token: {}", mask(&config.data_collector.token));
            println!("  skip_tls_verify: {}", config.data_collector.skip_tls_verify);
            println!("  timeout_secs: {}", config.data_collector.timeout_secs);
            println!();

            println!("{}:", "simulation".cyan());
            println!("  node_prefix: {}", config.simulation.node_prefix);
            println!("  runs: {}", config.simulation.runs);
            println!("  concurrency: {}", config.simulation.concurrency);
            println!("  run_list: {}", config.simulation.run_list.join(", "));
            println!("  converge_secs: {}", config.simulation.converge_secs);
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
        }
    }

    Ok(())
}

fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    config.data_collector.token = mask(&config.data_collector.token);
    config
}

fn mask(token: &str) -> String {
    if token.is_empty() { "(unset)".to_string() } else { "********".to_string() }
}
