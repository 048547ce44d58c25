use chef_collector::RunIdentity;
use chef_collector::config::Config;
use uuid::Uuid;

use crate::cli::RunArgs;

pub mod completions;
pub mod config;
pub mod converge;
pub mod preview;
pub mod simulate;
pub mod start;

/// Build a run identity, filling in random UUIDs and the configured organization
pub fn identity(args: &RunArgs, config: &Config) -> RunIdentity {
    RunIdentity::new(
        args.node.clone(),
        args.org.clone().unwrap_or_else(|| config.chef.organization.clone()),
        args.run_id.unwrap_or_else(Uuid::new_v4),
        args.node_id.unwrap_or_else(Uuid::new_v4),
    )
}
