//! Print message bodies without touching the network

use chef_collector::chef::Node;
use chef_collector::config::Config;
use chef_collector::simulation::run_window;
use chef_collector::{RunConvergeEvent, RunStartEvent};
use chrono::Utc;
use eyre::{Context, Result};

use crate::cli::{PreviewMessage, RunArgs};

pub fn run(message: PreviewMessage, args: &RunArgs, config: &Config) -> Result<()> {
    let identity = super::identity(args, config);
    let run_config = config.run_config();
    let (start_time, end_time) =
        run_window(Utc::now(), config.simulation.converge_secs).context("Invalid simulation.converge_secs")?;

    let body = match message {
        PreviewMessage::Start => {
            let event = RunStartEvent::new(&identity, &start_time, &run_config);
            serde_json::to_string_pretty(&event)?
        }
        PreviewMessage::Converge => {
            let run_list = config.simulation_run_list().context("Invalid simulation.run_list")?;
            let node = Node::new(&identity.node_name, &run_config.chef_environment, run_list.clone());
            let event = RunConvergeEvent::new(
                &node,
                &identity,
                &run_list,
                &run_list,
                &start_time,
                &end_time,
                &run_config,
            );
            serde_json::to_string_pretty(&event)?
        }
    };

    println!("{}", body);
    Ok(())
}
