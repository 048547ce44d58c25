//! Synthetic client runs
//!
//! Fabricates nodes, UUIDs and timestamps for simulated Chef client runs and
//! reports each one as a `run_start` followed by a `run_converge`. Runs are
//! spread over a fixed number of worker threads; every run builds its own
//! clients and messages, so workers share nothing but the next-run index.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use uuid::Uuid;

use crate::chef::{Node, RunList};
use crate::collector::DataCollectorError;
use crate::event::{MessageType, RunConfig, RunIdentity, run_converge, run_start};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Run duration of {0} seconds is out of range")]
pub struct DurationOutOfRange(pub u64);

/// Start and end of a run that lasted `secs` and finished at `end_time`
pub fn run_window(end_time: DateTime<Utc>, secs: u64) -> Result<(DateTime<Utc>, DateTime<Utc>), DurationOutOfRange> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|duration| end_time.checked_sub_signed(duration))
        .map(|start_time| (start_time, end_time))
        .ok_or(DurationOutOfRange(secs))
}

/// Everything needed to report one simulated run
#[derive(Debug, Clone)]
pub struct SimulatedRun {
    pub identity: RunIdentity,
    pub node: Node,
    pub run_list: RunList,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SimulatedRun {
    pub fn new(
        node_name: &str,
        organization: &str,
        run_list: &RunList,
        config: &RunConfig,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let node = Node::new(node_name, config.chef_environment.clone(), run_list.clone())
            .with_automatic("fqdn", format!("{}.example.com", node_name))
            .with_automatic("hostname", node_name)
            .with_automatic("platform", "ubuntu")
            .with_automatic("ohai_time", start_time.timestamp());

        Self {
            identity: RunIdentity::new(node_name, organization, Uuid::new_v4(), Uuid::new_v4()),
            node,
            run_list: run_list.clone(),
            start_time,
            end_time,
        }
    }

    /// Send `run_start` then `run_converge`. A failed start skips the converge.
    pub fn report(&self, config: &RunConfig) -> Result<(), RunFailure> {
        run_start(&self.identity, &self.start_time, config).map_err(|e| self.failure(MessageType::RunStart, e))?;

        run_converge(
            &self.node,
            &self.identity,
            &self.run_list,
            &self.run_list,
            &self.start_time,
            &self.end_time,
            config,
        )
        .map_err(|e| self.failure(MessageType::RunConverge, e))
    }

    fn failure(&self, message_type: MessageType, error: DataCollectorError) -> RunFailure {
        RunFailure {
            node_name: self.identity.node_name.clone(),
            run_uuid: self.identity.run_uuid,
            message_type,
            error,
        }
    }
}

#[derive(Debug)]
pub struct RunFailure {
    pub node_name: String,
    pub run_uuid: Uuid,
    pub message_type: MessageType,
    pub error: DataCollectorError,
}

#[derive(Debug, Default)]
pub struct SimulationReport {
    pub runs: usize,
    pub converged: usize,
    pub failures: Vec<RunFailure>,
}

impl SimulationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: SimulationReport) {
        self.runs += other.runs;
        self.converged += other.converged;
        self.failures.extend(other.failures);
    }
}

/// Settings for a batch of simulated runs
#[derive(Debug, Clone)]
pub struct Simulation {
    pub node_prefix: String,
    pub organization: String,
    pub run_list: RunList,
    pub runs: usize,
    pub concurrency: usize,
    /// Simulated length of each run, ending when it is reported
    pub converge_secs: u64,
}

impl Simulation {
    pub fn node_name(&self, index: usize) -> String {
        format!("{}-{}", self.node_prefix, index)
    }

    pub fn run(&self, config: &RunConfig) -> Result<SimulationReport, DurationOutOfRange> {
        run_window(Utc::now(), self.converge_secs)?;

        let next = AtomicUsize::new(0);
        let workers = self.concurrency.clamp(1, self.runs.max(1));

        log::info!("Simulating {} runs with {} workers", self.runs, workers);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| scope.spawn(|| self.worker(&next, config)))
                .collect();

            let mut report = SimulationReport::default();
            for handle in handles {
                match handle.join() {
                    Ok(partial) => report.merge(partial),
                    Err(_) => log::error!("Simulation worker panicked"),
                }
            }
            Ok(report)
        })
    }

    fn worker(&self, next: &AtomicUsize, config: &RunConfig) -> SimulationReport {
        let mut report = SimulationReport::default();

        loop {
            let index = next.fetch_add(1, Ordering::Relaxed);
            if index >= self.runs {
                break;
            }

            let (start_time, end_time) = match run_window(Utc::now(), self.converge_secs) {
                Ok(window) => window,
                Err(e) => {
                    log::error!("{}", e);
                    break;
                }
            };
            let run = SimulatedRun::new(
                &self.node_name(index),
                &self.organization,
                &self.run_list,
                config,
                start_time,
                end_time,
            );

            report.runs += 1;
            match run.report(config) {
                Ok(()) => report.converged += 1,
                Err(failure) => {
                    log::warn!(
                        "Run {} for {} failed at {:?}: {}",
                        failure.run_uuid,
                        failure.node_name,
                        failure.message_type,
                        failure.error
                    );
                    report.failures.push(failure);
                }
            }
        }

        report
    }
}
