//! Report Chef Infra Client run lifecycle events to a Chef Data Collector.
//!
//! The core is [`event::run_start`] and [`event::run_converge`], which build
//! schema-conformant messages and POST them through a one-shot
//! [`collector::DataCollectorClient`].

pub mod chef;
pub mod collector;
pub mod config;
pub mod event;
pub mod simulation;

pub use collector::{DataCollectorClient, DataCollectorConfig, DataCollectorError};
pub use event::{RunConfig, RunConvergeEvent, RunIdentity, RunStartEvent, run_converge, run_start};
