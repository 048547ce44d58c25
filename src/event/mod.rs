//! Run lifecycle messages for the Chef Data Collector
//!
//! A simulated client run is reported with two messages:
//! - `run_start` when the run begins
//! - `run_converge` when it finishes (always successfully)

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::collector::{DataCollectorClient, DataCollectorConfig, Result};

pub mod run_converge;
pub mod run_start;
pub mod timestamp;

pub use run_converge::{RunConvergeEvent, run_converge};
pub use run_start::{RunStartEvent, run_start};

pub const MESSAGE_VERSION: &str = "1.0.0";
pub const SOURCE: &str = "chef_client";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    RunStart,
    RunConverge,
}

/// Identifies one simulated client run across its start and converge messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentity {
    pub node_name: String,
    pub organization: String,
    pub run_uuid: Uuid,
    pub node_uuid: Uuid,
}

impl RunIdentity {
    pub fn new(node_name: impl Into<String>, organization: impl Into<String>, run_uuid: Uuid, node_uuid: Uuid) -> Self {
        Self {
            node_name: node_name.into(),
            organization: organization.into(),
            run_uuid,
            node_uuid,
        }
    }
}

/// Where and how run messages are delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub chef_server_url: String,
    pub chef_environment: String,
    pub data_collector_url: String,
    pub data_collector_token: String,
    pub skip_tls_verify: bool,
    pub timeout: Duration,
}

impl RunConfig {
    pub fn collector_config(&self) -> DataCollectorConfig {
        DataCollectorConfig {
            token: self.data_collector_token.clone(),
            url: self.data_collector_url.clone(),
            skip_tls_verify: self.skip_tls_verify,
            timeout: self.timeout,
        }
    }
}

/// Fields shared by every run message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageHeader {
    pub chef_server_fqdn: String,
    pub entity_uuid: Uuid,
    pub id: Uuid,
    pub message_version: &'static str,
    pub message_type: MessageType,
    pub node_name: String,
    pub organization: String,
    pub run_id: Uuid,
    pub source: &'static str,
    #[serde(serialize_with = "timestamp::serialize")]
    pub start_time: DateTime<Utc>,
}

impl MessageHeader {
    fn new<Tz: TimeZone>(
        message_type: MessageType,
        identity: &RunIdentity,
        start_time: &DateTime<Tz>,
        config: &RunConfig,
    ) -> Self {
        Self {
            chef_server_fqdn: config.chef_server_url.clone(),
            entity_uuid: identity.node_uuid,
            id: identity.run_uuid,
            message_version: MESSAGE_VERSION,
            message_type,
            node_name: identity.node_name.clone(),
            organization: identity.organization.clone(),
            run_id: identity.run_uuid,
            source: SOURCE,
            start_time: start_time.with_timezone(&Utc),
        }
    }
}

/// Build a fresh client for one message and send it
fn deliver<T: Serialize>(message: &T, config: &RunConfig) -> Result<()> {
    DataCollectorClient::new(&config.collector_config())?.update(message)
}
