use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::{MessageHeader, MessageType, RunConfig, RunIdentity, deliver};
use crate::collector::Result;

/// `run_start` message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStartEvent {
    #[serde(flatten)]
    pub header: MessageHeader,
}

impl RunStartEvent {
    pub fn new<Tz: TimeZone>(identity: &RunIdentity, start_time: &DateTime<Tz>, config: &RunConfig) -> Self {
        Self {
            header: MessageHeader::new(MessageType::RunStart, identity, start_time, config),
        }
    }
}

/// Report the start of a client run
pub fn run_start<Tz: TimeZone>(identity: &RunIdentity, start_time: &DateTime<Tz>, config: &RunConfig) -> Result<()> {
    let event = RunStartEvent::new(identity, start_time, config);
    log::debug!("Sending run_start for {} (run {})", identity.node_name, identity.run_uuid);
    deliver(&event, config)
}
