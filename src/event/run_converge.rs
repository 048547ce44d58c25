use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use super::{MessageHeader, MessageType, RunConfig, RunIdentity, deliver, timestamp};
use crate::chef::{ExpandedRunList, Node, RunList};
use crate::collector::Result;

/// Outcome of a converged run. Failed runs are not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
}

/// `run_converge` message
///
/// Resource reporting is not simulated: `resources` is always empty and both
/// counts are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConvergeEvent<'a> {
    #[serde(flatten)]
    pub header: MessageHeader,
    #[serde(serialize_with = "timestamp::serialize")]
    pub end_time: DateTime<Utc>,
    pub status: RunStatus,
    pub run_list: Vec<String>,
    pub expanded_run_list: ExpandedRunList,
    pub node: &'a Node,
    pub resources: Vec<serde_json::Value>,
    pub total_resource_count: u64,
    pub updated_resource_count: u64,
}

impl<'a> RunConvergeEvent<'a> {
    pub fn new<Tz: TimeZone>(
        node: &'a Node,
        identity: &RunIdentity,
        run_list: &RunList,
        expanded_run_list: &RunList,
        start_time: &DateTime<Tz>,
        end_time: &DateTime<Tz>,
        config: &RunConfig,
    ) -> Self {
        Self {
            header: MessageHeader::new(MessageType::RunConverge, identity, start_time, config),
            end_time: end_time.with_timezone(&Utc),
            status: RunStatus::Success,
            run_list: run_list.to_string_vec(),
            expanded_run_list: ExpandedRunList::new(config.chef_environment.clone(), expanded_run_list),
            node,
            resources: Vec::new(),
            total_resource_count: 0,
            updated_resource_count: 0,
        }
    }
}

/// Report the successful end of a client run
pub fn run_converge<Tz: TimeZone>(
    node: &Node,
    identity: &RunIdentity,
    run_list: &RunList,
    expanded_run_list: &RunList,
    start_time: &DateTime<Tz>,
    end_time: &DateTime<Tz>,
    config: &RunConfig,
) -> Result<()> {
    let event = RunConvergeEvent::new(
        node,
        identity,
        run_list,
        expanded_run_list,
        start_time,
        end_time,
        config,
    );
    log::debug!(
        "Sending run_converge for {} (run {}, {} run list items)",
        identity.node_name,
        identity.run_uuid,
        event.run_list.len()
    );
    deliver(&event, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chef::RunListItem;
    use crate::event::fixtures::{self, NODE_UUID, RUN_UUID};

    fn converge_json(run_list: &RunList, expanded: &RunList) -> serde_json::Value {
        let node = Node::new("node1", "_default", run_list.clone());
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 30).unwrap();
        let event = RunConvergeEvent::new(
            &node,
            &fixtures::identity(),
            run_list,
            expanded,
            &start,
            &end,
            &fixtures::run_config("http://localhost/"),
        );
        serde_json::to_value(&event).unwrap()
    }

    #[test]
    fn test_run_converge_fields() {
        let run_list = RunList::parse(&["role[base]", "recipe[ntp]"]).unwrap();
        let json = converge_json(&run_list, &run_list);

        assert_eq!(json["message_type"], "run_converge");
        assert_eq!(json["message_version"], "1.0.0");
        assert_eq!(json["source"], "chef_client");
        assert_eq!(json["id"], RUN_UUID);
        assert_eq!(json["run_id"], RUN_UUID);
        assert_eq!(json["entity_uuid"], NODE_UUID);
        assert_eq!(json["organization"], "acme");
        assert_eq!(json["start_time"], "2024-01-01T00:00:00Z");
        assert_eq!(json["end_time"], "2024-01-01T00:01:30Z");
        assert_eq!(json["status"], "success");
        assert_eq!(json["resources"], serde_json::json!([]));
        assert_eq!(json["total_resource_count"], 0);
        assert_eq!(json["updated_resource_count"], 0);
        assert_eq!(json["node"]["name"], "node1");
        assert_eq!(json["node"]["chef_type"], "node");
    }

    #[test]
    fn test_run_converge_run_list_keeps_order() {
        let run_list = RunList::parse(&["recipe[z]", "role[base]", "recipe[a@1.0.0]"]).unwrap();
        let json = converge_json(&run_list, &run_list);

        assert_eq!(
            json["run_list"],
            serde_json::json!(["recipe[z]", "role[base]", "recipe[a@1.0.0]"])
        );
    }

    #[test]
    fn test_run_converge_expanded_run_list() {
        let run_list = RunList::parse(&["role[base]"]).unwrap();
        let expanded = RunList::new(vec![
            RunListItem::recipe("ntp").with_version("2.1.0"),
            RunListItem::recipe("users"),
        ]);
        let json = converge_json(&run_list, &expanded);

        let erl = &json["expanded_run_list"];
        assert_eq!(erl["id"], "_default");
        assert_eq!(erl["run_list"][0]["name"], "ntp");
        assert_eq!(erl["run_list"][0]["type"], "recipe");
        assert_eq!(erl["run_list"][0]["version"], "2.1.0");
        assert_eq!(erl["run_list"][1]["skipped"], false);
        assert!(erl["run_list"][1].get("version").is_none());
    }

    #[test]
    fn test_run_converge_unpinned_item_has_no_version_key() {
        let expanded = RunList::new(vec![RunListItem::recipe("recipe[a]")]);
        let json = converge_json(&RunList::default(), &expanded);

        let item = json["expanded_run_list"]["run_list"][0].as_object().unwrap();
        assert!(!item.contains_key("version"));
        assert_eq!(item["skipped"], false);
        assert_eq!(item["name"], "recipe[a]");
    }

    #[test]
    fn test_run_converge_empty_expanded_run_list_is_array() {
        let json = converge_json(&RunList::default(), &RunList::default());
        assert_eq!(json["expanded_run_list"]["run_list"], serde_json::json!([]));
        assert_eq!(json["run_list"], serde_json::json!([]));
    }
}
