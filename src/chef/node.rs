use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::run_list::RunList;

pub type Attributes = IndexMap<String, serde_json::Value>;

/// Snapshot of a Chef node as sent in the `node` field of a converge message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(rename = "chef_environment")]
    pub environment: String,
    pub json_class: String,
    pub chef_type: String,
    #[serde(default)]
    pub automatic: Attributes,
    #[serde(default)]
    pub normal: Attributes,
    #[serde(default)]
    pub default: Attributes,
    #[serde(default, rename = "override")]
    pub override_attributes: Attributes,
    #[serde(default)]
    pub run_list: RunList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_group: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, environment: impl Into<String>, run_list: RunList) -> Self {
        Self {
            name: name.into(),
            environment: environment.into(),
            json_class: "Chef::Node".to_string(),
            chef_type: "node".to_string(),
            automatic: Attributes::new(),
            normal: Attributes::new(),
            default: Attributes::new(),
            override_attributes: Attributes::new(),
            run_list,
            policy_name: None,
            policy_group: None,
        }
    }

    /// Add an ohai-style automatic attribute
    pub fn with_automatic(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.automatic.insert(key.into(), value.into());
        self
    }
}
