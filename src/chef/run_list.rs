//! Run lists and their expanded form

use lazy_regex::regex_captures;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entry in a run list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Recipe,
    Role,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Recipe => "recipe",
            ItemType::Role => "role",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunListParseError {
    #[error("empty run list item")]
    Empty,
    #[error("unknown run list item type '{0}'")]
    UnknownType(String),
    #[error("malformed run list item '{0}'")]
    Malformed(String),
}

/// One entry of a run list, e.g. `recipe[apache2@1.0.0]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunListItem {
    pub name: String,
    pub item_type: ItemType,
    /// Empty when no version is pinned
    pub version: String,
}

impl RunListItem {
    pub fn recipe(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_type: ItemType::Recipe,
            version: String::new(),
        }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_type: ItemType::Role,
            version: String::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The expanded form reported to the Data Collector.
    ///
    /// An empty version string means "not pinned" and is dropped, so the
    /// serialized item carries no `version` key at all.
    pub fn expand(&self) -> ExpandedRunListItem {
        ExpandedRunListItem {
            item_type: self.item_type,
            name: self.name.clone(),
            version: (!self.version.is_empty()).then(|| self.version.clone()),
            skipped: false,
        }
    }
}

impl fmt::Display for RunListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}[{}]", self.item_type, self.name)
        } else {
            write!(f, "{}[{}@{}]", self.item_type, self.name, self.version)
        }
    }
}

impl FromStr for RunListItem {
    type Err = RunListParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RunListParseError::Empty);
        }

        // Bare names are recipes
        if !s.contains(['[', ']']) {
            return match s.split_once('@') {
                Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                    Ok(RunListItem::recipe(name).with_version(version))
                }
                Some(_) => Err(RunListParseError::Malformed(s.to_string())),
                None => Ok(RunListItem::recipe(s)),
            };
        }

        let (_, kind, name, version) = regex_captures!(r"^([a-z]+)\[([^\[\]@]+)(?:@([^\[\]@]+))?\]$", s)
            .ok_or_else(|| RunListParseError::Malformed(s.to_string()))?;

        let item_type = match kind {
            "recipe" => ItemType::Recipe,
            "role" => ItemType::Role,
            other => return Err(RunListParseError::UnknownType(other.to_string())),
        };

        Ok(RunListItem {
            name: name.to_string(),
            item_type,
            version: version.to_string(),
        })
    }
}

impl Serialize for RunListItem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RunListItem {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered sequence of run list items. Order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunList(Vec<RunListItem>);

impl RunList {
    pub fn new(items: Vec<RunListItem>) -> Self {
        Self(items)
    }

    /// Parse each string as a run list item, failing on the first bad entry
    pub fn parse<S: AsRef<str>>(items: &[S]) -> Result<Self, RunListParseError> {
        items
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_string_vec(&self) -> Vec<String> {
        self.0.iter().map(|item| item.to_string()).collect()
    }

    pub fn expanded_items(&self) -> Vec<ExpandedRunListItem> {
        self.0.iter().map(RunListItem::expand).collect()
    }
}

/// A run list entry as the Data Collector expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedRunListItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub skipped: bool,
}

/// Expanded run list keyed by the environment it was resolved in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedRunList {
    pub id: String,
    pub run_list: Vec<ExpandedRunListItem>,
}

impl ExpandedRunList {
    pub fn new(environment: impl Into<String>, run_list: &RunList) -> Self {
        Self {
            id: environment.into(),
            run_list: run_list.expanded_items(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipe() {
        let item: RunListItem = "recipe[apache2]".parse().unwrap();
        assert_eq!(item, RunListItem::recipe("apache2"));
    }

    #[test]
    fn test_parse_versioned_recipe() {
        let item: RunListItem = "recipe[apache2::mod_ssl@1.2.3]".parse().unwrap();
        assert_eq!(item.name, "apache2::mod_ssl");
        assert_eq!(item.item_type, ItemType::Recipe);
        assert_eq!(item.version, "1.2.3");
    }

    #[test]
    fn test_parse_role() {
        let item: RunListItem = "role[base]".parse().unwrap();
        assert_eq!(item, RunListItem::role("base"));
    }

    #[test]
    fn test_parse_bare_name_is_recipe() {
        let item: RunListItem = "ntp".parse().unwrap();
        assert_eq!(item, RunListItem::recipe("ntp"));

        let item: RunListItem = "ntp@2.0.0".parse().unwrap();
        assert_eq!(item, RunListItem::recipe("ntp").with_version("2.0.0"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<RunListItem>(), Err(RunListParseError::Empty));
        assert_eq!(
            "cookbook[x]".parse::<RunListItem>(),
            Err(RunListParseError::UnknownType("cookbook".to_string()))
        );
        assert!(matches!(
            "recipe[x".parse::<RunListItem>(),
            Err(RunListParseError::Malformed(_))
        ));
        assert!(matches!("x@".parse::<RunListItem>(), Err(RunListParseError::Malformed(_))));
    }

    #[test]
    fn test_display_matches_input() {
        for s in ["recipe[a]", "recipe[a::b@0.1.0]", "role[web]"] {
            let item: RunListItem = s.parse().unwrap();
            assert_eq!(item.to_string(), s);
        }
    }

    #[test]
    fn test_to_string_vec_keeps_order() {
        let run_list = RunList::parse(&["role[base]", "recipe[z]", "recipe[a@1.0.0]"]).unwrap();
        assert_eq!(
            run_list.to_string_vec(),
            vec!["role[base]", "recipe[z]", "recipe[a@1.0.0]"]
        );
    }

    #[test]
    fn test_expand_with_version() {
        let expanded = RunListItem::recipe("a").with_version("1.0.0").expand();
        assert_eq!(expanded.version.as_deref(), Some("1.0.0"));
        assert!(!expanded.skipped);
    }

    #[test]
    fn test_expand_empty_version_omits_key() {
        let expanded = RunListItem::recipe("recipe[a]").expand();
        assert_eq!(expanded.version, None);

        let json = serde_json::to_value(&expanded).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("version"));
        assert_eq!(obj["type"], "recipe");
        assert_eq!(obj["skipped"], false);
    }

    #[test]
    fn test_expanded_run_list_shape() {
        let run_list = RunList::new(vec![RunListItem::role("base"), RunListItem::recipe("ntp").with_version("2.0.0")]);
        let expanded = ExpandedRunList::new("production", &run_list);

        let json = serde_json::to_value(&expanded).unwrap();
        assert_eq!(json["id"], "production");
        assert_eq!(json["run_list"][0]["type"], "role");
        assert_eq!(json["run_list"][1]["version"], "2.0.0");
    }

    #[test]
    fn test_run_list_serde_as_strings() {
        let run_list: RunList = serde_json::from_str(r#"["recipe[a]", "role[b]"]"#).unwrap();
        assert_eq!(run_list.len(), 2);
        assert_eq!(serde_json::to_string(&run_list).unwrap(), r#"["recipe[a]","role[b]"]"#);
    }
}
