//! Chef-side values consumed by the event emitters
//!
//! - Run lists, parsed from `recipe[name@version]` / `role[name]` strings
//! - Node snapshots, serialized as Chef's node JSON

pub mod node;
pub mod run_list;

pub use node::Node;
pub use run_list::{ExpandedRunList, ExpandedRunListItem, ItemType, RunList, RunListItem, RunListParseError};
