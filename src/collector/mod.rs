//! Transport to the Chef Data Collector
//!
//! One client per message: the client is built from a [`DataCollectorConfig`],
//! POSTs a single JSON body with the data collector auth headers, and is dropped.

pub mod client;
pub mod error;

pub use client::{DataCollectorClient, DataCollectorConfig};
pub use error::{DataCollectorError, Result};
