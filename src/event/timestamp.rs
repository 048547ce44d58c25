//! Data collector timestamps: UTC, second precision, literal `Z`

use chrono::{DateTime, TimeZone, Utc};
use serde::Serializer;

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    time.with_timezone(&Utc).format(DATE_TIME_FORMAT).to_string()
}

pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(time))
}
