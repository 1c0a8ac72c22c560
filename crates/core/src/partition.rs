//! Object keys for the hourly data-lake layout.
//!
//! Layout: `[{prefix}/]{year}/{month}/{day}/{hour}.parquet`

use std::fmt;

use chrono::{Datelike, Timelike};

/// File extension of every partition written by the uploader.
pub const PARTITION_EXTENSION: &str = "parquet";

/// Storage key derived from a timestamp, truncated to the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionPath {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl PartitionPath {
    /// Build the partition for any chrono timestamp (naive, local or UTC).
    pub fn from_timestamp<T: Datelike + Timelike>(ts: &T) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
            day: ts.day(),
            hour: ts.hour(),
        }
    }

    /// Object key, optionally nested under `prefix`.
    pub fn key(&self, prefix: Option<&str>) -> String {
        match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
            Some(p) => format!("{}/{}", p, self),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for PartitionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}/{:02}/{:02}/{:02}.{}",
            self.year, self.month, self.day, self.hour, PARTITION_EXTENSION
        )
    }
}
