//! Common types used across the application

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Culture-invariant timestamp layout used in flat records
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column separator of flat records; never allowed inside a SKU
pub const FIELD_SEPARATOR: char = ';';

/// Monotonic record id allocator.
///
/// Ids start at 1 and only move forward: observing an existing id `n` makes
/// the next allocation at least `n + 1`, so reloaded stores never reuse ids.
/// Once `u64::MAX` has been handed out or observed the sequence is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequence {
    next: Option<u64>,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Account for an id that already exists in the store
    pub fn observe(&mut self, id: u64) {
        self.next = match (self.next, id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
    }

    /// Peek at the id the next allocation will return; `None` when exhausted
    pub fn peek(&self) -> Option<u64> {
        self.next
    }

    pub fn next_id(&mut self) -> Option<u64> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(DATE_TIME_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
