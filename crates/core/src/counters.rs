//! Router counter snapshots.

use serde::{Deserialize, Serialize};

/// A snapshot of the router's counters, emitted during a multi-pass run.
///
/// Every field is optional. A missing field means the router did not
/// report it; aggregation treats it as zero, but nothing here claims the
/// real value is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterSnapshot {
    /// Current pass number, as counted by the router
    pub pass_count: Option<i64>,

    /// Items still queued in the current pass
    pub queued_count: Option<i64>,

    /// Items routed in the current pass
    pub routed_count: Option<i64>,

    /// Items ripped up in the current pass
    pub ripped_count: Option<i64>,

    /// Items skipped in the current pass
    pub skipped_count: Option<i64>,

    /// Items that failed to route in the current pass
    pub failed_count: Option<i64>,

    /// Connections still incomplete on the board
    pub incomplete_count: Option<i64>,
}

impl CounterSnapshot {
    /// Value of a counter for arithmetic: absent and negative both read as 0.
    pub fn value_or_zero(value: Option<i64>) -> i64 {
        value.unwrap_or(0).max(0)
    }

    /// Items that reached a terminal outcome in the current pass.
    pub fn completed(&self) -> i64 {
        [
            self.routed_count,
            self.ripped_count,
            self.skipped_count,
            self.failed_count,
        ]
        .into_iter()
        .map(Self::value_or_zero)
        .fold(0i64, i64::saturating_add)
    }

    /// Items assigned to the current pass: still queued plus completed.
    ///
    /// Only meaningful when the router scopes `queued_count` to the active
    /// pass. A run-wide queue length makes this total too large.
    pub fn total(&self) -> i64 {
        Self::value_or_zero(self.queued_count).saturating_add(self.completed())
    }
}
