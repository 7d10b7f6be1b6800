//! Board nets as seen by the inspector.

use serde::{Deserialize, Serialize};

/// A named electrical connection group on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// Net number, unique per board and starting at 1
    pub net_number: u32,

    /// Net name
    pub name: String,
}

impl Net {
    /// Create a new net.
    pub fn new(net_number: u32, name: impl Into<String>) -> Self {
        Self {
            net_number,
            name: name.into(),
        }
    }
}

/// One row of the net inspector.
///
/// Derived from a [`Net`] and the ratsnest at query time. Rows are rebuilt
/// on every query and carry no identity of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetRow {
    /// Number of the net this row was built from
    pub net_number: u32,

    /// Net name
    pub name: String,

    /// The ratsnest still has at least one incomplete connection
    pub unrouted: bool,
}

impl NetRow {
    /// Build a row from a net and its routing status.
    pub fn new(net: &Net, unrouted: bool) -> Self {
        Self {
            net_number: net.net_number,
            name: net.name.clone(),
            unrouted,
        }
    }

    /// Status column text.
    pub fn status_text(&self) -> &'static str {
        if self.unrouted {
            "Unrouted"
        } else {
            "Routed"
        }
    }
}
