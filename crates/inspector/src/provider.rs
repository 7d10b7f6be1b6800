//! Board and ratsnest access.

use routeview_core::Net;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors that can occur while loading a board file.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read access to the nets of the current board and its ratsnest.
///
/// Implementations only need to stay consistent for the duration of one
/// query; nets may be added, removed or rerouted between queries.
pub trait NetProvider {
    /// All nets on the board, in any order.
    fn nets(&self) -> Vec<Net>;

    /// Incomplete connections for a net, or `None` if no ratsnest exists.
    fn incomplete_count(&self, net_number: u32) -> Option<u32>;

    /// The net still has at least one incomplete connection.
    fn is_unrouted(&self, net_number: u32) -> bool {
        self.incomplete_count(net_number).unwrap_or(0) > 0
    }
}

/// A board snapshot stored as JSON.
///
/// ```json
/// { "nets": [{ "net_number": 1, "name": "GND" }], "ratsnest": { "1": 3 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonBoard {
    /// Nets on the board
    pub nets: Vec<Net>,

    /// Incomplete connection count per net number, if a ratsnest was computed
    #[serde(default)]
    pub ratsnest: Option<BTreeMap<u32, u32>>,
}

impl JsonBoard {
    /// Load a board from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BoardError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let board: JsonBoard = serde_json::from_str(&content)?;
        tracing::debug!(
            "Loaded {} nets from {}",
            board.nets.len(),
            path.as_ref().display()
        );
        Ok(board)
    }
}

impl NetProvider for JsonBoard {
    fn nets(&self) -> Vec<Net> {
        self.nets.clone()
    }

    fn incomplete_count(&self, net_number: u32) -> Option<u32> {
        self.ratsnest
            .as_ref()
            .map(|r| r.get(&net_number).copied().unwrap_or(0))
    }
}
