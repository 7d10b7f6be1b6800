//! Net inspection (Layer 2)
//!
//! Filtered, ordered views over the nets of the current board, and the
//! focus requests raised when a net is picked.

#![warn(missing_docs)]

pub mod provider;
pub mod query;
pub mod inspector;

pub use provider::{BoardError, JsonBoard, NetProvider};
pub use query::{focus, query, query_provider, FocusRequest, NetFilter};
pub use inspector::NetInspector;
