//! routeview core data models.
//!
//! This crate defines the value types shared by the routing progress
//! dashboard and the net inspector: counter snapshots emitted by the
//! router, nets read from the board, display settings, and the small
//! observer used to fan selection events out to collaborators.

#![warn(missing_docs)]

// Identities
mod id;

// Router telemetry
mod counters;

// Board nets
mod net;

// Settings and formatting
mod settings;
mod format;

// Time and events
mod clock;
mod notify;
mod status;

// Re-exports
pub use id::SubscriptionId;

pub use counters::CounterSnapshot;
pub use net::{Net, NetRow};

pub use settings::{ConfigError, DashboardConfig, RoutingMode};
pub use format::{format_elapsed, NumberFormat};

pub use clock::{Clock, ManualClock, SystemClock};
pub use notify::Notifier;
pub use status::{IssuesClicked, StatusBar};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
