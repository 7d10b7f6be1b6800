//! Routing progress (Layer 2)
//!
//! Pass and per-pass work progress for a multi-pass routing run, the frame
//! handed to displays, and the single-owner service that serializes updates
//! coming from the router.

#![warn(missing_docs)]

pub mod tracker;
pub mod frame;
pub mod service;

pub use tracker::{ProgressTracker, RunOutcome, RunPhase, RunState};
pub use frame::{DashboardFrame, DisplaySurface, LogSurface, RecordingSurface};
pub use service::{ProgressCommand, ProgressHandle, ProgressService, ServiceError, ServiceOptions};
