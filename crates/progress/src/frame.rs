//! Rendering instructions and display surfaces.

use crate::tracker::RunPhase;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Everything a display needs to draw the routing dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFrame {
    /// Stage text, e.g. "Autorouting (balanced)"
    pub stage_label: String,

    /// Pass progress (0-100)
    pub pass_percent: u8,

    /// Text on the pass bar, e.g. "Pass 3 / 10"
    pub pass_label: String,

    /// Work done in the current pass (0-100)
    pub work_percent: u8,

    /// Text on the work bar, e.g. "Current pass 40%"
    pub work_label: String,

    /// "MM:SS elapsed"
    pub timer_label: String,

    /// Counter summary line
    pub stats_label: String,

    /// Lifecycle phase the frame was taken in
    pub phase: RunPhase,
}

/// Something that draws dashboard frames.
///
/// Always called from the task that owns the tracker.
#[async_trait]
pub trait DisplaySurface: Send {
    /// Draw a frame.
    async fn render(&mut self, frame: &DashboardFrame);
}

/// Writes frames to the log.
#[derive(Debug, Default)]
pub struct LogSurface;

#[async_trait]
impl DisplaySurface for LogSurface {
    async fn render(&mut self, frame: &DashboardFrame) {
        info!(
            "{} | {} ({}%) | {} ({}%) | {} | {}",
            frame.stage_label,
            frame.pass_label,
            frame.pass_percent,
            frame.work_label,
            frame.work_percent,
            frame.timer_label,
            frame.stats_label
        );
    }
}

/// Keeps every rendered frame. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    frames: Arc<Mutex<Vec<DashboardFrame>>>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames rendered so far.
    pub fn frames(&self) -> Vec<DashboardFrame> {
        self.frames.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Most recent frame.
    pub fn last(&self) -> Option<DashboardFrame> {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

#[async_trait]
impl DisplaySurface for RecordingSurface {
    async fn render(&mut self, frame: &DashboardFrame) {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(frame.clone());
    }
}
