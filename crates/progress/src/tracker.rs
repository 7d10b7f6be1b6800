//! Routing progress tracking.
//!
//! [`ProgressTracker`] turns the pass markers and counter snapshots of a
//! multi-pass routing run into two percentages (pass progress and work done
//! in the current pass) plus an elapsed-time label.
//!
//! The tracker never fails. Non-positive pass limits become 1, missing or
//! negative counters count as 0, and a pass marker that arrives before the
//! run was started starts it implicitly.

use crate::frame::DashboardFrame;
use chrono::Duration;
use routeview_core::{format_elapsed, Clock, CounterSnapshot, NumberFormat, SystemClock, Time};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lifecycle of a routing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run started since the last reset
    Idle,
    /// A run is in progress
    Running,
    /// The run completed or was stopped
    Finished,
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Routing ran to completion
    Completed,
    /// Routing was stopped by the user
    Cancelled,
}

impl RunOutcome {
    /// Terminal label shown on the work bar.
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "Completed",
            RunOutcome::Cancelled => "Stopped",
        }
    }
}

/// Run-scoped state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// When the run started (None while idle)
    pub started_at: Option<Time>,

    /// Pass limit for the run, always at least 1
    pub configured_max_passes: u32,

    /// Last effective pass number shown
    pub last_pass_number: i64,

    /// Pass progress (0-100)
    pub pass_percent: u8,

    /// Work done in the current pass (0-100)
    pub work_percent: u8,

    /// Lifecycle phase
    pub phase: RunPhase,

    /// Set once the run finished
    pub outcome: Option<RunOutcome>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            started_at: None,
            configured_max_passes: 1,
            last_pass_number: 0,
            pass_percent: 0,
            work_percent: 0,
            phase: RunPhase::Idle,
            outcome: None,
        }
    }
}

/// Aggregates routing telemetry into dashboard values.
#[derive(Debug)]
pub struct ProgressTracker<C: Clock = SystemClock> {
    clock: C,
    format: NumberFormat,
    state: RunState,
    stage_label: String,
    pass_label: String,
    work_label: String,
    stats_label: String,
}

impl ProgressTracker<SystemClock> {
    /// Create a tracker on the wall clock.
    pub fn new(format: NumberFormat) -> Self {
        Self::with_clock(SystemClock, format)
    }
}

impl<C: Clock> ProgressTracker<C> {
    /// Create a tracker on a specific clock.
    pub fn with_clock(clock: C, format: NumberFormat) -> Self {
        let mut tracker = Self {
            clock,
            format,
            state: RunState::default(),
            stage_label: String::new(),
            pass_label: String::new(),
            work_label: String::new(),
            stats_label: String::new(),
        };
        tracker.reset();
        tracker
    }

    /// Forget the current run and return to idle.
    pub fn reset(&mut self) {
        self.state = RunState::default();
        self.stage_label = "Waiting to route".to_string();
        self.pass_label = "Pass 0 / 0".to_string();
        self.work_label = work_label(0);
        self.stats_label = self.stats_text(&CounterSnapshot::default());
        debug!("Progress reset");
    }

    /// Start a new run with the given pass limit.
    pub fn start_run(&mut self, label: &str, max_passes: i64) {
        self.state.started_at = Some(self.clock.now());
        self.state.configured_max_passes = coerce_max_passes(max_passes);
        self.state.last_pass_number = 0;
        self.state.pass_percent = 0;
        self.state.work_percent = 0;
        self.state.phase = RunPhase::Running;
        self.state.outcome = None;

        self.stage_label = label.to_string();
        self.pass_label = format!("Pass 1 / {}", self.state.configured_max_passes);
        self.work_label = work_label(0);
        debug!(
            "Run started: {} (max {} passes)",
            label, self.state.configured_max_passes
        );
    }

    /// Record that the router entered a pass.
    pub fn mark_pass(&mut self, label: &str, pass_number: i64, start_pass: i64, max_passes: i64) {
        self.ensure_started();
        self.state.configured_max_passes = coerce_max_passes(max_passes);
        self.stage_label = label.to_string();
        self.update_pass_progress(pass_number, start_pass);
    }

    /// Apply a counter snapshot from the router.
    ///
    /// The pass number comes from `snapshot.pass_count`, or `start_pass`
    /// when the router did not report one. Work progress assumes the
    /// router's `queued_count` covers the current pass only; the tracker
    /// cannot check that. An empty `label` keeps the current stage text.
    pub fn update_from_counters(
        &mut self,
        label: &str,
        snapshot: Option<&CounterSnapshot>,
        start_pass: i64,
        max_passes: i64,
    ) {
        self.ensure_started();
        self.state.configured_max_passes = coerce_max_passes(max_passes);
        if !label.is_empty() {
            self.stage_label = label.to_string();
        }

        let pass_number = snapshot
            .and_then(|s| s.pass_count)
            .unwrap_or(start_pass);
        self.update_pass_progress(pass_number, start_pass);

        if let Some(snapshot) = snapshot {
            let percent = round_percent(snapshot.completed(), snapshot.total());
            self.state.work_percent = percent;
            self.work_label = work_label(percent);
            self.stats_label = self.stats_text(snapshot);
        }
    }

    /// Mark the run as finished. Both bars go to 100%.
    pub fn finish(&mut self, cancelled: bool, summary: &str) {
        if self.state.phase != RunPhase::Finished {
            self.ensure_started();
        }
        let outcome = if cancelled {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Completed
        };

        self.state.pass_percent = 100;
        self.state.work_percent = 100;
        self.state.phase = RunPhase::Finished;
        self.state.outcome = Some(outcome);

        self.pass_label = summary.to_string();
        self.work_label = outcome.label().to_string();
        debug!("Run finished: {:?} after {}", outcome, self.elapsed_text());
    }

    /// Time since the run started; zero while idle.
    pub fn elapsed(&self) -> Duration {
        match self.state.started_at {
            Some(started) => (self.clock.now() - started).max(Duration::zero()),
            None => Duration::zero(),
        }
    }

    /// Elapsed time as `MM:SS`.
    pub fn elapsed_text(&self) -> String {
        format_elapsed(self.elapsed())
    }

    /// Current rendering instructions.
    pub fn frame(&self) -> DashboardFrame {
        DashboardFrame {
            stage_label: self.stage_label.clone(),
            pass_percent: self.state.pass_percent,
            pass_label: self.pass_label.clone(),
            work_percent: self.state.work_percent,
            work_label: self.work_label.clone(),
            timer_label: format!("{} elapsed", self.elapsed_text()),
            stats_label: self.stats_label.clone(),
            phase: self.state.phase,
        }
    }

    /// Run state.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    /// Pass progress (0-100).
    pub fn pass_percent(&self) -> u8 {
        self.state.pass_percent
    }

    /// Work done in the current pass (0-100).
    pub fn work_percent(&self) -> u8 {
        self.state.work_percent
    }

    fn ensure_started(&mut self) {
        if self.state.started_at.is_none() {
            self.state.started_at = Some(self.clock.now());
        }
        if self.state.phase != RunPhase::Running {
            if self.state.phase == RunPhase::Finished {
                debug!("Update after finish reopened the run");
            }
            self.state.phase = RunPhase::Running;
            self.state.outcome = None;
        }
    }

    fn update_pass_progress(&mut self, pass_number: i64, start_pass: i64) {
        let max = self.state.configured_max_passes;
        let effective = pass_number
            .saturating_sub(start_pass)
            .saturating_add(1)
            .clamp(1, i64::from(max));

        self.state.last_pass_number = effective;
        self.state.pass_percent = round_percent(effective, i64::from(max));
        self.pass_label = format!("Pass {} / {}", effective, max);
    }

    fn stats_text(&self, snapshot: &CounterSnapshot) -> String {
        let f = |v: Option<i64>| self.format.format(CounterSnapshot::value_or_zero(v));
        format!(
            "Queued {} • Routed {} • Ripped {} • Skipped {} • Failed {} • Incomplete {}",
            f(snapshot.queued_count),
            f(snapshot.routed_count),
            f(snapshot.ripped_count),
            f(snapshot.skipped_count),
            f(snapshot.failed_count),
            f(snapshot.incomplete_count),
        )
    }
}

fn coerce_max_passes(max_passes: i64) -> u32 {
    max_passes.clamp(1, i64::from(u32::MAX)) as u32
}

/// `round(part * 100 / whole)` rounding half up, clamped to 0..=100.
fn round_percent(part: i64, whole: i64) -> u8 {
    if whole <= 0 {
        return 0;
    }
    let part = i128::from(part.max(0));
    let whole = i128::from(whole);
    ((part * 200 + whole) / (whole * 2)).clamp(0, 100) as u8
}

fn work_label(percent: u8) -> String {
    format!("Current pass {}%", percent)
}
