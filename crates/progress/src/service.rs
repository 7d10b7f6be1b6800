//! Single-owner progress service.
//!
//! The router reports progress from its own worker while the display lives
//! elsewhere. To keep reads and writes of the run state from interleaving,
//! the [`ProgressTracker`] is moved into one tokio task and every other
//! thread talks to it through a [`ProgressHandle`], which only queues
//! commands. Commands are applied in the order they were sent, and the
//! display is redrawn after each one.

use crate::frame::{DashboardFrame, DisplaySurface};
use crate::tracker::{ProgressTracker, RunPhase};
use routeview_core::{Clock, CounterSnapshot, DashboardConfig};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Errors returned by reads against the progress service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service task has stopped
    #[error("progress service is not running")]
    Closed,
}

/// A request queued for the task that owns the tracker.
#[derive(Debug)]
pub enum ProgressCommand {
    /// Return to idle
    Reset,
    /// Start a new run
    StartRun {
        /// Stage text
        label: String,
        /// Pass limit
        max_passes: i64,
    },
    /// The router entered a pass
    MarkPass {
        /// Stage text
        label: String,
        /// Pass number reported by the router
        pass_number: i64,
        /// First pass number of the run
        start_pass: i64,
        /// Pass limit
        max_passes: i64,
    },
    /// New router counters
    UpdateFromCounters {
        /// Stage text, empty to keep the current one
        label: String,
        /// Router counters, if any were reported
        snapshot: Option<CounterSnapshot>,
        /// First pass number of the run
        start_pass: i64,
        /// Pass limit
        max_passes: i64,
    },
    /// The run ended
    Finish {
        /// The run was stopped before completion
        cancelled: bool,
        /// Text shown on the pass bar
        summary: String,
    },
    /// Redraw so the timer advances
    Tick,
    /// Read the elapsed time
    Elapsed(oneshot::Sender<String>),
    /// Read the current frame
    Frame(oneshot::Sender<DashboardFrame>),
    /// Stop the service
    Shutdown,
}

/// Options for the service loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Drop pass and counter updates while the run is finished
    pub suppress_after_finish: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            suppress_after_finish: true,
        }
    }
}

impl From<&DashboardConfig> for ServiceOptions {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            suppress_after_finish: config.suppress_after_finish,
        }
    }
}

/// Cloneable, thread-safe entry point to a running progress service.
///
/// Mutating calls never block and never fail; if the service has stopped
/// the command is dropped.
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    tx: mpsc::UnboundedSender<ProgressCommand>,
}

impl ProgressHandle {
    /// Return to idle.
    pub fn reset(&self) {
        self.send(ProgressCommand::Reset);
    }

    /// Start a new run.
    pub fn start_run(&self, label: impl Into<String>, max_passes: i64) {
        self.send(ProgressCommand::StartRun {
            label: label.into(),
            max_passes,
        });
    }

    /// Report that the router entered a pass.
    pub fn mark_pass(
        &self,
        label: impl Into<String>,
        pass_number: i64,
        start_pass: i64,
        max_passes: i64,
    ) {
        self.send(ProgressCommand::MarkPass {
            label: label.into(),
            pass_number,
            start_pass,
            max_passes,
        });
    }

    /// Report new router counters.
    pub fn update_from_counters(
        &self,
        label: impl Into<String>,
        snapshot: Option<CounterSnapshot>,
        start_pass: i64,
        max_passes: i64,
    ) {
        self.send(ProgressCommand::UpdateFromCounters {
            label: label.into(),
            snapshot,
            start_pass,
            max_passes,
        });
    }

    /// Report that the run ended.
    pub fn finish(&self, cancelled: bool, summary: impl Into<String>) {
        self.send(ProgressCommand::Finish {
            cancelled,
            summary: summary.into(),
        });
    }

    /// Ask for a redraw.
    pub fn tick(&self) {
        self.send(ProgressCommand::Tick);
    }

    /// Stop the service after the commands already queued.
    pub fn shutdown(&self) {
        self.send(ProgressCommand::Shutdown);
    }

    /// Elapsed time as `MM:SS`, read on the owning task.
    pub async fn elapsed_text(&self) -> Result<String, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(ProgressCommand::Elapsed(tx))
            .map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    /// Current frame, read on the owning task.
    pub async fn frame(&self) -> Result<DashboardFrame, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(ProgressCommand::Frame(tx))
            .map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    /// The service has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, command: ProgressCommand) {
        if let Err(e) = self.tx.send(command) {
            debug!("Progress service stopped, dropping {:?}", e.0);
        }
    }
}

/// Progress service spawner.
pub struct ProgressService;

impl ProgressService {
    /// Move `tracker` into a new task that renders to `surface`.
    ///
    /// Must be called inside a tokio runtime. The join handle yields the
    /// tracker back once the service stops.
    pub fn spawn<C>(
        tracker: ProgressTracker<C>,
        surface: Box<dyn DisplaySurface>,
        options: ServiceOptions,
    ) -> (ProgressHandle, JoinHandle<ProgressTracker<C>>)
    where
        C: Clock + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(tracker, surface, rx, options));
        (ProgressHandle { tx }, task)
    }

    /// Send a tick every `interval` until the service stops.
    pub fn spawn_ticker(handle: ProgressHandle, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            while !handle.is_closed() {
                ticker.tick().await;
                handle.tick();
            }
        })
    }
}

async fn run<C: Clock>(
    mut tracker: ProgressTracker<C>,
    mut surface: Box<dyn DisplaySurface>,
    mut rx: mpsc::UnboundedReceiver<ProgressCommand>,
    options: ServiceOptions,
) -> ProgressTracker<C> {
    info!("Progress service started");

    while let Some(command) = rx.recv().await {
        let stale = options.suppress_after_finish && tracker.phase() == RunPhase::Finished;

        match command {
            ProgressCommand::Reset => tracker.reset(),
            ProgressCommand::StartRun { label, max_passes } => {
                tracker.start_run(&label, max_passes)
            }
            ProgressCommand::MarkPass { pass_number, .. } if stale => {
                debug!("Ignoring pass {} marker after finish", pass_number);
                continue;
            }
            ProgressCommand::MarkPass {
                label,
                pass_number,
                start_pass,
                max_passes,
            } => tracker.mark_pass(&label, pass_number, start_pass, max_passes),
            ProgressCommand::UpdateFromCounters { .. } if stale => {
                debug!("Ignoring counter update after finish");
                continue;
            }
            ProgressCommand::UpdateFromCounters {
                label,
                snapshot,
                start_pass,
                max_passes,
            } => tracker.update_from_counters(&label, snapshot.as_ref(), start_pass, max_passes),
            ProgressCommand::Finish { cancelled, summary } => tracker.finish(cancelled, &summary),
            ProgressCommand::Tick => {}
            ProgressCommand::Elapsed(reply) => {
                let _ = reply.send(tracker.elapsed_text());
                continue;
            }
            ProgressCommand::Frame(reply) => {
                let _ = reply.send(tracker.frame());
                continue;
            }
            ProgressCommand::Shutdown => break,
        }

        surface.render(&tracker.frame()).await;
    }

    info!("Progress service stopped");
    tracker
}
