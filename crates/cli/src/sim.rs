//! Scripted routing runs that feed the progress service.

use anyhow::{Context, Result};
use routeview_core::CounterSnapshot;
use routeview_progress::ProgressHandle;
use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

/// A deterministic multi-pass run.
///
/// Every fourth item of a pass fails and is retried in the next pass; the
/// last allowed pass routes everything that is left.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Connections to route
    pub connections: i64,
    /// First pass number reported by the router
    pub start_pass: i64,
    /// Pass limit
    pub max_passes: i64,
    /// Pause between routed items
    pub step_delay: Duration,
    /// Stop after this many passes
    pub cancel_after: Option<i64>,
}

/// How a simulated run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationResult {
    /// Connections routed
    pub routed: i64,
    /// Connections still open
    pub remaining: i64,
    /// Passes run
    pub passes: i64,
    /// Stopped before completion
    pub cancelled: bool,
}

impl Simulation {
    /// Run on the calling thread, reporting to `progress`.
    pub fn run(&self, progress: &ProgressHandle, label: &str) -> SimulationResult {
        let max_passes = self.max_passes.max(1);
        progress.start_run(label, max_passes);

        let mut remaining = self.connections.max(0);
        let mut routed_total = 0;
        let mut passes = 0;

        while remaining > 0 && passes < max_passes {
            if self.cancel_after.is_some_and(|limit| passes >= limit) {
                break;
            }
            let pass_number = self.start_pass + passes;
            let last_pass = passes + 1 == max_passes;
            passes += 1;

            progress.mark_pass(format!("Pass {}", passes), pass_number, self.start_pass, max_passes);

            let mut counters = CounterSnapshot {
                pass_count: Some(pass_number),
                queued_count: Some(remaining),
                routed_count: Some(0),
                ripped_count: Some(0),
                skipped_count: Some(0),
                failed_count: Some(0),
                incomplete_count: Some(remaining),
            };

            for item in 0..remaining {
                if !last_pass && item % 4 == 3 {
                    bump(&mut counters.failed_count);
                } else {
                    bump(&mut counters.routed_count);
                    routed_total += 1;
                    counters.incomplete_count = Some(self.connections - routed_total);
                }
                counters.queued_count = Some(remaining - item - 1);
                progress.update_from_counters("", Some(counters), self.start_pass, max_passes);

                if !self.step_delay.is_zero() {
                    std::thread::sleep(self.step_delay);
                }
            }

            remaining = counters.failed_count.unwrap_or(0);
        }

        let cancelled = remaining > 0;
        let summary = if cancelled {
            format!("Stopped after {} passes, {} open", passes, remaining)
        } else {
            format!("Routed {} connections in {} passes", routed_total, passes)
        };
        progress.finish(cancelled, summary);

        SimulationResult {
            routed: routed_total,
            remaining,
            passes,
            cancelled,
        }
    }
}

fn bump(counter: &mut Option<i64>) {
    *counter = Some(counter.unwrap_or(0) + 1);
}

/// Read counter snapshots, one JSON object per line. Blank lines are skipped.
pub fn read_snapshots(path: &Path) -> Result<Vec<CounterSnapshot>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut snapshots = Vec::new();
    for (index, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let snapshot = serde_json::from_str(&line)
            .with_context(|| format!("Invalid snapshot on line {}", index + 1))?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

/// Feed recorded snapshots through the progress service.
pub fn replay(
    progress: &ProgressHandle,
    label: &str,
    snapshots: &[CounterSnapshot],
    start_pass: i64,
    max_passes: i64,
    step_delay: Duration,
) {
    progress.start_run(label, max_passes);
    for snapshot in snapshots {
        progress.update_from_counters("", Some(*snapshot), start_pass, max_passes);
        if !step_delay.is_zero() {
            std::thread::sleep(step_delay);
        }
    }
    progress.finish(false, format!("Replayed {} snapshots", snapshots.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeview_core::NumberFormat;
    use routeview_progress::{
        ProgressService, ProgressTracker, RecordingSurface, RunPhase, ServiceOptions,
    };
    use std::io::Write;

    fn simulation(connections: i64, max_passes: i64) -> Simulation {
        Simulation {
            connections,
            start_pass: 1,
            max_passes,
            step_delay: Duration::ZERO,
            cancel_after: None,
        }
    }

    #[tokio::test]
    async fn test_simulation_completes() {
        let surface = RecordingSurface::new();
        let tracker = ProgressTracker::new(NumberFormat::default());
        let (handle, task) =
            ProgressService::spawn(tracker, Box::new(surface.clone()), ServiceOptions::default());

        let producer = handle.clone();
        let result = tokio::task::spawn_blocking(move || simulation(20, 5).run(&producer, "Routing"))
            .await
            .unwrap();

        assert!(!result.cancelled);
        assert_eq!(result.routed, 20);
        assert_eq!(result.remaining, 0);

        handle.shutdown();
        let tracker = task.await.unwrap();
        assert_eq!(tracker.phase(), RunPhase::Finished);

        let frames = surface.frames();
        assert!(frames.iter().all(|f| f.pass_percent <= 100 && f.work_percent <= 100));
        let last = frames.last().unwrap();
        assert_eq!(last.work_label, "Completed");
        assert_eq!(last.pass_label, format!("Routed 20 connections in {} passes", result.passes));
    }

    #[tokio::test]
    async fn test_simulation_cancelled() {
        let surface = RecordingSurface::new();
        let tracker = ProgressTracker::new(NumberFormat::default());
        let (handle, task) =
            ProgressService::spawn(tracker, Box::new(surface.clone()), ServiceOptions::default());

        let mut sim = simulation(20, 5);
        sim.cancel_after = Some(1);
        let producer = handle.clone();
        let result = tokio::task::spawn_blocking(move || sim.run(&producer, "Routing"))
            .await
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.passes, 1);
        assert_eq!(result.routed, 15);
        assert_eq!(result.remaining, 5);

        handle.shutdown();
        task.await.unwrap();
        assert_eq!(surface.last().unwrap().work_label, "Stopped");
    }

    #[test]
    fn test_read_snapshots() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{{\"pass_count\": 1, \"queued_count\": 3, \"routed_count\": 1}}\n\n{{\"pass_count\": 2}}\n"
        )
        .unwrap();

        let snapshots = read_snapshots(file.path()).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].total(), 4);
        assert_eq!(snapshots[1].pass_count, Some(2));
    }

    #[test]
    fn test_read_snapshots_reports_bad_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{}}").unwrap();
        writeln!(file, "not json").unwrap();

        let err = read_snapshots(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
