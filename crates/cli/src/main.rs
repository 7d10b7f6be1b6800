//! routeview CLI - routing progress and net inspection.

mod sim;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use routeview_core::{DashboardConfig, RoutingMode};
use routeview_inspector::{JsonBoard, NetInspector};
use routeview_progress::{
    DashboardFrame, DisplaySurface, ProgressService, ProgressTracker, ServiceOptions,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sim::Simulation;

#[derive(Parser)]
#[command(name = "routeview")]
#[command(about = "Routing progress dashboard and net inspector", long_about = None)]
struct Cli {
    /// Dashboard config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Locale for number grouping
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a multi-pass routing run
    Simulate {
        /// Connections to route
        #[arg(long, default_value = "200")]
        connections: i64,
        /// Pass limit (defaults to the config value)
        #[arg(long)]
        max_passes: Option<i64>,
        /// First pass number
        #[arg(long, default_value = "1")]
        start_pass: i64,
        /// Router preset (fast, balanced, quality)
        #[arg(long)]
        mode: Option<String>,
        /// Milliseconds between routed items
        #[arg(long, default_value = "5")]
        delay_ms: u64,
        /// Stop after this many passes
        #[arg(long)]
        cancel_after: Option<i64>,
    },
    /// Replay recorded counter snapshots (one JSON object per line)
    Replay {
        /// Snapshot file
        file: PathBuf,
        /// Pass limit (defaults to the config value)
        #[arg(long)]
        max_passes: Option<i64>,
        /// First pass number
        #[arg(long, default_value = "1")]
        start_pass: i64,
        /// Milliseconds between snapshots
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
    /// List the nets of a board file
    Nets {
        /// Board file (JSON)
        board: PathBuf,
        /// Only show unrouted nets
        #[arg(long)]
        unrouted_only: bool,
        /// Filter by net name
        #[arg(long, default_value = "")]
        search: String,
        /// Focus the net in this row
        #[arg(long)]
        focus: Option<usize>,
    },
}

/// Prints each frame as one line.
struct TerminalSurface;

#[async_trait]
impl DisplaySurface for TerminalSurface {
    async fn render(&mut self, frame: &DashboardFrame) {
        println!(
            "[{:>3}%] {:<24} [{:>3}%] {:<20} {}  {}",
            frame.pass_percent,
            frame.pass_label,
            frame.work_percent,
            frame.work_label,
            frame.timer_label,
            frame.stats_label
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }

    match cli.command {
        Commands::Simulate {
            connections,
            max_passes,
            start_pass,
            mode,
            delay_ms,
            cancel_after,
        } => {
            if let Some(mode) = RoutingMode::parse(mode.as_deref()) {
                config.routing_mode = mode;
            }
            let simulation = Simulation {
                connections,
                start_pass,
                max_passes: max_passes.unwrap_or(config.max_passes),
                step_delay: Duration::from_millis(delay_ms),
                cancel_after,
            };
            let label = format!("Autorouting ({})", config.routing_mode);

            run_with_dashboard(&config, move |progress| {
                let result = simulation.run(&progress, &label);
                info!(
                    "Simulation ended: {} routed, {} open, {} passes",
                    result.routed, result.remaining, result.passes
                );
            })
            .await?;
        }
        Commands::Replay {
            file,
            max_passes,
            start_pass,
            delay_ms,
        } => {
            let snapshots = sim::read_snapshots(&file)?;
            let max_passes = max_passes.unwrap_or(config.max_passes);
            let label = format!("Replaying {}", file.display());

            run_with_dashboard(&config, move |progress| {
                sim::replay(
                    &progress,
                    &label,
                    &snapshots,
                    start_pass,
                    max_passes,
                    Duration::from_millis(delay_ms),
                );
            })
            .await?;
        }
        Commands::Nets {
            board,
            unrouted_only,
            search,
            focus,
        } => {
            let board = JsonBoard::load(&board)
                .with_context(|| format!("Failed to load board {}", board.display()))?;

            let mut inspector = NetInspector::new();
            inspector.set_unrouted_only(unrouted_only);
            inspector.set_search_text(search);
            inspector.subscribe(|request| {
                println!(
                    "Focus net {} (incompletes only: {}, repaint: {})",
                    request.net_number, request.incompletes_only, request.repaint
                );
            });
            inspector.refresh(Some(&board));

            let columns = inspector.column_names();
            println!("{:>4}  {:<24} {}", "#", columns[0], columns[1]);
            for row in 0..inspector.row_count() {
                println!(
                    "{:>4}  {:<24} {}",
                    row,
                    inspector.cell(row, 0).unwrap_or(""),
                    inspector.cell(row, 1).unwrap_or("")
                );
            }
            println!("Nets ({})", inspector.row_count());

            if let Some(row) = focus {
                if inspector.select(row).is_none() {
                    println!("No net in row {}", row);
                }
            }
        }
    }

    Ok(())
}

/// Run `producer` on a blocking thread while the dashboard renders its updates.
async fn run_with_dashboard<F>(config: &DashboardConfig, producer: F) -> Result<()>
where
    F: FnOnce(routeview_progress::ProgressHandle) + Send + 'static,
{
    let tracker = ProgressTracker::new(config.number_format());
    let (handle, task) =
        ProgressService::spawn(tracker, Box::new(TerminalSurface), ServiceOptions::from(config));
    let ticker =
        ProgressService::spawn_ticker(handle.clone(), Duration::from_millis(config.tick_interval_ms.max(1)));

    let progress = handle.clone();
    tokio::task::spawn_blocking(move || producer(progress))
        .await
        .context("Routing producer panicked")?;

    ticker.abort();
    handle.shutdown();
    let tracker = task.await.context("Progress service panicked")?;
    info!("Run took {}", tracker.elapsed_text());
    Ok(())
}
