//! corridor — traffic on a road grid, run by the parallel scheduler.
//!
//! Builds a synthetic grid (or loads a CSV network), draws a seeded vehicle
//! population, splits the links across worker threads and runs every link
//! as a simulation unit.  Round summaries and arrivals are written as CSV.
//!
//! ```text
//! corridor [config.json]
//! ```
//!
//! Log level comes from `RUST_LOG` (default `info`).

mod network;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdes_core::{SimConfig, SimTime, WorkerId};
use pdes_network::{load_network_csv, partition_by_x, partition_round_robin, DijkstraRouter, Network};
use pdes_output::{ArrivalRow, CsvWriter, OutputWriter, RoundOutputObserver, RoundSummaryRow};
use pdes_sched::{RoundSummary, RunObserver, RunStats, Scheduler};
use pdes_traffic::{collect_arrivals, generate_population, register_roads, DepartureWindow};

use network::build_grid;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Partition {
    /// Vertical strips by link origin x.
    Strips,
    RoundRobin,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sim:             SimConfig,
    /// Side length of the synthetic grid.  Ignored when `nodes_csv` is set.
    grid_size:       usize,
    nodes_csv:       Option<PathBuf>,
    links_csv:       Option<PathBuf>,
    vehicles:        usize,
    seed:            u64,
    departure_start: f64,
    departure_end:   f64,
    partition:       Partition,
    output_dir:      PathBuf,
    /// Log a progress line every this many rounds.
    progress_every:  u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim:             SimConfig { skip_idle_rounds: true, ..SimConfig::with_workers(4) },
            grid_size:       12,
            nodes_csv:       None,
            links_csv:       None,
            vehicles:        5_000,
            seed:            42,
            departure_start: 0.0,
            departure_end:   1_800.0,
            partition:       Partition::Strips,
            output_dir:      PathBuf::from("output/corridor"),
            progress_every:  500,
        }
    }
}

fn load_config() -> Result<DemoConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", Path::new(&path).display()))?;
            Ok(serde_json::from_str(&text).context("parsing config")?)
        }
        None => Ok(DemoConfig::default()),
    }
}

fn load_network(cfg: &DemoConfig) -> Result<Network> {
    match (&cfg.nodes_csv, &cfg.links_csv) {
        (Some(nodes), Some(links)) => Ok(load_network_csv(nodes, links)?),
        (None, None) => Ok(build_grid(cfg.grid_size)?),
        _ => anyhow::bail!("nodes_csv and links_csv must be given together"),
    }
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Logs every `every`-th round, then forwards to the CSV observer.
struct Progress<W: OutputWriter> {
    inner: RoundOutputObserver<W>,
    every: u64,
}

impl<W: OutputWriter> RunObserver for Progress<W> {
    fn on_run_start(&mut self, horizon_delta: SimTime, num_workers: usize) {
        info!(%horizon_delta, num_workers, "run started");
        self.inner.on_run_start(horizon_delta, num_workers);
    }

    fn on_round_end(&mut self, summary: &RoundSummary) {
        if self.every > 0 && summary.round % self.every == 0 {
            let row = RoundSummaryRow::from(summary);
            info!(round = row.round, horizon = row.horizon, pending = row.pending, "progress");
        }
        self.inner.on_round_end(summary);
    }

    fn on_run_end(&mut self, stats: &RunStats) {
        self.inner.on_run_end(stats);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = load_config()?;
    cfg.sim.validate()?;
    let workers = cfg.sim.num_workers;

    // 1. Network.
    let network = load_network(&cfg)?;
    info!(nodes = network.node_count(), links = network.link_count(), "network ready");

    // 2. Population.
    let window = DepartureWindow {
        start: SimTime(cfg.departure_start),
        end:   SimTime(cfg.departure_end),
    };
    let population = generate_population(&network, &DijkstraRouter, cfg.vehicles, cfg.seed, window)?;

    // 3. Partition and register.
    let assignment: Vec<WorkerId> = match cfg.partition {
        Partition::Strips => partition_by_x(&network, workers)?,
        Partition::RoundRobin => partition_round_robin(network.link_count(), workers)?,
    };
    let mut sched = Scheduler::new(cfg.sim.clone())?;
    register_roads(&mut sched, &network, Arc::new(population), &assignment)?;

    // 4. Run.
    let writer = CsvWriter::new(&cfg.output_dir)?;
    let mut obs = Progress { inner: RoundOutputObserver::new(writer), every: cfg.progress_every };
    let t0 = Instant::now();
    let stats = sched.run(&mut obs)?;
    let elapsed = t0.elapsed();

    // 5. Arrivals.
    let arrivals = collect_arrivals(&sched);
    let mut inner = obs.inner;
    if let Some(e) = inner.take_error() {
        eprintln!("output error: {e}");
    }
    let mut writer = inner.into_writer();
    let rows: Vec<ArrivalRow> = arrivals
        .iter()
        .map(|a| ArrivalRow { vehicle: a.vehicle.0, link: a.link.0, time: a.time.0 })
        .collect();
    writer.write_arrivals(&rows)?;
    writer.finish()?;

    // 6. Summary.
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  rounds       : {}", stats.rounds);
    println!("  horizon step : {:.3} s", stats.horizon_delta.as_secs());
    println!("  delivered    : {}", stats.delivered);
    println!("  undelivered  : {}", stats.undelivered);
    println!("  arrivals     : {} / {}", arrivals.len(), cfg.vehicles);
    if let Some(last) = arrivals.iter().map(|a| a.time).max() {
        println!("  last arrival : {:.1} s", last.as_secs());
    }
    println!();
    println!("{:<8} {:>12} {:>12} {:>10}", "Worker", "Delivered", "Produced", "Busy");
    println!("{}", "-".repeat(46));
    for w in &stats.workers {
        println!("{:<8} {:>12} {:>12} {:>10}", w.worker.0, w.delivered, w.produced, w.busy_rounds);
    }
    println!();
    println!("Output written to {}", cfg.output_dir.display());

    Ok(())
}
