//! Cache-simulation CLI.
//!
//! This binary runs the simulation engine over a JSON-serialized session
//! trace. It performs:
//! 1. **Single run:** One (block size, prefetch rate) cell, printing the full
//!    counter table and derived ratios.
//! 2. **Sweep:** The default 48-cell grid (or a grid from a JSON file), one
//!    table row per cell.

use std::fs;
use std::process;

use clap::{Parser, Subcommand};

use iosim_core::config::{SimConfig, SweepConfig};
use iosim_core::sim::{NullReporter, SweepReporter, simulate_session, simulate_sweep};
use iosim_core::stats::{CacheRatios, SessionSummary};
use iosim_core::trace::SessionTrace;

#[derive(Parser, Debug)]
#[command(
    name = "iosim",
    author,
    version,
    about = "Read-ahead cache simulation over file-access traces",
    long_about = "Replay a recorded file-access session against a simulated block cache.\n\nTraces are JSON documents matching iosim_core::trace::SessionTrace.\n\nExamples:\n  iosim run session.json --block-size 262144\n  iosim run session.json --block-size 1048576 --prefetch-rate 4194304\n  iosim sweep session.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate one cache configuration and print counters and ratios.
    Run {
        /// Session trace file (JSON).
        trace: String,

        /// Cache block size in bytes.
        #[arg(long, default_value_t = 1024 * 1024)]
        block_size: u64,

        /// Prefetch rate in bytes per second (0 disables prefetch).
        #[arg(long, default_value_t = 0.0)]
        prefetch_rate: f64,
    },

    /// Simulate a configuration grid and print one row per cell.
    Sweep {
        /// Session trace file (JSON).
        trace: String,

        /// Grid file (JSON); defaults to the built-in 48-cell grid.
        #[arg(long)]
        grid: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trace,
            block_size,
            prefetch_rate,
        } => cmd_run(&trace, block_size, prefetch_rate),
        Commands::Sweep { trace, grid } => cmd_sweep(&trace, grid.as_deref()),
    }
}

/// Loads a session trace, exiting with a message on failure.
fn load_trace(path: &str) -> SessionTrace {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read trace file '{path}': {err}");
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(trace) => trace,
        Err(err) => {
            eprintln!("error: cannot parse trace file '{path}': {err}");
            process::exit(1);
        }
    }
}

fn cmd_run(trace_path: &str, block_size: u64, prefetch_rate: f64) {
    let trace = load_trace(trace_path);
    let config = SimConfig::new(block_size, prefetch_rate);

    let report = match simulate_session(&trace, &config, &mut NullReporter) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    println!("{config}");
    print_summary(&report.summary);
    println!();
    println!("  counters      trips   bytes");
    report.counters.print();
    println!();
    print_ratios(&report.ratios);
}

fn cmd_sweep(trace_path: &str, grid_path: Option<&str>) {
    let trace = load_trace(trace_path);

    let sweep: SweepConfig = match grid_path {
        Some(path) => {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    eprintln!("error: cannot read grid file '{path}': {err}");
                    process::exit(1);
                }
            };
            match serde_json::from_str(&text) {
                Ok(sweep) => sweep,
                Err(err) => {
                    eprintln!("error: cannot parse grid file '{path}': {err}");
                    process::exit(1);
                }
            }
        }
        None => SweepConfig::default(),
    };

    println!(
        "{:<22} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "cell", "done/req", "saved/req", "extra/req", "gotten/fs", "trsav/req"
    );

    let mut printer = RowPrinter;
    if let Err(err) = simulate_sweep(&trace, &sweep, &mut printer) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Sweep reporter printing one table row per finished cell.
struct RowPrinter;

impl SweepReporter for RowPrinter {
    fn cell_sample(&mut self, config: &SimConfig, ratios: &CacheRatios, _summary: &SessionSummary) {
        println!(
            "{:<22} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            config.to_string(),
            ratios.done_over_req,
            ratios.saved_over_req,
            ratios.extra_over_req,
            ratios.gotten_over_fs,
            ratios.trips_saved_over_req
        );
    }

    fn cell_progress(&mut self, _config: &SimConfig, _ratios: &CacheRatios, _fraction: f64) {}
}

fn print_summary(summary: &SessionSummary) {
    println!(
        "  file {} B   read {:.3} of file   vread {:.3} of read   rate {:.0} B/s over {:.0} s",
        summary.file_size, summary.frac_read, summary.frac_vread, summary.data_rate, summary.duration
    );
}

fn print_ratios(ratios: &CacheRatios) {
    println!("  done/req      {:10.4}", ratios.done_over_req);
    println!("  gotten/req    {:10.4}", ratios.gotten_over_req);
    println!("  gotten/fs     {:10.4}", ratios.gotten_over_fs);
    println!("  saved/req     {:10.4}", ratios.saved_over_req);
    println!("  trsaved/req   {:10.4}", ratios.trips_saved_over_req);
    println!("  extra/req     {:10.4}", ratios.extra_over_req);
    println!("  extra/fs      {:10.4}", ratios.extra_over_fs);
    println!("  unused/req    {:10.4}", ratios.unused_over_req);
    println!("  unused/fs     {:10.4}", ratios.unused_over_fs);
    println!("  saved/done    {:10.4}", ratios.saved_over_done);
    println!("  extra/done    {:10.4}", ratios.extra_over_done);
}
