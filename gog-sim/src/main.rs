//! Game of the Generals match simulator
//!
//! Plays automated matches (scripted human against the heuristic opponent)
//! and reports how they ended.
//!
//! ```text
//! gog-sim [--games N] [--seed S] [--max-plies N] [--log-interval SECS] [--verbose]
//! ```

mod runner;
mod stats;

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::runner::play_match;
use crate::stats::SimStats;

const DEFAULT_GAMES: u64 = 1_000;
const DEFAULT_MAX_PLIES: usize = 2_000;
const DEFAULT_LOG_INTERVAL_SECS: u64 = 5;

/// Value following `name` on the command line, parsed.
fn flag_value<T: std::str::FromStr>(args: &[String], name: &str) -> Option<T> {
    let idx = args.iter().position(|arg| arg == name)?;
    args.get(idx + 1)?.parse().ok()
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let games: u64 = flag_value(&args, "--games").unwrap_or(DEFAULT_GAMES);
    let base_seed: u64 = flag_value(&args, "--seed").unwrap_or_else(rand::random);
    let max_plies: usize = flag_value(&args, "--max-plies").unwrap_or(DEFAULT_MAX_PLIES);
    let log_interval_secs: u64 = flag_value(&args, "--log-interval").unwrap_or(DEFAULT_LOG_INTERVAL_SECS);
    let verbose = args.contains(&"--verbose".to_string());

    println!("Game of the Generals Simulator");
    println!("==============================");
    println!("Games: {}", games);
    println!("Seed: {}", base_seed);
    println!("Max plies per match: {}", max_plies);
    println!("Log interval: {}s\n", log_interval_secs);

    // Set up SIGINT handler so an interrupted run still prints its summary
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, finishing up...");
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Warning: failed to set Ctrl-C handler: {}", e);
    }

    let mut stats = SimStats::new();
    let start = Instant::now();

    for i in 0..games {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let seed = base_seed.wrapping_add(i);
        match play_match(seed, max_plies, verbose) {
            Ok(report) => stats.record(&report),
            Err(e) => eprintln!("Match with seed {} aborted: {}", seed, e),
        }
        if stats.should_log(log_interval_secs) {
            stats.log_progress();
        }
    }

    println!("\n==============================");
    if running.load(Ordering::SeqCst) {
        println!("Simulation complete!");
    } else {
        println!("Simulation interrupted.");
    }
    println!("==============================");
    println!("Time: {:.2}s", start.elapsed().as_secs_f64());
    println!();
    stats.print_summary();
}
