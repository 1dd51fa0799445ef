//! Random-agent simulation CLI.
//!
//! Plays games between random agents and outputs one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --games N        Number of games to play (default: 10)
//!   --players N      Seats per game, 2-6 (default: 4)
//!   --max-turns N    Abandon games after this turn (default: 500)
//!   --idle-rate P    Probability an agent lets its deadline pass (default: 0)
//!   --threads N      Number of parallel threads (default: 4)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Only log warnings
//!
//! Table settings come from `MOVE_TIMEOUT_SECONDS` and `ENTRY_FEE_USD`.
//! `RUST_LOG` overrides the log filter.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use conquest::config::TableConfig;
use conquest::simulate::{self, SimulationConfig, Summary};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut config = SimulationConfig::default();
    let mut output_path: Option<String> = None;
    let mut quiet = false;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let parsed = match flag {
            "--games" => value(&args, &mut i, flag).map(|v| config.games = v),
            "--players" => value(&args, &mut i, flag).map(|v| config.players = v),
            "--max-turns" => value(&args, &mut i, flag).map(|v| config.max_turns = v),
            "--idle-rate" => value(&args, &mut i, flag).map(|v| config.idle_rate = v),
            "--threads" => value(&args, &mut i, flag).map(|v| config.threads = v),
            "--seed" => value(&args, &mut i, flag).map(|v| config.seed = v),
            "--output" => value(&args, &mut i, flag).map(|v| output_path = Some(v)),
            "--quiet" => {
                quiet = true;
                Ok(())
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => Err(format!("unknown argument: {}", other)),
        };
        if let Err(msg) = parsed {
            eprintln!("{}", msg);
            print_usage();
            return ExitCode::from(2);
        }
        i += 1;
    }

    init_logging(quiet);

    config.table = match TableConfig::from_env() {
        Ok(table) => table,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Simulating {} games, {} players, max {} turns, idle rate {:.2}, {} threads",
        config.games, config.players, config.max_turns, config.idle_rate, config.threads
    );

    let start = Instant::now();
    let games = match simulate::run_simulation(&config) {
        Ok(games) => games,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();
    info!(
        "Completed {} games in {:.1}s ({:.1} games/hour)",
        games.len(),
        elapsed.as_secs_f64(),
        simulate::games_per_hour(games.len(), elapsed)
    );
    for line in Summary::of(&games).to_string().lines() {
        info!("{}", line);
    }

    let written = match &output_path {
        Some(path) => File::create(path)
            .map_err(simulate::SimulateError::from)
            .and_then(|file| simulate::write_jsonl(&games, &mut BufWriter::new(file))),
        None => simulate::write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    if let Err(e) = written {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    if let Some(path) = output_path {
        info!("Wrote {} games to {}", games.len(), path);
    }
    ExitCode::SUCCESS
}

/// Parses the value following the flag at `args[*i]`, advancing `i`.
fn value<T: FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T, String> {
    *i += 1;
    let raw = args.get(*i).ok_or_else(|| format!("missing value for {}", flag))?;
    raw.parse().map_err(|_| format!("invalid {} value: '{}'", flag, raw))
}

/// Logs to stderr; stdout carries the records.
fn init_logging(quiet: bool) {
    let default_directive = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn print_usage() {
    eprintln!("Usage: simulate [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --players N      Seats per game, 2-6 (default: 4)");
    eprintln!("  --max-turns N    Abandon games after this turn (default: 500)");
    eprintln!("  --idle-rate P    Probability an agent lets its deadline pass (default: 0)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Only log warnings");
    eprintln!("  --help           Show this help");
}
