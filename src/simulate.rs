//! Simulated games between random agents.
//!
//! Each game runs through its own [`Table`] with seeded dice and a manual
//! clock that advances one second per move, so a game is reproducible from
//! its recorded seed. Agents can be made to idle, which lets the deadline
//! pass and exercises the timeout path. Games are independent and run in
//! parallel on a rayon pool.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{EliminationReason, EventKind, GameStatus, PlayerId};
use crate::clock::{Clock, ManualClock};
use crate::config::TableConfig;
use crate::engine::Referee;
use crate::movegen::random_move;
use crate::resolve::{MoveResult, Seat, SetupError};
use crate::table::Table;

/// Simulated time between consecutive moves.
const THINK_TIME: Duration = Duration::from_secs(1);

/// Mixed into the game seed for the agents' own generator.
const AGENT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Configuration for a batch of simulated games.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub games: usize,
    /// Seats per game (2-6).
    pub players: usize,
    /// Turn after which an unfinished game is abandoned.
    pub max_turns: u32,
    /// Probability that an agent lets its deadline pass instead of moving.
    pub idle_rate: f64,
    /// Number of parallel threads.
    pub threads: usize,
    /// Base random seed (0 = use entropy). Game `i` uses `seed + i`.
    pub seed: u64,
    /// Table settings shared by every game.
    pub table: TableConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            games: 10,
            players: 4,
            max_turns: 500,
            idle_rate: 0.0,
            threads: 4,
            seed: 0,
            table: TableConfig::default(),
        }
    }
}

/// Errors that abort a simulation batch.
#[derive(Debug, thiserror::Error)]
pub enum SimulateError {
    #[error("invalid table: {0}")]
    Setup(#[from] SetupError),

    #[error("idle rate must be within 0..=1, got {0}")]
    IdleRate(f64),

    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write records: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode record: {0}")]
    Json(#[from] serde_json::Error),
}

/// An elimination observed during a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elimination {
    pub player: PlayerId,
    pub reason: EliminationReason,
    pub turn: u32,
}

/// Final standing of one seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatResult {
    pub player: PlayerId,
    pub territories: usize,
    pub armies: u32,
    pub eliminated: bool,
}

/// Summary of one simulated game, written as one JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: usize,
    /// Seed that reproduces this game.
    pub seed: u64,
    pub finished: bool,
    pub winner: Option<PlayerId>,
    pub turns: u32,
    pub moves: usize,
    pub rejected: usize,
    pub timeouts: usize,
    pub card_sets: u32,
    pub eliminations: Vec<Elimination>,
    /// Territories nobody owns at the end (left by timed-out players).
    pub unowned: usize,
    pub seats: Vec<SeatResult>,
}

/// Plays one game to completion or until `config.max_turns`.
pub fn play_game(config: &SimulationConfig, game_id: usize, seed: u64) -> Result<GameRecord, SetupError> {
    let seats: Vec<Seat> =
        (1..=config.players).map(|i| Seat::new(format!("p{}", i), format!("Agent {}", i))).collect();
    let referee = Referee::with_parts(SmallRng::seed_from_u64(seed), ManualClock::new(0));
    let mut table = Table::open(format!("sim-{}", game_id), &seats, config.table, referee)?;
    let mut agent = SmallRng::seed_from_u64(seed ^ AGENT_SEED_SALT);

    let mut moves = 0;
    let mut rejected = 0;
    let mut timeouts = 0;
    let mut eliminations = Vec::new();

    while !table.is_finished() && table.state().turn_number <= config.max_turns {
        let idle = config.idle_rate > 0.0 && agent.gen_bool(config.idle_rate);
        let planned = if idle { None } else { random_move(table.state(), &mut agent) };

        let result = match planned {
            Some(mv) => {
                table.referee().clock().advance(THINK_TIME);
                let actor = match table.state().current_player_id.clone() {
                    Some(actor) => actor,
                    None => break,
                };
                let result = table.submit(&actor, &mv);
                if result.is_ok() {
                    moves += 1;
                    result
                } else {
                    rejected += 1;
                    warn!(game = game_id, ?mv, error = ?result.error, "agent move rejected");
                    match force_timeout(&mut table) {
                        Some(r) => r,
                        None => break,
                    }
                }
            }
            None => match force_timeout(&mut table) {
                Some(r) => r,
                None => break,
            },
        };

        for event in &result.events {
            match &event.kind {
                EventKind::MoveTimeout { .. } => timeouts += 1,
                EventKind::PlayerEliminated { eliminated_player_id, reason, .. } => {
                    eliminations.push(Elimination {
                        player: eliminated_player_id.clone(),
                        reason: *reason,
                        turn: table.state().turn_number,
                    });
                }
                _ => {}
            }
        }
    }

    let state = table.into_state();
    let seats = state
        .players
        .iter()
        .map(|p| SeatResult {
            player: p.id.clone(),
            territories: state.territories.count_owned(&p.id),
            armies: state.territories.armies_of(&p.id),
            eliminated: p.is_eliminated,
        })
        .collect();
    let record = GameRecord {
        game_id,
        seed,
        finished: state.status == GameStatus::Finished,
        winner: state.winner.clone(),
        turns: state.turn_number,
        moves,
        rejected,
        timeouts,
        card_sets: state.card_sets_turned_in,
        eliminations,
        unowned: state.territories.iter().filter(|t| t.owner.is_none()).count(),
        seats,
    };
    debug!(game = game_id, seed, turns = record.turns, winner = ?record.winner, "simulated game done");
    Ok(record)
}

/// Lets the clock run past the current deadline and fires the timer.
fn force_timeout(table: &mut Table<SmallRng, ManualClock>) -> Option<MoveResult> {
    let deadline = table.deadline()?;
    let clock = table.referee().clock();
    let now = clock.now_ms();
    clock.advance(Duration::from_millis(deadline.saturating_sub(now)));
    table.expire()
}

/// Plays every configured game, returning records ordered by game id.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_simulation(config: &SimulationConfig) -> Result<Vec<GameRecord>, SimulateError> {
    if !(0.0..=1.0).contains(&config.idle_rate) {
        return Err(SimulateError::IdleRate(config.idle_rate));
    }
    let seeds = game_seeds(config);
    if config.threads > 1 {
        run_parallel(config, &seeds)
    } else {
        seeds
            .iter()
            .enumerate()
            .map(|(i, &seed)| -> Result<GameRecord, SimulateError> {
                let game = play_game(config, i, seed)?;
                log_progress(config, i + 1, &game);
                Ok(game)
            })
            .collect()
    }
}

fn run_parallel(config: &SimulationConfig, seeds: &[u64]) -> Result<Vec<GameRecord>, SimulateError> {
    use rayon::prelude::*;

    let completed = AtomicUsize::new(0);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(config.threads).build()?;
    let games = pool.install(|| {
        seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| -> Result<GameRecord, SetupError> {
                let game = play_game(config, i, seed)?;
                let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log_progress(config, n, &game);
                Ok(game)
            })
            .collect::<Result<Vec<_>, SetupError>>()
    })?;
    Ok(games)
}

fn game_seeds(config: &SimulationConfig) -> Vec<u64> {
    if config.seed != 0 {
        (0..config.games).map(|i| config.seed.wrapping_add(i as u64)).collect()
    } else {
        let mut rng = SmallRng::from_entropy();
        (0..config.games).map(|_| rng.gen()).collect()
    }
}

fn log_progress(config: &SimulationConfig, n: usize, game: &GameRecord) {
    let outcome = match &game.winner {
        Some(w) => format!("{} wins", w),
        None => "unfinished".to_string(),
    };
    info!(
        "Game {}/{}: {} after {} turns ({} timeouts)",
        n, config.games, outcome, game.turns, game.timeouts
    );
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> Result<(), SimulateError> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub finished: usize,
    /// Wins per seat, in seating order.
    pub wins_by_seat: Vec<usize>,
    pub mean_turns: f64,
    pub timeouts: usize,
    pub rejected: usize,
}

impl Summary {
    pub fn of(games: &[GameRecord]) -> Self {
        let seats = games.iter().map(|g| g.seats.len()).max().unwrap_or(0);
        let mut wins_by_seat = vec![0; seats];
        for game in games {
            let seat = game
                .winner
                .as_ref()
                .and_then(|w| game.seats.iter().position(|s| &s.player == w));
            if let Some(seat) = seat {
                wins_by_seat[seat] += 1;
            }
        }
        let total_turns: u64 = games.iter().map(|g| u64::from(g.turns)).sum();
        Summary {
            games: games.len(),
            finished: games.iter().filter(|g| g.finished).count(),
            wins_by_seat,
            mean_turns: if games.is_empty() { 0.0 } else { total_turns as f64 / games.len() as f64 },
            timeouts: games.iter().map(|g| g.timeouts).sum(),
            rejected: games.iter().map(|g| g.rejected).sum(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Summary ===")?;
        writeln!(f, "Games: {} ({} finished)", self.games, self.finished)?;
        writeln!(f, "Mean turns: {:.1}", self.mean_turns)?;
        writeln!(f, "Timeouts: {}", self.timeouts)?;
        writeln!(f, "Rejected agent moves: {}", self.rejected)?;
        write!(f, "Wins by seat:")?;
        for (seat, wins) in self.wins_by_seat.iter().enumerate() {
            write!(f, " p{}={}", seat + 1, wins)?;
        }
        Ok(())
    }
}

/// Throughput for a batch that took `elapsed` of wall time.
pub fn games_per_hour(games: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    games as f64 / secs * 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u64) -> SimulationConfig {
        SimulationConfig { games: 3, players: 3, max_turns: 200, threads: 1, seed, ..Default::default() }
    }

    #[test]
    fn game_respects_turn_cap() {
        let config = SimulationConfig { max_turns: 5, ..small(42) };
        let game = play_game(&config, 0, 42).unwrap();
        assert!(game.turns <= 6, "turns {}", game.turns);
        assert_eq!(game.rejected, 0);
        assert_eq!(game.seats.len(), 3);
    }

    #[test]
    fn same_seed_same_record() {
        let config = small(7);
        assert_eq!(play_game(&config, 0, 7).unwrap(), play_game(&config, 0, 7).unwrap());
    }

    #[test]
    fn finished_games_have_one_survivor() {
        let config = small(11);
        for (i, seed) in (11..14).enumerate() {
            let game = play_game(&config, i, seed).unwrap();
            if game.finished {
                let alive: Vec<_> = game.seats.iter().filter(|s| !s.eliminated).collect();
                assert_eq!(alive.len(), 1);
                assert_eq!(game.winner.as_ref(), Some(&alive[0].player));
                assert_eq!(game.eliminations.len(), config.players - 1);
            }
        }
    }

    #[test]
    fn idle_agents_time_out() {
        let config = SimulationConfig { idle_rate: 1.0, ..small(3) };
        let game = play_game(&config, 0, 3).unwrap();
        // The first two seats idle away; the third wins by default.
        assert!(game.finished);
        assert_eq!(game.timeouts, 2);
        assert_eq!(game.winner, Some(PlayerId::from("p3")));
        assert!(game.eliminations.iter().all(|e| e.reason == EliminationReason::Timeout));
        assert_eq!(game.unowned, 28);
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let sequential = run_simulation(&small(99)).unwrap();
        let parallel = run_simulation(&SimulationConfig { threads: 2, ..small(99) }).unwrap();
        assert_eq!(sequential.len(), 3);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn rejects_bad_idle_rate() {
        let config = SimulationConfig { idle_rate: 1.5, ..small(1) };
        assert!(matches!(run_simulation(&config), Err(SimulateError::IdleRate(_))));
    }

    #[test]
    fn jsonl_output_is_valid() {
        let games = run_simulation(&SimulationConfig { games: 2, ..small(5) }).unwrap();
        let mut out = Vec::new();
        write_jsonl(&games, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for (line, game) in lines.iter().zip(&games) {
            let parsed: GameRecord = serde_json::from_str(line).unwrap();
            assert_eq!(&parsed, game);
        }
    }

    #[test]
    fn summary_counts_wins_by_seat() {
        let games = run_simulation(&small(21)).unwrap();
        let summary = Summary::of(&games);
        assert_eq!(summary.games, 3);
        assert_eq!(summary.wins_by_seat.iter().sum::<usize>(), summary.finished);
        assert!(summary.to_string().contains("Wins by seat:"));
    }
}
