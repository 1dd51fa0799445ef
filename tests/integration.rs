//! Integration tests for the simulate binary.
//!
//! Spawns the binary with various flags and checks the JSONL it writes.

use std::process::{Command, Output};

use conquest::simulate::GameRecord;

fn run_simulate(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_simulate");
    Command::new(exe)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("MOVE_TIMEOUT_SECONDS")
        .env_remove("ENTRY_FEE_USD")
        .output()
        .expect("failed to start simulate")
}

fn records(output: &Output) -> Vec<GameRecord> {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be a game record"))
        .collect()
}

#[test]
fn writes_one_record_per_game() {
    let output = run_simulate(&["--games", "3", "--players", "3", "--seed", "7", "--threads", "1", "--quiet"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let games = records(&output);
    assert_eq!(games.len(), 3);
    for (i, game) in games.iter().enumerate() {
        assert_eq!(game.game_id, i);
        assert_eq!(game.seed, 7 + i as u64);
        assert_eq!(game.seats.len(), 3);
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let args = ["--games", "2", "--players", "4", "--seed", "123", "--max-turns", "60", "--quiet"];
    let a = run_simulate(&args);
    let b = run_simulate(&args);
    assert!(a.status.success());
    assert_eq!(records(&a), records(&b));
}

#[test]
fn thread_count_does_not_change_results() {
    let base = ["--games", "4", "--players", "2", "--seed", "55", "--max-turns", "80", "--quiet"];
    let mut one = base.to_vec();
    one.extend(["--threads", "1"]);
    let mut four = base.to_vec();
    four.extend(["--threads", "4"]);
    assert_eq!(records(&run_simulate(&one)), records(&run_simulate(&four)));
}

#[test]
fn idling_agents_end_by_timeout() {
    let output = run_simulate(&["--games", "1", "--players", "2", "--idle-rate", "1", "--seed", "9", "--quiet"]);
    assert!(output.status.success());
    let games = records(&output);
    assert_eq!(games.len(), 1);
    let game = &games[0];
    assert!(game.finished);
    assert_eq!(game.timeouts, 1);
    assert_eq!(game.winner.as_ref().map(|w| w.as_str()), Some("p2"));
}

#[test]
fn writes_to_output_file() {
    let path = std::env::temp_dir().join(format!("conquest-sim-{}.jsonl", std::process::id()));
    let path_str = path.to_str().unwrap();
    let output = run_simulate(&["--games", "2", "--seed", "3", "--max-turns", "20", "--output", path_str, "--quiet"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    std::fs::remove_file(&path).ok();
}

#[test]
fn quiet_suppresses_progress() {
    let output = run_simulate(&["--games", "1", "--seed", "1", "--max-turns", "10", "--quiet"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Game 1/1"), "stderr: {}", stderr);

    let output = run_simulate(&["--games", "1", "--seed", "1", "--max-turns", "10"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Game 1/1"), "stderr: {}", stderr);
}

#[test]
fn bad_arguments_fail() {
    let output = run_simulate(&["--games", "many"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid --games value"));

    let output = run_simulate(&["--bogus"]);
    assert!(!output.status.success());

    let output = run_simulate(&["--games", "1", "--players", "9", "--quiet"]);
    assert!(!output.status.success());
}

#[test]
fn bad_environment_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_simulate"))
        .args(["--games", "1", "--quiet"])
        .env_remove("RUST_LOG")
        .env("MOVE_TIMEOUT_SECONDS", "never")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("MOVE_TIMEOUT_SECONDS"));
}
