//! Referee: the rules bound to a random source and a clock.
//!
//! `resolve` is pure over explicit time and dice; a `Referee` supplies both
//! so callers only pass the snapshot, the actor and the move. Production
//! code uses entropy-seeded `SmallRng` and the system clock; tests and
//! simulations inject seeded or loaded dice and a manual clock.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::trace;

use crate::board::{GameState, Move, PlayerId};
use crate::chance::Chance;
use crate::clock::{Clock, SystemClock};
use crate::protocol::parse_move;
use crate::resolve::{self, MoveError, MoveResult, Seat, SetupError};

/// Applies the rules using its own dice and clock.
pub struct Referee<C = SmallRng, K = SystemClock> {
    chance: C,
    clock: K,
}

impl Referee {
    /// Creates a referee with entropy-seeded dice and the system clock.
    pub fn new() -> Self {
        Referee { chance: SmallRng::from_entropy(), clock: SystemClock }
    }

    /// Real clock, reproducible dice.
    pub fn seeded(seed: u64) -> Self {
        Referee { chance: SmallRng::seed_from_u64(seed), clock: SystemClock }
    }
}

impl Default for Referee {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Chance, K: Clock> Referee<C, K> {
    pub fn with_parts(chance: C, clock: K) -> Self {
        Referee { chance, clock }
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Creates a game in `setup` status.
    pub fn create_game(
        &self,
        id: impl Into<String>,
        seats: &[Seat],
        entry_fee: f64,
    ) -> Result<GameState, SetupError> {
        resolve::create_game(id, seats, entry_fee)
    }

    /// Deals the board and starts the first turn.
    pub fn setup_game(&mut self, state: &GameState, timeout: Duration) -> Result<GameState, SetupError> {
        let now = self.clock.now_ms();
        resolve::setup_game(state, now, timeout, &mut self.chance)
    }

    pub fn apply_move(
        &mut self,
        state: &GameState,
        actor: &PlayerId,
        mv: &Move,
        timeout: Duration,
    ) -> MoveResult {
        let now = self.clock.now_ms();
        resolve::apply_move(state, actor, mv, now, timeout, &mut self.chance)
    }

    /// Parses a JSON move request and applies it. A request that does not
    /// decode is rejected like any other illegal move.
    pub fn apply_request(
        &mut self,
        state: &GameState,
        actor: &PlayerId,
        json: &str,
        timeout: Duration,
    ) -> MoveResult {
        match parse_move(json) {
            Ok(mv) => self.apply_move(state, actor, &mv, timeout),
            Err(e) => {
                trace!(game = %state.id, player = %actor, error = %e, "malformed request");
                MoveResult::rejected(state, MoveError::Malformed(e.to_string()))
            }
        }
    }

    pub fn apply_timeout(&mut self, state: &GameState, timeout: Duration) -> MoveResult {
        let now = self.clock.now_ms();
        resolve::apply_timeout(state, now, timeout)
    }
}
