//! One game at a table.
//!
//! A `Table` is the single owner of a game's snapshot: moves and timeouts
//! for that game go through `&mut self`, so they are applied strictly one at
//! a time while separate tables run independently. The host arms one timer
//! for `deadline()` and calls `expire()` when it fires; a timer that fires
//! after a move already re-armed the deadline finds nothing to do.

use rand::rngs::SmallRng;
use tracing::debug;

use crate::board::{GameState, GameStatus, Move, PlayerId};
use crate::chance::Chance;
use crate::clock::{Clock, SystemClock};
use crate::config::TableConfig;
use crate::engine::Referee;
use crate::resolve::{MoveResult, Seat, SetupError};

pub struct Table<C = SmallRng, K = SystemClock> {
    state: GameState,
    referee: Referee<C, K>,
    config: TableConfig,
}

impl<C: Chance, K: Clock> Table<C, K> {
    /// Seats the players, deals the board and starts the first turn.
    pub fn open(
        id: impl Into<String>,
        seats: &[Seat],
        config: TableConfig,
        mut referee: Referee<C, K>,
    ) -> Result<Self, SetupError> {
        let created = referee.create_game(id, seats, config.entry_fee)?;
        let state = referee.setup_game(&created, config.move_timeout)?;
        Ok(Table { state, referee, config })
    }

    /// Resumes a stored game.
    pub fn resume(state: GameState, config: TableConfig, referee: Referee<C, K>) -> Self {
        Table { state, referee, config }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn referee(&self) -> &Referee<C, K> {
        &self.referee
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.status == GameStatus::Finished
    }

    /// The instant the pending timer must fire at, if a turn is running.
    pub fn deadline(&self) -> Option<u64> {
        match self.state.status {
            GameStatus::Playing => self.state.turn_deadline,
            _ => None,
        }
    }

    /// Applies a move; the stored snapshot changes only if it is accepted.
    pub fn submit(&mut self, actor: &PlayerId, mv: &Move) -> MoveResult {
        let result = self.referee.apply_move(&self.state, actor, mv, self.config.move_timeout);
        self.store(&result);
        result
    }

    /// Like `submit`, for a JSON move request.
    pub fn submit_json(&mut self, actor: &PlayerId, json: &str) -> MoveResult {
        let result = self.referee.apply_request(&self.state, actor, json, self.config.move_timeout);
        self.store(&result);
        result
    }

    /// Applies a timeout if the current deadline has passed.
    ///
    /// Returns `None` for a stale timer: the game is not playing or the
    /// deadline lies in the future.
    pub fn expire(&mut self) -> Option<MoveResult> {
        let deadline = self.deadline()?;
        let now = self.referee.now_ms();
        if now < deadline {
            debug!(game = %self.state.id, now, deadline, "stale timer ignored");
            return None;
        }
        let result = self.referee.apply_timeout(&self.state, self.config.move_timeout);
        self.store(&result);
        Some(result)
    }

    fn store(&mut self, result: &MoveResult) {
        if result.is_ok() {
            self.state = result.state.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TurnPhase;
    use crate::clock::ManualClock;
    use crate::resolve::MoveError;
    use rand::SeedableRng;
    use std::time::Duration;

    fn table(players: usize) -> Table<SmallRng, ManualClock> {
        let seats: Vec<Seat> = (0..players).map(|i| Seat::new(format!("p{}", i), "")).collect();
        let config = TableConfig::default().with_move_timeout(Duration::from_secs(10));
        let referee = Referee::with_parts(SmallRng::seed_from_u64(1), ManualClock::new(0));
        Table::open("t1", &seats, config, referee).unwrap()
    }

    #[test]
    fn open_starts_play() {
        let t = table(3);
        assert_eq!(t.state().status, GameStatus::Playing);
        assert_eq!(t.deadline(), Some(10_000));
        assert_eq!(t.state().pot, 3.0);
    }

    #[test]
    fn entry_fee_sets_pot() {
        let seats: Vec<Seat> = (0..4).map(|i| Seat::new(format!("p{}", i), "")).collect();
        let config = TableConfig::default().with_entry_fee(2.5);
        let referee = Referee::with_parts(SmallRng::seed_from_u64(1), ManualClock::new(0));
        let t = Table::open("fees", &seats, config, referee).unwrap();
        assert_eq!(t.state().entry_fee, 2.5);
        assert_eq!(t.state().pot, 10.0);
        assert_eq!(t.config().entry_fee, 2.5);
    }

    #[test]
    fn resumes_stored_snapshot() {
        let mut t = table(2);
        let p0 = PlayerId::from("p0");
        let remaining = t.state().reinforcements_remaining;
        let territory = t.state().territories.owned_by(&p0).next().unwrap();
        assert!(t.submit(&p0, &Move::Reinforce { territory, armies: remaining }).is_ok());

        let stored = serde_json::to_string(t.state()).unwrap();
        let state: GameState = serde_json::from_str(&stored).unwrap();
        let referee = Referee::with_parts(SmallRng::seed_from_u64(2), ManualClock::new(5_000));
        let mut resumed = Table::resume(state, *t.config(), referee);
        assert_eq!(resumed.state(), t.state());
        assert_eq!(resumed.deadline(), Some(10_000));

        let r = resumed.submit(&p0, &Move::EndAttack);
        assert!(r.is_ok());
        assert_eq!(resumed.state().current_phase, TurnPhase::Fortify);
        assert_eq!(resumed.deadline(), Some(15_000));

        let r = resumed.submit(&p0, &Move::SkipFortify);
        assert!(r.is_ok());
        assert_eq!(resumed.state().current_player_id, Some(PlayerId::from("p1")));
        assert_eq!(resumed.state().log.len(), t.state().log.len() + 3);
    }

    #[test]
    fn stale_timer_is_a_no_op() {
        let mut t = table(2);
        t.referee().clock().set(9_999);
        assert!(t.expire().is_none());
        assert_eq!(t.state().current_player_id, Some(PlayerId::from("p0")));
    }

    #[test]
    fn expired_deadline_eliminates() {
        let mut t = table(3);
        t.referee().clock().set(10_000);
        let result = t.expire().unwrap();
        assert!(result.is_ok());
        assert!(!t.state().is_alive(&PlayerId::from("p0")));
        assert_eq!(t.state().current_player_id, Some(PlayerId::from("p1")));
        assert_eq!(t.deadline(), Some(20_000));
    }

    #[test]
    fn accepted_move_rearms_and_old_timer_goes_stale() {
        let mut t = table(2);
        let p0 = PlayerId::from("p0");
        let remaining = t.state().reinforcements_remaining;
        let territory = t.state().territories.owned_by(&p0).next().unwrap();

        t.referee().clock().set(9_000);
        let r = t.submit(&p0, &Move::Reinforce { territory, armies: remaining });
        assert!(r.is_ok());
        assert_eq!(t.state().current_phase, TurnPhase::Attack);
        assert_eq!(t.deadline(), Some(19_000));

        // The timer armed for the first deadline fires late.
        t.referee().clock().set(10_000);
        assert!(t.expire().is_none());
    }

    #[test]
    fn rejected_move_keeps_snapshot() {
        let mut t = table(2);
        let before = t.state().clone();
        let r = t.submit(&PlayerId::from("p1"), &Move::EndAttack);
        assert_eq!(r.error, Some(MoveError::NotYourTurn));
        assert_eq!(t.state(), &before);

        let r = t.submit_json(&PlayerId::from("p0"), "{}");
        assert!(matches!(r.error, Some(MoveError::Malformed(_))));
        assert_eq!(t.state(), &before);
    }

    #[test]
    fn finished_table_has_no_deadline() {
        let mut t = table(2);
        t.referee().clock().set(10_000);
        t.expire().unwrap();
        assert!(t.is_finished());
        assert_eq!(t.deadline(), None);
        assert!(t.expire().is_none());
    }
}
