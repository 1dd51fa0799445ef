//! Game creation and the one-time randomized setup.

use std::collections::HashSet;
use std::time::Duration;

use tracing::info;

use crate::board::{
    EventKind, GameEvent, GameState, GameStatus, Player, PlayerId, TerritoryMap, TurnPhase,
    ALL_TERRITORIES,
};
use crate::chance::Chance;
use crate::clock::deadline_after;

use super::error::SetupError;
use super::reinforce::reinforcements;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Seat colors, assigned in seating order.
pub const PLAYER_COLORS: [&str; MAX_PLAYERS] =
    ["#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c"];

/// A player joining a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
}

impl Seat {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Seat { id: PlayerId::new(id), name: name.into() }
    }
}

/// Armies each player starts with, by table size.
pub const fn starting_armies(player_count: usize) -> u32 {
    match player_count {
        2 => 40,
        3 => 35,
        4 => 30,
        5 => 25,
        _ => 20,
    }
}

/// Creates a game in `setup` status with every territory unowned and empty.
pub fn create_game(id: impl Into<String>, seats: &[Seat], entry_fee: f64) -> Result<GameState, SetupError> {
    if seats.len() < MIN_PLAYERS {
        return Err(SetupError::TooFewPlayers { min: MIN_PLAYERS, got: seats.len() });
    }
    if seats.len() > MAX_PLAYERS {
        return Err(SetupError::TooManyPlayers { max: MAX_PLAYERS, got: seats.len() });
    }
    let mut seen = HashSet::new();
    for seat in seats {
        if seat.id.as_str().is_empty() {
            return Err(SetupError::EmptyPlayerId);
        }
        if !seen.insert(&seat.id) {
            return Err(SetupError::DuplicatePlayer(seat.id.to_string()));
        }
    }

    let players = seats
        .iter()
        .zip(PLAYER_COLORS.iter().cycle())
        .map(|(seat, color)| Player {
            id: seat.id.clone(),
            name: seat.name.clone(),
            color: (*color).to_string(),
            is_eliminated: false,
            cards_held: Vec::new(),
        })
        .collect();

    Ok(GameState {
        id: id.into(),
        status: GameStatus::Setup,
        players,
        territories: TerritoryMap::unowned(),
        current_player_id: None,
        current_phase: TurnPhase::Reinforce,
        turn_number: 0,
        reinforcements_remaining: 0,
        conquered_this_turn: false,
        card_sets_turned_in: 0,
        turn_deadline: None,
        log: Vec::new(),
        winner: None,
        entry_fee,
        pot: entry_fee * seats.len() as f64,
    })
}

/// Deals territories round-robin in random order, scatters the remaining
/// starting armies over each player's holdings, and starts the first turn.
pub fn setup_game(
    state: &GameState,
    now_ms: u64,
    timeout: Duration,
    chance: &mut impl Chance,
) -> Result<GameState, SetupError> {
    if state.status != GameStatus::Setup {
        return Err(SetupError::NotInSetup(state.status));
    }
    let player_count = state.players.len();
    if player_count < MIN_PLAYERS {
        return Err(SetupError::TooFewPlayers { min: MIN_PLAYERS, got: player_count });
    }

    let mut s = state.clone();
    let mut order = ALL_TERRITORIES;
    chance.shuffle(&mut order);
    for (i, &t) in order.iter().enumerate() {
        s.territories[t].owner = Some(s.players[i % player_count].id.clone());
        s.territories[t].armies = 1;
    }

    let armies = starting_armies(player_count);
    for player in &s.players {
        let owned: Vec<_> = s.territories.owned_by(&player.id).collect();
        let extra = armies.saturating_sub(owned.len() as u32);
        for _ in 0..extra {
            let t = owned[chance.pick(owned.len())];
            s.territories[t].armies += 1;
        }
    }

    let first = s.players[0].id.clone();
    s.status = GameStatus::Playing;
    s.current_phase = TurnPhase::Reinforce;
    s.turn_number = 1;
    s.reinforcements_remaining = reinforcements(&s.territories, &first);
    s.current_player_id = Some(first);
    s.turn_deadline = Some(deadline_after(now_ms, timeout));
    s.log.push(GameEvent::new(
        EventKind::GameStarted { player_count, starting_armies: armies },
        None,
        now_ms,
    ));
    s.log.push(GameEvent::new(EventKind::SetupComplete, None, now_ms));

    info!(game = %s.id, players = player_count, starting_armies = armies, "game set up");
    Ok(s)
}
