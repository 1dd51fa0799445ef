//! Game state representation.
//!
//! Holds the complete snapshot of a game at a given point in time: seats,
//! territory ownership and armies, turn bookkeeping, and the event log.
//! Transitions never mutate a snapshot handed to them; they return a new one.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::event::GameEvent;
use super::territory::{Territory, ALL_TERRITORIES, TERRITORY_COUNT};

/// An already-authenticated player identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        PlayerId(s)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Overall lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Lobby,
    Setup,
    Playing,
    Finished,
}

/// The phase within a player's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Reinforce,
    Attack,
    Fortify,
}

impl TurnPhase {
    pub const fn name(self) -> &'static str {
        match self {
            TurnPhase::Reinforce => "reinforce",
            TurnPhase::Attack => "attack",
            TurnPhase::Fortify => "fortify",
        }
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ownership and garrison of one territory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryState {
    pub id: Territory,
    pub owner: Option<PlayerId>,
    pub armies: u32,
}

impl TerritoryState {
    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        self.owner.as_ref() == Some(player)
    }
}

/// Territory states for the whole board, one entry per territory.
///
/// Entries are stored in board order so the map can be indexed by
/// `Territory`. A map that misses or repeats a territory cannot be built,
/// including through deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TerritoryState>", into = "Vec<TerritoryState>")]
pub struct TerritoryMap(Vec<TerritoryState>);

impl TerritoryMap {
    /// Creates a board with every territory unowned and empty.
    pub fn unowned() -> Self {
        TerritoryMap(
            ALL_TERRITORIES
                .iter()
                .map(|&id| TerritoryState { id, owner: None, armies: 0 })
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &TerritoryState> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TerritoryState> {
        self.0.iter_mut()
    }

    /// Returns the owner of a territory, if any.
    pub fn owner(&self, t: Territory) -> Option<&PlayerId> {
        self[t].owner.as_ref()
    }

    /// Territories owned by `player`, in board order.
    pub fn owned_by<'a>(&'a self, player: &'a PlayerId) -> impl Iterator<Item = Territory> + 'a {
        self.0.iter().filter(move |s| s.is_owned_by(player)).map(|s| s.id)
    }

    pub fn count_owned(&self, player: &PlayerId) -> usize {
        self.0.iter().filter(|s| s.is_owned_by(player)).count()
    }

    /// Total armies on territories owned by `player`.
    pub fn armies_of(&self, player: &PlayerId) -> u32 {
        self.0.iter().filter(|s| s.is_owned_by(player)).map(|s| s.armies).sum()
    }
}

impl Index<Territory> for TerritoryMap {
    type Output = TerritoryState;

    fn index(&self, t: Territory) -> &TerritoryState {
        &self.0[t as usize]
    }
}

impl IndexMut<Territory> for TerritoryMap {
    fn index_mut(&mut self, t: Territory) -> &mut TerritoryState {
        &mut self.0[t as usize]
    }
}

/// Error returned when a territory list does not cover the board exactly once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TerritoryMapError {
    #[error("expected {TERRITORY_COUNT} territories, got {0}")]
    WrongLength(usize),
    #[error("territory {0} appears more than once")]
    Duplicate(Territory),
}

impl TryFrom<Vec<TerritoryState>> for TerritoryMap {
    type Error = TerritoryMapError;

    fn try_from(mut states: Vec<TerritoryState>) -> Result<Self, Self::Error> {
        if states.len() != TERRITORY_COUNT {
            return Err(TerritoryMapError::WrongLength(states.len()));
        }
        states.sort_by_key(|s| s.id);
        // Full length with no repeats covers every territory.
        if let Some(pair) = states.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(TerritoryMapError::Duplicate(pair[0].id));
        }
        Ok(TerritoryMap(states))
    }
}

impl From<TerritoryMap> for Vec<TerritoryState> {
    fn from(map: TerritoryMap) -> Self {
        map.0
    }
}

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub is_eliminated: bool,
    /// Held cards with unique ids, in the order they were received.
    pub cards_held: Vec<Card>,
}

impl Player {
    pub fn is_alive(&self) -> bool {
        !self.is_eliminated
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards_held.iter().find(|c| c.id == id)
    }
}

/// Complete game snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub id: String,
    pub status: GameStatus,
    /// Seats in turn order.
    pub players: Vec<Player>,
    pub territories: TerritoryMap,
    pub current_player_id: Option<PlayerId>,
    pub current_phase: TurnPhase,
    pub turn_number: u32,
    pub reinforcements_remaining: u32,
    pub conquered_this_turn: bool,
    /// Sets traded in by all players so far; drives the escalating bonus.
    pub card_sets_turned_in: u32,
    /// Unix milliseconds after which the current player times out.
    pub turn_deadline: Option<u64>,
    pub log: Vec<GameEvent>,
    pub winner: Option<PlayerId>,
    pub entry_fee: f64,
    pub pot: f64,
}

impl GameState {
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    pub fn is_alive(&self, id: &PlayerId) -> bool {
        self.player(id).is_some_and(Player::is_alive)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    /// The next living player after `id` in seating order, wrapping around.
    ///
    /// `id` itself may already be eliminated; seating order still continues
    /// from its seat. Returns `None` when no other seat is alive.
    pub fn next_alive_after(&self, id: &PlayerId) -> Option<&PlayerId> {
        let n = self.players.len();
        let seat = self.players.iter().position(|p| &p.id == id)?;
        (1..n)
            .map(|offset| &self.players[(seat + offset) % n])
            .find(|p| p.is_alive())
            .map(|p| &p.id)
    }

    /// Ids of every held card across all seats.
    pub fn held_card_ids(&self) -> impl Iterator<Item = &str> {
        self.players.iter().flat_map(|p| p.cards_held.iter().map(|c| c.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: &str, eliminated: bool) -> Player {
        Player {
            id: PlayerId::from(id),
            name: id.to_uppercase(),
            color: "#000000".to_string(),
            is_eliminated: eliminated,
            cards_held: Vec::new(),
        }
    }

    fn state_with(players: Vec<Player>) -> GameState {
        GameState {
            id: "g".to_string(),
            status: GameStatus::Playing,
            players,
            territories: TerritoryMap::unowned(),
            current_player_id: None,
            current_phase: TurnPhase::Reinforce,
            turn_number: 1,
            reinforcements_remaining: 0,
            conquered_this_turn: false,
            card_sets_turned_in: 0,
            turn_deadline: None,
            log: Vec::new(),
            winner: None,
            entry_fee: 0.0,
            pot: 0.0,
        }
    }

    #[test]
    fn unowned_map_covers_board() {
        let map = TerritoryMap::unowned();
        assert_eq!(map.iter().count(), TERRITORY_COUNT);
        assert!(map.iter().all(|s| s.owner.is_none() && s.armies == 0));
        assert_eq!(map[Territory::Japan].id, Territory::Japan);
    }

    #[test]
    fn map_rejects_short_and_duplicated_lists() {
        let mut states: Vec<TerritoryState> = TerritoryMap::unowned().into();
        states.pop();
        assert_eq!(TerritoryMap::try_from(states.clone()), Err(TerritoryMapError::WrongLength(41)));

        states.push(TerritoryState { id: Territory::Alaska, owner: None, armies: 0 });
        assert_eq!(TerritoryMap::try_from(states), Err(TerritoryMapError::Duplicate(Territory::Alaska)));
    }

    #[test]
    fn map_deserialization_accepts_any_order() {
        let mut states: Vec<TerritoryState> = TerritoryMap::unowned().into();
        states.reverse();
        let json = serde_json::to_string(&states).unwrap();
        let map: TerritoryMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, TerritoryMap::unowned());
    }

    #[test]
    fn ownership_queries() {
        let mut map = TerritoryMap::unowned();
        let p = PlayerId::from("p1");
        map[Territory::Peru].owner = Some(p.clone());
        map[Territory::Peru].armies = 3;
        map[Territory::Brazil].owner = Some(p.clone());
        map[Territory::Brazil].armies = 2;

        assert_eq!(map.count_owned(&p), 2);
        assert_eq!(map.armies_of(&p), 5);
        assert_eq!(map.owned_by(&p).collect::<Vec<_>>(), vec![Territory::Peru, Territory::Brazil]);
        assert_eq!(map.owner(Territory::Peru), Some(&p));
        assert_eq!(map.owner(Territory::Argentina), None);
    }

    #[test]
    fn next_alive_skips_eliminated_and_wraps() {
        let state = state_with(vec![seat("a", false), seat("b", true), seat("c", false)]);
        assert_eq!(state.next_alive_after(&PlayerId::from("a")), Some(&PlayerId::from("c")));
        assert_eq!(state.next_alive_after(&PlayerId::from("c")), Some(&PlayerId::from("a")));
        // Continues from an eliminated seat.
        assert_eq!(state.next_alive_after(&PlayerId::from("b")), Some(&PlayerId::from("c")));
    }

    #[test]
    fn next_alive_none_when_alone() {
        let state = state_with(vec![seat("a", false), seat("b", true)]);
        assert_eq!(state.next_alive_after(&PlayerId::from("a")), None);
        assert_eq!(state.alive_count(), 1);
    }
}
