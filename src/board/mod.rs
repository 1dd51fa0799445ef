//! Board representation and game-state types.
//!
//! Contains the static board topology (territories, continents, adjacency)
//! and the snapshot, card, move and event types that flow through the rules.

pub mod adjacency;
pub mod card;
pub mod event;
pub mod moves;
pub mod state;
pub mod territory;

pub use adjacency::{is_adjacent, neighbors, ADJACENCY_MASKS, NEIGHBORS};
pub use card::{Card, CardSymbol, ARMY_SYMBOLS};
pub use event::{EliminationReason, EventKind, GameEvent};
pub use moves::Move;
pub use state::{
    GameState, GameStatus, Player, PlayerId, TerritoryMap, TerritoryMapError, TerritoryState,
    TurnPhase,
};
pub use territory::{
    Continent, Territory, TerritoryInfo, ALL_CONTINENTS, ALL_TERRITORIES, CONTINENT_COUNT,
    TERRITORY_COUNT, TERRITORY_INFO,
};
