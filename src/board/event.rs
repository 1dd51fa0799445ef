//! Game events.
//!
//! Every accepted transition appends one or more events to the game log and
//! returns them to the caller. On the wire an event is
//! `{"type": ..., "data": {...}, "playerId": ..., "timestamp": ...}`.

use serde::{Deserialize, Serialize};

use super::state::{PlayerId, TurnPhase};
use super::territory::Territory;

/// Why a player left the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationReason {
    Conquest,
    Timeout,
}

/// The typed payload of an event, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EventKind {
    GameStarted {
        player_count: usize,
        starting_armies: u32,
    },
    SetupComplete,
    Reinforced {
        territory: Territory,
        armies: u32,
        remaining: u32,
    },
    Attacked {
        from: Territory,
        to: Territory,
        attacker_armies: u32,
        attacker_dice: Vec<u8>,
        defender_dice: Vec<u8>,
        attacker_losses: u32,
        defender_losses: u32,
    },
    TerritoryCaptured {
        territory: Territory,
        from: Territory,
        previous_owner: Option<PlayerId>,
        armies_moved: u32,
    },
    PlayerEliminated {
        eliminated_player_id: PlayerId,
        reason: EliminationReason,
        cards_transferred: usize,
    },
    Fortified {
        from: Option<Territory>,
        to: Option<Territory>,
        armies: u32,
        skipped: bool,
    },
    CardsTurnedIn {
        bonus: u32,
        card_ids: Vec<String>,
        territory_bonuses: Vec<Territory>,
    },
    TurnChanged {
        turn_number: u32,
        phase: TurnPhase,
        reinforcements: u32,
    },
    MoveTimeout {
        phase: TurnPhase,
    },
    GameOver {
        winner: PlayerId,
        pot: f64,
    },
}

impl EventKind {
    /// Returns the wire tag of this event.
    pub const fn tag(&self) -> &'static str {
        match self {
            EventKind::GameStarted { .. } => "game_started",
            EventKind::SetupComplete => "setup_complete",
            EventKind::Reinforced { .. } => "reinforced",
            EventKind::Attacked { .. } => "attacked",
            EventKind::TerritoryCaptured { .. } => "territory_captured",
            EventKind::PlayerEliminated { .. } => "player_eliminated",
            EventKind::Fortified { .. } => "fortified",
            EventKind::CardsTurnedIn { .. } => "cards_turned_in",
            EventKind::TurnChanged { .. } => "turn_changed",
            EventKind::MoveTimeout { .. } => "move_timeout",
            EventKind::GameOver { .. } => "game_over",
        }
    }
}

/// A timestamped event, optionally attributed to a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(rename = "playerId", default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerId>,
    /// Unix time in milliseconds.
    pub timestamp: u64,
}

impl GameEvent {
    pub fn new(kind: EventKind, player: Option<PlayerId>, timestamp: u64) -> Self {
        GameEvent { kind, player, timestamp }
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}
