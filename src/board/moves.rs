//! Move types for every turn phase.
//!
//! Each variant carries exactly the data its handler needs. The wire shapes
//! agents submit live in `protocol::request`.

use super::state::TurnPhase;
use super::territory::Territory;

/// A move submitted by the current player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// Trade three held cards for reinforcements.
    TurnInCards { cards: Vec<String> },

    /// Place armies from the reinforcement pool.
    Reinforce { territory: Territory, armies: u32 },

    /// Attack `to` from `from`, committing 1-3 armies.
    Attack { from: Territory, to: Territory, armies: u32 },

    /// Stop attacking and move on to fortify.
    EndAttack,

    /// Move armies between two connected owned territories, ending the turn.
    Fortify { from: Territory, to: Territory, armies: u32 },

    /// End the turn without fortifying.
    SkipFortify,
}

impl Move {
    /// The phase in which this move is legal.
    pub const fn phase(&self) -> TurnPhase {
        match self {
            Move::TurnInCards { .. } | Move::Reinforce { .. } => TurnPhase::Reinforce,
            Move::Attack { .. } | Move::EndAttack => TurnPhase::Attack,
            Move::Fortify { .. } | Move::SkipFortify => TurnPhase::Fortify,
        }
    }

    /// Returns true if accepting this move always ends the turn.
    pub const fn ends_turn(&self) -> bool {
        matches!(self, Move::Fortify { .. } | Move::SkipFortify)
    }
}
