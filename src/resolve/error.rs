//! Rule-violation errors.
//!
//! Every variant is recoverable: the rejected move leaves the state as it
//! was. The `Display` text is the message reported to the agent.

use crate::board::{GameStatus, Territory, TurnPhase};

/// A move or timeout the rules refuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("game is not in playing state")]
    NotPlaying,
    #[error("not your turn")]
    NotYourTurn,
    #[error("no active player to time out")]
    NoActivePlayer,
    #[error("not {expected} phase (current phase is {actual})")]
    WrongPhase { expected: TurnPhase, actual: TurnPhase },
    #[error("malformed move: {0}")]
    Malformed(String),

    #[error("must place at least 1 army")]
    NoArmies,
    #[error("not enough reinforcements: requested {requested}, {remaining} remaining")]
    NotEnoughReinforcements { requested: u32, remaining: u32 },
    #[error("you do not own {0}")]
    NotOwner(Territory),

    #[error("cannot attack your own territory {0}")]
    AttackOwnTerritory(Territory),
    #[error("{from} and {to} are not adjacent")]
    NotAdjacent { from: Territory, to: Territory },
    #[error("need at least 2 armies on {0} to attack")]
    TooFewToAttack(Territory),
    #[error("must attack with 1-3 armies, got {0}")]
    InvalidCommitment(u32),
    #[error("must leave at least 1 army behind on {0}")]
    MustLeaveOneBehind(Territory),

    #[error("must turn in exactly 3 cards, got {0}")]
    WrongCardCount(usize),
    #[error("card {0} listed more than once")]
    DuplicateCard(String),
    #[error("you do not hold card {0}")]
    CardNotHeld(String),
    #[error("invalid card set")]
    InvalidCardSet,

    #[error("cannot fortify {0} from itself")]
    SameTerritory(Territory),
    #[error("{from} and {to} are not connected through your own territories")]
    NotConnected { from: Territory, to: Territory },
    #[error("invalid army count {armies}: must move 1 to {max}")]
    InvalidFortifyCount { armies: u32, max: u32 },
}

/// Errors creating or setting up a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("need at least {min} players, got {got}")]
    TooFewPlayers { min: usize, got: usize },
    #[error("at most {max} players allowed, got {got}")]
    TooManyPlayers { max: usize, got: usize },
    #[error("player id must not be empty")]
    EmptyPlayerId,
    #[error("player {0} seated twice")]
    DuplicatePlayer(String),
    #[error("game must be in setup state, found {0:?}")]
    NotInSetup(GameStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_territories() {
        let e = MoveError::NotAdjacent { from: Territory::Peru, to: Territory::Japan };
        assert_eq!(e.to_string(), "peru and japan are not adjacent");
        let e = MoveError::WrongPhase { expected: TurnPhase::Attack, actual: TurnPhase::Reinforce };
        assert_eq!(e.to_string(), "not attack phase (current phase is reinforce)");
    }
}
