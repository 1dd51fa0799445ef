//! Rules resolution.
//!
//! Pure functions from a snapshot plus inputs (move, time, dice) to a new
//! snapshot and the events it produced.

pub mod cards;
pub mod combat;
pub mod error;
pub mod phase;
pub mod reinforce;
pub mod setup;

pub use cards::{build_deck, draw_card, find_set, is_valid_set, set_value};
pub use combat::{compare_dice, resolve_combat, roll_dice, AttackOutcome};
pub use error::{MoveError, SetupError};
pub use phase::{apply_move, apply_timeout, connected, reachable, MoveResult};
pub use reinforce::{controlled_continents, reinforcements};
pub use setup::{create_game, setup_game, starting_armies, Seat, MAX_PLAYERS, MIN_PLAYERS};
