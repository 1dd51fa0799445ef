//! Wire protocol for agents.
//!
//! Moves arrive as JSON objects tagged by phase; events and snapshots go
//! out through the serde derives on the board types.

pub mod request;

pub use request::{format_move, parse_move, MoveRequest, RequestError};
