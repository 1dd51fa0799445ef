//! Conquest rules engine library.
//!
//! Exposes the board representation, the rules, move generation, the JSON
//! move protocol, and the table and simulation drivers built on them.

pub mod board;
pub mod chance;
pub mod clock;
pub mod config;
pub mod engine;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod simulate;
pub mod table;
