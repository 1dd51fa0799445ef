//! Legal move generation and random agents.
//!
//! Enumerates what the current player may do in the current phase. The
//! random agent picks uniformly among legal options with a few biases that
//! keep simulated games moving: it always trades a set once it holds five
//! cards and prefers to keep attacking while it has favourable odds.

use rand::Rng;

use crate::board::{
    neighbors, GameState, GameStatus, Move, PlayerId, Territory, TurnPhase,
    ALL_TERRITORIES,
};
use crate::resolve::combat::MAX_ATTACK_DICE;
use crate::resolve::{find_set, reachable};

/// Hand size at which the random agent always trades.
const FORCED_TRADE_HAND: usize = 5;

/// Chance of ending the attack phase with attacks still available.
const STOP_ATTACK_P: f64 = 0.15;

/// Chance of skipping the fortify phase.
const SKIP_FORTIFY_P: f64 = 0.5;

/// An attack the player may launch, with the most armies it can commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOption {
    pub from: Territory,
    pub to: Territory,
    pub max_commit: u32,
}

/// A fortify transfer the player may make, with the most armies it can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FortifyOption {
    pub from: Territory,
    pub to: Territory,
    pub max_armies: u32,
}

/// Every attack `player` could launch right now, in board order.
pub fn legal_attacks(state: &GameState, player: &PlayerId) -> Vec<AttackOption> {
    let mut attacks = Vec::new();
    for from in state.territories.owned_by(player) {
        let armies = state.territories[from].armies;
        if armies < 2 {
            continue;
        }
        for &to in neighbors(from) {
            if !state.territories[to].is_owned_by(player) {
                attacks.push(AttackOption { from, to, max_commit: (armies - 1).min(MAX_ATTACK_DICE) });
            }
        }
    }
    attacks
}

/// Every fortify transfer `player` could make, in board order.
pub fn fortify_moves(state: &GameState, player: &PlayerId) -> Vec<FortifyOption> {
    let mut moves = Vec::new();
    for from in state.territories.owned_by(player) {
        let armies = state.territories[from].armies;
        if armies < 2 {
            continue;
        }
        let mask = reachable(&state.territories, from, player);
        for to in ALL_TERRITORIES {
            if to != from && mask & (1u64 << (to as u32)) != 0 {
                moves.push(FortifyOption { from, to, max_armies: armies - 1 });
            }
        }
    }
    moves
}

/// Ids of a tradeable card set held by `player`, if any.
pub fn tradeable_set(state: &GameState, player: &PlayerId) -> Option<Vec<String>> {
    let held = &state.player(player)?.cards_held;
    let set = find_set(held)?;
    Some(set.iter().map(|&i| held[i].id.clone()).collect())
}

/// Picks a random legal move for the current player, or `None` if no game
/// is in progress.
pub fn random_move(state: &GameState, rng: &mut impl Rng) -> Option<Move> {
    if state.status != GameStatus::Playing {
        return None;
    }
    let player = state.current_player_id.as_ref()?;
    match state.current_phase {
        TurnPhase::Reinforce => random_reinforce(state, player, rng),
        TurnPhase::Attack => Some(random_attack(state, player, rng)),
        TurnPhase::Fortify => Some(random_fortify(state, player, rng)),
    }
}

fn random_reinforce(state: &GameState, player: &PlayerId, rng: &mut impl Rng) -> Option<Move> {
    if let Some(cards) = tradeable_set(state, player) {
        let hand = state.player(player).map_or(0, |p| p.cards_held.len());
        if hand >= FORCED_TRADE_HAND || rng.gen_bool(0.5) {
            return Some(Move::TurnInCards { cards });
        }
    }
    if state.reinforcements_remaining == 0 {
        return None;
    }
    // Favour border territories so reinforcements end up where they fight.
    let owned: Vec<Territory> = state.territories.owned_by(player).collect();
    let borders: Vec<Territory> = owned
        .iter()
        .copied()
        .filter(|&t| neighbors(t).iter().any(|&n| !state.territories[n].is_owned_by(player)))
        .collect();
    let pool = if borders.is_empty() { &owned } else { &borders };
    if pool.is_empty() {
        return None;
    }
    let territory = pool[rng.gen_range(0..pool.len())];
    let armies = rng.gen_range(1..=state.reinforcements_remaining);
    Some(Move::Reinforce { territory, armies })
}

fn random_attack(state: &GameState, player: &PlayerId, rng: &mut impl Rng) -> Move {
    let attacks = legal_attacks(state, player);
    let favourable: Vec<&AttackOption> = attacks
        .iter()
        .filter(|a| state.territories[a.from].armies > state.territories[a.to].armies)
        .collect();
    if favourable.is_empty() || rng.gen_bool(STOP_ATTACK_P) {
        return Move::EndAttack;
    }
    let pick = favourable[rng.gen_range(0..favourable.len())];
    Move::Attack { from: pick.from, to: pick.to, armies: pick.max_commit }
}

fn random_fortify(state: &GameState, player: &PlayerId, rng: &mut impl Rng) -> Move {
    if rng.gen_bool(SKIP_FORTIFY_P) {
        return Move::SkipFortify;
    }
    let options = fortify_moves(state, player);
    if options.is_empty() {
        return Move::SkipFortify;
    }
    let pick = options[rng.gen_range(0..options.len())];
    let armies = rng.gen_range(1..=pick.max_armies);
    Move::Fortify { from: pick.from, to: pick.to, armies }
}
