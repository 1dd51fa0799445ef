//! Turn state machine.
//!
//! Validates a move against the current phase and applies it to a copy of
//! the snapshot. Turn flow:
//! - Reinforce -> Attack once the reinforcement pool reaches zero
//! - Attack    -> Fortify on an explicit end-attack move
//! - Fortify   -> next living player's Reinforce (fortify or skip)
//!
//! A timeout eliminates the current player and advances exactly like a turn
//! end. Rejections return the input state unchanged.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::board::{
    is_adjacent, neighbors, Card, EliminationReason, EventKind, GameEvent, GameState, GameStatus,
    Move, PlayerId, Territory, TerritoryMap, TurnPhase,
};
use crate::chance::Chance;
use crate::clock::deadline_after;

use super::cards::{draw_card, is_valid_set, set_value, SET_SIZE, TERRITORY_CARD_BONUS};
use super::combat::{resolve_combat, MAX_ATTACK_DICE};
use super::error::MoveError;
use super::reinforce::reinforcements;

/// Outcome of `apply_move` or `apply_timeout`.
///
/// On rejection `error` is set, `events` is empty, and `state` equals the
/// input snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    pub events: Vec<GameEvent>,
    pub error: Option<MoveError>,
    pub state: GameState,
}

impl MoveResult {
    pub(crate) fn rejected(state: &GameState, error: MoveError) -> Self {
        MoveResult { events: Vec::new(), error: Some(error), state: state.clone() }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    /// Event tags in emission order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.events.iter().map(GameEvent::tag).collect()
    }
}

/// A snapshot being transformed plus the events emitted so far.
struct Transition {
    state: GameState,
    events: Vec<GameEvent>,
    now: u64,
    timeout: Duration,
}

impl Transition {
    fn new(state: &GameState, now: u64, timeout: Duration) -> Self {
        Transition { state: state.clone(), events: Vec::new(), now, timeout }
    }

    fn emit(&mut self, player: Option<&PlayerId>, kind: EventKind) {
        self.events.push(GameEvent::new(kind, player.cloned(), self.now));
    }

    fn rearm(&mut self) {
        self.state.turn_deadline = Some(deadline_after(self.now, self.timeout));
    }

    fn commit(mut self) -> MoveResult {
        self.state.log.extend(self.events.iter().cloned());
        MoveResult { events: self.events, error: None, state: self.state }
    }
}

/// Applies `mv` by `actor` to `state` at time `now_ms`.
///
/// `timeout` is the time allowed per move; deadlines are re-armed from
/// `now_ms` whenever the turn or phase changes, and after every attack.
pub fn apply_move(
    state: &GameState,
    actor: &PlayerId,
    mv: &Move,
    now_ms: u64,
    timeout: Duration,
    chance: &mut impl Chance,
) -> MoveResult {
    let outcome = check_turn(state, actor).and_then(|()| match mv {
        Move::TurnInCards { cards } => turn_in_cards(state, actor, cards, now_ms, timeout),
        Move::Reinforce { territory, armies } => {
            reinforce(state, actor, *territory, *armies, now_ms, timeout)
        }
        Move::Attack { from, to, armies } => {
            attack(state, actor, *from, *to, *armies, now_ms, timeout, chance)
        }
        Move::EndAttack => end_attack(state, actor, now_ms, timeout, chance),
        Move::Fortify { from, to, armies } => {
            fortify(state, actor, Some((*from, *to, *armies)), now_ms, timeout)
        }
        Move::SkipFortify => fortify(state, actor, None, now_ms, timeout),
    });

    match outcome {
        Ok(t) => {
            debug!(
                game = %state.id,
                player = %actor,
                phase = %state.current_phase,
                events = t.events.len(),
                "move accepted"
            );
            t.commit()
        }
        Err(e) => {
            trace!(game = %state.id, player = %actor, error = %e, "move rejected");
            MoveResult::rejected(state, e)
        }
    }
}

/// Handles an elapsed turn deadline: the current player is eliminated, their
/// territories revert to unowned with exactly one army each, and play passes
/// to the next living seat (or the game ends if one player remains).
pub fn apply_timeout(state: &GameState, now_ms: u64, timeout: Duration) -> MoveResult {
    if state.status != GameStatus::Playing {
        return MoveResult::rejected(state, MoveError::NotPlaying);
    }
    let Some(loser) = state.current_player_id.clone() else {
        return MoveResult::rejected(state, MoveError::NoActivePlayer);
    };

    let mut t = Transition::new(state, now_ms, timeout);
    t.emit(Some(&loser), EventKind::MoveTimeout { phase: state.current_phase });

    eliminate(&mut t.state, &loser, None);
    // Holdings stay on the board, one army each, for anyone to take.
    for ts in t.state.territories.iter_mut().filter(|ts| ts.is_owned_by(&loser)) {
        ts.owner = None;
        ts.armies = 1;
    }
    t.emit(
        None,
        EventKind::PlayerEliminated {
            eliminated_player_id: loser.clone(),
            reason: EliminationReason::Timeout,
            cards_transferred: 0,
        },
    );
    warn!(game = %state.id, player = %loser, phase = %state.current_phase, "player timed out");

    if t.state.alive_count() <= 1 {
        close_game(&mut t);
    } else {
        advance_turn(&mut t, &loser);
    }
    t.commit()
}

/// Returns true if `to` can be reached from `from` moving only through
/// territories owned by `owner`.
pub fn connected(territories: &TerritoryMap, from: Territory, to: Territory, owner: &PlayerId) -> bool {
    reachable(territories, from, owner) & (1u64 << (to as u32)) != 0
}

/// Bitmask of territories reachable from `from` through territories owned
/// by `owner`, breadth first. `from` itself is included when owned.
pub fn reachable(territories: &TerritoryMap, from: Territory, owner: &PlayerId) -> u64 {
    if !territories[from].is_owned_by(owner) {
        return 0;
    }
    let mut seen = 1u64 << (from as u32);
    let mut queue = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        for &n in neighbors(current) {
            let bit = 1u64 << (n as u32);
            if seen & bit == 0 && territories[n].is_owned_by(owner) {
                seen |= bit;
                queue.push_back(n);
            }
        }
    }
    seen
}

fn check_turn(state: &GameState, actor: &PlayerId) -> Result<(), MoveError> {
    if state.status != GameStatus::Playing {
        return Err(MoveError::NotPlaying);
    }
    if state.current_player_id.as_ref() != Some(actor) {
        return Err(MoveError::NotYourTurn);
    }
    Ok(())
}

fn expect_phase(state: &GameState, expected: TurnPhase) -> Result<(), MoveError> {
    if state.current_phase != expected {
        return Err(MoveError::WrongPhase { expected, actual: state.current_phase });
    }
    Ok(())
}

fn turn_in_cards(
    state: &GameState,
    actor: &PlayerId,
    ids: &[String],
    now: u64,
    timeout: Duration,
) -> Result<Transition, MoveError> {
    expect_phase(state, TurnPhase::Reinforce)?;
    if ids.len() != SET_SIZE {
        return Err(MoveError::WrongCardCount(ids.len()));
    }
    let player = state.player(actor).ok_or(MoveError::NotYourTurn)?;
    let mut seen = HashSet::new();
    let mut cards: Vec<Card> = Vec::with_capacity(SET_SIZE);
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(MoveError::DuplicateCard(id.clone()));
        }
        let card = player.card(id).ok_or_else(|| MoveError::CardNotHeld(id.clone()))?;
        cards.push(card.clone());
    }
    let symbols: Vec<_> = cards.iter().map(|c| c.symbol).collect();
    if !is_valid_set(&symbols) {
        return Err(MoveError::InvalidCardSet);
    }

    let bonus = set_value(state.card_sets_turned_in);
    let mut t = Transition::new(state, now, timeout);
    t.state.card_sets_turned_in += 1;
    t.state.reinforcements_remaining += bonus;
    if let Some(p) = t.state.player_mut(actor) {
        p.cards_held.retain(|c| !seen.contains(c.id.as_str()));
    }

    let mut territory_bonuses = Vec::new();
    for territory in cards.iter().filter_map(|c| c.territory) {
        if t.state.territories[territory].is_owned_by(actor) {
            t.state.territories[territory].armies += TERRITORY_CARD_BONUS;
            territory_bonuses.push(territory);
        }
    }

    t.emit(
        Some(actor),
        EventKind::CardsTurnedIn { bonus, card_ids: ids.to_vec(), territory_bonuses },
    );
    Ok(t)
}

fn reinforce(
    state: &GameState,
    actor: &PlayerId,
    territory: Territory,
    armies: u32,
    now: u64,
    timeout: Duration,
) -> Result<Transition, MoveError> {
    expect_phase(state, TurnPhase::Reinforce)?;
    if armies < 1 {
        return Err(MoveError::NoArmies);
    }
    if armies > state.reinforcements_remaining {
        return Err(MoveError::NotEnoughReinforcements {
            requested: armies,
            remaining: state.reinforcements_remaining,
        });
    }
    if !state.territories[territory].is_owned_by(actor) {
        return Err(MoveError::NotOwner(territory));
    }

    let mut t = Transition::new(state, now, timeout);
    t.state.territories[territory].armies += armies;
    t.state.reinforcements_remaining -= armies;
    let remaining = t.state.reinforcements_remaining;
    t.emit(Some(actor), EventKind::Reinforced { territory, armies, remaining });

    if remaining == 0 {
        t.state.current_phase = TurnPhase::Attack;
        t.rearm();
    }
    Ok(t)
}

#[allow(clippy::too_many_arguments)]
fn attack(
    state: &GameState,
    actor: &PlayerId,
    from: Territory,
    to: Territory,
    armies: u32,
    now: u64,
    timeout: Duration,
    chance: &mut impl Chance,
) -> Result<Transition, MoveError> {
    expect_phase(state, TurnPhase::Attack)?;
    let source = &state.territories[from];
    let target = &state.territories[to];
    if !source.is_owned_by(actor) {
        return Err(MoveError::NotOwner(from));
    }
    if target.is_owned_by(actor) {
        return Err(MoveError::AttackOwnTerritory(to));
    }
    if !is_adjacent(from, to) {
        return Err(MoveError::NotAdjacent { from, to });
    }
    if source.armies < 2 {
        return Err(MoveError::TooFewToAttack(from));
    }
    if !(1..=MAX_ATTACK_DICE).contains(&armies) {
        return Err(MoveError::InvalidCommitment(armies));
    }
    if armies >= source.armies {
        return Err(MoveError::MustLeaveOneBehind(from));
    }

    let outcome = resolve_combat(armies, target.armies, chance);
    let mut t = Transition::new(state, now, timeout);
    t.state.territories[from].armies -= outcome.attacker_losses;
    let defenders = t.state.territories[to].armies.saturating_sub(outcome.defender_losses);
    t.state.territories[to].armies = defenders;
    t.emit(
        Some(actor),
        EventKind::Attacked {
            from,
            to,
            attacker_armies: armies,
            attacker_dice: outcome.attacker_dice,
            defender_dice: outcome.defender_dice,
            attacker_losses: outcome.attacker_losses,
            defender_losses: outcome.defender_losses,
        },
    );

    if defenders == 0 {
        let previous_owner = target.owner.clone();
        let moving_in = armies - outcome.attacker_losses;
        t.state.territories[to].owner = Some(actor.clone());
        t.state.territories[from].armies -= moving_in;
        t.state.territories[to].armies = moving_in;
        t.state.conquered_this_turn = true;
        t.emit(
            Some(actor),
            EventKind::TerritoryCaptured {
                territory: to,
                from,
                previous_owner: previous_owner.clone(),
                armies_moved: moving_in,
            },
        );

        if let Some(loser) = previous_owner.filter(|p| t.state.territories.count_owned(p) == 0) {
            let transferred = eliminate(&mut t.state, &loser, Some(actor));
            t.emit(
                Some(actor),
                EventKind::PlayerEliminated {
                    eliminated_player_id: loser.clone(),
                    reason: EliminationReason::Conquest,
                    cards_transferred: transferred,
                },
            );
            info!(game = %state.id, player = %loser, by = %actor, cards = transferred, "player eliminated");

            if t.state.alive_count() == 1 {
                end_game(&mut t, actor.clone());
                return Ok(t);
            }
        }
    }

    t.rearm();
    Ok(t)
}

fn end_attack(
    state: &GameState,
    actor: &PlayerId,
    now: u64,
    timeout: Duration,
    chance: &mut impl Chance,
) -> Result<Transition, MoveError> {
    expect_phase(state, TurnPhase::Attack)?;
    let mut t = Transition::new(state, now, timeout);
    if state.conquered_this_turn {
        match draw_card(state.held_card_ids(), chance) {
            Some(card) => {
                debug!(game = %state.id, player = %actor, card = %card.id, "card awarded");
                if let Some(p) = t.state.player_mut(actor) {
                    p.cards_held.push(card);
                }
            }
            None => debug!(game = %state.id, player = %actor, "deck exhausted, no card awarded"),
        }
    }
    t.state.current_phase = TurnPhase::Fortify;
    t.rearm();
    let turn_number = t.state.turn_number;
    t.emit(
        Some(actor),
        EventKind::TurnChanged { turn_number, phase: TurnPhase::Fortify, reinforcements: 0 },
    );
    Ok(t)
}

/// `transfer` is `None` for a skipped fortify.
fn fortify(
    state: &GameState,
    actor: &PlayerId,
    transfer: Option<(Territory, Territory, u32)>,
    now: u64,
    timeout: Duration,
) -> Result<Transition, MoveError> {
    expect_phase(state, TurnPhase::Fortify)?;

    let kind = match transfer {
        None => EventKind::Fortified { from: None, to: None, armies: 0, skipped: true },
        Some((from, to, armies)) => {
            if from == to {
                return Err(MoveError::SameTerritory(from));
            }
            for t in [from, to] {
                if !state.territories[t].is_owned_by(actor) {
                    return Err(MoveError::NotOwner(t));
                }
            }
            if !connected(&state.territories, from, to, actor) {
                return Err(MoveError::NotConnected { from, to });
            }
            let max = state.territories[from].armies.saturating_sub(1);
            if armies < 1 || armies > max {
                return Err(MoveError::InvalidFortifyCount { armies, max });
            }
            EventKind::Fortified { from: Some(from), to: Some(to), armies, skipped: false }
        }
    };

    let mut t = Transition::new(state, now, timeout);
    if let Some((from, to, armies)) = transfer {
        t.state.territories[from].armies -= armies;
        t.state.territories[to].armies += armies;
    }
    t.emit(Some(actor), kind);
    advance_turn(&mut t, actor);
    Ok(t)
}

/// Marks `loser` eliminated and hands their cards to `heir`, or discards
/// them. Returns the number of cards transferred.
fn eliminate(state: &mut GameState, loser: &PlayerId, heir: Option<&PlayerId>) -> usize {
    let cards = match state.player_mut(loser) {
        Some(p) => {
            p.is_eliminated = true;
            std::mem::take(&mut p.cards_held)
        }
        None => return 0,
    };
    match heir.and_then(|h| state.player_mut(h)) {
        Some(h) => {
            let n = cards.len();
            h.cards_held.extend(cards);
            n
        }
        None => 0,
    }
}

/// Passes the turn to the next living seat after `from`.
fn advance_turn(t: &mut Transition, from: &PlayerId) {
    let Some(next) = t.state.next_alive_after(from).cloned() else {
        close_game(t);
        return;
    };
    t.state.current_phase = TurnPhase::Reinforce;
    t.state.turn_number += 1;
    t.state.conquered_this_turn = false;
    t.state.reinforcements_remaining = reinforcements(&t.state.territories, &next);
    t.rearm();
    let (turn_number, reinforcements) = (t.state.turn_number, t.state.reinforcements_remaining);
    t.emit(
        Some(&next),
        EventKind::TurnChanged { turn_number, phase: TurnPhase::Reinforce, reinforcements },
    );
    t.state.current_player_id = Some(next);
}

/// Ends the game in favor of the sole survivor, if there is one.
fn close_game(t: &mut Transition) {
    let survivor = t.state.alive_players().next().map(|p| p.id.clone());
    match survivor {
        Some(winner) => end_game(t, winner),
        None => {
            t.state.status = GameStatus::Finished;
            t.state.current_player_id = None;
            t.state.turn_deadline = None;
        }
    }
}

fn end_game(t: &mut Transition, winner: PlayerId) {
    t.state.status = GameStatus::Finished;
    t.state.winner = Some(winner.clone());
    t.state.current_player_id = None;
    t.state.turn_deadline = None;
    let pot = t.state.pot;
    info!(game = %t.state.id, winner = %winner, turn = t.state.turn_number, "game over");
    t.emit(Some(&winner), EventKind::GameOver { winner: winner.clone(), pot });
}
