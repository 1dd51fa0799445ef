//! Card economy: deck, set validation, trade-in values and capture awards.

use std::collections::HashSet;

use crate::board::{Card, CardSymbol, ALL_TERRITORIES, ARMY_SYMBOLS};
use crate::chance::Chance;

/// Cards in a tradeable set.
pub const SET_SIZE: usize = 3;

/// Wild cards in the deck.
pub const WILD_CARDS: usize = 2;

/// Extra armies placed on a traded card's territory when the trader owns it.
pub const TERRITORY_CARD_BONUS: u32 = 2;

/// Trade-in values for the first sets; later sets add `LATE_SET_STEP` each.
const SET_VALUES: [u32; 6] = [4, 6, 8, 10, 12, 15];
const LATE_SET_STEP: u32 = 5;

/// Builds the full deck in board order: one card per territory with symbols
/// rotating infantry, cavalry, artillery, then the wild cards.
pub fn build_deck() -> Vec<Card> {
    let mut deck: Vec<Card> = ALL_TERRITORIES
        .iter()
        .enumerate()
        .map(|(i, &t)| Card::for_territory(t, ARMY_SYMBOLS[i % ARMY_SYMBOLS.len()]))
        .collect();
    deck.extend((1..=WILD_CARDS).map(Card::wild));
    deck
}

/// Armies granted for a set when `sets_turned_in` sets were traded before it.
pub fn set_value(sets_turned_in: u32) -> u32 {
    match SET_VALUES.get(sets_turned_in as usize) {
        Some(&v) => v,
        None => {
            let last = SET_VALUES[SET_VALUES.len() - 1];
            let extra = sets_turned_in - (SET_VALUES.len() as u32 - 1);
            last.saturating_add(extra.saturating_mul(LATE_SET_STEP))
        }
    }
}

/// Returns true if the symbols form a tradeable set: three cards that are
/// all the same army symbol, all different army symbols, or include a wild.
pub fn is_valid_set(symbols: &[CardSymbol]) -> bool {
    if symbols.len() != SET_SIZE {
        return false;
    }
    if symbols.iter().any(|s| s.is_wild()) {
        return true;
    }
    let distinct: HashSet<CardSymbol> = symbols.iter().copied().collect();
    distinct.len() == 1 || distinct.len() == SET_SIZE
}

/// Draws one card uniformly from a freshly shuffled deck, skipping cards
/// whose ids appear in `held`. Returns `None` if every card is held.
pub fn draw_card<'a>(held: impl IntoIterator<Item = &'a str>, chance: &mut impl Chance) -> Option<Card> {
    let held: HashSet<&str> = held.into_iter().collect();
    let mut deck: Vec<Card> = build_deck().into_iter().filter(|c| !held.contains(c.id.as_str())).collect();
    if deck.is_empty() {
        return None;
    }
    chance.shuffle(&mut deck);
    let idx = chance.pick(deck.len());
    Some(deck.swap_remove(idx))
}

/// Finds a valid set among `cards`, if any, preferring sets without wilds.
pub fn find_set(cards: &[Card]) -> Option<[usize; SET_SIZE]> {
    let n = cards.len();
    let mut with_wild = None;
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let symbols = [cards[i].symbol, cards[j].symbol, cards[k].symbol];
                if !is_valid_set(&symbols) {
                    continue;
                }
                if symbols.iter().any(|s| s.is_wild()) {
                    with_wild.get_or_insert([i, j, k]);
                } else {
                    return Some([i, j, k]);
                }
            }
        }
    }
    with_wild
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Territory;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use CardSymbol::{Artillery as A, Cavalry as C, Infantry as I, Wild as W};

    #[test]
    fn deck_has_44_unique_cards() {
        let deck = build_deck();
        assert_eq!(deck.len(), 44);
        let ids: HashSet<&str> = deck.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 44);
        assert_eq!(deck.iter().filter(|c| c.symbol.is_wild()).count(), 2);
        assert!(deck.iter().all(|c| c.symbol.is_wild() == c.territory.is_none()));
    }

    #[test]
    fn deck_symbols_rotate_by_board_order() {
        let deck = build_deck();
        assert_eq!(deck[0].territory, Some(Territory::Alaska));
        assert_eq!(deck[0].symbol, I);
        assert_eq!(deck[1].symbol, C);
        assert_eq!(deck[2].symbol, A);
        assert_eq!(deck[3].symbol, I);
        for sym in ARMY_SYMBOLS {
            assert_eq!(deck.iter().filter(|c| c.symbol == sym).count(), 14);
        }
    }

    #[test]
    fn escalating_values() {
        let values: Vec<u32> = (0..9).map(set_value).collect();
        assert_eq!(values, vec![4, 6, 8, 10, 12, 15, 20, 25, 30]);
    }

    #[test]
    fn valid_sets() {
        assert!(is_valid_set(&[I, I, I]));
        assert!(is_valid_set(&[A, A, A]));
        assert!(is_valid_set(&[I, C, A]));
        assert!(is_valid_set(&[I, I, W]));
        assert!(is_valid_set(&[I, C, W]));
        assert!(is_valid_set(&[W, W, A]));
    }

    #[test]
    fn invalid_sets() {
        assert!(!is_valid_set(&[I, I, C]));
        assert!(!is_valid_set(&[A, C, C]));
        assert!(!is_valid_set(&[I, C]));
        assert!(!is_valid_set(&[I, C, A, W]));
    }

    #[test]
    fn draw_skips_held_cards() {
        let deck = build_deck();
        let held: Vec<&str> = deck.iter().skip(1).map(|c| c.id.as_str()).collect();
        let mut rng = SmallRng::seed_from_u64(3);
        let card = draw_card(held, &mut rng).unwrap();
        assert_eq!(card.id, "card_alaska");
    }

    #[test]
    fn draw_from_exhausted_deck() {
        let deck = build_deck();
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(draw_card(deck.iter().map(|c| c.id.as_str()), &mut rng), None);
    }

    #[test]
    fn find_set_prefers_natural_sets() {
        let deck = build_deck();
        // Alaska (I), Wild, Alberta (I), Greenland (A): only wild sets exist.
        let hand = vec![deck[0].clone(), deck[42].clone(), deck[3].clone(), deck[2].clone()];
        assert_eq!(find_set(&hand), Some([0, 1, 2]));
        let natural = vec![deck[0].clone(), deck[1].clone(), deck[3].clone(), deck[2].clone()];
        // I, C, I, A -> first natural set found is (0, 1, 3) = I, C, A.
        assert_eq!(find_set(&natural), Some([0, 1, 3]));
    }

    #[test]
    fn find_set_none_for_pairs() {
        let deck = build_deck();
        let hand = vec![deck[0].clone(), deck[3].clone(), deck[1].clone(), deck[4].clone()];
        // I, I, C, C: no valid triple.
        assert_eq!(find_set(&hand), None);
    }
}
