//! Dice combat for one attack round.
//!
//! The attacker rolls one die per committed army (at most three), the
//! defender one per army on the territory (at most two). Highest dice are
//! compared pairwise; the defender wins ties.

use serde::{Deserialize, Serialize};

use crate::chance::Chance;

/// Maximum dice the attacker may roll.
pub const MAX_ATTACK_DICE: u32 = 3;

/// Maximum dice the defender may roll.
pub const MAX_DEFENSE_DICE: u32 = 2;

/// The result of one combat round, with both dice sequences for replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    pub attacker_losses: u32,
    pub defender_losses: u32,
    /// Sorted descending.
    pub attacker_dice: Vec<u8>,
    /// Sorted descending.
    pub defender_dice: Vec<u8>,
}

/// Rolls `n` dice and returns them sorted descending.
pub fn roll_dice(n: u32, chance: &mut impl Chance) -> Vec<u8> {
    let mut dice: Vec<u8> = (0..n).map(|_| chance.roll_die()).collect();
    dice.sort_unstable_by(|a, b| b.cmp(a));
    dice
}

/// Compares two descending dice sequences and returns
/// `(attacker_losses, defender_losses)`.
///
/// Only the first `min(len, len)` positions are compared. The attacker wins
/// a comparison only with a strictly higher die.
pub fn compare_dice(attacker: &[u8], defender: &[u8]) -> (u32, u32) {
    attacker
        .iter()
        .zip(defender.iter())
        .fold((0, 0), |(att, def), (a, d)| if a > d { (att, def + 1) } else { (att + 1, def) })
}

/// Resolves one round: `commitment` attacking armies against
/// `defender_armies` on the target territory.
pub fn resolve_combat(commitment: u32, defender_armies: u32, chance: &mut impl Chance) -> AttackOutcome {
    let attacker_dice = roll_dice(commitment.min(MAX_ATTACK_DICE), chance);
    let defender_dice = roll_dice(defender_armies.min(MAX_DEFENSE_DICE), chance);
    let (attacker_losses, defender_losses) = compare_dice(&attacker_dice, &defender_dice);
    AttackOutcome {
        attacker_losses,
        defender_losses,
        attacker_dice,
        defender_dice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::LoadedDice;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn loaded(faces: &[u8]) -> LoadedDice<SmallRng> {
        let mut dice = LoadedDice::new(SmallRng::seed_from_u64(0));
        dice.load(faces);
        dice
    }

    #[test]
    fn ties_go_to_the_defender() {
        assert_eq!(compare_dice(&[4], &[4]), (1, 0));
        assert_eq!(compare_dice(&[6, 3], &[6, 3]), (2, 0));
    }

    #[test]
    fn strict_win_kills_a_defender() {
        assert_eq!(compare_dice(&[5], &[4]), (0, 1));
        assert_eq!(compare_dice(&[6, 5, 1], &[5, 5]), (1, 1));
    }

    #[test]
    fn extra_attacker_dice_are_not_compared() {
        // Third attacker die never meets a defender die.
        assert_eq!(compare_dice(&[6, 6, 1], &[2]), (0, 1));
    }

    #[test]
    fn dice_are_sorted_descending() {
        let mut dice = loaded(&[2, 6, 4]);
        assert_eq!(roll_dice(3, &mut dice), vec![6, 4, 2]);
    }

    #[test]
    fn three_against_two() {
        // Attacker rolls 1, 5, 3 -> [5, 3, 1]; defender rolls 4, 3 -> [4, 3].
        let mut dice = loaded(&[1, 5, 3, 4, 3]);
        let outcome = resolve_combat(3, 5, &mut dice);
        assert_eq!(outcome.attacker_dice, vec![5, 3, 1]);
        assert_eq!(outcome.defender_dice, vec![4, 3]);
        assert_eq!(outcome.defender_losses, 1);
        assert_eq!(outcome.attacker_losses, 1);
    }

    #[test]
    fn lone_defender_rolls_one_die() {
        let mut dice = loaded(&[6, 6, 6, 5]);
        let outcome = resolve_combat(3, 1, &mut dice);
        assert_eq!(outcome.defender_dice, vec![5]);
        assert_eq!(outcome.defender_losses, 1);
        assert_eq!(outcome.attacker_losses, 0);
    }

    #[test]
    fn commitment_above_three_rolls_three() {
        let mut rng = SmallRng::seed_from_u64(9);
        let outcome = resolve_combat(7, 9, &mut rng);
        assert_eq!(outcome.attacker_dice.len(), 3);
        assert_eq!(outcome.defender_dice.len(), 2);
    }

    proptest! {
        #[test]
        fn losses_sum_to_comparisons(commitment in 1u32..=3, defenders in 1u32..=10, seed in any::<u64>()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let outcome = resolve_combat(commitment, defenders, &mut rng);
            let expected = commitment.min(MAX_ATTACK_DICE).min(defenders.min(MAX_DEFENSE_DICE));
            prop_assert_eq!(outcome.attacker_losses + outcome.defender_losses, expected);
        }

        #[test]
        fn defender_wins_every_tie(faces in proptest::collection::vec(1u8..=6, 1..=2)) {
            let mut desc = faces.clone();
            desc.sort_unstable_by(|a, b| b.cmp(a));
            let (att, def) = compare_dice(&desc, &desc);
            prop_assert_eq!(att as usize, desc.len());
            prop_assert_eq!(def, 0);
        }
    }
}
