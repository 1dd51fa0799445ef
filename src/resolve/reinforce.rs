//! Reinforcement income.

use crate::board::{Continent, PlayerId, TerritoryMap, ALL_CONTINENTS};

/// Minimum reinforcements per turn regardless of holdings.
pub const MIN_REINFORCEMENTS: u32 = 3;

/// Territories needed per army of territory income.
pub const TERRITORIES_PER_ARMY: u32 = 3;

/// Continents in which `player` owns every member territory.
pub fn controlled_continents<'a>(
    territories: &'a TerritoryMap,
    player: &'a PlayerId,
) -> impl Iterator<Item = Continent> + 'a {
    ALL_CONTINENTS.into_iter().filter(move |c| {
        c.territories()
            .iter()
            .all(|&t| territories[t].is_owned_by(player))
    })
}

/// Army income at the start of `player`'s reinforce phase:
/// `max(3, owned / 3)` plus every fully held continent's bonus.
pub fn reinforcements(territories: &TerritoryMap, player: &PlayerId) -> u32 {
    let owned = territories.count_owned(player) as u32;
    let base = (owned / TERRITORIES_PER_ARMY).max(MIN_REINFORCEMENTS);
    let bonus: u32 = controlled_continents(territories, player).map(Continent::bonus).sum();
    base + bonus
}
