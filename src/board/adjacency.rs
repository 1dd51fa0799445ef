//! Adjacency graph for the classic board.
//!
//! Each territory lists its neighbors in a compile-time table. The table is
//! symmetric: if A lists B then B lists A. A `u64` bitmask per territory is
//! derived from the table at compile time for O(1) adjacency tests.

use super::territory::{Territory, TERRITORY_COUNT};

use Territory::*;

/// Neighbor lists, indexed by `Territory as usize`.
pub static NEIGHBORS: [&[Territory]; TERRITORY_COUNT] = NEIGHBOR_TABLE;

const NEIGHBOR_TABLE: [&[Territory]; TERRITORY_COUNT] = [
    // North America
    &[NorthwestTerritory, Alberta, Kamchatka],
    &[Alaska, Alberta, Ontario, Greenland],
    &[NorthwestTerritory, Ontario, Quebec, Iceland],
    &[Alaska, NorthwestTerritory, Ontario, WesternUnitedStates],
    &[NorthwestTerritory, Greenland, Alberta, Quebec, WesternUnitedStates, EasternUnitedStates],
    &[Greenland, Ontario, EasternUnitedStates],
    &[Alberta, Ontario, EasternUnitedStates, CentralAmerica],
    &[Ontario, Quebec, WesternUnitedStates, CentralAmerica],
    &[WesternUnitedStates, EasternUnitedStates, Venezuela],
    // South America
    &[CentralAmerica, Peru, Brazil],
    &[Venezuela, Brazil, Argentina],
    &[Venezuela, Peru, Argentina, NorthAfrica],
    &[Peru, Brazil],
    // Europe
    &[Greenland, GreatBritain, Scandinavia],
    &[Iceland, Scandinavia, NorthernEurope, WesternEurope],
    &[Iceland, GreatBritain, NorthernEurope, Ukraine],
    &[GreatBritain, Scandinavia, WesternEurope, SouthernEurope, Ukraine],
    &[GreatBritain, NorthernEurope, SouthernEurope, NorthAfrica],
    &[NorthernEurope, WesternEurope, Ukraine, MiddleEast, Egypt, NorthAfrica],
    &[Scandinavia, NorthernEurope, SouthernEurope, Ural, Afghanistan, MiddleEast],
    // Africa
    &[Brazil, WesternEurope, SouthernEurope, Egypt, EastAfrica, CentralAfrica],
    &[SouthernEurope, NorthAfrica, MiddleEast, EastAfrica],
    &[NorthAfrica, EastAfrica, SouthAfrica],
    &[NorthAfrica, Egypt, MiddleEast, CentralAfrica, SouthAfrica, Madagascar],
    &[CentralAfrica, EastAfrica, Madagascar],
    &[EastAfrica, SouthAfrica],
    // Asia
    &[Ukraine, Siberia, Afghanistan, China],
    &[Ural, Yakutsk, Irkutsk, Mongolia, China],
    &[Siberia, Kamchatka, Irkutsk],
    &[Yakutsk, Irkutsk, Mongolia, Japan, Alaska],
    &[Siberia, Yakutsk, Kamchatka, Mongolia],
    &[Siberia, Kamchatka, Irkutsk, China, Japan],
    &[Kamchatka, Mongolia],
    &[Ukraine, Ural, China, India, MiddleEast],
    &[Ural, Siberia, Mongolia, Afghanistan, India, Siam],
    &[Ukraine, SouthernEurope, Egypt, EastAfrica, Afghanistan, India],
    &[Afghanistan, China, MiddleEast, Siam],
    &[China, India, Indonesia],
    // Australia
    &[Siam, NewGuinea, WesternAustralia],
    &[Indonesia, WesternAustralia, EasternAustralia],
    &[Indonesia, NewGuinea, EasternAustralia],
    &[NewGuinea, WesternAustralia],
];

/// Neighbor bitmask per territory: bit `b` set means territory `b` is adjacent.
pub static ADJACENCY_MASKS: [u64; TERRITORY_COUNT] = build_masks();

const fn build_masks() -> [u64; TERRITORY_COUNT] {
    let mut masks = [0u64; TERRITORY_COUNT];
    let mut i = 0;
    while i < TERRITORY_COUNT {
        let list = NEIGHBOR_TABLE[i];
        let mut j = 0;
        while j < list.len() {
            masks[i] |= 1u64 << (list[j] as u32);
            j += 1;
        }
        i += 1;
    }
    masks
}

/// Returns the neighbors of a territory in table order.
pub fn neighbors(t: Territory) -> &'static [Territory] {
    NEIGHBORS[t as usize]
}

/// Returns true if the two territories share a border.
#[inline]
pub fn is_adjacent(a: Territory, b: Territory) -> bool {
    ADJACENCY_MASKS[a as usize] & (1u64 << (b as u32)) != 0
}

/// Total number of undirected borders on the board.
pub fn border_count() -> usize {
    ADJACENCY_MASKS.iter().map(|m| m.count_ones() as usize).sum::<usize>() / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::territory::ALL_TERRITORIES;

    #[test]
    fn adjacency_is_symmetric() {
        for &a in ALL_TERRITORIES.iter() {
            for &b in neighbors(a) {
                assert!(
                    neighbors(b).contains(&a),
                    "{} lists {} but not the reverse",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn no_self_loops_or_duplicates() {
        for &a in ALL_TERRITORIES.iter() {
            assert!(!is_adjacent(a, a), "{} is adjacent to itself", a);
            let list = neighbors(a);
            assert_eq!(
                ADJACENCY_MASKS[a as usize].count_ones() as usize,
                list.len(),
                "{} has a duplicate neighbor",
                a
            );
        }
    }

    #[test]
    fn mask_matches_lists() {
        for &a in ALL_TERRITORIES.iter() {
            for &b in ALL_TERRITORIES.iter() {
                assert_eq!(is_adjacent(a, b), neighbors(a).contains(&b));
            }
        }
    }

    #[test]
    fn known_adjacencies_sample() {
        // Bering strait and the two Atlantic crossings.
        assert!(is_adjacent(Territory::Alaska, Territory::Kamchatka));
        assert!(is_adjacent(Territory::Greenland, Territory::Iceland));
        assert!(is_adjacent(Territory::Brazil, Territory::NorthAfrica));
        assert!(is_adjacent(Territory::Siam, Territory::Indonesia));

        assert!(!is_adjacent(Territory::Alaska, Territory::Greenland));
        assert!(!is_adjacent(Territory::Argentina, Territory::SouthAfrica));
        assert!(!is_adjacent(Territory::Japan, Territory::China));
    }

    #[test]
    fn border_count_is_83() {
        assert_eq!(border_count(), 83);
    }
}
