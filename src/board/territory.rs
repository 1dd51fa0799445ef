//! Territory and continent definitions for the classic 42-territory board.
//!
//! Territories are enumerated in board order (continent by continent).
//! Territory metadata (id, display name, continent, layout coordinates) is
//! stored in a compile-time lookup table indexed by the `Territory` enum
//! discriminant.

use serde::{Deserialize, Serialize};

/// The number of territories on the board.
pub const TERRITORY_COUNT: usize = 42;

/// The number of continents on the board.
pub const CONTINENT_COUNT: usize = 6;

/// A territory on the board.
///
/// The `#[repr(u8)]` attribute enables use as an array index. Serialized as
/// its snake_case id (`western_united_states`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Territory {
    // North America
    Alaska = 0,
    NorthwestTerritory = 1,
    Greenland = 2,
    Alberta = 3,
    Ontario = 4,
    Quebec = 5,
    WesternUnitedStates = 6,
    EasternUnitedStates = 7,
    CentralAmerica = 8,
    // South America
    Venezuela = 9,
    Peru = 10,
    Brazil = 11,
    Argentina = 12,
    // Europe
    Iceland = 13,
    GreatBritain = 14,
    Scandinavia = 15,
    NorthernEurope = 16,
    WesternEurope = 17,
    SouthernEurope = 18,
    Ukraine = 19,
    // Africa
    NorthAfrica = 20,
    Egypt = 21,
    CentralAfrica = 22,
    EastAfrica = 23,
    SouthAfrica = 24,
    Madagascar = 25,
    // Asia
    Ural = 26,
    Siberia = 27,
    Yakutsk = 28,
    Kamchatka = 29,
    Irkutsk = 30,
    Mongolia = 31,
    Japan = 32,
    Afghanistan = 33,
    China = 34,
    MiddleEast = 35,
    India = 36,
    Siam = 37,
    // Australia
    Indonesia = 38,
    NewGuinea = 39,
    WesternAustralia = 40,
    EasternAustralia = 41,
}

use Territory::*;

/// All territory variants in index order.
pub const ALL_TERRITORIES: [Territory; TERRITORY_COUNT] = [
    Alaska, NorthwestTerritory, Greenland, Alberta, Ontario, Quebec,
    WesternUnitedStates, EasternUnitedStates, CentralAmerica,
    Venezuela, Peru, Brazil, Argentina,
    Iceland, GreatBritain, Scandinavia, NorthernEurope, WesternEurope,
    SouthernEurope, Ukraine,
    NorthAfrica, Egypt, CentralAfrica, EastAfrica, SouthAfrica, Madagascar,
    Ural, Siberia, Yakutsk, Kamchatka, Irkutsk, Mongolia, Japan, Afghanistan,
    China, MiddleEast, India, Siam,
    Indonesia, NewGuinea, WesternAustralia, EasternAustralia,
];

impl Territory {
    /// Returns the snake_case id used on the wire.
    pub const fn id(self) -> &'static str {
        TERRITORY_INFO[self as usize].id
    }

    /// Returns the display name.
    pub const fn name(self) -> &'static str {
        TERRITORY_INFO[self as usize].name
    }

    /// Returns the continent this territory belongs to.
    pub const fn continent(self) -> Continent {
        TERRITORY_INFO[self as usize].continent
    }

    /// Returns the layout coordinates. Rendering only; no rule reads them.
    pub const fn coords(self) -> (u16, u16) {
        let info = &TERRITORY_INFO[self as usize];
        (info.x, info.y)
    }

    /// Looks up a territory by its wire id.
    pub fn from_id(id: &str) -> Option<Territory> {
        ALL_TERRITORIES.iter().copied().find(|t| t.id() == id)
    }
}

impl std::fmt::Display for Territory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One of the six continents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continent {
    NorthAmerica,
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Australia,
}

/// All continents in board order.
pub const ALL_CONTINENTS: [Continent; CONTINENT_COUNT] = [
    Continent::NorthAmerica,
    Continent::SouthAmerica,
    Continent::Europe,
    Continent::Africa,
    Continent::Asia,
    Continent::Australia,
];

impl Continent {
    /// Extra reinforcements for holding every member territory.
    pub const fn bonus(self) -> u32 {
        match self {
            Continent::NorthAmerica => 5,
            Continent::SouthAmerica => 2,
            Continent::Europe => 5,
            Continent::Africa => 3,
            Continent::Asia => 7,
            Continent::Australia => 2,
        }
    }

    /// Returns the snake_case id used on the wire.
    pub const fn id(self) -> &'static str {
        match self {
            Continent::NorthAmerica => "north_america",
            Continent::SouthAmerica => "south_america",
            Continent::Europe => "europe",
            Continent::Africa => "africa",
            Continent::Asia => "asia",
            Continent::Australia => "australia",
        }
    }

    /// Member territories. Members are contiguous in board order.
    pub fn territories(self) -> &'static [Territory] {
        let (start, end) = match self {
            Continent::NorthAmerica => (0, 9),
            Continent::SouthAmerica => (9, 13),
            Continent::Europe => (13, 20),
            Continent::Africa => (20, 26),
            Continent::Asia => (26, 38),
            Continent::Australia => (38, 42),
        };
        &ALL_TERRITORIES[start..end]
    }
}

/// Static metadata for a single territory.
#[derive(Debug, Clone, Copy)]
pub struct TerritoryInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub continent: Continent,
    pub x: u16,
    pub y: u16,
}

const fn info(id: &'static str, name: &'static str, continent: Continent, x: u16, y: u16) -> TerritoryInfo {
    TerritoryInfo { id, name, continent, x, y }
}

use Continent::{Africa as AF, Asia as AS, Australia as AU, Europe as EU, NorthAmerica as NA, SouthAmerica as SA};

/// Territory metadata, indexed by `Territory as usize`.
pub static TERRITORY_INFO: [TerritoryInfo; TERRITORY_COUNT] = [
    info("alaska", "Alaska", NA, 60, 80),
    info("northwest_territory", "Northwest Territory", NA, 140, 80),
    info("greenland", "Greenland", NA, 300, 40),
    info("alberta", "Alberta", NA, 130, 130),
    info("ontario", "Ontario", NA, 200, 130),
    info("quebec", "Quebec", NA, 270, 130),
    info("western_united_states", "Western United States", NA, 140, 190),
    info("eastern_united_states", "Eastern United States", NA, 220, 190),
    info("central_america", "Central America", NA, 170, 250),
    info("venezuela", "Venezuela", SA, 220, 310),
    info("peru", "Peru", SA, 210, 380),
    info("brazil", "Brazil", SA, 280, 370),
    info("argentina", "Argentina", SA, 230, 450),
    info("iceland", "Iceland", EU, 390, 70),
    info("great_britain", "Great Britain", EU, 390, 140),
    info("scandinavia", "Scandinavia", EU, 460, 90),
    info("northern_europe", "Northern Europe", EU, 450, 160),
    info("western_europe", "Western Europe", EU, 410, 210),
    info("southern_europe", "Southern Europe", EU, 460, 210),
    info("ukraine", "Ukraine", EU, 520, 150),
    info("north_africa", "North Africa", AF, 430, 300),
    info("egypt", "Egypt", AF, 500, 280),
    info("central_africa", "Central Africa", AF, 480, 370),
    info("east_africa", "East Africa", AF, 530, 340),
    info("south_africa", "South Africa", AF, 490, 430),
    info("madagascar", "Madagascar", AF, 570, 420),
    info("ural", "Ural", AS, 600, 120),
    info("siberia", "Siberia", AS, 660, 100),
    info("yakutsk", "Yakutsk", AS, 730, 80),
    info("kamchatka", "Kamchatka", AS, 800, 90),
    info("irkutsk", "Irkutsk", AS, 720, 140),
    info("mongolia", "Mongolia", AS, 740, 190),
    info("japan", "Japan", AS, 820, 180),
    info("afghanistan", "Afghanistan", AS, 600, 200),
    info("china", "China", AS, 680, 230),
    info("middle_east", "Middle East", AS, 560, 260),
    info("india", "India", AS, 640, 290),
    info("siam", "Siam", AS, 710, 300),
    info("indonesia", "Indonesia", AU, 730, 380),
    info("new_guinea", "New Guinea", AU, 790, 370),
    info("western_australia", "Western Australia", AU, 760, 440),
    info("eastern_australia", "Eastern Australia", AU, 820, 440),
];
