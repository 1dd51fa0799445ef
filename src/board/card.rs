//! Territory cards.
//!
//! One card per territory carries an army-type symbol; two wild cards carry
//! no territory and match any symbol.

use serde::{Deserialize, Serialize};

use super::territory::Territory;

/// The symbol printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSymbol {
    Infantry,
    Cavalry,
    Artillery,
    Wild,
}

/// The three army symbols in deck rotation order.
pub const ARMY_SYMBOLS: [CardSymbol; 3] = [CardSymbol::Infantry, CardSymbol::Cavalry, CardSymbol::Artillery];

impl CardSymbol {
    pub const fn is_wild(self) -> bool {
        matches!(self, CardSymbol::Wild)
    }
}

/// A single card. `territory` is `None` only for wild cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub symbol: CardSymbol,
    pub territory: Option<Territory>,
}

impl Card {
    /// Creates the card for a territory.
    pub fn for_territory(territory: Territory, symbol: CardSymbol) -> Self {
        Card {
            id: format!("card_{}", territory.id()),
            symbol,
            territory: Some(territory),
        }
    }

    /// Creates the `n`th wild card (1-based).
    pub fn wild(n: usize) -> Self {
        Card {
            id: format!("wild_{}", n),
            symbol: CardSymbol::Wild,
            territory: None,
        }
    }
}
