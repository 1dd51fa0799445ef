//! JSON move requests.
//!
//! Agents submit moves as a phase-tagged object:
//!
//! ```text
//! {"phase":"reinforce","territory":"peru","armies":3}
//! {"phase":"reinforce","turnInCards":["card_alaska","card_peru","wild_1"]}
//! {"phase":"attack","from":"peru","to":"brazil","armies":3}
//! {"phase":"attack","endAttack":true}
//! {"phase":"fortify","from":"peru","to":"brazil","armies":2}
//! {"phase":"fortify","skip":true}
//! ```
//!
//! A `turnInCards` field takes precedence over the other reinforce fields,
//! and the `endAttack` / `skip` flags override any accompanying transfer.

use serde::{Deserialize, Serialize};

use crate::board::{Move, Territory, TurnPhase};

/// Errors that can occur while decoding a move request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid move JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown territory: '{0}'")]
    UnknownTerritory(String),

    #[error("move is missing 'phase'")]
    MissingPhase,

    #[error("{phase} move is missing '{field}'")]
    MissingField { phase: TurnPhase, field: &'static str },
}

/// The wire form of a move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub phase: Option<TurnPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armies: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_in_cards: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub end_attack: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl MoveRequest {
    /// Converts the request into a typed move, resolving territory ids.
    pub fn to_move(&self) -> Result<Move, RequestError> {
        let phase = self.phase.ok_or(RequestError::MissingPhase)?;
        match phase {
            TurnPhase::Reinforce => {
                if let Some(cards) = &self.turn_in_cards {
                    return Ok(Move::TurnInCards { cards: cards.clone() });
                }
                Ok(Move::Reinforce {
                    territory: self.territory_field(phase, "territory", &self.territory)?,
                    armies: self.armies_field(phase)?,
                })
            }
            TurnPhase::Attack => {
                if self.end_attack {
                    return Ok(Move::EndAttack);
                }
                Ok(Move::Attack {
                    from: self.territory_field(phase, "from", &self.from)?,
                    to: self.territory_field(phase, "to", &self.to)?,
                    armies: self.armies_field(phase)?,
                })
            }
            TurnPhase::Fortify => {
                if self.skip {
                    return Ok(Move::SkipFortify);
                }
                Ok(Move::Fortify {
                    from: self.territory_field(phase, "from", &self.from)?,
                    to: self.territory_field(phase, "to", &self.to)?,
                    armies: self.armies_field(phase)?,
                })
            }
        }
    }

    fn territory_field(
        &self,
        phase: TurnPhase,
        field: &'static str,
        value: &Option<String>,
    ) -> Result<Territory, RequestError> {
        let id = value.as_deref().ok_or(RequestError::MissingField { phase, field })?;
        Territory::from_id(id).ok_or_else(|| RequestError::UnknownTerritory(id.to_string()))
    }

    fn armies_field(&self, phase: TurnPhase) -> Result<u32, RequestError> {
        self.armies.ok_or(RequestError::MissingField { phase, field: "armies" })
    }
}

impl From<&Move> for MoveRequest {
    fn from(mv: &Move) -> Self {
        let mut req = MoveRequest { phase: Some(mv.phase()), ..Default::default() };
        match mv {
            Move::TurnInCards { cards } => req.turn_in_cards = Some(cards.clone()),
            Move::Reinforce { territory, armies } => {
                req.territory = Some(territory.id().to_string());
                req.armies = Some(*armies);
            }
            Move::Attack { from, to, armies } | Move::Fortify { from, to, armies } => {
                req.from = Some(from.id().to_string());
                req.to = Some(to.id().to_string());
                req.armies = Some(*armies);
            }
            Move::EndAttack => req.end_attack = true,
            Move::SkipFortify => req.skip = true,
        }
        req
    }
}

/// Parses a JSON move request into a typed move.
pub fn parse_move(json: &str) -> Result<Move, RequestError> {
    let req: MoveRequest = serde_json::from_str(json)?;
    req.to_move()
}

/// Formats a move as its JSON wire form.
pub fn format_move(mv: &Move) -> String {
    // A struct of strings, integers and booleans always serializes.
    serde_json::to_string(&MoveRequest::from(mv)).unwrap_or_default()
}
