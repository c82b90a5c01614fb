//! Fantasy football positions and lineup slots.

use crate::error::InsightsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fantasy football player positions.
///
/// Only the positions that score fantasy points are modelled; IDP positions
/// are not supported.
///
/// # Examples
///
/// ```rust
/// use fantasy_insights::Position;
///
/// let qb: Position = "qb".parse().unwrap();
/// assert_eq!(qb, Position::QB);
/// assert_eq!(Position::DEF.to_string(), "D/ST");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::DEF,
    ];

    /// Convert an ESPN `defaultPositionId` to a Position.
    pub fn from_espn_id(id: u8) -> Result<Self, InsightsError> {
        match id {
            0 | 1 => Ok(Position::QB), // ESPN uses both 0 and 1 for QB
            2 => Ok(Position::RB),
            3 => Ok(Position::WR),
            4 | 6 => Ok(Position::TE),
            5 | 17 => Ok(Position::K),
            16 => Ok(Position::DEF),
            _ => Err(InsightsError::InvalidPosition {
                position: id.to_string(),
            }),
        }
    }

    /// Points a player must average weekly to rate 100.
    pub fn elite_threshold(&self) -> f64 {
        match self {
            Position::QB => 24.0,
            Position::RB => 18.0,
            Position::WR => 18.0,
            Position::TE => 14.0,
            Position::K => 11.0,
            Position::DEF => 11.0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "D/ST",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Position {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "K" | "PK" => Ok(Position::K),
            "DEF" | "D/ST" | "DST" => Ok(Position::DEF),
            other => Err(InsightsError::InvalidPosition {
                position: other.to_string(),
            }),
        }
    }
}

/// A slot in a league's lineup template.
///
/// Platforms spell these differently (`SUPER_FLEX`, `Q/W/R/T`, ESPN slot 7);
/// `FromStr` and [`LineupSlot::from_espn_id`] fold them into one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineupSlot {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
    /// RB/WR/TE
    FLEX,
    /// QB/RB/WR/TE
    SuperFlex,
    /// WR/TE
    WrTe,
    /// WR/RB
    WrRb,
    Bench,
    IR,
}

impl LineupSlot {
    /// Whether a player at `position` may fill this slot.
    pub fn eligible(&self, position: Position) -> bool {
        use Position as P;
        match self {
            LineupSlot::QB => position == P::QB,
            LineupSlot::RB => position == P::RB,
            LineupSlot::WR => position == P::WR,
            LineupSlot::TE => position == P::TE,
            LineupSlot::K => position == P::K,
            LineupSlot::DEF => position == P::DEF,
            LineupSlot::FLEX => matches!(position, P::RB | P::WR | P::TE),
            LineupSlot::SuperFlex => matches!(position, P::QB | P::RB | P::WR | P::TE),
            LineupSlot::WrTe => matches!(position, P::WR | P::TE),
            LineupSlot::WrRb => matches!(position, P::WR | P::RB),
            LineupSlot::Bench | LineupSlot::IR => true,
        }
    }

    /// Bench and IR do not score.
    pub fn is_starting(&self) -> bool {
        !matches!(self, LineupSlot::Bench | LineupSlot::IR)
    }

    /// The single position a dedicated slot takes, `None` for flex, bench and IR.
    pub fn dedicated_position(&self) -> Option<Position> {
        match self {
            LineupSlot::QB => Some(Position::QB),
            LineupSlot::RB => Some(Position::RB),
            LineupSlot::WR => Some(Position::WR),
            LineupSlot::TE => Some(Position::TE),
            LineupSlot::K => Some(Position::K),
            LineupSlot::DEF => Some(Position::DEF),
            _ => None,
        }
    }

    /// Positions eligible for this slot.
    pub fn eligible_positions(&self) -> Vec<Position> {
        Position::ALL
            .into_iter()
            .filter(|p| self.eligible(*p))
            .collect()
    }

    /// Flex slots are filled narrowest first so that wide slots keep the most options.
    pub fn flex_rank(&self) -> u8 {
        match self {
            LineupSlot::WrTe | LineupSlot::WrRb => 0,
            LineupSlot::FLEX => 1,
            LineupSlot::SuperFlex => 2,
            _ => 3,
        }
    }

    /// Convert an ESPN `lineupSlotId` (also the keys of `lineupSlotCounts`).
    pub fn from_espn_id(id: u8) -> Result<Self, InsightsError> {
        match id {
            0 | 1 => Ok(LineupSlot::QB),
            2 => Ok(LineupSlot::RB),
            3 => Ok(LineupSlot::WrRb),
            4 => Ok(LineupSlot::WR),
            5 => Ok(LineupSlot::WrTe),
            6 => Ok(LineupSlot::TE),
            7 => Ok(LineupSlot::SuperFlex),
            16 => Ok(LineupSlot::DEF),
            17 => Ok(LineupSlot::K),
            20 => Ok(LineupSlot::Bench),
            21 => Ok(LineupSlot::IR),
            23 => Ok(LineupSlot::FLEX),
            _ => Err(InsightsError::InvalidSlot {
                slot: id.to_string(),
            }),
        }
    }
}

impl fmt::Display for LineupSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineupSlot::QB => "QB",
            LineupSlot::RB => "RB",
            LineupSlot::WR => "WR",
            LineupSlot::TE => "TE",
            LineupSlot::K => "K",
            LineupSlot::DEF => "D/ST",
            LineupSlot::FLEX => "FLEX",
            LineupSlot::SuperFlex => "SUPER_FLEX",
            LineupSlot::WrTe => "WR/TE",
            LineupSlot::WrRb => "WR/RB",
            LineupSlot::Bench => "BN",
            LineupSlot::IR => "IR",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for LineupSlot {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Ok(LineupSlot::QB),
            "RB" => Ok(LineupSlot::RB),
            "WR" => Ok(LineupSlot::WR),
            "TE" => Ok(LineupSlot::TE),
            "K" | "PK" => Ok(LineupSlot::K),
            "DEF" | "D/ST" | "DST" => Ok(LineupSlot::DEF),
            "FLEX" | "W/R/T" | "RB/WR/TE" => Ok(LineupSlot::FLEX),
            "SUPER_FLEX" | "SUPERFLEX" | "Q/W/R/T" | "OP" => Ok(LineupSlot::SuperFlex),
            "REC_FLEX" | "W/T" | "WR/TE" => Ok(LineupSlot::WrTe),
            "WRRB_FLEX" | "W/R" | "WR/RB" | "RB/WR" => Ok(LineupSlot::WrRb),
            "BN" | "BE" | "BENCH" | "TAXI" => Ok(LineupSlot::Bench),
            "IR" | "IR+" | "RESERVE" => Ok(LineupSlot::IR),
            other => Err(InsightsError::InvalidSlot {
                slot: other.to_string(),
            }),
        }
    }
}
