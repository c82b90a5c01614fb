//! League scoring: turning raw stat lines into fantasy points.
//!
//! Rules are keyed by canonical stat names (Sleeper's vocabulary, e.g.
//! `pass_yd`, `rec`, `fgm_50p`). ESPN and Yahoo stat ids are translated with
//! the tables in [`stat_keys`].

pub mod stat_keys;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::cli::types::Position;


/// Raw stats for one player-week, keyed by canonical stat name.
pub type StatLine = BTreeMap<String, f64>;

/// Points awarded per unit of one stat.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringRule {
    /// Base points (used when no override exists for the player's position)
    pub points: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub position_overrides: BTreeMap<Position, f64>,
}

impl ScoringRule {
    pub fn flat(points: f64) -> Self {
        Self {
            points,
            position_overrides: BTreeMap::new(),
        }
    }

    pub fn points_for(&self, position: Position) -> f64 {
        self.position_overrides
            .get(&position)
            .copied()
            .unwrap_or(self.points)
    }
}

/// Broad classification of a league's reception scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringFormat {
    Standard,
    HalfPpr,
    Ppr,
    Custom,
}

impl fmt::Display for ScoringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringFormat::Standard => "Standard",
            ScoringFormat::HalfPpr => "Half-PPR",
            ScoringFormat::Ppr => "PPR",
            ScoringFormat::Custom => "Custom",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringSettings {
    pub rules: BTreeMap<String, ScoringRule>,
}

impl ScoringSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style rule insertion.
    pub fn with_rule(mut self, key: &str, points: f64) -> Self {
        self.set_rule(key, points);
        self
    }

    /// Set the base points for `key`, keeping any position overrides.
    pub fn set_rule(&mut self, key: &str, points: f64) {
        self.rules.entry(key.to_string()).or_default().points = points;
    }

    pub fn set_override(&mut self, key: &str, position: Position, points: f64) {
        self.rules
            .entry(key.to_string())
            .or_default()
            .position_overrides
            .insert(position, points);
    }

    /// Per-unit points for `key` at `position`, `None` when the league doesn't score it.
    pub fn points_per(&self, key: &str, position: Position) -> Option<f64> {
        self.rules.get(key).map(|r| r.points_for(position))
    }

    /// Fantasy points for one stat line. Stats without a rule contribute nothing.
    pub fn points_for(&self, stats: &StatLine, position: Position) -> f64 {
        let total: f64 = stats
            .iter()
            .filter_map(|(key, value)| self.points_per(key, position).map(|pts| value * pts))
            .sum();
        round2(total)
    }

    pub fn reception_points(&self) -> f64 {
        self.rules.get("rec").map(|r| r.points).unwrap_or(0.0)
    }

    pub fn format(&self) -> ScoringFormat {
        let rec = self.reception_points();
        if rec.abs() < f64::EPSILON {
            ScoringFormat::Standard
        } else if (rec - 0.5).abs() < f64::EPSILON {
            ScoringFormat::HalfPpr
        } else if rec >= 1.0 {
            ScoringFormat::Ppr
        } else {
            ScoringFormat::Custom
        }
    }

    /// Standard (non-PPR) scoring as most platforms default it.
    pub fn standard() -> Self {
        Self::new()
            .with_rule("pass_yd", 0.04)
            .with_rule("pass_td", 4.0)
            .with_rule("pass_int", -2.0)
            .with_rule("pass_2pt", 2.0)
            .with_rule("rush_yd", 0.1)
            .with_rule("rush_td", 6.0)
            .with_rule("rush_2pt", 2.0)
            .with_rule("rec", 0.0)
            .with_rule("rec_yd", 0.1)
            .with_rule("rec_td", 6.0)
            .with_rule("rec_2pt", 2.0)
            .with_rule("fum_lost", -2.0)
            .with_rule("st_td", 6.0)
            .with_rule("fgm_0_39", 3.0)
            .with_rule("fgm_40_49", 4.0)
            .with_rule("fgm_50p", 5.0)
            .with_rule("fgmiss", -1.0)
            .with_rule("xpm", 1.0)
            .with_rule("xpmiss", -1.0)
            .with_rule("sack", 1.0)
            .with_rule("int", 2.0)
            .with_rule("fum_rec", 2.0)
            .with_rule("def_td", 6.0)
            .with_rule("safe", 2.0)
            .with_rule("pts_allow_0", 10.0)
            .with_rule("pts_allow_1_6", 7.0)
            .with_rule("pts_allow_7_13", 4.0)
            .with_rule("pts_allow_14_20", 1.0)
            .with_rule("pts_allow_28_34", -1.0)
            .with_rule("pts_allow_35p", -4.0)
    }

    pub fn half_ppr() -> Self {
        Self::standard().with_rule("rec", 0.5)
    }

    pub fn ppr() -> Self {
        Self::standard().with_rule("rec", 1.0)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
