//! Trade value on a common 0-100+ scale and two-sided trade evaluation.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::player_score::{rating_for, PlayerScore};
use super::team_analysis::NeedLevel;
use super::TeamContext;
use crate::cli::types::{PlayerId, Position};
use crate::models::{League, Player};
use crate::scoring::ScoringFormat;

#[cfg(test)]
mod tests;

const CONSOLIDATION_PREMIUM: f64 = 0.10;
const ACCEPT_RATIO: f64 = 1.10;
const DECLINE_RATIO: f64 = 0.90;
const FORMAT_BONUS: f64 = 1.05;
/// TE rating above which a tight end is a difference-maker.
const ELITE_TE_RATING: f64 = 60.0;
const MAX_TRADE_CHIPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeTier {
    Elite,
    High,
    Mid,
    Low,
    Minimal,
}

impl TradeTier {
    pub fn from_value(value: f64) -> Self {
        if value >= 80.0 {
            TradeTier::Elite
        } else if value >= 60.0 {
            TradeTier::High
        } else if value >= 40.0 {
            TradeTier::Mid
        } else if value >= 20.0 {
            TradeTier::Low
        } else {
            TradeTier::Minimal
        }
    }
}

impl fmt::Display for TradeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeTier::Elite => "Elite",
            TradeTier::High => "High",
            TradeTier::Mid => "Mid",
            TradeTier::Low => "Low",
            TradeTier::Minimal => "Minimal",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeValue {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub rating: f64,
    pub value: f64,
    pub tier: TradeTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeVerdict {
    Accept,
    Fair,
    Decline,
}

impl fmt::Display for TradeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeVerdict::Accept => "ACCEPT",
            TradeVerdict::Fair => "FAIR",
            TradeVerdict::Decline => "DECLINE",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvaluation {
    pub give: Vec<TradeValue>,
    pub get: Vec<TradeValue>,
    pub give_total: f64,
    pub get_total: f64,
    pub verdict: TradeVerdict,
    pub summary: String,
}

/// Positional scarcity multiplier.
pub fn scarcity(position: Position, rating: f64, superflex: bool) -> f64 {
    match position {
        Position::RB => 1.15,
        Position::WR => 1.0,
        Position::TE if rating >= ELITE_TE_RATING => 1.10,
        Position::TE => 0.90,
        Position::QB if superflex => 1.25,
        Position::QB => 0.85,
        Position::K => 0.30,
        Position::DEF => 0.35,
    }
}

/// Bonus for positions the scoring format favours.
pub fn format_bonus(position: Position, format: ScoringFormat) -> f64 {
    match (format, position) {
        (ScoringFormat::Ppr, Position::WR | Position::TE) => FORMAT_BONUS,
        (ScoringFormat::Standard, Position::RB) => FORMAT_BONUS,
        _ => 1.0,
    }
}

/// Value of `player` in `league`.
///
/// Rated on healthy expected output, then discounted by injury status, so a
/// player on bye keeps their value.
pub fn trade_value(player: &Player, score: &PlayerScore, league: &League) -> TradeValue {
    let rating = rating_for(score.baseline_points, player.position);
    let value = rating
        * scarcity(player.position, rating, league.has_superflex())
        * format_bonus(player.position, league.scoring.format())
        * player.injury_status.availability();

    TradeValue {
        player_id: player.id.clone(),
        name: player.name.clone(),
        position: player.position,
        rating,
        value,
        tier: TradeTier::from_value(value),
    }
}

/// Judge a trade from the side that gives `give` and receives `get`.
///
/// The side holding the single best asset earns a consolidation premium on it.
pub fn evaluate_trade(give: Vec<TradeValue>, get: Vec<TradeValue>) -> TradeEvaluation {
    let best = |side: &[TradeValue]| side.iter().map(|v| v.value).fold(0.0_f64, f64::max);
    let mut give_total: f64 = give.iter().map(|v| v.value).sum();
    let mut get_total: f64 = get.iter().map(|v| v.value).sum();

    let (best_give, best_get) = (best(&give), best(&get));
    match best_give.partial_cmp(&best_get) {
        Some(Ordering::Greater) => give_total += best_give * CONSOLIDATION_PREMIUM,
        Some(Ordering::Less) => get_total += best_get * CONSOLIDATION_PREMIUM,
        _ => {}
    }

    let verdict = if get_total >= give_total * ACCEPT_RATIO {
        TradeVerdict::Accept
    } else if get_total < give_total * DECLINE_RATIO {
        TradeVerdict::Decline
    } else {
        TradeVerdict::Fair
    };

    let summary = format!(
        "{}: receive {:.1} for {:.1} ({:+.1})",
        verdict,
        get_total,
        give_total,
        get_total - give_total
    );

    TradeEvaluation {
        give,
        get,
        give_total,
        get_total,
        verdict,
        summary,
    }
}

/// The team's most valuable bench players at positions of strength.
pub fn trade_chips(ctx: &TeamContext<'_>) -> Vec<TradeValue> {
    let mut chips: Vec<TradeValue> = ctx
        .lineup
        .entries
        .iter()
        .filter(|e| e.slot.is_none())
        .filter(|e| ctx.analysis.level_for(e.position) == NeedLevel::Strength)
        .filter_map(|e| {
            let player = ctx.snapshot.players.get(&e.player_id)?;
            let score = ctx.scores.get(&e.player_id)?;
            Some(trade_value(player, score, &ctx.snapshot.league))
        })
        .filter(|v| v.value > 0.0)
        .collect();

    chips.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    chips.truncate(MAX_TRADE_CHIPS);
    chips
}
