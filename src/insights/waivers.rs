//! Free-agent pickups ranked against the team's weakest players.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::player_score::{score_player, PlayerStatus, Trend};
use super::strategy::Approach;
use super::team_analysis::NeedLevel;
use super::TeamContext;
use crate::cli::types::{PlayerId, Position};
use crate::models::WaiverSettings;


const HIGH_PRIORITY_VALUE: f64 = 6.0;
const MEDIUM_PRIORITY_VALUE: f64 = 3.0;
const RISING_BONUS: f64 = 1.1;
const WIN_NOW_BID_BONUS: f64 = 1.2;
/// Adjusted value at which a bid reaches the top of its priority band.
const BID_SCALE_VALUE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaiverPriority {
    High,
    Medium,
    Low,
}

impl fmt::Display for WaiverPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WaiverPriority::High => "HIGH",
            WaiverPriority::Medium => "MEDIUM",
            WaiverPriority::Low => "LOW",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiverTarget {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub nfl_team: Option<String>,
    pub expected_points: f64,
    /// Expected points blended toward floor or ceiling by risk tolerance.
    pub value: f64,
    pub replacement_value: f64,
    pub improvement: f64,
    pub adjusted_value: f64,
    pub need: NeedLevel,
    pub direction: Trend,
    pub priority: WaiverPriority,
    /// Suggested bid in FAAB leagues.
    pub faab_bid: Option<u32>,
    pub drop: Option<PlayerId>,
    pub drop_name: Option<String>,
    pub reason: String,
}

pub fn need_multiplier(level: NeedLevel) -> f64 {
    match level {
        NeedLevel::CriticalNeed => 1.25,
        NeedLevel::ModerateNeed => 1.10,
        NeedLevel::Adequate => 1.0,
        NeedLevel::Strength => 0.85,
    }
}

pub fn priority_for(adjusted_value: f64, need: NeedLevel) -> WaiverPriority {
    if adjusted_value >= HIGH_PRIORITY_VALUE || need == NeedLevel::CriticalNeed {
        WaiverPriority::High
    } else if adjusted_value >= MEDIUM_PRIORITY_VALUE {
        WaiverPriority::Medium
    } else {
        WaiverPriority::Low
    }
}

/// Whole-dollar bid out of `remaining`: a share of the budget chosen by
/// priority and scaled within its band by `adjusted_value`.
pub fn faab_bid(priority: WaiverPriority, adjusted_value: f64, remaining: u32, approach: Approach) -> u32 {
    let scale = (adjusted_value / BID_SCALE_VALUE).clamp(0.0, 1.0);
    let (low, high) = match priority {
        WaiverPriority::High => (0.15, 0.25),
        WaiverPriority::Medium => (0.05, 0.10),
        WaiverPriority::Low => (0.01, 0.03),
    };
    let mut bid = remaining as f64 * (low + (high - low) * scale);
    if approach == Approach::WinNow {
        bid *= WIN_NOW_BID_BONUS;
    }
    (bid.round() as u32).max(1).min(remaining)
}

/// Budget left for the team, `None` outside FAAB leagues.
pub fn remaining_budget(ctx: &TeamContext<'_>) -> Option<u32> {
    match ctx.snapshot.league.waivers {
        WaiverSettings::Faab { budget } => {
            Some(budget.saturating_sub(ctx.team.faab_used.unwrap_or(0)))
        }
        WaiverSettings::Rolling => None,
    }
}

/// Up to `limit` free agents worth claiming, best first.
pub fn generate_waiver_targets(ctx: &TeamContext<'_>, limit: usize) -> Vec<WaiverTarget> {
    let risk = ctx.strategy.risk_tolerance;
    let remaining = remaining_budget(ctx);

    let drop = ctx
        .lineup
        .entries
        .iter()
        .filter(|e| e.slot.is_none() && !e.label.is_start())
        .filter(|e| ctx.scores.get(&e.player_id).map_or(true, |s| s.is_available()))
        .min_by(|a, b| {
            a.expected_points
                .partial_cmp(&b.expected_points)
                .unwrap_or(Ordering::Equal)
        });

    let free_agents = ctx.snapshot.free_agents();
    let mut targets: Vec<WaiverTarget> = free_agents
        .par_iter()
        .filter_map(|player| {
            let score = ctx
                .scores
                .get(&player.id)
                .cloned()
                .unwrap_or_else(|| score_player(player, ctx.week));
            if score.status == PlayerStatus::Unavailable || score.expected_points <= 0.0 {
                return None;
            }

            let need = ctx.analysis.level_for(player.position);
            let value = score.risk_adjusted(risk);
            let replacement = replacement_value(ctx, player.position);
            let improvement = value - replacement;
            if improvement <= 0.0 && need != NeedLevel::CriticalNeed {
                return None;
            }

            let mut multiplier = need_multiplier(need);
            if score.direction == Trend::Rising {
                multiplier *= RISING_BONUS;
            }
            let adjusted = improvement * multiplier;
            let priority = priority_for(adjusted, need);
            let drop = drop.filter(|d| d.expected_points < score.expected_points);

            let mut reason = format!(
                "+{:.1} pts over your weakest {} ({})",
                improvement.max(0.0),
                player.position,
                need
            );
            if score.direction == Trend::Rising {
                reason.push_str(", trending up");
            }

            Some(WaiverTarget {
                player_id: player.id.clone(),
                name: player.name.clone(),
                position: player.position,
                nfl_team: player.nfl_team.clone(),
                expected_points: score.expected_points,
                value,
                replacement_value: replacement,
                improvement,
                adjusted_value: adjusted,
                need,
                direction: score.direction,
                priority,
                faab_bid: remaining.map(|r| faab_bid(priority, adjusted, r, ctx.strategy.approach)),
                drop: drop.map(|d| d.player_id.clone()),
                drop_name: drop.map(|d| d.name.clone()),
                reason,
            })
        })
        .collect();

    targets.sort_by(|a, b| {
        b.adjusted_value
            .partial_cmp(&a.adjusted_value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    targets.truncate(limit);
    targets
}

/// Expected points of the weakest non-reserve player at `position`, 0 if none.
fn replacement_value(ctx: &TeamContext<'_>, position: Position) -> f64 {
    ctx.lineup
        .entries
        .iter()
        .filter(|e| e.position == position)
        .map(|e| e.expected_points)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .unwrap_or(0.0)
}
