//! Expected points, rating and confidence for one player-week.
//!
//! Blends recent form, season average and the platform projection, then
//! discounts for injury status and bye weeks.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::cli::types::{PlayerId, Position, Week};
use crate::models::{InjuryStatus, LeagueSnapshot, Player};

#[cfg(test)]
mod tests;

const RECENT_WEIGHT: f64 = 0.45;
const SEASON_WEIGHT: f64 = 0.25;
const PROJECTION_WEIGHT: f64 = 0.30;
/// Games counted as recent form.
const RECENT_GAMES: usize = 3;
/// Points of recent-minus-season movement that count as a trend.
const TREND_THRESHOLD: f64 = 2.0;

/// Direction of recent form relative to the season average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Rising,
    Steady,
    Falling,
}

impl Trend {
    pub fn from_delta(delta: f64) -> Self {
        if delta > TREND_THRESHOLD {
            Trend::Rising
        } else if delta < -TREND_THRESHOLD {
            Trend::Falling
        } else {
            Trend::Steady
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Rising => "rising",
            Trend::Steady => "steady",
            Trend::Falling => "falling",
        };
        write!(f, "{}", s)
    }
}

/// Whether the player can score this week at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Active,
    Bye,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub position: Position,
    /// Points expected this week after injury and bye adjustments.
    pub expected_points: f64,
    /// Expected points before injury and bye adjustments.
    pub baseline_points: f64,
    /// 0-100, relative to an elite weekly output at the position.
    pub rating: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Recent average minus season average.
    pub trend: f64,
    pub direction: Trend,
    pub consistency: f64,
    pub confidence: f64,
    pub status: PlayerStatus,
    pub games_played: usize,
}

impl PlayerScore {
    /// Value under a risk tolerance `r` in `[0, 1]`: half expected points,
    /// half the floor-to-ceiling point picked by `r`.
    pub fn risk_adjusted(&self, risk_tolerance: f64) -> f64 {
        let r = risk_tolerance.clamp(0.0, 1.0);
        let band = (1.0 - r) * self.floor + r * self.ceiling;
        0.5 * self.expected_points + 0.5 * band
    }

    pub fn is_available(&self) -> bool {
        self.status == PlayerStatus::Active
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Rating on the 0-100 scale for `points` at `position`.
pub fn rating_for(points: f64, position: Position) -> f64 {
    (points / position.elite_threshold() * 100.0).clamp(0.0, 100.0)
}

/// Score `player` for `week`, using only games played before it.
pub fn score_player(player: &Player, week: Week) -> PlayerScore {
    let history: Vec<f64> = player.history_before(week).map(|w| w.points).collect();
    let games = history.len();

    let season_avg = mean(&history);
    let recent_avg = mean(&history[games.saturating_sub(RECENT_GAMES)..]);
    let sd = std_dev(&history);

    let baseline = match (games, player.projection) {
        (0, projection) => projection.unwrap_or(0.0),
        (_, Some(projection)) => {
            RECENT_WEIGHT * recent_avg + SEASON_WEIGHT * season_avg + PROJECTION_WEIGHT * projection
        }
        (_, None) => {
            (RECENT_WEIGHT * recent_avg + SEASON_WEIGHT * season_avg)
                / (RECENT_WEIGHT + SEASON_WEIGHT)
        }
    }
    .max(0.0);

    let trend = if games >= 2 { recent_avg - season_avg } else { 0.0 };

    let consistency = if games < 2 {
        0.5
    } else if season_avg <= 0.0 {
        0.0
    } else {
        (1.0 - sd / season_avg).clamp(0.0, 1.0)
    };

    let status = if player.bye_week == Some(week.as_u16()) {
        PlayerStatus::Bye
    } else if player.injury_status.is_unavailable() {
        PlayerStatus::Unavailable
    } else {
        PlayerStatus::Active
    };

    let expected = match status {
        PlayerStatus::Active => baseline * player.injury_status.availability(),
        PlayerStatus::Bye | PlayerStatus::Unavailable => 0.0,
    };
    let (floor, ceiling) = match status {
        PlayerStatus::Active => ((expected - sd).max(0.0), expected + sd),
        PlayerStatus::Bye | PlayerStatus::Unavailable => (0.0, 0.0),
    };

    let sample = games as f64 / (games as f64 + 3.0);
    let projection_bonus = if player.projection.is_some() { 0.1 } else { 0.0 };
    let confidence = (sample * (0.5 + 0.5 * consistency) + projection_bonus).clamp(0.1, 0.95);

    PlayerScore {
        player_id: player.id.clone(),
        position: player.position,
        expected_points: expected,
        baseline_points: baseline,
        rating: rating_for(expected, player.position),
        floor,
        ceiling,
        trend,
        direction: Trend::from_delta(trend),
        consistency,
        confidence,
        status,
        games_played: games,
    }
}

/// Score every player in the snapshot in parallel.
pub fn score_all(snapshot: &LeagueSnapshot, week: Week) -> HashMap<PlayerId, PlayerScore> {
    snapshot
        .players
        .par_iter()
        .map(|(id, player)| (id.clone(), score_player(player, week)))
        .collect()
}

/// Short reason a player cannot play, for display.
pub fn unavailable_reason(player: &Player, score: &PlayerScore) -> Option<String> {
    match score.status {
        PlayerStatus::Bye => Some("On bye".to_string()),
        PlayerStatus::Unavailable => Some(match player.injury_status {
            InjuryStatus::Suspended => "Suspended".to_string(),
            status => format!("Ruled out ({})", status),
        }),
        PlayerStatus::Active => None,
    }
}
