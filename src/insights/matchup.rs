//! Weekly head-to-head preview.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::lineup::recommend_lineup_with;
use super::player_score::PlayerScore;
use crate::cli::types::{PlayerId, TeamId, Week};
use crate::models::{LeagueSnapshot, Team};

/// Points of projected margin that move the win probability by one logistic unit.
const MARGIN_SCALE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveScore {
    pub points: f64,
    pub opponent_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupPreview {
    pub week: Week,
    pub team_id: TeamId,
    /// `None` on a bye week.
    pub opponent_id: Option<TeamId>,
    pub opponent_name: Option<String>,
    pub projected_points: f64,
    pub opponent_projected: Option<f64>,
    pub win_probability: Option<f64>,
    /// Present once either side has scored.
    pub live: Option<LiveScore>,
}

/// Logistic win probability from the projected margin.
pub fn win_probability(own: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + (-(own - opponent) / MARGIN_SCALE).exp())
}

/// Preview `team`'s matchup in `week`; `None` when the team has no matchup.
pub fn preview(
    snapshot: &LeagueSnapshot,
    team: &Team,
    week: Week,
    scores: &HashMap<PlayerId, PlayerScore>,
) -> Option<MatchupPreview> {
    let matchup = snapshot.matchup_for(&team.team_id, week)?;
    let (own_side, opponent_side) = matchup.sides_for(&team.team_id)?;

    let projected_points = recommend_lineup_with(snapshot, team, week, scores).optimal_points;
    let opponent = opponent_side.and_then(|side| snapshot.team(&side.team_id));
    let opponent_projected =
        opponent.map(|t| recommend_lineup_with(snapshot, t, week, scores).optimal_points);

    let live = matchup.has_started().then(|| LiveScore {
        points: own_side.points,
        opponent_points: opponent_side.map(|s| s.points).unwrap_or(0.0),
    });

    Some(MatchupPreview {
        week,
        team_id: team.team_id.clone(),
        opponent_id: opponent_side.map(|s| s.team_id.clone()),
        opponent_name: opponent.map(|t| t.name.clone()),
        projected_points,
        opponent_projected,
        win_probability: opponent_projected.map(|o| win_probability(projected_points, o)),
        live,
    })
}
