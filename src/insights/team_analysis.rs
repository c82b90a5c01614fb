//! Positional needs, competitive situation and power rankings.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::lineup::optimal_lineup;
use super::player_score::{score_player, PlayerScore, PlayerStatus};
use crate::cli::types::{LineupSlot, PlayerId, Position, TeamId, Week};
use crate::models::{LeagueSnapshot, Team};

const CRITICAL_RATIO: f64 = 0.80;
const MODERATE_RATIO: f64 = 0.95;
const ADEQUATE_RATIO: f64 = 1.10;
const CONTENDER_WIN_PCT: f64 = 0.65;
const BUBBLE_WIN_PCT: f64 = 0.45;
/// Games before the record is trusted over points-for.
const MIN_GAMES_FOR_RECORD: u32 = 3;
/// Share of an elite output a starter contributes when there is no league to compare against.
const SOLO_BASELINE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NeedLevel {
    CriticalNeed,
    ModerateNeed,
    Adequate,
    Strength,
}

impl NeedLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < CRITICAL_RATIO {
            NeedLevel::CriticalNeed
        } else if ratio < MODERATE_RATIO {
            NeedLevel::ModerateNeed
        } else if ratio <= ADEQUATE_RATIO {
            NeedLevel::Adequate
        } else {
            NeedLevel::Strength
        }
    }
}

impl fmt::Display for NeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NeedLevel::CriticalNeed => "critical need",
            NeedLevel::ModerateNeed => "moderate need",
            NeedLevel::Adequate => "adequate",
            NeedLevel::Strength => "strength",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSituation {
    Contender,
    Bubble,
    Rebuilding,
}

impl fmt::Display for TeamSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TeamSituation::Contender => "Contender",
            TeamSituation::Bubble => "Bubble",
            TeamSituation::Rebuilding => "Rebuilding",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionNeed {
    pub position: Position,
    /// Starters the lineup asks for: dedicated slots plus a share of each flex slot.
    pub required: f64,
    /// Dedicated slots only.
    pub dedicated: usize,
    pub strength: f64,
    pub league_average: f64,
    pub ratio: f64,
    pub level: NeedLevel,
    pub healthy: usize,
    /// No healthy backup beyond the starters the lineup asks for.
    pub thin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAnalysis {
    pub team_id: TeamId,
    pub situation: TeamSituation,
    /// Mean expected points of the optimal starters.
    pub power_score: f64,
    pub power_rank: usize,
    pub standings_rank: usize,
    pub needs: Vec<PositionNeed>,
}

impl TeamAnalysis {
    pub fn need(&self, position: Position) -> Option<&PositionNeed> {
        self.needs.iter().find(|n| n.position == position)
    }

    pub fn level_for(&self, position: Position) -> NeedLevel {
        self.need(position)
            .map(|n| n.level)
            .unwrap_or(NeedLevel::Adequate)
    }

    /// Positions at `level`, weakest first.
    pub fn positions_at(&self, level: NeedLevel) -> Vec<Position> {
        let mut matching: Vec<&PositionNeed> = self.needs.iter().filter(|n| n.level == level).collect();
        matching.sort_by(|a, b| a.ratio.partial_cmp(&b.ratio).unwrap_or(Ordering::Equal));
        matching.into_iter().map(|n| n.position).collect()
    }
}

/// Starters each position must supply under `slots`.
///
/// Each flex slot is split evenly among the positions it accepts.
pub fn position_requirements(slots: &[LineupSlot]) -> BTreeMap<Position, (f64, usize)> {
    let mut required: BTreeMap<Position, (f64, usize)> = BTreeMap::new();
    for slot in slots.iter().filter(|s| s.is_starting()) {
        match slot.dedicated_position() {
            Some(position) => {
                let entry = required.entry(position).or_default();
                entry.0 += 1.0;
                entry.1 += 1;
            }
            None => {
                let eligible = slot.eligible_positions();
                let share = 1.0 / eligible.len() as f64;
                for position in eligible {
                    required.entry(position).or_default().0 += share;
                }
            }
        }
    }
    required
}

/// Expected points of the top `required` players, counting the fractional
/// part of `required` as that share of the next player.
fn top_strength(sorted_desc: &[f64], required: f64) -> f64 {
    let whole = required.floor() as usize;
    let fraction = required - required.floor();
    let full: f64 = sorted_desc.iter().take(whole).sum();
    let partial = sorted_desc.get(whole).copied().unwrap_or(0.0) * fraction;
    full + partial
}

struct TeamProfile {
    team_id: TeamId,
    strengths: BTreeMap<Position, f64>,
    healthy: BTreeMap<Position, usize>,
    power_score: f64,
}

fn profile_team(
    snapshot: &LeagueSnapshot,
    team: &Team,
    week: Week,
    scores: &HashMap<PlayerId, PlayerScore>,
    requirements: &BTreeMap<Position, (f64, usize)>,
) -> TeamProfile {
    let roster: Vec<PlayerScore> = snapshot
        .roster(team)
        .filter(|p| !team.is_reserve(&p.id))
        .map(|p| {
            scores
                .get(&p.id)
                .cloned()
                .unwrap_or_else(|| score_player(p, week))
        })
        .collect();

    let mut strengths = BTreeMap::new();
    let mut healthy = BTreeMap::new();
    for (&position, &(required, _)) in requirements {
        let mut points: Vec<f64> = roster
            .iter()
            .filter(|s| s.position == position)
            .map(|s| s.expected_points)
            .collect();
        points.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        strengths.insert(position, top_strength(&points, required));

        let available = roster
            .iter()
            .filter(|s| s.position == position && s.status != PlayerStatus::Unavailable)
            .count();
        healthy.insert(position, available);
    }

    let refs: Vec<&PlayerScore> = roster.iter().collect();
    let lineup = optimal_lineup(&snapshot.league.roster_slots, &refs);
    let starter_points: Vec<f64> = lineup
        .iter()
        .filter_map(|a| a.player_id.as_ref())
        .filter_map(|id| roster.iter().find(|s| &s.player_id == id))
        .map(|s| s.expected_points)
        .collect();
    let power_score = if starter_points.is_empty() {
        0.0
    } else {
        starter_points.iter().sum::<f64>() / starter_points.len() as f64
    };

    TeamProfile {
        team_id: team.team_id.clone(),
        strengths,
        healthy,
        power_score,
    }
}

/// Situation from the record once enough games are played, otherwise from
/// the points-for rank.
pub fn classify_situation(snapshot: &LeagueSnapshot, team: &Team) -> TeamSituation {
    if team.record.games() >= MIN_GAMES_FOR_RECORD {
        let pct = team.record.win_pct();
        return if pct >= CONTENDER_WIN_PCT {
            TeamSituation::Contender
        } else if pct >= BUBBLE_WIN_PCT {
            TeamSituation::Bubble
        } else {
            TeamSituation::Rebuilding
        };
    }

    let teams = snapshot.teams.len().max(1) as f64;
    match snapshot.points_for_rank(&team.team_id) {
        Some(rank) => {
            let percentile = (rank - 1) as f64 / teams;
            if percentile < 1.0 / 3.0 {
                TeamSituation::Contender
            } else if percentile >= 2.0 / 3.0 {
                TeamSituation::Rebuilding
            } else {
                TeamSituation::Bubble
            }
        }
        None => TeamSituation::Bubble,
    }
}

/// Analyze every team in the league; profiles are built in parallel.
pub fn analyze_league(
    snapshot: &LeagueSnapshot,
    week: Week,
    scores: &HashMap<PlayerId, PlayerScore>,
) -> Vec<TeamAnalysis> {
    let requirements = position_requirements(&snapshot.league.roster_slots);
    let profiles: Vec<TeamProfile> = snapshot
        .teams
        .par_iter()
        .map(|team| profile_team(snapshot, team, week, scores, &requirements))
        .collect();

    let league_average: BTreeMap<Position, f64> = requirements
        .iter()
        .map(|(&position, &(required, _))| {
            let average = if profiles.len() > 1 {
                profiles
                    .iter()
                    .map(|p| p.strengths.get(&position).copied().unwrap_or(0.0))
                    .sum::<f64>()
                    / profiles.len() as f64
            } else {
                position.elite_threshold() * SOLO_BASELINE * required
            };
            (position, average)
        })
        .collect();

    let mut by_power: Vec<(&TeamId, f64)> = profiles.iter().map(|p| (&p.team_id, p.power_score)).collect();
    by_power.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(b.0)));

    profiles
        .iter()
        .zip(&snapshot.teams)
        .map(|(profile, team)| {
            let needs = requirements
                .iter()
                .map(|(&position, &(required, dedicated))| {
                    let strength = profile.strengths.get(&position).copied().unwrap_or(0.0);
                    let average = league_average.get(&position).copied().unwrap_or(0.0);
                    let ratio = if average > 0.0 { strength / average } else { 1.0 };
                    let healthy = profile.healthy.get(&position).copied().unwrap_or(0);
                    let level = if (healthy as f64) < required {
                        NeedLevel::CriticalNeed
                    } else {
                        NeedLevel::from_ratio(ratio)
                    };
                    PositionNeed {
                        position,
                        required,
                        dedicated,
                        strength,
                        league_average: average,
                        ratio,
                        level,
                        healthy,
                        thin: healthy as f64 <= required,
                    }
                })
                .collect();

            TeamAnalysis {
                team_id: profile.team_id.clone(),
                situation: classify_situation(snapshot, team),
                power_score: profile.power_score,
                power_rank: by_power
                    .iter()
                    .position(|(id, _)| *id == &profile.team_id)
                    .map(|i| i + 1)
                    .unwrap_or(by_power.len()),
                standings_rank: snapshot
                    .standings_rank(&team.team_id)
                    .unwrap_or(snapshot.teams.len()),
                needs,
            }
        })
        .collect()
}

/// Analysis of one team, ranked against the rest of the league.
pub fn analyze_team(
    snapshot: &LeagueSnapshot,
    team_id: &TeamId,
    week: Week,
    scores: &HashMap<PlayerId, PlayerScore>,
) -> Option<TeamAnalysis> {
    analyze_league(snapshot, week, scores)
        .into_iter()
        .find(|a| &a.team_id == team_id)
}
