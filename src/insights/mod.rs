//! Roster heuristics: player scores, start/sit, needs, waivers, trades.
//!
//! Everything here is a pure function of a [`LeagueSnapshot`]. The
//! per-team pieces share one [`TeamContext`] so players are scored once.

pub mod lineup;
pub mod matchup;
pub mod player_score;
pub mod strategy;
pub mod team_analysis;
pub mod trade;
pub mod waivers;


use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cli::types::{PlayerId, TeamId, Week};
use crate::error::{InsightsError, Result};
use crate::models::{LeagueSnapshot, Team};

pub use lineup::{LineupChange, LineupEntry, LineupRecommendation, StartSit};
pub use matchup::MatchupPreview;
pub use player_score::{PlayerScore, PlayerStatus, Trend};
pub use strategy::{Approach, TeamStrategy};
pub use team_analysis::{NeedLevel, PositionNeed, TeamAnalysis, TeamSituation};
pub use trade::{TradeEvaluation, TradeTier, TradeValue, TradeVerdict};
pub use waivers::{WaiverPriority, WaiverTarget};

/// One team's scored roster, lineup, analysis and strategy for a week.
pub struct TeamContext<'a> {
    pub snapshot: &'a LeagueSnapshot,
    pub team: &'a Team,
    pub week: Week,
    pub scores: HashMap<PlayerId, PlayerScore>,
    pub lineup: LineupRecommendation,
    pub analysis: TeamAnalysis,
    pub strategy: TeamStrategy,
}

impl<'a> TeamContext<'a> {
    pub fn build(snapshot: &'a LeagueSnapshot, team_id: &TeamId, week: Week) -> Result<Self> {
        let team = snapshot
            .team(team_id)
            .ok_or_else(|| InsightsError::TeamNotFound {
                team: team_id.to_string(),
            })?;

        let scores = player_score::score_all(snapshot, week);
        let lineup = lineup::recommend_lineup_with(snapshot, team, week, &scores);
        let analysis = team_analysis::analyze_team(snapshot, team_id, week, &scores).ok_or_else(
            || InsightsError::TeamNotFound {
                team: team_id.to_string(),
            },
        )?;
        let strategy = strategy::build_strategy(&analysis, &snapshot.league, week);

        Ok(Self {
            snapshot,
            team,
            week,
            scores,
            lineup,
            analysis,
            strategy,
        })
    }
}

/// Everything the insights report shows for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInsights {
    pub team: Team,
    pub week: Week,
    pub lineup: LineupRecommendation,
    pub analysis: TeamAnalysis,
    pub strategy: TeamStrategy,
    pub waivers: Vec<WaiverTarget>,
    pub trade_chips: Vec<TradeValue>,
    pub matchup: Option<MatchupPreview>,
    pub headlines: Vec<String>,
}

/// Full report for `team_id` in `week`, with up to `limit` waiver targets.
pub fn generate_insights(
    snapshot: &LeagueSnapshot,
    team_id: &TeamId,
    week: Week,
    limit: usize,
) -> Result<TeamInsights> {
    let ctx = TeamContext::build(snapshot, team_id, week)?;
    let waivers = waivers::generate_waiver_targets(&ctx, limit);
    let trade_chips = trade::trade_chips(&ctx);
    let matchup = matchup::preview(snapshot, ctx.team, week, &ctx.scores);

    let mut insights = TeamInsights {
        team: ctx.team.clone(),
        week,
        lineup: ctx.lineup,
        analysis: ctx.analysis,
        strategy: ctx.strategy,
        waivers,
        trade_chips,
        matchup,
        headlines: Vec::new(),
    };
    insights.headlines = headlines(&insights);
    Ok(insights)
}

/// Short one-line takeaways, most urgent first.
pub fn headlines(insights: &TeamInsights) -> Vec<String> {
    let mut lines = Vec::new();

    let critical = insights.analysis.positions_at(NeedLevel::CriticalNeed);
    if !critical.is_empty() {
        let names: Vec<String> = critical.iter().map(|p| p.to_string()).collect();
        lines.push(format!("Critical need at {}", names.join(", ")));
    }

    let gain = insights.lineup.gain();
    if let Some(first) = insights.lineup.changes.first() {
        let benched = first
            .bench_name
            .as_deref()
            .map(|b| format!(" over {}", b))
            .unwrap_or_default();
        if insights.lineup.changes.len() == 1 {
            lines.push(format!("Start {}{} (+{:.1} pts)", first.start_name, benched, gain));
        } else {
            lines.push(format!(
                "{} lineup changes worth +{:.1} pts, starting with {}{}",
                insights.lineup.changes.len(),
                gain,
                first.start_name,
                benched
            ));
        }
    }

    if let Some(target) = insights.waivers.first() {
        let bid = target
            .faab_bid
            .map(|b| format!(", bid ${}", b))
            .unwrap_or_default();
        lines.push(format!(
            "Top waiver target: {} ({}, {} priority{})",
            target.name, target.position, target.priority, bid
        ));
    }

    if let Some(matchup) = &insights.matchup {
        if let (Some(p), Some(opponent)) = (matchup.win_probability, &matchup.opponent_name) {
            lines.push(format!("{:.0}% to beat {}", p * 100.0, opponent));
        }
    }

    lines
}
