//! `scores` command: head-to-head scores for one week.

use serde::{Deserialize, Serialize};

use crate::{
    cli::types::{TeamId, Week},
    models::{Matchup, MatchupSide, Team},
    Result,
};

use super::common::{emit, pts, CommandContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub team_id: TeamId,
    pub team_name: String,
    pub points: f64,
    pub projected: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupScore {
    pub week: Week,
    pub matchup_id: u32,
    pub home: ScoreLine,
    /// `None` on a bye.
    pub away: Option<ScoreLine>,
}

/// Handle the scores command
pub async fn handle_scores(ctx: &CommandContext, week: Option<Week>, json: bool) -> Result<()> {
    let week = ctx.resolve_week(week).await?;
    let league_id = ctx.account.league_id.clone();
    let (teams, matchups) = tokio::try_join!(
        ctx.source().fetch_teams(&league_id, ctx.season),
        ctx.source().fetch_matchups(&league_id, ctx.season, week),
    )?;

    let scores = matchup_scores(&teams, &matchups, week);
    emit(json, &scores, |s| render_scores(s, week))
}

fn score_line(side: &MatchupSide, teams: &[Team]) -> ScoreLine {
    let team_name = teams
        .iter()
        .find(|t| t.team_id == side.team_id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("Team {}", side.team_id));
    ScoreLine {
        team_id: side.team_id.clone(),
        team_name,
        points: side.points,
        projected: side.projected,
    }
}

/// Matchups in `week` with team names attached, ordered by matchup id.
pub fn matchup_scores(teams: &[Team], matchups: &[Matchup], week: Week) -> Vec<MatchupScore> {
    let mut scores: Vec<MatchupScore> = matchups
        .iter()
        .filter(|m| m.week == week)
        .map(|m| MatchupScore {
            week,
            matchup_id: m.matchup_id,
            home: score_line(&m.home, teams),
            away: m.away.as_ref().map(|a| score_line(a, teams)),
        })
        .collect();
    scores.sort_by_key(|s| s.matchup_id);
    scores
}

fn side_text(line: &ScoreLine) -> String {
    match line.projected {
        Some(p) => format!("{} {} (proj {})", line.team_name, pts(line.points), pts(p)),
        None => format!("{} {}", line.team_name, pts(line.points)),
    }
}

pub fn render_scores(scores: &[MatchupScore], week: Week) -> String {
    if scores.is_empty() {
        return format!("No matchups in week {}", week);
    }
    let mut out = format!("Week {} scores\n", week);
    for s in scores {
        match &s.away {
            Some(away) => out.push_str(&format!("  {}  vs  {}\n", side_text(&s.home), side_text(away))),
            None => out.push_str(&format!("  {}  (bye)\n", side_text(&s.home))),
        }
    }
    out
}
