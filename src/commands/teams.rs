//! `teams` command: one line per linked account, fetched concurrently.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::task::JoinSet;
use tracing::warn;

use crate::{
    cli::{
        types::{Platform, Season, Week},
        CommonArgs,
    },
    config::{AppConfig, LinkedAccount},
    core::now_secs,
    models::{LeagueSnapshot, Record},
    platforms::{source_for, PlatformSource},
    Result,
};

use super::common::{emit, pts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub account: String,
    pub platform: Platform,
    pub league_name: Option<String>,
    pub team_name: Option<String>,
    pub record: Option<Record>,
    pub standings_rank: Option<usize>,
    pub team_count: usize,
    pub week: Option<Week>,
    pub points: Option<f64>,
    pub opponent_points: Option<f64>,
    /// Set when the account's league could not be fetched.
    pub error: Option<String>,
}

impl TeamSummary {
    fn failed(account: &LinkedAccount, error: String) -> Self {
        Self {
            account: account.label.clone(),
            platform: account.platform,
            league_name: None,
            team_name: None,
            record: None,
            standings_rank: None,
            team_count: 0,
            week: None,
            points: None,
            opponent_points: None,
            error: Some(error),
        }
    }
}

/// Handle the teams command
pub async fn handle_teams(common: &CommonArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let accounts = if config.accounts.is_empty() || common.account.is_some() || common.league_id.is_some() {
        vec![config.resolve_account(&common.selector())?]
    } else {
        config.accounts.clone()
    };

    let mut tasks = JoinSet::new();
    for (index, account) in accounts.into_iter().enumerate() {
        let config = config.clone();
        let (season, week, refresh) = (common.season, common.week, common.refresh);
        tasks.spawn(async move {
            let summary = match source_for(&account, &config, refresh) {
                Ok(source) => fetch_summary(source.as_ref(), &account, season, week).await,
                Err(e) => Err(e),
            };
            let summary = summary.unwrap_or_else(|e| {
                warn!(account = %account.label, error = %e, "could not load league");
                TeamSummary::failed(&account, e.to_string())
            });
            (index, summary)
        });
    }

    let mut summaries: Vec<(usize, TeamSummary)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(done) => summaries.push(done),
            Err(e) => warn!(error = %e, "team summary task failed"),
        }
    }
    summaries.sort_by_key(|(index, _)| *index);
    let summaries: Vec<TeamSummary> = summaries.into_iter().map(|(_, s)| s).collect();

    emit(common.json, &summaries, |s| render_teams(s))
}

/// League, rosters and matchups for one account, without the player pool.
pub async fn fetch_summary(
    source: &dyn PlatformSource,
    account: &LinkedAccount,
    season: Season,
    week: Option<Week>,
) -> Result<TeamSummary> {
    let league = source.fetch_league(&account.league_id, season).await?;
    let week = week.unwrap_or(league.current_week);
    let (teams, matchups) = tokio::try_join!(
        source.fetch_teams(&account.league_id, season),
        source.fetch_matchups(&account.league_id, season, week),
    )?;

    let snapshot = LeagueSnapshot {
        league,
        teams,
        players: HashMap::new(),
        matchups,
        fetched_at: now_secs(),
    };
    Ok(summarize(&snapshot, account, week))
}

pub fn summarize(snapshot: &LeagueSnapshot, account: &LinkedAccount, week: Week) -> TeamSummary {
    let team = account.team_id.as_ref().and_then(|id| snapshot.team(id));
    let sides = team
        .and_then(|t| snapshot.matchup_for(&t.team_id, week))
        .zip(team)
        .and_then(|(m, t)| m.sides_for(&t.team_id));

    TeamSummary {
        account: account.label.clone(),
        platform: account.platform,
        league_name: Some(snapshot.league.name.clone()),
        team_name: team.map(|t| t.name.clone()),
        record: team.map(|t| t.record),
        standings_rank: team.and_then(|t| snapshot.standings_rank(&t.team_id)),
        team_count: snapshot.teams.len(),
        week: Some(week),
        points: sides.map(|(own, _)| own.points),
        opponent_points: sides.and_then(|(_, opp)| opp.map(|o| o.points)),
        error: None,
    }
}

pub fn render_teams(summaries: &[TeamSummary]) -> String {
    let mut out = String::new();
    for s in summaries {
        if let Some(error) = &s.error {
            out.push_str(&format!("{} [{}]: error: {}\n", s.account, s.platform, error));
            continue;
        }
        let league = s.league_name.as_deref().unwrap_or("?");
        let Some(team) = &s.team_name else {
            out.push_str(&format!(
                "{} [{}] {}: no team selected ({} teams)\n",
                s.account, s.platform, league, s.team_count
            ));
            continue;
        };
        let record = s.record.map(|r| r.to_string()).unwrap_or_default();
        let rank = s
            .standings_rank
            .map(|r| format!(", #{} of {}", r, s.team_count))
            .unwrap_or_default();
        let score = match (s.week, s.points, s.opponent_points) {
            (Some(w), Some(p), Some(o)) => format!(" | week {}: {} - {}", w, pts(p), pts(o)),
            (Some(w), Some(p), None) => format!(" | week {}: {} (bye)", w, pts(p)),
            _ => String::new(),
        };
        out.push_str(&format!(
            "{} [{}] {}: {} ({}{}){}\n",
            s.account, s.platform, league, team, record, rank, score
        ));
    }
    out
}
