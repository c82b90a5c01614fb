//! Assemble a [`LeagueSnapshot`] from a source and the history store.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::PlatformSource;
use crate::cli::types::{LeagueId, PlayerId, Season, Week};
use crate::core::now_secs;
use crate::error::Result;
use crate::models::{LeagueSnapshot, PlayerWeekPoints, WeeklyPerformance};
use crate::storage::PerformanceStore;

/// Fetch everything the insights need about one league for `week`.
///
/// Weekly history for weeks before `week` comes from `store` when it has
/// them; missing weeks are fetched from the platform and written back. Any
/// store failure is logged and the snapshot is built from fetched data alone.
pub async fn build_snapshot(
    source: &dyn PlatformSource,
    mut store: Option<&mut PerformanceStore>,
    league_id: &LeagueId,
    season: Season,
    week: Week,
) -> Result<LeagueSnapshot> {
    let (league, teams, players, matchups) = tokio::try_join!(
        source.fetch_league(league_id, season),
        source.fetch_teams(league_id, season),
        source.fetch_players(league_id, season, week),
        source.fetch_matchups(league_id, season, week),
    )?;

    let mut history = load_history(source, store.as_deref_mut(), league_id, season, week).await;

    if let Some(store) = store {
        for player in &players {
            if let Err(e) = store.upsert_player(source.platform(), player) {
                warn!(error = %e, "could not store player; continuing without");
                break;
            }
        }
    }

    let players = players
        .into_iter()
        .map(|mut player| {
            if let Some(weekly) = history.remove(&player.id) {
                player.set_history(weekly);
            }
            (player.id.clone(), player)
        })
        .collect();

    Ok(LeagueSnapshot {
        league,
        teams,
        players,
        matchups,
        fetched_at: now_secs(),
    })
}

/// Performances for weeks `1..week`, keyed by player.
async fn load_history(
    source: &dyn PlatformSource,
    mut store: Option<&mut PerformanceStore>,
    league_id: &LeagueId,
    season: Season,
    week: Week,
) -> HashMap<PlayerId, Vec<WeeklyPerformance>> {
    let platform = source.platform();
    let mut fetched: Vec<PlayerWeekPoints> = Vec::new();

    for past in week.previous_weeks() {
        let check = store
            .as_deref()
            .map(|s| s.has_week(platform, league_id, season, past));
        let stored = match check {
            Some(Ok(found)) => found,
            Some(Err(e)) => {
                warn!(error = %e, "history store unreadable; fetching all weeks");
                store = None;
                false
            }
            None => false,
        };
        if stored {
            continue;
        }

        let rows = match source.fetch_weekly_points(league_id, season, past).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(week = past.as_u16(), error = %e, "could not fetch weekly points; skipping week");
                continue;
            }
        };
        debug!(week = past.as_u16(), players = rows.len(), "fetched weekly points");

        let write = store
            .as_deref_mut()
            .map(|s| s.upsert_week_points(platform, league_id, season, &rows, false));
        if let Some(Err(e)) = write {
            warn!(error = %e, "could not store weekly points; continuing without store");
            store = None;
        }
        fetched.extend(rows);
    }

    let mut history = match store.as_deref() {
        Some(s) => s
            .weekly_history(platform, league_id, season, week)
            .unwrap_or_else(|e| {
                warn!(error = %e, "could not read history store");
                HashMap::new()
            }),
        None => HashMap::new(),
    };

    for row in &fetched {
        history
            .entry(row.player_id.clone())
            .or_default()
            .push(WeeklyPerformance::from(row));
    }
    history
}
