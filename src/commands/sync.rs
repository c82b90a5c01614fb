//! `sync` command: fill the history store with weekly points.
//!
//! Stored weeks are skipped unless `--force` is given, so repeated runs only
//! fetch what is missing.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    cli::types::{LeagueId, Season, Week},
    error::InsightsError,
    platforms::PlatformSource,
    storage::PerformanceStore,
    Result,
};

use super::common::{emit, CommandContext};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub fetched: Vec<Week>,
    pub skipped: Vec<Week>,
    pub failed: Vec<Week>,
    pub rows_written: usize,
    pub players_stored: usize,
}

/// Handle the sync command
pub async fn handle_sync(
    ctx: &mut CommandContext,
    through_week: Week,
    force: bool,
    json: bool,
) -> Result<()> {
    let league_id = ctx.account.league_id.clone();
    let season = ctx.season;
    let (source, store) = ctx.source_and_store();
    let store = store.ok_or_else(|| {
        InsightsError::Storage(anyhow::anyhow!(
            "history database at {} could not be opened",
            PerformanceStore::database_path().display()
        ))
    })?;

    if !json {
        println!(
            "Syncing {} league {} season {} through week {}",
            source.platform(),
            league_id,
            season,
            through_week
        );
    }
    let report = sync_weeks(source, store, &league_id, season, through_week, force).await?;
    emit(json, &report, |r| render_sync(r))
}

/// Fetch and store weeks `1..=through_week`; a week that fails to fetch is
/// recorded and the rest continue.
pub async fn sync_weeks(
    source: &dyn PlatformSource,
    store: &mut PerformanceStore,
    league_id: &LeagueId,
    season: Season,
    through_week: Week,
    force: bool,
) -> Result<SyncReport> {
    let platform = source.platform();
    let mut report = SyncReport::default();

    for week in (1..=through_week.as_u16()).map(Week::new) {
        if !force && store.has_week(platform, league_id, season, week)? {
            debug!(week = week.as_u16(), "week already stored");
            report.skipped.push(week);
            continue;
        }

        match source.fetch_weekly_points(league_id, season, week).await {
            Ok(rows) => {
                report.rows_written += store.upsert_week_points(platform, league_id, season, &rows, force)?;
                report.fetched.push(week);
            }
            Err(e) => {
                warn!(week = week.as_u16(), error = %e, "could not fetch weekly points");
                report.failed.push(week);
            }
        }
    }

    match source.fetch_players(league_id, season, through_week).await {
        Ok(players) => {
            for player in &players {
                store.upsert_player(platform, player)?;
            }
            report.players_stored = players.len();
        }
        Err(e) => warn!(error = %e, "could not fetch players; names not refreshed"),
    }

    Ok(report)
}

fn weeks(list: &[Week]) -> String {
    list.iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_sync(report: &SyncReport) -> String {
    let mut out = format!(
        "✓ Stored {} rows from {} week(s), {} players updated\n",
        report.rows_written,
        report.fetched.len(),
        report.players_stored
    );
    if !report.skipped.is_empty() {
        out.push_str(&format!("  already stored: {}\n", weeks(&report.skipped)));
    }
    if !report.failed.is_empty() {
        out.push_str(&format!("⚠ failed: {}\n", weeks(&report.failed)));
    }
    out
}
