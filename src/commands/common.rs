//! Shared setup for the league commands.
//!
//! Every command that reads a league resolves an account, wraps its platform
//! source in the TTL cache and opens the history store through
//! [`CommandContext`], then prints either text or JSON.

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    cli::{
        types::{Season, TeamId, Week},
        CommonArgs,
    },
    config::{AppConfig, LinkedAccount},
    error::{InsightsError, Result},
    models::LeagueSnapshot,
    platforms::{build_snapshot, source_for, PlatformSource},
    storage::PerformanceStore,
    TEAM_ID_ENV_VAR,
};

/// Context containing the resources a league command needs
pub struct CommandContext {
    pub account: LinkedAccount,
    pub season: Season,
    source: Box<dyn PlatformSource>,
    store: Option<PerformanceStore>,
}

impl CommandContext {
    /// Resolve the account from flags, env and config, then open its source and the store.
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let config = AppConfig::load()?;
        let account = config.resolve_account(&common.selector())?;
        debug!(
            account = %account.label,
            platform = %account.platform,
            league = %account.league_id,
            "resolved account"
        );
        let source = source_for(&account, &config, common.refresh)?;
        Ok(Self::with_source(account, common.season, source, open_store()))
    }

    pub fn with_source(
        account: LinkedAccount,
        season: Season,
        source: Box<dyn PlatformSource>,
        store: Option<PerformanceStore>,
    ) -> Self {
        Self {
            account,
            season,
            source,
            store,
        }
    }

    pub fn source(&self) -> &dyn PlatformSource {
        self.source.as_ref()
    }

    /// The source and the store together, for commands that write history.
    pub fn source_and_store(&mut self) -> (&dyn PlatformSource, Option<&mut PerformanceStore>) {
        (self.source.as_ref(), self.store.as_mut())
    }

    /// `week`, or the league's current week when none was given.
    pub async fn resolve_week(&self, week: Option<Week>) -> Result<Week> {
        match week {
            Some(week) => Ok(week),
            None => Ok(self
                .source
                .fetch_league(&self.account.league_id, self.season)
                .await?
                .current_week),
        }
    }

    /// Fetch the league snapshot for `week` (default: current week).
    pub async fn snapshot(&mut self, week: Option<Week>) -> Result<(LeagueSnapshot, Week)> {
        let week = self.resolve_week(week).await?;
        let snapshot = build_snapshot(
            self.source.as_ref(),
            self.store.as_mut(),
            &self.account.league_id,
            self.season,
            week,
        )
        .await?;
        Ok((snapshot, week))
    }

    /// The user's team; required by the per-team commands.
    pub fn team_id(&self) -> Result<TeamId> {
        self.account
            .team_id
            .clone()
            .ok_or_else(|| InsightsError::MissingTeam {
                env_var: TEAM_ID_ENV_VAR.to_string(),
            })
    }
}

/// Open the default history store, or run without one.
pub fn open_store() -> Option<PerformanceStore> {
    match PerformanceStore::open() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "history store unavailable; continuing without it");
            None
        }
    }
}

/// Print `value` as JSON when `json` is set, otherwise its text rendering.
pub fn emit<T, F>(json: bool, value: &T, render: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let text = render(value);
        if !text.is_empty() {
            println!("{}", text.trim_end());
        }
    }
    Ok(())
}

/// `12.3`
pub fn pts(points: f64) -> String {
    format!("{:.1}", points)
}

/// `62%`
pub fn pct(p: f64) -> String {
    format!("{:.0}%", p * 100.0)
}
