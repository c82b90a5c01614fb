//! Linked accounts and cache lifetimes, stored as JSON in the user config directory.
//!
//! Which league a command runs against is resolved from, in order: explicit
//! CLI flags, the `FANTASY_*` environment variables, then a linked account
//! (named by `--account`, or the first one).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::cli::types::{LeagueId, Platform, TeamId};
use crate::core::{try_read_to_string, write_string};
use crate::error::{InsightsError, Result};
use crate::{LEAGUE_ID_ENV_VAR, PLATFORM_ENV_VAR, TEAM_ID_ENV_VAR};


/// One fantasy team the user follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub platform: Platform,
    pub league_id: LeagueId,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    pub label: String,
}

impl LinkedAccount {
    /// Label used when none is given: `sleeper:123`.
    pub fn default_label(platform: Platform, league_id: &LeagueId) -> String {
        format!("{}:{}", platform.tag(), league_id)
    }
}

/// Seconds each class of platform data stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheTtls {
    /// Matchups and weekly points
    pub live_secs: u64,
    /// Player pools and projections
    pub players_secs: u64,
    /// League settings and rosters
    pub league_secs: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            live_secs: 120,
            players_secs: 6 * 60 * 60,
            league_secs: 60 * 60,
        }
    }
}

impl CacheTtls {
    pub fn live(&self) -> Duration {
        Duration::from_secs(self.live_secs)
    }

    pub fn players(&self) -> Duration {
        Duration::from_secs(self.players_secs)
    }

    pub fn league(&self) -> Duration {
        Duration::from_secs(self.league_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub accounts: Vec<LinkedAccount>,
    #[serde(default)]
    pub cache: CacheTtls,
}

/// What the user asked for on the command line; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct AccountSelector {
    pub platform: Option<Platform>,
    pub league_id: Option<LeagueId>,
    pub team_id: Option<TeamId>,
    pub account: Option<String>,
}

/// `~/.config/fantasy-insights/config.json` (platform equivalent).
pub fn config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".config");
        home
    });
    base.join("fantasy-insights").join("config.json")
}

impl AppConfig {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from `path`; a missing file is an empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        match try_read_to_string(path) {
            Some(s) => Ok(serde_json::from_str(&s)?),
            None => {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        write_string(path, &serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn account(&self, label: &str) -> Option<&LinkedAccount> {
        self.accounts.iter().find(|a| a.label == label)
    }

    /// Add `account`, replacing any existing account with the same label.
    pub fn add_account(&mut self, account: LinkedAccount) {
        match self.accounts.iter_mut().find(|a| a.label == account.label) {
            Some(existing) => *existing = account,
            None => self.accounts.push(account),
        }
    }

    pub fn remove_account(&mut self, label: &str) -> Result<LinkedAccount> {
        let index = self
            .accounts
            .iter()
            .position(|a| a.label == label)
            .ok_or_else(|| InsightsError::UnknownAccount {
                label: label.to_string(),
            })?;
        Ok(self.accounts.remove(index))
    }

    /// Resolve the account a command should use, reading the process environment.
    pub fn resolve_account(&self, selector: &AccountSelector) -> Result<LinkedAccount> {
        self.resolve_with_env(selector, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with_env<F>(&self, selector: &AccountSelector, env: F) -> Result<LinkedAccount>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let env_platform = env_value(PLATFORM_ENV_VAR)
            .map(|p| p.parse::<Platform>())
            .transpose()?;
        let env_league = env_value(LEAGUE_ID_ENV_VAR).map(LeagueId::new);
        let env_team = env_value(TEAM_ID_ENV_VAR).map(TeamId::new);

        let explicit_league = selector.league_id.clone().or(env_league);
        // A stored account keeps its own platform unless the league came from outside it.
        let env_platform = env_platform.filter(|_| explicit_league.is_some());

        let base = match &selector.account {
            Some(label) => Some(self.account(label).ok_or_else(|| {
                InsightsError::UnknownAccount {
                    label: label.clone(),
                }
            })?),
            None if explicit_league.is_none() => self.accounts.first(),
            None => None,
        };

        let league_id = explicit_league
            .or_else(|| base.map(|b| b.league_id.clone()))
            .ok_or_else(|| InsightsError::MissingLeague {
                env_var: LEAGUE_ID_ENV_VAR.to_string(),
            })?;
        let platform = selector
            .platform
            .or(env_platform)
            .or(base.map(|b| b.platform))
            .unwrap_or(Platform::Sleeper);
        let team_id = selector
            .team_id
            .clone()
            .or(env_team)
            .or_else(|| base.and_then(|b| b.team_id.clone()));
        let label = base
            .map(|b| b.label.clone())
            .unwrap_or_else(|| LinkedAccount::default_label(platform, &league_id));

        Ok(LinkedAccount {
            platform,
            league_id,
            team_id,
            label,
        })
    }
}
