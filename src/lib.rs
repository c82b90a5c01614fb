//! Fantasy Football Insights Library
//!
//! Reads leagues from Sleeper, ESPN and Yahoo into one shared model and
//! derives roster advice from it: start/sit calls, positional needs, waiver
//! targets with FAAB bids, trade values and matchup odds.
//!
//! ## Features
//!
//! - **Platform Unification**: One [`platforms::PlatformSource`] contract per provider
//! - **Custom Scoring**: Fantasy points from raw stat lines under any league's rules
//! - **Roster Insights**: Pure heuristics over a [`LeagueSnapshot`]
//! - **Local History**: Weekly points kept in SQLite so past weeks are fetched once
//! - **Response Caching**: TTL cache in memory and on disk
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fantasy_insights::{
//!     insights::generate_insights,
//!     platforms::{build_snapshot, sleeper::SleeperSource},
//!     LeagueId, Season, TeamId, Week,
//! };
//!
//! # async fn example() -> fantasy_insights::Result<()> {
//! let source = SleeperSource::new()?;
//! let snapshot = build_snapshot(
//!     &source,
//!     None,
//!     &LeagueId::new("1048370074631045120"),
//!     Season::new(2025),
//!     Week::new(6),
//! )
//! .await?;
//!
//! let report = generate_insights(&snapshot, &TeamId::new("3"), Week::new(6), 5)?;
//! for line in &report.headlines {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Select a league without passing flags, and supply private-league credentials:
//! ```bash
//! export FANTASY_PLATFORM=espn
//! export FANTASY_LEAGUE_ID=123456
//! export FANTASY_TEAM_ID=4
//! export ESPN_S2=... ESPN_SWID={...}
//! export YAHOO_ACCESS_TOKEN=...
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod insights;
pub mod logging;
pub mod models;
pub mod platforms;
pub mod scoring;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use cli::types::{LeagueId, LineupSlot, Platform, PlayerId, Position, Season, TeamId, Week};
pub use error::{InsightsError, Result};
pub use models::{League, LeagueSnapshot, Player, Team};
pub use scoring::ScoringSettings;

pub const PLATFORM_ENV_VAR: &str = "FANTASY_PLATFORM";
pub const LEAGUE_ID_ENV_VAR: &str = "FANTASY_LEAGUE_ID";
pub const TEAM_ID_ENV_VAR: &str = "FANTASY_TEAM_ID";
pub const ESPN_S2_ENV_VAR: &str = "ESPN_S2";
pub const ESPN_SWID_ENV_VAR: &str = "ESPN_SWID";
pub const YAHOO_TOKEN_ENV_VAR: &str = "YAHOO_ACCESS_TOKEN";
