//! CLI argument definitions and parsing.

pub mod types;

use clap::{Args, Parser, Subcommand};
use types::{LeagueId, Platform, Season, TeamId, Week};

use crate::config::AccountSelector;

/// Flags shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Platform: sleeper, espn or yahoo (or set `FANTASY_PLATFORM` env var).
    #[clap(long, global = true)]
    pub platform: Option<Platform>,

    /// League ID (or set `FANTASY_LEAGUE_ID` env var).
    #[clap(long, short, global = true)]
    pub league_id: Option<LeagueId>,

    /// Your team within the league (or set `FANTASY_TEAM_ID` env var).
    #[clap(long, short, global = true)]
    pub team_id: Option<TeamId>,

    /// Linked account label to use instead of the first one.
    #[clap(long, short, global = true)]
    pub account: Option<String>,

    /// Season year (e.g. 2025).
    #[clap(long, short, default_value_t = Season::default(), global = true)]
    pub season: Season,

    /// Week; defaults to the league's current week.
    #[clap(long, short, global = true)]
    pub week: Option<Week>,

    /// Output results as JSON instead of text lines.
    #[clap(long, global = true)]
    pub json: bool,

    /// Ignore cached platform responses and fetch fresh data.
    #[clap(long, global = true)]
    pub refresh: bool,

    /// Log debug output to stderr.
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn selector(&self) -> AccountSelector {
        AccountSelector {
            platform: self.platform,
            league_id: self.league_id.clone(),
            team_id: self.team_id.clone(),
            account: self.account.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum AccountsCmd {
    /// Show linked accounts
    List,

    /// Link a league (and optionally your team in it)
    Add {
        /// Platform hosting the league.
        #[clap(long, value_name = "PLATFORM")]
        on: Platform,

        /// League ID on that platform.
        #[clap(long, value_name = "LEAGUE_ID")]
        league: LeagueId,

        /// Your team ID in the league.
        #[clap(long, value_name = "TEAM_ID")]
        team: Option<TeamId>,

        /// Name to refer to the account by; defaults to `platform:league`.
        #[clap(long)]
        label: Option<String>,
    },

    /// Unlink an account by label
    Remove { label: String },
}

#[derive(Debug, Subcommand)]
pub enum TradeCmd {
    /// Trade value of players, or your trade chips when no names are given
    Value {
        /// Player name (substring match) - repeatable: `-n Smith -n Johnson`.
        #[clap(long = "player-name", short = 'n')]
        names: Vec<String>,
    },

    /// Compare what you give with what you get
    Evaluate {
        /// Player you send (repeatable).
        #[clap(long, required = true)]
        give: Vec<String>,

        /// Player you receive (repeatable).
        #[clap(long, required = true)]
        get: Vec<String>,
    },
}

#[derive(Debug, Parser)]
#[clap(
    name = "fantasy-insights",
    about = "Lineup, waiver and trade advice for Sleeper, ESPN and Yahoo leagues"
)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage linked fantasy accounts
    Accounts {
        #[clap(subcommand)]
        cmd: AccountsCmd,
    },

    /// Team, record, rank and this week's score for every linked account
    Teams,

    /// Matchup scores for the selected league and week
    Scores,

    /// Start/sit labels and recommended lineup changes
    Lineup,

    /// Free agents worth claiming, with FAAB bids
    Waivers {
        /// Maximum number of targets to show.
        #[clap(long, default_value_t = 10)]
        limit: usize,
    },

    /// Player trade values and trade evaluation
    Trade {
        #[clap(subcommand)]
        cmd: TradeCmd,
    },

    /// Full report: lineup, needs, strategy, waivers, trades and matchup
    Insights {
        /// Maximum number of waiver targets in the report.
        #[clap(long, default_value_t = 5)]
        limit: usize,
    },

    /// Fill the local history store with weekly points
    Sync {
        /// Sync weeks 1 through this week (inclusive).
        #[clap(long)]
        through_week: Week,

        /// Overwrite weeks that are already stored.
        #[clap(long)]
        force: bool,
    },
}
