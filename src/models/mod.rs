//! Unified data model shared by every platform.
//!
//! Platform modules normalize their payloads into these records; the
//! insight heuristics only ever see this shape.

mod snapshot;

pub use snapshot::LeagueSnapshot;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cli::types::{LeagueId, LineupSlot, Platform, PlayerId, Position, Season, TeamId, Week};
use crate::scoring::ScoringSettings;

/// Player injury designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InjuryStatus {
    #[default]
    Healthy,
    Probable,
    Questionable,
    Doubtful,
    Out,
    InjuredReserve,
    Suspended,
}

impl InjuryStatus {
    /// Parse the status strings used by Sleeper, ESPN and Yahoo.
    ///
    /// Anything unrecognised, including an empty string, is treated as healthy.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "P" | "PROBABLE" => InjuryStatus::Probable,
            "Q" | "QUESTIONABLE" | "DTD" | "DAY_TO_DAY" | "GTD" => InjuryStatus::Questionable,
            "D" | "DOUBTFUL" => InjuryStatus::Doubtful,
            "O" | "OUT" | "NA" | "COV" => InjuryStatus::Out,
            "IR" | "INJURY_RESERVE" | "INJURED_RESERVE" | "PUP" | "PUP_R" | "PUP_P" | "NFI"
            | "NFI_R" | "IR_R" => InjuryStatus::InjuredReserve,
            "SUS" | "SSPD" | "SUSPENSION" | "SUSPENDED" => InjuryStatus::Suspended,
            _ => InjuryStatus::Healthy,
        }
    }

    /// Fraction of expected output a player with this status delivers.
    pub fn availability(&self) -> f64 {
        match self {
            InjuryStatus::Healthy => 1.0,
            InjuryStatus::Probable => 0.95,
            InjuryStatus::Questionable => 0.85,
            InjuryStatus::Doubtful => 0.35,
            InjuryStatus::Out | InjuryStatus::InjuredReserve | InjuryStatus::Suspended => 0.0,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.availability() == 0.0
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InjuryStatus::Healthy => "Healthy",
            InjuryStatus::Probable => "Probable",
            InjuryStatus::Questionable => "Questionable",
            InjuryStatus::Doubtful => "Doubtful",
            InjuryStatus::Out => "Out",
            InjuryStatus::InjuredReserve => "IR",
            InjuryStatus::Suspended => "Suspended",
        };
        write!(f, "{}", s)
    }
}

/// Fantasy points a player scored in one week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPerformance {
    pub week: Week,
    pub points: f64,
    pub projected: Option<f64>,
}

/// A player as every platform sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub nfl_team: Option<String>,
    #[serde(default)]
    pub injury_status: InjuryStatus,
    pub bye_week: Option<u16>,
    /// Sorted by week.
    #[serde(default)]
    pub weekly: Vec<WeeklyPerformance>,
    /// Platform projection for the week the player was fetched for.
    pub projection: Option<f64>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            nfl_team: None,
            injury_status: InjuryStatus::Healthy,
            bye_week: None,
            weekly: Vec::new(),
            projection: None,
        }
    }

    /// Replace the weekly history, keeping it sorted and one entry per week.
    pub fn set_history(&mut self, mut weekly: Vec<WeeklyPerformance>) {
        weekly.sort_by_key(|w| w.week);
        weekly.dedup_by_key(|w| w.week);
        self.weekly = weekly;
    }

    /// Performances strictly before `week`.
    pub fn history_before(&self, week: Week) -> impl Iterator<Item = &WeeklyPerformance> {
        self.weekly.iter().filter(move |w| w.week < week)
    }

    /// Points scored in `week`, if recorded.
    pub fn points_in(&self, week: Week) -> Option<f64> {
        self.weekly.iter().find(|w| w.week == week).map(|w| w.points)
    }
}

/// Win/loss record and season point totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

impl Record {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Ties count as half a win; no games played is 0.0.
    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / games as f64
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ties > 0 {
            write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            write!(f, "{}-{}", self.wins, self.losses)
        }
    }
}

/// A fantasy roster within one league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub platform: Platform,
    pub league_id: LeagueId,
    pub team_id: TeamId,
    pub owner_id: Option<String>,
    pub name: String,
    pub owner_name: Option<String>,
    #[serde(default)]
    pub record: Record,
    #[serde(default)]
    pub players: Vec<PlayerId>,
    #[serde(default)]
    pub starters: Vec<PlayerId>,
    #[serde(default)]
    pub reserve: Vec<PlayerId>,
    /// FAAB spent so far, when the platform reports it.
    #[serde(default)]
    pub faab_used: Option<u32>,
}

impl Team {
    pub fn is_reserve(&self, player: &PlayerId) -> bool {
        self.reserve.contains(player)
    }

    pub fn is_starter(&self, player: &PlayerId) -> bool {
        self.starters.contains(player)
    }
}

/// How free agents are claimed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WaiverSettings {
    Faab { budget: u32 },
    #[default]
    Rolling,
}

/// League configuration relevant to the heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub platform: Platform,
    pub id: LeagueId,
    pub name: String,
    pub season: Season,
    pub current_week: Week,
    pub team_count: u32,
    pub scoring: ScoringSettings,
    pub roster_slots: Vec<LineupSlot>,
    #[serde(default)]
    pub waivers: WaiverSettings,
}

impl League {
    /// Starting slots only, in template order.
    pub fn starting_slots(&self) -> impl Iterator<Item = LineupSlot> + '_ {
        self.roster_slots.iter().copied().filter(|s| s.is_starting())
    }

    pub fn has_superflex(&self) -> bool {
        self.roster_slots.contains(&LineupSlot::SuperFlex)
    }
}

/// One side of a weekly head-to-head matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSide {
    pub team_id: TeamId,
    pub points: f64,
    pub projected: Option<f64>,
}

/// A weekly head-to-head pairing. `away == None` is a bye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub week: Week,
    pub matchup_id: u32,
    pub home: MatchupSide,
    pub away: Option<MatchupSide>,
}

impl Matchup {
    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home.team_id == team || self.away.as_ref().is_some_and(|a| &a.team_id == team)
    }

    /// `(own side, opponent side)` from `team`'s perspective.
    pub fn sides_for(&self, team: &TeamId) -> Option<(&MatchupSide, Option<&MatchupSide>)> {
        if &self.home.team_id == team {
            Some((&self.home, self.away.as_ref()))
        } else {
            match &self.away {
                Some(away) if &away.team_id == team => Some((away, Some(&self.home))),
                _ => None,
            }
        }
    }

    pub fn has_started(&self) -> bool {
        self.home.points > 0.0 || self.away.as_ref().is_some_and(|a| a.points > 0.0)
    }
}

/// Points one player scored in a week, as fetched from a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerWeekPoints {
    pub player_id: PlayerId,
    pub week: Week,
    pub points: f64,
    pub projected: Option<f64>,
}

impl From<&PlayerWeekPoints> for WeeklyPerformance {
    fn from(p: &PlayerWeekPoints) -> Self {
        WeeklyPerformance {
            week: p.week,
            points: p.points,
            projected: p.projected,
        }
    }
}
