//! Season approach and risk tolerance derived from a team analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::team_analysis::{NeedLevel, TeamAnalysis, TeamSituation};
use crate::cli::types::{Position, Week};
use crate::models::{League, WaiverSettings};

/// From this week on, bubble teams chase upside to reach the playoffs.
const LATE_SEASON_WEEK: u16 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approach {
    WinNow,
    Balanced,
    Rebuild,
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Approach::WinNow => "Win now",
            Approach::Balanced => "Balanced",
            Approach::Rebuild => "Rebuild",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStrategy {
    pub approach: Approach,
    /// 0 favours floors, 1 favours ceilings.
    pub risk_tolerance: f64,
    pub priorities: Vec<String>,
    /// Positions to improve, most urgent first.
    pub focus_positions: Vec<Position>,
}

fn join(positions: &[Position]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn build_strategy(analysis: &TeamAnalysis, league: &League, week: Week) -> TeamStrategy {
    let critical = analysis.positions_at(NeedLevel::CriticalNeed);
    let moderate = analysis.positions_at(NeedLevel::ModerateNeed);
    let strengths = analysis.positions_at(NeedLevel::Strength);
    let late = week.as_u16() >= LATE_SEASON_WEEK;

    let (approach, mut risk): (Approach, f64) = match analysis.situation {
        TeamSituation::Contender => (Approach::WinNow, 0.25),
        TeamSituation::Bubble => (Approach::Balanced, 0.5),
        TeamSituation::Rebuilding => (Approach::Rebuild, 0.75),
    };
    if approach == Approach::WinNow && critical.len() >= 2 {
        risk += 0.1;
    }
    if approach == Approach::Balanced && late {
        risk += 0.1;
    }

    let mut priorities = Vec::new();
    match approach {
        Approach::WinNow => {
            priorities.push("Start the highest-floor lineup every week".to_string());
            if !critical.is_empty() {
                priorities.push(format!("Fix {} before the playoffs", join(&critical)));
            }
            if matches!(league.waivers, WaiverSettings::Faab { .. }) {
                priorities.push("Spend FAAB on immediate starters".to_string());
            }
        }
        Approach::Balanced => {
            if late {
                priorities.push("Chase upside to climb into a playoff spot".to_string());
            } else {
                priorities.push("Buy players trending up while they are cheap".to_string());
            }
            if !critical.is_empty() || !moderate.is_empty() {
                let weak: Vec<Position> = critical.iter().chain(&moderate).copied().collect();
                priorities.push(format!("Stream matchups at {}", join(&weak)));
            }
        }
        Approach::Rebuild => {
            priorities.push("Favour upside over weekly floor".to_string());
            priorities.push("Sell veterans with proven production".to_string());
        }
    }
    if !strengths.is_empty() {
        priorities.push(format!("Trade from depth at {}", join(&strengths)));
    }

    TeamStrategy {
        approach,
        risk_tolerance: risk.clamp(0.0, 1.0),
        priorities,
        focus_positions: critical.into_iter().chain(moderate).collect(),
    }
}
