//! Point-in-time view of one league.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{League, Matchup, Player, Team};
use crate::cli::types::{PlayerId, TeamId, Week};

/// Everything the insight heuristics need about one league, fetched together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub league: League,
    pub teams: Vec<Team>,
    pub players: HashMap<PlayerId, Player>,
    pub matchups: Vec<Matchup>,
    /// Unix seconds.
    pub fetched_at: u64,
}

impl LeagueSnapshot {
    pub fn team(&self, team_id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.team_id == team_id)
    }

    /// Players on `team` that are present in the player pool.
    ///
    /// Ids the platform listed but whose details were not returned are skipped.
    pub fn roster<'a>(&'a self, team: &'a Team) -> impl Iterator<Item = &'a Player> + 'a {
        team.players.iter().filter_map(|id| self.players.get(id))
    }

    pub fn rostered_ids(&self) -> HashSet<&PlayerId> {
        self.teams.iter().flat_map(|t| t.players.iter()).collect()
    }

    /// Players not on any roster in the league.
    pub fn free_agents(&self) -> Vec<&Player> {
        let rostered = self.rostered_ids();
        let mut agents: Vec<&Player> = self
            .players
            .values()
            .filter(|p| !rostered.contains(&p.id))
            .collect();
        agents.sort_by(|a, b| a.id.cmp(&b.id));
        agents
    }

    pub fn matchup_for(&self, team_id: &TeamId, week: Week) -> Option<&Matchup> {
        self.matchups
            .iter()
            .find(|m| m.week == week && m.involves(team_id))
    }

    pub fn opponent_of(&self, team_id: &TeamId, week: Week) -> Option<&Team> {
        let matchup = self.matchup_for(team_id, week)?;
        let (_, opponent) = matchup.sides_for(team_id)?;
        self.team(&opponent?.team_id)
    }

    /// Find a team by id, exact name or case-insensitive name substring.
    pub fn find_team(&self, query: &str) -> Option<&Team> {
        let needle = query.to_lowercase();
        self.teams
            .iter()
            .find(|t| t.team_id.as_str() == query)
            .or_else(|| self.teams.iter().find(|t| t.name == query))
            .or_else(|| {
                self.teams.iter().find(|t| {
                    t.name.to_lowercase().contains(&needle)
                        || t.owner_name
                            .as_ref()
                            .is_some_and(|o| o.to_lowercase().contains(&needle))
                        || t.owner_id.as_deref() == Some(query)
                })
            })
    }

    /// Case-insensitive substring match on player names.
    pub fn find_players(&self, query: &str) -> Vec<&Player> {
        let needle = query.to_lowercase();
        let mut found: Vec<&Player> = self
            .players
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// Rank of each team by points-for, 1-based, ties broken by win percentage.
    pub fn points_for_rank(&self, team_id: &TeamId) -> Option<usize> {
        let mut ordered: Vec<&Team> = self.teams.iter().collect();
        ordered.sort_by(|a, b| {
            b.record
                .points_for
                .partial_cmp(&a.record.points_for)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    b.record
                        .win_pct()
                        .partial_cmp(&a.record.win_pct())
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });
        ordered
            .iter()
            .position(|t| &t.team_id == team_id)
            .map(|i| i + 1)
    }

    /// Standings rank: win percentage, then points-for.
    pub fn standings_rank(&self, team_id: &TeamId) -> Option<usize> {
        let mut ordered: Vec<&Team> = self.teams.iter().collect();
        ordered.sort_by(|a, b| {
            b.record
                .win_pct()
                .partial_cmp(&a.record.win_pct())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    b.record
                        .points_for
                        .partial_cmp(&a.record.points_for)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });
        ordered
            .iter()
            .position(|t| &t.team_id == team_id)
            .map(|i| i + 1)
    }
}
