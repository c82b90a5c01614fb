//! Sleeper (https://docs.sleeper.com): public, unauthenticated REST API.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::{f64_field, id_string, str_field, u64_field, value_as_f64, PlatformSource};
use crate::cli::types::{LeagueId, LineupSlot, Platform, PlayerId, Position, Season, TeamId, Week};
use crate::core::http::{build_client, get_json};
use crate::error::{InsightsError, Result};
use crate::models::{
    InjuryStatus, League, Matchup, MatchupSide, Player, PlayerWeekPoints, Record, Team,
    WaiverSettings,
};
use crate::scoring::{ScoringSettings, StatLine};

#[cfg(test)]
mod tests;

/// Base path for Sleeper's v1 API.
pub const SLEEPER_BASE_URL: &str = "https://api.sleeper.app/v1";

/// Sleeper's `waiver_type` for FAAB bidding.
const WAIVER_TYPE_FAAB: u64 = 2;

type PlayerIndex = HashMap<String, Player>;

pub struct SleeperSource {
    client: Client,
    base_url: String,
    // `players/nfl` is several megabytes; fetch it once per process.
    player_index: Mutex<Option<Arc<PlayerIndex>>>,
}

impl SleeperSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(SLEEPER_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            player_index: Mutex::new(None),
        })
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        get_json(&self.client, &url, &[], &HeaderMap::new()).await
    }

    async fn player_index(&self) -> Result<Arc<PlayerIndex>> {
        let cached = self
            .player_index
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(index) = cached {
            return Ok(index);
        }

        let raw = self.get("players/nfl").await?;
        let index = Arc::new(parse_player_index(&raw));
        info!(players = index.len(), "loaded Sleeper player index");

        *self.player_index.lock().unwrap_or_else(|p| p.into_inner()) = Some(Arc::clone(&index));
        Ok(index)
    }

    async fn stat_lines(
        &self,
        kind: &str,
        season: Season,
        week: Week,
    ) -> Result<HashMap<String, StatLine>> {
        let raw = self
            .get(&format!("{}/nfl/regular/{}/{}", kind, season, week))
            .await?;
        Ok(parse_stat_lines(&raw))
    }
}

#[async_trait]
impl PlatformSource for SleeperSource {
    fn platform(&self) -> Platform {
        Platform::Sleeper
    }

    async fn fetch_league(&self, league_id: &LeagueId, _season: Season) -> Result<League> {
        let raw = self.get(&format!("league/{}", league_id)).await?;
        parse_league(&raw)
    }

    async fn fetch_teams(&self, league_id: &LeagueId, _season: Season) -> Result<Vec<Team>> {
        let rosters = self.get(&format!("league/{}/rosters", league_id)).await?;
        let users = self.get(&format!("league/{}/users", league_id)).await?;
        parse_teams(league_id, &rosters, &users)
    }

    async fn fetch_players(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Player>> {
        let league = self.fetch_league(league_id, season).await?;
        let teams = self.fetch_teams(league_id, season).await?;
        let index = self.player_index().await?;

        let projections = match self.stat_lines("projections", season, week).await {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "Sleeper projections unavailable");
                HashMap::new()
            }
        };

        let rostered: HashSet<&PlayerId> = teams.iter().flat_map(|t| t.players.iter()).collect();
        Ok(select_player_pool(&index, &rostered, &projections, &league.scoring))
    }

    async fn fetch_matchups(
        &self,
        league_id: &LeagueId,
        _season: Season,
        week: Week,
    ) -> Result<Vec<Matchup>> {
        let raw = self
            .get(&format!("league/{}/matchups/{}", league_id, week))
            .await?;
        parse_matchups(week, &raw)
    }

    async fn fetch_weekly_points(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<PlayerWeekPoints>> {
        let league = self.fetch_league(league_id, season).await?;
        let index = self.player_index().await?;
        let stats = self.stat_lines("stats", season, week).await?;
        let projections = self
            .stat_lines("projections", season, week)
            .await
            .unwrap_or_default();

        Ok(score_week(&index, &stats, &projections, &league.scoring, week))
    }
}

/// Sleeper's `scoring_settings` object → [`ScoringSettings`].
///
/// `bonus_rec_{te,rb,wr}` become reception overrides for that position.
pub fn scoring_from_sleeper(raw: &Value) -> ScoringSettings {
    let mut settings = ScoringSettings::new();
    let Some(map) = raw.as_object() else {
        return settings;
    };

    for (key, value) in map {
        if key.starts_with("bonus_rec_") {
            continue;
        }
        if let Some(points) = value_as_f64(value) {
            settings.set_rule(key, points);
        }
    }

    let base_rec = settings.reception_points();
    for (suffix, position) in [("te", Position::TE), ("rb", Position::RB), ("wr", Position::WR)] {
        if let Some(bonus) = map.get(&format!("bonus_rec_{}", suffix)).and_then(value_as_f64) {
            if bonus != 0.0 {
                settings.set_override("rec", position, base_rec + bonus);
            }
        }
    }

    settings
}

pub fn parse_league(raw: &Value) -> Result<League> {
    let id = raw
        .get("league_id")
        .and_then(id_string)
        .ok_or_else(|| InsightsError::missing_field(Platform::Sleeper, "league_id"))?;
    let settings = raw.get("settings").cloned().unwrap_or(Value::Null);

    let season = str_field(raw, "season")
        .and_then(|s| s.parse().ok())
        .map(Season::new)
        .unwrap_or_default();

    let current_week = u64_field(&settings, "leg")
        .filter(|w| *w > 0)
        .or_else(|| u64_field(&settings, "last_scored_leg").map(|w| w + 1))
        .map(|w| Week::new(w as u16))
        .unwrap_or_default();

    let roster_slots = raw
        .get("roster_positions")
        .and_then(|v| v.as_array())
        .map(|slots| {
            slots
                .iter()
                .filter_map(|s| s.as_str())
                .filter_map(|s| s.parse::<LineupSlot>().ok())
                .collect()
        })
        .unwrap_or_default();

    let waivers = if u64_field(&settings, "waiver_type") == Some(WAIVER_TYPE_FAAB) {
        WaiverSettings::Faab {
            budget: u64_field(&settings, "waiver_budget").unwrap_or(100) as u32,
        }
    } else {
        WaiverSettings::Rolling
    };

    Ok(League {
        platform: Platform::Sleeper,
        id: LeagueId::new(id),
        name: str_field(raw, "name").unwrap_or("Sleeper League").to_string(),
        season,
        current_week,
        team_count: u64_field(raw, "total_rosters").unwrap_or(0) as u32,
        scoring: scoring_from_sleeper(raw.get("scoring_settings").unwrap_or(&Value::Null)),
        roster_slots,
        waivers,
    })
}

/// Sleeper splits points into an integer and a hundredths field.
fn split_points(settings: &Value, whole: &str, decimal: &str) -> f64 {
    f64_field(settings, whole).unwrap_or(0.0) + f64_field(settings, decimal).unwrap_or(0.0) / 100.0
}

fn id_list(v: &Value, key: &str) -> Vec<PlayerId> {
    v.get(key)
        .and_then(|x| x.as_array())
        .map(|ids| {
            ids.iter()
                .filter_map(id_string)
                // Empty starter slots are sent as "0"
                .filter(|id| id != "0")
                .map(PlayerId::new)
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_teams(league_id: &LeagueId, rosters: &Value, users: &Value) -> Result<Vec<Team>> {
    let rosters = rosters
        .as_array()
        .ok_or_else(|| InsightsError::missing_field(Platform::Sleeper, "rosters"))?;

    let users_by_id: HashMap<String, &Value> = users
        .as_array()
        .map(|u| {
            u.iter()
                .filter_map(|user| user.get("user_id").and_then(id_string).map(|id| (id, user)))
                .collect()
        })
        .unwrap_or_default();

    rosters
        .iter()
        .map(|roster| {
            let roster_id = roster
                .get("roster_id")
                .and_then(id_string)
                .ok_or_else(|| InsightsError::missing_field(Platform::Sleeper, "roster_id"))?;
            let owner_id = roster.get("owner_id").and_then(id_string);
            let user = owner_id.as_ref().and_then(|id| users_by_id.get(id));

            let owner_name = user.and_then(|u| str_field(u, "display_name")).map(String::from);
            let name = user
                .and_then(|u| u.get("metadata"))
                .and_then(|m| str_field(m, "team_name"))
                .filter(|n| !n.is_empty())
                .map(String::from)
                .or_else(|| owner_name.clone())
                .unwrap_or_else(|| format!("Team {}", roster_id));

            let settings = roster.get("settings").cloned().unwrap_or(Value::Null);
            let record = Record {
                wins: u64_field(&settings, "wins").unwrap_or(0) as u32,
                losses: u64_field(&settings, "losses").unwrap_or(0) as u32,
                ties: u64_field(&settings, "ties").unwrap_or(0) as u32,
                points_for: split_points(&settings, "fpts", "fpts_decimal"),
                points_against: split_points(&settings, "fpts_against", "fpts_against_decimal"),
            };

            Ok(Team {
                platform: Platform::Sleeper,
                league_id: league_id.clone(),
                team_id: TeamId::new(roster_id),
                owner_id,
                name,
                owner_name,
                record,
                players: id_list(roster, "players"),
                starters: id_list(roster, "starters"),
                reserve: id_list(roster, "reserve"),
                faab_used: u64_field(&settings, "waiver_budget_used").map(|u| u as u32),
            })
        })
        .collect()
}

/// One entry of `players/nfl`. Non-fantasy positions yield `None`.
pub fn parse_player(id: &str, raw: &Value) -> Option<Player> {
    let position: Position = str_field(raw, "position")?.parse().ok()?;

    let name = str_field(raw, "full_name")
        .map(String::from)
        .or_else(|| {
            let first = str_field(raw, "first_name")?;
            let last = str_field(raw, "last_name").unwrap_or("");
            Some(format!("{} {}", first, last).trim().to_string())
        })
        .unwrap_or_else(|| id.to_string());

    let mut player = Player::new(id, name, position);
    player.nfl_team = str_field(raw, "team").map(String::from);
    player.injury_status = str_field(raw, "injury_status")
        .map(InjuryStatus::parse)
        .unwrap_or_default();
    Some(player)
}

pub fn parse_player_index(raw: &Value) -> PlayerIndex {
    raw.as_object()
        .map(|players| {
            players
                .iter()
                .filter_map(|(id, v)| parse_player(id, v).map(|p| (id.clone(), p)))
                .collect()
        })
        .unwrap_or_default()
}

/// Rostered players plus unrostered players signed to an NFL team, with `week` projections attached.
pub fn select_player_pool(
    index: &PlayerIndex,
    rostered: &HashSet<&PlayerId>,
    projections: &HashMap<String, StatLine>,
    scoring: &ScoringSettings,
) -> Vec<Player> {
    index
        .values()
        .filter(|p| rostered.contains(&p.id) || p.nfl_team.is_some())
        .map(|p| {
            let mut player = p.clone();
            player.projection = projections
                .get(player.id.as_str())
                .map(|line| scoring.points_for(line, player.position));
            player
        })
        .collect()
}

/// `stats/...` and `projections/...` responses: player id → stat line.
pub fn parse_stat_lines(raw: &Value) -> HashMap<String, StatLine> {
    let Some(map) = raw.as_object() else {
        return HashMap::new();
    };
    map.iter()
        .filter_map(|(id, stats)| {
            let line: StatLine = stats
                .as_object()?
                .iter()
                .filter_map(|(k, v)| value_as_f64(v).map(|n| (k.clone(), n)))
                .collect();
            Some((id.clone(), line))
        })
        .collect()
}

/// Score one week of raw stats with the league's settings.
pub fn score_week(
    index: &PlayerIndex,
    stats: &HashMap<String, StatLine>,
    projections: &HashMap<String, StatLine>,
    scoring: &ScoringSettings,
    week: Week,
) -> Vec<PlayerWeekPoints> {
    let mut points: Vec<PlayerWeekPoints> = stats
        .iter()
        .filter_map(|(id, line)| {
            let player = index.get(id)?;
            Some(PlayerWeekPoints {
                player_id: player.id.clone(),
                week,
                points: scoring.points_for(line, player.position),
                projected: projections
                    .get(id)
                    .map(|p| scoring.points_for(p, player.position)),
            })
        })
        .collect();
    points.sort_by(|a, b| a.player_id.cmp(&b.player_id));
    points
}

pub fn parse_matchups(week: Week, raw: &Value) -> Result<Vec<Matchup>> {
    let entries = raw
        .as_array()
        .ok_or_else(|| InsightsError::missing_field(Platform::Sleeper, "matchups"))?;

    let mut by_matchup: HashMap<u32, Vec<MatchupSide>> = HashMap::new();
    let mut byes = Vec::new();

    for entry in entries {
        let team_id = entry
            .get("roster_id")
            .and_then(id_string)
            .ok_or_else(|| InsightsError::missing_field(Platform::Sleeper, "roster_id"))?;
        let side = MatchupSide {
            team_id: TeamId::new(team_id),
            points: f64_field(entry, "custom_points")
                .or_else(|| f64_field(entry, "points"))
                .unwrap_or(0.0),
            projected: None,
        };
        match u64_field(entry, "matchup_id") {
            Some(id) => by_matchup.entry(id as u32).or_default().push(side),
            None => byes.push(side),
        }
    }

    let mut matchups: Vec<Matchup> = by_matchup
        .into_iter()
        .filter_map(|(matchup_id, mut sides)| {
            sides.sort_by(|a, b| a.team_id.cmp(&b.team_id));
            let mut sides = sides.into_iter();
            let home = sides.next()?;
            Some(Matchup {
                week,
                matchup_id,
                home,
                away: sides.next(),
            })
        })
        .collect();
    matchups.sort_by_key(|m| m.matchup_id);

    let next_id = matchups.iter().map(|m| m.matchup_id).max().unwrap_or(0);
    matchups.extend(byes.into_iter().enumerate().map(|(i, home)| Matchup {
        week,
        matchup_id: next_id + 1 + i as u32,
        home,
        away: None,
    }));

    Ok(matchups)
}
