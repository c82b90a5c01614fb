//! Yahoo Fantasy Sports v2 read API (`format=json`).
//!
//! Yahoo's JSON is a mechanical translation of its XML: records arrive as
//! arrays of single-key fragments and collections as objects keyed `"0"`,
//! `"1"`, ... plus a `"count"`. [`flatten_fragments`] and
//! [`collection_items`] undo both.
//!
//! Requests need an OAuth bearer token in `YAHOO_ACCESS_TOKEN`; obtaining
//! one is left to the user.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::warn;

use super::{f64_field, id_string, str_field, u64_field, value_as_f64, PlatformSource};
use crate::cli::types::{LeagueId, LineupSlot, Platform, PlayerId, Position, Season, TeamId, Week};
use crate::core::http::{build_client, get_json};
use crate::error::{InsightsError, Result};
use crate::models::{
    InjuryStatus, League, Matchup, MatchupSide, Player, PlayerWeekPoints, Record, Team,
    WaiverSettings,
};
use crate::scoring::{stat_keys::yahoo_stat_key, ScoringSettings, StatLine};
use crate::YAHOO_TOKEN_ENV_VAR;


pub const YAHOO_BASE_URL: &str = "https://fantasysports.yahooapis.com/fantasy/v2";

/// Yahoo does not publish the FAAB budget in league settings; its default is $100.
const DEFAULT_FAAB_BUDGET: u32 = 100;

/// Free agents per page; Yahoo caps collections at 25.
const FREE_AGENT_PAGE: u32 = 25;

/// Yahoo's NFL game key for `season`. League keys are `{game}.l.{league}`.
pub fn nfl_game_key(season: Season) -> Option<u32> {
    let key = match season.as_u16() {
        2015 => 348,
        2016 => 359,
        2017 => 371,
        2018 => 380,
        2019 => 390,
        2020 => 399,
        2021 => 406,
        2022 => 414,
        2023 => 423,
        2024 => 449,
        2025 => 461,
        _ => return None,
    };
    Some(key)
}

/// Full league key for `league_id` in `season`.
///
/// Full keys are used as given. Bare numeric ids are qualified with the
/// season's game key, or with `nfl` (Yahoo's current game) for seasons
/// without a known key.
pub fn league_key(league_id: &LeagueId, season: Season) -> String {
    let id = league_id.as_str();
    if let Some((game, _)) = id.split_once(".l.") {
        if let Some(expected) = nfl_game_key(season) {
            if game != "nfl" && game != expected.to_string() {
                warn!(
                    league = id,
                    %season,
                    "Yahoo league key is from another season; using it as given"
                );
            }
        }
        return id.to_string();
    }

    match nfl_game_key(season) {
        Some(game) => format!("{}.l.{}", game, id),
        None => {
            warn!(%season, "no Yahoo game key for season; using the current NFL game");
            format!("nfl.l.{}", id)
        }
    }
}

/// Merge an array of single-key fragments, nested at any depth, into one object.
pub fn flatten_fragments(v: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    collect_fragments(v, &mut out);
    out
}

fn collect_fragments(v: &Value, out: &mut Map<String, Value>) {
    match v {
        Value::Array(items) => items.iter().for_each(|item| collect_fragments(item, out)),
        Value::Object(map) => {
            for (k, x) in map {
                out.insert(k.clone(), x.clone());
            }
        }
        _ => {}
    }
}

/// Entries of a Yahoo collection under `item_key`, in index order.
pub fn collection_items<'a>(v: &'a Value, item_key: &str) -> Vec<&'a Value> {
    let Some(map) = v.as_object() else {
        return Vec::new();
    };
    let mut indexed: Vec<(usize, &Value)> = map
        .iter()
        .filter_map(|(k, x)| Some((k.parse().ok()?, x.get(item_key)?)))
        .collect();
    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, x)| x).collect()
}

/// Flattened `fantasy_content.league`.
fn league_root(raw: &Value) -> Result<Value> {
    raw.pointer("/fantasy_content/league")
        .map(|l| Value::Object(flatten_fragments(l)))
        .ok_or_else(|| InsightsError::missing_field(Platform::Yahoo, "fantasy_content.league"))
}

pub struct YahooSource {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl YahooSource {
    pub fn new(access_token: &str) -> Result<Self> {
        Self::with_base_url(YAHOO_BASE_URL, access_token)
    }

    pub fn from_env() -> Result<Self> {
        let token = std::env::var(YAHOO_TOKEN_ENV_VAR).map_err(|_| {
            InsightsError::MissingCredentials {
                platform: Platform::Yahoo,
                env_var: YAHOO_TOKEN_ENV_VAR.to_string(),
            }
        })?;
        Self::new(&token)
    }

    pub fn with_base_url(base_url: impl Into<String>, access_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token))?,
        );
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers,
        })
    }

    async fn league_resource(&self, league_id: &LeagueId, season: Season, resource: &str) -> Result<Value> {
        let url = format!(
            "{}/league/{}/{}",
            self.base_url,
            league_key(league_id, season),
            resource
        );
        get_json(&self.client, &url, &[("format", "json".to_string())], &self.headers).await
    }

    async fn settings(&self, league_id: &LeagueId, season: Season) -> Result<Value> {
        self.league_resource(league_id, season, "settings").await
    }
}

#[async_trait]
impl PlatformSource for YahooSource {
    fn platform(&self) -> Platform {
        Platform::Yahoo
    }

    async fn fetch_league(&self, league_id: &LeagueId, season: Season) -> Result<League> {
        parse_league(&self.settings(league_id, season).await?)
    }

    async fn fetch_teams(&self, league_id: &LeagueId, season: Season) -> Result<Vec<Team>> {
        let league = parse_league(&self.settings(league_id, season).await?)?;
        let standings = self.league_resource(league_id, season, "standings").await?;
        let rosters = self.league_resource(league_id, season, "teams/roster").await?;
        let budget = match league.waivers {
            WaiverSettings::Faab { budget } => Some(budget),
            WaiverSettings::Rolling => None,
        };
        parse_teams(league_id, &standings, &rosters, budget)
    }

    async fn fetch_players(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Player>> {
        let rosters = self
            .league_resource(league_id, season, &format!("teams/roster;week={}", week))
            .await?;
        let mut players = parse_roster_players(&rosters)?;

        let free_agents = self
            .league_resource(
                league_id,
                season,
                &format!("players;status=A;sort=AR;count={}", FREE_AGENT_PAGE),
            )
            .await;
        match free_agents.and_then(|raw| parse_players(&raw)) {
            Ok(pool) => {
                let known: HashSet<PlayerId> =
                    players.iter().map(|p| p.id.clone()).collect();
                players.extend(pool.into_iter().filter(|p| !known.contains(&p.id)));
            }
            Err(e) => warn!(error = %e, "Yahoo free agents unavailable; using rostered players only"),
        }
        Ok(players)
    }

    async fn fetch_matchups(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Matchup>> {
        let raw = self
            .league_resource(league_id, season, &format!("scoreboard;week={}", week))
            .await?;
        parse_scoreboard(week, &raw)
    }

    async fn fetch_weekly_points(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<PlayerWeekPoints>> {
        let league = parse_league(&self.settings(league_id, season).await?)?;
        let raw = self
            .league_resource(
                league_id,
                season,
                &format!("players;status=T/stats;type=week;week={}", week),
            )
            .await?;
        parse_player_points(week, &raw, &league.scoring)
    }
}

/// `stat_modifiers.stats[].stat {stat_id, value}` → [`ScoringSettings`].
pub fn scoring_from_modifiers(settings: &Map<String, Value>) -> ScoringSettings {
    let mut scoring = ScoringSettings::new();
    let modifiers = settings
        .get("stat_modifiers")
        .and_then(|m| m.get("stats"))
        .and_then(|s| s.as_array());

    for entry in modifiers.into_iter().flatten() {
        let Some(stat) = entry.get("stat") else {
            continue;
        };
        let key = u64_field(stat, "stat_id").and_then(|id| yahoo_stat_key(id as u16));
        if let (Some(key), Some(points)) = (key, f64_field(stat, "value")) {
            scoring.set_rule(key, points);
        }
    }
    scoring
}

fn parse_roster_positions(settings: &Map<String, Value>) -> Vec<LineupSlot> {
    let positions = settings.get("roster_positions").and_then(|p| p.as_array());
    positions
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let rp = entry.get("roster_position")?;
            let slot: LineupSlot = str_field(rp, "position")?.parse().ok()?;
            let count = u64_field(rp, "count").unwrap_or(1) as usize;
            Some(std::iter::repeat(slot).take(count))
        })
        .flatten()
        .collect()
}

pub fn parse_league(raw: &Value) -> Result<League> {
    let league = league_root(raw)?;
    let key = str_field(&league, "league_key")
        .ok_or_else(|| InsightsError::missing_field(Platform::Yahoo, "league_key"))?;
    let settings = league
        .get("settings")
        .map(flatten_fragments)
        .unwrap_or_default();

    let uses_faab = settings.get("uses_faab").and_then(value_as_f64) == Some(1.0);
    let waivers = if uses_faab {
        WaiverSettings::Faab {
            budget: DEFAULT_FAAB_BUDGET,
        }
    } else {
        WaiverSettings::Rolling
    };

    Ok(League {
        platform: Platform::Yahoo,
        id: LeagueId::new(key),
        name: str_field(&league, "name").unwrap_or("Yahoo League").to_string(),
        season: u64_field(&league, "season")
            .map(|s| Season::new(s as u16))
            .unwrap_or_default(),
        current_week: u64_field(&league, "current_week")
            .map(|w| Week::new(w as u16))
            .unwrap_or_default(),
        team_count: u64_field(&league, "num_teams").unwrap_or(0) as u32,
        scoring: scoring_from_modifiers(&settings),
        roster_slots: parse_roster_positions(&settings),
        waivers,
    })
}

/// Flattened `team` records from the league's `teams` collection, or the one inside `nested_in`.
fn teams_at(league: &Value, nested_in: Option<&str>) -> Vec<Map<String, Value>> {
    let container = match nested_in {
        Some(key) => league
            .get(key)
            .map(|v| Value::Object(flatten_fragments(v)))
            .and_then(|v| v.get("teams").cloned()),
        None => league.get("teams").cloned(),
    };
    container
        .map(|teams| {
            collection_items(&teams, "team")
                .into_iter()
                .map(flatten_fragments)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Default)]
struct RosterSlots {
    players: Vec<PlayerId>,
    starters: Vec<PlayerId>,
    reserve: Vec<PlayerId>,
}

/// Roster players of one flattened team with their selected positions.
fn roster_entries(team: &Map<String, Value>) -> Vec<Map<String, Value>> {
    team.get("roster")
        .and_then(|r| r.get("0"))
        .and_then(|r| r.get("players"))
        .map(|players| {
            collection_items(players, "player")
                .into_iter()
                .map(flatten_fragments)
                .collect()
        })
        .unwrap_or_default()
}

fn selected_slot(player: &Map<String, Value>) -> Option<LineupSlot> {
    let selected = flatten_fragments(player.get("selected_position")?);
    selected.get("position")?.as_str()?.parse().ok()
}

fn roster_slots(team: &Map<String, Value>) -> RosterSlots {
    let mut slots = RosterSlots::default();
    for player in roster_entries(team) {
        let Some(id) = player.get("player_id").and_then(id_string) else {
            continue;
        };
        let id = PlayerId::new(id);
        match selected_slot(&player) {
            Some(LineupSlot::IR) => slots.reserve.push(id.clone()),
            Some(s) if s.is_starting() => slots.starters.push(id.clone()),
            _ => {}
        }
        slots.players.push(id);
    }
    slots
}

pub fn parse_teams(
    league_id: &LeagueId,
    standings: &Value,
    rosters: &Value,
    faab_budget: Option<u32>,
) -> Result<Vec<Team>> {
    let standings_root = league_root(standings)?;
    let rosters_root = league_root(rosters)?;

    let mut rosters_by_id: HashMap<String, RosterSlots> = teams_at(&rosters_root, None)
        .iter()
        .filter_map(|t| Some((t.get("team_id").and_then(id_string)?, roster_slots(t))))
        .collect();

    teams_at(&standings_root, Some("standings"))
        .into_iter()
        .map(|t| {
            let team_id = t
                .get("team_id")
                .and_then(id_string)
                .ok_or_else(|| InsightsError::missing_field(Platform::Yahoo, "team_id"))?;
            let t = Value::Object(t);

            let manager = t
                .get("managers")
                .and_then(|m| m.as_array())
                .and_then(|m| m.first())
                .and_then(|m| m.get("manager"));

            let standing = t.get("team_standings").cloned().unwrap_or(Value::Null);
            let outcomes = standing.get("outcome_totals").cloned().unwrap_or(Value::Null);
            let record = Record {
                wins: u64_field(&outcomes, "wins").unwrap_or(0) as u32,
                losses: u64_field(&outcomes, "losses").unwrap_or(0) as u32,
                ties: u64_field(&outcomes, "ties").unwrap_or(0) as u32,
                points_for: f64_field(&standing, "points_for").unwrap_or(0.0),
                points_against: f64_field(&standing, "points_against").unwrap_or(0.0),
            };

            let slots = rosters_by_id.remove(&team_id).unwrap_or_default();

            let faab_used = match (faab_budget, u64_field(&t, "faab_balance")) {
                (Some(budget), Some(balance)) => Some(budget.saturating_sub(balance as u32)),
                _ => None,
            };

            Ok(Team {
                platform: Platform::Yahoo,
                league_id: league_id.clone(),
                name: str_field(&t, "name")
                    .map(String::from)
                    .unwrap_or_else(|| format!("Team {}", team_id)),
                team_id: TeamId::new(team_id),
                owner_id: manager.and_then(|m| str_field(m, "guid")).map(String::from),
                owner_name: manager
                    .and_then(|m| str_field(m, "nickname"))
                    .map(String::from),
                record,
                players: slots.players,
                starters: slots.starters,
                reserve: slots.reserve,
                faab_used,
            })
        })
        .collect()
}

/// One flattened Yahoo player record → [`Player`]. Non-fantasy positions yield `None`.
fn to_player(p: &Map<String, Value>) -> Option<Player> {
    let p = Value::Object(p.clone());
    let id = p.get("player_id").and_then(id_string)?;
    let position: Position = str_field(&p, "primary_position")
        .or_else(|| str_field(&p, "display_position").and_then(|d| d.split(',').next()))?
        .parse()
        .ok()?;
    let name = p
        .pointer("/name/full")
        .and_then(|n| n.as_str())
        .map(String::from)
        .unwrap_or_else(|| id.clone());

    let mut player = Player::new(id, name, position);
    player.nfl_team = str_field(&p, "editorial_team_abbr").map(|t| t.to_uppercase());
    player.injury_status = str_field(&p, "status")
        .map(InjuryStatus::parse)
        .unwrap_or_default();
    player.bye_week = p
        .pointer("/bye_weeks/week")
        .and_then(value_as_f64)
        .map(|w| w as u16);
    Some(player)
}

/// Every player on every roster in a `teams/roster` response.
pub fn parse_roster_players(raw: &Value) -> Result<Vec<Player>> {
    let league = league_root(raw)?;
    Ok(teams_at(&league, None)
        .iter()
        .flat_map(roster_entries)
        .filter_map(|p| to_player(&p))
        .collect())
}

fn player_records(raw: &Value) -> Result<Vec<Map<String, Value>>> {
    let league = league_root(raw)?;
    Ok(league
        .get("players")
        .map(|players| {
            collection_items(players, "player")
                .into_iter()
                .map(flatten_fragments)
                .collect()
        })
        .unwrap_or_default())
}

/// A `players` collection → players.
pub fn parse_players(raw: &Value) -> Result<Vec<Player>> {
    Ok(player_records(raw)?.iter().filter_map(to_player).collect())
}

fn stat_line(player: &Map<String, Value>) -> StatLine {
    let stats = player
        .get("player_stats")
        .and_then(|s| s.get("stats"))
        .and_then(|s| s.as_array());
    stats
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let stat = entry.get("stat")?;
            let key = yahoo_stat_key(u64_field(stat, "stat_id")? as u16)?;
            Some((key.to_string(), f64_field(stat, "value")?))
        })
        .collect()
}

/// `players;status=T/stats;type=week` → points per player.
///
/// Yahoo's own `player_points.total` wins; otherwise the stat line is scored
/// with the league settings.
pub fn parse_player_points(
    week: Week,
    raw: &Value,
    scoring: &ScoringSettings,
) -> Result<Vec<PlayerWeekPoints>> {
    let mut points: Vec<PlayerWeekPoints> = player_records(raw)?
        .iter()
        .filter_map(|record| {
            let player = to_player(record)?;
            let total = record
                .get("player_points")
                .and_then(|p| f64_field(p, "total"))
                .unwrap_or_else(|| scoring.points_for(&stat_line(record), player.position));
            Some(PlayerWeekPoints {
                player_id: player.id,
                week,
                points: total,
                projected: None,
            })
        })
        .collect();
    points.sort_by(|a, b| a.player_id.cmp(&b.player_id));
    Ok(points)
}

fn matchup_side(team: &Map<String, Value>) -> Option<MatchupSide> {
    let team = Value::Object(team.clone());
    Some(MatchupSide {
        team_id: TeamId::new(team.get("team_id").and_then(id_string)?),
        points: team
            .get("team_points")
            .and_then(|p| f64_field(p, "total"))
            .unwrap_or(0.0),
        projected: team
            .get("team_projected_points")
            .and_then(|p| f64_field(p, "total")),
    })
}

/// `scoreboard;week=N` → matchups, numbered in scoreboard order from 1.
pub fn parse_scoreboard(week: Week, raw: &Value) -> Result<Vec<Matchup>> {
    let league = league_root(raw)?;
    let scoreboard = league
        .get("scoreboard")
        .ok_or_else(|| InsightsError::missing_field(Platform::Yahoo, "scoreboard"))?;
    let Some(matchups) = scoreboard.get("0").and_then(|s| s.get("matchups")) else {
        return Ok(Vec::new());
    };

    Ok(collection_items(matchups, "matchup")
        .into_iter()
        .enumerate()
        .filter_map(|(i, m)| {
            let teams = m.get("0").and_then(|t| t.get("teams"))?;
            let mut sides = collection_items(teams, "team")
                .into_iter()
                .map(flatten_fragments)
                .filter_map(|t| matchup_side(&t));
            Some(Matchup {
                week,
                matchup_id: i as u32 + 1,
                home: sides.next()?,
                away: sides.next(),
            })
        })
        .collect())
}
