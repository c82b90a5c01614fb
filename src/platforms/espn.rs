//! ESPN Fantasy Football v3 read API.
//!
//! League data comes from one endpoint with different `view` parameters
//! (`mSettings`, `mTeam`, `mRoster`, `mMatchupScore`). The player pool comes
//! from `/players?view=kona_player_info`, narrowed with an `X-Fantasy-Filter`
//! header. Bye weeks come from the season's `proTeamSchedules_wl` view.
//! Private leagues need the `espn_s2` and `SWID` cookies.

pub mod filter;
pub mod types;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE};
use reqwest::Client;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

use self::filter::{IntoHeaderValue, PlayersFilter, FANTASY_FILTER_HEADER};
use self::types::{pro_team_abbrev, EspnPlayer, ScoringItem, STAT_SOURCE_ACTUAL, STAT_SOURCE_PROJECTED};
use super::{f64_field, id_string, str_field, u64_field, PlatformSource};
use crate::cli::types::{LeagueId, LineupSlot, Platform, PlayerId, Position, Season, TeamId, Week};
use crate::core::http::{build_client, get_json};
use crate::error::{InsightsError, Result};
use crate::models::{
    InjuryStatus, League, Matchup, MatchupSide, Player, PlayerWeekPoints, Record, Team,
    WaiverSettings,
};
use crate::scoring::{stat_keys::espn_stat_key, ScoringSettings, StatLine};
use crate::{ESPN_S2_ENV_VAR, ESPN_SWID_ENV_VAR};


/// Base path for ESPN Fantasy Football v3 API.
pub const FFL_BASE_URL: &str = "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl";

/// Free agents requested per `/players` call.
const PLAYER_POOL_LIMIT: u32 = 300;

/// Build `Accept` and, when both cookies are given, `Cookie` headers.
pub fn cookie_header_map(swid: Option<&str>, espn_s2: Option<&str>) -> Result<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let (Some(swid), Some(s2)) = (swid, espn_s2) {
        let cookie = format!("SWID={}; espn_s2={}", swid, s2);
        h.insert(COOKIE, HeaderValue::from_str(&cookie)?);
    }
    Ok(h)
}

pub struct EspnSource {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl EspnSource {
    pub fn new(headers: HeaderMap) -> Result<Self> {
        Self::with_base_url(FFL_BASE_URL, headers)
    }

    /// Public-league access, plus cookies from `ESPN_SWID` / `ESPN_S2` when both are set.
    pub fn from_env() -> Result<Self> {
        let swid = std::env::var(ESPN_SWID_ENV_VAR).ok();
        let s2 = std::env::var(ESPN_S2_ENV_VAR).ok();
        if swid.is_some() != s2.is_some() {
            warn!(
                "only one of {} and {} is set; private leagues will be rejected",
                ESPN_SWID_ENV_VAR, ESPN_S2_ENV_VAR
            );
        }
        Self::new(cookie_header_map(swid.as_deref(), s2.as_deref())?)
    }

    pub fn with_base_url(base_url: impl Into<String>, headers: HeaderMap) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers,
        })
    }

    async fn league_views(
        &self,
        league_id: &LeagueId,
        season: Season,
        views: &[&str],
        week: Option<Week>,
    ) -> Result<Value> {
        let url = format!(
            "{}/seasons/{}/segments/0/leagues/{}",
            self.base_url, season, league_id
        );
        let mut params: Vec<(&str, String)> = views.iter().map(|v| ("view", v.to_string())).collect();
        if let Some(week) = week {
            params.push(("scoringPeriodId", week.to_string()));
        }
        get_json(&self.client, &url, &params, &self.headers).await
    }

    async fn player_pool(&self, league_id: &LeagueId, season: Season, week: Week) -> Result<Value> {
        let url = format!("{}/seasons/{}/players", self.base_url, season);
        let params = [
            ("forLeagueId", league_id.to_string()),
            ("view", "kona_player_info".to_string()),
            ("scoringPeriodId", week.to_string()),
        ];
        let mut headers = self.headers.clone();
        headers.insert(
            HeaderName::from_static(FANTASY_FILTER_HEADER),
            PlayersFilter::player_pool(PLAYER_POOL_LIMIT).to_header_value()?,
        );
        get_json(&self.client, &url, &params, &headers).await
    }

    async fn pro_team_schedules(&self, season: Season) -> Result<Value> {
        let url = format!("{}/seasons/{}", self.base_url, season);
        let params = [("view", "proTeamSchedules_wl".to_string())];
        get_json(&self.client, &url, &params, &self.headers).await
    }

    /// Rostered players (from `mRoster`) followed by the filtered pool.
    async fn raw_players(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<(ScoringSettings, Vec<EspnPlayer>)> {
        let settings = self
            .league_views(league_id, season, &["mSettings", "mRoster"], Some(week))
            .await?;
        let scoring = parse_scoring(&settings);
        let mut players = roster_players(&settings);

        match self.player_pool(league_id, season, week).await {
            Ok(pool) => merge_players(&mut players, parse_player_pool(&pool)),
            Err(e) => warn!(error = %e, "ESPN player pool unavailable; using rostered players only"),
        }
        debug!(players = players.len(), "ESPN players loaded");
        Ok((scoring, players))
    }
}

#[async_trait]
impl PlatformSource for EspnSource {
    fn platform(&self) -> Platform {
        Platform::Espn
    }

    async fn fetch_league(&self, league_id: &LeagueId, season: Season) -> Result<League> {
        let raw = self
            .league_views(league_id, season, &["mSettings"], None)
            .await?;
        parse_league(&raw)
    }

    async fn fetch_teams(&self, league_id: &LeagueId, season: Season) -> Result<Vec<Team>> {
        let raw = self
            .league_views(league_id, season, &["mTeam", "mRoster"], None)
            .await?;
        parse_teams(league_id, &raw)
    }

    async fn fetch_players(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Player>> {
        let (players, schedules) = tokio::join!(
            self.raw_players(league_id, season, week),
            self.pro_team_schedules(season)
        );
        let (scoring, players) = players?;
        let byes = match schedules {
            Ok(raw) => parse_bye_weeks(&raw),
            Err(e) => {
                warn!(error = %e, "ESPN pro team schedules unavailable; bye weeks unknown");
                HashMap::new()
            }
        };
        Ok(players
            .iter()
            .filter_map(|p| to_player(p, &scoring, season, week, &byes))
            .collect())
    }

    async fn fetch_matchups(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Matchup>> {
        let raw = self
            .league_views(league_id, season, &["mMatchupScore"], Some(week))
            .await?;
        parse_matchups(week, &raw)
    }

    async fn fetch_weekly_points(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<PlayerWeekPoints>> {
        let (scoring, players) = self.raw_players(league_id, season, week).await?;
        Ok(weekly_points(&players, &scoring, season, week))
    }
}

/// `settings.scoringSettings.scoringItems` → [`ScoringSettings`].
///
/// `pointsOverrides` are keyed by lineup slot; slots with a single position
/// become overrides for that position.
pub fn scoring_from_items(items: &[ScoringItem]) -> ScoringSettings {
    let mut settings = ScoringSettings::new();
    for item in items {
        let Some(key) = espn_stat_key(item.stat_id) else {
            continue;
        };
        settings.set_rule(key, item.points);
        for (slot_id, points) in &item.points_overrides {
            let position = LineupSlot::from_espn_id(*slot_id)
                .ok()
                .and_then(|slot| slot.dedicated_position());
            if let Some(position) = position {
                settings.set_override(key, position, *points);
            }
        }
    }
    settings
}

fn parse_scoring(raw: &Value) -> ScoringSettings {
    let items: Vec<ScoringItem> = raw
        .pointer("/settings/scoringSettings/scoringItems")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();
    scoring_from_items(&items)
}

/// `lineupSlotCounts` (`{"0": 1, "2": 2, ...}`) expanded into slots, ordered by slot id.
fn parse_roster_slots(raw: &Value) -> Vec<LineupSlot> {
    let Some(counts) = raw
        .pointer("/settings/rosterSettings/lineupSlotCounts")
        .and_then(|v| v.as_object())
    else {
        return Vec::new();
    };

    let ordered: BTreeMap<u8, u64> = counts
        .iter()
        .filter_map(|(id, n)| Some((id.parse().ok()?, n.as_u64()?)))
        .collect();

    ordered
        .into_iter()
        .filter_map(|(id, n)| LineupSlot::from_espn_id(id).ok().map(|slot| (slot, n)))
        .flat_map(|(slot, n)| std::iter::repeat(slot).take(n as usize))
        .collect()
}

pub fn parse_league(raw: &Value) -> Result<League> {
    let id = raw
        .get("id")
        .and_then(id_string)
        .ok_or_else(|| InsightsError::missing_field(Platform::Espn, "id"))?;
    let settings = raw
        .get("settings")
        .ok_or_else(|| InsightsError::missing_field(Platform::Espn, "settings"))?;

    let waivers = match raw.pointer("/settings/acquisitionSettings") {
        Some(acq) if acq.get("isUsingAcquisitionBudget").and_then(|v| v.as_bool()) == Some(true) => {
            WaiverSettings::Faab {
                budget: u64_field(acq, "acquisitionBudget").unwrap_or(100) as u32,
            }
        }
        _ => WaiverSettings::Rolling,
    };

    Ok(League {
        platform: Platform::Espn,
        id: LeagueId::new(id),
        name: str_field(settings, "name").unwrap_or("ESPN League").to_string(),
        season: u64_field(raw, "seasonId")
            .map(|s| Season::new(s as u16))
            .unwrap_or_default(),
        current_week: u64_field(raw, "scoringPeriodId")
            .filter(|w| *w > 0)
            .map(|w| Week::new(w as u16))
            .unwrap_or_default(),
        team_count: u64_field(settings, "size").unwrap_or(0) as u32,
        scoring: parse_scoring(raw),
        roster_slots: parse_roster_slots(raw),
        waivers,
    })
}

fn member_names(raw: &Value) -> HashMap<String, String> {
    raw.get("members")
        .and_then(|m| m.as_array())
        .map(|members| {
            members
                .iter()
                .filter_map(|m| {
                    let id = str_field(m, "id")?.to_string();
                    let name = str_field(m, "displayName")
                        .map(String::from)
                        .or_else(|| {
                            let first = str_field(m, "firstName")?;
                            let last = str_field(m, "lastName").unwrap_or("");
                            Some(format!("{} {}", first, last).trim().to_string())
                        })?;
                    Some((id, name))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn roster_entries<'a>(team: &'a Value) -> impl Iterator<Item = &'a Value> + 'a {
    team.pointer("/roster/entries")
        .and_then(|e| e.as_array())
        .into_iter()
        .flatten()
}

pub fn parse_teams(league_id: &LeagueId, raw: &Value) -> Result<Vec<Team>> {
    let teams = raw
        .get("teams")
        .and_then(|t| t.as_array())
        .ok_or_else(|| InsightsError::missing_field(Platform::Espn, "teams"))?;
    let members = member_names(raw);

    teams
        .iter()
        .map(|t| {
            let team_id = t
                .get("id")
                .and_then(id_string)
                .ok_or_else(|| InsightsError::missing_field(Platform::Espn, "teams[].id"))?;

            let name = str_field(t, "name")
                .filter(|n| !n.trim().is_empty())
                .map(String::from)
                .or_else(|| {
                    let location = str_field(t, "location")?;
                    let nickname = str_field(t, "nickname").unwrap_or("");
                    Some(format!("{} {}", location, nickname).trim().to_string())
                })
                .unwrap_or_else(|| format!("Team {}", team_id));

            let owner_id = str_field(t, "primaryOwner").map(String::from);
            let owner_name = owner_id.as_ref().and_then(|id| members.get(id)).cloned();

            let overall = t.pointer("/record/overall").cloned().unwrap_or(Value::Null);
            let record = Record {
                wins: u64_field(&overall, "wins").unwrap_or(0) as u32,
                losses: u64_field(&overall, "losses").unwrap_or(0) as u32,
                ties: u64_field(&overall, "ties").unwrap_or(0) as u32,
                points_for: f64_field(&overall, "pointsFor").unwrap_or(0.0),
                points_against: f64_field(&overall, "pointsAgainst").unwrap_or(0.0),
            };

            let mut players = Vec::new();
            let mut starters = Vec::new();
            let mut reserve = Vec::new();
            for entry in roster_entries(t) {
                let Some(player_id) = entry.get("playerId").and_then(id_string) else {
                    continue;
                };
                let player_id = PlayerId::new(player_id);
                let slot = u64_field(entry, "lineupSlotId")
                    .and_then(|id| LineupSlot::from_espn_id(id as u8).ok());
                match slot {
                    Some(LineupSlot::IR) => reserve.push(player_id.clone()),
                    Some(s) if s.is_starting() => starters.push(player_id.clone()),
                    _ => {}
                }
                players.push(player_id);
            }

            Ok(Team {
                platform: Platform::Espn,
                league_id: league_id.clone(),
                team_id: TeamId::new(team_id),
                owner_id,
                name,
                owner_name,
                record,
                players,
                starters,
                reserve,
                faab_used: t
                    .pointer("/transactionCounter/acquisitionBudgetSpent")
                    .and_then(|v| v.as_u64())
                    .map(|v| v as u32),
            })
        })
        .collect()
}

/// Players embedded in `mRoster` entries.
fn roster_players(raw: &Value) -> Vec<EspnPlayer> {
    raw.get("teams")
        .and_then(|t| t.as_array())
        .into_iter()
        .flatten()
        .flat_map(|t| roster_entries(t))
        .filter_map(|e| e.pointer("/playerPoolEntry/player"))
        .filter_map(|p| serde_json::from_value(p.clone()).ok())
        .collect()
}

/// `/players?view=kona_player_info` → typed players. Malformed entries are skipped.
pub fn parse_player_pool(raw: &Value) -> Vec<EspnPlayer> {
    raw.as_array()
        .map(|players| {
            players
                .iter()
                .filter_map(|p| match serde_json::from_value(p.clone()) {
                    Ok(player) => Some(player),
                    Err(e) => {
                        debug!(error = %e, "skipping malformed ESPN player");
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Append pool players not already present.
fn merge_players(players: &mut Vec<EspnPlayer>, pool: Vec<EspnPlayer>) {
    let mut seen: HashSet<u64> = players.iter().map(|p| p.id).collect();
    players.extend(pool.into_iter().filter(|p| seen.insert(p.id)));
}

fn stat_line(stats: &BTreeMap<String, f64>) -> StatLine {
    stats
        .iter()
        .filter_map(|(id, v)| {
            let key = espn_stat_key(id.parse().ok()?)?;
            Some((key.to_string(), *v))
        })
        .collect()
}

fn points_from_block(
    player: &EspnPlayer,
    position: Position,
    scoring: &ScoringSettings,
    season: Season,
    week: Week,
    source: u8,
) -> Option<f64> {
    player
        .weekly_stats(season.as_u16(), week.as_u16(), source)
        .map(|stats| scoring.points_for(&stat_line(stats), position))
}

/// `settings.proTeams[]` → bye week per `proTeamId`. Free agents (id 0) have none.
pub fn parse_bye_weeks(raw: &Value) -> HashMap<u8, u16> {
    raw.pointer("/settings/proTeams")
        .and_then(|t| t.as_array())
        .into_iter()
        .flatten()
        .filter_map(|team| {
            let id = u8::try_from(u64_field(team, "id")?).ok()?;
            let bye = u16::try_from(u64_field(team, "byeWeek")?).ok()?;
            (bye > 0).then_some((id, bye))
        })
        .collect()
}

/// Typed ESPN player → unified [`Player`] with the `week` projection and
/// the bye week of the player's NFL team.
pub fn to_player(
    p: &EspnPlayer,
    scoring: &ScoringSettings,
    season: Season,
    week: Week,
    byes: &HashMap<u8, u16>,
) -> Option<Player> {
    let position = Position::from_espn_id(p.default_position_id).ok()?;
    let name = p.full_name.clone().unwrap_or_else(|| p.id.to_string());

    let mut player = Player::new(p.id, name, position);
    player.nfl_team = p.pro_team_id.and_then(pro_team_abbrev).map(String::from);
    player.bye_week = p.pro_team_id.and_then(|id| byes.get(&id)).copied();
    player.injury_status = p
        .injury_status
        .as_deref()
        .map(InjuryStatus::parse)
        .unwrap_or_default();
    player.projection = points_from_block(p, position, scoring, season, week, STAT_SOURCE_PROJECTED);
    Some(player)
}

/// Actual points per player for `week`, computed from the stat blocks.
pub fn weekly_points(
    players: &[EspnPlayer],
    scoring: &ScoringSettings,
    season: Season,
    week: Week,
) -> Vec<PlayerWeekPoints> {
    let mut points: Vec<PlayerWeekPoints> = players
        .iter()
        .filter_map(|p| {
            let position = Position::from_espn_id(p.default_position_id).ok()?;
            let actual = points_from_block(p, position, scoring, season, week, STAT_SOURCE_ACTUAL)?;
            Some(PlayerWeekPoints {
                player_id: PlayerId::from(p.id),
                week,
                points: actual,
                projected: points_from_block(p, position, scoring, season, week, STAT_SOURCE_PROJECTED),
            })
        })
        .collect();
    points.sort_by(|a, b| a.player_id.cmp(&b.player_id));
    points
}

fn matchup_side(raw: &Value) -> Option<MatchupSide> {
    let team_id = raw.get("teamId").and_then(id_string)?;
    Some(MatchupSide {
        team_id: TeamId::new(team_id),
        points: f64_field(raw, "totalPointsLive")
            .or_else(|| f64_field(raw, "totalPoints"))
            .unwrap_or(0.0),
        projected: f64_field(raw, "totalProjectedPointsLive"),
    })
}

/// `schedule` entries for matchup period `week`.
pub fn parse_matchups(week: Week, raw: &Value) -> Result<Vec<Matchup>> {
    let schedule = raw
        .get("schedule")
        .and_then(|s| s.as_array())
        .ok_or_else(|| InsightsError::missing_field(Platform::Espn, "schedule"))?;

    let mut matchups: Vec<Matchup> = schedule
        .iter()
        .filter(|m| u64_field(m, "matchupPeriodId") == Some(week.as_u16() as u64))
        .filter_map(|m| {
            let home = m.get("home").and_then(matchup_side)?;
            Some(Matchup {
                week,
                matchup_id: u64_field(m, "id").unwrap_or(0) as u32,
                home,
                away: m.get("away").and_then(matchup_side),
            })
        })
        .collect();
    matchups.sort_by_key(|m| m.matchup_id);
    Ok(matchups)
}
