//! Typed pieces of ESPN's league and player payloads.

use serde::{de::Error, Deserialize, Deserializer};
use std::collections::BTreeMap;

fn de_str_key_map_u8_f64<'de, D>(deserializer: D) -> Result<BTreeMap<u8, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, f64> = Deserialize::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(k, v)| k.parse::<u8>().map(|kk| (kk, v)).map_err(D::Error::custom))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringItem {
    #[serde(rename = "statId")]
    pub stat_id: u16,
    /// Base points, used when no override exists for the player's slot
    pub points: f64,
    /// Overrides by lineup slot id (keys come in as strings)
    #[serde(
        rename = "pointsOverrides",
        deserialize_with = "de_str_key_map_u8_f64",
        default
    )]
    pub points_overrides: BTreeMap<u8, f64>,
}

/// One entry of a player's `stats` array.
#[derive(Debug, Clone, Deserialize)]
pub struct StatBlock {
    #[serde(rename = "seasonId")]
    pub season_id: u16,
    #[serde(rename = "scoringPeriodId")]
    pub scoring_period_id: u16,
    /// 0 = actual, 1 = projected
    #[serde(rename = "statSourceId")]
    pub stat_source_id: u8,
    /// 1 = single scoring period, 0 = season total
    #[serde(rename = "statSplitTypeId")]
    pub stat_split_type_id: u8,
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
}

pub const STAT_SOURCE_ACTUAL: u8 = 0;
pub const STAT_SOURCE_PROJECTED: u8 = 1;
const STAT_SPLIT_WEEK: u8 = 1;

/// A player as ESPN's `kona_player_info` and `mRoster` views describe them.
#[derive(Debug, Clone, Deserialize)]
pub struct EspnPlayer {
    pub id: u64,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    #[serde(rename = "defaultPositionId")]
    pub default_position_id: u8,
    #[serde(rename = "proTeamId", default)]
    pub pro_team_id: Option<u8>,
    #[serde(rename = "injuryStatus", default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub stats: Vec<StatBlock>,
}

impl EspnPlayer {
    /// The single-week stat block for `season`/`week` from `source`.
    pub fn weekly_stats(&self, season: u16, week: u16, source: u8) -> Option<&BTreeMap<String, f64>> {
        self.stats
            .iter()
            .find(|s| {
                s.season_id == season
                    && s.scoring_period_id == week
                    && s.stat_source_id == source
                    && s.stat_split_type_id == STAT_SPLIT_WEEK
            })
            .map(|s| &s.stats)
    }
}

/// ESPN `proTeamId` → NFL abbreviation. 0 is a free agent.
pub fn pro_team_abbrev(id: u8) -> Option<&'static str> {
    let abbrev = match id {
        1 => "ATL",
        2 => "BUF",
        3 => "CHI",
        4 => "CIN",
        5 => "CLE",
        6 => "DAL",
        7 => "DEN",
        8 => "DET",
        9 => "GB",
        10 => "TEN",
        11 => "IND",
        12 => "KC",
        13 => "LV",
        14 => "LAR",
        15 => "MIA",
        16 => "MIN",
        17 => "NE",
        18 => "NO",
        19 => "NYG",
        20 => "NYJ",
        21 => "PHI",
        22 => "ARI",
        23 => "PIT",
        24 => "LAC",
        25 => "SF",
        26 => "SEA",
        27 => "TB",
        28 => "WSH",
        29 => "CAR",
        30 => "JAX",
        33 => "BAL",
        34 => "HOU",
        _ => return None,
    };
    Some(abbrev)
}
