//! Platform read contract and the unification layer.
//!
//! Each platform module turns its provider's JSON into the shared model
//! (`crate::models`) through pure `parse_*` functions, and exposes a
//! reqwest-backed [`PlatformSource`] that fetches and parses.

pub mod cached;
pub mod espn;
pub mod sleeper;
pub mod snapshot;
pub mod yahoo;

use async_trait::async_trait;
use serde_json::Value;

use crate::cli::types::{LeagueId, Platform, Season, Week};
use crate::config::{AppConfig, LinkedAccount};
use crate::error::Result;
use crate::models::{League, Matchup, Player, PlayerWeekPoints, Team};

pub use cached::CachedSource;
pub use snapshot::build_snapshot;

/// Read-only access to one fantasy platform.
#[async_trait]
pub trait PlatformSource: Send + Sync {
    /// Get the platform this source reads
    fn platform(&self) -> Platform;

    /// League settings, scoring and lineup template
    async fn fetch_league(&self, league_id: &LeagueId, season: Season) -> Result<League>;

    /// Every roster in the league with records
    async fn fetch_teams(&self, league_id: &LeagueId, season: Season) -> Result<Vec<Team>>;

    /// Rostered players plus the free-agent pool, with projections for `week`
    async fn fetch_players(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Player>>;

    /// Head-to-head pairings and scores for `week`
    async fn fetch_matchups(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Matchup>>;

    /// Fantasy points every player scored in `week`
    async fn fetch_weekly_points(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<PlayerWeekPoints>>;
}

/// Build the source for a linked account, wrapped in the configured TTL cache.
///
/// With `refresh` the cache is written but never read.
pub fn source_for(
    account: &LinkedAccount,
    config: &AppConfig,
    refresh: bool,
) -> Result<Box<dyn PlatformSource>> {
    let inner: Box<dyn PlatformSource> = match account.platform {
        Platform::Sleeper => Box::new(sleeper::SleeperSource::new()?),
        Platform::Espn => Box::new(espn::EspnSource::from_env()?),
        Platform::Yahoo => Box::new(yahoo::YahooSource::from_env()?),
    };
    Ok(Box::new(
        CachedSource::new(inner, &config.cache)?.with_refresh(refresh),
    ))
}

// JSON field helpers shared by the parsers. Platforms are loose with types:
// numbers arrive as strings and ids as either.

pub(crate) fn str_field<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key).and_then(|x| x.as_str())
}

pub(crate) fn f64_field(v: &Value, key: &str) -> Option<f64> {
    v.get(key).and_then(value_as_f64)
}

pub(crate) fn u64_field(v: &Value, key: &str) -> Option<u64> {
    v.get(key).and_then(|x| match x {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub(crate) fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render a JSON id (number or string) as a string.
pub(crate) fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loose_number_parsing() {
        let v = json!({"a": 1.5, "b": "2.25", "c": "x", "d": 7, "e": "12"});
        assert_eq!(f64_field(&v, "a"), Some(1.5));
        assert_eq!(f64_field(&v, "b"), Some(2.25));
        assert_eq!(f64_field(&v, "c"), None);
        assert_eq!(u64_field(&v, "d"), Some(7));
        assert_eq!(u64_field(&v, "e"), Some(12));
        assert_eq!(u64_field(&v, "missing"), None);
    }

    #[test]
    fn test_id_string() {
        assert_eq!(id_string(&json!(42)), Some("42".to_string()));
        assert_eq!(id_string(&json!("abc")), Some("abc".to_string()));
        assert_eq!(id_string(&json!("")), None);
        assert_eq!(id_string(&json!(null)), None);
    }
}
