//! TTL-cached decorator over any [`PlatformSource`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;

use super::PlatformSource;
use crate::cli::types::{LeagueId, Platform, Season, Week};
use crate::config::CacheTtls;
use crate::core::{cache_dir, SourceCacheKey, TtlCache};
use crate::error::Result;
use crate::models::{League, Matchup, Player, PlayerWeekPoints, Team};

/// Entries kept in memory per operation.
const MEMORY_CAPACITY: usize = 64;

pub struct CachedSource {
    inner: Box<dyn PlatformSource>,
    leagues: TtlCache<SourceCacheKey, League>,
    teams: TtlCache<SourceCacheKey, Vec<Team>>,
    players: TtlCache<SourceCacheKey, Vec<Player>>,
    matchups: TtlCache<SourceCacheKey, Vec<Matchup>>,
    weekly_points: TtlCache<SourceCacheKey, Vec<PlayerWeekPoints>>,
    refresh: bool,
}

impl CachedSource {
    /// Cache under `~/.cache/fantasy-insights/sources`.
    pub fn new(inner: Box<dyn PlatformSource>, ttls: &CacheTtls) -> Result<Self> {
        Self::with_disk(inner, ttls, cache_dir().join("sources"))
    }

    pub fn with_disk(inner: Box<dyn PlatformSource>, ttls: &CacheTtls, dir: PathBuf) -> Result<Self> {
        Ok(Self {
            inner,
            leagues: TtlCache::with_disk(MEMORY_CAPACITY, ttls.league(), dir.clone())?,
            teams: TtlCache::with_disk(MEMORY_CAPACITY, ttls.league(), dir.clone())?,
            players: TtlCache::with_disk(MEMORY_CAPACITY, ttls.players(), dir.clone())?,
            matchups: TtlCache::with_disk(MEMORY_CAPACITY, ttls.live(), dir.clone())?,
            weekly_points: TtlCache::with_disk(MEMORY_CAPACITY, ttls.live(), dir)?,
            refresh: false,
        })
    }

    pub fn in_memory(inner: Box<dyn PlatformSource>, ttls: &CacheTtls) -> Result<Self> {
        Ok(Self {
            inner,
            leagues: TtlCache::in_memory(MEMORY_CAPACITY, ttls.league())?,
            teams: TtlCache::in_memory(MEMORY_CAPACITY, ttls.league())?,
            players: TtlCache::in_memory(MEMORY_CAPACITY, ttls.players())?,
            matchups: TtlCache::in_memory(MEMORY_CAPACITY, ttls.live())?,
            weekly_points: TtlCache::in_memory(MEMORY_CAPACITY, ttls.live())?,
            refresh: false,
        })
    }

    /// Skip cache reads; fetched values still overwrite the entries.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    fn key(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Option<Week>,
        operation: &'static str,
    ) -> SourceCacheKey {
        SourceCacheKey {
            platform: self.inner.platform(),
            league_id: league_id.clone(),
            season,
            week,
            operation,
        }
    }

    async fn cached<V, F>(&self, cache: &TtlCache<SourceCacheKey, V>, key: SourceCacheKey, fetch: F) -> Result<V>
    where
        V: Clone + Serialize + for<'de> Deserialize<'de>,
        F: Future<Output = Result<V>>,
    {
        if !self.refresh {
            if let Some(value) = cache.get(&key) {
                debug!(operation = key.operation, league = %key.league_id, "cache hit");
                return Ok(value);
            }
        }
        let value = fetch.await?;
        cache.put(key, value.clone());
        Ok(value)
    }
}

#[async_trait]
impl PlatformSource for CachedSource {
    fn platform(&self) -> Platform {
        self.inner.platform()
    }

    async fn fetch_league(&self, league_id: &LeagueId, season: Season) -> Result<League> {
        let key = self.key(league_id, season, None, "league");
        self.cached(&self.leagues, key, self.inner.fetch_league(league_id, season))
            .await
    }

    async fn fetch_teams(&self, league_id: &LeagueId, season: Season) -> Result<Vec<Team>> {
        let key = self.key(league_id, season, None, "teams");
        self.cached(&self.teams, key, self.inner.fetch_teams(league_id, season))
            .await
    }

    async fn fetch_players(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Player>> {
        let key = self.key(league_id, season, Some(week), "players");
        self.cached(
            &self.players,
            key,
            self.inner.fetch_players(league_id, season, week),
        )
        .await
    }

    async fn fetch_matchups(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<Matchup>> {
        let key = self.key(league_id, season, Some(week), "matchups");
        self.cached(
            &self.matchups,
            key,
            self.inner.fetch_matchups(league_id, season, week),
        )
        .await
    }

    async fn fetch_weekly_points(
        &self,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Vec<PlayerWeekPoints>> {
        let key = self.key(league_id, season, Some(week), "points");
        self.cached(
            &self.weekly_points,
            key,
            self.inner.fetch_weekly_points(league_id, season, week),
        )
        .await
    }
}
