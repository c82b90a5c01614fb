//! Database schema and connection management

use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::cache_dir;

/// SQLite-backed store of weekly fantasy points per platform and league.
pub struct PerformanceStore {
    pub(crate) conn: Connection,
}

impl PerformanceStore {
    /// Open `~/.cache/fantasy-insights/history.db`, creating it if needed.
    pub fn open() -> Result<Self> {
        Self::open_at(&Self::database_path())
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!(path = %path.display(), "opening history store");
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// A throwaway store that lives only as long as the value.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    pub fn database_path() -> PathBuf {
        cache_dir().join("history.db")
    }

    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS players (
                platform TEXT NOT NULL,
                player_id TEXT NOT NULL,
                name TEXT NOT NULL,
                position TEXT NOT NULL,
                nfl_team TEXT,
                PRIMARY KEY (platform, player_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS weekly_points (
                platform TEXT NOT NULL,
                league_id TEXT NOT NULL,
                player_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                points REAL NOT NULL,
                projected REAL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (platform, league_id, player_id, season, week)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_weekly_points_league_week
             ON weekly_points(platform, league_id, season, week)",
            [],
        )?;

        Ok(())
    }
}
