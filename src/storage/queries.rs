//! Upserts and history reads

use anyhow::Result;
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

use super::schema::PerformanceStore;
use crate::cli::types::{LeagueId, Platform, PlayerId, Position, Season, Week};
use crate::core::now_secs;
use crate::models::{Player, PlayerWeekPoints, WeeklyPerformance};

impl PerformanceStore {
    /// Insert or update a player's name, position and NFL team.
    pub fn upsert_player(&mut self, platform: Platform, player: &Player) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO players (platform, player_id, name, position, nfl_team)
             VALUES (?, ?, ?, ?, ?)",
            params![
                platform.tag(),
                player.id.as_str(),
                player.name,
                player.position.to_string(),
                player.nfl_team
            ],
        )?;
        Ok(())
    }

    /// Stored identity of a player, without history.
    pub fn player(&self, platform: Platform, player_id: &PlayerId) -> Result<Option<Player>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, position, nfl_team FROM players
                 WHERE platform = ? AND player_id = ?",
                params![platform.tag(), player_id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((name, position, nfl_team)) = row else {
            return Ok(None);
        };
        let mut player = Player::new(player_id.clone(), name, position.parse::<Position>()?);
        player.nfl_team = nfl_team;
        Ok(Some(player))
    }

    /// Store one week of points for a league.
    ///
    /// Existing rows are only overwritten when `force` is set; otherwise
    /// they are left alone. Returns the number of rows written.
    pub fn upsert_week_points(
        &mut self,
        platform: Platform,
        league_id: &LeagueId,
        season: Season,
        rows: &[PlayerWeekPoints],
        force: bool,
    ) -> Result<usize> {
        let now = now_secs();
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let sql = if force {
                "INSERT INTO weekly_points
                 (platform, league_id, player_id, season, week, points, projected,
                  created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT (platform, league_id, player_id, season, week)
                 DO UPDATE SET points = excluded.points,
                               projected = excluded.projected,
                               updated_at = excluded.updated_at"
            } else {
                "INSERT OR IGNORE INTO weekly_points
                 (platform, league_id, player_id, season, week, points, projected,
                  created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
            };
            let mut stmt = tx.prepare(sql)?;
            for row in rows {
                written += stmt.execute(params![
                    platform.tag(),
                    league_id.as_str(),
                    row.player_id.as_str(),
                    season.as_u16(),
                    row.week.as_u16(),
                    row.points,
                    row.projected,
                    now,
                    now
                ])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// Whether any points are stored for `week`.
    pub fn has_week(
        &self,
        platform: Platform,
        league_id: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM weekly_points
                 WHERE platform = ? AND league_id = ? AND season = ? AND week = ?
                 LIMIT 1",
                params![platform.tag(), league_id.as_str(), season.as_u16(), week.as_u16()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Every player's performances strictly before `before_week`, sorted by week.
    pub fn weekly_history(
        &self,
        platform: Platform,
        league_id: &LeagueId,
        season: Season,
        before_week: Week,
    ) -> Result<HashMap<PlayerId, Vec<WeeklyPerformance>>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, week, points, projected FROM weekly_points
             WHERE platform = ? AND league_id = ? AND season = ? AND week < ?
             ORDER BY player_id, week",
        )?;

        let rows = stmt.query_map(
            params![
                platform.tag(),
                league_id.as_str(),
                season.as_u16(),
                before_week.as_u16()
            ],
            |row| {
                Ok((
                    PlayerId::new(row.get::<_, String>(0)?),
                    WeeklyPerformance {
                        week: Week::new(row.get(1)?),
                        points: row.get(2)?,
                        projected: row.get(3)?,
                    },
                ))
            },
        )?;

        let mut history: HashMap<PlayerId, Vec<WeeklyPerformance>> = HashMap::new();
        for row in rows {
            let (player_id, performance) = row?;
            history.entry(player_id).or_default().push(performance);
        }
        Ok(history)
    }

    /// Weeks with stored points, ascending.
    pub fn stored_weeks(
        &self,
        platform: Platform,
        league_id: &LeagueId,
        season: Season,
    ) -> Result<Vec<Week>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT week FROM weekly_points
             WHERE platform = ? AND league_id = ? AND season = ?
             ORDER BY week",
        )?;
        let weeks = stmt
            .query_map(
                params![platform.tag(), league_id.as_str(), season.as_u16()],
                |row| row.get::<_, u16>(0),
            )?
            .map(|w| w.map(Week::new))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(weeks)
    }

    /// Delete everything.
    pub fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM weekly_points", [])?;
        self.conn.execute("DELETE FROM players", [])?;
        Ok(())
    }
}
