//! Fixtures shared by unit tests across modules.

use std::collections::HashMap;

use crate::cli::types::{LeagueId, LineupSlot, Platform, PlayerId, Position, Season, TeamId, Week};
use crate::error::{InsightsError, Result};
use crate::models::{
    InjuryStatus, League, LeagueSnapshot, Matchup, MatchupSide, Player, PlayerWeekPoints, Record,
    Team, WaiverSettings, WeeklyPerformance,
};
use crate::platforms::PlatformSource;
use crate::scoring::ScoringSettings;

/// A healthy player with one game per entry of `points`, starting at week 1.
pub(crate) fn player(id: &str, name: &str, position: Position, points: &[f64]) -> Player {
    let mut p = Player::new(id, name, position);
    p.set_history(
        points
            .iter()
            .enumerate()
            .map(|(i, &pts)| WeeklyPerformance {
                week: Week::new(i as u16 + 1),
                points: pts,
                projected: None,
            })
            .collect(),
    );
    p
}

pub(crate) fn team(id: &str, players: &[&str]) -> Team {
    Team {
        platform: Platform::Sleeper,
        league_id: LeagueId::new("L1"),
        team_id: TeamId::new(id),
        owner_id: Some(format!("owner{}", id)),
        name: format!("Team {}", id),
        owner_name: None,
        record: Record::default(),
        players: players.iter().map(|p| PlayerId::new(*p)).collect(),
        starters: Vec::new(),
        reserve: Vec::new(),
        faab_used: None,
    }
}

pub(crate) fn sample_league() -> League {
    use LineupSlot::*;
    League {
        platform: Platform::Sleeper,
        id: LeagueId::new("L1"),
        name: "Test League".to_string(),
        season: Season::new(2025),
        current_week: Week::new(5),
        team_count: 2,
        scoring: ScoringSettings::ppr(),
        roster_slots: vec![
            QB, RB, RB, WR, WR, TE, FLEX, K, DEF, Bench, Bench, Bench, Bench, Bench, IR,
        ],
        waivers: WaiverSettings::Faab { budget: 100 },
    }
}

fn projected(id: &str, name: &str, position: Position, points: &[f64], projection: f64) -> Player {
    let mut p = player(id, name, position, points);
    p.projection = Some(projection);
    p
}

/// Two-team league in week 5.
///
/// Team 1 ("Gridiron Gurus") starts RB Charlie at FLEX while WR Charlie sits
/// on the bench, so the optimal lineup swaps them. Team 2 is its week-5
/// opponent. Four free agents, one of them ruled out.
pub(crate) fn sample_snapshot() -> LeagueSnapshot {
    let mut injured = projected("i1", "RB Injured", Position::RB, &[15.0, 14.0, 0.0, 0.0], 0.0);
    injured.injury_status = InjuryStatus::InjuredReserve;
    let mut out = projected("f4", "QB Out", Position::QB, &[12.0, 14.0], 15.0);
    out.injury_status = InjuryStatus::Out;

    let players = vec![
        projected("q1", "QB One", Position::QB, &[22.0, 25.0, 20.0, 24.0], 23.0),
        projected("r1", "RB Alpha", Position::RB, &[18.0, 20.0, 17.0, 22.0], 19.0),
        projected("r2", "RB Bravo", Position::RB, &[8.0, 6.0, 9.0, 7.0], 8.0),
        projected("r3", "RB Charlie", Position::RB, &[4.0, 3.0, 5.0, 2.0], 3.0),
        projected("w1", "WR Alpha", Position::WR, &[16.0, 19.0, 15.0, 18.0], 17.0),
        projected("w2", "WR Bravo", Position::WR, &[12.0, 10.0, 14.0, 11.0], 12.0),
        projected("w3", "WR Charlie", Position::WR, &[9.0, 15.0, 12.0, 14.0], 13.0),
        projected("t1", "TE Alpha", Position::TE, &[7.0, 5.0, 6.0, 8.0], 7.0),
        projected("k1", "Kicker One", Position::K, &[8.0, 9.0, 7.0, 10.0], 8.0),
        projected("d1", "Defense One", Position::DEF, &[6.0, 10.0, 4.0, 8.0], 7.0),
        injured,
        projected("q2", "QB Two", Position::QB, &[18.0, 17.0, 19.0, 16.0], 18.0),
        projected("r4", "RB Delta", Position::RB, &[14.0, 15.0, 13.0, 16.0], 14.0),
        projected("r5", "RB Echo", Position::RB, &[10.0, 12.0, 11.0, 9.0], 10.0),
        projected("w4", "WR Delta", Position::WR, &[20.0, 22.0, 18.0, 21.0], 20.0),
        projected("w5", "WR Echo", Position::WR, &[9.0, 8.0, 10.0, 7.0], 9.0),
        projected("t2", "TE Bravo", Position::TE, &[14.0, 12.0, 15.0, 13.0], 13.0),
        projected("k2", "Kicker Two", Position::K, &[7.0, 8.0, 9.0, 6.0], 8.0),
        projected("d2", "Defense Two", Position::DEF, &[9.0, 5.0, 7.0, 8.0], 7.0),
        projected("f1", "WR Waiver", Position::WR, &[3.0, 8.0, 14.0, 16.0], 14.0),
        projected("f2", "TE Waiver", Position::TE, &[6.0, 9.0, 10.0, 11.0], 10.0),
        projected("f3", "RB Scrub", Position::RB, &[1.0, 0.0, 2.0, 1.0], 1.0),
        out,
    ];

    let mut gurus = team(
        "1",
        &["q1", "r1", "r2", "r3", "w1", "w2", "w3", "t1", "k1", "d1", "i1"],
    );
    gurus.name = "Gridiron Gurus".to_string();
    gurus.owner_name = Some("alex".to_string());
    gurus.record = Record {
        wins: 3,
        losses: 1,
        ties: 0,
        points_for: 480.0,
        points_against: 430.0,
    };
    gurus.starters = ["q1", "r1", "r2", "w1", "w2", "t1", "r3", "k1", "d1"]
        .iter()
        .map(|id| PlayerId::new(*id))
        .collect();
    gurus.reserve = vec![PlayerId::new("i1")];
    gurus.faab_used = Some(20);

    let mut brigade = team("2", &["q2", "r4", "r5", "w4", "w5", "t2", "k2", "d2"]);
    brigade.name = "Blitz Brigade".to_string();
    brigade.owner_name = Some("sam".to_string());
    brigade.record = Record {
        wins: 2,
        losses: 2,
        ties: 0,
        points_for: 450.0,
        points_against: 470.0,
    };
    brigade.starters = ["q2", "r4", "r5", "w4", "w5", "t2", "k2", "d2"]
        .iter()
        .map(|id| PlayerId::new(*id))
        .collect();

    LeagueSnapshot {
        league: sample_league(),
        teams: vec![gurus, brigade],
        players: players
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect::<HashMap<_, _>>(),
        matchups: vec![Matchup {
            week: Week::new(5),
            matchup_id: 1,
            home: MatchupSide {
                team_id: TeamId::new("1"),
                points: 0.0,
                projected: None,
            },
            away: Some(MatchupSide {
                team_id: TeamId::new("2"),
                points: 0.0,
                projected: None,
            }),
        }],
        fetched_at: 0,
    }
}

/// Serves a fixed snapshot through the platform contract. Weekly points are
/// read back out of each player's history.
pub(crate) struct SnapshotSource {
    pub snapshot: LeagueSnapshot,
    pub failing_week: Option<u16>,
}

impl SnapshotSource {
    pub fn sample() -> Self {
        Self {
            snapshot: sample_snapshot(),
            failing_week: None,
        }
    }
}

#[async_trait::async_trait]
impl PlatformSource for SnapshotSource {
    fn platform(&self) -> Platform {
        self.snapshot.league.platform
    }

    async fn fetch_league(&self, _: &LeagueId, _: Season) -> Result<League> {
        Ok(self.snapshot.league.clone())
    }

    async fn fetch_teams(&self, _: &LeagueId, _: Season) -> Result<Vec<Team>> {
        Ok(self.snapshot.teams.clone())
    }

    async fn fetch_players(&self, _: &LeagueId, _: Season, _: Week) -> Result<Vec<Player>> {
        let mut players: Vec<Player> = self
            .snapshot
            .players
            .values()
            .cloned()
            .map(|mut p| {
                p.weekly.clear();
                p
            })
            .collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(players)
    }

    async fn fetch_matchups(&self, _: &LeagueId, _: Season, week: Week) -> Result<Vec<Matchup>> {
        Ok(self
            .snapshot
            .matchups
            .iter()
            .filter(|m| m.week == week)
            .cloned()
            .collect())
    }

    async fn fetch_weekly_points(
        &self,
        _: &LeagueId,
        _: Season,
        week: Week,
    ) -> Result<Vec<PlayerWeekPoints>> {
        if self.failing_week == Some(week.as_u16()) {
            return Err(InsightsError::Cache {
                message: format!("week {} unavailable", week),
            });
        }
        Ok(self
            .snapshot
            .players
            .values()
            .filter_map(|p| {
                p.points_in(week).map(|points| PlayerWeekPoints {
                    player_id: p.id.clone(),
                    week,
                    points,
                    projected: None,
                })
            })
            .collect())
    }
}
