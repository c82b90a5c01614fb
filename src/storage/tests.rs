//! Unit tests for the history store

use super::*;
use crate::cli::types::{LeagueId, Platform, PlayerId, Position, Season, Week};
use crate::models::{Player, PlayerWeekPoints};
use tempfile::TempDir;

fn points(player: &str, week: u16, pts: f64) -> PlayerWeekPoints {
    PlayerWeekPoints {
        player_id: PlayerId::new(player),
        week: Week::new(week),
        points: pts,
        projected: Some(pts - 1.0),
    }
}

fn league() -> LeagueId {
    LeagueId::new("L1")
}

#[test]
fn test_upsert_player_replaces_identity() {
    let mut store = PerformanceStore::in_memory().unwrap();
    let mut player = Player::new("p1", "Test Player", Position::QB);
    player.nfl_team = Some("KC".to_string());
    store.upsert_player(Platform::Sleeper, &player).unwrap();

    player.name = "Renamed Player".to_string();
    player.nfl_team = None;
    store.upsert_player(Platform::Sleeper, &player).unwrap();

    let stored = store
        .player(Platform::Sleeper, &PlayerId::new("p1"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Renamed Player");
    assert_eq!(stored.position, Position::QB);
    assert_eq!(stored.nfl_team, None);

    assert!(store
        .player(Platform::Espn, &PlayerId::new("p1"))
        .unwrap()
        .is_none());
}

#[test]
fn test_upsert_without_force_keeps_existing_rows() {
    let mut store = PerformanceStore::in_memory().unwrap();
    let season = Season::new(2025);

    let written = store
        .upsert_week_points(Platform::Sleeper, &league(), season, &[points("p1", 1, 10.0)], false)
        .unwrap();
    assert_eq!(written, 1);

    let written = store
        .upsert_week_points(Platform::Sleeper, &league(), season, &[points("p1", 1, 99.0)], false)
        .unwrap();
    assert_eq!(written, 0);

    let history = store
        .weekly_history(Platform::Sleeper, &league(), season, Week::new(2))
        .unwrap();
    assert_eq!(history[&PlayerId::new("p1")][0].points, 10.0);
}

#[test]
fn test_forced_upsert_overwrites() {
    let mut store = PerformanceStore::in_memory().unwrap();
    let season = Season::new(2025);

    store
        .upsert_week_points(Platform::Sleeper, &league(), season, &[points("p1", 1, 10.0)], false)
        .unwrap();
    let written = store
        .upsert_week_points(Platform::Sleeper, &league(), season, &[points("p1", 1, 12.5)], true)
        .unwrap();
    assert_eq!(written, 1);

    let history = store
        .weekly_history(Platform::Sleeper, &league(), season, Week::new(2))
        .unwrap();
    let week1 = history[&PlayerId::new("p1")][0];
    assert_eq!(week1.points, 12.5);
    assert_eq!(week1.projected, Some(11.5));
}

#[test]
fn test_weekly_history_is_scoped_and_sorted() {
    let mut store = PerformanceStore::in_memory().unwrap();
    let season = Season::new(2025);
    let rows = [
        points("p1", 3, 30.0),
        points("p1", 1, 10.0),
        points("p1", 2, 20.0),
        points("p2", 1, 5.0),
    ];
    store
        .upsert_week_points(Platform::Sleeper, &league(), season, &rows, false)
        .unwrap();
    store
        .upsert_week_points(
            Platform::Sleeper,
            &LeagueId::new("other"),
            season,
            &[points("p1", 1, 50.0)],
            false,
        )
        .unwrap();
    store
        .upsert_week_points(Platform::Sleeper, &league(), Season::new(2024), &[points("p1", 1, 7.0)], false)
        .unwrap();

    let history = store
        .weekly_history(Platform::Sleeper, &league(), season, Week::new(3))
        .unwrap();

    let p1: Vec<u16> = history[&PlayerId::new("p1")]
        .iter()
        .map(|w| w.week.as_u16())
        .collect();
    assert_eq!(p1, vec![1, 2]);
    assert_eq!(history[&PlayerId::new("p1")][0].points, 10.0);
    assert_eq!(history[&PlayerId::new("p2")].len(), 1);
}

#[test]
fn test_has_week_and_stored_weeks() {
    let mut store = PerformanceStore::in_memory().unwrap();
    let season = Season::new(2025);
    store
        .upsert_week_points(
            Platform::Espn,
            &league(),
            season,
            &[points("p1", 4, 1.0), points("p1", 2, 1.0), points("p2", 2, 3.0)],
            false,
        )
        .unwrap();

    assert!(store.has_week(Platform::Espn, &league(), season, Week::new(2)).unwrap());
    assert!(!store.has_week(Platform::Espn, &league(), season, Week::new(3)).unwrap());
    assert!(!store.has_week(Platform::Yahoo, &league(), season, Week::new(2)).unwrap());

    let weeks = store.stored_weeks(Platform::Espn, &league(), season).unwrap();
    assert_eq!(weeks, vec![Week::new(2), Week::new(4)]);
}

#[test]
fn test_clear_removes_everything() {
    let mut store = PerformanceStore::in_memory().unwrap();
    let season = Season::new(2025);
    store
        .upsert_player(Platform::Sleeper, &Player::new("p1", "A", Position::RB))
        .unwrap();
    store
        .upsert_week_points(Platform::Sleeper, &league(), season, &[points("p1", 1, 1.0)], false)
        .unwrap();

    store.clear().unwrap();

    assert!(store.stored_weeks(Platform::Sleeper, &league(), season).unwrap().is_empty());
    assert!(store
        .player(Platform::Sleeper, &PlayerId::new("p1"))
        .unwrap()
        .is_none());
}

#[test]
fn test_file_store_persists_between_opens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("history.db");
    let season = Season::new(2025);

    {
        let mut store = PerformanceStore::open_at(&path).unwrap();
        store
            .upsert_week_points(Platform::Yahoo, &league(), season, &[points("p9", 1, 8.0)], false)
            .unwrap();
    }

    let reopened = PerformanceStore::open_at(&path).unwrap();
    assert!(reopened.has_week(Platform::Yahoo, &league(), season, Week::new(1)).unwrap());
}
