//! Unit tests for the Sleeper adapter

use super::*;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn league_json() -> Value {
    json!({
        "league_id": "289646328504385536",
        "name": "Sleeperbot Dynasty",
        "season": "2024",
        "total_rosters": 2,
        "status": "in_season",
        "settings": {"waiver_type": 2, "waiver_budget": 200, "leg": 5},
        "scoring_settings": {
            "pass_yd": 0.04,
            "pass_td": 4.0,
            "rec": 0.5,
            "rec_yd": 0.1,
            "rush_yd": 0.1,
            "bonus_rec_te": 0.5,
            "bonus_rec_wr": 0.0
        },
        "roster_positions": ["QB", "RB", "RB", "WR", "WR", "TE", "FLEX", "SUPER_FLEX", "K", "DEF", "BN", "BN", "IR"]
    })
}

fn rosters_json() -> Value {
    json!([
        {
            "roster_id": 1,
            "owner_id": "u1",
            "players": ["4046", "6794", "7564"],
            "starters": ["4046", "6794", "0"],
            "reserve": ["7564"],
            "settings": {
                "wins": 3, "losses": 1, "ties": 0,
                "fpts": 480, "fpts_decimal": 52,
                "fpts_against": 410, "fpts_against_decimal": 8,
                "waiver_budget_used": 35
            }
        },
        {
            "roster_id": 2,
            "owner_id": "u2",
            "players": null,
            "starters": [],
            "reserve": null,
            "settings": {"wins": 1, "losses": 3}
        }
    ])
}

fn users_json() -> Value {
    json!([
        {"user_id": "u1", "display_name": "jdoe", "metadata": {"team_name": "Dynasty Warriors"}},
        {"user_id": "u2", "display_name": "asmith", "metadata": {}}
    ])
}

fn players_json() -> Value {
    json!({
        "4046": {"full_name": "Patrick Mahomes", "position": "QB", "team": "KC", "injury_status": null},
        "6794": {"full_name": "Justin Jefferson", "position": "WR", "team": "MIN", "injury_status": "Questionable"},
        "7564": {"full_name": "Injured Back", "position": "RB", "team": "DAL", "injury_status": "IR"},
        "KC": {"first_name": "Kansas City", "last_name": "Chiefs", "position": "DEF", "team": "KC"},
        "9999": {"full_name": "Retired Guy", "position": "WR", "team": null},
        "1234": {"full_name": "Some Linebacker", "position": "LB", "team": "NYG"}
    })
}

#[test]
fn test_parse_league() {
    let league = parse_league(&league_json()).unwrap();

    assert_eq!(league.id, LeagueId::new("289646328504385536"));
    assert_eq!(league.name, "Sleeperbot Dynasty");
    assert_eq!(league.season, Season::new(2024));
    assert_eq!(league.current_week, Week::new(5));
    assert_eq!(league.team_count, 2);
    assert_eq!(league.waivers, WaiverSettings::Faab { budget: 200 });
    assert_eq!(league.roster_slots.len(), 13);
    assert!(league.has_superflex());
    assert_eq!(league.starting_slots().count(), 10);
}

#[test]
fn test_parse_league_missing_id_is_error() {
    let mut raw = league_json();
    raw.as_object_mut().unwrap().remove("league_id");
    assert!(matches!(
        parse_league(&raw),
        Err(InsightsError::MissingField { .. })
    ));
}

#[test]
fn test_parse_league_rolling_waivers_and_week_fallback() {
    let mut raw = league_json();
    raw["settings"] = json!({"waiver_type": 0, "leg": 0, "last_scored_leg": 7});
    let league = parse_league(&raw).unwrap();

    assert_eq!(league.waivers, WaiverSettings::Rolling);
    assert_eq!(league.current_week, Week::new(8));
}

#[test]
fn test_scoring_bonus_becomes_position_override() {
    let scoring = scoring_from_sleeper(&league_json()["scoring_settings"]);

    assert_eq!(scoring.points_per("rec", Position::TE), Some(1.0));
    assert_eq!(scoring.points_per("rec", Position::WR), Some(0.5));
    assert_eq!(scoring.points_per("rec", Position::RB), Some(0.5));
    assert!(!scoring.rules.contains_key("bonus_rec_te"));
}

#[test]
fn test_parse_teams_joins_users() {
    let teams = parse_teams(&LeagueId::new("L"), &rosters_json(), &users_json()).unwrap();

    assert_eq!(teams.len(), 2);
    let first = &teams[0];
    assert_eq!(first.team_id, TeamId::new("1"));
    assert_eq!(first.name, "Dynasty Warriors");
    assert_eq!(first.owner_name.as_deref(), Some("jdoe"));
    assert_eq!(first.record.wins, 3);
    assert!((first.record.points_for - 480.52).abs() < 1e-9);
    assert!((first.record.points_against - 410.08).abs() < 1e-9);
    assert_eq!(first.players.len(), 3);
    // Empty starter slot "0" is dropped
    assert_eq!(first.starters.len(), 2);
    assert!(first.is_reserve(&PlayerId::new("7564")));
    assert_eq!(first.faab_used, Some(35));

    // No team name falls back to display name, null players to empty
    let second = &teams[1];
    assert_eq!(second.name, "asmith");
    assert!(second.players.is_empty());
    assert_eq!(second.faab_used, None);
}

#[test]
fn test_parse_player_index_filters_positions() {
    let index = parse_player_index(&players_json());

    assert_eq!(index.len(), 5); // linebacker dropped
    assert_eq!(index["KC"].name, "Kansas City Chiefs");
    assert_eq!(index["KC"].position, Position::DEF);
    assert_eq!(index["6794"].injury_status, InjuryStatus::Questionable);
    assert_eq!(index["7564"].injury_status, InjuryStatus::InjuredReserve);
    assert_eq!(index["4046"].nfl_team.as_deref(), Some("KC"));
}

#[test]
fn test_select_player_pool_keeps_rostered_and_signed_players() {
    let index = parse_player_index(&players_json());
    let rostered_ids = [PlayerId::new("4046")];
    let rostered: HashSet<&PlayerId> = rostered_ids.iter().collect();
    let projections = parse_stat_lines(&json!({"4046": {"pass_yd": 250, "pass_td": 2}}));

    let pool = select_player_pool(&index, &rostered, &projections, &ScoringSettings::standard());

    assert!(pool.iter().all(|p| p.id.as_str() != "9999"));
    let mahomes = pool.iter().find(|p| p.id.as_str() == "4046").unwrap();
    assert_eq!(mahomes.projection, Some(18.0));
    let jefferson = pool.iter().find(|p| p.id.as_str() == "6794").unwrap();
    assert_eq!(jefferson.projection, None);
}

#[test]
fn test_parse_stat_lines_skips_non_numeric() {
    let lines = parse_stat_lines(&json!({
        "4046": {"pass_yd": 301.0, "pass_td": "3", "gp": 1, "note": "x"},
        "bad": "not an object"
    }));

    assert_eq!(lines.len(), 1);
    let line = &lines["4046"];
    assert_eq!(line["pass_td"], 3.0);
    assert!(!line.contains_key("note"));
}

#[test]
fn test_score_week_uses_position_overrides() {
    let index = parse_player_index(&players_json());
    let scoring = scoring_from_sleeper(&json!({"rec": 1.0, "rec_yd": 0.1, "bonus_rec_wr": 0.5}));
    let stats = parse_stat_lines(&json!({
        "6794": {"rec": 8, "rec_yd": 120},
        "unknown": {"rec": 5}
    }));

    let points = score_week(&index, &stats, &HashMap::new(), &scoring, Week::new(3));

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].player_id, PlayerId::new("6794"));
    assert_eq!(points[0].points, 24.0);
    assert_eq!(points[0].week, Week::new(3));
    assert_eq!(points[0].projected, None);
}

#[test]
fn test_parse_matchups_pairs_and_byes() {
    let raw = json!([
        {"roster_id": 2, "matchup_id": 1, "points": 98.5},
        {"roster_id": 1, "matchup_id": 1, "points": 110.2, "custom_points": null},
        {"roster_id": 3, "matchup_id": 2, "points": 0},
        {"roster_id": 4, "matchup_id": 2, "points": 0},
        {"roster_id": 5, "matchup_id": null, "points": 77.0}
    ]);

    let matchups = parse_matchups(Week::new(4), &raw).unwrap();

    assert_eq!(matchups.len(), 3);
    assert_eq!(matchups[0].home.team_id, TeamId::new("1"));
    assert_eq!(matchups[0].away.as_ref().unwrap().points, 98.5);
    assert!(!matchups[1].has_started());
    assert!(matchups[2].away.is_none());
    assert_eq!(matchups[2].matchup_id, 3);
}

#[tokio::test]
async fn test_source_fetches_league_and_teams() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/league/289646328504385536"))
        .respond_with(ResponseTemplate::new(200).set_body_json(league_json()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/league/289646328504385536/rosters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rosters_json()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/league/289646328504385536/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_json()))
        .mount(&mock_server)
        .await;

    let source = SleeperSource::with_base_url(mock_server.uri()).unwrap();
    let league_id = LeagueId::new("289646328504385536");

    let league = source.fetch_league(&league_id, Season::new(2024)).await.unwrap();
    assert_eq!(league.name, "Sleeperbot Dynasty");

    let teams = source.fetch_teams(&league_id, Season::new(2024)).await.unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(source.platform(), Platform::Sleeper);
}

#[tokio::test]
async fn test_source_weekly_points_scores_raw_stats() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/league/L1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(league_json()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/players/nfl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(players_json()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stats/nfl/regular/2024/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"4046": {"pass_yd": 300, "pass_td": 3}})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projections/nfl/regular/2024/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = SleeperSource::with_base_url(mock_server.uri()).unwrap();
    let league_id = LeagueId::new("L1");

    let points = source
        .fetch_weekly_points(&league_id, Season::new(2024), Week::new(2))
        .await
        .unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].points, 24.0);

    // Player index is fetched once per source
    source
        .fetch_weekly_points(&league_id, Season::new(2024), Week::new(2))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_source_http_error_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/league/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = SleeperSource::with_base_url(mock_server.uri()).unwrap();
    let result = source
        .fetch_league(&LeagueId::new("missing"), Season::new(2024))
        .await;

    assert!(matches!(result, Err(InsightsError::Http(_))));
}
