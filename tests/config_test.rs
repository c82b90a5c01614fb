//! Config file round trips and account resolution through the public API

use fantasy_insights::{
    config::{AccountSelector, AppConfig, CacheTtls, LinkedAccount},
    InsightsError, LeagueId, Platform, TeamId,
};
use tempfile::TempDir;

fn linked(platform: Platform, league: &str, label: &str) -> LinkedAccount {
    LinkedAccount {
        platform,
        league_id: LeagueId::new(league),
        team_id: Some(TeamId::new("1")),
        label: label.to_string(),
    }
}

#[test]
fn test_saved_accounts_resolve_by_label() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = AppConfig::default();
    config.add_account(linked(Platform::Sleeper, "111", "dynasty"));
    config.add_account(linked(Platform::Yahoo, "423.l.9", "work"));
    config.cache = CacheTtls {
        live_secs: 30,
        ..CacheTtls::default()
    };
    config.save_to(&path).unwrap();

    let loaded = AppConfig::load_from(&path).unwrap();
    assert_eq!(loaded.cache.live_secs, 30);

    let selector = AccountSelector {
        account: Some("work".to_string()),
        ..Default::default()
    };
    let resolved = loaded.resolve_with_env(&selector, |_| None).unwrap();
    assert_eq!(resolved.platform, Platform::Yahoo);
    assert_eq!(resolved.league_id, LeagueId::new("423.l.9"));
}

#[test]
fn test_explicit_league_does_not_borrow_account_team() {
    let mut config = AppConfig::default();
    config.add_account(linked(Platform::Sleeper, "111", "dynasty"));

    let selector = AccountSelector {
        platform: Some(Platform::Espn),
        league_id: Some(LeagueId::new("555")),
        ..Default::default()
    };
    let resolved = config.resolve_with_env(&selector, |_| None).unwrap();

    assert_eq!(resolved.label, "espn:555");
    assert_eq!(resolved.team_id, None);
}

#[test]
fn test_no_league_anywhere_is_error() {
    let result = AppConfig::default().resolve_with_env(&AccountSelector::default(), |_| None);
    assert!(matches!(result, Err(InsightsError::MissingLeague { .. })));
}
