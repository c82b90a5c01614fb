//! Unit tests for command handlers and their text output

use super::*;
use crate::cli::types::{LeagueId, Platform, PlayerId, Season, TeamId, Week};
use crate::cli::{AccountsCmd, TradeCmd};
use crate::config::{AppConfig, LinkedAccount};
use crate::error::InsightsError;
use crate::insights::{generate_insights, TradeVerdict};
use crate::storage::PerformanceStore;
use crate::test_support::{sample_snapshot, SnapshotSource};
use tempfile::TempDir;

fn account(team: Option<&str>) -> LinkedAccount {
    LinkedAccount {
        platform: Platform::Sleeper,
        league_id: LeagueId::new("L1"),
        team_id: team.map(TeamId::new),
        label: "home".to_string(),
    }
}

fn context(team: Option<&str>, store: Option<PerformanceStore>) -> CommandContext {
    CommandContext::with_source(
        account(team),
        Season::new(2025),
        Box::new(SnapshotSource::sample()),
        store,
    )
}

mod accounts_tests {
    use super::*;
    use crate::commands::accounts::{handle_accounts_at, new_account, render_accounts};

    #[test]
    fn test_add_list_remove_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        handle_accounts_at(
            &path,
            AccountsCmd::Add {
                on: Platform::Espn,
                league: LeagueId::new("222"),
                team: Some(TeamId::new("7")),
                label: Some("office".to_string()),
            },
            false,
        )
        .unwrap();
        handle_accounts_at(
            &path,
            AccountsCmd::Add {
                on: Platform::Sleeper,
                league: LeagueId::new("111"),
                team: None,
                label: None,
            },
            false,
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.accounts.len(), 2);
        assert_eq!(cfg.accounts[1].label, "sleeper:111");
        handle_accounts_at(&path, AccountsCmd::List, true).unwrap();

        handle_accounts_at(
            &path,
            AccountsCmd::Remove {
                label: "office".to_string(),
            },
            false,
        )
        .unwrap();
        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.accounts.len(), 1);

        let missing = handle_accounts_at(
            &path,
            AccountsCmd::Remove {
                label: "office".to_string(),
            },
            false,
        );
        assert!(matches!(missing, Err(InsightsError::UnknownAccount { .. })));
    }

    #[test]
    fn test_blank_label_falls_back_to_default() {
        let account = new_account(Platform::Yahoo, LeagueId::new("423.l.9"), None, Some("  ".into()));
        assert_eq!(account.label, "yahoo:423.l.9");
    }

    #[test]
    fn test_render_marks_default_account() {
        assert!(render_accounts(&[]).contains("No linked accounts"));
        let text = render_accounts(&[account(Some("1"))]);
        assert!(text.starts_with("* home (Sleeper league L1, team 1)"));
    }
}

mod teams_tests {
    use super::*;
    use crate::commands::teams::{fetch_summary, render_teams, summarize, TeamSummary};

    #[test]
    fn test_summary_for_sample_team() {
        let summary = summarize(&sample_snapshot(), &account(Some("1")), Week::new(5));

        assert_eq!(summary.team_name.as_deref(), Some("Gridiron Gurus"));
        assert_eq!(summary.standings_rank, Some(1));
        assert_eq!(summary.team_count, 2);
        assert_eq!(summary.points, Some(0.0));
        assert_eq!(summary.opponent_points, Some(0.0));
        assert!(render_teams(&[summary]).contains("Gridiron Gurus (3-1, #1 of 2) | week 5: 0.0 - 0.0"));
    }

    #[test]
    fn test_summary_without_team() {
        let summary = summarize(&sample_snapshot(), &account(None), Week::new(5));
        assert!(summary.team_name.is_none());
        assert!(render_teams(&[summary]).contains("no team selected (2 teams)"));
    }

    #[test]
    fn test_failed_account_is_reported_inline() {
        let failed = TeamSummary {
            error: Some("HTTP request failed".to_string()),
            ..summarize(&sample_snapshot(), &account(None), Week::new(5))
        };
        assert!(render_teams(&[failed]).contains("home [Sleeper]: error: HTTP request failed"));
    }

    #[tokio::test]
    async fn test_fetch_summary_uses_current_week() {
        let source = SnapshotSource::sample();
        let summary = fetch_summary(&source, &account(Some("2")), Season::new(2025), None)
            .await
            .unwrap();
        assert_eq!(summary.week, Some(Week::new(5)));
        assert_eq!(summary.team_name.as_deref(), Some("Blitz Brigade"));
        assert_eq!(summary.standings_rank, Some(2));
    }
}

mod scores_tests {
    use super::*;
    use crate::commands::scores::{matchup_scores, render_scores};

    #[test]
    fn test_scores_named_and_filtered_by_week() {
        let snapshot = sample_snapshot();
        let scores = matchup_scores(&snapshot.teams, &snapshot.matchups, Week::new(5));

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].home.team_name, "Gridiron Gurus");
        assert_eq!(scores[0].away.as_ref().unwrap().team_name, "Blitz Brigade");
        assert!(render_scores(&scores, Week::new(5)).contains("Gridiron Gurus 0.0  vs  Blitz Brigade 0.0"));

        let none = matchup_scores(&snapshot.teams, &snapshot.matchups, Week::new(6));
        assert_eq!(render_scores(&none, Week::new(6)), "No matchups in week 6");
    }

    #[tokio::test]
    async fn test_handle_scores_without_team() {
        let ctx = context(None, None);
        crate::commands::scores::handle_scores(&ctx, None, true)
            .await
            .unwrap();
    }
}

mod context_tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_defaults_to_current_week() {
        let mut ctx = context(Some("1"), None);
        let (snapshot, week) = ctx.snapshot(None).await.unwrap();

        assert_eq!(week, Week::new(5));
        assert_eq!(snapshot.players.len(), sample_snapshot().players.len());
        let q1 = &snapshot.players[&PlayerId::new("q1")];
        assert_eq!(q1.weekly.len(), 4);
    }

    #[tokio::test]
    async fn test_team_commands_require_team() {
        let mut ctx = context(None, None);
        assert!(matches!(ctx.team_id(), Err(InsightsError::MissingTeam { .. })));

        let result = crate::commands::lineup::handle_lineup(&mut ctx, None, true).await;
        assert!(matches!(result, Err(InsightsError::MissingTeam { .. })));
    }

    #[tokio::test]
    async fn test_team_handlers_run_against_sample_league() {
        let mut ctx = context(Some("1"), None);
        crate::commands::lineup::handle_lineup(&mut ctx, None, false).await.unwrap();
        crate::commands::waivers::handle_waivers(&mut ctx, None, 3, true).await.unwrap();
        crate::commands::insights::handle_insights(&mut ctx, None, 3, false).await.unwrap();
        crate::commands::trade::handle_trade(&mut ctx, TradeCmd::Value { names: vec![] }, None, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_team_is_error() {
        let mut ctx = context(Some("99"), None);
        let result = crate::commands::waivers::handle_waivers(&mut ctx, None, 3, false).await;
        assert!(matches!(result, Err(InsightsError::TeamNotFound { .. })));
    }
}

mod trade_tests {
    use super::*;
    use crate::commands::trade::{evaluate_by_name, lookup_values, render_evaluation};

    #[test]
    fn test_lookup_returns_every_match_by_value() {
        let values = lookup_values(&sample_snapshot(), &["charlie".to_string()], Week::new(5)).unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values[0].name, "WR Charlie");
        assert!(values[0].value > values[1].value);
    }

    #[test]
    fn test_unknown_player_is_error() {
        let result = lookup_values(&sample_snapshot(), &["Nobody".to_string()], Week::new(5));
        assert!(matches!(result, Err(InsightsError::PlayerNotFound { name }) if name == "Nobody"));
    }

    #[test]
    fn test_evaluate_prefers_exact_names() {
        let evaluation = evaluate_by_name(
            &sample_snapshot(),
            &["rb charlie".to_string()],
            &["WR Charlie".to_string()],
            Week::new(5),
        )
        .unwrap();

        assert_eq!(evaluation.give[0].name, "RB Charlie");
        assert_eq!(evaluation.get[0].name, "WR Charlie");
        assert_eq!(evaluation.verdict, TradeVerdict::Accept);
        let text = render_evaluation(&evaluation);
        assert!(text.starts_with("You give\n"));
        assert!(text.contains("ACCEPT"));
    }
}

mod sync_tests {
    use super::*;
    use crate::commands::sync::{render_sync, sync_weeks};

    #[tokio::test]
    async fn test_sync_skips_stored_weeks_unless_forced() {
        let source = SnapshotSource::sample();
        let mut store = PerformanceStore::in_memory().unwrap();
        let league = LeagueId::new("L1");
        let season = Season::new(2025);

        let first = sync_weeks(&source, &mut store, &league, season, Week::new(3), false)
            .await
            .unwrap();
        assert_eq!(first.fetched, vec![Week::new(1), Week::new(2), Week::new(3)]);
        assert!(first.rows_written > 0);
        assert_eq!(first.players_stored, sample_snapshot().players.len());

        let second = sync_weeks(&source, &mut store, &league, season, Week::new(3), false)
            .await
            .unwrap();
        assert!(second.fetched.is_empty());
        assert_eq!(second.skipped.len(), 3);
        assert!(render_sync(&second).contains("already stored: 1, 2, 3"));

        let forced = sync_weeks(&source, &mut store, &league, season, Week::new(3), true)
            .await
            .unwrap();
        assert_eq!(forced.fetched.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_week_does_not_stop_sync() {
        let source = SnapshotSource {
            failing_week: Some(2),
            ..SnapshotSource::sample()
        };
        let mut store = PerformanceStore::in_memory().unwrap();

        let report = sync_weeks(
            &source,
            &mut store,
            &LeagueId::new("L1"),
            Season::new(2025),
            Week::new(3),
            false,
        )
        .await
        .unwrap();

        assert_eq!(report.fetched, vec![Week::new(1), Week::new(3)]);
        assert_eq!(report.failed, vec![Week::new(2)]);
        assert!(render_sync(&report).contains("failed: 2"));
    }

    #[tokio::test]
    async fn test_sync_without_store_is_error() {
        let mut ctx = context(Some("1"), None);
        let result = crate::commands::sync::handle_sync(&mut ctx, Week::new(2), false, true).await;
        assert!(matches!(result, Err(InsightsError::Storage(_))));
    }

    #[tokio::test]
    async fn test_snapshot_reads_synced_history() {
        let mut ctx = context(Some("1"), Some(PerformanceStore::in_memory().unwrap()));
        crate::commands::sync::handle_sync(&mut ctx, Week::new(4), false, true)
            .await
            .unwrap();

        let (snapshot, _) = ctx.snapshot(None).await.unwrap();
        assert_eq!(snapshot.players[&PlayerId::new("w3")].weekly.len(), 4);
    }
}

mod insights_tests {
    use super::*;
    use crate::commands::insights::render_insights;

    #[test]
    fn test_report_text_sections() {
        let insights = generate_insights(&sample_snapshot(), &TeamId::new("1"), Week::new(5), 3).unwrap();
        let text = render_insights(&insights);

        assert!(text.starts_with("Gridiron Gurus (3-1) | week 5\n"));
        assert!(text.contains("• Critical need at TE"));
        assert!(text.contains("\nNeeds\n"));
        assert!(text.contains("Start WR Charlie over RB Charlie at WR"));
        assert!(text.contains("vs Blitz Brigade: projected"));
    }
}
