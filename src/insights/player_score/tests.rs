use super::*;
use crate::test_support::{player, sample_snapshot};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_blend_with_projection() {
    let mut p = player("w1", "WR", Position::WR, &[16.0, 19.0, 15.0, 18.0]);
    p.projection = Some(17.0);
    let score = score_player(&p, Week::new(5));

    let recent = (19.0 + 15.0 + 18.0) / 3.0;
    let season = 17.0;
    assert!(close(score.expected_points, 0.45 * recent + 0.25 * season + 0.30 * 17.0));
    assert_eq!(score.games_played, 4);
    assert_eq!(score.status, PlayerStatus::Active);
}

#[test]
fn test_blend_without_projection_renormalizes() {
    let p = player("r1", "RB", Position::RB, &[10.0, 10.0, 10.0]);
    let score = score_player(&p, Week::new(4));
    assert!(close(score.expected_points, 10.0));
    assert!(close(score.consistency, 1.0));
}

#[test]
fn test_no_history_uses_projection() {
    let mut p = player("r1", "RB", Position::RB, &[]);
    p.projection = Some(12.0);
    let score = score_player(&p, Week::new(1));
    assert!(close(score.expected_points, 12.0));
    assert!(close(score.consistency, 0.5));
    assert!(close(score.trend, 0.0));

    let unknown = score_player(&player("x", "X", Position::K, &[]), Week::new(1));
    assert_eq!(unknown.expected_points, 0.0);
    assert_eq!(unknown.rating, 0.0);
    assert!(close(unknown.confidence, 0.1));
}

#[test]
fn test_only_earlier_weeks_count() {
    let p = player("q", "QB", Position::QB, &[10.0, 20.0, 30.0]);
    let score = score_player(&p, Week::new(3));
    assert_eq!(score.games_played, 2);
    assert!(close(score.expected_points, 15.0));
}

#[test]
fn test_trend_classes() {
    let rising = score_player(&player("a", "A", Position::WR, &[2.0, 2.0, 2.0, 14.0, 15.0, 16.0]), Week::new(7));
    assert_eq!(rising.direction, Trend::Rising);
    assert!(rising.trend > 2.0);

    let falling = score_player(&player("b", "B", Position::WR, &[20.0, 20.0, 20.0, 5.0, 5.0, 5.0]), Week::new(7));
    assert_eq!(falling.direction, Trend::Falling);

    let steady = score_player(&player("c", "C", Position::WR, &[10.0, 11.0, 10.0, 11.0]), Week::new(5));
    assert_eq!(steady.direction, Trend::Steady);
    assert_eq!(Trend::from_delta(2.0), Trend::Steady);
}

#[test]
fn test_consistency_penalizes_volatility() {
    let steady = score_player(&player("a", "A", Position::RB, &[10.0, 10.0, 10.0, 10.0]), Week::new(5));
    let boom_bust = score_player(&player("b", "B", Position::RB, &[0.0, 20.0, 0.0, 20.0]), Week::new(5));
    assert!(close(steady.consistency, 1.0));
    assert!(close(boom_bust.consistency, 0.0));
    assert!(steady.confidence > boom_bust.confidence);

    let zeros = score_player(&player("z", "Z", Position::RB, &[0.0, 0.0]), Week::new(3));
    assert_eq!(zeros.consistency, 0.0);
}

#[test]
fn test_floor_and_ceiling_bracket_expected() {
    let score = score_player(&player("b", "B", Position::RB, &[0.0, 20.0, 0.0, 20.0]), Week::new(5));
    assert!(close(score.ceiling - score.expected_points, 10.0));
    assert!(score.floor >= 0.0);
    assert!(score.floor <= score.expected_points);
}

#[test]
fn test_rating_caps_at_100() {
    let elite = score_player(&player("q", "Q", Position::QB, &[40.0, 40.0]), Week::new(3));
    assert_eq!(elite.rating, 100.0);

    let te = score_player(&player("t", "T", Position::TE, &[7.0, 7.0]), Week::new(3));
    assert!(close(te.rating, 50.0));
}

#[test]
fn test_confidence_bounds() {
    let mut veteran = player("v", "V", Position::WR, &[10.0; 20]);
    veteran.projection = Some(10.0);
    let score = score_player(&veteran, Week::new(21));
    assert!(close(score.confidence, 0.95));

    let mut rookie = player("r", "R", Position::WR, &[]);
    rookie.projection = Some(8.0);
    assert!(close(score_player(&rookie, Week::new(1)).confidence, 0.1));
}

#[test]
fn test_injury_and_bye_adjustments() {
    let mut questionable = player("q", "Q", Position::WR, &[10.0, 10.0]);
    questionable.injury_status = InjuryStatus::Questionable;
    let score = score_player(&questionable, Week::new(3));
    assert!(close(score.expected_points, 8.5));
    assert!(close(score.baseline_points, 10.0));

    let mut out = player("o", "O", Position::WR, &[10.0, 10.0]);
    out.injury_status = InjuryStatus::Out;
    let score = score_player(&out, Week::new(3));
    assert_eq!(score.status, PlayerStatus::Unavailable);
    assert_eq!(score.expected_points, 0.0);
    assert_eq!(score.ceiling, 0.0);
    assert_eq!(unavailable_reason(&out, &score).as_deref(), Some("Ruled out (Out)"));

    let mut bye = player("b", "B", Position::WR, &[10.0, 10.0]);
    bye.bye_week = Some(3);
    let score = score_player(&bye, Week::new(3));
    assert_eq!(score.status, PlayerStatus::Bye);
    assert_eq!(score.expected_points, 0.0);
    assert_eq!(unavailable_reason(&bye, &score).as_deref(), Some("On bye"));
}

#[test]
fn test_risk_adjusted_moves_toward_ceiling() {
    let score = score_player(&player("b", "B", Position::RB, &[0.0, 20.0, 0.0, 20.0]), Week::new(5));
    assert!(score.risk_adjusted(1.0) > score.risk_adjusted(0.0));
    assert!(close(score.risk_adjusted(0.5), score.expected_points));
}

#[test]
fn test_score_all_covers_every_player() {
    let snapshot = sample_snapshot();
    let scores = score_all(&snapshot, Week::new(5));
    assert_eq!(scores.len(), snapshot.players.len());
    assert_eq!(scores[&PlayerId::new("i1")].status, PlayerStatus::Unavailable);
    assert!(scores[&PlayerId::new("q1")].rating > 90.0);
}
