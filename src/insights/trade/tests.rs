use super::*;
use crate::cli::types::{LineupSlot, TeamId, Week};
use crate::insights::player_score::score_player;
use crate::models::InjuryStatus;
use crate::scoring::ScoringSettings;
use crate::test_support::{player, sample_league, sample_snapshot};

fn value_of(position: Position, points: f64, league: &League) -> TradeValue {
    let p = player("p", "P", position, &[points, points]);
    trade_value(&p, &score_player(&p, Week::new(3)), league)
}

fn asset(id: &str, value: f64) -> TradeValue {
    TradeValue {
        player_id: PlayerId::new(id),
        name: id.to_string(),
        position: Position::WR,
        rating: value,
        value,
        tier: TradeTier::from_value(value),
    }
}

#[test]
fn test_tiers() {
    assert_eq!(TradeTier::from_value(80.0), TradeTier::Elite);
    assert_eq!(TradeTier::from_value(79.9), TradeTier::High);
    assert_eq!(TradeTier::from_value(40.0), TradeTier::Mid);
    assert_eq!(TradeTier::from_value(20.0), TradeTier::Low);
    assert_eq!(TradeTier::from_value(19.9), TradeTier::Minimal);
}

#[test]
fn test_scarcity_table() {
    assert_eq!(scarcity(Position::RB, 50.0, false), 1.15);
    assert_eq!(scarcity(Position::TE, 60.0, false), 1.10);
    assert_eq!(scarcity(Position::TE, 59.0, false), 0.90);
    assert_eq!(scarcity(Position::QB, 90.0, false), 0.85);
    assert_eq!(scarcity(Position::QB, 90.0, true), 1.25);
    assert_eq!(scarcity(Position::K, 90.0, false), 0.30);
    assert_eq!(scarcity(Position::DEF, 90.0, false), 0.35);
}

#[test]
fn test_ppr_favours_receivers() {
    let ppr = sample_league();
    let wr = value_of(Position::WR, 9.0, &ppr);
    assert!((wr.rating - 50.0).abs() < 1e-9);
    assert!((wr.value - 52.5).abs() < 1e-9);
    assert_eq!(wr.tier, TradeTier::Mid);

    let rb = value_of(Position::RB, 9.0, &ppr);
    assert!((rb.value - 57.5).abs() < 1e-9);

    let mut standard = sample_league();
    standard.scoring = ScoringSettings::standard();
    let rb = value_of(Position::RB, 9.0, &standard);
    assert!((rb.value - 50.0 * 1.15 * 1.05).abs() < 1e-9);
}

#[test]
fn test_superflex_lifts_quarterbacks() {
    let mut league = sample_league();
    let one_qb = value_of(Position::QB, 24.0, &league);
    league.roster_slots.push(LineupSlot::SuperFlex);
    let superflex = value_of(Position::QB, 24.0, &league);

    assert!((one_qb.value - 85.0).abs() < 1e-9);
    assert!((superflex.value - 125.0).abs() < 1e-9);
}

#[test]
fn test_injury_discounts_value_but_bye_does_not() {
    let league = sample_league();
    let mut hurt = player("h", "H", Position::WR, &[18.0, 18.0]);
    hurt.injury_status = InjuryStatus::Doubtful;
    let value = trade_value(&hurt, &score_player(&hurt, Week::new(3)), &league);
    assert!((value.value - 100.0 * 1.05 * 0.35).abs() < 1e-9);

    let mut resting = player("b", "B", Position::WR, &[18.0, 18.0]);
    resting.bye_week = Some(3);
    let value = trade_value(&resting, &score_player(&resting, Week::new(3)), &league);
    assert!((value.value - 105.0).abs() < 1e-9);
}

#[test]
fn test_consolidation_premium_goes_to_best_asset() {
    let eval = evaluate_trade(vec![asset("star", 80.0)], vec![asset("a", 45.0), asset("b", 40.0)]);
    assert!((eval.give_total - 88.0).abs() < 1e-9);
    assert!((eval.get_total - 85.0).abs() < 1e-9);
    assert_eq!(eval.verdict, TradeVerdict::Fair);
}

#[test]
fn test_verdicts() {
    let accept = evaluate_trade(vec![asset("a", 30.0)], vec![asset("b", 40.0)]);
    assert_eq!(accept.verdict, TradeVerdict::Accept);
    assert!(accept.summary.starts_with("ACCEPT"));

    let decline = evaluate_trade(vec![asset("a", 50.0)], vec![asset("b", 30.0), asset("c", 10.0)]);
    assert_eq!(decline.verdict, TradeVerdict::Decline);

    let even = evaluate_trade(vec![asset("a", 40.0)], vec![asset("b", 40.0)]);
    assert_eq!(even.verdict, TradeVerdict::Fair);
    assert_eq!(even.give_total, 40.0);
}

#[test]
fn test_trade_chips_come_from_strength_bench() {
    let mut snapshot = sample_snapshot();
    let backup = player("q9", "Backup QB", Position::QB, &[18.0, 18.0, 18.0, 18.0]);
    snapshot.players.insert(backup.id.clone(), backup);
    snapshot.teams[0].players.push(PlayerId::new("q9"));

    let ctx = TeamContext::build(&snapshot, &TeamId::new("1"), Week::new(5)).unwrap();
    let chips = trade_chips(&ctx);

    assert_eq!(chips.len(), 1);
    assert_eq!(chips[0].player_id, PlayerId::new("q9"));
    assert_eq!(chips[0].position, Position::QB);
}
