//! `trade` command: player values and trade evaluation.

use crate::{
    cli::{types::Week, TradeCmd},
    error::InsightsError,
    insights::{
        player_score::score_player,
        trade::{evaluate_trade, trade_chips, trade_value},
        TeamContext, TradeEvaluation, TradeValue,
    },
    models::{LeagueSnapshot, Player},
    Result,
};

use super::common::{emit, pts, CommandContext};

/// Handle the trade subcommands
pub async fn handle_trade(
    ctx: &mut CommandContext,
    cmd: TradeCmd,
    week: Option<Week>,
    json: bool,
) -> Result<()> {
    match cmd {
        TradeCmd::Value { names } if names.is_empty() => {
            let team_id = ctx.team_id()?;
            let (snapshot, week) = ctx.snapshot(week).await?;
            let team_ctx = TeamContext::build(&snapshot, &team_id, week)?;
            let chips = trade_chips(&team_ctx);
            emit(json, &chips, |c| {
                if c.is_empty() {
                    format!("{} has no surplus bench players to trade", team_ctx.team.name)
                } else {
                    format!("Trade chips for {}\n{}", team_ctx.team.name, render_values(c))
                }
            })
        }
        TradeCmd::Value { names } => {
            let (snapshot, week) = ctx.snapshot(week).await?;
            let values = lookup_values(&snapshot, &names, week)?;
            emit(json, &values, |v| render_values(v))
        }
        TradeCmd::Evaluate { give, get } => {
            let (snapshot, week) = ctx.snapshot(week).await?;
            let evaluation = evaluate_by_name(&snapshot, &give, &get, week)?;
            emit(json, &evaluation, |e| render_evaluation(e))
        }
    }
}

fn value_of(snapshot: &LeagueSnapshot, player: &Player, week: Week) -> TradeValue {
    trade_value(player, &score_player(player, week), &snapshot.league)
}

/// Values of every player matching each name, most valuable first.
pub fn lookup_values(snapshot: &LeagueSnapshot, names: &[String], week: Week) -> Result<Vec<TradeValue>> {
    let mut values = Vec::new();
    for name in names {
        let found = snapshot.find_players(name);
        if found.is_empty() {
            return Err(InsightsError::PlayerNotFound { name: name.clone() });
        }
        values.extend(found.into_iter().map(|p| value_of(snapshot, p, week)));
    }
    values.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    values.dedup_by(|a, b| a.player_id == b.player_id);
    Ok(values)
}

/// One player per name: an exact (case-insensitive) match, else the first substring match.
fn resolve_player<'a>(snapshot: &'a LeagueSnapshot, name: &str) -> Result<&'a Player> {
    let found = snapshot.find_players(name);
    found
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .or_else(|| found.first())
        .copied()
        .ok_or_else(|| InsightsError::PlayerNotFound {
            name: name.to_string(),
        })
}

pub fn evaluate_by_name(
    snapshot: &LeagueSnapshot,
    give: &[String],
    get: &[String],
    week: Week,
) -> Result<TradeEvaluation> {
    let side = |names: &[String]| -> Result<Vec<TradeValue>> {
        names
            .iter()
            .map(|n| resolve_player(snapshot, n).map(|p| value_of(snapshot, p, week)))
            .collect()
    };
    Ok(evaluate_trade(side(give)?, side(get)?))
}

pub fn render_values(values: &[TradeValue]) -> String {
    values
        .iter()
        .map(|v| {
            format!(
                "  {:<24} {:<3} value {:>5}  rating {:>5}  {}\n",
                v.name,
                v.position.to_string(),
                pts(v.value),
                pts(v.rating),
                v.tier
            )
        })
        .collect()
}

pub fn render_evaluation(evaluation: &TradeEvaluation) -> String {
    format!(
        "You give\n{}You get\n{}{}",
        render_values(&evaluation.give),
        render_values(&evaluation.get),
        evaluation.summary
    )
}
