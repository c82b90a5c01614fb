//! `insights` command: the full team report.

use crate::{
    cli::types::Week,
    insights::{generate_insights, NeedLevel, TeamInsights},
    Result,
};

use super::common::{emit, pct, pts, CommandContext};
use super::lineup::render_lineup;
use super::trade::render_values;
use super::waivers::render_waivers;

/// Handle the insights command
pub async fn handle_insights(
    ctx: &mut CommandContext,
    week: Option<Week>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let team_id = ctx.team_id()?;
    let (snapshot, week) = ctx.snapshot(week).await?;
    let insights = generate_insights(&snapshot, &team_id, week, limit)?;

    emit(json, &insights, |i| render_insights(i))
}

pub fn render_insights(insights: &TeamInsights) -> String {
    let analysis = &insights.analysis;
    let strategy = &insights.strategy;
    let mut out = format!(
        "{} ({}) | week {}\n",
        insights.team.name, insights.team.record, insights.week
    );
    out.push_str(&format!(
        "{}, power rank #{}, standings #{} | strategy: {} (risk {:.2})\n",
        analysis.situation,
        analysis.power_rank,
        analysis.standings_rank,
        strategy.approach,
        strategy.risk_tolerance
    ));

    if !insights.headlines.is_empty() {
        out.push('\n');
        for line in &insights.headlines {
            out.push_str(&format!("• {}\n", line));
        }
    }

    out.push_str("\nNeeds\n");
    for need in &analysis.needs {
        let thin = if need.thin { ", thin" } else { "" };
        out.push_str(&format!(
            "  {:<3} {:<13} {} vs league {} ({} healthy{})\n",
            need.position.to_string(),
            need.level.to_string(),
            pts(need.strength),
            pts(need.league_average),
            need.healthy,
            thin
        ));
    }

    if !strategy.priorities.is_empty() {
        out.push_str("\nPriorities\n");
        for priority in &strategy.priorities {
            out.push_str(&format!("  - {}\n", priority));
        }
    }

    out.push('\n');
    out.push_str(&render_lineup(&insights.lineup, &insights.team.name));

    out.push('\n');
    out.push_str(&render_waivers(&insights.waivers, insights.week));

    if !insights.trade_chips.is_empty() {
        out.push_str("\nTrade chips\n");
        out.push_str(&render_values(&insights.trade_chips));
    }

    if let Some(m) = &insights.matchup {
        out.push_str("\nMatchup\n");
        match (&m.opponent_name, m.opponent_projected) {
            (Some(name), Some(opp)) => out.push_str(&format!(
                "  vs {}: projected {} - {}{}\n",
                name,
                pts(m.projected_points),
                pts(opp),
                m.win_probability
                    .map(|p| format!(", {} to win", pct(p)))
                    .unwrap_or_default()
            )),
            _ => out.push_str(&format!("  bye, projected {}\n", pts(m.projected_points))),
        }
        if let Some(live) = m.live {
            out.push_str(&format!(
                "  live: {} - {}\n",
                pts(live.points),
                pts(live.opponent_points)
            ));
        }
    }

    if analysis.positions_at(NeedLevel::CriticalNeed).is_empty()
        && analysis.positions_at(NeedLevel::ModerateNeed).is_empty()
    {
        out.push_str("\nNo positional needs this week.\n");
    }
    out
}
