//! `lineup` command: start/sit calls for the selected team.

use crate::{
    cli::types::Week,
    insights::{LineupRecommendation, TeamContext},
    Result,
};

use super::common::{emit, pts, CommandContext};

/// Handle the lineup command
pub async fn handle_lineup(ctx: &mut CommandContext, week: Option<Week>, json: bool) -> Result<()> {
    let team_id = ctx.team_id()?;
    let (snapshot, week) = ctx.snapshot(week).await?;
    let team_ctx = TeamContext::build(&snapshot, &team_id, week)?;

    emit(json, &team_ctx.lineup, |l| render_lineup(l, &team_ctx.team.name))
}

pub fn render_lineup(lineup: &LineupRecommendation, team_name: &str) -> String {
    let mut out = format!(
        "{}, week {}: optimal {} pts",
        team_name,
        lineup.week,
        pts(lineup.optimal_points)
    );
    if lineup.current_points > 0.0 {
        out.push_str(&format!(" (current lineup {} pts)", pts(lineup.current_points)));
    }
    out.push('\n');

    let mut benched = false;
    for entry in &lineup.entries {
        if entry.slot.is_none() && !benched {
            out.push_str("Bench\n");
            benched = true;
        }
        let slot = entry.slot.map(|s| s.to_string()).unwrap_or_else(|| "BN".to_string());
        out.push_str(&format!(
            "  {:<5} {:<24} {:<3} {:>11} {:>6} pts  {}\n",
            slot,
            entry.name,
            entry.position.to_string(),
            entry.label.to_string(),
            pts(entry.expected_points),
            entry.reason
        ));
    }

    if !lineup.changes.is_empty() {
        out.push_str(&format!("Changes (+{} pts)\n", pts(lineup.gain())));
        for change in &lineup.changes {
            let bench = change
                .bench_name
                .as_deref()
                .map(|b| format!(" over {}", b))
                .unwrap_or_default();
            out.push_str(&format!(
                "  Start {}{} at {} (+{})\n",
                change.start_name,
                bench,
                change.slot,
                pts(change.gain)
            ));
        }
    }
    out
}
