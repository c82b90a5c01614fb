//! `waivers` command: ranked free-agent pickups.

use crate::{
    cli::types::Week,
    insights::{waivers::generate_waiver_targets, TeamContext, WaiverTarget},
    Result,
};

use super::common::{emit, pts, CommandContext};

/// Handle the waivers command
pub async fn handle_waivers(
    ctx: &mut CommandContext,
    week: Option<Week>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let team_id = ctx.team_id()?;
    let (snapshot, week) = ctx.snapshot(week).await?;
    let team_ctx = TeamContext::build(&snapshot, &team_id, week)?;
    let targets = generate_waiver_targets(&team_ctx, limit);

    emit(json, &targets, |t| render_waivers(t, week))
}

pub fn render_waivers(targets: &[WaiverTarget], week: Week) -> String {
    if targets.is_empty() {
        return format!("No waiver targets improve your roster in week {}", week);
    }
    let mut out = format!("Waiver targets for week {}\n", week);
    for (i, t) in targets.iter().enumerate() {
        let team = t.nfl_team.as_deref().unwrap_or("FA");
        let bid = t.faab_bid.map(|b| format!("  bid ${}", b)).unwrap_or_default();
        out.push_str(&format!(
            "{:>2}. {} ({} {}) {}  {} pts{}\n",
            i + 1,
            t.name,
            t.position,
            team,
            t.priority,
            pts(t.expected_points),
            bid
        ));
        out.push_str(&format!("    {}\n", t.reason));
        if let Some(drop) = &t.drop_name {
            out.push_str(&format!("    drop: {}\n", drop));
        }
    }
    out
}
