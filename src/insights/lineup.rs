//! Start/sit labels and the optimal lineup for a week.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::player_score::{score_player, unavailable_reason, PlayerScore, PlayerStatus};
use crate::cli::types::{LineupSlot, PlayerId, Position, TeamId, Week};
use crate::models::{LeagueSnapshot, Player, Team};


/// A benched player this close to the weakest starter is a borderline call.
pub const BORDERLINE_MARGIN: f64 = 2.0;
const MUST_START_RATING: f64 = 70.0;
const MUST_START_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartSit {
    MustStart,
    Start,
    Borderline,
    Sit,
}

impl StartSit {
    pub fn is_start(&self) -> bool {
        matches!(self, StartSit::MustStart | StartSit::Start)
    }
}

impl fmt::Display for StartSit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StartSit::MustStart => "MUST START",
            StartSit::Start => "START",
            StartSit::Borderline => "BORDERLINE",
            StartSit::Sit => "SIT",
        };
        write!(f, "{}", s)
    }
}

/// One starting slot and who fills it; `None` when nobody eligible is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot: LineupSlot,
    pub player_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Slot in the optimal lineup, `None` on the bench.
    pub slot: Option<LineupSlot>,
    pub label: StartSit,
    pub expected_points: f64,
    pub rating: f64,
    pub confidence: f64,
    pub reason: String,
}

/// A swap that moves the current lineup toward the optimal one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupChange {
    pub start: PlayerId,
    pub start_name: String,
    pub bench: Option<PlayerId>,
    pub bench_name: Option<String>,
    pub slot: LineupSlot,
    pub gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupRecommendation {
    pub team_id: TeamId,
    pub week: Week,
    pub slots: Vec<SlotAssignment>,
    /// Optimal starters in slot order, then the bench by expected points.
    pub entries: Vec<LineupEntry>,
    pub changes: Vec<LineupChange>,
    pub optimal_points: f64,
    /// Expected points of the lineup the team has set; 0 when the platform
    /// did not report starters.
    pub current_points: f64,
}

impl LineupRecommendation {
    pub fn starters(&self) -> impl Iterator<Item = &PlayerId> {
        self.slots.iter().filter_map(|s| s.player_id.as_ref())
    }

    pub fn is_starter(&self, player_id: &PlayerId) -> bool {
        self.starters().any(|id| id == player_id)
    }

    pub fn entry(&self, player_id: &PlayerId) -> Option<&LineupEntry> {
        self.entries.iter().find(|e| &e.player_id == player_id)
    }

    pub fn gain(&self) -> f64 {
        self.changes.iter().map(|c| c.gain).sum()
    }
}

fn by_expected_desc(a: &PlayerScore, b: &PlayerScore) -> Ordering {
    b.expected_points
        .partial_cmp(&a.expected_points)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Fill the starting slots of `slots` from `candidates`.
///
/// Dedicated slots are filled first in template order, then flex slots from
/// the narrowest to the widest; each takes the highest-expected eligible
/// player still unused. Players on bye or ruled out are never placed.
pub fn optimal_lineup(slots: &[LineupSlot], candidates: &[&PlayerScore]) -> Vec<SlotAssignment> {
    let mut ranked: Vec<&PlayerScore> = candidates
        .iter()
        .copied()
        .filter(|s| s.is_available())
        .collect();
    ranked.sort_by(|a, b| by_expected_desc(a, b));

    let starting: Vec<(usize, LineupSlot)> = slots
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, s)| s.is_starting())
        .collect();

    let mut flex: Vec<(usize, LineupSlot)> = starting
        .iter()
        .copied()
        .filter(|(_, s)| s.dedicated_position().is_none())
        .collect();
    flex.sort_by_key(|(_, s)| s.flex_rank());
    let fill_order = starting
        .iter()
        .copied()
        .filter(|(_, s)| s.dedicated_position().is_some())
        .chain(flex);

    let mut assigned: HashMap<usize, PlayerId> = HashMap::new();
    let mut used: HashSet<&PlayerId> = HashSet::new();
    for (index, slot) in fill_order {
        let best = ranked
            .iter()
            .find(|s| !used.contains(&s.player_id) && slot.eligible(s.position));
        if let Some(best) = best {
            used.insert(&best.player_id);
            assigned.insert(index, best.player_id.clone());
        }
    }

    starting
        .into_iter()
        .map(|(index, slot)| SlotAssignment {
            slot,
            player_id: assigned.remove(&index),
        })
        .collect()
}

/// Start/sit recommendation for `team`, scoring players on the fly.
pub fn recommend_lineup(snapshot: &LeagueSnapshot, team: &Team, week: Week) -> LineupRecommendation {
    recommend_lineup_with(snapshot, team, week, &HashMap::new())
}

/// Start/sit recommendation using precomputed `scores`; players missing
/// from `scores` are scored here.
pub fn recommend_lineup_with(
    snapshot: &LeagueSnapshot,
    team: &Team,
    week: Week,
    scores: &HashMap<PlayerId, PlayerScore>,
) -> LineupRecommendation {
    let scored: Vec<(&Player, PlayerScore)> = snapshot
        .roster(team)
        .filter(|p| !team.is_reserve(&p.id))
        .map(|p| {
            let score = scores
                .get(&p.id)
                .cloned()
                .unwrap_or_else(|| score_player(p, week));
            (p, score)
        })
        .collect();
    let by_id: HashMap<&PlayerId, &(&Player, PlayerScore)> =
        scored.iter().map(|entry| (&entry.0.id, entry)).collect();

    let candidates: Vec<&PlayerScore> = scored.iter().map(|(_, s)| s).collect();
    let slots = optimal_lineup(&snapshot.league.roster_slots, &candidates);

    let starter_slots: Vec<(LineupSlot, &PlayerScore)> = slots
        .iter()
        .filter_map(|a| {
            let id = a.player_id.as_ref()?;
            by_id.get(id).map(|(_, score)| (a.slot, score))
        })
        .collect();
    let slot_of: HashMap<&PlayerId, (usize, LineupSlot)> = starter_slots
        .iter()
        .enumerate()
        .map(|(i, (slot, score))| (&score.player_id, (i, *slot)))
        .collect();

    let mut entries: Vec<LineupEntry> = scored
        .iter()
        .map(|(player, score)| {
            let slot = slot_of.get(&player.id).map(|(_, s)| *s);
            let (label, reason) = label_player(player, score, slot.is_some(), &starter_slots, &by_id);
            LineupEntry {
                player_id: player.id.clone(),
                name: player.name.clone(),
                position: player.position,
                slot,
                label,
                expected_points: score.expected_points,
                rating: score.rating,
                confidence: score.confidence,
                reason,
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        let rank = |e: &LineupEntry| slot_of.get(&e.player_id).map(|(i, _)| *i);
        match (rank(a), rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b
                .expected_points
                .partial_cmp(&a.expected_points)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.player_id.cmp(&b.player_id)),
        }
    });

    let optimal_points: f64 = starter_slots.iter().map(|(_, s)| s.expected_points).sum();
    let current: Vec<&PlayerScore> = team
        .starters
        .iter()
        .filter_map(|id| by_id.get(id).map(|(_, s)| s))
        .collect();
    let current_points: f64 = current.iter().map(|s| s.expected_points).sum();

    let changes = if team.starters.is_empty() {
        Vec::new()
    } else {
        lineup_changes(&starter_slots, &current, &by_id)
    };

    LineupRecommendation {
        team_id: team.team_id.clone(),
        week,
        slots,
        entries,
        changes,
        optimal_points,
        current_points,
    }
}

fn label_player(
    player: &Player,
    score: &PlayerScore,
    starting: bool,
    starter_slots: &[(LineupSlot, &PlayerScore)],
    by_id: &HashMap<&PlayerId, &(&Player, PlayerScore)>,
) -> (StartSit, String) {
    if starting {
        let label = if score.rating >= MUST_START_RATING && score.confidence >= MUST_START_CONFIDENCE {
            StartSit::MustStart
        } else {
            StartSit::Start
        };
        let reason = format!(
            "{:.1} pts expected, {} form, {:.0}% confidence",
            score.expected_points,
            score.direction,
            score.confidence * 100.0
        );
        return (label, reason);
    }

    if score.status != PlayerStatus::Active {
        let reason = unavailable_reason(player, score).unwrap_or_default();
        return (StartSit::Sit, reason);
    }

    let weakest = starter_slots
        .iter()
        .filter(|(slot, _)| slot.eligible(score.position))
        .map(|(_, s)| *s)
        .min_by(|a, b| by_expected_desc(b, a));

    match weakest {
        Some(starter) if starter.expected_points - score.expected_points <= BORDERLINE_MARGIN => {
            let name = by_id
                .get(&starter.player_id)
                .map(|(p, _)| p.name.as_str())
                .unwrap_or(starter.player_id.as_str());
            (
                StartSit::Borderline,
                format!(
                    "Within {:.1} pts of {}",
                    (starter.expected_points - score.expected_points).max(0.0),
                    name
                ),
            )
        }
        Some(_) => (
            StartSit::Sit,
            format!("{:.1} pts expected, below every starter", score.expected_points),
        ),
        None => (StartSit::Sit, "No starting slot for this position".to_string()),
    }
}

/// Pair each optimal starter missing from the current lineup with the
/// current starter it displaces.
fn lineup_changes(
    starter_slots: &[(LineupSlot, &PlayerScore)],
    current: &[&PlayerScore],
    by_id: &HashMap<&PlayerId, &(&Player, PlayerScore)>,
) -> Vec<LineupChange> {
    let optimal: HashSet<&PlayerId> = starter_slots.iter().map(|(_, s)| &s.player_id).collect();
    let current_ids: HashSet<&PlayerId> = current.iter().map(|s| &s.player_id).collect();

    let mut displaced: Vec<&PlayerScore> = current
        .iter()
        .copied()
        .filter(|s| !optimal.contains(&s.player_id))
        .collect();
    displaced.sort_by(|a, b| by_expected_desc(b, a));

    let name_of = |id: &PlayerId| {
        by_id
            .get(id)
            .map(|(p, _)| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let mut changes = Vec::new();
    for (slot, start) in starter_slots {
        if current_ids.contains(&start.player_id) {
            continue;
        }
        let pick = displaced
            .iter()
            .position(|s| slot.eligible(s.position))
            .or(if displaced.is_empty() { None } else { Some(0) });
        let bench = pick.map(|i| displaced.remove(i));

        changes.push(LineupChange {
            start: start.player_id.clone(),
            start_name: name_of(&start.player_id),
            bench: bench.map(|b| b.player_id.clone()),
            bench_name: bench.map(|b| name_of(&b.player_id)),
            slot: *slot,
            gain: start.expected_points - bench.map(|b| b.expected_points).unwrap_or(0.0),
        });
    }
    changes
}
