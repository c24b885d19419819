//! Human-readable and JSON allocation reports.

use serde::Serialize;

use tab_core::{AdjudicatorId, AllocationConfig, Container, PanelAllocation, RoundSnapshot, TeamId, Warning};
use tabgrid_alloc::scores::normalize;
use tabgrid_alloc::{AllocationOutcome, CostBreakdown};
use tabgrid_registry::{ConflictRegistry, HistoryRegistry};

/// Machine-readable report printed with `--format json`.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub title: &'a str,
    pub round: u32,
    pub allocations: &'a [PanelAllocation],
    pub warnings: &'a [Warning],
    pub penalties: CostBreakdown,
}

/// What the text report needs beyond the outcome itself.
pub struct ReportContext<'a> {
    pub title: &'a str,
    pub snapshot: &'a RoundSnapshot,
    pub config: &'a AllocationConfig,
    pub containers: &'a [Container],
    pub conflicts: &'a ConflictRegistry,
    pub history: &'a HistoryRegistry,
    pub penalties: CostBreakdown,
}

pub fn format_outcome(ctx: &ReportContext<'_>, outcome: &AllocationOutcome) -> String {
    let mut out = String::new();

    let seated: usize = outcome.allocations.iter().map(PanelAllocation::len).sum();

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str(&format!("║  {:<40}║\n", ctx.title));
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Round:        {:<27}║\n", ctx.snapshot.round));
    out.push_str(&format!("║  Rooms:        {:<27}║\n", outcome.allocations.len()));
    out.push_str(&format!(
        "║  Seated:       {:<27}║\n",
        format!("{seated} of {}", ctx.snapshot.adjudicators.len())
    ));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    for allocation in &outcome.allocations {
        out.push_str(&format_room(ctx, allocation));
    }

    out.push_str("Penalties:\n");
    out.push_str(&format!("  conflicts: {:.0}\n", ctx.penalties.conflict));
    out.push_str(&format!("  history:   {:.0}\n\n", ctx.penalties.history));

    if outcome.warnings.is_empty() {
        out.push_str("✅ No warnings\n");
    } else {
        out.push_str(&format!("⚠️  WARNINGS ({}):\n\n", outcome.warnings.len()));
        for warning in &outcome.warnings {
            out.push_str(&format!("  • {warning}\n"));
        }
    }

    out
}

fn format_room(ctx: &ReportContext<'_>, allocation: &PanelAllocation) -> String {
    let mut out = String::new();
    let container = ctx.containers.iter().find(|c| c.id == allocation.container());

    let mut heading = allocation.container().to_string();
    if let Some(container) = container {
        heading.push_str(&format!(" [{}]", container.importance));
        if !container.teams.is_empty() {
            let teams: Vec<String> = container
                .teams
                .iter()
                .map(|&id| match ctx.snapshot.team(id) {
                    Some(team) => team.name.clone(),
                    None => format!("team {id}"),
                })
                .collect();
            heading.push_str(&format!(": {}", teams.join(" vs ")));
        }
    }
    out.push_str(&format!("{heading}\n"));

    if allocation.is_empty() {
        out.push_str("  ❌ no adjudicators\n\n");
        return out;
    }

    for (id, position) in allocation.with_positions() {
        match ctx.snapshot.adjudicator(id) {
            Some(adj) => {
                let score = normalize(adj.weighted_score(ctx.config.scores.feedback_weight), &ctx.config.scores);
                out.push_str(&format!("  ({}) {:<24} {:>5.2}  {position}\n", position.symbol(), adj.name, score));
            }
            None => out.push_str(&format!("  ({}) adjudicator {id}  {position}\n", position.symbol())),
        }
        for note in seat_notes(ctx, container, allocation, id) {
            out.push_str(&format!("      ⚠️  {note}\n"));
        }
    }
    out.push('\n');
    out
}

/// Conflicts and repeat encounters of one seated adjudicator within their room.
fn seat_notes(
    ctx: &ReportContext<'_>,
    container: Option<&Container>,
    allocation: &PanelAllocation,
    adj: AdjudicatorId,
) -> Vec<String> {
    let mut notes = Vec::new();
    let teams = container.map(|c| c.teams.as_slice()).unwrap_or_default();
    let team_name = |id: TeamId| ctx.snapshot.team(id).map_or_else(|| format!("team {id}"), |t| t.name.clone());
    let adj_name = |id: AdjudicatorId| {
        ctx.snapshot
            .adjudicator(id)
            .map_or_else(|| format!("adjudicator {id}"), |a| a.name.clone())
    };

    if let Ok(summary) = ctx.conflicts.conflicts_of_adjudicator(adj) {
        for &team in teams.iter().filter(|t| summary.teams.contains(*t)) {
            notes.push(format!("conflicts with {}", team_name(team)));
        }
        for other in allocation.members().filter(|o| summary.adjudicators.contains(o)) {
            notes.push(format!("conflicts with {}", adj_name(other)));
        }
    }

    for &team in teams {
        if let Some(ago) = ctx.history.team_last_seen_ago(adj, team) {
            notes.push(format!("saw {} {ago} round(s) ago", team_name(team)));
        }
    }
    for other in allocation.members().filter(|&o| o != adj) {
        if let Some(ago) = ctx.history.adjudicator_last_seen_ago(adj, other) {
            notes.push(format!("sat with {} {ago} round(s) ago", adj_name(other)));
        }
    }
    notes
}
