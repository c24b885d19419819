pub mod allocate;
pub mod config;
pub mod preformed;

use std::path::Path;

use anyhow::Context;
use tracing::info;

use tab_core::{AllocationConfig, Container, MemoryPanelStore, RoundSnapshot};
use tabgrid_alloc::{AllocationOutcome, CostBreakdown, CostModel};
use tabgrid_registry::{ConflictRegistry, HistoryRegistry};

/// A snapshot with its configuration and the registries built from it.
pub struct LoadedRound {
    pub snapshot: RoundSnapshot,
    pub config: AllocationConfig,
    pub conflicts: ConflictRegistry,
    pub history: HistoryRegistry,
}

impl LoadedRound {
    pub fn load(snapshot: &Path, config: Option<&Path>) -> anyhow::Result<Self> {
        let snapshot = RoundSnapshot::from_file(snapshot)
            .with_context(|| format!("Failed to read round snapshot {}", snapshot.display()))?;
        let config = match config {
            Some(path) => AllocationConfig::from_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => AllocationConfig::default(),
        };

        let conflicts = ConflictRegistry::build(&snapshot.adjudicators, &snapshot.teams, &config.conflicts);
        let history = HistoryRegistry::new(snapshot.round, &snapshot.history);
        info!(
            round = snapshot.round,
            adjudicators = snapshot.adjudicators.len(),
            debates = snapshot.debates.len(),
            panels = snapshot.panels.len(),
            "loaded round snapshot"
        );

        Ok(Self {
            snapshot,
            config,
            conflicts,
            history,
        })
    }

    pub fn cost_model(&self) -> CostModel<'_> {
        CostModel::new(&self.config, &self.conflicts, &self.history)
    }

    /// Conflict and history penalties summed over every allocation.
    pub fn penalties(&self, containers: &[Container], outcome: &AllocationOutcome) -> anyhow::Result<CostBreakdown> {
        let model = self.cost_model();
        let mut total = CostBreakdown::default();
        for allocation in &outcome.allocations {
            if let Some(container) = containers.iter().find(|c| c.id == allocation.container()) {
                total += model.penalties_of(container, allocation)?;
            }
        }
        Ok(total)
    }
}

/// Save `outcome` into the JSON store at `path`, unless this is a dry run.
pub fn persist(outcome: &AllocationOutcome, path: Option<&Path>, dry_run: bool) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let mut store = MemoryPanelStore::from_file(path)
        .with_context(|| format!("Failed to read allocation store {}", path.display()))?;
    let diffs = outcome.save(&mut store)?;

    if dry_run {
        info!(path = %path.display(), changed = diffs.len(), "dry run, store left untouched");
        return Ok(());
    }
    store.write_file(path)?;
    info!(path = %path.display(), changed = diffs.len(), rows = store.rows().len(), "saved allocations");
    Ok(())
}

/// Print `outcome` as JSON or as the human-readable report.
pub fn print_outcome(
    format: &str,
    title: &str,
    round: &LoadedRound,
    containers: &[Container],
    outcome: &AllocationOutcome,
) -> anyhow::Result<()> {
    let penalties = round.penalties(containers, outcome)?;
    match format {
        "json" => {
            let report = crate::report::JsonReport {
                title,
                round: round.snapshot.round,
                allocations: &outcome.allocations,
                warnings: &outcome.warnings,
                penalties,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            let ctx = crate::report::ReportContext {
                title,
                snapshot: &round.snapshot,
                config: &round.config,
                containers,
                conflicts: &round.conflicts,
                history: &round.history,
                penalties,
            };
            println!("{}", crate::report::format_outcome(&ctx, outcome));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::{Path, PathBuf};

    /// A small two-debate round with one preformed panel per debate.
    pub const SNAPSHOT: &str = r#"{
        "round": 3,
        "adjudicators": [
            {"id": 1, "name": "Ada", "base_score": 4.5, "conflicts": {"teams": [10]}},
            {"id": 2, "name": "Ben", "base_score": 3.5},
            {"id": 3, "name": "Cai", "base_score": 1.0}
        ],
        "teams": [
            {"id": 10, "name": "Alpha"}, {"id": 11, "name": "Beta"},
            {"id": 20, "name": "Gamma"}, {"id": 21, "name": "Delta"}
        ],
        "debates": [
            {"id": 1, "teams": [10, 11], "importance": 1, "room_rank": 1},
            {"id": 2, "teams": [20, 21], "importance": 0, "room_rank": 2}
        ],
        "panels": [
            {"id": 7, "importance": 0, "room_rank": 1,
             "adjudicators": [{"adjudicator": 2, "seat": "chair"}]},
            {"id": 8, "importance": 0, "room_rank": 2,
             "adjudicators": [{"adjudicator": 1, "seat": "chair"}, {"adjudicator": 3, "seat": "trainee"}]}
        ],
        "history": [
            {"round": 1, "teams": [20], "adjudicators": [2]}
        ]
    }"#;

    pub fn write_snapshot(dir: &Path) -> PathBuf {
        let path = dir.join("round.json");
        std::fs::write(&path, SNAPSHOT).unwrap();
        path
    }
}
