//! Runs against the sample round in `tests/fixtures/round.json`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tab_core::{AllocationConfig, BallotMode, MemoryPanelStore, RoundSnapshot};
use tabgrid_alloc::{AllocationContext, AllocationOutcome, PreformedAllocator, Strategy};
use tabgrid_registry::{ConflictRegistry, HistoryRegistry};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

struct Fixture {
    snapshot: RoundSnapshot,
    config: AllocationConfig,
    conflicts: ConflictRegistry,
    history: HistoryRegistry,
}

impl Fixture {
    fn load() -> Self {
        let snapshot = RoundSnapshot::from_file(&workspace_root().join("tests/fixtures/round.json")).unwrap();
        let config = AllocationConfig::default();
        let conflicts = ConflictRegistry::build(&snapshot.adjudicators, &snapshot.teams, &config.conflicts);
        let history = HistoryRegistry::new(snapshot.round, &snapshot.history);
        Self {
            snapshot,
            config,
            conflicts,
            history,
        }
    }

    fn ctx(&self) -> AllocationContext<'_> {
        AllocationContext::new(&self.config, &self.conflicts, &self.history).with_seed(Some(11))
    }

    fn allocate(&self, strategy: Strategy) -> AllocationOutcome {
        strategy
            .allocate(&self.snapshot.debate_containers(), &self.snapshot.adjudicators, &self.ctx())
            .unwrap()
    }

    fn trainees(&self) -> HashSet<u32> {
        self.snapshot.adjudicators.iter().filter(|a| a.trainee).map(|a| a.id).collect()
    }
}

fn assert_seated_once(outcome: &AllocationOutcome) {
    let mut seen = HashSet::new();
    for allocation in &outcome.allocations {
        for adj in allocation.members() {
            assert!(seen.insert(adj), "adjudicator {adj} seated twice");
        }
    }
}

#[test]
fn every_strategy_covers_the_draw() {
    let fixture = Fixture::load();
    for strategy in Strategy::ALL {
        let outcome = fixture.allocate(strategy);
        assert_eq!(outcome.allocations.len(), fixture.snapshot.debates.len(), "{strategy}");
        assert_seated_once(&outcome);
        for allocation in &outcome.allocations {
            assert!(allocation.valid(strategy.ballot_mode()), "{strategy}: {allocation}");
        }
    }
}

#[test]
fn voting_panels_seat_trainees_only_as_trainees() {
    let fixture = Fixture::load();
    let trainees = fixture.trainees();
    let outcome = fixture.allocate(Strategy::Hungarian(BallotMode::PerAdjudicator));

    for allocation in &outcome.allocations {
        assert!(allocation.voting().all(|adj| !trainees.contains(&adj)), "{allocation}");
    }

    // Twelve voters over six debates: three solos and three panels of three.
    let solos = outcome.allocations.iter().filter(|a| !a.is_panel()).count();
    assert_eq!(solos, 3);
    assert!(outcome.allocations.iter().filter(|a| a.is_panel()).all(|a| a.num_voting() == 3));

    // Ada is conflicted with Aurora, who debates in room 1.
    assert!(!outcome.allocations[0].contains(1));
}

#[test]
fn consensus_panels_share_voters_evenly() {
    let fixture = Fixture::load();
    let outcome = fixture.allocate(Strategy::Hungarian(BallotMode::PerPanel));

    assert!(outcome.allocations.iter().all(|a| a.num_voting() == 2));
    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["allocations"].as_array().unwrap().len(), fixture.snapshot.debates.len());
}

#[test]
fn rerunning_with_the_same_seed_changes_nothing() {
    let fixture = Fixture::load();
    let strategy = Strategy::Hungarian(BallotMode::PerAdjudicator);
    let mut store = MemoryPanelStore::new();

    let first = fixture.allocate(strategy).save(&mut store).unwrap();
    assert_eq!(first.len(), fixture.snapshot.debates.len());

    let second = fixture.allocate(strategy).save(&mut store).unwrap();
    assert!(second.is_empty());
}

#[test]
fn preformed_panels_land_on_matching_importance() {
    let fixture = Fixture::load();
    let outcome = PreformedAllocator::Hungarian
        .allocate(&fixture.snapshot.debates, &fixture.snapshot.panels, &fixture.ctx())
        .unwrap();

    assert_seated_once(&outcome);
    for (allocation, panel) in outcome.allocations.iter().zip(&fixture.snapshot.panels) {
        assert_eq!(allocation.chair(), panel.chair());
        assert_eq!(allocation.len(), panel.adjudicators.len());
    }
}
