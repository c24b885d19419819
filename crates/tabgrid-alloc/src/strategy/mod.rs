//! Allocation strategies.
//!
//! Every strategy takes the round's containers and available adjudicators
//! and returns exactly one [`PanelAllocation`] per container, in input
//! order, plus any [`Warning`]s. Containers a strategy could not fill come
//! back empty and are counted in a [`Warning::EmptyContainers`].

mod hungarian;
mod trivial;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use tab_core::config::AllocationConfig;
use tab_core::{
    Adjudicator, AllocResult, AllocationError, BallotMode, Container, ContainerId, PanelAllocation, PanelDiff,
    PanelStore, Warning,
};
use tabgrid_registry::{ConflictRegistry, HistoryRegistry};

use crate::cost::CostModel;
use crate::solver::{CostMatrix, KuhnMunkres, MatchingSolver};

static DEFAULT_SOLVER: KuhnMunkres = KuhnMunkres::DEFAULT;

/// Everything a run needs besides the containers and adjudicators.
#[derive(Clone, Copy)]
pub struct AllocationContext<'a> {
    pub config: &'a AllocationConfig,
    pub conflicts: &'a ConflictRegistry,
    pub history: &'a HistoryRegistry,
    /// Seed for tie-breaking among equally scored adjudicators.
    /// `None` draws from entropy.
    pub seed: Option<u64>,
    pub solver: &'a dyn MatchingSolver,
}

impl<'a> AllocationContext<'a> {
    pub fn new(config: &'a AllocationConfig, conflicts: &'a ConflictRegistry, history: &'a HistoryRegistry) -> Self {
        Self {
            config,
            conflicts,
            history,
            seed: None,
            solver: &DEFAULT_SOLVER,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_solver(mut self, solver: &'a dyn MatchingSolver) -> Self {
        self.solver = solver;
        self
    }

    pub fn cost_model(&self) -> CostModel<'a> {
        CostModel::new(self.config, self.conflicts, self.history)
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl fmt::Debug for AllocationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocationContext")
            .field("config", self.config)
            .field("round", &self.history.round())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Allocations for every container of a run, plus operator warnings.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationOutcome {
    pub allocations: Vec<PanelAllocation>,
    pub warnings: Vec<Warning>,
}

impl AllocationOutcome {
    /// Pair produced allocations with `containers`, in container order.
    ///
    /// Containers without an allocation get an empty one.
    pub(crate) fn complete(containers: &[Container], produced: Vec<PanelAllocation>, mut warnings: Vec<Warning>) -> Self {
        let mut by_container: HashMap<ContainerId, PanelAllocation> =
            produced.into_iter().map(|a| (a.container(), a)).collect();
        let allocations: Vec<PanelAllocation> = containers
            .iter()
            .map(|c| by_container.remove(&c.id).unwrap_or_else(|| PanelAllocation::new(c.id)))
            .collect();

        let empty = allocations.iter().filter(|a| a.is_empty()).count();
        if empty > 0 {
            let warning = Warning::EmptyContainers { count: empty };
            warn!(count = empty, "{warning}");
            warnings.push(warning);
        }
        Self { allocations, warnings }
    }

    pub fn allocation(&self, container: ContainerId) -> Option<&PanelAllocation> {
        self.allocations.iter().find(|a| a.container() == container)
    }

    /// Persist every allocation, returning the non-empty diffs.
    pub fn save<S: PanelStore + ?Sized>(&self, store: &mut S) -> AllocResult<Vec<PanelDiff>> {
        let mut diffs = Vec::new();
        for allocation in &self.allocations {
            let diff = allocation.save(store)?;
            if !diff.is_empty() {
                diffs.push(diff);
            }
        }
        info!(containers = self.allocations.len(), changed = diffs.len(), "saved allocations");
        Ok(diffs)
    }
}

/// Registered adjudicator allocation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Pool order, no costing.
    Trivial,
    /// Cost-minimizing allocation for the given ballot mode.
    Hungarian(BallotMode),
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Trivial,
        Strategy::Hungarian(BallotMode::PerAdjudicator),
        Strategy::Hungarian(BallotMode::PerPanel),
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Trivial => "trivial",
            Strategy::Hungarian(BallotMode::PerAdjudicator) => "hungarian-voting",
            Strategy::Hungarian(BallotMode::PerPanel) => "hungarian-consensus",
        }
    }

    /// Ballot mode the produced panels are meant for.
    pub fn ballot_mode(&self) -> BallotMode {
        match self {
            Strategy::Trivial => BallotMode::PerAdjudicator,
            Strategy::Hungarian(mode) => *mode,
        }
    }

    /// Allocate `adjudicators` to `containers`.
    pub fn allocate(
        &self,
        containers: &[Container],
        adjudicators: &[Adjudicator],
        ctx: &AllocationContext<'_>,
    ) -> AllocResult<AllocationOutcome> {
        if adjudicators.is_empty() {
            return Err(AllocationError::NoAdjudicators);
        }
        if containers.is_empty() {
            return Err(AllocationError::NoDebates);
        }
        ctx.config.validate()?;

        info!(
            strategy = self.key(),
            containers = containers.len(),
            adjudicators = adjudicators.len(),
            "allocating adjudicators"
        );

        let mut run = Run::new(ctx);
        let produced = match self {
            Strategy::Trivial => trivial::allocate(containers, adjudicators, ctx.config)?,
            Strategy::Hungarian(BallotMode::PerAdjudicator) => {
                hungarian::allocate_voting(&mut run, containers, adjudicators)?
            }
            Strategy::Hungarian(BallotMode::PerPanel) => {
                hungarian::allocate_consensus(&mut run, containers, adjudicators)?
            }
        };

        Ok(AllocationOutcome::complete(containers, produced, run.warnings))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Strategy {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.key() == s)
            .ok_or_else(|| AllocationError::InvalidConfig(format!("unknown allocation strategy '{s}'")))
    }
}

/// Mutable state of one strategy run.
pub(crate) struct Run<'a> {
    pub config: &'a AllocationConfig,
    pub cost: CostModel<'a>,
    pub rng: StdRng,
    pub warnings: Vec<Warning>,
    solver: &'a dyn MatchingSolver,
}

impl<'a> Run<'a> {
    pub fn new(ctx: &AllocationContext<'a>) -> Self {
        Self {
            config: ctx.config,
            cost: ctx.cost_model(),
            rng: ctx.rng(),
            solver: ctx.solver,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Solve `matrix`, logging its size and total cost.
    pub fn solve(&mut self, stage: &'static str, matrix: &CostMatrix) -> Vec<(usize, usize)> {
        if matrix.is_empty() {
            debug!(stage, "nothing to optimize");
            return Vec::new();
        }
        info!(
            stage,
            positions = matrix.rows(),
            candidates = matrix.columns(),
            "optimizing"
        );
        let assignment = self.solver.solve(matrix);
        info!(
            stage,
            matched = assignment.pairs.len(),
            total_cost = matrix.total(&assignment.pairs),
            "optimized"
        );
        if assignment.clamped > 0 {
            self.warn(Warning::CostOutOfRange {
                count: assignment.clamped,
                ceiling: assignment.ceiling,
            });
        }
        assignment.pairs
    }
}
