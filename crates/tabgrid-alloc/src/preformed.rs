//! Preformed panel → debate allocation.
//!
//! Preformed panels are fixed before the draw exists. Once it does, each
//! debate receives at most one whole panel, and the panel's seats are
//! copied onto it unchanged. A debate left without a panel is cleared.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use tab_core::{
    AllocResult, AllocationError, Container, Debate, PanelAllocation, PreformedPanel, Warning,
};

use crate::solver::CostMatrix;
use crate::strategy::{AllocationContext, AllocationOutcome, Run};

/// Registered preformed-panel allocators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreformedAllocator {
    /// Pair by room rank: best-ranked panel to best-ranked debate.
    Direct,
    /// Pair in input order.
    Dumb,
    /// Minimize importance gaps and conflict/history penalties.
    Hungarian,
}

/// One debate and the panel it was given, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelAssignment<'a> {
    pub debate: &'a Debate,
    pub panel: Option<&'a PreformedPanel>,
}

impl PreformedAllocator {
    pub const ALL: [PreformedAllocator; 3] = [
        PreformedAllocator::Direct,
        PreformedAllocator::Dumb,
        PreformedAllocator::Hungarian,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PreformedAllocator::Direct => "direct",
            PreformedAllocator::Dumb => "dumb",
            PreformedAllocator::Hungarian => "hungarian",
        }
    }

    /// Decide which panel goes to which debate.
    ///
    /// Every debate appears exactly once in the result, in input order.
    pub fn assign<'d>(
        &self,
        debates: &'d [Debate],
        panels: &'d [PreformedPanel],
        ctx: &AllocationContext<'_>,
    ) -> AllocResult<(Vec<PanelAssignment<'d>>, Vec<Warning>)> {
        if panels.is_empty() {
            return Err(AllocationError::NoPanels);
        }
        if debates.is_empty() {
            return Err(AllocationError::NoDebates);
        }
        ctx.config.validate()?;
        check_population(debates, panels, ctx)?;

        info!(
            allocator = self.key(),
            debates = debates.len(),
            panels = panels.len(),
            "allocating preformed panels"
        );

        let mut run = Run::new(ctx);
        if debates.len() != panels.len() {
            run.warn(Warning::PanelCountMismatch {
                debates: debates.len(),
                panels: panels.len(),
            });
        }

        // Index of the panel given to each debate.
        let mut chosen: Vec<Option<usize>> = vec![None; debates.len()];
        match self {
            PreformedAllocator::Dumb => {
                for (debate, slot) in chosen.iter_mut().enumerate().take(panels.len()) {
                    *slot = Some(debate);
                }
            }
            PreformedAllocator::Direct => {
                let by_rank = |ranks: Vec<u32>| {
                    let mut order: Vec<usize> = (0..ranks.len()).collect();
                    order.sort_by_key(|&i| ranks[i]);
                    order
                };
                let debate_order = by_rank(debates.iter().map(|d| d.room_rank).collect());
                let panel_order = by_rank(panels.iter().map(|p| p.room_rank).collect());
                for (d, p) in debate_order.into_iter().zip(panel_order) {
                    chosen[d] = Some(p);
                }
            }
            PreformedAllocator::Hungarian => {
                let cost = run.cost;
                let containers: Vec<Container> = debates.iter().map(Container::from).collect();
                let matrix = CostMatrix::try_from_fn(debates.len(), panels.len(), |r, c| {
                    cost.preformed_cost(&containers[r], &panels[c]).map(|b| b.total())
                })?;
                for (d, p) in run.solve("preformed panels", &matrix) {
                    chosen[d] = Some(p);
                }
            }
        }

        let assignments = debates
            .iter()
            .zip(chosen)
            .map(|(debate, panel)| PanelAssignment {
                debate,
                panel: panel.map(|p| &panels[p]),
            })
            .collect();
        Ok((assignments, run.warnings))
    }

    /// Assign panels and copy them onto their debates.
    pub fn allocate(
        &self,
        debates: &[Debate],
        panels: &[PreformedPanel],
        ctx: &AllocationContext<'_>,
    ) -> AllocResult<AllocationOutcome> {
        let (assignments, warnings) = self.assign(debates, panels, ctx)?;
        let allocations = copy_panels_to_debates(&assignments)?;
        let containers: Vec<Container> = debates.iter().map(Container::from).collect();
        Ok(AllocationOutcome::complete(&containers, allocations, warnings))
    }
}

impl fmt::Display for PreformedAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PreformedAllocator {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreformedAllocator::ALL
            .into_iter()
            .find(|allocator| allocator.key() == s)
            .ok_or_else(|| AllocationError::InvalidConfig(format!("unknown preformed allocator '{s}'")))
    }
}

/// Every panel member and debate team must be known to the run's registries.
fn check_population(debates: &[Debate], panels: &[PreformedPanel], ctx: &AllocationContext<'_>) -> AllocResult<()> {
    if let Some(adj) = panels
        .iter()
        .flat_map(PreformedPanel::members)
        .find(|&adj| !ctx.conflicts.covers_adjudicator(adj))
    {
        return Err(AllocationError::unknown_adjudicator(adj));
    }
    if let Some(&team) = debates
        .iter()
        .flat_map(|d| d.teams.iter())
        .find(|&&team| !ctx.conflicts.covers_team(team))
    {
        return Err(AllocationError::unknown_team(team));
    }
    Ok(())
}

/// Turn panel assignments into debate allocations.
///
/// Each debate gets a copy of its panel's seats; a debate without a panel
/// gets an empty allocation, which clears it when saved.
pub fn copy_panels_to_debates(assignments: &[PanelAssignment<'_>]) -> AllocResult<Vec<PanelAllocation>> {
    assignments
        .iter()
        .map(|assignment| {
            let container = Container::from(assignment.debate).id;
            let allocation = match assignment.panel {
                Some(panel) => PanelAllocation::from_seats(container, &panel.adjudicators)?,
                None => PanelAllocation::new(container),
            };
            debug!(%allocation, panel = ?assignment.panel.map(|p| p.id), "copied preformed panel");
            Ok(allocation)
        })
        .collect()
}
