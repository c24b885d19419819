//! Pool-order allocation with no costing.
//!
//! One chair per container in pool order, then pairs of panellists dealt
//! round-robin while at least two adjudicators remain. Only useful as a
//! smoke test of the surrounding plumbing.

use tracing::debug;

use tab_core::config::AllocationConfig;
use tab_core::{Adjudicator, AllocResult, Container, PanelAllocation};

pub(crate) fn allocate(
    containers: &[Container],
    adjudicators: &[Adjudicator],
    config: &AllocationConfig,
) -> AllocResult<Vec<PanelAllocation>> {
    let mut pool = adjudicators.iter().map(|a| a.id);
    let mut allocations: Vec<PanelAllocation> = containers.iter().map(|c| PanelAllocation::new(c.id)).collect();

    for allocation in &mut allocations {
        let Some(chair) = pool.next() else { break };
        allocation.set_chair(chair)?;
    }

    if !config.positions.no_panellist && !allocations.is_empty() {
        let remaining: Vec<_> = pool.collect();
        let n = allocations.len();
        for (i, pair) in remaining.chunks_exact(2).enumerate() {
            for &adj in pair {
                allocations[i % n].add_panellist(adj)?;
            }
        }
    }

    for allocation in &allocations {
        debug!(%allocation, "allocated");
    }
    Ok(allocations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tab_core::{ContainerId, DeclaredConflicts, Importance};

    fn adjudicators(n: u32) -> Vec<Adjudicator> {
        (1..=n)
            .map(|id| Adjudicator {
                id,
                name: format!("adj-{id}"),
                base_score: 3.0,
                feedback_score: None,
                trainee: false,
                institution: None,
                conflicts: DeclaredConflicts::default(),
            })
            .collect()
    }

    fn containers(n: u32) -> Vec<Container> {
        (1..=n)
            .map(|id| Container {
                id: ContainerId::Debate(id),
                teams: vec![],
                importance: Importance::default(),
                room_rank: id,
            })
            .collect()
    }

    #[test]
    fn chairs_then_pairs_round_robin() {
        let result = allocate(&containers(2), &adjudicators(7), &AllocationConfig::default()).unwrap();

        assert_eq!(result[0].chair(), Some(1));
        assert_eq!(result[1].chair(), Some(2));
        assert_eq!(result[0].panellists(), &[3, 4]);
        assert_eq!(result[1].panellists(), &[5, 6]);
        // 7 is left over: a single adjudicator cannot form a pair.
        assert!(result.iter().all(|a| !a.contains(7)));
    }

    #[test]
    fn second_lap_when_pool_is_large() {
        let result = allocate(&containers(2), &adjudicators(10), &AllocationConfig::default()).unwrap();
        assert_eq!(result[0].panellists(), &[3, 4, 7, 8]);
        assert_eq!(result[1].panellists(), &[5, 6, 9, 10]);
    }

    #[test]
    fn no_panellist_leaves_solo_chairs() {
        let mut config = AllocationConfig::default();
        config.positions.no_panellist = true;
        let result = allocate(&containers(2), &adjudicators(6), &config).unwrap();
        assert!(result.iter().all(|a| a.num_voting() == 1));
    }

    #[test]
    fn short_pool_leaves_containers_empty() {
        let result = allocate(&containers(3), &adjudicators(2), &AllocationConfig::default()).unwrap();
        assert!(result[2].is_empty());
    }
}
