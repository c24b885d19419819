//! Cost-minimizing allocation for voting and consensus panels.
//!
//! Both modes rank the voting pool the same way (shuffle, then a stable
//! sort by normalized score so ties break randomly rather than by input
//! order), consider debates most important first, and finish with the same
//! trainee pass. They differ in how voters are spread across debates:
//!
//! - **Voting**: a prefix of debates is solo-chaired, the rest get panels
//!   of three; solos and panels are solved as separate matrices and
//!   trainees only go to solo debates.
//! - **Consensus**: every debate gets `n_voting / n_debates` voters, the
//!   surplus going to the top debates; one matrix covers every seat and
//!   trainees go to all debates.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use tracing::{debug, info};

use tab_core::{Adjudicator, AdjudicatorId, AllocResult, AllocationError, Container, PanelAllocation, Warning};

use super::Run;
use crate::scores::{ScoredAdjudicator, score_adjudicators};
use crate::seats::{
    PANEL_SIZE, TRAINEE_ADJUSTMENT, consensus_seat_adjustment, consensus_seats, panel_seat_adjustment,
    solo_debates,
};
use crate::solver::CostMatrix;

/// The scored pool split by voting eligibility, each side best first.
struct Pool {
    voting: Vec<ScoredAdjudicator>,
    others: Vec<ScoredAdjudicator>,
}

fn split_pool(run: &mut Run<'_>, adjudicators: &[Adjudicator]) -> Pool {
    let scored = score_adjudicators(adjudicators, &run.config.scores, &mut run.warnings);
    let min_voting = run.config.scores.min_voting;

    let (mut voting, mut others): (Vec<_>, Vec<_>) = scored.into_iter().partition(|s| s.can_vote(min_voting));
    voting.shuffle(&mut run.rng);
    voting.sort_by(ScoredAdjudicator::by_score_desc);
    others.sort_by(ScoredAdjudicator::by_score_desc);

    Pool { voting, others }
}

/// Most important first, then by room rank.
fn by_importance(containers: &[Container]) -> Vec<&Container> {
    let mut sorted: Vec<&Container> = containers.iter().collect();
    sorted.sort_by_key(|c| (Reverse(c.importance), c.room_rank));
    sorted
}

fn check_voting_pool(n_voting: usize, min_voting_score: f64) -> AllocResult<()> {
    if n_voting == 0 {
        info!("no adjudicators able to panel or chair");
        return Err(AllocationError::NoVotingAdjudicators { min_voting_score });
    }
    Ok(())
}

/// Seat a group on `debate`, best-scored adjudicator in the chair.
fn ranked_allocation(debate: &Container, mut group: Vec<ScoredAdjudicator>) -> AllocResult<PanelAllocation> {
    group.sort_by(ScoredAdjudicator::by_score_desc);
    let ids: Vec<AdjudicatorId> = group.iter().map(|a| a.id).collect();
    let allocation = PanelAllocation::from_ranked_panel(debate.id, &ids)?;
    debug!(%allocation, "allocated");
    Ok(allocation)
}

pub(super) fn allocate_voting(
    run: &mut Run<'_>,
    containers: &[Container],
    adjudicators: &[Adjudicator],
) -> AllocResult<Vec<PanelAllocation>> {
    let config = run.config;
    let Pool { voting, others } = split_pool(run, adjudicators);
    let n_debates = containers.len();
    let n_voting = voting.len();
    check_voting_pool(n_voting, config.scores.min_voting)?;

    let (solos, panellists) = if config.positions.no_panellist {
        (&voting[..n_debates.min(n_voting)], &[][..])
    } else {
        voting.split_at(solo_debates(n_debates, n_voting).min(n_voting))
    };
    let trainees = if config.positions.no_trainee { Vec::new() } else { others };

    let sorted = by_importance(containers);
    let (solo_debates, panel_debates) = sorted.split_at(solos.len().min(n_debates));

    info!(
        debates = n_debates,
        solo_debates = solo_debates.len(),
        panel_debates = panel_debates.len(),
        solos = solos.len(),
        panellists = panellists.len(),
        trainees = trainees.len(),
        "partitioned voting pool"
    );
    if n_voting < n_debates {
        run.warn(Warning::InsufficientVoting {
            debates: n_debates,
            voting: n_voting,
        });
    }
    let needed = panel_debates.len() * PANEL_SIZE;
    if panellists.len() < needed {
        run.warn(Warning::InsufficientPanellists {
            panel_debates: panel_debates.len(),
            panellists: panellists.len(),
            needed,
        });
    }

    let cost = run.cost;
    let mut allocations = Vec::with_capacity(n_debates);

    let matrix = CostMatrix::try_from_fn(solo_debates.len(), solos.len(), |r, c| {
        cost.cost(solo_debates[r], &solos[c], 0.0, None)
    })?;
    for (r, c) in run.solve("solos", &matrix) {
        allocations.push(ranked_allocation(solo_debates[r], vec![solos[c]])?);
    }

    if !panellists.is_empty() && !panel_debates.is_empty() {
        let n_panels = panel_debates.len();
        let matrix = CostMatrix::try_from_fn(n_panels * PANEL_SIZE, panellists.len(), |r, c| {
            let (debate, seat) = (r / PANEL_SIZE, r % PANEL_SIZE);
            let adjustment = panel_seat_adjustment(debate, n_panels, seat);
            cost.cost(panel_debates[debate], &panellists[c], adjustment, None)
        })?;

        let mut groups = vec![Vec::new(); n_panels];
        for (r, c) in run.solve("panellists", &matrix) {
            groups[r / PANEL_SIZE].push(panellists[c]);
        }
        for (debate, group) in panel_debates.iter().zip(groups) {
            if !group.is_empty() {
                allocations.push(ranked_allocation(debate, group)?);
            }
        }
    }

    allocate_trainees(run, &trainees, solo_debates, &mut allocations)?;
    Ok(allocations)
}

pub(super) fn allocate_consensus(
    run: &mut Run<'_>,
    containers: &[Container],
    adjudicators: &[Adjudicator],
) -> AllocResult<Vec<PanelAllocation>> {
    let config = run.config;
    let Pool { mut voting, mut others } = split_pool(run, adjudicators);
    let n_debates = containers.len();

    if config.positions.no_panellist && voting.len() > n_debates {
        others.extend(voting.drain(n_debates..));
        others.sort_by(ScoredAdjudicator::by_score_desc);
    }
    let n_voting = voting.len();
    let trainees = if config.positions.no_trainee { Vec::new() } else { others };
    check_voting_pool(n_voting, config.scores.min_voting)?;

    let sorted = by_importance(containers);
    let seats = consensus_seats(n_debates, n_voting);

    info!(
        debates = n_debates,
        voting = n_voting,
        trainees = trainees.len(),
        "partitioned consensus pool"
    );
    if n_voting < n_debates {
        run.warn(Warning::InsufficientVoting {
            debates: n_debates,
            voting: n_voting,
        });
    }

    // One row per (debate, seat), debates in importance order.
    let rows: Vec<(usize, usize)> = seats
        .iter()
        .enumerate()
        .flat_map(|(debate, &n)| (0..n).map(move |seat| (debate, seat)))
        .collect();

    let cost = run.cost;
    let matrix = CostMatrix::try_from_fn(rows.len(), voting.len(), |r, c| {
        let (debate, seat) = rows[r];
        cost.cost(sorted[debate], &voting[c], consensus_seat_adjustment(seat), None)
    })?;

    let mut groups = vec![Vec::new(); n_debates];
    for (r, c) in run.solve("voting", &matrix) {
        groups[rows[r].0].push(voting[c]);
    }
    let mut allocations = sorted
        .iter()
        .zip(groups)
        .map(|(debate, group)| ranked_allocation(debate, group))
        .collect::<AllocResult<Vec<_>>>()?;

    allocate_trainees(run, &trainees, &sorted, &mut allocations)?;
    Ok(allocations)
}

/// Give each of `debates` at most one trainee, costed against its chair.
fn allocate_trainees(
    run: &mut Run<'_>,
    trainees: &[ScoredAdjudicator],
    debates: &[&Container],
    allocations: &mut Vec<PanelAllocation>,
) -> AllocResult<()> {
    if trainees.is_empty() || debates.is_empty() {
        return Ok(());
    }

    for debate in debates {
        if !allocations.iter().any(|a| a.container() == debate.id) {
            allocations.push(PanelAllocation::new(debate.id));
        }
    }
    let chairs: Vec<Option<AdjudicatorId>> = debates
        .iter()
        .map(|d| {
            allocations
                .iter()
                .find(|a| a.container() == d.id)
                .and_then(PanelAllocation::chair)
        })
        .collect();

    let cost = run.cost;
    let matrix = CostMatrix::try_from_fn(debates.len(), trainees.len(), |r, c| {
        cost.cost(debates[r], &trainees[c], TRAINEE_ADJUSTMENT, chairs[r])
    })?;

    for (r, c) in run.solve("trainees", &matrix) {
        if let Some(allocation) = allocations.iter_mut().find(|a| a.container() == debates[r].id) {
            allocation.add_trainee(trainees[c].id)?;
            debug!(container = %allocation.container(), trainee = trainees[c].id, "allocated trainee");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::AllocationContext;
    use tab_core::config::AllocationConfig;
    use tab_core::{ContainerId, DeclaredConflicts, Importance};
    use tabgrid_registry::{ConflictRegistry, HistoryRegistry};

    fn adjudicator(id: u32, score: f64, trainee: bool) -> Adjudicator {
        Adjudicator {
            id,
            name: format!("adj-{id}"),
            base_score: score,
            feedback_score: None,
            trainee,
            institution: None,
            conflicts: DeclaredConflicts::default(),
        }
    }

    fn container(id: u32, importance: i32, room_rank: u32) -> Container {
        Container {
            id: ContainerId::Debate(id),
            teams: vec![],
            importance: Importance::new(importance).unwrap(),
            room_rank,
        }
    }

    #[test]
    fn debates_sorted_by_importance_then_room_rank() {
        let containers = vec![container(1, 0, 2), container(2, 2, 5), container(3, 0, 1), container(4, -1, 0)];
        let ids: Vec<_> = by_importance(&containers).iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![
                ContainerId::Debate(2),
                ContainerId::Debate(3),
                ContainerId::Debate(1),
                ContainerId::Debate(4)
            ]
        );
    }

    #[test]
    fn pool_split_respects_threshold_and_trainee_flag() {
        let config = AllocationConfig::default();
        let conflicts = ConflictRegistry::default();
        let history = HistoryRegistry::default();
        let ctx = AllocationContext::new(&config, &conflicts, &history).with_seed(Some(7));
        let mut run = Run::new(&ctx);

        let adjs = vec![
            adjudicator(1, 2.0, false),
            adjudicator(2, 4.0, false),
            adjudicator(3, 1.0, false),
            adjudicator(4, 5.0, true),
            adjudicator(5, 1.5, false),
        ];
        let pool = split_pool(&mut run, &adjs);
        let voting: Vec<_> = pool.voting.iter().map(|a| a.id).collect();
        let others: Vec<_> = pool.others.iter().map(|a| a.id).collect();
        assert_eq!(voting, vec![2, 1, 5]);
        assert_eq!(others, vec![4, 3]);
    }

    #[test]
    fn equal_scores_are_shuffled_by_seed() {
        let config = AllocationConfig::default();
        let conflicts = ConflictRegistry::default();
        let history = HistoryRegistry::default();
        let adjs: Vec<_> = (1..=12).map(|id| adjudicator(id, 3.0, false)).collect();

        let order = |seed| {
            let ctx = AllocationContext::new(&config, &conflicts, &history).with_seed(Some(seed));
            let mut run = Run::new(&ctx);
            split_pool(&mut run, &adjs).voting.iter().map(|a| a.id).collect::<Vec<_>>()
        };
        assert_eq!(order(1), order(1));
        assert_ne!(order(1), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn no_voting_pool_is_an_error() {
        assert_eq!(
            check_voting_pool(0, 1.5),
            Err(AllocationError::NoVotingAdjudicators { min_voting_score: 1.5 })
        );
        assert!(check_voting_pool(1, 1.5).is_ok());
    }

    #[test]
    fn ranked_allocation_chairs_best_score() {
        let scored = |id, normalized| ScoredAdjudicator {
            id,
            weighted: normalized,
            normalized,
            trainee: false,
        };
        let allocation =
            ranked_allocation(&container(1, 0, 1), vec![scored(1, 2.0), scored(2, 4.0), scored(3, 3.0)]).unwrap();
        assert_eq!(allocation.chair(), Some(2));
        assert_eq!(allocation.panellists(), &[3, 1]);
    }
}
