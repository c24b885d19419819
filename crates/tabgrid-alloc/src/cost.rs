//! Assignment costs shared by every strategy.
//!
//! Cost of seating an adjudicator in a container, lower is better:
//! - **Conflict**: a fixed penalty per conflicted team (and per conflicted chair)
//! - **History**: a penalty per prior encounter with a team (or with the chair)
//! - **Mismatch**: grows exponentially once the container's importance
//!   outruns the adjudicator's normalized score
//! - **Preference**: a small linear nudge towards higher-scored adjudicators

use tab_core::config::{AllocationConfig, PenaltiesConfig};
use tab_core::{AdjudicatorId, AllocResult, Container, PanelAllocation, PreformedPanel, TeamId};
use tabgrid_registry::{ConflictRegistry, HistoryRegistry};

use crate::scores::{NORMALIZED_MAX, ScoredAdjudicator};

/// Shifts signed importance (−2..=2) onto the 1..=5 band of normalized scores.
pub const IMPORTANCE_OFFSET: f64 = 3.0;

/// Gap tolerated before the mismatch penalty starts.
pub const MISMATCH_SLACK: f64 = 0.25;

pub const MISMATCH_SCALE: f64 = 1000.0;

/// Individual cost components for debugging and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct CostBreakdown {
    pub conflict: f64,
    pub history: f64,
    /// Quality/importance mismatch, or the importance gap for preformed panels.
    pub mismatch: f64,
    pub preference: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.conflict + self.history + self.mismatch + self.preference
    }
}

impl std::ops::AddAssign for CostBreakdown {
    fn add_assign(&mut self, other: Self) {
        self.conflict += other.conflict;
        self.history += other.history;
        self.mismatch += other.mismatch;
        self.preference += other.preference;
    }
}

/// Read-only cost function over one run's registries and settings.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    conflicts: &'a ConflictRegistry,
    history: &'a HistoryRegistry,
    penalties: &'a PenaltiesConfig,
}

impl<'a> CostModel<'a> {
    pub fn new(
        config: &'a AllocationConfig,
        conflicts: &'a ConflictRegistry,
        history: &'a HistoryRegistry,
    ) -> Self {
        Self {
            conflicts,
            history,
            penalties: &config.penalties,
        }
    }

    /// Cost of seating `adj` in `container`.
    ///
    /// `adjustment` shifts the importance the seat is costed at: negative
    /// values let a strategy fill a seat with someone weaker than the
    /// container would otherwise demand. When `chair` is given the
    /// adjudicator is also costed against the already-chosen chair.
    pub fn cost(
        &self,
        container: &Container,
        adj: &ScoredAdjudicator,
        adjustment: f64,
        chair: Option<AdjudicatorId>,
    ) -> AllocResult<f64> {
        Ok(self.breakdown(container, adj, adjustment, chair)?.total())
    }

    pub fn breakdown(
        &self,
        container: &Container,
        adj: &ScoredAdjudicator,
        adjustment: f64,
        chair: Option<AdjudicatorId>,
    ) -> AllocResult<CostBreakdown> {
        let mut breakdown = self.encounters(adj.id, &container.teams, chair)?;

        let importance = f64::from(container.importance.value()) + IMPORTANCE_OFFSET + adjustment;
        let gap = NORMALIZED_MAX + importance - adj.normalized;
        if gap > MISMATCH_SLACK {
            breakdown.mismatch = MISMATCH_SCALE * (gap - MISMATCH_SLACK).exp();
        }
        breakdown.preference = NORMALIZED_MAX - adj.normalized;

        Ok(breakdown)
    }

    /// Conflict and history penalties of `adj` against `teams` and `chair`.
    pub fn encounters(
        &self,
        adj: AdjudicatorId,
        teams: &[TeamId],
        chair: Option<AdjudicatorId>,
    ) -> AllocResult<CostBreakdown> {
        let mut breakdown = CostBreakdown::default();
        for &team in teams {
            if self.conflicts.conflict_adj_team(adj, team)? {
                breakdown.conflict += self.penalties.conflict;
            }
            breakdown.history += self.penalties.history * f64::from(self.history.seen_team(adj, team));
        }
        if let Some(chair) = chair {
            if self.conflicts.conflict_adj_adj(adj, chair)? {
                breakdown.conflict += self.penalties.conflict;
            }
            breakdown.history += self.penalties.history * f64::from(self.history.seen_adjudicator(adj, chair));
        }
        Ok(breakdown)
    }

    /// Cost of placing a whole preformed panel into a debate.
    ///
    /// The importance gap is squared so a panel two steps off costs four
    /// times one a single step off. Every member of the panel is costed
    /// against every team in the debate, but not against each other.
    pub fn preformed_cost(&self, debate: &Container, panel: &PreformedPanel) -> AllocResult<CostBreakdown> {
        let mut breakdown = CostBreakdown::default();
        for adj in panel.members() {
            breakdown += self.encounters(adj, &debate.teams, None)?;
        }
        let gap = f64::from(debate.importance.value() - panel.importance.value());
        breakdown.mismatch = self.penalties.preformed_mismatch * gap * gap;
        Ok(breakdown)
    }

    /// Conflict and history penalties incurred by a finished allocation.
    ///
    /// Everyone is costed against the teams; panellists and trainees are
    /// also costed against the chair. Quality terms are left out, so a
    /// clean allocation scores exactly zero.
    pub fn penalties_of(&self, container: &Container, allocation: &PanelAllocation) -> AllocResult<CostBreakdown> {
        let chair = allocation.chair();
        let mut breakdown = CostBreakdown::default();
        for adj in allocation.members() {
            let against = chair.filter(|&c| c != adj);
            breakdown += self.encounters(adj, &container.teams, against)?;
        }
        Ok(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tab_core::{Adjudicator, ContainerId, DeclaredConflicts, Importance, PastDebate, Seat, SeatRecord, Team};

    fn adjudicator(id: u32, conflicts: DeclaredConflicts) -> Adjudicator {
        Adjudicator {
            id,
            name: format!("adj-{id}"),
            base_score: 3.0,
            feedback_score: None,
            trainee: false,
            institution: None,
            conflicts,
        }
    }

    fn team(id: u32) -> Team {
        Team {
            id,
            name: format!("team-{id}"),
            institution: None,
            institution_conflicts: vec![],
        }
    }

    fn scored(id: u32, normalized: f64) -> ScoredAdjudicator {
        ScoredAdjudicator {
            id,
            weighted: normalized,
            normalized,
            trainee: false,
        }
    }

    fn debate(importance: i32) -> Container {
        Container {
            id: ContainerId::Debate(1),
            teams: vec![10, 11],
            importance: Importance::new(importance).unwrap(),
            room_rank: 1,
        }
    }

    struct Fixture {
        config: AllocationConfig,
        conflicts: ConflictRegistry,
        history: HistoryRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let adjs = vec![
                adjudicator(
                    1,
                    DeclaredConflicts {
                        teams: vec![10],
                        adjudicators: vec![3],
                        ..Default::default()
                    },
                ),
                adjudicator(2, DeclaredConflicts::default()),
                adjudicator(3, DeclaredConflicts::default()),
            ];
            let teams = vec![team(10), team(11)];
            let past = vec![PastDebate {
                round: 1,
                teams: vec![11],
                adjudicators: vec![2, 3],
            }];
            Self {
                config: AllocationConfig::default(),
                conflicts: ConflictRegistry::new(&adjs, &teams),
                history: HistoryRegistry::new(2, &past),
            }
        }

        fn model(&self) -> CostModel<'_> {
            CostModel::new(&self.config, &self.conflicts, &self.history)
        }
    }

    #[test]
    fn conflict_and_history_are_penalized() {
        let fx = Fixture::new();
        let model = fx.model();

        let conflicted = model.breakdown(&debate(0), &scored(1, 5.0), 0.0, None).unwrap();
        assert_eq!(conflicted.conflict, 1_000_000.0);
        assert_eq!(conflicted.history, 0.0);

        let seen = model.breakdown(&debate(0), &scored(2, 5.0), 0.0, None).unwrap();
        assert_eq!(seen.conflict, 0.0);
        assert_eq!(seen.history, 10_000.0);
    }

    #[test]
    fn chair_is_costed_when_given() {
        let fx = Fixture::new();
        let model = fx.model();
        let container = Container {
            teams: vec![],
            ..debate(0)
        };

        let with_chair = model.breakdown(&container, &scored(1, 5.0), 0.0, Some(3)).unwrap();
        assert_eq!(with_chair.conflict, 1_000_000.0);
        let history = model.breakdown(&container, &scored(2, 5.0), 0.0, Some(3)).unwrap();
        assert_eq!(history.history, 10_000.0);
    }

    #[test]
    fn mismatch_grows_with_importance() {
        let fx = Fixture::new();
        let model = fx.model();
        let adj = scored(3, 4.0);

        let low = model.breakdown(&debate(-2), &adj, 0.0, None).unwrap();
        let high = model.breakdown(&debate(2), &adj, 0.0, None).unwrap();
        // gap = 5 + (−2 + 3) − 4 = 2
        assert!((low.mismatch - 1000.0 * 1.75f64.exp()).abs() < 1e-6);
        assert!(high.mismatch > low.mismatch);
        assert_eq!(low.preference, 1.0);
    }

    #[test]
    fn preference_is_on_the_normalized_scale() {
        let mut fx = Fixture::new();
        fx.config.scores.max = 10.0;
        let model = fx.model();

        let best = model.breakdown(&debate(0), &scored(3, NORMALIZED_MAX), 0.0, None).unwrap();
        assert_eq!(best.preference, 0.0);
        let middling = model.breakdown(&debate(0), &scored(3, 2.0), 0.0, None).unwrap();
        assert_eq!(middling.preference, 3.0);
    }

    #[test]
    fn negative_adjustment_lowers_mismatch() {
        let fx = Fixture::new();
        let model = fx.model();
        let adj = scored(3, 2.0);
        let seat = model.cost(&debate(0), &adj, 0.0, None).unwrap();
        let third_seat = model.cost(&debate(0), &adj, -1.0, None).unwrap();
        assert!(third_seat < seat);
    }

    #[test]
    fn higher_score_is_never_more_expensive() {
        let fx = Fixture::new();
        let model = fx.model();
        let weak = model.cost(&debate(1), &scored(3, 1.0), 0.0, None).unwrap();
        let strong = model.cost(&debate(1), &scored(3, 4.5), 0.0, None).unwrap();
        assert!(strong < weak);
    }

    #[test]
    fn unknown_adjudicator_is_an_error() {
        let fx = Fixture::new();
        assert!(fx.model().cost(&debate(0), &scored(99, 3.0), 0.0, None).is_err());
    }

    #[test]
    fn preformed_cost_squares_importance_gap() {
        let fx = Fixture::new();
        let model = fx.model();
        let panel = |importance: i32, adjs: &[u32]| PreformedPanel {
            id: 7,
            importance: Importance::new(importance).unwrap(),
            room_rank: 1,
            adjudicators: adjs
                .iter()
                .map(|&adjudicator| SeatRecord {
                    adjudicator,
                    seat: Seat::Panellist,
                })
                .collect(),
        };

        // 3 has met team 11 before, which is the only cost of a matched panel.
        let matched = model.preformed_cost(&debate(1), &panel(1, &[3])).unwrap();
        assert_eq!(matched.mismatch, 0.0);
        assert_eq!(matched.history, 10_000.0);
        assert_eq!(matched.total(), 10_000.0);

        let two_off = model.preformed_cost(&debate(1), &panel(-1, &[3])).unwrap();
        assert_eq!(two_off.mismatch, 4.0 * 10_000_000.0);

        let conflicted = model.preformed_cost(&debate(1), &panel(1, &[1, 2])).unwrap();
        assert_eq!(conflicted.conflict, 1_000_000.0);
        assert_eq!(conflicted.history, 10_000.0);
    }

    #[test]
    fn finished_allocation_penalties() {
        let fx = Fixture::new();
        let model = fx.model();
        let container = debate(0);

        let quiet = Container {
            teams: vec![10],
            ..debate(0)
        };
        let clean = PanelAllocation::from_ranked_panel(quiet.id, &[3]).unwrap();
        assert_eq!(model.penalties_of(&quiet, &clean).unwrap().total(), 0.0);

        // 1 conflicts with team 10 and with chair 3; 2 has met team 11 and chair 3.
        let messy = PanelAllocation::from_ranked_panel(container.id, &[3, 1, 2]).unwrap();
        let breakdown = model.penalties_of(&container, &messy).unwrap();
        assert_eq!(breakdown.conflict, 2_000_000.0);
        assert_eq!(breakdown.history, 20_000.0 + 10_000.0);
    }
}
