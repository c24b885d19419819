//! Conflict lookups for a fixed population of adjudicators and teams.
//!
//! Personal conflicts are pair sets; adjudicator pairs are stored both ways
//! round. Institutional conflicts are kept as per-participant institution
//! sets so an overlap check is a set intersection.
//!
//! Every query must name participants that were supplied at construction;
//! anything else is [`AllocationError::UnknownParticipant`].

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use tab_core::config::ConflictsConfig;
use tab_core::{
    AdjudicatorId, Adjudicator, AllocResult, AllocationError, InstitutionId, Team, TeamId,
};

/// Everything one adjudicator conflicts with, for operator-facing reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictSummary {
    pub teams: BTreeSet<TeamId>,
    pub adjudicators: BTreeSet<AdjudicatorId>,
    pub institutions: BTreeSet<InstitutionId>,
}

#[derive(Debug, Clone, Default)]
pub struct ConflictRegistry {
    adj_team: HashSet<(AdjudicatorId, TeamId)>,
    adj_adj: HashSet<(AdjudicatorId, AdjudicatorId)>,
    adj_institutions: HashMap<AdjudicatorId, HashSet<InstitutionId>>,
    team_institutions: HashMap<TeamId, HashSet<InstitutionId>>,
}

impl ConflictRegistry {
    /// Build the registry from declared conflicts only.
    pub fn new(adjudicators: &[Adjudicator], teams: &[Team]) -> Self {
        Self::build(adjudicators, teams, &ConflictsConfig::default())
    }

    pub fn build(adjudicators: &[Adjudicator], teams: &[Team], options: &ConflictsConfig) -> Self {
        let mut registry = ConflictRegistry {
            adj_institutions: adjudicators.iter().map(|a| (a.id, HashSet::new())).collect(),
            team_institutions: teams.iter().map(|t| (t.id, HashSet::new())).collect(),
            ..Default::default()
        };

        for adj in adjudicators {
            for &team in &adj.conflicts.teams {
                if registry.team_institutions.contains_key(&team) {
                    registry.adj_team.insert((adj.id, team));
                } else {
                    warn!(adjudicator = adj.id, team, "skipping conflict with team outside this run");
                }
            }

            for &other in &adj.conflicts.adjudicators {
                if other == adj.id {
                    continue;
                }
                if registry.adj_institutions.contains_key(&other) {
                    registry.adj_adj.insert((adj.id, other));
                    registry.adj_adj.insert((other, adj.id));
                } else {
                    warn!(adjudicator = adj.id, other, "skipping conflict with adjudicator outside this run");
                }
            }

            let institutions = registry.adj_institutions.entry(adj.id).or_default();
            institutions.extend(adj.conflicts.institutions.iter().copied());
            if options.own_institution {
                institutions.extend(adj.institution);
            }
        }

        for team in teams {
            let institutions = registry.team_institutions.entry(team.id).or_default();
            institutions.extend(team.institution_conflicts.iter().copied());
            if options.own_institution {
                institutions.extend(team.institution);
            }
        }

        let duplicates = adjudicators.len() - registry.adj_institutions.len();
        if duplicates > 0 {
            warn!(duplicates, "adjudicators listed more than once; conflicts were merged");
        }

        debug!(
            adjudicators = registry.adj_institutions.len(),
            teams = registry.team_institutions.len(),
            adj_team = registry.adj_team.len(),
            adj_adj = registry.adj_adj.len() / 2,
            "conflict registry built"
        );
        registry
    }

    /// Whether the adjudicator and team personally conflict.
    pub fn personal_conflict_adj_team(&self, adj: AdjudicatorId, team: TeamId) -> AllocResult<bool> {
        self.check_adjudicator(adj)?;
        self.check_team(team)?;
        Ok(self.adj_team.contains(&(adj, team)))
    }

    /// Whether the two adjudicators personally conflict.
    pub fn personal_conflict_adj_adj(&self, adj1: AdjudicatorId, adj2: AdjudicatorId) -> AllocResult<bool> {
        self.check_adjudicator(adj1)?;
        self.check_adjudicator(adj2)?;
        Ok(self.adj_adj.contains(&(adj1, adj2)))
    }

    /// Institutions that both the adjudicator and the team conflict with.
    pub fn conflicting_institutions_adj_team(
        &self,
        adj: AdjudicatorId,
        team: TeamId,
    ) -> AllocResult<BTreeSet<InstitutionId>> {
        let a = self.institutions_of_adjudicator(adj)?;
        let t = self.institutions_of_team(team)?;
        Ok(a.intersection(t).copied().collect())
    }

    pub fn institutional_conflict_adj_team(&self, adj: AdjudicatorId, team: TeamId) -> AllocResult<bool> {
        let a = self.institutions_of_adjudicator(adj)?;
        let t = self.institutions_of_team(team)?;
        Ok(!a.is_disjoint(t))
    }

    pub fn institutional_conflict_adj_adj(&self, adj1: AdjudicatorId, adj2: AdjudicatorId) -> AllocResult<bool> {
        let a = self.institutions_of_adjudicator(adj1)?;
        let b = self.institutions_of_adjudicator(adj2)?;
        Ok(!a.is_disjoint(b))
    }

    /// Personal or institutional conflict between an adjudicator and a team.
    pub fn conflict_adj_team(&self, adj: AdjudicatorId, team: TeamId) -> AllocResult<bool> {
        Ok(self.personal_conflict_adj_team(adj, team)? || self.institutional_conflict_adj_team(adj, team)?)
    }

    /// Personal or institutional conflict between two adjudicators.
    pub fn conflict_adj_adj(&self, adj1: AdjudicatorId, adj2: AdjudicatorId) -> AllocResult<bool> {
        Ok(self.personal_conflict_adj_adj(adj1, adj2)? || self.institutional_conflict_adj_adj(adj1, adj2)?)
    }

    pub fn conflicts_of_adjudicator(&self, adj: AdjudicatorId) -> AllocResult<ConflictSummary> {
        let institutions = self.institutions_of_adjudicator(adj)?;
        Ok(ConflictSummary {
            teams: self
                .adj_team
                .iter()
                .filter(|(a, _)| *a == adj)
                .map(|&(_, t)| t)
                .collect(),
            adjudicators: self
                .adj_adj
                .iter()
                .filter(|(a, _)| *a == adj)
                .map(|&(_, other)| other)
                .collect(),
            institutions: institutions.iter().copied().collect(),
        })
    }

    pub fn covers_adjudicator(&self, adj: AdjudicatorId) -> bool {
        self.adj_institutions.contains_key(&adj)
    }

    pub fn covers_team(&self, team: TeamId) -> bool {
        self.team_institutions.contains_key(&team)
    }

    fn institutions_of_adjudicator(&self, adj: AdjudicatorId) -> AllocResult<&HashSet<InstitutionId>> {
        self.adj_institutions
            .get(&adj)
            .ok_or_else(|| AllocationError::unknown_adjudicator(adj))
    }

    fn institutions_of_team(&self, team: TeamId) -> AllocResult<&HashSet<InstitutionId>> {
        self.team_institutions
            .get(&team)
            .ok_or_else(|| AllocationError::unknown_team(team))
    }

    fn check_adjudicator(&self, adj: AdjudicatorId) -> AllocResult<()> {
        self.institutions_of_adjudicator(adj).map(|_| ())
    }

    fn check_team(&self, team: TeamId) -> AllocResult<()> {
        self.institutions_of_team(team).map(|_| ())
    }
}
