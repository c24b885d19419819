//! Prior-round encounters between participants.
//!
//! Built from the debates of earlier rounds. Only rounds strictly before
//! the round being allocated count; anything at or after it is ignored even
//! if the caller passes it in.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use tab_core::{AdjudicatorId, PastDebate, TeamId};

#[derive(Debug, Clone, Default)]
pub struct HistoryRegistry {
    round: u32,
    /// (adjudicator, team) → round sequence numbers of each encounter.
    adj_team: HashMap<(AdjudicatorId, TeamId), Vec<u32>>,
    /// Stored under both orderings of the pair.
    adj_adj: HashMap<(AdjudicatorId, AdjudicatorId), Vec<u32>>,
}

impl HistoryRegistry {
    /// Index every debate in `history` from rounds before `round`.
    pub fn new(round: u32, history: &[PastDebate]) -> Self {
        let mut registry = HistoryRegistry {
            round,
            ..Default::default()
        };

        let mut skipped = 0usize;
        for debate in history {
            if debate.round >= round {
                skipped += 1;
                continue;
            }

            let adjudicators: Vec<AdjudicatorId> = {
                let mut seen = HashSet::new();
                debate
                    .adjudicators
                    .iter()
                    .copied()
                    .filter(|a| seen.insert(*a))
                    .collect()
            };

            for &adj in &adjudicators {
                for &team in &debate.teams {
                    registry.adj_team.entry((adj, team)).or_default().push(debate.round);
                }
            }

            for (i, &a) in adjudicators.iter().enumerate() {
                for &b in &adjudicators[i + 1..] {
                    registry.adj_adj.entry((a, b)).or_default().push(debate.round);
                    registry.adj_adj.entry((b, a)).or_default().push(debate.round);
                }
            }
        }

        debug!(
            round,
            adj_team = registry.adj_team.len(),
            adj_adj = registry.adj_adj.len() / 2,
            skipped,
            "history registry built"
        );
        registry
    }

    /// The round this history was built for.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Number of earlier debates in which the adjudicator judged the team.
    pub fn seen_team(&self, adj: AdjudicatorId, team: TeamId) -> u32 {
        self.adj_team.get(&(adj, team)).map_or(0, |r| r.len() as u32)
    }

    /// Number of earlier debates in which the two adjudicators sat together.
    pub fn seen_adjudicator(&self, adj1: AdjudicatorId, adj2: AdjudicatorId) -> u32 {
        self.adj_adj.get(&(adj1, adj2)).map_or(0, |r| r.len() as u32)
    }

    /// How many rounds ago the adjudicator last judged the team.
    pub fn team_last_seen_ago(&self, adj: AdjudicatorId, team: TeamId) -> Option<u32> {
        self.ago(self.adj_team.get(&(adj, team)))
    }

    /// How many rounds ago the two adjudicators last sat together.
    pub fn adjudicator_last_seen_ago(&self, adj1: AdjudicatorId, adj2: AdjudicatorId) -> Option<u32> {
        self.ago(self.adj_adj.get(&(adj1, adj2)))
    }

    fn ago(&self, rounds: Option<&Vec<u32>>) -> Option<u32> {
        rounds
            .and_then(|r| r.iter().max())
            .map(|&last| self.round - last)
    }
}
