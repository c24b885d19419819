//! Round snapshots: the closed input of one allocation run.
//!
//! The persistence layer exports everything the engine needs (available
//! adjudicators, teams, the draw, preformed panels, and who met whom in
//! earlier rounds) into a single JSON document. Nothing else is consulted
//! during the run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{Adjudicator, AdjudicatorId, Container, Debate, PreformedPanel, Team, TeamId};

/// A debate from an earlier round, as far as history is concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastDebate {
    /// Sequence number of the round the debate was in.
    pub round: u32,
    pub teams: Vec<TeamId>,
    pub adjudicators: Vec<AdjudicatorId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    /// Sequence number of the round being allocated.
    pub round: u32,
    #[serde(default)]
    pub adjudicators: Vec<Adjudicator>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub debates: Vec<Debate>,
    #[serde(default)]
    pub panels: Vec<PreformedPanel>,
    #[serde(default)]
    pub history: Vec<PastDebate>,
}

impl RoundSnapshot {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn adjudicator(&self, id: AdjudicatorId) -> Option<&Adjudicator> {
        self.adjudicators.iter().find(|a| a.id == id)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// The debates of this round as strategy containers.
    pub fn debate_containers(&self) -> Vec<Container> {
        self.debates.iter().map(Container::from).collect()
    }

    /// The preformed panels of this round as strategy containers.
    pub fn panel_containers(&self) -> Vec<Container> {
        self.panels.iter().map(Container::from).collect()
    }
}
