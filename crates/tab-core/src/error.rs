//! Error types for adjudicator allocation.
//!
//! Every variant is fatal: a run that returns one of these produced nothing
//! that may be persisted. Non-fatal shortfalls are [`Warning`](crate::Warning)s.

use std::fmt;

use thiserror::Error;

use crate::types::{AdjudicatorId, ContainerId};

/// Result type alias for allocation operations.
pub type AllocResult<T> = Result<T, AllocationError>;

/// Which population a registry lookup referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantKind {
    Adjudicator,
    Team,
}

impl fmt::Display for ParticipantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantKind::Adjudicator => f.write_str("adjudicator"),
            ParticipantKind::Team => f.write_str("team"),
        }
    }
}

/// Errors that abort an allocation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error(
        "there are no available adjudicators; mark adjudicators as available \
         for this round before auto-allocating"
    )]
    NoAdjudicators,

    #[error("there are no debates for this round; create the draw first")]
    NoDebates,

    #[error("there are no preformed panels to use; form panels first or allocate adjudicators directly")]
    NoPanels,

    #[error(
        "no adjudicators are eligible to chair or panel; lower the minimum \
         voting score (currently {min_voting_score:.1}) below some adjudicators' scores"
    )]
    NoVotingAdjudicators { min_voting_score: f64 },

    #[error("{kind} {id} is not part of this allocation run")]
    UnknownParticipant { kind: ParticipantKind, id: u32 },

    #[error("adjudicator {adjudicator} already sits on the panel for {container}")]
    DuplicateAssignment {
        adjudicator: AdjudicatorId,
        container: ContainerId,
    },

    #[error("cannot diff the allocation for {expected} against one for {found}")]
    ContainerMismatch {
        expected: ContainerId,
        found: ContainerId,
    },

    #[error("importance {0} is outside the range -2..=2")]
    InvalidImportance(i32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AllocationError {
    pub fn unknown_adjudicator(id: AdjudicatorId) -> Self {
        AllocationError::UnknownParticipant {
            kind: ParticipantKind::Adjudicator,
            id,
        }
    }

    pub fn unknown_team(id: u32) -> Self {
        AllocationError::UnknownParticipant {
            kind: ParticipantKind::Team,
            id,
        }
    }
}
