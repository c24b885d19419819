//! Domain types shared across Tabgrid crates.
//!
//! These are read-only inputs for one allocation run. The persistence layer
//! materializes them (usually through a [`RoundSnapshot`](crate::RoundSnapshot))
//! and the engine never mutates them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::allocation::{Seat, SeatRecord};
use crate::error::AllocationError;

/// Primary key of an adjudicator.
pub type AdjudicatorId = u32;

/// Primary key of a team.
pub type TeamId = u32;

/// Primary key of an institution.
pub type InstitutionId = u32;

/// Primary key of a debate.
pub type DebateId = u32;

/// Primary key of a preformed panel.
pub type PanelId = u32;

// ── Importance ─────────────────────────────────────────────────────

/// Signed priority of a debate or preformed panel, bounded to −2..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Importance(i8);

impl Importance {
    pub const MIN: i32 = -2;
    pub const MAX: i32 = 2;

    pub fn new(value: i32) -> Result<Self, AllocationError> {
        Self::try_from(value)
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }
}

impl TryFrom<i32> for Importance {
    type Error = AllocationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Importance(value as i8))
        } else {
            Err(AllocationError::InvalidImportance(value))
        }
    }
}

impl From<Importance> for i32 {
    fn from(importance: Importance) -> Self {
        importance.value()
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

// ── Participants ───────────────────────────────────────────────────

/// Conflicts declared by (or against) an adjudicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredConflicts {
    #[serde(default)]
    pub teams: Vec<TeamId>,
    #[serde(default)]
    pub adjudicators: Vec<AdjudicatorId>,
    #[serde(default)]
    pub institutions: Vec<InstitutionId>,
}

/// An adjudicator available for the round being allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjudicator {
    pub id: AdjudicatorId,
    pub name: String,
    /// Quality score assigned by the adjudication core (the "test score").
    pub base_score: f64,
    /// Score derived from feedback, if any feedback has been received.
    #[serde(default)]
    pub feedback_score: Option<f64>,
    /// Trainees never vote, whatever their score.
    #[serde(default)]
    pub trainee: bool,
    #[serde(default)]
    pub institution: Option<InstitutionId>,
    #[serde(default)]
    pub conflicts: DeclaredConflicts,
}

impl Adjudicator {
    /// Blend the base score with the feedback score.
    ///
    /// An adjudicator without feedback is scored on the base score alone,
    /// regardless of `feedback_weight`.
    pub fn weighted_score(&self, feedback_weight: f64) -> f64 {
        match self.feedback_score {
            Some(feedback) => self.base_score * (1.0 - feedback_weight) + feedback * feedback_weight,
            None => self.base_score,
        }
    }
}

/// A team participating in the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub institution: Option<InstitutionId>,
    /// Institutions this team conflicts with.
    #[serde(default)]
    pub institution_conflicts: Vec<InstitutionId>,
}

// ── Debates & panels ───────────────────────────────────────────────

/// A debate in the round's draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debate {
    pub id: DebateId,
    pub teams: Vec<TeamId>,
    #[serde(default)]
    pub importance: Importance,
    /// Tie-break ordering key; lower ranks come first.
    #[serde(default)]
    pub room_rank: u32,
}

/// A panel formed ahead of the draw and later assigned to a debate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreformedPanel {
    pub id: PanelId,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub room_rank: u32,
    /// Adjudicators already placed on this panel.
    #[serde(default)]
    pub adjudicators: Vec<SeatRecord>,
}

impl PreformedPanel {
    /// Iterate over the adjudicators on this panel, regardless of seat.
    pub fn members(&self) -> impl Iterator<Item = AdjudicatorId> + '_ {
        self.adjudicators.iter().map(|s| s.adjudicator)
    }

    pub fn chair(&self) -> Option<AdjudicatorId> {
        self.adjudicators
            .iter()
            .find(|s| s.seat == Seat::Chair)
            .map(|s| s.adjudicator)
    }
}

/// Identifies what a [`PanelAllocation`](crate::PanelAllocation) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerId {
    Debate(DebateId),
    Panel(PanelId),
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Debate(id) => write!(f, "debate {id}"),
            ContainerId::Panel(id) => write!(f, "panel {id}"),
        }
    }
}

/// The strategy-facing view of a debate or preformed panel.
///
/// Preformed panels have no teams, so their cost is driven by importance
/// alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: ContainerId,
    pub teams: Vec<TeamId>,
    pub importance: Importance,
    pub room_rank: u32,
}

impl From<&Debate> for Container {
    fn from(debate: &Debate) -> Self {
        Container {
            id: ContainerId::Debate(debate.id),
            teams: debate.teams.clone(),
            importance: debate.importance,
            room_rank: debate.room_rank,
        }
    }
}

impl From<&PreformedPanel> for Container {
    fn from(panel: &PreformedPanel) -> Self {
        Container {
            id: ContainerId::Panel(panel.id),
            teams: Vec::new(),
            importance: panel.importance,
            room_rank: panel.room_rank,
        }
    }
}
