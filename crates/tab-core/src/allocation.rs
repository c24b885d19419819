//! The adjudicators on one debate or preformed panel.
//!
//! A [`PanelAllocation`] is created empty for each container at the start
//! of a strategy run, filled by exactly one strategy pass, and handed back
//! to the caller. Roles are disjoint: an adjudicator sits in at most one of
//! chair, panellists or trainees.
//!
//! Persistence goes through [`PanelAllocation::diff`], which only touches
//! adjudicators whose seat actually changed.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AllocResult, AllocationError};
use crate::store::PanelStore;
use crate::types::{AdjudicatorId, ContainerId};

/// Position of an adjudicator as reported by [`PanelAllocation::with_positions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Chair of a panel with at least one panellist.
    Chair,
    /// Chair adjudicating alone.
    Solo,
    Panellist,
    Trainee,
}

impl Position {
    /// The seat this position is persisted as.
    pub fn seat(self) -> Seat {
        match self {
            Position::Chair | Position::Solo => Seat::Chair,
            Position::Panellist => Seat::Panellist,
            Position::Trainee => Seat::Trainee,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Position::Chair => "c",
            Position::Solo => "o",
            Position::Panellist => "p",
            Position::Trainee => "t",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Position::Chair => "chair",
            Position::Solo => "solo",
            Position::Panellist => "panellist",
            Position::Trainee => "trainee",
        };
        f.write_str(label)
    }
}

/// Persisted seat. Solo and panel chairs share [`Seat::Chair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Chair,
    Panellist,
    Trainee,
}

/// One adjudicator in one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatRecord {
    pub adjudicator: AdjudicatorId,
    pub seat: Seat,
}

/// How ballots are submitted, which decides what a valid panel looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotMode {
    /// One ballot per adjudicator; the majority decides.
    PerAdjudicator,
    /// One consensus ballot per panel.
    PerPanel,
}

/// Minimal set of changes needed to turn a persisted allocation into a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelDiff {
    pub container: ContainerId,
    /// Adjudicators no longer on the panel.
    pub removed: Vec<AdjudicatorId>,
    /// Adjudicators that are new or changed seat.
    pub written: Vec<SeatRecord>,
}

impl PanelDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.written.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelAllocation {
    container: ContainerId,
    chair: Option<AdjudicatorId>,
    panellists: Vec<AdjudicatorId>,
    trainees: Vec<AdjudicatorId>,
}

impl PanelAllocation {
    pub fn new(container: ContainerId) -> Self {
        Self {
            container,
            chair: None,
            panellists: Vec::new(),
            trainees: Vec::new(),
        }
    }

    /// Build an allocation from a chair and a voting panel ordered by
    /// preference: the first member chairs, the rest are panellists.
    pub fn from_ranked_panel(container: ContainerId, ranked: &[AdjudicatorId]) -> AllocResult<Self> {
        let mut allocation = Self::new(container);
        if let Some((&chair, rest)) = ranked.split_first() {
            allocation.set_chair(chair)?;
            for &adj in rest {
                allocation.add_panellist(adj)?;
            }
        }
        Ok(allocation)
    }

    /// Rebuild an allocation from persisted seats.
    pub fn from_seats(container: ContainerId, seats: &[SeatRecord]) -> AllocResult<Self> {
        let mut allocation = Self::new(container);
        for record in seats {
            match record.seat {
                Seat::Chair => allocation.set_chair(record.adjudicator)?,
                Seat::Panellist => allocation.add_panellist(record.adjudicator)?,
                Seat::Trainee => allocation.add_trainee(record.adjudicator)?,
            }
        }
        Ok(allocation)
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn chair(&self) -> Option<AdjudicatorId> {
        self.chair
    }

    pub fn panellists(&self) -> &[AdjudicatorId] {
        &self.panellists
    }

    pub fn trainees(&self) -> &[AdjudicatorId] {
        &self.trainees
    }

    pub fn has_chair(&self) -> bool {
        self.chair.is_some()
    }

    pub fn is_panel(&self) -> bool {
        !self.panellists.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.num_voting() + self.trainees.len()
    }

    pub fn num_voting(&self) -> usize {
        usize::from(self.chair.is_some()) + self.panellists.len()
    }

    pub fn contains(&self, adj: AdjudicatorId) -> bool {
        self.chair == Some(adj) || self.panellists.contains(&adj) || self.trainees.contains(&adj)
    }

    /// Whether the panel can produce a decision under `mode`.
    ///
    /// Per-adjudicator ballots need an odd number of voters so a tie
    /// cannot happen; a consensus panel only needs a chair.
    pub fn valid(&self, mode: BallotMode) -> bool {
        match mode {
            BallotMode::PerAdjudicator => self.has_chair() && self.num_voting() % 2 == 1,
            BallotMode::PerPanel => self.has_chair(),
        }
    }

    /// Replace the chair. The previous chair, if any, leaves the panel.
    pub fn set_chair(&mut self, adj: AdjudicatorId) -> AllocResult<()> {
        if self.chair != Some(adj) && self.contains(adj) {
            return Err(self.duplicate(adj));
        }
        self.chair = Some(adj);
        Ok(())
    }

    pub fn add_panellist(&mut self, adj: AdjudicatorId) -> AllocResult<()> {
        if self.contains(adj) {
            return Err(self.duplicate(adj));
        }
        self.panellists.push(adj);
        Ok(())
    }

    pub fn add_trainee(&mut self, adj: AdjudicatorId) -> AllocResult<()> {
        if self.contains(adj) {
            return Err(self.duplicate(adj));
        }
        self.trainees.push(adj);
        Ok(())
    }

    /// Voting members: the chair first, then panellists.
    pub fn voting(&self) -> impl Iterator<Item = AdjudicatorId> + '_ {
        self.chair.into_iter().chain(self.panellists.iter().copied())
    }

    /// Every member, voting or not.
    pub fn members(&self) -> impl Iterator<Item = AdjudicatorId> + '_ {
        self.voting().chain(self.trainees.iter().copied())
    }

    /// Iterate `(adjudicator, position)` pairs: chair, panellists, trainees.
    pub fn with_positions(&self) -> impl Iterator<Item = (AdjudicatorId, Position)> + '_ {
        let chair_position = if self.is_panel() {
            Position::Chair
        } else {
            Position::Solo
        };
        self.chair
            .map(|c| (c, chair_position))
            .into_iter()
            .chain(self.panellists.iter().map(|&p| (p, Position::Panellist)))
            .chain(self.trainees.iter().map(|&t| (t, Position::Trainee)))
    }

    pub fn seats(&self) -> Vec<SeatRecord> {
        self.with_positions()
            .map(|(adjudicator, position)| SeatRecord {
                adjudicator,
                seat: position.seat(),
            })
            .collect()
    }

    /// Compute the changes that turn `previous` into `self`.
    ///
    /// Adjudicators whose seat is unchanged appear in neither list.
    pub fn diff(&self, previous: &PanelAllocation) -> AllocResult<PanelDiff> {
        if previous.container != self.container {
            return Err(AllocationError::ContainerMismatch {
                expected: self.container,
                found: previous.container,
            });
        }

        let before: HashMap<AdjudicatorId, Seat> = previous
            .seats()
            .into_iter()
            .map(|r| (r.adjudicator, r.seat))
            .collect();
        let after: HashSet<AdjudicatorId> = self.members().collect();

        let removed = previous.members().filter(|a| !after.contains(a)).collect();
        let written = self
            .seats()
            .into_iter()
            .filter(|r| before.get(&r.adjudicator) != Some(&r.seat))
            .collect();

        Ok(PanelDiff {
            container: self.container,
            removed,
            written,
        })
    }

    /// Persist this allocation through `store`, writing only what changed.
    pub fn save<S: PanelStore + ?Sized>(&self, store: &mut S) -> AllocResult<PanelDiff> {
        let previous = store.load(self.container)?;
        let diff = self.diff(&previous)?;
        if !diff.is_empty() {
            store.apply(&diff)?;
        }
        Ok(diff)
    }

    fn duplicate(&self, adjudicator: AdjudicatorId) -> AllocationError {
        AllocationError::DuplicateAssignment {
            adjudicator,
            container: self.container,
        }
    }
}

impl PartialEq for PanelAllocation {
    /// Panellists and trainees compare as sets.
    fn eq(&self, other: &Self) -> bool {
        let as_set = |v: &[AdjudicatorId]| v.iter().copied().collect::<HashSet<_>>();
        self.container == other.container
            && self.chair == other.chair
            && as_set(&self.panellists) == as_set(&other.panellists)
            && as_set(&self.trainees) == as_set(&other.trainees)
    }
}

impl fmt::Display for PanelAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self
            .with_positions()
            .map(|(adj, pos)| format!("{adj} ({})", pos.symbol()))
            .collect();
        write!(f, "{}: {}", self.container, members.join(", "))
    }
}
