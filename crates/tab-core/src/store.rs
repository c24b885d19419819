//! Persistence seam for panel allocations.
//!
//! The engine never talks to a database. Callers hand a [`PanelStore`] to
//! [`PanelAllocation::save`](crate::PanelAllocation::save), which loads the
//! previous allocation for the same container and applies only the diff.
//! [`MemoryPanelStore`] is a table-shaped in-memory implementation that can
//! be round-tripped through a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::allocation::{PanelAllocation, PanelDiff, Seat, SeatRecord};
use crate::error::AllocResult;
use crate::types::{AdjudicatorId, ContainerId};

/// Storage for the adjudicators seated on each container.
pub trait PanelStore {
    /// Load the allocation currently persisted for `container`.
    ///
    /// A container with nothing persisted loads as an empty allocation.
    fn load(&self, container: ContainerId) -> AllocResult<PanelAllocation>;

    /// Apply a diff produced by [`PanelAllocation::diff`].
    fn apply(&mut self, diff: &PanelDiff) -> AllocResult<()>;
}

/// One persisted row: an adjudicator seated on a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSeat {
    pub container: ContainerId,
    pub adjudicator: AdjudicatorId,
    pub seat: Seat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPanelStore {
    rows: Vec<StoredSeat>,
    /// Number of rows written or deleted since creation.
    #[serde(skip)]
    touched: usize,
}

impl MemoryPanelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON file, or start empty if the file is missing.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn write_file(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn rows(&self) -> &[StoredSeat] {
        &self.rows
    }

    /// Rows written or deleted so far.
    pub fn touched(&self) -> usize {
        self.touched
    }
}

impl PanelStore for MemoryPanelStore {
    fn load(&self, container: ContainerId) -> AllocResult<PanelAllocation> {
        let seats: Vec<_> = self
            .rows
            .iter()
            .filter(|r| r.container == container)
            .map(|r| SeatRecord {
                adjudicator: r.adjudicator,
                seat: r.seat,
            })
            .collect();
        PanelAllocation::from_seats(container, &seats)
    }

    fn apply(&mut self, diff: &PanelDiff) -> AllocResult<()> {
        let before = self.rows.len();
        self.rows
            .retain(|r| !(r.container == diff.container && diff.removed.contains(&r.adjudicator)));
        self.touched += before - self.rows.len();

        for record in &diff.written {
            match self
                .rows
                .iter_mut()
                .find(|r| r.container == diff.container && r.adjudicator == record.adjudicator)
            {
                Some(row) => row.seat = record.seat,
                None => self.rows.push(StoredSeat {
                    container: diff.container,
                    adjudicator: record.adjudicator,
                    seat: record.seat,
                }),
            }
            self.touched += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D1: ContainerId = ContainerId::Debate(1);

    fn allocation(chair: u32, panellists: &[u32]) -> PanelAllocation {
        let mut ranked = vec![chair];
        ranked.extend_from_slice(panellists);
        PanelAllocation::from_ranked_panel(D1, &ranked).unwrap()
    }

    #[test]
    fn save_to_empty_store_writes_everyone() {
        let mut store = MemoryPanelStore::new();
        let diff = allocation(1, &[2, 3]).save(&mut store).unwrap();

        assert_eq!(diff.written.len(), 3);
        assert_eq!(store.rows().len(), 3);
        assert_eq!(store.load(D1).unwrap(), allocation(1, &[2, 3]));
    }

    #[test]
    fn saving_unchanged_allocation_touches_nothing() {
        let mut store = MemoryPanelStore::new();
        allocation(1, &[2, 3]).save(&mut store).unwrap();
        let touched = store.touched();

        let diff = allocation(1, &[3, 2]).save(&mut store).unwrap();
        assert!(diff.is_empty());
        assert_eq!(store.touched(), touched);
    }

    #[test]
    fn save_swaps_roles_in_place() {
        let mut store = MemoryPanelStore::new();
        allocation(1, &[2, 3]).save(&mut store).unwrap();
        allocation(2, &[1, 4]).save(&mut store).unwrap();

        let loaded = store.load(D1).unwrap();
        assert_eq!(loaded.chair(), Some(2));
        assert_eq!(store.rows().len(), 3);
        assert!(!loaded.contains(3));
    }

    #[test]
    fn other_containers_are_untouched() {
        let mut store = MemoryPanelStore::new();
        allocation(1, &[]).save(&mut store).unwrap();
        let other = PanelAllocation::from_ranked_panel(ContainerId::Debate(2), &[5]).unwrap();
        other.save(&mut store).unwrap();

        PanelAllocation::new(D1).save(&mut store).unwrap();
        assert!(store.load(D1).unwrap().is_empty());
        assert_eq!(store.load(ContainerId::Debate(2)).unwrap().chair(), Some(5));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allocations.json");

        let mut store = MemoryPanelStore::from_file(&path).unwrap();
        allocation(1, &[2, 3]).save(&mut store).unwrap();
        store.write_file(&path).unwrap();

        let reloaded = MemoryPanelStore::from_file(&path).unwrap();
        assert_eq!(reloaded.load(D1).unwrap(), allocation(1, &[2, 3]));
    }
}
