//! tab-core — shared types for the Tabgrid adjudicator allocation engine.
//!
//! Everything a strategy consumes or produces lives here: participants,
//! debates and preformed panels, the [`PanelAllocation`] value object with
//! its diff-based persistence contract, the error and warning taxonomy,
//! the round snapshot handed over by the persistence layer, and the
//! tournament-level [`AllocationConfig`].

pub mod allocation;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod warning;

pub use allocation::{BallotMode, PanelAllocation, PanelDiff, Position, Seat, SeatRecord};
pub use config::AllocationConfig;
pub use error::{AllocResult, AllocationError, ParticipantKind};
pub use snapshot::{PastDebate, RoundSnapshot};
pub use store::{MemoryPanelStore, PanelStore};
pub use types::*;
pub use warning::Warning;
