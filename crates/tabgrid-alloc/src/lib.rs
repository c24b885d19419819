//! tabgrid-alloc — decides who judges each debate, and in what role.
//!
//! Given a round's debates (or preformed panels) and the available
//! adjudicators, a [`Strategy`] partitions the pool into chairs,
//! panellists and trainees, builds cost matrices with the shared
//! [`CostModel`], solves them through a [`MatchingSolver`], and decodes
//! the result into one [`PanelAllocation`](tab_core::PanelAllocation) per
//! container. [`PreformedAllocator`] does the same for whole preformed
//! panels against debates.
//!
//! # Components
//!
//! - **`scores`**: feedback-weighted, normalized adjudicator scores
//! - **`cost`**: conflict, history and quality/importance penalties
//! - **`solver`**: minimum-cost assignment over rectangular matrices
//! - **`seats`**: how many voters each debate gets
//! - **`strategy`**: trivial, voting and consensus allocators
//! - **`preformed`**: preformed panel → debate allocators
//!
//! # Flow
//!
//! ```text
//! snapshot ──► ConflictRegistry ─┐
//!          └─► HistoryRegistry ──┼─► AllocationContext
//!                                │
//! containers + adjudicators ─────┴─► Strategy::allocate
//!                                      ├── score + rank pool
//!                                      ├── CostModel → CostMatrix
//!                                      ├── MatchingSolver::solve
//!                                      └── decode → PanelAllocation[] + Warning[]
//! ```

pub mod cost;
pub mod preformed;
pub mod scores;
pub mod seats;
pub mod solver;
pub mod strategy;

pub use cost::{CostBreakdown, CostModel};
pub use preformed::{PanelAssignment, PreformedAllocator, copy_panels_to_debates};
pub use scores::{ScoredAdjudicator, score_adjudicators};
pub use solver::{Assignment, CostMatrix, KuhnMunkres, MatchingSolver};
pub use strategy::{AllocationContext, AllocationOutcome, Strategy};
