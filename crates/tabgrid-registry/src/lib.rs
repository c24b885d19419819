//! tabgrid-registry — who may not judge whom, and who has met before.
//!
//! Both registries are built once per allocation run from collections the
//! caller has already fetched, then answer every query from memory. They
//! are immutable after construction and are passed by reference into the
//! strategies; nothing is cached globally.
//!
//! # Components
//!
//! - **`conflicts`**: personal and institutional conflicts
//! - **`history`**: prior-round encounters between participants

pub mod conflicts;
pub mod history;

pub use conflicts::{ConflictRegistry, ConflictSummary};
pub use history::HistoryRegistry;
