//! Non-fatal allocation warnings.
//!
//! Warnings accompany a complete (if suboptimal) allocation and are meant
//! for a human operator. They never stop a run.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Fewer voting adjudicators than debates.
    InsufficientVoting { debates: usize, voting: usize },
    /// Not enough panellists to seat three per panel debate.
    InsufficientPanellists {
        panel_debates: usize,
        panellists: usize,
        needed: usize,
    },
    /// Containers that ended up without any adjudicator.
    EmptyContainers { count: usize },
    ScoresAboveRange { count: usize, max: f64 },
    ScoresBelowRange { count: usize, min: f64 },
    /// Cost-matrix entries clamped to the solver's ceiling.
    CostOutOfRange { count: usize, ceiling: f64 },
    /// Preformed panels and debates do not pair up one-to-one.
    PanelCountMismatch { debates: usize, panels: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InsufficientVoting { debates, voting } => {
                write!(f, "There are {debates} debates but only {voting} voting adjudicators.")
            }
            Warning::InsufficientPanellists {
                panel_debates,
                panellists,
                needed,
            } => write!(
                f,
                "There are {panel_debates} panel debates but only {panellists} available panellists (less than {needed})."
            ),
            Warning::EmptyContainers { count } => {
                write!(f, "{count} debates or panels received no adjudicators.")
            }
            Warning::ScoresAboveRange { count, max } => write!(
                f,
                "{count} scores are larger than the maximum permitted adjudicator score ({max:.1})."
            ),
            Warning::ScoresBelowRange { count, min } => write!(
                f,
                "{count} scores are smaller than the minimum permitted adjudicator score ({min:.1})."
            ),
            Warning::CostOutOfRange { count, ceiling } => write!(
                f,
                "{count} assignment costs exceeded {ceiling:e} and were clamped; check adjudicator scores."
            ),
            Warning::PanelCountMismatch { debates, panels } => write!(
                f,
                "There are {debates} debates but {panels} preformed panels; unmatched debates are left empty."
            ),
        }
    }
}
