//! Adjudicator scores as the strategies see them.
//!
//! Each adjudicator's weighted score (base blended with feedback) is
//! rescaled from the tournament's `min..=max` onto a fixed 0..=5 scale so
//! cost constants do not depend on how a tournament marks its judges.
//! Scores outside the configured range are kept as-is and reported.

use std::cmp::Ordering;

use tracing::{debug, warn};

use tab_core::config::ScoresConfig;
use tab_core::{Adjudicator, AdjudicatorId, Warning};

/// Top of the normalized score scale.
pub const NORMALIZED_MAX: f64 = 5.0;

/// An adjudicator reduced to what ranking and costing need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredAdjudicator {
    pub id: AdjudicatorId,
    /// Base score blended with feedback, on the tournament's scale.
    pub weighted: f64,
    /// `weighted` mapped onto 0..=5.
    pub normalized: f64,
    pub trainee: bool,
}

impl ScoredAdjudicator {
    /// Voting adjudicators may chair or panel; everyone else can only trainee.
    pub fn can_vote(&self, min_voting: f64) -> bool {
        !self.trainee && self.weighted >= min_voting
    }

    /// Higher normalized score first.
    pub fn by_score_desc(a: &Self, b: &Self) -> Ordering {
        b.normalized.total_cmp(&a.normalized)
    }
}

/// Map a weighted score onto the normalized scale.
///
/// A degenerate range (`max == min`) maps everything to zero.
pub fn normalize(weighted: f64, scores: &ScoresConfig) -> f64 {
    let range = scores.max - scores.min;
    if range == 0.0 {
        return 0.0;
    }
    (weighted - scores.min) / range * NORMALIZED_MAX
}

/// Score every adjudicator, pushing range warnings onto `warnings`.
pub fn score_adjudicators(
    adjudicators: &[Adjudicator],
    scores: &ScoresConfig,
    warnings: &mut Vec<Warning>,
) -> Vec<ScoredAdjudicator> {
    let scored: Vec<ScoredAdjudicator> = adjudicators
        .iter()
        .map(|adj| {
            let weighted = adj.weighted_score(scores.feedback_weight);
            ScoredAdjudicator {
                id: adj.id,
                weighted,
                normalized: normalize(weighted, scores),
                trainee: adj.trainee,
            }
        })
        .collect();

    let above = scored.iter().filter(|s| s.normalized > NORMALIZED_MAX).count();
    let below = scored.iter().filter(|s| s.normalized < 0.0).count();
    if above > 0 {
        warn!(count = above, max = scores.max, "adjudicator scores above configured range");
        warnings.push(Warning::ScoresAboveRange {
            count: above,
            max: scores.max,
        });
    }
    if below > 0 {
        warn!(count = below, min = scores.min, "adjudicator scores below configured range");
        warnings.push(Warning::ScoresBelowRange {
            count: below,
            min: scores.min,
        });
    }

    debug!(adjudicators = scored.len(), "scored adjudicators");
    scored
}
