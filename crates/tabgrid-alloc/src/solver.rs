//! Minimum-cost assignment over rectangular cost matrices.
//!
//! Rows are positions to fill, columns are candidates. Strategies only ever
//! see row/column indices and map them back to their own domain objects.
//!
//! [`KuhnMunkres`] delegates to `pathfinding`, which needs integer weights
//! and at least as many columns as rows. Costs are therefore scaled to
//! fixed point, clamped to a ceiling, and short matrices are padded with
//! ceiling-cost dummy columns. Rows matched to a dummy stay unmatched.

use tracing::debug;

use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;

/// Dense row-major matrix of assignment costs.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    columns: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Build a matrix cell by cell, stopping at the first error.
    pub fn try_from_fn<E>(
        rows: usize,
        columns: usize,
        mut cell: impl FnMut(usize, usize) -> Result<f64, E>,
    ) -> Result<Self, E> {
        let mut data = Vec::with_capacity(rows * columns);
        for r in 0..rows {
            for c in 0..columns {
                data.push(cell(r, c)?);
            }
        }
        Ok(Self { rows, columns, data })
    }

    /// Build a matrix from its rows. Returns `None` if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != columns) {
            return None;
        }
        let data: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Some(Self {
            rows: rows.len(),
            columns,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.data[row * self.columns + column]
    }

    /// Sum of the costs at the given `(row, column)` pairs.
    pub fn total(&self, pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(r, c)| self.get(r, c)).sum()
    }
}

/// Result of solving one matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    /// Matched `(row, column)` pairs in ascending row order.
    pub pairs: Vec<(usize, usize)>,
    /// Cells whose cost had to be clamped before solving.
    pub clamped: usize,
    /// The ceiling the clamped cells were set to.
    pub ceiling: f64,
}

/// A minimum-total-cost bipartite matching routine.
///
/// When `rows <= columns` every row must be matched to a distinct column.
/// When `rows > columns` exactly `columns` rows are matched. Results must
/// be deterministic for a given matrix.
pub trait MatchingSolver: Send + Sync {
    fn solve(&self, matrix: &CostMatrix) -> Assignment;
}

/// Hungarian-algorithm solver backed by `pathfinding`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KuhnMunkres {
    /// Fixed-point multiplier applied to every cost.
    pub scale: f64,
    /// Largest cost (before scaling) passed to the solver; also the pad cost.
    pub ceiling: f64,
}

impl KuhnMunkres {
    pub const DEFAULT: KuhnMunkres = KuhnMunkres {
        scale: 100.0,
        ceiling: 1e12,
    };

    fn to_fixed(&self, cost: f64) -> (i64, bool) {
        if cost.is_nan() || cost > self.ceiling {
            ((self.ceiling * self.scale) as i64, true)
        } else if cost < -self.ceiling {
            ((-self.ceiling * self.scale) as i64, true)
        } else {
            ((cost * self.scale).round() as i64, false)
        }
    }
}

impl Default for KuhnMunkres {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl MatchingSolver for KuhnMunkres {
    fn solve(&self, matrix: &CostMatrix) -> Assignment {
        if matrix.is_empty() {
            return Assignment {
                ceiling: self.ceiling,
                ..Default::default()
            };
        }

        let width = matrix.rows().max(matrix.columns());
        let pad = (self.ceiling * self.scale) as i64;
        let mut clamped = 0usize;
        let weights = Matrix::from_fn(matrix.rows(), width, |(r, c)| {
            if c >= matrix.columns() {
                return pad;
            }
            let (fixed, was_clamped) = self.to_fixed(matrix.get(r, c));
            clamped += usize::from(was_clamped);
            fixed
        });

        let (_, columns) = kuhn_munkres_min(&weights);
        let pairs: Vec<(usize, usize)> = columns
            .into_iter()
            .enumerate()
            .filter(|&(_, c)| c < matrix.columns())
            .collect();

        debug!(
            rows = matrix.rows(),
            columns = matrix.columns(),
            matched = pairs.len(),
            clamped,
            "solved assignment"
        );

        Assignment {
            pairs,
            clamped,
            ceiling: self.ceiling,
        }
    }
}
