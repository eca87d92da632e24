//! The implicit sampling grid over the normalized `[0, 1]²` domain.

use serde::{Deserialize, Serialize};
use truss_core::{Result, TrussError};

/// Grid of `u_count x v_count` parameter samples with uniform steps.
///
/// Never materialized: cells are visited by index and their parameters are
/// computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub u_count: usize,
    pub v_count: usize,
    pub du: f64,
    pub dv: f64,
}

impl Grid {
    /// Largest accepted `u_count * v_count`.
    pub const MAX_CELLS: usize = u32::MAX as usize / 4;

    /// Build the grid, rejecting counts that leave the step size undefined
    /// or whose member counts would not fit in `usize`.
    pub fn new(u_count: usize, v_count: usize) -> Result<Self> {
        let cells = u_count.checked_mul(v_count);
        if u_count < 2 || v_count < 2 || cells.map_or(true, |c| c > Self::MAX_CELLS) {
            return Err(TrussError::InvalidGrid { u_count, v_count });
        }
        Ok(Self {
            u_count,
            v_count,
            du: 1.0 / (u_count as f64 - 1.0),
            dv: 1.0 / (v_count as f64 - 1.0),
        })
    }

    /// Parameter of row `i`.
    pub fn u(&self, i: usize) -> f64 {
        (self.du * i as f64).min(1.0)
    }

    /// Parameter of column `j`.
    pub fn v(&self, j: usize) -> f64 {
        (self.dv * j as f64).min(1.0)
    }

    /// Parameter halfway between row `i` and row `i + 1`.
    pub fn mid_u(&self, i: usize) -> f64 {
        ((self.du * i as f64 + self.du * (i + 1) as f64) / 2.0).min(1.0)
    }

    /// Whether row `i` has no row after it.
    pub fn is_last_row(&self, i: usize) -> bool {
        i + 1 == self.u_count
    }

    /// Number of rows that open a strip to the next row.
    pub fn strip_rows(&self) -> usize {
        self.u_count - 1
    }

    /// Number of curves and lines the grid produces, as
    /// `(curve_count, line_count)`.
    ///
    /// Curves: two base isocurves and one offset isocurve per cell, plus one
    /// offset isocurve per strip cell. Lines: two diagonals per strip cell.
    pub fn member_counts(&self) -> (usize, usize) {
        let cells = self.u_count * self.v_count;
        let strip_cells = self.strip_rows() * self.v_count;
        (3 * cells + strip_cells, 2 * strip_cells)
    }

    /// All `(i, j)` cells, `i` outer and `j` inner.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let v_count = self.v_count;
        (0..self.u_count).flat_map(move |i| (0..v_count).map(move |j| (i, j)))
    }
}
