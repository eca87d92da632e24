//! Isocurve and diagonal emission.

use tracing::trace;
use truss_core::{GridStage, ParamDirection, Result};
use truss_geometry::curve::{AnyCurve, Line};
use truss_geometry::{ProjectionOptions, Surface};

use crate::grid::Grid;

/// Append the base surface isocurves to `curves` in first-walk order.
///
/// Each cell contributes the isocurve along u at `v(j)` followed by the one
/// along v at `u(i)`. Neighbouring cells repeat curves; they are kept.
pub fn base_isocurves<S: Surface + ?Sized>(
    surface: &S,
    grid: &Grid,
    curves: &mut Vec<AnyCurve>,
) -> Result<()> {
    for (i, j) in grid.cells() {
        let along_u = surface
            .iso_curve(ParamDirection::U, grid.v(j))
            .map_err(|e| e.at_cell(GridStage::Sampling, i, j))?;
        let along_v = surface
            .iso_curve(ParamDirection::V, grid.u(i))
            .map_err(|e| e.at_cell(GridStage::Sampling, i, j))?;
        curves.push(along_u);
        curves.push(along_v);
    }
    Ok(())
}

/// Walks the grid a second time against the fitted offset surface.
pub struct MemberEmitter<'a, S: ?Sized, O: ?Sized> {
    base: &'a S,
    offset: &'a O,
    grid: Grid,
    distance: f64,
    projection: ProjectionOptions,
}

impl<'a, S, O> MemberEmitter<'a, S, O>
where
    S: Surface + ?Sized,
    O: Surface + ?Sized,
{
    pub fn new(
        base: &'a S,
        offset: &'a O,
        grid: Grid,
        distance: f64,
        projection: ProjectionOptions,
    ) -> Self {
        Self {
            base,
            offset,
            grid,
            distance,
            projection,
        }
    }

    /// Append offset isocurves to `curves` and diagonals to `lines`.
    ///
    /// Per cell: the offset isocurve along u through the projection of the
    /// offset grid node, then for every row but the last the offset isocurve
    /// along v through the projected strip midpoint and the two diagonals
    /// `(pt1, midpt3)`, `(pt2, midpt3)`.
    pub fn emit(&self, curves: &mut Vec<AnyCurve>, lines: &mut Vec<Line>) -> Result<()> {
        for (i, j) in self.grid.cells() {
            self.emit_cell(i, j, curves, lines)
                .map_err(|e| e.at_cell(GridStage::Emission, i, j))?;
        }
        Ok(())
    }

    fn emit_cell(
        &self,
        i: usize,
        j: usize,
        curves: &mut Vec<AnyCurve>,
        lines: &mut Vec<Line>,
    ) -> Result<()> {
        let grid = &self.grid;
        let (u, v) = (grid.u(i), grid.v(j));
        let offset_vec = self.base.normal_at(u, v)? * self.distance;

        let node = self.base.point_at(u, v);
        let (_, v1) = self.offset.closest_point(node + offset_vec, &self.projection)?;
        curves.push(self.offset.iso_curve(ParamDirection::U, v1)?);

        if grid.is_last_row(i) {
            return Ok(());
        }

        let pt1 = node;
        let pt2 = self.base.point_at(grid.u(i + 1), v);
        let midpt2 = self.base.point_at(grid.mid_u(i), v) + offset_vec;
        let (u2, v2) = self.offset.closest_point(midpt2, &self.projection)?;
        let midpt3 = self.offset.point_at(u2, v2);
        trace!(i, j, u2, v2, "Projected strip midpoint");

        curves.push(self.offset.iso_curve(ParamDirection::V, u2)?);
        lines.push(Line::new(pt1, midpt3));
        lines.push(Line::new(pt2, midpt3));
        Ok(())
    }
}
