//! First grid walk: midpoint offset samples and the offset surface fit.

use tracing::debug;
use truss_core::{GridStage, Result};
use truss_geometry::surface::BSplineSurface;
use truss_geometry::Surface;
use truss_math::Point3;

use crate::grid::Grid;
use crate::params::FitOptions;

/// Offset samples for every strip between adjacent rows, row-major.
///
/// The normal is taken at the grid node `(u(i), v(j))` and applied to the
/// surface point halfway to the next row. The last row opens no strip and
/// contributes nothing, giving `(u_count - 1) * v_count` samples.
pub fn offset_samples<S: Surface + ?Sized>(
    surface: &S,
    grid: &Grid,
    distance: f64,
) -> Result<Vec<Point3>> {
    let mut samples = Vec::with_capacity(grid.strip_rows() * grid.v_count);
    for (i, j) in grid.cells() {
        let (u, v) = (grid.u(i), grid.v(j));
        let normal = surface
            .normal_at(u, v)
            .map_err(|e| e.at_cell(GridStage::Sampling, i, j))?;
        if grid.is_last_row(i) {
            continue;
        }
        let mid = surface.point_at(grid.mid_u(i), v);
        samples.push(mid + normal * distance);
    }
    Ok(samples)
}

/// Interpolate the offset surface through the samples and normalize it.
pub fn fit_offset_surface(
    samples: &[Point3],
    grid: &Grid,
    fit: &FitOptions,
) -> Result<BSplineSurface> {
    let rows = grid.strip_rows();
    let cols = grid.v_count;
    let (degree_u, degree_v) = fit.effective_degrees(rows, cols)?;
    debug!(
        rows,
        cols,
        degree_u,
        degree_v,
        policy = %fit.policy,
        "Fitting offset surface"
    );
    let mut surface = BSplineSurface::through_points(samples, rows, cols, degree_u, degree_v)?;
    surface.normalize_domain()?;
    Ok(surface)
}
