//! The truss grid pipeline.

use tracing::{debug, info};
use truss_core::{Result, Validate};
use truss_geometry::Surface;

use crate::emitter::{base_isocurves, MemberEmitter};
use crate::grid::Grid;
use crate::output::TrussGeometry;
use crate::params::TrussParams;
use crate::sampler::{fit_offset_surface, offset_samples};

/// Generates isocurves and truss diagonals between a surface and its offset.
#[derive(Debug, Clone, Default)]
pub struct TrussGridGenerator {
    params: TrussParams,
}

impl TrussGridGenerator {
    pub fn new(params: TrussParams) -> Self {
        Self { params }
    }

    /// Run the pipeline on `surface`.
    ///
    /// The parameters are validated before the surface is touched. On success
    /// the surface has been reparametrized onto `[0, 1]²`; its shape is
    /// unchanged. Any failure aborts the run without partial output.
    pub fn generate<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<TrussGeometry> {
        let params = &self.params;
        params.validate()?;
        let grid = Grid::new(params.u_count, params.v_count)?;
        info!(
            u_count = grid.u_count,
            v_count = grid.v_count,
            distance = params.distance,
            "Generating truss grid"
        );

        surface.normalize_domain()?;
        debug!(du = grid.du, dv = grid.dv, "Normalized surface domain");

        let samples = offset_samples(&*surface, &grid, params.distance)?;
        let offset = fit_offset_surface(&samples, &grid, &params.fit)?;
        debug!(samples = samples.len(), "Offset surface fitted");

        let (curve_count, line_count) = grid.member_counts();
        let mut curves = Vec::with_capacity(curve_count);
        let mut lines = Vec::with_capacity(line_count);
        base_isocurves(&*surface, &grid, &mut curves)?;
        MemberEmitter::new(&*surface, &offset, grid, params.distance, params.projection)
            .emit(&mut curves, &mut lines)?;

        info!(
            curves = curves.len(),
            lines = lines.len(),
            "Truss grid generated"
        );
        Ok(TrussGeometry::new(curves, lines))
    }
}

/// Generate with default fit and projection settings.
pub fn generate_truss<S: Surface + ?Sized>(
    surface: &mut S,
    u_count: usize,
    v_count: usize,
    distance: f64,
) -> Result<TrussGeometry> {
    TrussGridGenerator::new(TrussParams::new(u_count, v_count, distance)).generate(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use truss_core::TrussError;
    use truss_geometry::surface::PlanarSurface;
    use truss_math::Interval;

    #[test]
    fn test_counts_match_params() {
        let mut plane = PlanarSurface::rectangle(3.0, 2.0);
        let params = TrussParams::new(5, 4, 0.5);
        let geometry = TrussGridGenerator::new(params).generate(&mut plane).unwrap();
        let (curves, lines) = params.expected_counts().unwrap();
        assert_eq!(geometry.curve_count(), curves);
        assert_eq!(geometry.line_count(), lines);
    }

    #[test]
    fn test_invalid_grid_leaves_surface_untouched() {
        let domain = Interval::new(2.0, 5.0);
        let mut plane = PlanarSurface::rectangle(1.0, 1.0).with_domain(domain, domain);
        let err = generate_truss(&mut plane, 1, 4, 1.0).unwrap_err();
        assert!(matches!(err, TrussError::InvalidGrid { u_count: 1, v_count: 4 }));
        assert_eq!(plane.domain_u, domain);
    }

    #[test]
    fn test_overflowing_grid_rejected_before_allocation() {
        let mut plane = PlanarSurface::rectangle(1.0, 1.0);
        let err = generate_truss(&mut plane, usize::MAX / 2, 3, 1.0).unwrap_err();
        assert!(matches!(err, TrussError::InvalidGrid { v_count: 3, .. }));
    }

    #[test]
    fn test_surface_domain_normalized() {
        let mut plane = PlanarSurface::rectangle(1.0, 1.0)
            .with_domain(Interval::new(-3.0, 3.0), Interval::new(10.0, 20.0));
        generate_truss(&mut plane, 5, 5, 1.0).unwrap();
        assert_eq!(plane.domain_u(), Interval::unit());
        assert_eq!(plane.domain_v(), Interval::unit());
    }
}
