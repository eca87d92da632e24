//! Generation parameters.

use serde::{Deserialize, Serialize};
use truss_core::{ParamDirection, Result, TrussError, Validate};
use truss_geometry::ProjectionOptions;

use crate::grid::Grid;

/// What to do when the offset samples are too few for the requested degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DegreePolicy {
    /// Fail with `InsufficientSamples`.
    #[default]
    Strict,
    /// Lower the degree to `samples - 1` in the short direction.
    ///
    /// At least two samples per direction are still required.
    Reduce,
}

impl std::fmt::Display for DegreePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Reduce => write!(f, "reduce"),
        }
    }
}

/// Offset surface fit settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitOptions {
    pub degree_u: usize,
    pub degree_v: usize,
    pub policy: DegreePolicy,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            degree_u: 3,
            degree_v: 3,
            policy: DegreePolicy::Strict,
        }
    }
}

impl FitOptions {
    /// Fit with the given degrees under the strict policy.
    pub fn with_degrees(degree_u: usize, degree_v: usize) -> Self {
        Self {
            degree_u,
            degree_v,
            ..Self::default()
        }
    }

    /// The degrees to fit a `rows x cols` sample grid with.
    ///
    /// # Errors
    ///
    /// `InsufficientSamples` for the first direction (u before v) that cannot
    /// carry its degree under the policy.
    pub fn effective_degrees(&self, rows: usize, cols: usize) -> Result<(usize, usize)> {
        let degree_u = self.resolve(ParamDirection::U, rows, self.degree_u)?;
        let degree_v = self.resolve(ParamDirection::V, cols, self.degree_v)?;
        Ok((degree_u, degree_v))
    }

    fn resolve(&self, direction: ParamDirection, samples: usize, degree: usize) -> Result<usize> {
        if samples > degree {
            return Ok(degree);
        }
        match self.policy {
            DegreePolicy::Reduce if samples >= 2 => Ok(samples - 1),
            _ => Err(TrussError::InsufficientSamples {
                direction,
                samples,
                degree,
            }),
        }
    }
}

impl Validate for FitOptions {
    fn validate(&self) -> Result<()> {
        if self.degree_u == 0 || self.degree_v == 0 {
            return Err(TrussError::InvalidParameter(format!(
                "fit degree must be at least 1, got ({}, {})",
                self.degree_u, self.degree_v
            )));
        }
        Ok(())
    }
}

/// The four host inputs (minus the surface) plus fit and projection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrussParams {
    /// Grid samples along u (at least 2).
    pub u_count: usize,
    /// Grid samples along v (at least 2).
    pub v_count: usize,
    /// Signed offset along the surface normal.
    pub distance: f64,
    pub fit: FitOptions,
    pub projection: ProjectionOptions,
}

impl Default for TrussParams {
    fn default() -> Self {
        Self {
            u_count: 5,
            v_count: 5,
            distance: 1.0,
            fit: FitOptions::default(),
            projection: ProjectionOptions::default(),
        }
    }
}

impl TrussParams {
    pub fn new(u_count: usize, v_count: usize, distance: f64) -> Self {
        Self {
            u_count,
            v_count,
            distance,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fit(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionOptions) -> Self {
        self.projection = projection;
        self
    }

    /// Number of curves and lines these parameters produce, as
    /// `(curve_count, line_count)`.
    ///
    /// # Errors
    ///
    /// `InvalidGrid` when the counts do not form a valid grid.
    pub fn expected_counts(&self) -> Result<(usize, usize)> {
        Grid::new(self.u_count, self.v_count).map(|grid| grid.member_counts())
    }
}

impl Validate for TrussParams {
    fn validate(&self) -> Result<()> {
        Grid::new(self.u_count, self.v_count)?;
        if !self.distance.is_finite() {
            return Err(TrussError::InvalidParameter(format!(
                "offset distance must be finite, got {}",
                self.distance
            )));
        }
        self.fit.validate()?;
        self.projection.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts_below_two_rejected() {
        for (u, v) in [(1, 4), (4, 1), (0, 0), (usize::MAX, 3)] {
            let err = TrussParams::new(u, v, 1.0).validate().unwrap_err();
            assert!(matches!(err, TrussError::InvalidGrid { .. }), "({u}, {v})");
        }
        assert!(TrussParams::new(2, 2, 1.0).validate().is_ok());
    }

    #[test]
    fn test_non_finite_distance_rejected() {
        let err = TrussParams::new(4, 4, f64::NAN).validate().unwrap_err();
        assert!(matches!(err, TrussError::InvalidParameter(_)));
    }

    #[test]
    fn test_projection_options_validated() {
        let projection = ProjectionOptions {
            grid_samples: 0,
            ..ProjectionOptions::default()
        };
        let params = TrussParams::new(5, 5, 1.0).with_projection(projection);
        assert!(matches!(params.validate(), Err(TrussError::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_degree_rejected() {
        let params = TrussParams::new(5, 5, 1.0).with_fit(FitOptions::with_degrees(0, 3));
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_expected_counts() {
        assert_eq!(TrussParams::new(6, 5, 1.0).expected_counts().unwrap(), (115, 50));
        assert!(TrussParams::new(1, 5, 1.0).expected_counts().is_err());
    }

    #[test]
    fn test_effective_degrees_strict() {
        let fit = FitOptions::default();
        assert_eq!(fit.effective_degrees(4, 7).unwrap(), (3, 3));
        let err = fit.effective_degrees(3, 7).unwrap_err();
        assert!(matches!(
            err,
            TrussError::InsufficientSamples {
                direction: ParamDirection::U,
                samples: 3,
                degree: 3
            }
        ));
    }

    #[test]
    fn test_effective_degrees_reduce() {
        let fit = FitOptions {
            policy: DegreePolicy::Reduce,
            ..FitOptions::default()
        };
        assert_eq!(fit.effective_degrees(3, 2).unwrap(), (2, 1));
        let err = fit.effective_degrees(1, 5).unwrap_err();
        assert!(matches!(err, TrussError::InsufficientSamples { samples: 1, .. }));
    }
}
