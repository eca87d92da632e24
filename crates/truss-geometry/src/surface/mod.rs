//! Surface traits and implementations.

mod bspline;
mod cylindrical;
mod planar;
mod project;

use truss_core::{ParamDirection, Result, TrussError};
use truss_math::{Interval, Point3, Vector3};

use crate::curve::AnyCurve;

pub use bspline::{BSplineSurface, NurbsSurface};
pub use cylindrical::CylindricalSurface;
pub use planar::PlanarSurface;
pub use project::{closest_parameters, ProjectionOptions};

/// Cross products shorter than this are treated as a vanishing normal.
const NORMAL_EPSILON: f64 = 1e-15;

/// Relative step for finite-difference second derivatives.
const DIFFERENCE_STEP: f64 = 1e-5;

/// Clamped central-difference stencil `(lo, hi)` around `t`.
fn stencil(domain: Interval, t: f64) -> (f64, f64) {
    let h = DIFFERENCE_STEP * domain.length();
    (domain.clamp(t - h), domain.clamp(t + h))
}

fn difference(a: Vector3, b: Vector3, lo: f64, hi: f64) -> Vector3 {
    if hi > lo {
        (b - a) / (hi - lo)
    } else {
        Vector3::ZERO
    }
}

/// Trait for parametric surfaces in 3D space.
///
/// `ParamDirection::U` names the first parameter, `ParamDirection::V` the second.
pub trait Surface: Send + Sync {
    /// Evaluate the surface at parameters `(u, v)`.
    fn point_at(&self, u: f64, v: f64) -> Point3;

    /// First partial derivatives `(dP/du, dP/dv)` at `(u, v)`.
    fn derivatives_at(&self, u: f64, v: f64) -> (Vector3, Vector3);

    /// Second partial derivatives `(d2P/du2, d2P/dudv, d2P/dv2)` at `(u, v)`.
    ///
    /// The default differences `derivatives_at` inside the domain.
    fn second_derivatives_at(&self, u: f64, v: f64) -> (Vector3, Vector3, Vector3) {
        let (u0, u1) = stencil(self.domain_u(), u);
        let (v0, v1) = stencil(self.domain_v(), v);
        let (du_lo, dv_lo) = self.derivatives_at(u0, v);
        let (du_hi, dv_hi) = self.derivatives_at(u1, v);
        let (_, dv_below) = self.derivatives_at(u, v0);
        let (_, dv_above) = self.derivatives_at(u, v1);
        (
            difference(du_lo, du_hi, u0, u1),
            difference(dv_lo, dv_hi, u0, u1),
            difference(dv_below, dv_above, v0, v1),
        )
    }

    /// Unit normal at `(u, v)`, oriented along `dP/du x dP/dv`.
    fn normal_at(&self, u: f64, v: f64) -> Result<Vector3> {
        let (du, dv) = self.derivatives_at(u, v);
        let n = du.cross(dv);
        let len = n.length();
        if !len.is_finite() || len < NORMAL_EPSILON {
            return Err(TrussError::DegenerateNormal { u, v });
        }
        Ok(n / len)
    }

    /// The u-parameter domain.
    fn domain_u(&self) -> Interval;

    /// The v-parameter domain.
    fn domain_v(&self) -> Interval;

    fn domain(&self, direction: ParamDirection) -> Interval {
        match direction {
            ParamDirection::U => self.domain_u(),
            ParamDirection::V => self.domain_v(),
        }
    }

    /// Reassign the domain of one direction without changing the shape.
    fn set_domain(&mut self, direction: ParamDirection, domain: Interval) -> Result<()> {
        let _ = domain;
        Err(TrussError::UnsupportedOperation(format!(
            "surface does not support reassigning its {direction} domain"
        )))
    }

    /// Reparametrize both directions onto `[0, 1]`.
    fn normalize_domain(&mut self) -> Result<()> {
        self.set_domain(ParamDirection::U, Interval::unit())?;
        self.set_domain(ParamDirection::V, Interval::unit())
    }

    /// Extract the isocurve running along `direction` with the other parameter
    /// held at `value`.
    ///
    /// `iso_curve(ParamDirection::U, v)` varies `u` at fixed `v`.
    fn iso_curve(&self, direction: ParamDirection, value: f64) -> Result<AnyCurve>;

    /// Parameters `(u, v)` of the surface point nearest to `point`.
    fn closest_point(&self, point: Point3, options: &ProjectionOptions) -> Result<(f64, f64)> {
        closest_parameters(self, point, options)
    }
}

/// Validate the fixed parameter of an isocurve and clamp round-off overshoot.
pub(crate) fn iso_parameter(domain: Interval, value: f64) -> Result<f64> {
    let slack = 1e-9 * domain.length().max(1.0);
    if !value.is_finite() || value < domain.min - slack || value > domain.max + slack {
        return Err(TrussError::InvalidParameter(format!(
            "isocurve parameter {value} outside domain [{}, {}]",
            domain.min, domain.max
        )));
    }
    Ok(domain.clamp(value))
}
