//! Nearest-point projection onto parametric surfaces.
//!
//! A coarse parameter grid seeds a Newton iteration on the squared distance.
//! Where the Hessian is not positive definite the step falls back to
//! Gauss-Newton. A parameter sitting on a domain bound whose gradient points
//! outward is pinned and the other one is solved on its own.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use truss_core::{Result, Tolerance, TrussError, Validate};
use truss_math::{Interval, Point3, Vector3};

use super::Surface;

/// Step halvings tried before declaring a local minimum.
const MAX_HALVINGS: usize = 12;

/// Pivots below this are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-30;

/// Settings for [`closest_parameters`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOptions {
    /// Divisions per direction of the seeding grid.
    pub grid_samples: usize,
    /// Refinement iterations before giving up.
    pub max_iterations: usize,
    pub tolerance: Tolerance,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            grid_samples: 20,
            max_iterations: 100,
            tolerance: Tolerance::default(),
        }
    }
}

impl Validate for ProjectionOptions {
    fn validate(&self) -> Result<()> {
        if self.grid_samples == 0 {
            return Err(TrussError::InvalidParameter(
                "projection grid_samples must be at least 1".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(TrussError::InvalidParameter(
                "projection max_iterations must be at least 1".to_string(),
            ));
        }
        self.tolerance.validate()
    }
}

/// Symmetric 2x2 system `[a11 a12; a12 a22]`.
#[derive(Debug, Clone, Copy)]
struct Hessian {
    a11: f64,
    a12: f64,
    a22: f64,
}

impl Hessian {
    /// Solve `H * step = -gradient` restricted to the free parameters.
    ///
    /// `None` when the restricted system is not positive definite.
    fn descent(self, gradient: (f64, f64), free: (bool, bool)) -> Option<(f64, f64)> {
        let (g1, g2) = gradient;
        match free {
            (true, true) => {
                let det = self.a11 * self.a22 - self.a12 * self.a12;
                if !(self.a11 > SINGULAR_EPSILON && det > SINGULAR_EPSILON) {
                    return None;
                }
                Some((
                    (self.a12 * g2 - self.a22 * g1) / det,
                    (self.a12 * g1 - self.a11 * g2) / det,
                ))
            }
            (true, false) => (self.a11 > SINGULAR_EPSILON).then(|| (-g1 / self.a11, 0.0)),
            (false, true) => (self.a22 > SINGULAR_EPSILON).then(|| (0.0, -g2 / self.a22)),
            (false, false) => Some((0.0, 0.0)),
        }
    }
}

/// Outcome of one refinement step.
enum Step {
    Converged,
    Moved { u: f64, v: f64, dist2: f64 },
}

struct Refiner<'a, S: ?Sized> {
    surface: &'a S,
    point: Point3,
    dom_u: Interval,
    dom_v: Interval,
    tol: Tolerance,
}

impl<S: Surface + ?Sized> Refiner<'_, S> {
    fn dist2(&self, u: f64, v: f64) -> f64 {
        (self.surface.point_at(u, v) - self.point).length_squared()
    }

    /// A free parameter is stationary when its derivative is within angular
    /// tolerance of perpendicular to the residual.
    fn stationary(&self, gradient: f64, tangent: Vector3, residual: f64) -> bool {
        let scale = tangent.length() * residual;
        scale <= 0.0 || self.tol.is_perpendicular(gradient / scale)
    }

    fn step(&self, u: f64, v: f64, best: f64) -> Step {
        let diff = self.surface.point_at(u, v) - self.point;
        let residual = diff.length();
        if self.tol.is_zero(residual) {
            return Step::Converged;
        }

        let (su, sv) = self.surface.derivatives_at(u, v);
        let gradient = (su.dot(diff), sv.dot(diff));

        let pinned_u = (u <= self.dom_u.min && gradient.0 > 0.0)
            || (u >= self.dom_u.max && gradient.0 < 0.0);
        let pinned_v = (v <= self.dom_v.min && gradient.1 > 0.0)
            || (v >= self.dom_v.max && gradient.1 < 0.0);
        let free_u = !pinned_u && !self.stationary(gradient.0, su, residual);
        let free_v = !pinned_v && !self.stationary(gradient.1, sv, residual);
        if !free_u && !free_v {
            return Step::Converged;
        }

        // Keep stationary parameters in the solve; only pinned ones are frozen.
        let free = (!pinned_u, !pinned_v);
        let gauss = Hessian {
            a11: su.dot(su),
            a12: su.dot(sv),
            a22: sv.dot(sv),
        };
        let (suu, suv, svv) = self.surface.second_derivatives_at(u, v);
        let newton = Hessian {
            a11: gauss.a11 + diff.dot(suu),
            a12: gauss.a12 + diff.dot(suv),
            a22: gauss.a22 + diff.dot(svv),
        };
        let solve = |free: (bool, bool)| {
            newton
                .descent(gradient, free)
                .or_else(|| gauss.descent(gradient, free))
                .or_else(|| Hessian { a12: 0.0, ..gauss }.descent(gradient, free))
        };
        let Some((mut step_u, mut step_v)) = solve(free) else {
            return Step::Converged;
        };

        // A coupled step may still push a parameter out through its bound.
        let out_u = (u <= self.dom_u.min && step_u < 0.0) || (u >= self.dom_u.max && step_u > 0.0);
        let out_v = (v <= self.dom_v.min && step_v < 0.0) || (v >= self.dom_v.max && step_v > 0.0);
        if out_u || out_v {
            let Some(step) = solve((free.0 && !out_u, free.1 && !out_v)) else {
                return Step::Converged;
            };
            (step_u, step_v) = step;
        }

        // Never accept a step that moves away from the point.
        let mut scale = 1.0;
        for _ in 0..MAX_HALVINGS {
            let nu = self.dom_u.clamp(u + scale * step_u);
            let nv = self.dom_v.clamp(v + scale * step_v);
            let d = self.dist2(nu, nv);
            if d <= best {
                return Step::Moved { u: nu, v: nv, dist2: d };
            }
            scale *= 0.5;
        }
        Step::Converged
    }
}

/// Find the parameters `(u, v)` of the point on `surface` closest to `point`.
///
/// # Errors
///
/// `ProjectionFailed` when the query point or the iteration becomes non-finite,
/// or when the iteration does not settle within `max_iterations`.
pub fn closest_parameters<S: Surface + ?Sized>(
    surface: &S,
    point: Point3,
    options: &ProjectionOptions,
) -> Result<(f64, f64)> {
    let failed = || TrussError::ProjectionFailed {
        x: point.x,
        y: point.y,
        z: point.z,
    };
    if !point.is_finite() {
        return Err(failed());
    }

    let refiner = Refiner {
        surface,
        point,
        dom_u: surface.domain_u(),
        dom_v: surface.domain_v(),
        tol: options.tolerance,
    };
    let (dom_u, dom_v) = (refiner.dom_u, refiner.dom_v);

    // Coarse grid search
    let n = options.grid_samples.max(1);
    let mut u = dom_u.min;
    let mut v = dom_v.min;
    let mut best = f64::INFINITY;
    for i in 0..=n {
        let cu = dom_u.parameter_at(i as f64 / n as f64);
        for j in 0..=n {
            let cv = dom_v.parameter_at(j as f64 / n as f64);
            let d = refiner.dist2(cu, cv);
            if d < best {
                best = d;
                u = cu;
                v = cv;
            }
        }
    }
    if !best.is_finite() {
        debug!("projection seed is non-finite for {:?}", point);
        return Err(failed());
    }

    let mut converged = false;
    let mut iterations = 0;
    while iterations < options.max_iterations {
        iterations += 1;
        let (nu, nv, d) = match refiner.step(u, v, best) {
            Step::Converged => {
                converged = true;
                break;
            }
            Step::Moved { u, v, dist2 } => (u, v, dist2),
        };

        let moved = ((nu - u) / dom_u.length())
            .abs()
            .max(((nv - v) / dom_v.length()).abs());
        u = nu;
        v = nv;
        best = d;

        if !moved.is_finite() {
            break;
        }
        if options.tolerance.is_converged(moved) {
            converged = true;
            break;
        }
    }

    if !converged || !u.is_finite() || !v.is_finite() {
        debug!(
            "projection of {:?} did not converge after {} iterations",
            point, iterations
        );
        return Err(failed());
    }

    trace!(
        "projected {:?} to ({}, {}) in {} iterations, distance {}",
        point,
        u,
        v,
        iterations,
        best.sqrt()
    );
    Ok((u, v))
}
