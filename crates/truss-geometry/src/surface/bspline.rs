//! B-spline and NURBS surface implementations.

use serde::{Deserialize, Serialize};
use truss_core::{ParamDirection, Result};
use truss_math::{Interval, Point3, Vector3};

use super::{iso_parameter, Surface};
use crate::curve::{AnyCurve, BSplineCurve, NurbsCurve};
use crate::nurbs::interpolate::{interpolate_surface, SurfaceFit};
use crate::nurbs::{blend_control_lines, knot, SurfaceNet};

fn transpose<T: Copy>(grid: &[Vec<T>]) -> Vec<Vec<T>> {
    let cols = grid.first().map_or(0, Vec::len);
    (0..cols)
        .map(|j| grid.iter().map(|row| row[j]).collect())
        .collect()
}

fn reparametrize_knots(
    knots_u: &mut Vec<f64>,
    knots_v: &mut Vec<f64>,
    degrees: (usize, usize),
    direction: ParamDirection,
    domain: Interval,
) -> Result<()> {
    let domain = Interval::try_new(domain.min, domain.max)?;
    match direction {
        ParamDirection::U => *knots_u = knot::reparametrize(degrees.0, knots_u, domain),
        ParamDirection::V => *knots_v = knot::reparametrize(degrees.1, knots_v, domain),
    }
    Ok(())
}

/// A B-spline surface defined by degrees, knot vectors, and a 2D grid of
/// control points.
///
/// `control_points[i][j]` is the control point at row `i` (u-direction) and
/// column `j` (v-direction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BSplineSurface {
    pub degree_u: usize,
    pub degree_v: usize,
    pub knots_u: Vec<f64>,
    pub knots_v: Vec<f64>,
    pub control_points: Vec<Vec<Point3>>,
}

impl BSplineSurface {
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        control_points: Vec<Vec<Point3>>,
    ) -> Self {
        let n_u = control_points.len();
        let n_v = control_points[0].len();
        debug_assert!(
            knots_u.len() == n_u + degree_u + 1,
            "knots_u length mismatch: {} != {} + {} + 1",
            knots_u.len(),
            n_u,
            degree_u
        );
        debug_assert!(
            knots_v.len() == n_v + degree_v + 1,
            "knots_v length mismatch: {} != {} + {} + 1",
            knots_v.len(),
            n_v,
            degree_v
        );
        Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
        }
    }

    /// Clamped surface over `[0, 1]²` with uniform interior knots.
    pub fn clamped(degree_u: usize, degree_v: usize, control_points: Vec<Vec<Point3>>) -> Self {
        let knots_u = knot::clamped_uniform(control_points.len(), degree_u);
        let knots_v = knot::clamped_uniform(control_points[0].len(), degree_v);
        Self::new(degree_u, degree_v, knots_u, knots_v, control_points)
    }

    /// Interpolate a non-periodic surface through a row-major grid of points.
    ///
    /// See [`interpolate_surface`] for the layout of `points`.
    pub fn through_points(
        points: &[Point3],
        rows: usize,
        cols: usize,
        degree_u: usize,
        degree_v: usize,
    ) -> Result<Self> {
        let fit = interpolate_surface(points, rows, cols, degree_u, degree_v)?;
        Ok(Self::from(fit))
    }

    fn net(&self) -> SurfaceNet<'_> {
        SurfaceNet {
            degree_u: self.degree_u,
            degree_v: self.degree_v,
            knots_u: &self.knots_u,
            knots_v: &self.knots_v,
            control_points: &self.control_points,
            weights: None,
        }
    }
}

impl From<SurfaceFit> for BSplineSurface {
    fn from(fit: SurfaceFit) -> Self {
        Self::new(
            fit.degree_u,
            fit.degree_v,
            fit.knots_u,
            fit.knots_v,
            fit.control_points,
        )
    }
}

impl Surface for BSplineSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.net().point(u, v)
    }

    fn derivatives_at(&self, u: f64, v: f64) -> (Vector3, Vector3) {
        let d = self.net().derivatives(u, v, 1);
        (d.du, d.dv)
    }

    fn second_derivatives_at(&self, u: f64, v: f64) -> (Vector3, Vector3, Vector3) {
        let d = self.net().derivatives(u, v, 2);
        (d.duu, d.duv, d.dvv)
    }

    fn domain_u(&self) -> Interval {
        knot::domain(self.degree_u, &self.knots_u)
    }

    fn domain_v(&self) -> Interval {
        knot::domain(self.degree_v, &self.knots_v)
    }

    fn set_domain(&mut self, direction: ParamDirection, domain: Interval) -> Result<()> {
        let degrees = (self.degree_u, self.degree_v);
        reparametrize_knots(&mut self.knots_u, &mut self.knots_v, degrees, direction, domain)
    }

    fn iso_curve(&self, direction: ParamDirection, value: f64) -> Result<AnyCurve> {
        let curve = match direction {
            ParamDirection::U => {
                let v = iso_parameter(self.domain_v(), value)?;
                let rows = &self.control_points;
                let (points, _) = blend_control_lines(self.degree_v, &self.knots_v, rows, None, v);
                BSplineCurve::new(self.degree_u, self.knots_u.clone(), points)
            }
            ParamDirection::V => {
                let u = iso_parameter(self.domain_u(), value)?;
                let columns = transpose(&self.control_points);
                let (points, _) =
                    blend_control_lines(self.degree_u, &self.knots_u, &columns, None, u);
                BSplineCurve::new(self.degree_v, self.knots_v.clone(), points)
            }
        };
        Ok(curve.into())
    }
}

/// A NURBS surface (rational B-spline surface).
///
/// Extends `BSplineSurface` with a 2D grid of weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsSurface {
    pub degree_u: usize,
    pub degree_v: usize,
    pub knots_u: Vec<f64>,
    pub knots_v: Vec<f64>,
    pub control_points: Vec<Vec<Point3>>,
    pub weights: Vec<Vec<f64>>,
}

impl NurbsSurface {
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        control_points: Vec<Vec<Point3>>,
        weights: Vec<Vec<f64>>,
    ) -> Self {
        let n_u = control_points.len();
        let n_v = control_points[0].len();
        debug_assert!(knots_u.len() == n_u + degree_u + 1);
        debug_assert!(knots_v.len() == n_v + degree_v + 1);
        debug_assert!(weights.len() == n_u);
        debug_assert!(weights[0].len() == n_v);
        Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
            weights,
        }
    }

    fn net(&self) -> SurfaceNet<'_> {
        SurfaceNet {
            degree_u: self.degree_u,
            degree_v: self.degree_v,
            knots_u: &self.knots_u,
            knots_v: &self.knots_v,
            control_points: &self.control_points,
            weights: Some(self.weights.as_slice()),
        }
    }
}

impl From<BSplineSurface> for NurbsSurface {
    fn from(s: BSplineSurface) -> Self {
        let weights = s
            .control_points
            .iter()
            .map(|row| vec![1.0; row.len()])
            .collect();
        Self::new(s.degree_u, s.degree_v, s.knots_u, s.knots_v, s.control_points, weights)
    }
}

impl Surface for NurbsSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.net().point(u, v)
    }

    fn derivatives_at(&self, u: f64, v: f64) -> (Vector3, Vector3) {
        let d = self.net().derivatives(u, v, 1);
        (d.du, d.dv)
    }

    fn second_derivatives_at(&self, u: f64, v: f64) -> (Vector3, Vector3, Vector3) {
        let d = self.net().derivatives(u, v, 2);
        (d.duu, d.duv, d.dvv)
    }

    fn domain_u(&self) -> Interval {
        knot::domain(self.degree_u, &self.knots_u)
    }

    fn domain_v(&self) -> Interval {
        knot::domain(self.degree_v, &self.knots_v)
    }

    fn set_domain(&mut self, direction: ParamDirection, domain: Interval) -> Result<()> {
        let degrees = (self.degree_u, self.degree_v);
        reparametrize_knots(&mut self.knots_u, &mut self.knots_v, degrees, direction, domain)
    }

    fn iso_curve(&self, direction: ParamDirection, value: f64) -> Result<AnyCurve> {
        let curve = match direction {
            ParamDirection::U => {
                let v = iso_parameter(self.domain_v(), value)?;
                let (points, weights) = blend_control_lines(
                    self.degree_v,
                    &self.knots_v,
                    &self.control_points,
                    Some(self.weights.as_slice()),
                    v,
                );
                NurbsCurve::new(self.degree_u, self.knots_u.clone(), points, weights)
            }
            ParamDirection::V => {
                let u = iso_parameter(self.domain_u(), value)?;
                let columns = transpose(&self.control_points);
                let column_weights = transpose(&self.weights);
                let (points, weights) = blend_control_lines(
                    self.degree_u,
                    &self.knots_u,
                    &columns,
                    Some(column_weights.as_slice()),
                    u,
                );
                NurbsCurve::new(self.degree_v, self.knots_v.clone(), points, weights)
            }
        };
        Ok(curve.into())
    }
}
