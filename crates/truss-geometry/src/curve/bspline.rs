//! B-spline and NURBS curve implementations.

use serde::{Deserialize, Serialize};
use truss_math::{Point3, Vector3};

use super::Curve;
use crate::nurbs::{eval, knot};

/// A B-spline curve defined by degree, knot vector, and control points.
///
/// Isocurves of B-spline surfaces come out as this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BSplineCurve {
    pub degree: usize,
    pub knots: Vec<f64>,
    pub control_points: Vec<Point3>,
}

impl BSplineCurve {
    pub fn new(degree: usize, knots: Vec<f64>, control_points: Vec<Point3>) -> Self {
        debug_assert!(
            knots.len() == control_points.len() + degree + 1,
            "Knot vector length must be n + p + 1, got {} knots for {} CPs with degree {}",
            knots.len(),
            control_points.len(),
            degree
        );
        Self {
            degree,
            knots,
            control_points,
        }
    }
}

impl Curve for BSplineCurve {
    fn point_at(&self, t: f64) -> Point3 {
        eval::curve_point(self.degree, &self.knots, &self.control_points, None, t)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        eval::curve_derivative(self.degree, &self.knots, &self.control_points, None, t).1
    }

    fn domain(&self) -> (f64, f64) {
        knot::domain(self.degree, &self.knots).as_tuple()
    }
}

/// A NURBS (Non-Uniform Rational B-Spline) curve.
///
/// Isocurves of NURBS surfaces come out as this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsCurve {
    pub degree: usize,
    pub knots: Vec<f64>,
    pub control_points: Vec<Point3>,
    pub weights: Vec<f64>,
}

impl NurbsCurve {
    pub fn new(
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<Point3>,
        weights: Vec<f64>,
    ) -> Self {
        debug_assert!(
            knots.len() == control_points.len() + degree + 1,
            "Knot vector length must be n + p + 1"
        );
        debug_assert!(
            control_points.len() == weights.len(),
            "Must have same number of weights as control points"
        );
        Self {
            degree,
            knots,
            control_points,
            weights,
        }
    }
}

impl Curve for NurbsCurve {
    fn point_at(&self, t: f64) -> Point3 {
        eval::curve_point(
            self.degree,
            &self.knots,
            &self.control_points,
            Some(self.weights.as_slice()),
            t,
        )
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        eval::curve_derivative(
            self.degree,
            &self.knots,
            &self.control_points,
            Some(self.weights.as_slice()),
            t,
        )
        .1
    }

    fn domain(&self) -> (f64, f64) {
        knot::domain(self.degree, &self.knots).as_tuple()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truss_math::DVec3;

    fn clamped(degree: usize, control_points: Vec<Point3>) -> BSplineCurve {
        let knots = knot::clamped_uniform(control_points.len(), degree);
        BSplineCurve::new(degree, knots, control_points)
    }

    #[test]
    fn test_clamped_curve_endpoints() {
        let curve = clamped(
            3,
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 2.0, 0.0),
                DVec3::new(3.0, 2.0, 0.0),
                DVec3::new(4.0, 0.0, 1.0),
                DVec3::new(5.0, -1.0, 1.0),
            ],
        );
        assert_eq!(curve.domain(), (0.0, 1.0));
        assert!((curve.start_point() - DVec3::ZERO).length() < 1e-12);
        assert!((curve.end_point() - DVec3::new(5.0, -1.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_nurbs_circle_quadrant() {
        let w = 1.0_f64 / 2.0_f64.sqrt();
        let curve = NurbsCurve::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![1.0, w, 1.0],
        );
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let p = curve.point_at(t);
            assert!((p.length() - 1.0).abs() < 1e-10);
            assert!(p.dot(curve.tangent_at(t)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_tangent_direction() {
        let curve = clamped(1, vec![DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0)]);
        let t = curve.tangent_at(0.5);
        assert!((t - DVec3::new(2.0, 0.0, 0.0)).length() < 1e-10);
    }
}
