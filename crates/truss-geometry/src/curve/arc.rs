//! Circular arc curve.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use truss_math::{Interval, Point3, Vector3};

use super::Curve;

/// A circular arc.
///
/// The curve parameter `t` runs over `domain` and maps affinely onto the
/// angle range `angle`:
/// `P(t) = center + radius * (cos(a) * x_axis + sin(a) * y_axis)` with
/// `a = domain.remap(t, angle)`. `x_axis` and `y_axis` are orthonormal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point3,
    pub x_axis: Vector3,
    pub y_axis: Vector3,
    pub radius: f64,
    pub angle: Interval,
    pub domain: Interval,
}

impl Arc {
    /// Arc parametrized by the angle itself.
    pub fn new(
        center: Point3,
        x_axis: Vector3,
        y_axis: Vector3,
        radius: f64,
        angle: Interval,
    ) -> Self {
        Self {
            center,
            x_axis: x_axis.normalize(),
            y_axis: y_axis.normalize(),
            radius,
            angle,
            domain: angle,
        }
    }

    /// The same arc with its parameter running over `domain`.
    #[must_use]
    pub fn with_domain(mut self, domain: Interval) -> Self {
        self.domain = domain;
        self
    }

    fn angle_at(&self, t: f64) -> f64 {
        self.domain.remap(t, self.angle)
    }
}

impl Curve for Arc {
    fn point_at(&self, t: f64) -> Point3 {
        let a = self.angle_at(t);
        self.center + self.radius * (a.cos() * self.x_axis + a.sin() * self.y_axis)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        let a = self.angle_at(t);
        let rate = self.angle.length() / self.domain.length();
        self.radius * rate * (-a.sin() * self.x_axis + a.cos() * self.y_axis)
    }

    fn domain(&self) -> (f64, f64) {
        self.domain.as_tuple()
    }

    fn is_closed(&self) -> bool {
        (self.angle.length() - TAU).abs() < 1e-12
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use truss_math::DVec3;

    fn half_circle() -> Arc {
        Arc::new(DVec3::ZERO, DVec3::X, DVec3::Y, 2.0, Interval::new(0.0, PI))
    }

    #[test]
    fn test_arc_points_on_circle() {
        let arc = half_circle();
        for i in 0..=8 {
            let t = i as f64 * PI / 8.0;
            let p = arc.point_at(t);
            assert!((p.length() - 2.0).abs() < 1e-10, "radius off at t={}", t);
            assert!(p.y >= -1e-12);
        }
    }

    #[test]
    fn test_arc_endpoints() {
        let arc = half_circle();
        assert!((arc.start_point() - DVec3::new(2.0, 0.0, 0.0)).length() < 1e-10);
        assert!((arc.end_point() - DVec3::new(-2.0, 0.0, 0.0)).length() < 1e-10);
        assert!(!arc.is_closed());
    }

    #[test]
    fn test_arc_tangent_perpendicular() {
        let arc = half_circle();
        for i in 0..8 {
            let t = i as f64 * PI / 8.0;
            let dot = (arc.point_at(t) - arc.center).dot(arc.tangent_at(t));
            assert!(dot.abs() < 1e-10);
        }
    }

    #[test]
    fn test_unit_domain() {
        let arc = half_circle().with_domain(Interval::unit());
        assert_eq!(arc.domain(), (0.0, 1.0));
        assert!((arc.point_at(0.5) - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-12);
        // Speed scales with the angle swept per unit parameter.
        assert!((arc.tangent_at(0.0) - DVec3::new(0.0, 2.0 * PI, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_full_arc_is_closed() {
        let arc = Arc::new(DVec3::ZERO, DVec3::X, DVec3::Y, 1.0, Interval::new(0.0, TAU));
        assert!(arc.is_closed());
        assert!((arc.start_point() - arc.end_point()).length() < 1e-12);
    }
}
