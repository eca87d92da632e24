//! Curve traits and implementations.

mod any;
mod arc;
mod bspline;
mod line;

use truss_math::{Point3, Vector3};

pub use any::AnyCurve;
pub use arc::Arc;
pub use bspline::{BSplineCurve, NurbsCurve};
pub use line::Line;

/// Trait for parametric curves in 3D space.
pub trait Curve: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point3;

    /// Evaluate the tangent vector at parameter `t`.
    fn tangent_at(&self, t: f64) -> Vector3;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Whether the curve is closed (start == end).
    fn is_closed(&self) -> bool {
        false
    }

    fn start_point(&self) -> Point3 {
        self.point_at(self.domain().0)
    }

    fn end_point(&self) -> Point3 {
        self.point_at(self.domain().1)
    }
}
