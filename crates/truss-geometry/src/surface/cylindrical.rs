//! Cylindrical surface patch.

use serde::{Deserialize, Serialize};
use truss_core::{ParamDirection, Result};
use truss_math::{DVec3, Interval, Point3, Vector3};

use super::{iso_parameter, Surface};
use crate::curve::{AnyCurve, Arc, Line};

/// A bounded cylindrical patch.
///
/// Native parameters are the angle `theta` in `angle` and the height `h` in
/// `height`:
/// `P(theta, h) = origin + radius * (cos(theta) * x_axis + sin(theta) * y_axis) + h * axis`.
/// `domain_u`/`domain_v` map affinely onto `angle`/`height` and start out equal
/// to them. The normal points away from the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylindricalSurface {
    pub origin: Point3,
    pub axis: Vector3,
    pub x_axis: Vector3,
    pub y_axis: Vector3,
    pub radius: f64,
    pub angle: Interval,
    pub height: Interval,
    pub domain_u: Interval,
    pub domain_v: Interval,
}

impl CylindricalSurface {
    pub fn new(
        origin: Point3,
        axis: Vector3,
        radius: f64,
        angle: Interval,
        height: Interval,
    ) -> Self {
        let axis = axis.normalize();
        let ref_vec = if axis.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
        let x_axis = axis.cross(ref_vec).normalize();
        let y_axis = axis.cross(x_axis).normalize();
        Self {
            origin,
            axis,
            x_axis,
            y_axis,
            radius,
            angle,
            height,
            domain_u: angle,
            domain_v: height,
        }
    }

    fn theta(&self, u: f64) -> f64 {
        self.domain_u.remap(u, self.angle)
    }

    fn h(&self, v: f64) -> f64 {
        self.domain_v.remap(v, self.height)
    }

    fn radial(&self, theta: f64) -> Vector3 {
        theta.cos() * self.x_axis + theta.sin() * self.y_axis
    }
}

impl Surface for CylindricalSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.origin + self.radius * self.radial(self.theta(u)) + self.h(v) * self.axis
    }

    fn derivatives_at(&self, u: f64, _v: f64) -> (Vector3, Vector3) {
        let theta = self.theta(u);
        let dtheta = self.angle.length() / self.domain_u.length();
        let dh = self.height.length() / self.domain_v.length();
        let tangent = -theta.sin() * self.x_axis + theta.cos() * self.y_axis;
        (self.radius * dtheta * tangent, dh * self.axis)
    }

    fn second_derivatives_at(&self, u: f64, _v: f64) -> (Vector3, Vector3, Vector3) {
        let dtheta = self.angle.length() / self.domain_u.length();
        let duu = -self.radius * dtheta * dtheta * self.radial(self.theta(u));
        (duu, Vector3::ZERO, Vector3::ZERO)
    }

    fn domain_u(&self) -> Interval {
        self.domain_u
    }

    fn domain_v(&self) -> Interval {
        self.domain_v
    }

    fn set_domain(&mut self, direction: ParamDirection, domain: Interval) -> Result<()> {
        let domain = Interval::try_new(domain.min, domain.max)?;
        match direction {
            ParamDirection::U => self.domain_u = domain,
            ParamDirection::V => self.domain_v = domain,
        }
        Ok(())
    }

    fn iso_curve(&self, direction: ParamDirection, value: f64) -> Result<AnyCurve> {
        match direction {
            ParamDirection::U => {
                let v = iso_parameter(self.domain_v, value)?;
                let center = self.origin + self.h(v) * self.axis;
                let ring = Arc::new(center, self.x_axis, self.y_axis, self.radius, self.angle);
                Ok(ring.with_domain(self.domain_u).into())
            }
            ParamDirection::V => {
                let u = iso_parameter(self.domain_u, value)?;
                Ok(Line::new(
                    self.point_at(u, self.domain_v.min),
                    self.point_at(u, self.domain_v.max),
                )
                .into())
            }
        }
    }
}
