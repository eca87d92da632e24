//! Planar surface.

use serde::{Deserialize, Serialize};
use truss_core::{ParamDirection, Result, TrussError};
use truss_math::{DVec3, Interval, Point3, Vector3};

use super::{iso_parameter, ProjectionOptions, Surface};
use crate::curve::{AnyCurve, Line};

/// A bounded planar patch (parallelogram).
///
/// Points are `origin + s * u_axis + t * v_axis` where `s` and `t` are the
/// parameters rescaled from `domain_u`/`domain_v` onto `[0, 1]`. The axes are
/// the full edge vectors of the patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarSurface {
    pub origin: Point3,
    pub u_axis: Vector3,
    pub v_axis: Vector3,
    pub domain_u: Interval,
    pub domain_v: Interval,
}

impl PlanarSurface {
    pub fn new(origin: Point3, u_axis: Vector3, v_axis: Vector3) -> Self {
        Self {
            origin,
            u_axis,
            v_axis,
            domain_u: Interval::unit(),
            domain_v: Interval::unit(),
        }
    }

    /// Axis-aligned rectangle in the XY plane with its corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(DVec3::ZERO, DVec3::new(width, 0.0, 0.0), DVec3::new(0.0, height, 0.0))
    }

    /// The same patch with an explicit parameter domain.
    pub fn with_domain(mut self, domain_u: Interval, domain_v: Interval) -> Self {
        self.domain_u = domain_u;
        self.domain_v = domain_v;
        self
    }

    fn local(&self, u: f64, v: f64) -> (f64, f64) {
        (
            self.domain_u.normalized_parameter(u),
            self.domain_v.normalized_parameter(v),
        )
    }
}

impl Surface for PlanarSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let (s, t) = self.local(u, v);
        self.origin + s * self.u_axis + t * self.v_axis
    }

    fn derivatives_at(&self, _u: f64, _v: f64) -> (Vector3, Vector3) {
        (
            self.u_axis / self.domain_u.length(),
            self.v_axis / self.domain_v.length(),
        )
    }

    fn second_derivatives_at(&self, _u: f64, _v: f64) -> (Vector3, Vector3, Vector3) {
        (Vector3::ZERO, Vector3::ZERO, Vector3::ZERO)
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
        let line = match direction {
            ParamDirection::U => {
                let v = iso_parameter(self.domain_v, value)?;
                Line::new(
                    self.point_at(self.domain_u.min, v),
                    self.point_at(self.domain_u.max, v),
                )
            }
            ParamDirection::V => {
                let u = iso_parameter(self.domain_u, value)?;
                Line::new(
                    self.point_at(u, self.domain_v.min),
                    self.point_at(u, self.domain_v.max),
                )
            }
        };
        Ok(line.into())
    }

    /// Exact projection: least-squares solve in the patch frame, then clamp.
    fn closest_point(&self, point: Point3, _options: &ProjectionOptions) -> Result<(f64, f64)> {
        if !point.is_finite() {
            return Err(TrussError::ProjectionFailed {
                x: point.x,
                y: point.y,
                z: point.z,
            });
        }
        let d = point - self.origin;
        let a11 = self.u_axis.dot(self.u_axis);
        let a12 = self.u_axis.dot(self.v_axis);
        let a22 = self.v_axis.dot(self.v_axis);
        let det = a11 * a22 - a12 * a12;
        if det.abs() < 1e-30 {
            return Err(TrussError::DegenerateNormal {
                u: self.domain_u.min,
                v: self.domain_v.min,
            });
        }
        let b1 = self.u_axis.dot(d);
        let b2 = self.v_axis.dot(d);
        let s = ((a22 * b1 - a12 * b2) / det).clamp(0.0, 1.0);
        let t = ((a11 * b2 - a12 * b1) / det).clamp(0.0, 1.0);
        Ok((self.domain_u.parameter_at(s), self.domain_v.parameter_at(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;

    #[test]
    fn test_planar_point() {
        let plane = PlanarSurface::rectangle(4.0, 2.0);
        let p = plane.point_at(0.5, 0.5);
        assert!((p - DVec3::new(2.0, 1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_planar_normal() {
        let plane = PlanarSurface::rectangle(4.0, 2.0);
        let n = plane.normal_at(0.3, 0.9).unwrap();
        assert!((n - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_normalize_domain_keeps_shape() {
        let mut plane = PlanarSurface::rectangle(4.0, 2.0)
            .with_domain(Interval::new(-10.0, 10.0), Interval::new(5.0, 7.0));
        let before = plane.point_at(0.0, 6.0);
        plane.normalize_domain().unwrap();
        assert_eq!(plane.domain_u(), Interval::unit());
        assert!((plane.point_at(0.5, 0.5) - before).length() < 1e-12);
    }

    #[test]
    fn test_set_domain_rejects_reversed() {
        let mut plane = PlanarSurface::rectangle(1.0, 1.0);
        let err = plane
            .set_domain(ParamDirection::U, Interval::new(1.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, TrussError::InvalidDomain(_)));
    }

    #[test]
    fn test_iso_curves() {
        let plane = PlanarSurface::rectangle(4.0, 2.0);
        let along_u = plane.iso_curve(ParamDirection::U, 0.5).unwrap();
        assert!((along_u.start_point() - DVec3::new(0.0, 1.0, 0.0)).length() < 1e-12);
        assert!((along_u.end_point() - DVec3::new(4.0, 1.0, 0.0)).length() < 1e-12);

        let along_v = plane.iso_curve(ParamDirection::V, 0.25).unwrap();
        assert!((along_v.start_point() - DVec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
        assert!((along_v.end_point() - DVec3::new(1.0, 2.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_exact_projection() {
        let plane = PlanarSurface::rectangle(4.0, 2.0);
        let opts = ProjectionOptions::default();
        let (u, v) = plane.closest_point(DVec3::new(1.0, 1.5, 3.0), &opts).unwrap();
        assert!((u - 0.25).abs() < 1e-12);
        assert!((v - 0.75).abs() < 1e-12);

        let (u, v) = plane.closest_point(DVec3::new(9.0, -1.0, 0.0), &opts).unwrap();
        assert_eq!((u, v), (1.0, 0.0));
    }
}
