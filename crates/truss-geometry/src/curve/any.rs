//! Closed set of curve types produced by surfaces.

use serde::{Deserialize, Serialize};
use truss_math::{Point3, Vector3};

use super::{Arc, BSplineCurve, Curve, Line, NurbsCurve};

/// Any curve a surface can hand out as an isocurve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnyCurve {
    Line(Line),
    Arc(Arc),
    BSpline(BSplineCurve),
    Nurbs(NurbsCurve),
}

impl AnyCurve {
    fn as_curve(&self) -> &dyn Curve {
        match self {
            Self::Line(c) => c,
            Self::Arc(c) => c,
            Self::BSpline(c) => c,
            Self::Nurbs(c) => c,
        }
    }
}

impl Curve for AnyCurve {
    fn point_at(&self, t: f64) -> Point3 {
        self.as_curve().point_at(t)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        self.as_curve().tangent_at(t)
    }

    fn domain(&self) -> (f64, f64) {
        self.as_curve().domain()
    }

    fn is_closed(&self) -> bool {
        self.as_curve().is_closed()
    }
}

impl From<Line> for AnyCurve {
    fn from(c: Line) -> Self {
        Self::Line(c)
    }
}

impl From<Arc> for AnyCurve {
    fn from(c: Arc) -> Self {
        Self::Arc(c)
    }
}

impl From<BSplineCurve> for AnyCurve {
    fn from(c: BSplineCurve) -> Self {
        Self::BSpline(c)
    }
}

impl From<NurbsCurve> for AnyCurve {
    fn from(c: NurbsCurve) -> Self {
        Self::Nurbs(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truss_math::DVec3;

    #[test]
    fn test_delegates_to_inner_curve() {
        let line = Line::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0));
        let any = AnyCurve::from(line);
        assert_eq!(any.domain(), (0.0, 1.0));
        assert!((any.point_at(0.5) - DVec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
        assert_eq!(any, AnyCurve::Line(line));
    }
}
