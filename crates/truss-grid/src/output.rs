//! Generated truss geometry.

use serde::{Deserialize, Serialize};
use truss_geometry::curve::{AnyCurve, Line};
use truss_geometry::tessellate::curve_to_polyline;
use truss_math::{Aabb3, Point3};

/// Curves and truss members from one invocation, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrussGeometry {
    /// Base isocurves, then offset isocurves.
    pub curves: Vec<AnyCurve>,
    /// Diagonals, two per strip: `(pt1, apex)` then `(pt2, apex)`.
    pub lines: Vec<Line>,
}

impl TrussGeometry {
    pub fn new(curves: Vec<AnyCurve>, lines: Vec<Line>) -> Self {
        Self { curves, lines }
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty() && self.lines.is_empty()
    }

    /// Polyline approximation of every curve, in order.
    pub fn curve_polylines(&self, tolerance: f64) -> Vec<Vec<Point3>> {
        self.curves
            .iter()
            .map(|c| curve_to_polyline(c, tolerance))
            .collect()
    }

    /// Box around all line endpoints and curve polyline vertices.
    pub fn bounding_box(&self, tolerance: f64) -> Option<Aabb3> {
        let endpoints = self.lines.iter().flat_map(|l| [l.start, l.end]);
        let vertices = self
            .curves
            .iter()
            .flat_map(|c| curve_to_polyline(c, tolerance));
        Aabb3::from_iter_points(endpoints.chain(vertices))
    }

    /// Drop exact repeats of earlier curves, keeping first occurrences.
    ///
    /// Returns the number of curves removed.
    pub fn dedup_curves(&mut self) -> usize {
        let before = self.curves.len();
        let mut kept: Vec<AnyCurve> = Vec::with_capacity(before);
        for curve in self.curves.drain(..) {
            if !kept.contains(&curve) {
                kept.push(curve);
            }
        }
        self.curves = kept;
        before - self.curves.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truss_math::DVec3;

    fn sample() -> TrussGeometry {
        let a = Line::new(DVec3::ZERO, DVec3::X);
        let b = Line::new(DVec3::ZERO, DVec3::new(0.0, 2.0, -1.0));
        TrussGeometry::new(
            vec![a.into(), b.into(), a.into()],
            vec![Line::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 3.0))],
        )
    }

    #[test]
    fn test_bounding_box_spans_curves_and_lines() {
        let bbox = sample().bounding_box(0.01).unwrap();
        assert!((bbox.min - DVec3::new(-1.0, 0.0, -1.0)).length() < 1e-12);
        assert!((bbox.max - DVec3::new(1.0, 2.0, 3.0)).length() < 1e-12);
        assert!(TrussGeometry::default().bounding_box(0.01).is_none());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut geometry = sample();
        assert_eq!(geometry.dedup_curves(), 1);
        assert_eq!(geometry.curve_count(), 2);
        assert_eq!(geometry.dedup_curves(), 0);
        assert_eq!(geometry.line_count(), 1);
    }

    #[test]
    fn test_polylines_per_curve() {
        let polylines = sample().curve_polylines(0.01);
        assert_eq!(polylines.len(), 3);
        assert!(polylines.iter().all(|p| p.len() >= 2));
    }
}
