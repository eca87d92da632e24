//! Polyline conversion of curves for display and fabrication output.

use truss_math::{Point3, Vector3};

use crate::curve::Curve;

/// Maximum recursion depth for adaptive subdivision.
const MAX_DEPTH: u32 = 12;

/// Largest tangent turn (radians) a single segment may span.
const MAX_TURN: f64 = 0.25;

/// Convert a curve to a polyline using adaptive subdivision.
///
/// Segments are split while the tangent turns by more than [`MAX_TURN`]
/// across them, or while the curve midpoint deviates from the chord midpoint
/// by more than `tolerance`.
pub fn curve_to_polyline<C: Curve + ?Sized>(curve: &C, tolerance: f64) -> Vec<Point3> {
    let (t_min, t_max) = curve.domain();
    let mut points = vec![curve.point_at(t_min)];
    subdivide_curve(curve, t_min, t_max, tolerance, &mut points, 0);
    points.dedup_by(|a, b| (*a - *b).length() < tolerance * 1e-3);
    if curve.is_closed() {
        let first = points[0];
        if let Some(last) = points.last_mut() {
            *last = first;
        }
    }
    points
}

/// Angle between two tangents, zero when either vanishes.
fn turn(a: Vector3, b: Vector3) -> f64 {
    if a.length_squared() == 0.0 || b.length_squared() == 0.0 {
        0.0
    } else {
        a.angle_between(b)
    }
}

fn subdivide_curve<C: Curve + ?Sized>(
    curve: &C,
    t0: f64,
    t1: f64,
    tolerance: f64,
    points: &mut Vec<Point3>,
    depth: u32,
) {
    let p1 = curve.point_at(t1);
    if depth >= MAX_DEPTH {
        points.push(p1);
        return;
    }

    let t_mid = (t0 + t1) * 0.5;
    let p0 = curve.point_at(t0);
    let p_mid = curve.point_at(t_mid);

    let deviation = (p_mid - (p0 + p1) * 0.5).length();
    let (d0, d_mid, d1) = (curve.tangent_at(t0), curve.tangent_at(t_mid), curve.tangent_at(t1));
    let bend = turn(d0, d_mid).max(turn(d_mid, d1));
    if deviation > tolerance || bend > MAX_TURN {
        subdivide_curve(curve, t0, t_mid, tolerance, points, depth + 1);
        subdivide_curve(curve, t_mid, t1, tolerance, points, depth + 1);
    } else {
        points.push(p1);
    }
}
