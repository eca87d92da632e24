//! Point and derivative evaluation of (rational) B-spline curves and surfaces.
//!
//! Every routine works in homogeneous form and divides by the weight sum at
//! the end, so polynomial splines are the `weights = None` case.

use truss_math::{DVec3, Point3, Vector3};

use super::knot::{basis_derivatives, find_span};

/// Weight sums below this are left undivided.
const WEIGHT_EPSILON: f64 = 1e-15;

/// Basis derivatives at one parameter, anchored at their first control index.
struct Basis {
    first: usize,
    ders: Vec<Vec<f64>>,
}

impl Basis {
    fn at(degree: usize, knots: &[f64], count: usize, t: f64, order: usize) -> Self {
        let span = find_span(degree, knots, count - 1, t);
        Self {
            first: span - degree,
            ders: basis_derivatives(degree, knots, span, t, order),
        }
    }
}

fn inverse_weight(w: f64) -> f64 {
    if w.abs() < WEIGHT_EPSILON {
        1.0
    } else {
        1.0 / w
    }
}

/// Point of a B-spline curve, rational when `weights` is given.
pub fn curve_point(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    weights: Option<&[f64]>,
    t: f64,
) -> Point3 {
    let basis = Basis::at(degree, knots, control_points.len(), t, 0);
    let mut a = DVec3::ZERO;
    let mut w = 0.0;
    for (offset, b) in basis.ders[0].iter().enumerate() {
        let idx = basis.first + offset;
        let bw = b * weights.map_or(1.0, |ws| ws[idx]);
        a += bw * control_points[idx];
        w += bw;
    }
    a * inverse_weight(w)
}

/// Point and first derivative of a B-spline curve.
pub fn curve_derivative(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    weights: Option<&[f64]>,
    t: f64,
) -> (Point3, Vector3) {
    let basis = Basis::at(degree, knots, control_points.len(), t, 1);
    let (mut a, mut da) = (DVec3::ZERO, DVec3::ZERO);
    let (mut w, mut dw) = (0.0, 0.0);
    for offset in 0..=degree {
        let idx = basis.first + offset;
        let wt = weights.map_or(1.0, |ws| ws[idx]);
        let (b, db) = (basis.ders[0][offset] * wt, basis.ders[1][offset] * wt);
        a += b * control_points[idx];
        da += db * control_points[idx];
        w += b;
        dw += db;
    }
    let inv = inverse_weight(w);
    let point = a * inv;
    (point, (da - dw * point) * inv)
}

/// Point and partial derivatives of a surface, up to second order.
///
/// Fields above the requested order are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceDerivatives {
    pub point: Point3,
    pub du: Vector3,
    pub dv: Vector3,
    pub duu: Vector3,
    pub duv: Vector3,
    pub dvv: Vector3,
}

/// Borrowed view of a tensor-product control net.
///
/// `control_points[i][j]` sits at row `i` (u-direction) and column `j`
/// (v-direction); `weights`, when present, has the same shape.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceNet<'a> {
    pub degree_u: usize,
    pub degree_v: usize,
    pub knots_u: &'a [f64],
    pub knots_v: &'a [f64],
    pub control_points: &'a [Vec<Point3>],
    pub weights: Option<&'a [Vec<f64>]>,
}

impl SurfaceNet<'_> {
    pub fn point(&self, u: f64, v: f64) -> Point3 {
        self.derivatives(u, v, 0).point
    }

    /// Derivatives up to `order` (at most 2).
    pub fn derivatives(&self, u: f64, v: f64, order: usize) -> SurfaceDerivatives {
        let order = order.min(2);
        let rows = self.control_points.len();
        let cols = self.control_points[0].len();
        let bu = Basis::at(self.degree_u, self.knots_u, rows, u, order);
        let bv = Basis::at(self.degree_v, self.knots_v, cols, v, order);

        // Homogeneous mixed partials a[k][l] = d^(k+l) / du^k dv^l, with k + l <= order.
        let mut a = [[DVec3::ZERO; 3]; 3];
        let mut w = [[0.0; 3]; 3];
        for i in 0..=self.degree_u {
            let row = bu.first + i;
            for j in 0..=self.degree_v {
                let col = bv.first + j;
                let cp = self.control_points[row][col];
                let wt = self.weights.map_or(1.0, |ws| ws[row][col]);
                for k in 0..=order {
                    for l in 0..=order - k {
                        let b = bu.ders[k][i] * bv.ders[l][j] * wt;
                        a[k][l] += b * cp;
                        w[k][l] += b;
                    }
                }
            }
        }

        let inv = inverse_weight(w[0][0]);
        let mut out = SurfaceDerivatives {
            point: a[0][0] * inv,
            ..SurfaceDerivatives::default()
        };
        if order >= 1 {
            out.du = (a[1][0] - w[1][0] * out.point) * inv;
            out.dv = (a[0][1] - w[0][1] * out.point) * inv;
        }
        if order >= 2 {
            out.duu = (a[2][0] - 2.0 * w[1][0] * out.du - w[2][0] * out.point) * inv;
            out.duv = (a[1][1] - w[1][0] * out.dv - w[0][1] * out.du - w[1][1] * out.point) * inv;
            out.dvv = (a[0][2] - 2.0 * w[0][1] * out.dv - w[0][2] * out.point) * inv;
        }
        out
    }
}

/// Blend a control net along one direction at a fixed parameter.
///
/// `lines[k]` is a sequence of control points sharing the blended index; the
/// result holds one point per entry of `lines`, weighted by the basis functions
/// of `(degree, knots)` at `t`. Used for isocurve extraction.
pub fn blend_control_lines(
    degree: usize,
    knots: &[f64],
    lines: &[Vec<DVec3>],
    weights: Option<&[Vec<f64>]>,
    t: f64,
) -> (Vec<Point3>, Vec<f64>) {
    let basis = Basis::at(degree, knots, lines[0].len(), t, 0);
    let mut points = Vec::with_capacity(lines.len());
    let mut out_weights = Vec::with_capacity(lines.len());
    for (k, line) in lines.iter().enumerate() {
        let mut pw = DVec3::ZERO;
        let mut w = 0.0;
        for (offset, b) in basis.ders[0].iter().enumerate() {
            let idx = basis.first + offset;
            let wt = weights.map_or(1.0, |ws| ws[k][idx]);
            pw += b * wt * line[idx];
            w += b * wt;
        }
        points.push(pw * inverse_weight(w));
        out_weights.push(w);
    }
    (points, out_weights)
}
