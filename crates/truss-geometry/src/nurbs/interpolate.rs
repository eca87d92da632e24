//! Global B-spline interpolation through a grid of points.
//!
//! Parameters come from averaged chord lengths and knots from parameter
//! averaging, so that the resulting surface passes exactly through
//! every input point at its assigned parameter.

use nalgebra::DMatrix;
use truss_core::{ParamDirection, Result, TrussError};
use truss_math::Point3;

use super::knot::{basis_functions, find_span};

/// Chord-length parameters in `[0, 1]` for an ordered point sequence.
///
/// Returns `None` when all points coincide (zero total length).
pub fn chord_length_parameters(points: &[Point3]) -> Option<Vec<f64>> {
    if points.len() < 2 {
        return None;
    }
    let chords: Vec<f64> = points.windows(2).map(|w| (w[1] - w[0]).length()).collect();
    let total: f64 = chords.iter().sum();
    if total <= f64::EPSILON || !total.is_finite() {
        return None;
    }

    let mut params = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    params.push(0.0);
    for chord in &chords[..chords.len() - 1] {
        acc += chord;
        params.push(acc / total);
    }
    params.push(1.0);
    Some(params)
}

/// Clamped knot vector obtained by averaging `degree` consecutive parameters.
pub fn averaged_knots(params: &[f64], degree: usize) -> Vec<f64> {
    let n = params.len() - 1;
    let mut knots = Vec::with_capacity(n + degree + 2);
    knots.extend(std::iter::repeat(0.0).take(degree + 1));
    for j in 1..=n.saturating_sub(degree) {
        let sum: f64 = params[j..j + degree].iter().sum();
        knots.push(sum / degree as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

/// Build the collocation matrix `A[k][i] = N_i(params[k])`.
fn collocation_matrix(degree: usize, knots: &[f64], params: &[f64]) -> DMatrix<f64> {
    let count = params.len();
    let n = count - 1;
    let mut a = DMatrix::<f64>::zeros(count, count);
    for (k, &t) in params.iter().enumerate() {
        let span = find_span(degree, knots, n, t);
        let basis = basis_functions(degree, knots, span, t);
        for (offset, value) in basis.into_iter().enumerate() {
            a[(k, span - degree + offset)] = value;
        }
    }
    a
}

/// Solve `A * X = B` for several point sequences that share parameters.
///
/// `columns[c]` is one point sequence; the result holds the control points for
/// each sequence in the same order.
fn solve_shared(
    degree: usize,
    knots: &[f64],
    params: &[f64],
    columns: &[Vec<Point3>],
) -> Result<Vec<Vec<Point3>>> {
    let count = params.len();
    let a = collocation_matrix(degree, knots, params);

    let mut b = DMatrix::<f64>::zeros(count, 3 * columns.len());
    for (c, column) in columns.iter().enumerate() {
        for (k, p) in column.iter().enumerate() {
            b[(k, 3 * c)] = p.x;
            b[(k, 3 * c + 1)] = p.y;
            b[(k, 3 * c + 2)] = p.z;
        }
    }

    let x = a.lu().solve(&b).ok_or_else(|| {
        TrussError::DegenerateFit("interpolation system is singular".to_string())
    })?;

    let solved = (0..columns.len())
        .map(|c| {
            (0..count)
                .map(|k| Point3::new(x[(k, 3 * c)], x[(k, 3 * c + 1)], x[(k, 3 * c + 2)]))
                .collect()
        })
        .collect();
    Ok(solved)
}

fn check_degree(direction: ParamDirection, samples: usize, degree: usize) -> Result<()> {
    if degree == 0 {
        return Err(TrussError::InvalidParameter(format!(
            "interpolation degree in {direction} must be at least 1"
        )));
    }
    if samples < degree + 1 {
        return Err(TrussError::InsufficientSamples {
            direction,
            samples,
            degree,
        });
    }
    Ok(())
}

/// Average the chord-length parameters of several sequences of equal length.
///
/// Sequences of zero length are skipped; if every sequence is degenerate the
/// fit cannot be parametrized in that direction.
fn averaged_parameters(
    direction: ParamDirection,
    sequences: impl Iterator<Item = Vec<Point3>>,
    count: usize,
) -> Result<Vec<f64>> {
    let mut sum = vec![0.0; count];
    let mut used = 0usize;
    for seq in sequences {
        if let Some(params) = chord_length_parameters(&seq) {
            for (s, p) in sum.iter_mut().zip(params) {
                *s += p;
            }
            used += 1;
        }
    }
    if used == 0 {
        return Err(TrussError::DegenerateFit(format!(
            "samples coincide along every {direction} sequence"
        )));
    }
    let mut params: Vec<f64> = sum.into_iter().map(|s| s / used as f64).collect();
    params[0] = 0.0;
    params[count - 1] = 1.0;
    if params.windows(2).any(|w| w[1] <= w[0]) {
        return Err(TrussError::DegenerateFit(format!(
            "repeated samples give non-increasing {direction} parameters"
        )));
    }
    Ok(params)
}

/// Result of a tensor-product interpolation.
#[derive(Debug, Clone)]
pub struct SurfaceFit {
    pub degree_u: usize,
    pub degree_v: usize,
    pub knots_u: Vec<f64>,
    pub knots_v: Vec<f64>,
    pub control_points: Vec<Vec<Point3>>,
    /// Parameters assigned to sample rows.
    pub params_u: Vec<f64>,
    /// Parameters assigned to sample columns.
    pub params_v: Vec<f64>,
}

/// Interpolate a non-periodic B-spline surface through a grid of points.
///
/// `points` is row-major: the sample at row `i` (u-direction) and column `j`
/// (v-direction) is `points[i * cols + j]`. The fitted surface satisfies
/// `S(params_u[i], params_v[j]) == points[i * cols + j]`.
pub fn interpolate_surface(
    points: &[Point3],
    rows: usize,
    cols: usize,
    degree_u: usize,
    degree_v: usize,
) -> Result<SurfaceFit> {
    if points.len() != rows * cols {
        return Err(TrussError::InvalidParameter(format!(
            "expected {} samples for a {rows}x{cols} grid, got {}",
            rows * cols,
            points.len()
        )));
    }
    check_degree(ParamDirection::U, rows, degree_u)?;
    check_degree(ParamDirection::V, cols, degree_v)?;

    let at = |i: usize, j: usize| points[i * cols + j];

    let params_u = averaged_parameters(
        ParamDirection::U,
        (0..cols).map(|j| (0..rows).map(|i| at(i, j)).collect()),
        rows,
    )?;
    let params_v = averaged_parameters(
        ParamDirection::V,
        (0..rows).map(|i| (0..cols).map(|j| at(i, j)).collect()),
        cols,
    )?;
    let knots_u = averaged_knots(&params_u, degree_u);
    let knots_v = averaged_knots(&params_v, degree_v);

    // Interpolate every column along u, then every resulting row along v.
    let columns: Vec<Vec<Point3>> = (0..cols)
        .map(|j| (0..rows).map(|i| at(i, j)).collect())
        .collect();
    let column_cps = solve_shared(degree_u, &knots_u, &params_u, &columns)?;

    let intermediate_rows: Vec<Vec<Point3>> = (0..rows)
        .map(|i| (0..cols).map(|j| column_cps[j][i]).collect())
        .collect();
    let control_points = solve_shared(degree_v, &knots_v, &params_v, &intermediate_rows)?;

    Ok(SurfaceFit {
        degree_u,
        degree_v,
        knots_u,
        knots_v,
        control_points,
        params_u,
        params_v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurbs::eval::SurfaceNet;
    use truss_math::dvec3;

    #[test]
    fn test_chord_length_parameters() {
        let pts = vec![dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0), dvec3(4.0, 0.0, 0.0)];
        let params = chord_length_parameters(&pts).unwrap();
        assert_eq!(params, vec![0.0, 0.25, 1.0]);

        let same = vec![dvec3(1.0, 1.0, 1.0); 3];
        assert!(chord_length_parameters(&same).is_none());
    }

    #[test]
    fn test_averaged_knots_cubic() {
        let params = vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
        let knots = averaged_knots(&params, 3);
        assert_eq!(knots.len(), params.len() + 3 + 1);
        assert!((knots[4] - 0.4).abs() < 1e-12);
        assert!((knots[5] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_surface_passes_through_points() {
        let rows = 5;
        let cols = 4;
        let mut pts = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                let x = i as f64;
                let y = j as f64 * 1.5;
                pts.push(dvec3(x, y, 0.2 * x * y - 0.1 * x * x));
            }
        }
        let fit = interpolate_surface(&pts, rows, cols, 3, 3).unwrap();
        let net = SurfaceNet {
            degree_u: 3,
            degree_v: 3,
            knots_u: &fit.knots_u,
            knots_v: &fit.knots_v,
            control_points: &fit.control_points,
            weights: None,
        };
        for i in 0..rows {
            for j in 0..cols {
                let q = net.point(fit.params_u[i], fit.params_v[j]);
                assert!((q - pts[i * cols + j]).length() < 1e-9);
            }
        }
    }

    #[test]
    fn test_interpolate_surface_insufficient_rows() {
        let pts = vec![dvec3(0.0, 0.0, 0.0); 3 * 5];
        let err = interpolate_surface(&pts, 3, 5, 3, 3).unwrap_err();
        match err {
            TrussError::InsufficientSamples {
                direction,
                samples,
                degree,
            } => {
                assert_eq!(direction, ParamDirection::U);
                assert_eq!(samples, 3);
                assert_eq!(degree, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_interpolate_surface_coincident_points() {
        let pts = vec![dvec3(1.0, 2.0, 3.0); 16];
        let err = interpolate_surface(&pts, 4, 4, 3, 3).unwrap_err();
        assert!(matches!(err, TrussError::DegenerateFit(_)));
    }
}
