//! Knot vectors and B-spline basis functions.

use truss_math::Interval;

/// Index `i` of the knot span with `knots[i] <= t < knots[i + 1]`.
///
/// `n` is the index of the last control point. Parameters at or beyond the
/// domain ends fall into the first or last non-empty span.
pub fn find_span(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    if t >= knots[n + 1] {
        return n;
    }
    if t <= knots[degree] {
        return degree;
    }
    degree + knots[degree..=n + 1].partition_point(|&k| k <= t) - 1
}

/// Values of the `degree + 1` basis functions that do not vanish on `span`.
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, t: f64) -> Vec<f64> {
    basis_derivatives(degree, knots, span, t, 0).swap_remove(0)
}

/// Non-vanishing basis functions on `span` and their derivatives up to `order`.
///
/// Row `k` of the result holds the `k`-th derivatives of
/// `N[span - degree] ..= N[span]`. Rows above `degree` are zero.
pub fn basis_derivatives(
    degree: usize,
    knots: &[f64],
    span: usize,
    t: f64,
    order: usize,
) -> Vec<Vec<f64>> {
    let p = degree;

    // Upper triangle: basis values of increasing degree.
    // Lower triangle: knot differences used as divisors.
    let mut table = vec![vec![0.0; p + 1]; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    table[0][0] = 1.0;
    for j in 1..=p {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            table[j][r] = right[r + 1] + left[j - r];
            let temp = table[r][j - 1] / table[j][r];
            table[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        table[j][j] = saved;
    }

    let mut ders = vec![vec![0.0; p + 1]; order + 1];
    for (j, row) in table.iter().enumerate() {
        ders[0][j] = row[p];
    }

    let top = order.min(p);
    let mut coeffs = [vec![0.0; p + 1], vec![0.0; p + 1]];
    for r in 0..=p {
        let (mut prev, mut cur) = (0, 1);
        coeffs[prev][0] = 1.0;
        for k in 1..=top {
            let pk = p - k;
            let rk = r as isize - k as isize;
            let mut d = 0.0;
            if r >= k {
                coeffs[cur][0] = coeffs[prev][0] / table[pk + 1][r - k];
                d = coeffs[cur][0] * table[r - k][pk];
            }
            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r <= pk + 1 { k - 1 } else { p - r };
            for j in j1..=j2 {
                let idx = (rk + j as isize) as usize;
                coeffs[cur][j] = (coeffs[prev][j] - coeffs[prev][j - 1]) / table[pk + 1][idx];
                d += coeffs[cur][j] * table[idx][pk];
            }
            if r <= pk {
                coeffs[cur][k] = -coeffs[prev][k - 1] / table[pk + 1][r];
                d += coeffs[cur][k] * table[r][pk];
            }
            ders[k][r] = d;
            std::mem::swap(&mut prev, &mut cur);
        }
    }

    let mut factor = p as f64;
    for k in 1..=top {
        for d in &mut ders[k] {
            *d *= factor;
        }
        factor *= (p - k) as f64;
    }
    ders
}

/// Clamped knot vector with uniformly spaced interior knots over `[0, 1]`.
///
/// Produces `count + degree + 1` knots for `count` control points.
pub fn clamped_uniform(count: usize, degree: usize) -> Vec<f64> {
    let interior = count.saturating_sub(degree + 1);
    let mut knots = Vec::with_capacity(count + degree + 1);
    knots.extend(std::iter::repeat(0.0).take(degree + 1));
    for k in 1..=interior {
        knots.push(k as f64 / (interior + 1) as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

/// The parameter domain spanned by a clamped knot vector.
pub fn domain(degree: usize, knots: &[f64]) -> Interval {
    Interval::new(knots[degree], knots[knots.len() - degree - 1])
}

/// Affinely remap a knot vector so that its domain becomes `to`.
///
/// The curve or surface shape is unchanged; only its parametrization moves.
pub fn reparametrize(degree: usize, knots: &[f64], to: Interval) -> Vec<f64> {
    let from = domain(degree, knots);
    let mut out: Vec<f64> = knots.iter().map(|&k| from.remap(k, to)).collect();
    // Pin the domain ends so repeated end knots stay exactly equal.
    let last = out.len() - degree - 1;
    for (i, k) in out.iter_mut().enumerate() {
        if i <= degree {
            *k = to.min;
        } else if i >= last {
            *k = to.max;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const KNOTS: [f64; 8] = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0];

    #[test]
    fn test_find_span() {
        let expected = [(0.0, 2), (0.5, 2), (1.0, 3), (1.5, 3), (2.5, 4), (3.0, 4), (7.0, 4)];
        for (t, span) in expected {
            assert_eq!(find_span(2, &KNOTS, 4, t), span, "t={t}");
        }
    }

    #[test]
    fn test_find_span_repeated_interior_knot() {
        let knots = [0.0, 0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.0];
        assert_eq!(find_span(2, &knots, 4, 0.5), 4);
        assert_eq!(find_span(2, &knots, 4, 0.49), 2);
    }

    #[test]
    fn test_partition_of_unity_and_non_negative() {
        for i in 0..=30 {
            let t = i as f64 * 0.1;
            let span = find_span(2, &KNOTS, 4, t);
            let basis = basis_functions(2, &KNOTS, span, t);
            let sum: f64 = basis.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "sum {sum} at t={t}");
            assert!(basis.iter().all(|&b| b >= -1e-15));
        }
    }

    #[test]
    fn test_derivatives_sum_to_zero() {
        let knots = clamped_uniform(6, 3);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let span = find_span(3, &knots, 5, t);
            let ders = basis_derivatives(3, &knots, span, t, 2);
            for (k, row) in ders.iter().enumerate().skip(1) {
                let sum: f64 = row.iter().sum();
                assert!(sum.abs() < 1e-9, "order {k} sums to {sum} at t={t}");
            }
        }
    }

    #[test]
    fn test_cubic_bezier_derivatives() {
        // Bernstein basis: B0 = (1 - t)^3, B0' = -3(1 - t)^2, B0'' = 6(1 - t).
        let knots = clamped_uniform(4, 3);
        let t = 0.3;
        let ders = basis_derivatives(3, &knots, find_span(3, &knots, 3, t), t, 3);
        let s = 1.0 - t;
        assert_abs_diff_eq!(ders[0][0], s * s * s, epsilon = 1e-12);
        assert_abs_diff_eq!(ders[1][0], -3.0 * s * s, epsilon = 1e-12);
        assert_abs_diff_eq!(ders[2][0], 6.0 * s, epsilon = 1e-12);
        assert_abs_diff_eq!(ders[2][3], 6.0 * t, epsilon = 1e-12);
        assert_abs_diff_eq!(ders[3][3], 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_orders_above_degree_vanish() {
        let knots = clamped_uniform(2, 1);
        let ders = basis_derivatives(1, &knots, 1, 0.4, 2);
        assert_eq!(ders.len(), 3);
        assert!((ders[1][0] + 1.0).abs() < 1e-12);
        assert!(ders[2].iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_clamped_uniform() {
        assert_eq!(clamped_uniform(4, 3), vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            clamped_uniform(5, 2),
            vec![0.0, 0.0, 0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_reparametrize_to_unit() {
        let knots = vec![2.0, 2.0, 2.0, 4.0, 6.0, 6.0, 6.0];
        let out = reparametrize(2, &knots, Interval::unit());
        assert_eq!(out, vec![0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0]);
        assert_eq!(domain(2, &out), Interval::unit());
    }
}
