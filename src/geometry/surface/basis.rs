//! Cubic basis functions for a single patch span, `t` in `[0, 1]`.

/// Cubic Bernstein polynomials.
pub(super) fn bernstein(t: f64) -> [f64; 4] {
    let s = 1.0 - t;
    [s * s * s, 3.0 * t * s * s, 3.0 * t * t * s, t * t * t]
}

/// Derivatives of [`bernstein`] with respect to `t`.
pub(super) fn bernstein_derivative(t: f64) -> [f64; 4] {
    let s = 1.0 - t;
    [
        -3.0 * s * s,
        3.0 * s * s - 6.0 * t * s,
        6.0 * t * s - 3.0 * t * t,
        3.0 * t * t,
    ]
}

/// Uniform cubic B-spline blending functions.
pub(super) fn bspline(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    let s = 1.0 - t;
    [
        s * s * s / 6.0,
        (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0,
        (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0,
        t3 / 6.0,
    ]
}

/// Derivatives of [`bspline`] with respect to `t`.
pub(super) fn bspline_derivative(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let s = 1.0 - t;
    [
        -s * s / 2.0,
        (3.0 * t2 - 4.0 * t) / 2.0,
        (-3.0 * t2 + 2.0 * t + 1.0) / 2.0,
        t2 / 2.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 5] = [0.0, 0.2, 0.5, 0.77, 1.0];

    #[test]
    fn partition_of_unity() {
        for t in SAMPLES {
            assert!((bernstein(t).iter().sum::<f64>() - 1.0).abs() < 1e-12);
            assert!((bspline(t).iter().sum::<f64>() - 1.0).abs() < 1e-12);
            assert!(bernstein_derivative(t).iter().sum::<f64>().abs() < 1e-12);
            assert!(bspline_derivative(t).iter().sum::<f64>().abs() < 1e-12);
        }
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for t in [0.1, 0.5, 0.9] {
            for (basis, derivative) in [
                (bernstein as fn(f64) -> [f64; 4], bernstein_derivative as fn(f64) -> [f64; 4]),
                (bspline, bspline_derivative),
            ] {
                let (lo, hi, d) = (basis(t - h), basis(t + h), derivative(t));
                for i in 0..4 {
                    let fd = (hi[i] - lo[i]) / (2.0 * h);
                    assert!((fd - d[i]).abs() < 1e-6, "basis {i} at t={t}");
                }
            }
        }
    }

    #[test]
    fn bspline_join_is_continuous() {
        // End of one span equals start of the next, shifted by one control point.
        let end = bspline(1.0);
        let start = bspline(0.0);
        assert!((end[1] - start[0]).abs() < 1e-12);
        assert!((end[2] - start[1]).abs() < 1e-12);
        assert!((end[3] - start[2]).abs() < 1e-12);
    }
}
