//! Natural cubic spline over an ordered point sequence.

use crate::geometry::Point2;

/// A smooth curve fit over sample points with strictly increasing x.
///
/// With three or more points this is the natural cubic spline (zero second
/// derivative at both ends); two points degrade to a line and one point to
/// a constant. Outside the sampled span the end segments are extended.
#[derive(Debug, Clone)]
pub struct NaturalSpline {
    /// Knot abscissae, strictly increasing.
    xs: Vec<f64>,
    /// Knot ordinates.
    ys: Vec<f64>,
    /// Cubic coefficients `[a, b, c, d]` per segment, in the local
    /// variable `t = x - xs[i]`.
    segments: Vec<[f64; 4]>,
}

impl NaturalSpline {
    /// Fits a spline through the given points.
    ///
    /// The points must be non-empty and strictly increasing in x; the
    /// caller (the filament) guarantees both.
    pub fn interpolate(points: &[Point2]) -> Self {
        let n = points.len();
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        debug_assert!(n > 0, "spline needs at least one point");
        debug_assert!(xs.windows(2).all(|w| w[1] > w[0]));

        if n < 2 {
            return Self {
                xs,
                ys,
                segments: Vec::new(),
            };
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        // Second derivatives at the knots; natural conditions pin the two
        // ends to zero, interior values come from a tridiagonal system
        // solved by the Thomas algorithm.
        let mut m = vec![0.0; n];
        if n > 2 {
            let unknowns = n - 2;
            let mut diag = vec![0.0; unknowns];
            let mut sup = vec![0.0; unknowns];
            let mut sub = vec![0.0; unknowns];
            let mut rhs = vec![0.0; unknowns];
            for i in 1..(n - 1) {
                sub[i - 1] = h[i - 1];
                diag[i - 1] = 2.0 * (h[i - 1] + h[i]);
                sup[i - 1] = h[i];
                rhs[i - 1] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
            }
            for i in 1..unknowns {
                let w = sub[i] / diag[i - 1];
                diag[i] -= w * sup[i - 1];
                rhs[i] -= w * rhs[i - 1];
            }
            let last = unknowns - 1;
            m[last + 1] = rhs[last] / diag[last];
            for i in (0..last).rev() {
                m[i + 1] = (rhs[i] - sup[i] * m[i + 2]) / diag[i];
            }
        }

        let mut segments = Vec::with_capacity(n - 1);
        for i in 0..(n - 1) {
            let c = m[i] / 2.0;
            let d = (m[i + 1] - m[i]) / (6.0 * h[i]);
            let b = (ys[i + 1] - ys[i]) / h[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0;
            segments.push([ys[i], b, c, d]);
        }

        Self { xs, ys, segments }
    }

    /// The curve ordinate at the given abscissa.
    pub fn y_at(&self, x: f64) -> f64 {
        if self.segments.is_empty() {
            return self.ys.first().copied().unwrap_or(0.0);
        }

        // Locate the segment; abscissae outside the span extend the first
        // or last segment polynomial.
        let index = match self.xs.binary_search_by(|knot| knot.total_cmp(&x)) {
            Ok(i) => i.min(self.segments.len() - 1),
            Err(0) => 0,
            Err(i) => (i - 1).min(self.segments.len() - 1),
        };

        let t = x - self.xs[index];
        let [a, b, c, d] = self.segments[index];
        a + t * (b + t * (c + t * d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_single_point_is_constant() {
        let spline = NaturalSpline::interpolate(&[Point2::new(5.0, 42.0)]);
        assert_close(spline.y_at(0.0), 42.0);
        assert_close(spline.y_at(100.0), 42.0);
    }

    #[test]
    fn test_two_points_give_a_line() {
        let spline =
            NaturalSpline::interpolate(&[Point2::new(0.0, 10.0), Point2::new(10.0, 30.0)]);
        assert_close(spline.y_at(5.0), 20.0);
        // Linear extension outside the span.
        assert_close(spline.y_at(-5.0), 0.0);
        assert_close(spline.y_at(15.0), 40.0);
    }

    #[test]
    fn test_spline_passes_through_knots() {
        let points = [
            Point2::new(0.0, 1.0),
            Point2::new(10.0, 4.0),
            Point2::new(25.0, 2.0),
            Point2::new(40.0, 8.0),
            Point2::new(55.0, 7.5),
        ];
        let spline = NaturalSpline::interpolate(&points);
        for p in &points {
            assert!(
                (spline.y_at(p.x) - p.y).abs() < 1e-6,
                "knot ({}, {}) missed: {}",
                p.x,
                p.y,
                spline.y_at(p.x)
            );
        }
    }

    #[test]
    fn test_collinear_points_stay_linear() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(20.0, 10.0),
            Point2::new(30.0, 15.0),
        ];
        let spline = NaturalSpline::interpolate(&points);
        assert!((spline.y_at(15.0) - 7.5).abs() < 1e-6);
        assert!((spline.y_at(25.0) - 12.5).abs() < 1e-6);
    }
}
