use skewlat_image::Point2d;

/// Interior angles of a chain of four lattice points, in degrees.
///
/// An angle is NaN when two of the three points defining it coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeAngles {
    /// Angle at `p2` between `p1` and `p3`.
    pub angle123: f64,
    /// Angle at `p3` between `p4` and `p2`.
    pub angle234: f64,
}

impl LatticeAngles {
    /// Whether both angles are defined.
    pub fn is_available(&self) -> bool {
        !self.angle123.is_nan() && !self.angle234.is_nan()
    }
}

/// Angle between two vectors in degrees, NaN when either has zero length.
fn vector_angle(a: (f64, f64), b: (f64, f64)) -> f64 {
    let norm = a.0.hypot(a.1) * b.0.hypot(b.1);
    if norm == 0.0 {
        return f64::NAN;
    }
    let cos = (a.0 * b.0 + a.1 * b.1) / norm;
    // rounding can push the cosine slightly past +-1 for collinear points
    let cos = if cos.is_finite() {
        cos.clamp(-1.0, 1.0)
    } else {
        cos
    };
    cos.acos().to_degrees()
}

/// Measure the two interior angles formed by four ordered points.
///
/// `angle123` is the angle between `p1 - p2` and `p3 - p2`, `angle234` the
/// angle between `p4 - p3` and `p2 - p3`.
///
/// # Example
///
/// ```
/// use skewlat_image::Point2d;
/// use skewlat_imgproc::angle::measure_angles;
///
/// let angles = measure_angles(&[
///     Point2d::new(0.0, 1.0),
///     Point2d::new(0.0, 0.0),
///     Point2d::new(1.0, 0.0),
///     Point2d::new(1.0, 1.0),
/// ]);
/// assert!((angles.angle123 - 90.0).abs() < 1e-12);
/// assert!((angles.angle234 - 90.0).abs() < 1e-12);
/// ```
pub fn measure_angles(points: &[Point2d; 4]) -> LatticeAngles {
    let [p1, p2, p3, p4] = points;
    let diff = |a: &Point2d, b: &Point2d| (a.x - b.x, a.y - b.y);

    LatticeAngles {
        angle123: vector_angle(diff(p1, p2), diff(p3, p2)),
        angle234: vector_angle(diff(p4, p3), diff(p2, p3)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hexagonal_lattice() {
        let s = 3f64.sqrt() / 2.0;
        let angles = measure_angles(&[
            Point2d::new(0.5, s),
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.5, s),
        ]);
        assert_relative_eq!(angles.angle123, 60.0, epsilon = 1e-9);
        assert_relative_eq!(angles.angle234, 120.0, epsilon = 1e-9);
        assert!(angles.is_available());
    }

    #[test]
    fn physical_scale_invariant() {
        let angles = measure_angles(&[
            Point2d::new(0.0, 2.0e-9),
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0e-9, 0.0),
            Point2d::new(1.0e-9, 2.0e-9),
        ]);
        assert_relative_eq!(angles.angle123, 90.0, epsilon = 1e-9);
        assert_relative_eq!(angles.angle234, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn collinear_points() {
        let angles = measure_angles(&[
            Point2d::new(-1.0, 0.0),
            Point2d::new(0.0, 0.0),
            Point2d::new(3.0, 0.0),
            Point2d::new(7.0, 0.0),
        ]);
        assert_relative_eq!(angles.angle123, 180.0, epsilon = 1e-9);
        assert_relative_eq!(angles.angle234, 180.0, epsilon = 1e-9);

        // p4 folds back towards p2
        let angles = measure_angles(&[
            Point2d::new(-1.0, 0.0),
            Point2d::new(0.0, 0.0),
            Point2d::new(3.0, 0.0),
            Point2d::new(1.0, 0.0),
        ]);
        assert_relative_eq!(angles.angle234, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn coincident_points_unavailable() {
        let angles = measure_angles(&[
            Point2d::new(0.0, 1.0),
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 1.0),
        ]);
        assert!(angles.angle123.is_nan());
        assert!(angles.angle234.is_nan());
        assert!(!angles.is_available());

        let angles = measure_angles(&[
            Point2d::new(0.0, 1.0),
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 0.0),
        ]);
        assert_relative_eq!(angles.angle123, 90.0, epsilon = 1e-9);
        assert!(angles.angle234.is_nan());
    }
}
