use skewlat_image::Point2d;

use super::WarpError;

/// Determinants with a smaller magnitude are treated as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// A 2D affine map: 2x2 linear part plus translation.
///
/// The map sends `(x, y)` to
///
/// ```text
/// x' = a * x + c * y + tx
/// y' = b * x + d * y + ty
/// ```
///
/// i.e. `(a, b)` is the image of the x axis and `(c, d)` the image of the
/// y axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineMap {
    /// x coefficient of x'.
    pub a: f64,
    /// x coefficient of y'.
    pub b: f64,
    /// y coefficient of x'.
    pub c: f64,
    /// y coefficient of y'.
    pub d: f64,
    /// x translation.
    pub tx: f64,
    /// y translation.
    pub ty: f64,
}

impl Default for AffineMap {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMap {
    /// The identity map.
    pub const IDENTITY: AffineMap = AffineMap {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Create a map from its coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Create a map from `[a, b, c, d, tx, ty]`.
    pub fn from_array(m: [f64; 6]) -> Self {
        Self::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    /// Coefficients as `[a, b, c, d, tx, ty]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }

    /// Replace the translation.
    pub fn with_translation(self, tx: f64, ty: f64) -> Self {
        Self { tx, ty, ..self }
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Fail unless the linear part is invertible.
    pub fn ensure_invertible(&self) -> Result<(), WarpError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPS {
            return Err(WarpError::SingularTransform(det));
        }
        Ok(())
    }

    /// Inverse map, such that `m.invert()?.compose(&m)` is the identity.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::SingularTransform`] when the determinant is zero,
    /// not finite or too small to divide by safely.
    ///
    /// # Examples
    ///
    /// ```
    /// use skewlat_imgproc::warp::AffineMap;
    ///
    /// let m = AffineMap::new(1.0, 0.2, -0.3, 1.0, 4.0, -2.0);
    /// let id = m.invert().unwrap().compose(&m);
    /// assert!(id.approx_eq(&AffineMap::IDENTITY, 1e-12));
    /// ```
    pub fn invert(&self) -> Result<Self, WarpError> {
        self.ensure_invertible()?;
        let det = self.determinant();
        Ok(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.c * self.ty - self.d * self.tx) / det,
            ty: (self.b * self.tx - self.a * self.ty) / det,
        })
    }

    /// Composition `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &AffineMap) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Apply the map to the homogeneous point `(x, y, 1)`.
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Apply the map to a point.
    pub fn apply(&self, p: Point2d) -> Point2d {
        let (x, y) = self.transform_point(p.x, p.y);
        Point2d { x, y }
    }

    /// Shift the translation so that the map relates pixel centers instead of
    /// pixel corners.
    ///
    /// Pixel `i` spans `[i, i + 1)`, so its center is `i + 0.5`. Requiring the
    /// center of a destination pixel to land on the center of the source
    /// position gives the offsets `0.5 * (a + c - 1)` and `0.5 * (b + d - 1)`.
    pub fn with_pixel_center_correction(&self) -> Self {
        Self {
            tx: self.tx + 0.5 * (self.a + self.c - 1.0),
            ty: self.ty + 0.5 * (self.b + self.d - 1.0),
            ..*self
        }
    }

    /// Whether all coefficients are within `eps` of `other`.
    pub fn approx_eq(&self, other: &AffineMap, eps: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(x, y)| (x - y).abs() <= eps)
    }
}

#[cfg(test)]
mod tests {
    use super::AffineMap;
    use crate::warp::WarpError;
    use skewlat_image::Point2d;
    use approx::assert_relative_eq;

    #[test]
    fn determinant_of_shear_is_one() {
        let m = AffineMap::new(1.0, 0.3, -0.7, 1.0, 0.0, 0.0);
        assert_relative_eq!(m.determinant(), 1.0 - 0.3 * -0.7);
        let shear = AffineMap::new(1.0, 0.0, 0.7, 1.0, 5.0, 5.0);
        assert_relative_eq!(shear.determinant(), 1.0);
    }

    #[test]
    fn invert_roundtrip() -> Result<(), WarpError> {
        let m = AffineMap::new(2.0, 0.5, -1.0, 3.0, 7.0, -4.0);
        let inv = m.invert()?;
        assert!(inv.compose(&m).approx_eq(&AffineMap::IDENTITY, 1e-12));
        assert!(m.compose(&inv).approx_eq(&AffineMap::IDENTITY, 1e-12));

        let (x, y) = m.transform_point(1.5, -2.0);
        let (u, v) = inv.transform_point(x, y);
        assert_relative_eq!(u, 1.5, epsilon = 1e-12);
        assert_relative_eq!(v, -2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn array_layout() {
        let m = AffineMap::from_array([1.0, 0.2, -0.3, 1.0, 4.0, -2.0]);
        assert_eq!(m, AffineMap::new(1.0, 0.2, -0.3, 1.0, 4.0, -2.0));
        assert_eq!(m.to_array(), [1.0, 0.2, -0.3, 1.0, 4.0, -2.0]);

        // x' = a x + c y + tx, y' = b x + d y + ty
        let p = m.apply(Point2d::new(2.0, 10.0));
        assert_relative_eq!(p.x, 2.0 - 3.0 + 4.0);
        assert_relative_eq!(p.y, 0.4 + 10.0 - 2.0);
        assert_eq!((p.x, p.y), m.transform_point(2.0, 10.0));
    }

    #[test]
    fn invert_singular_fails() {
        let m = AffineMap::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        assert_eq!(m.invert(), Err(WarpError::SingularTransform(0.0)));

        let m = AffineMap::new(f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0);
        assert!(m.invert().is_err());
    }

    #[test]
    fn compose_order() {
        let translate = AffineMap::IDENTITY.with_translation(1.0, 0.0);
        let scale = AffineMap::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        // scale after translate
        let (x, y) = scale.compose(&translate).transform_point(1.0, 1.0);
        assert_eq!((x, y), (4.0, 2.0));
        // translate after scale
        let (x, y) = translate.compose(&scale).transform_point(1.0, 1.0);
        assert_eq!((x, y), (3.0, 2.0));
    }

    #[test]
    fn pixel_center_correction() {
        assert_eq!(
            AffineMap::IDENTITY.with_pixel_center_correction(),
            AffineMap::IDENTITY
        );
        let half = AffineMap::new(0.5, 0.0, 0.0, 0.5, 0.0, 0.0).with_pixel_center_correction();
        // destination pixel 0 center (0.5) maps to source 0.25, i.e. corner -0.25
        assert_relative_eq!(half.tx, -0.25);
        assert_relative_eq!(half.ty, -0.25);
    }
}
