use log::debug;

use skewlat_image::{Image, ImageSize};
use skewlat_imgproc::interpolation::InterpolationMode;
use skewlat_imgproc::warp::{resample_affine, AffineMap};

use crate::SkewError;

/// Horizontal and vertical skew angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkewParameters {
    x_skew: f64,
    y_skew: f64,
}

impl SkewParameters {
    /// Largest supported magnitude of either angle, in degrees.
    pub const MAX_SKEW: f64 = 30.0;

    /// Create validated skew parameters.
    ///
    /// # Errors
    ///
    /// Both angles must be finite and within `[-MAX_SKEW, MAX_SKEW]`.
    ///
    /// # Example
    ///
    /// ```
    /// use skewlat::skew::SkewParameters;
    ///
    /// assert!(SkewParameters::new(12.5, -3.0).is_ok());
    /// assert!(SkewParameters::new(31.0, 0.0).is_err());
    /// ```
    pub fn new(x_skew: f64, y_skew: f64) -> Result<Self, SkewError> {
        for angle in [x_skew, y_skew] {
            if !angle.is_finite() || angle.abs() > Self::MAX_SKEW {
                return Err(SkewError::InvalidSkewAngle(angle, Self::MAX_SKEW));
            }
        }
        Ok(Self { x_skew, y_skew })
    }

    /// Create skew parameters, clamping both angles into the supported range.
    ///
    /// Non-finite angles become zero.
    pub fn clamped(x_skew: f64, y_skew: f64) -> Self {
        let clamp = |v: f64| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(-Self::MAX_SKEW, Self::MAX_SKEW)
            }
        };
        Self {
            x_skew: clamp(x_skew),
            y_skew: clamp(y_skew),
        }
    }

    /// Horizontal skew in degrees.
    pub fn x_skew(&self) -> f64 {
        self.x_skew
    }

    /// Vertical skew in degrees.
    pub fn y_skew(&self) -> f64 {
        self.y_skew
    }

    /// The pure shear built from the angles, without translation.
    ///
    /// `x' = x + tan(x_skew) * y` and `y' = tan(y_skew) * x + y`.
    pub fn shear(&self) -> AffineMap {
        AffineMap::new(
            1.0,
            self.y_skew.to_radians().tan(),
            self.x_skew.to_radians().tan(),
            1.0,
            0.0,
            0.0,
        )
    }
}

/// The geometry of a skew correction for a given source size.
#[derive(Debug, Clone, PartialEq)]
pub struct SkewModel {
    params: SkewParameters,
    src_size: ImageSize,
    dst_size: ImageSize,
    forward: AffineMap,
    inverse: AffineMap,
}

impl SkewModel {
    /// Build the model for an image of size `src_size`.
    ///
    /// The corners of the source rectangle are sheared, the canvas is sized
    /// to the rounded bounding box of the result (at least one pixel per
    /// axis) and the forward map is translated so the bounding box starts at
    /// the canvas origin.
    ///
    /// # Example
    ///
    /// ```
    /// use skewlat::skew::{SkewModel, SkewParameters};
    ///
    /// let params = SkewParameters::new(0.0, 0.0).unwrap();
    /// let model = SkewModel::new(params, [64, 32].into()).unwrap();
    /// assert_eq!(model.dst_size(), [64, 32].into());
    /// ```
    pub fn new(params: SkewParameters, src_size: ImageSize) -> Result<Self, SkewError> {
        let shear = params.shear();
        let (w, h) = (src_size.width as f64, src_size.height as f64);

        let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            let (tx, ty) = shear.transform_point(x, y);
            min_x = min_x.min(tx);
            max_x = max_x.max(tx);
            min_y = min_y.min(ty);
            max_y = max_y.max(ty);
        }

        let dst_size = ImageSize {
            width: ((max_x - min_x).round() as usize).max(1),
            height: ((max_y - min_y).round() as usize).max(1),
        };

        let forward = shear.with_translation(-min_x, -min_y);
        let inverse = forward.invert()?;

        debug!(
            "skew ({}, {}) maps {} onto {}",
            params.x_skew, params.y_skew, src_size, dst_size
        );

        Ok(Self {
            params,
            src_size,
            dst_size,
            forward,
            inverse,
        })
    }

    /// The angles the model was built from.
    pub fn params(&self) -> SkewParameters {
        self.params
    }

    /// Size of the source image.
    pub fn src_size(&self) -> ImageSize {
        self.src_size
    }

    /// Size of the corrected canvas.
    pub fn dst_size(&self) -> ImageSize {
        self.dst_size
    }

    /// Map from source pixels to canvas pixels.
    pub fn forward(&self) -> &AffineMap {
        &self.forward
    }

    /// Map from canvas pixels to source pixels.
    pub fn inverse(&self) -> &AffineMap {
        &self.inverse
    }

    /// Ratio of canvas to source resolution per axis.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.dst_size.width as f64 / self.src_size.width as f64,
            self.dst_size.height as f64 / self.src_size.height as f64,
        )
    }

    /// Physical extent of the canvas given the physical extent of the source.
    ///
    /// Keeps the pixel pitch of the source.
    pub fn real_size(&self, real_width: f64, real_height: f64) -> (f64, f64) {
        let (sx, sy) = self.scale();
        (real_width * sx, real_height * sy)
    }
}

/// Fill value for canvas pixels outside the source, just below the data range.
///
/// # Example
///
/// ```
/// use skewlat::image::Image;
/// use skewlat::skew::background_fill;
///
/// let image = Image::new([2, 1].into(), vec![0.0, 10.0]).unwrap();
/// assert_eq!(background_fill(&image), -0.5);
/// ```
pub fn background_fill(image: &Image) -> f64 {
    let (min, max) = image.min_max();
    min - 0.05 * (max - min)
}

/// Resample `src` through the skew correction described by `model`.
///
/// The corrected image has the canvas size of the model, the physical extent
/// scaled with the resolution and the units of `src`. Canvas pixels that map
/// outside the source get [`background_fill`].
pub fn correct_image(
    src: &Image,
    model: &SkewModel,
    interpolation: InterpolationMode,
) -> Result<Image, SkewError> {
    let fill = background_fill(src);
    let mut corrected = resample_affine(src, model.dst_size(), model.inverse(), interpolation, fill)?;

    let (xreal, yreal) = model.real_size(src.real_width(), src.real_height());
    corrected.set_real_size(xreal, yreal)?;
    corrected.set_offset(0.0, 0.0);

    Ok(corrected)
}

/// Build the model for `src` and resample it in one step.
///
/// # Example
///
/// ```
/// use skewlat::image::Image;
/// use skewlat::imgproc::interpolation::InterpolationMode;
/// use skewlat::skew::{skew_image, SkewParameters};
///
/// let src = Image::from_size_val([32, 32].into(), 1.0).unwrap();
/// let params = SkewParameters::new(10.0, 0.0).unwrap();
/// let corrected = skew_image(&src, params, InterpolationMode::Linear).unwrap();
/// assert!(corrected.width() > src.width());
/// ```
pub fn skew_image(
    src: &Image,
    params: SkewParameters,
    interpolation: InterpolationMode,
) -> Result<Image, SkewError> {
    let model = SkewModel::new(params, src.size())?;
    correct_image(src, &model, interpolation)
}
