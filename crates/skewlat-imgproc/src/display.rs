use serde::{Deserialize, Serialize};

use skewlat_image::{Image, ImageError, ImageSize};

use crate::interpolation::InterpolationMode;
use crate::parallel;
use crate::warp::{resample_affine, AffineMap, WarpError};

/// Magnification of the displayed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomMode {
    /// The whole image
    #[default]
    X1,
    /// The central half of the image, magnified twice
    X2,
}

impl ZoomMode {
    /// The magnification factor.
    pub fn factor(&self) -> usize {
        match self {
            ZoomMode::X1 => 1,
            ZoomMode::X2 => 2,
        }
    }
}

/// Clamp every sample of `src` into the range spanned by `lower` and `upper`.
///
/// The bounds may be given in either order.
///
/// # Example
///
/// ```
/// use skewlat_image::Image;
/// use skewlat_imgproc::display::clamp_range;
///
/// let image = Image::new([4, 1].into(), vec![-1.0, 0.5, 2.0, 9.0]).unwrap();
/// let clamped = clamp_range(&image, 3.0, 0.0).unwrap();
/// assert_eq!(clamped.as_slice(), &[0.0, 0.5, 2.0, 3.0]);
/// ```
pub fn clamp_range(src: &Image, lower: f64, upper: f64) -> Result<Image, ImageError> {
    let (lo, hi) = (lower.min(upper), lower.max(upper));
    let mut dst = src.new_alike(src.size(), 0.0)?;

    parallel::par_iter_rows_val(src, &mut dst, |src_pixel, dst_pixel| {
        *dst_pixel = src_pixel.clamp(lo, hi);
    });

    Ok(dst)
}

/// Full sample range of an image, used to reset display bounds.
pub fn full_range(image: &Image) -> (f64, f64) {
    image.min_max()
}

/// Render the view of `image` at the given zoom.
///
/// For a zoom factor `z > 1` the centered crop of `(W / z) | 1` by
/// `(H / z) | 1` pixels is resampled with the linear kernel back to `W x H`.
/// The physical extents and offsets of the view are divided by `z`.
pub fn zoom_view(image: &Image, zoom: ZoomMode) -> Result<Image, WarpError> {
    let z = zoom.factor();
    if z == 1 {
        return Ok(image.clone());
    }

    let (cols, rows) = (image.cols(), image.rows());
    let (crop_w, crop_h) = ((cols / z) | 1, (rows / z) | 1);
    let x0 = (cols.saturating_sub(crop_w) / 2) as f64;
    let y0 = (rows.saturating_sub(crop_h) / 2) as f64;

    let sx = crop_w as f64 / cols as f64;
    let sy = crop_h as f64 / rows as f64;
    let inverse = AffineMap::new(sx, 0.0, 0.0, sy, x0, y0);

    let mut view = resample_affine(
        image,
        ImageSize {
            width: cols,
            height: rows,
        },
        &inverse,
        InterpolationMode::Linear,
        image.min_max().0,
    )?;

    let zf = z as f64;
    view.set_real_size(image.real_width() / zf, image.real_height() / zf)?;
    view.set_offset(image.offset_x() / zf, image.offset_y() / zf);

    Ok(view)
}
