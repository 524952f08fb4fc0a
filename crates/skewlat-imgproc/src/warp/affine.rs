use std::borrow::Cow;

use skewlat_image::{Image, ImageSize};

use super::{AffineMap, WarpError};
use crate::interpolation::{
    interpolate_2d, resolve_coefficients_2d, InterpolationMode, MAX_SUPPORT,
};
use crate::parallel;

/// Fold an out-of-range index back into `[0, len)`.
///
/// The index is first wrapped with period `2 * len`; values landing in the
/// upper half are mirrored, so `-1 -> 0`, `len -> len - 1` and
/// `k + 2 * len -> k`.
///
/// # Examples
///
/// ```
/// use skewlat_imgproc::warp::fold_index;
///
/// assert_eq!(fold_index(-1, 4), 0);
/// assert_eq!(fold_index(5, 4), 2);
/// assert_eq!(fold_index(9, 4), 1);
/// ```
pub fn fold_index(k: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let k = k.rem_euclid(period);
    if k >= len as isize {
        (period - 1 - k) as usize
    } else {
        k as usize
    }
}

/// Resample `src` into `dst` through an inverse affine map.
///
/// Every destination pixel `(i, j)` is mapped into source space with
/// `inverse`, corrected so that pixel centers correspond. Positions outside
/// `[0, W) x [0, H)` receive `fill_value`. Inside, the `support x support`
/// neighborhood of the position is gathered, folding indices that leave the
/// source with [`fold_index`], and reduced with the interpolation kernel.
///
/// Kernels without an interpolating basis are applied to coefficients
/// resolved once over the whole source before the pixel loop.
///
/// # Arguments
///
/// * `src` - The source image. Read only.
/// * `dst` - The destination image; its size defines the output grid.
/// * `inverse` - The map from destination pixel to source pixel coordinates.
/// * `interpolation` - The interpolation kernel.
/// * `fill_value` - The value for pixels that map outside the source.
///
/// # Errors
///
/// Fails with [`WarpError::SingularTransform`] if `inverse` is not invertible.
///
/// # Example
///
/// ```
/// use skewlat_image::Image;
/// use skewlat_imgproc::interpolation::InterpolationMode;
/// use skewlat_imgproc::warp::{warp_affine, AffineMap};
///
/// let src = Image::new([4, 5].into(), (0..20).map(|v| v as f64).collect()).unwrap();
/// let mut dst = Image::from_size_val([4, 5].into(), 0.0).unwrap();
///
/// warp_affine(&src, &mut dst, &AffineMap::IDENTITY, InterpolationMode::Linear, -1.0).unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn warp_affine(
    src: &Image,
    dst: &mut Image,
    inverse: &AffineMap,
    interpolation: InterpolationMode,
    fill_value: f64,
) -> Result<(), WarpError> {
    inverse.ensure_invertible()?;

    let (cols, rows) = (src.cols(), src.rows());

    // spline bases sample coefficients, not values
    let coeffs: Cow<[f64]> = if interpolation.has_interpolating_basis() {
        Cow::Borrowed(src.as_slice())
    } else {
        let mut data = src.as_slice().to_vec();
        resolve_coefficients_2d(&mut data, cols, rows, interpolation);
        Cow::Owned(data)
    };

    let m = inverse.with_pixel_center_correction();
    let support = interpolation.support_size();
    let (from, _) = interpolation.support_range();
    let (w, h) = (cols as f64, rows as f64);

    parallel::par_iter_rows_resample(dst, |i, j, dst_pixel| {
        let (x, y) = m.transform_point(i as f64, j as f64);

        // also rejects NaN
        if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
            *dst_pixel = fill_value;
            return;
        }

        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as isize, y0 as isize);

        let mut neighborhood = [0.0; MAX_SUPPORT * MAX_SUPPORT];
        for (k, row) in neighborhood.chunks_exact_mut(support).take(support).enumerate() {
            let ii = fold_index(y0 + from + k as isize, rows);
            let src_row = &coeffs[ii * cols..(ii + 1) * cols];
            for (l, v) in row.iter_mut().enumerate() {
                *v = src_row[fold_index(x0 + from + l as isize, cols)];
            }
        }

        *dst_pixel = interpolate_2d(fx, fy, &neighborhood[..support * support], interpolation);
    });

    Ok(())
}

/// Resample `src` onto a new grid of size `dst_size`.
///
/// The destination inherits the physical geometry and units of `src`; callers
/// that change the physical extent set it on the returned image. See
/// [`warp_affine`] for the sampling rules.
pub fn resample_affine(
    src: &Image,
    dst_size: ImageSize,
    inverse: &AffineMap,
    interpolation: InterpolationMode,
    fill_value: f64,
) -> Result<Image, WarpError> {
    let mut dst = src.new_alike(dst_size, fill_value)?;
    warp_affine(src, &mut dst, inverse, interpolation, fill_value)?;
    Ok(dst)
}
