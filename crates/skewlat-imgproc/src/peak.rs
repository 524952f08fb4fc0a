use log::trace;

use skewlat_image::{Image, Point2d};

/// A local maximum found by [`locate_peak`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Physical coordinate of the peak pixel, offset included.
    pub point: Point2d,
    /// Sample value at the peak pixel.
    pub value: f64,
    /// Pixel index of the peak as `[col, row]`.
    pub pixel: [usize; 2],
}

/// Find the maximum sample in a square window around an approximate position.
///
/// The approximate point is mapped to its nearest pixel, which is the initial
/// candidate. The window `[col - radius, col + radius] x [row - radius, row + radius]`,
/// clamped to the image, is then scanned in row-major order and a sample
/// replaces the candidate only when it is strictly greater, so ties resolve
/// deterministically.
///
/// # Arguments
///
/// * `spectrum` - The image to search.
/// * `approx` - The approximate position in physical coordinates.
/// * `radius` - Half-width of the search window in pixels.
///
/// # Example
///
/// ```
/// use skewlat_image::{Image, Point2d};
/// use skewlat_imgproc::peak::locate_peak;
///
/// let mut image = Image::from_size_val([8, 8].into(), 0.0).unwrap();
/// image.as_slice_mut()[3 * 8 + 5] = 2.0;
///
/// let peak = locate_peak(&image, Point2d::new(4.0, 4.0), 2);
/// assert_eq!(peak.pixel, [5, 3]);
/// assert_eq!(peak.value, 2.0);
/// ```
pub fn locate_peak(spectrum: &Image, approx: Point2d, radius: usize) -> Peak {
    let [col, row] = spectrum.point_to_pixel(approx);

    let last_col = col.saturating_add(radius).min(spectrum.cols() - 1);
    let last_row = row.saturating_add(radius).min(spectrum.rows() - 1);
    let col_range = col.saturating_sub(radius)..=last_col;
    let row_range = row.saturating_sub(radius)..=last_row;

    let mut best = [col, row];
    let mut best_value = spectrum.get_unchecked(col, row);

    for r in row_range {
        for c in col_range.clone() {
            let v = spectrum.get_unchecked(c, r);
            if v > best_value {
                best_value = v;
                best = [c, r];
            }
        }
    }

    trace!(
        "peak near ({}, {}) refined from pixel ({}, {}) to ({}, {})",
        approx.x,
        approx.y,
        col,
        row,
        best[0],
        best[1]
    );

    Peak {
        point: spectrum.pixel_to_point(best[0], best[1]),
        value: best_value,
        pixel: best,
    }
}
