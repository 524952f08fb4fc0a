use rayon::prelude::*;

use skewlat_image::Image;

/// Apply a function to each sample of `src`, writing into `dst`, one row per task.
///
/// Both images must have the same size; callers check it.
pub fn par_iter_rows_val(src: &Image, dst: &mut Image, f: impl Fn(&f64, &mut f64) + Send + Sync) {
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each destination pixel for resampling in parallel.
///
/// The closure receives the column and row of the destination pixel. Every
/// output sample depends only on its own coordinates, so the result does not
/// depend on how rows are scheduled.
pub fn par_iter_rows_resample(dst: &mut Image, f: impl Fn(usize, usize, &mut f64) + Send + Sync) {
    let cols = dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(row, dst_chunk)| {
            dst_chunk
                .iter_mut()
                .enumerate()
                .for_each(|(col, dst_pixel)| f(col, row, dst_pixel));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use skewlat_image::ImageError;

    #[test]
    fn test_iter_rows_val() -> Result<(), ImageError> {
        let src = Image::new([2, 2].into(), vec![1.0, 2.0, 3.0, 4.0])?;
        let mut dst = Image::from_size_val(src.size(), 0.0)?;
        par_iter_rows_val(&src, &mut dst, |s, d| *d = *s * 2.0);
        assert_eq!(dst.as_slice(), &[2.0, 4.0, 6.0, 8.0]);
        Ok(())
    }

    #[test]
    fn test_iter_rows_resample_coordinates() -> Result<(), ImageError> {
        let mut dst = Image::from_size_val([3, 2].into(), 0.0)?;
        par_iter_rows_resample(&mut dst, |col, row, d| *d = (10 * row + col) as f64);
        assert_eq!(dst.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        Ok(())
    }
}
