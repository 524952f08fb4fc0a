use log::debug;
use rayon::prelude::*;

use super::InterpolationMode;

/// Convert samples into interpolation coefficients in place.
///
/// Kernels without an interpolating basis reconstruct values as a weighted sum
/// of coefficients, not of samples. At integer coordinates the reconstruction
/// reduces to the three-tap filter `(p, q, p)` given by the kernel weights at
/// zero offset, so the coefficients are the solution of the corresponding
/// tridiagonal system along every row and then every column. Boundaries are
/// half-sample symmetric (`c[-1] = c[0]`, `c[n] = c[n - 1]`), which is the
/// same extension the resampler applies when it folds neighborhood indices.
///
/// Kernels with an interpolating basis leave the data untouched.
///
/// # Arguments
///
/// * `data` - Row-major samples, replaced by coefficients.
/// * `width` - Number of columns.
/// * `height` - Number of rows.
/// * `interpolation` - The kernel the coefficients are resolved for.
pub fn resolve_coefficients_2d(
    data: &mut [f64],
    width: usize,
    height: usize,
    interpolation: InterpolationMode,
) {
    if interpolation.has_interpolating_basis() || width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!(data.len(), width * height);

    let w = interpolation.weights(0.0);
    let (off, diag) = (w[0], w[1]);
    debug!(
        "resolving {:?} coefficients for a {}x{} field",
        interpolation, width, height
    );

    // rows
    data.par_chunks_exact_mut(width)
        .for_each(|row| solve_symmetric_tridiagonal(row, off, diag));

    // columns, solved as rows of the transposed field
    let mut transposed = vec![0.0; width * height];
    transpose(data, &mut transposed, width, height);
    transposed
        .par_chunks_exact_mut(height)
        .for_each(|col| solve_symmetric_tridiagonal(col, off, diag));
    transpose(&transposed, data, height, width);
}

fn transpose(src: &[f64], dst: &mut [f64], width: usize, height: usize) {
    for (r, row) in src.chunks_exact(width).enumerate() {
        for (c, &v) in row.iter().enumerate() {
            dst[c * height + r] = v;
        }
    }
}

/// Solve `off * c[i-1] + diag * c[i] + off * c[i+1] = rhs[i]` with mirrored
/// ends, overwriting `rhs` with `c` (Thomas algorithm).
fn solve_symmetric_tridiagonal(rhs: &mut [f64], off: f64, diag: f64) {
    let n = rhs.len();
    match n {
        0 => return,
        1 => {
            rhs[0] /= diag + 2.0 * off;
            return;
        }
        _ => {}
    }

    let d = |i: usize| {
        if i == 0 || i == n - 1 {
            diag + off
        } else {
            diag
        }
    };

    let mut upper = vec![0.0; n];
    let mut m = d(0);
    upper[0] = off / m;
    rhs[0] /= m;
    for i in 1..n {
        m = d(i) - off * upper[i - 1];
        upper[i] = off / m;
        rhs[i] = (rhs[i] - off * rhs[i - 1]) / m;
    }
    for i in (0..n - 1).rev() {
        rhs[i] -= upper[i] * rhs[i + 1];
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_coefficients_2d, solve_symmetric_tridiagonal};
    use crate::interpolation::InterpolationMode;
    use approx::assert_relative_eq;

    fn reconstruct_1d(c: &[f64], i: usize, mode: InterpolationMode) -> f64 {
        let n = c.len() as isize;
        let w = mode.weights(0.0);
        let at = |k: isize| c[k.clamp(0, n - 1) as usize];
        let i = i as isize;
        w[0] * at(i - 1) + w[1] * at(i) + w[2] * at(i + 1)
    }

    #[test]
    fn tridiagonal_reproduces_rhs() {
        let samples = [3.0, -1.0, 4.0, 1.0, -5.0, 9.0];
        for mode in [InterpolationMode::BSpline, InterpolationMode::OMoms] {
            let w = mode.weights(0.0);
            let mut c = samples;
            solve_symmetric_tridiagonal(&mut c, w[0], w[1]);
            for (i, s) in samples.iter().enumerate() {
                assert_relative_eq!(reconstruct_1d(&c, i, mode), *s, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn single_sample_is_its_own_coefficient() {
        let mut c = [2.5];
        let w = InterpolationMode::BSpline.weights(0.0);
        solve_symmetric_tridiagonal(&mut c, w[0], w[1]);
        assert_relative_eq!(c[0], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn constant_field_is_fixed_point() {
        let mut data = vec![1.25; 5 * 3];
        resolve_coefficients_2d(&mut data, 5, 3, InterpolationMode::OMoms);
        data.iter()
            .for_each(|v| assert_relative_eq!(*v, 1.25, epsilon = 1e-12));
    }

    #[test]
    fn interpolating_basis_untouched() {
        let mut data: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let expected = data.clone();
        resolve_coefficients_2d(&mut data, 4, 3, InterpolationMode::Key);
        assert_eq!(data, expected);
    }
}
