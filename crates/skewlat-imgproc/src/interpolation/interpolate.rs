use serde::{Deserialize, Serialize};

/// Largest support size of any kernel.
pub const MAX_SUPPORT: usize = 4;

/// Interpolation kernel used by the resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Nearest sample
    Round,
    /// Bilinear interpolation
    #[default]
    Linear,
    /// Keys cubic convolution
    Key,
    /// Schaum cubic interpolation
    Schaum,
    /// Cubic B-spline approximation
    BSpline,
    /// Cubic o-MOMS approximation
    OMoms,
}

impl InterpolationMode {
    /// Number of samples per axis the kernel reads around a coordinate.
    pub fn support_size(&self) -> usize {
        match self {
            InterpolationMode::Round | InterpolationMode::Linear => 2,
            InterpolationMode::Key
            | InterpolationMode::Schaum
            | InterpolationMode::BSpline
            | InterpolationMode::OMoms => 4,
        }
    }

    /// Whether the kernel reproduces samples at integer coordinates.
    ///
    /// Kernels returning `false` operate on coefficients produced by
    /// [`super::resolve_coefficients_2d`] rather than on raw samples.
    pub fn has_interpolating_basis(&self) -> bool {
        !matches!(self, InterpolationMode::BSpline | InterpolationMode::OMoms)
    }

    /// Neighborhood index range relative to the floor of the coordinate.
    ///
    /// A kernel of support `s` reads indices `floor(x) + from ..= floor(x) + to`.
    pub fn support_range(&self) -> (isize, isize) {
        let s = self.support_size() as isize;
        (-((s - 1) / 2), s / 2)
    }

    /// Kernel weights for the fractional offset `x` in `[0, 1)`.
    ///
    /// Only the first [`Self::support_size`] entries are meaningful, the rest
    /// are zero. Weight `k` applies to sample `floor(x) + from + k`, with
    /// `from` given by [`Self::support_range`].
    pub fn weights(&self, x: f64) -> [f64; MAX_SUPPORT] {
        match self {
            InterpolationMode::Round => {
                let w0 = if x < 0.5 { 1.0 } else { 0.0 };
                [w0, 1.0 - w0, 0.0, 0.0]
            }
            InterpolationMode::Linear => [1.0 - x, x, 0.0, 0.0],
            InterpolationMode::Key => [
                (-0.5 + (1.0 - x / 2.0) * x) * x,
                1.0 + (-2.5 + 1.5 * x) * x * x,
                (0.5 + (2.0 - 1.5 * x) * x) * x,
                (-0.5 + x / 2.0) * x * x,
            ],
            InterpolationMode::Schaum => [
                -x * (x - 1.0) * (x - 2.0) / 6.0,
                (x * x - 1.0) * (x - 2.0) / 2.0,
                -x * (x + 1.0) * (x - 2.0) / 2.0,
                x * (x * x - 1.0) / 6.0,
            ],
            InterpolationMode::BSpline => {
                let xm = 1.0 - x;
                [
                    xm * xm * xm / 6.0,
                    (4.0 + (-6.0 + 3.0 * x) * x * x) / 6.0,
                    (1.0 + (3.0 + (3.0 - 3.0 * x) * x) * x) / 6.0,
                    x * x * x / 6.0,
                ]
            }
            InterpolationMode::OMoms => [
                4.0 / 21.0 + (-11.0 / 21.0 + (0.5 - x / 6.0) * x) * x,
                13.0 / 21.0 + (1.0 / 14.0 + (-1.0 + x / 2.0) * x) * x,
                4.0 / 21.0 + (3.0 / 7.0 + (0.5 - x / 2.0) * x) * x,
                (1.0 / 42.0 + x * x / 6.0) * x,
            ],
        }
    }
}

/// Interpolate a value from a `support x support` neighborhood.
///
/// # Arguments
///
/// * `x` - The horizontal fractional offset in `[0, 1)`.
/// * `y` - The vertical fractional offset in `[0, 1)`.
/// * `neighborhood` - Row-major samples (or coefficients) of the neighborhood,
///   `support * support` values.
/// * `interpolation` - The kernel to apply.
///
/// # Returns
///
/// The interpolated value.
pub fn interpolate_2d(
    x: f64,
    y: f64,
    neighborhood: &[f64],
    interpolation: InterpolationMode,
) -> f64 {
    let support = interpolation.support_size();
    debug_assert!(neighborhood.len() >= support * support);

    let wx = interpolation.weights(x);
    let wy = interpolation.weights(y);

    neighborhood
        .chunks_exact(support)
        .take(support)
        .zip(wy.iter())
        .map(|(row, &wy)| {
            let v = row
                .iter()
                .zip(wx.iter())
                .map(|(&c, &wx)| c * wx)
                .sum::<f64>();
            v * wy
        })
        .sum()
}
