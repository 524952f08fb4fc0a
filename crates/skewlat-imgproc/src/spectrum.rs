//! Centered modulus spectra of images.
//!
//! The discrete Fourier transform itself sits behind the
//! [`FourierTransform2d`] trait so hosts can plug in their own primitive;
//! [`RustFft2d`] is the default implementation.

use std::sync::Arc;

use log::debug;
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};

use skewlat_image::{Image, ImageError};

/// Errors raised while computing spectra.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SpectrumError {
    /// Failure reported by a Fourier transform implementation.
    #[error("fourier transform failed: {0}")]
    Transform(String),

    /// Error creating or accessing an image.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Window applied to the data before transforming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// No windowing
    None,
    /// Hann window
    #[default]
    Hann,
}

impl WindowFunction {
    /// Window coefficients for `n` samples.
    pub fn coefficients(&self, n: usize) -> Vec<f64> {
        match self {
            WindowFunction::None => vec![1.0; n],
            WindowFunction::Hann if n <= 1 => vec![1.0; n],
            WindowFunction::Hann => {
                let denom = (n - 1) as f64;
                (0..n)
                    .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / denom).cos())
                    .collect()
            }
        }
    }
}

/// A forward two dimensional discrete Fourier transform of a real image.
pub trait FourierTransform2d {
    /// Transform `image` and return the real and imaginary planes, both of
    /// the same size as the input.
    ///
    /// # Arguments
    ///
    /// * `image` - The real valued input.
    /// * `window` - The window applied separably along rows and columns.
    /// * `subtract_mean` - Remove the mean value before windowing.
    fn forward(
        &self,
        image: &Image,
        window: WindowFunction,
        subtract_mean: bool,
    ) -> Result<(Image, Image), SpectrumError>;
}

/// [`FourierTransform2d`] backed by `rustfft`, scaled by `1 / sqrt(W * H)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustFft2d;

impl RustFft2d {
    fn transform_rows(fft: &Arc<dyn Fft<f64>>, buffer: &mut [Complex<f64>], len: usize) {
        buffer
            .par_chunks_exact_mut(len)
            .for_each(|row| fft.process(row));
    }
}

impl FourierTransform2d for RustFft2d {
    fn forward(
        &self,
        image: &Image,
        window: WindowFunction,
        subtract_mean: bool,
    ) -> Result<(Image, Image), SpectrumError> {
        let (cols, rows) = (image.cols(), image.rows());
        let n = (cols * rows) as f64;

        let mean = if subtract_mean {
            image.as_slice().iter().sum::<f64>() / n
        } else {
            0.0
        };
        let wx = window.coefficients(cols);
        let wy = window.coefficients(rows);

        let mut buffer: Vec<Complex<f64>> = image
            .as_slice()
            .chunks_exact(cols)
            .zip(wy.iter())
            .flat_map(|(row, &wy)| {
                row.iter()
                    .zip(wx.iter())
                    .map(move |(&v, &wx)| Complex::new((v - mean) * wx * wy, 0.0))
            })
            .collect();

        let mut planner = FftPlanner::<f64>::new();
        let row_fft = planner.plan_fft_forward(cols);
        let col_fft = planner.plan_fft_forward(rows);

        Self::transform_rows(&row_fft, &mut buffer, cols);

        let mut transposed = vec![Complex::new(0.0, 0.0); buffer.len()];
        for (r, row) in buffer.chunks_exact(cols).enumerate() {
            for (c, v) in row.iter().enumerate() {
                transposed[c * rows + r] = *v;
            }
        }
        Self::transform_rows(&col_fft, &mut transposed, rows);

        let scale = 1.0 / n.sqrt();
        let mut re = image.new_alike(image.size(), 0.0)?;
        let mut im = image.new_alike(image.size(), 0.0)?;
        for (c, col) in transposed.chunks_exact(rows).enumerate() {
            for (r, v) in col.iter().enumerate() {
                re.as_slice_mut()[r * cols + c] = v.re * scale;
                im.as_slice_mut()[r * cols + c] = v.im * scale;
            }
        }

        Ok((re, im))
    }
}

/// Per-sample modulus `hypot(re, im)` of two planes.
///
/// The result inherits the geometry of `re`.
pub fn modulus(re: &Image, im: &Image) -> Result<Image, SpectrumError> {
    if re.size() != im.size() {
        return Err(ImageError::InvalidImageSize(re.cols(), re.rows(), im.cols(), im.rows()).into());
    }

    let mut out = re.new_alike(re.size(), 0.0)?;
    out.as_slice_mut()
        .iter_mut()
        .zip(re.as_slice().iter().zip(im.as_slice()))
        .for_each(|(o, (r, i))| *o = r.hypot(*i));

    Ok(out)
}

/// Swap quadrants in place so that the zero frequency sample moves from
/// `(0, 0)` to `(W / 2, H / 2)`.
///
/// # Examples
///
/// ```
/// use skewlat_image::Image;
/// use skewlat_imgproc::spectrum::humanize;
///
/// let mut image = Image::new([2, 2].into(), vec![1.0, 0.0, 0.0, 0.0]).unwrap();
/// humanize(&mut image);
/// assert_eq!(image.as_slice(), &[0.0, 0.0, 0.0, 1.0]);
/// ```
pub fn humanize(image: &mut Image) {
    let (cols, rows) = (image.cols(), image.rows());
    let (sx, sy) = (cols / 2, rows / 2);
    let src = image.as_slice().to_vec();
    let dst = image.as_slice_mut();
    for (r, row) in src.chunks_exact(cols).enumerate() {
        let rr = (r + sy) % rows;
        for (c, v) in row.iter().enumerate() {
            dst[rr * cols + (c + sx) % cols] = *v;
        }
    }
}

/// Turn a modulus plane into a displayable spectrum, in place.
///
/// Centers the zero frequency, switches the geometry to reciprocal space
/// (`1 / pitch` extents, inverted lateral unit, offsets placing the zero
/// frequency at the physical origin) and shifts the values so the minimum is
/// zero.
pub fn fft_postprocess(image: &mut Image) -> Result<(), SpectrumError> {
    humanize(image);

    let xy_unit = image.xy_unit().powi(-1);
    image.set_xy_unit(xy_unit);

    let (xreal, yreal) = (1.0 / image.dx(), 1.0 / image.dy());
    image.set_real_size(xreal, yreal)?;

    let xoff = -image.col_to_x(image.cols() as f64 / 2.0);
    let yoff = -image.row_to_y(image.rows() as f64 / 2.0);
    image.set_offset(xoff, yoff);

    let (min, _) = image.min_max();
    image.add_scalar(-min);

    Ok(())
}

/// Compute the centered modulus spectrum of `image` with a custom transform.
///
/// The transform is run with a Hann window and mean subtraction.
pub fn build_spectrum_with<F: FourierTransform2d + ?Sized>(
    image: &Image,
    fft: &F,
) -> Result<Image, SpectrumError> {
    debug!(
        "building spectrum of a {}x{} image",
        image.cols(),
        image.rows()
    );
    let (re, im) = fft.forward(image, WindowFunction::Hann, true)?;
    let mut spectrum = modulus(&re, &im)?;
    fft_postprocess(&mut spectrum)?;
    Ok(spectrum)
}

/// Compute the centered modulus spectrum of `image` using [`RustFft2d`].
///
/// # Example
///
/// ```
/// use skewlat_image::Image;
/// use skewlat_imgproc::spectrum::build_spectrum;
///
/// let image = Image::from_size_val([8, 8].into(), 1.0).unwrap();
/// let spectrum = build_spectrum(&image).unwrap();
///
/// assert_eq!(spectrum.size(), image.size());
/// assert_eq!(spectrum.min_max().0, 0.0);
/// ```
pub fn build_spectrum(image: &Image) -> Result<Image, SpectrumError> {
    build_spectrum_with(image, &RustFft2d)
}
