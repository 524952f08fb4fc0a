use skewlat_image::ImageError;
use skewlat_imgproc::{spectrum::SpectrumError, warp::WarpError};

/// An error type for the skew correction workflow.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SkewError {
    /// Skew angle outside of the supported range or not finite.
    #[error("Skew angle {0} is outside of [-{1}, {1}] degrees")]
    InvalidSkewAngle(f64, f64),

    /// Peak slot index out of range.
    #[error("Peak index {0} is out of range, the lattice uses 4 peaks")]
    PeakIndexOutOfRange(usize),

    /// Peak already selected at the same pixel.
    #[error("Peak at pixel ({0}, {1}) is already selected as peak {2}")]
    DuplicatePeak(usize, usize, usize),

    /// Error resampling the image.
    #[error(transparent)]
    Warp(#[from] WarpError),

    /// Error computing a spectrum.
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),

    /// Error creating or accessing an image.
    #[error(transparent)]
    Image(#[from] ImageError),
}
