/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when one of the image dimensions is zero.
    #[error("Image size must be at least 1x1, got {0}x{1}")]
    ZeroImageSize(usize, usize),

    /// Error when two images are expected to have the same size.
    #[error("Image size mismatch: {0}x{1} vs {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the physical extent is not strictly positive and finite.
    #[error("Physical extent must be positive and finite, got ({0}, {1})")]
    InvalidPhysicalExtent(f64, f64),
}
