//! Geometric image transformations using affine maps.
//!
//! This module provides:
//!
//! - [`AffineMap`], a 2x2 linear part plus translation with determinant,
//!   inverse and composition
//! - [`warp_affine`] and [`resample_affine`], which fill every destination
//!   pixel by mapping it back into the source through an inverse map
//!
//! # Examples
//!
//! Shearing an image horizontally:
//!
//! ```
//! use skewlat_image::Image;
//! use skewlat_imgproc::interpolation::InterpolationMode;
//! use skewlat_imgproc::warp::{resample_affine, AffineMap};
//!
//! let src = Image::from_size_val([8, 8].into(), 1.0).unwrap();
//! let forward = AffineMap::new(1.0, 0.0, 0.25, 1.0, 0.0, 0.0);
//! let inverse = forward.invert().unwrap();
//!
//! let dst = resample_affine(&src, [10, 8].into(), &inverse, InterpolationMode::Linear, -1.0)
//!     .unwrap();
//! assert_eq!(dst.size().width, 10);
//! ```

mod affine;
mod matrix;

pub use affine::{fold_index, resample_affine, warp_affine};
pub use matrix::AffineMap;

use skewlat_image::ImageError;

/// Errors raised by geometric transformations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WarpError {
    /// The linear part of the map cannot be inverted.
    #[error("affine map is singular (determinant {0})")]
    SingularTransform(f64),

    /// Error creating or accessing an image.
    #[error(transparent)]
    Image(#[from] ImageError),
}
