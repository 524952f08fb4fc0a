#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation with physical extents, offsets and units.
pub mod image;

/// Error types for the image module.
pub mod error;

/// physical units attached to image axes and values.
pub mod unit;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize, Point2d};
pub use crate::unit::Unit;
