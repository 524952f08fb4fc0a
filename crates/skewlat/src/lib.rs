#![deny(missing_docs)]
//! Lattice skew correction for scanning probe microscopy images.
//!
//! Lateral drift during a scan shears the imaged lattice. The correction
//! works on the spectrum of the image: four adjacent lattice peaks are marked,
//! the angles between them are measured and two skew angles are tuned until
//! the lattice is regular again. The image is then resampled onto a new
//! canvas through the resulting shear.
//!
//! The workflow is driven through [`session::SkewSession`], an immutable
//! state value where every update returns a new session.

#[doc(inline)]
pub use skewlat_image as image;

#[doc(inline)]
pub use skewlat_imgproc as imgproc;

mod error;
pub use error::SkewError;

/// host facing result of a correction.
pub mod output;

/// interactive correction state.
pub mod session;

/// persisted settings.
pub mod settings;

/// shear model and image correction.
pub mod skew;
