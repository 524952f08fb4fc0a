#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// inter-peak angle measurement.
pub mod angle;

/// display helpers: range clamping and zoomed views.
pub mod display;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;

/// local maximum search in spectra.
pub mod peak;

/// power spectrum computation.
pub mod spectrum;

/// image geometric transformations module.
pub mod warp;
