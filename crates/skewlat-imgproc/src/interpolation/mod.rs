//! Separable interpolation kernels used when resampling images.
//!
//! Every kernel is described by its support size (the number of neighboring
//! samples per axis it needs) and by whether its basis is interpolating. An
//! interpolating basis reproduces the samples at integer coordinates, so it
//! can be applied to the raw samples directly. The spline bases (`BSpline`,
//! `OMoms`) are not interpolating: the samples must first be converted into
//! expansion coefficients with [`resolve_coefficients_2d`].
//!
//! # Interpolation Modes
//!
//! - **Round**: nearest sample, no smoothing
//! - **Linear**: bilinear interpolation between adjacent samples
//! - **Key**: cubic convolution (Keys, a = -1/2)
//! - **Schaum**: cubic Lagrange interpolation
//! - **BSpline**: cubic B-spline, needs the coefficient pre-pass
//! - **OMoms**: cubic o-MOMS, needs the coefficient pre-pass

mod coefficients;
mod interpolate;

pub use coefficients::resolve_coefficients_2d;
pub use interpolate::{interpolate_2d, InterpolationMode, MAX_SUPPORT};
