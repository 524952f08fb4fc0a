use rand::Rng;

use skewlat::image::Image;
use skewlat::imgproc::interpolation::InterpolationMode;
use skewlat::imgproc::warp::AffineMap;
use skewlat::skew::{background_fill, correct_image, skew_image, SkewModel, SkewParameters};
use skewlat::SkewError;

const KERNELS: [InterpolationMode; 6] = [
    InterpolationMode::Round,
    InterpolationMode::Linear,
    InterpolationMode::Key,
    InterpolationMode::Schaum,
    InterpolationMode::BSpline,
    InterpolationMode::OMoms,
];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_image(width: usize, height: usize) -> Result<Image, SkewError> {
    let mut rng = rand::rng();
    let data = (0..width * height)
        .map(|_| rng.random_range(-1.0..1.0))
        .collect();
    Ok(Image::new([width, height].into(), data)?)
}

fn angle_grid() -> impl Iterator<Item = (f64, f64)> {
    (-6..=6).flat_map(|i| (-6..=6).map(move |j| (i as f64 * 5.0, j as f64 * 5.0)))
}

#[test]
fn zero_skew_reproduces_source() -> Result<(), SkewError> {
    init_logger();
    let src = random_image(23, 17)?;

    for mode in KERNELS {
        let corrected = skew_image(&src, SkewParameters::default(), mode)?;
        assert_eq!(corrected.size(), src.size());

        let tolerance = if mode.has_interpolating_basis() { 0.0 } else { 1e-9 };
        for (a, b) in corrected.as_slice().iter().zip(src.as_slice()) {
            assert!((a - b).abs() <= tolerance, "{mode:?}: {a} != {b}");
        }
    }
    Ok(())
}

#[test]
fn inverse_composes_to_identity() -> Result<(), SkewError> {
    for (x, y) in angle_grid() {
        let model = SkewModel::new(SkewParameters::new(x, y)?, [128, 96].into())?;
        let id = model.inverse().compose(model.forward());
        assert!(id.approx_eq(&AffineMap::IDENTITY, 1e-12), "({x}, {y}): {id:?}");
        let id = model.forward().compose(model.inverse());
        assert!(id.approx_eq(&AffineMap::IDENTITY, 1e-12), "({x}, {y}): {id:?}");
    }
    Ok(())
}

#[test]
fn canvas_grows_with_skew() -> Result<(), SkewError> {
    let size = [100, 60].into();
    for fixed in [-25.0, 0.0, 12.5] {
        let mut prev_w = 0;
        let mut prev_h = 0;
        for step in 0..=30 {
            let angle = step as f64;
            for sign in [1.0, -1.0] {
                let w = SkewModel::new(SkewParameters::new(sign * angle, fixed)?, size)?
                    .dst_size()
                    .width;
                let h = SkewModel::new(SkewParameters::new(fixed, sign * angle)?, size)?
                    .dst_size()
                    .height;
                assert!(w >= prev_w, "width shrank at {angle}");
                assert!(h >= prev_h, "height shrank at {angle}");
            }
            prev_w = SkewModel::new(SkewParameters::new(angle, fixed)?, size)?
                .dst_size()
                .width;
            prev_h = SkewModel::new(SkewParameters::new(fixed, angle)?, size)?
                .dst_size()
                .height;
        }
    }
    Ok(())
}

#[test]
fn outside_pixels_get_fill_value() -> Result<(), SkewError> {
    init_logger();
    let src = random_image(31, 24)?;
    let fill = background_fill(&src);
    let (w, h) = (src.width() as f64, src.height() as f64);

    for (x, y) in [(20.0, 0.0), (0.0, -25.0), (-12.0, 18.0), (30.0, 30.0)] {
        let model = SkewModel::new(SkewParameters::new(x, y)?, src.size())?;
        let m = model.inverse().with_pixel_center_correction();

        for mode in KERNELS {
            let corrected = correct_image(&src, &model, mode)?;
            let mut outside = 0;
            for row in 0..corrected.height() {
                for col in 0..corrected.width() {
                    let (sx, sy) = m.transform_point(col as f64, row as f64);
                    if sx < 0.0 || sx >= w || sy < 0.0 || sy >= h {
                        outside += 1;
                        assert_eq!(corrected.get(col, row), Some(fill));
                    }
                }
            }
            assert!(outside > 0);
        }
    }
    Ok(())
}

#[test]
fn fill_below_data_range() -> Result<(), SkewError> {
    let src = random_image(16, 16)?;
    let (min, _) = src.min_max();
    assert!(background_fill(&src) < min);
    Ok(())
}

#[test]
fn opposite_single_axis_shears_cancel() -> Result<(), SkewError> {
    for angle in [-30.0, -7.5, 3.0, 22.0] {
        let x = SkewParameters::new(angle, 0.0)?.shear();
        let x_back = SkewParameters::new(-angle, 0.0)?.shear();
        assert!(x_back.compose(&x).approx_eq(&AffineMap::IDENTITY, 1e-12));

        let y = SkewParameters::new(0.0, angle)?.shear();
        let y_back = SkewParameters::new(0.0, -angle)?.shear();
        assert!(y_back.compose(&y).approx_eq(&AffineMap::IDENTITY, 1e-12));
    }
    Ok(())
}

#[test]
fn resampling_is_deterministic() -> Result<(), SkewError> {
    let src = random_image(64, 48)?;
    let params = SkewParameters::new(11.0, -7.0)?;
    for mode in [InterpolationMode::Linear, InterpolationMode::OMoms] {
        let a = skew_image(&src, params, mode)?;
        let b = skew_image(&src, params, mode)?;
        assert_eq!(a, b);
    }
    Ok(())
}
