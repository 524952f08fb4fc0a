use crate::error::ImageError;
use crate::unit::Unit;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use skewlat_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of samples in an image of this size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// A point in physical (not pixel) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2d {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2d {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single channel field of real valued samples.
///
/// Samples are stored row-major. Besides the pixel grid the image carries its
/// physical geometry: the real width and height covered by the grid, the
/// physical position of the top-left corner and the units of the lateral axes
/// and of the sample values.
///
/// Pixel `(col, row)` covers the physical rectangle starting at
/// `(offset_x + col * dx, offset_y + row * dy)` with `dx = real_width / width`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    size: ImageSize,
    data: Vec<f64>,
    real: [f64; 2],
    offset: [f64; 2],
    xy_unit: Unit,
    z_unit: Unit,
}

impl Image {
    /// Create a new image from sample data.
    ///
    /// The physical extent defaults to one unit per pixel and the offset to zero.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The samples of the image in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the image size or either
    /// dimension is zero, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use skewlat_image::{Image, ImageSize};
    ///
    /// let image = Image::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0.0; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.real_width(), 10.0);
    /// ```
    pub fn new(size: ImageSize, data: Vec<f64>) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::ZeroImageSize(size.width, size.height));
        }

        if data.len() != size.area() {
            return Err(ImageError::InvalidDataLength(data.len(), size.area()));
        }

        Ok(Self {
            size,
            data,
            real: [size.width as f64, size.height as f64],
            offset: [0.0, 0.0],
            xy_unit: Unit::default(),
            z_unit: Unit::default(),
        })
    }

    /// Create a new image with the given size filled with a constant value.
    ///
    /// # Examples
    ///
    /// ```
    /// use skewlat_image::{Image, ImageSize};
    ///
    /// let image = Image::from_size_val([4, 3].into(), 1.5).unwrap();
    /// assert_eq!(image.get(3, 2), Some(1.5));
    /// ```
    pub fn from_size_val(size: ImageSize, val: f64) -> Result<Self, ImageError> {
        Image::new(size, vec![val; size.area()])
    }

    /// Create an image of a new size that inherits the physical geometry and
    /// units of `self`, filled with `val`.
    pub fn new_alike(&self, size: ImageSize, val: f64) -> Result<Self, ImageError> {
        let mut image = Image::from_size_val(size, val)?;
        image.real = self.real;
        image.offset = self.offset;
        image.xy_unit = self.xy_unit.clone();
        image.z_unit = self.z_unit.clone();
        Ok(image)
    }

    /// Set the physical width and height covered by the grid.
    ///
    /// # Errors
    ///
    /// Both extents must be positive and finite.
    pub fn with_real_size(mut self, real_width: f64, real_height: f64) -> Result<Self, ImageError> {
        self.set_real_size(real_width, real_height)?;
        Ok(self)
    }

    /// Set the physical position of the top-left corner.
    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset = [offset_x, offset_y];
        self
    }

    /// Set the lateral and value units.
    pub fn with_units(mut self, xy_unit: Unit, z_unit: Unit) -> Self {
        self.xy_unit = xy_unit;
        self.z_unit = z_unit;
        self
    }

    /// Set the physical width and height covered by the grid in place.
    pub fn set_real_size(&mut self, real_width: f64, real_height: f64) -> Result<(), ImageError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(real_width) || !valid(real_height) {
            return Err(ImageError::InvalidPhysicalExtent(real_width, real_height));
        }
        self.real = [real_width, real_height];
        Ok(())
    }

    /// Set the physical position of the top-left corner in place.
    pub fn set_offset(&mut self, offset_x: f64, offset_y: f64) {
        self.offset = [offset_x, offset_y];
    }

    /// Set the lateral unit in place.
    pub fn set_xy_unit(&mut self, unit: Unit) {
        self.xy_unit = unit;
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Physical width covered by the grid.
    pub fn real_width(&self) -> f64 {
        self.real[0]
    }

    /// Physical height covered by the grid.
    pub fn real_height(&self) -> f64 {
        self.real[1]
    }

    /// Physical horizontal offset of the top-left corner.
    pub fn offset_x(&self) -> f64 {
        self.offset[0]
    }

    /// Physical vertical offset of the top-left corner.
    pub fn offset_y(&self) -> f64 {
        self.offset[1]
    }

    /// Unit of the lateral axes.
    pub fn xy_unit(&self) -> &Unit {
        &self.xy_unit
    }

    /// Unit of the sample values.
    pub fn z_unit(&self) -> &Unit {
        &self.z_unit
    }

    /// Horizontal pixel pitch in physical units.
    pub fn dx(&self) -> f64 {
        self.real[0] / self.size.width as f64
    }

    /// Vertical pixel pitch in physical units.
    pub fn dy(&self) -> f64 {
        self.real[1] / self.size.height as f64
    }

    /// Convert a (fractional) column index to a physical distance from the
    /// left edge, excluding the offset.
    pub fn col_to_x(&self, col: f64) -> f64 {
        col * self.dx()
    }

    /// Convert a (fractional) row index to a physical distance from the top
    /// edge, excluding the offset.
    pub fn row_to_y(&self, row: f64) -> f64 {
        row * self.dy()
    }

    /// Convert a physical distance from the left edge to a fractional column.
    pub fn x_to_col(&self, x: f64) -> f64 {
        x / self.dx()
    }

    /// Convert a physical distance from the top edge to a fractional row.
    pub fn y_to_row(&self, y: f64) -> f64 {
        y / self.dy()
    }

    /// Physical coordinate of a pixel, offset included.
    pub fn pixel_to_point(&self, col: usize, row: usize) -> Point2d {
        Point2d {
            x: self.col_to_x(col as f64) + self.offset[0],
            y: self.row_to_y(row as f64) + self.offset[1],
        }
    }

    /// Nearest pixel of an offset-inclusive physical coordinate, clamped to
    /// the grid. Returns `[col, row]`.
    pub fn point_to_pixel(&self, point: Point2d) -> [usize; 2] {
        let nearest = |v: f64, len: usize| {
            if v.is_nan() {
                return 0;
            }
            v.round().clamp(0.0, (len - 1) as f64) as usize
        };
        [
            nearest(self.x_to_col(point.x - self.offset[0]), self.size.width),
            nearest(self.y_to_row(point.y - self.offset[1]), self.size.height),
        ]
    }

    /// Get the sample at the given column and row.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.size.width || row >= self.size.height {
            return None;
        }
        self.data.get(row * self.size.width + col).copied()
    }

    /// Get the sample at the given column and row or fail with an error.
    pub fn try_get(&self, col: usize, row: usize) -> Result<f64, ImageError> {
        self.get(col, row).ok_or(ImageError::PixelIndexOutOfBounds(
            col,
            row,
            self.size.width,
            self.size.height,
        ))
    }

    /// Get the sample at the given column and row without bounds checks
    /// beyond the slice access.
    pub fn get_unchecked(&self, col: usize, row: usize) -> f64 {
        self.data[row * self.size.width + col]
    }

    /// Get the samples as a slice in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get the samples as a mutable slice in row-major order.
    pub fn as_slice_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the image and return its samples.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Minimum and maximum sample values. NaN samples are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use skewlat_image::Image;
    ///
    /// let image = Image::new([3, 1].into(), vec![2.0, -1.0, 5.0]).unwrap();
    /// assert_eq!(image.min_max(), (-1.0, 5.0));
    /// ```
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Add a constant to every sample in place.
    pub fn add_scalar(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v += value);
    }
}
