use std::collections::BTreeMap;

use skewlat_image::Image;

use crate::skew::SkewParameters;

/// Title given to the corrected image.
pub const OUTPUT_TITLE: &str = "Skewed";

/// Tag identifying the operation that produced the output.
pub const PROVENANCE: &str = "proc::skew_lattice";

/// Metadata key holding the title of the source image.
pub const META_SOURCE_TITLE: &str = "Source Title";

/// Metadata key holding the horizontal skew.
pub const META_X_SKEW: &str = "X Skew (°)";

/// Metadata key holding the vertical skew.
pub const META_Y_SKEW: &str = "Y Skew (°)";

/// The corrected image handed back to the host, with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SkewOutput {
    /// The corrected image.
    pub image: Image,
    /// Title of the new image.
    pub title: String,
    /// Metadata entries. Entries of the source are kept and the skew entries
    /// added on top.
    pub metadata: BTreeMap<String, String>,
    /// Provenance tag of the operation.
    pub provenance: &'static str,
}

impl SkewOutput {
    /// Package a corrected image.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use skewlat::image::Image;
    /// use skewlat::output::{SkewOutput, META_X_SKEW};
    /// use skewlat::skew::SkewParameters;
    ///
    /// let image = Image::from_size_val([2, 2].into(), 0.0).unwrap();
    /// let params = SkewParameters::new(1.5, -2.0).unwrap();
    /// let output = SkewOutput::new(image, params, "scan", BTreeMap::new());
    ///
    /// assert_eq!(output.metadata[META_X_SKEW], "1.50000");
    /// ```
    pub fn new(
        image: Image,
        params: SkewParameters,
        source_title: &str,
        mut metadata: BTreeMap<String, String>,
    ) -> Self {
        metadata.insert(META_SOURCE_TITLE.to_string(), source_title.to_string());
        metadata.insert(META_X_SKEW.to_string(), format!("{:.5}", params.x_skew()));
        metadata.insert(META_Y_SKEW.to_string(), format!("{:.5}", params.y_skew()));

        Self {
            image,
            title: OUTPUT_TITLE.to_string(),
            metadata,
            provenance: PROVENANCE,
        }
    }
}
