use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use skewlat_imgproc::display::ZoomMode;
use skewlat_imgproc::interpolation::InterpolationMode;

use crate::session::DisplayMode;

/// Default half-width of the peak search window in pixels.
pub const DEFAULT_RADIUS: usize = 3;

/// An error type for loading and saving settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// Error reading or writing the settings file.
    #[error("Failed to access settings file")]
    Io(#[from] std::io::Error),

    /// Error parsing or producing JSON.
    #[error("Invalid settings JSON")]
    Json(#[from] serde_json::Error),
}

/// Settings of the skew correction that persist between runs.
///
/// Display clamp bounds are stored per display mode under the keys
/// `lower0`..`lower3` and `upper0`..`upper3`, indexed by
/// [`DisplayMode::index`]. Missing keys take their defaults.
///
/// # Example
///
/// ```
/// use skewlat::settings::SkewSettings;
///
/// let settings = SkewSettings::from_json_str(r#"{ "radius": 5, "lower1": 0.5 }"#).unwrap();
/// assert_eq!(settings.radius, 5);
/// assert_eq!(settings.lower1, Some(0.5));
/// assert_eq!(settings.upper1, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewSettings {
    /// Half-width of the peak search window in pixels.
    pub radius: usize,
    /// Resampling kernel for the corrected image.
    pub interpolation: InterpolationMode,
    /// Zoom of the displayed view.
    pub zoom: ZoomMode,
    /// Lower display bound of the raw image.
    pub lower0: Option<f64>,
    /// Lower display bound of the raw spectrum.
    pub lower1: Option<f64>,
    /// Lower display bound of the corrected image.
    pub lower2: Option<f64>,
    /// Lower display bound of the corrected spectrum.
    pub lower3: Option<f64>,
    /// Upper display bound of the raw image.
    pub upper0: Option<f64>,
    /// Upper display bound of the raw spectrum.
    pub upper1: Option<f64>,
    /// Upper display bound of the corrected image.
    pub upper2: Option<f64>,
    /// Upper display bound of the corrected spectrum.
    pub upper3: Option<f64>,
}

impl Default for SkewSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            interpolation: InterpolationMode::Linear,
            zoom: ZoomMode::X1,
            lower0: None,
            lower1: None,
            lower2: None,
            lower3: None,
            upper0: None,
            upper1: None,
            upper2: None,
            upper3: None,
        }
    }
}

impl SkewSettings {
    fn slots(&mut self, mode: DisplayMode) -> Option<(&mut Option<f64>, &mut Option<f64>)> {
        let lower = [
            &mut self.lower0,
            &mut self.lower1,
            &mut self.lower2,
            &mut self.lower3,
        ];
        let upper = [
            &mut self.upper0,
            &mut self.upper1,
            &mut self.upper2,
            &mut self.upper3,
        ];
        lower.into_iter().zip(upper).nth(mode.index())
    }

    /// Display bounds stored for a mode, if both are set.
    pub fn bounds(&self, mode: DisplayMode) -> Option<(f64, f64)> {
        let lower = [self.lower0, self.lower1, self.lower2, self.lower3];
        let upper = [self.upper0, self.upper1, self.upper2, self.upper3];
        let i = mode.index();
        Some((lower.get(i).copied()??, upper.get(i).copied()??))
    }

    /// Store display bounds for a mode.
    pub fn set_bounds(&mut self, mode: DisplayMode, lower: f64, upper: f64) {
        if let Some((lo, hi)) = self.slots(mode) {
            *lo = Some(lower);
            *hi = Some(upper);
        }
    }

    /// Forget the display bounds of a mode so the full range is shown.
    pub fn reset_bounds(&mut self, mode: DisplayMode) {
        if let Some((lo, hi)) = self.slots(mode) {
            *lo = None;
            *hi = None;
        }
    }

    /// Parse settings from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize settings to pretty printed JSON.
    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to the defaults when the
    /// file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Save settings as a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() -> Result<(), SettingsError> {
        let settings = SkewSettings::from_json_str("{}")?;
        assert_eq!(settings, SkewSettings::default());
        assert_eq!(settings.radius, DEFAULT_RADIUS);
        assert_eq!(settings.interpolation, InterpolationMode::Linear);
        assert_eq!(settings.bounds(DisplayMode::Raw), None);
        Ok(())
    }

    #[test]
    fn bounds_per_mode() {
        let mut settings = SkewSettings::default();
        settings.set_bounds(DisplayMode::CorrectedSpectrum, 1.0, 4.0);
        assert_eq!(settings.lower3, Some(1.0));
        assert_eq!(settings.upper3, Some(4.0));
        assert_eq!(
            settings.bounds(DisplayMode::CorrectedSpectrum),
            Some((1.0, 4.0))
        );
        assert_eq!(settings.bounds(DisplayMode::Corrected), None);

        settings.lower2 = Some(0.0);
        assert_eq!(settings.bounds(DisplayMode::Corrected), None);

        settings.reset_bounds(DisplayMode::CorrectedSpectrum);
        assert_eq!(settings.bounds(DisplayMode::CorrectedSpectrum), None);
    }

    #[test]
    fn bounds_keys_follow_mode_index() -> Result<(), SettingsError> {
        let modes = [
            DisplayMode::Raw,
            DisplayMode::Spectrum,
            DisplayMode::Corrected,
            DisplayMode::CorrectedSpectrum,
        ];
        for mode in modes {
            let mut settings = SkewSettings::default();
            settings.set_bounds(mode, -1.0, 1.0);
            let json: serde_json::Value = serde_json::from_str(&settings.to_json_string()?)?;
            let i = mode.index();
            assert_eq!(json[format!("lower{i}")], serde_json::json!(-1.0));
            assert_eq!(json[format!("upper{i}")], serde_json::json!(1.0));
            for other in modes.iter().filter(|m| **m != mode) {
                assert_eq!(settings.bounds(*other), None);
            }
        }
        Ok(())
    }

    #[test]
    fn enums_by_name() -> Result<(), SettingsError> {
        let settings =
            SkewSettings::from_json_str(r#"{ "interpolation": "BSpline", "zoom": "X2" }"#)?;
        assert_eq!(settings.interpolation, InterpolationMode::BSpline);
        assert_eq!(settings.zoom, ZoomMode::X2);
        assert!(SkewSettings::from_json_str(r#"{ "zoom": "X3" }"#).is_err());
        Ok(())
    }

    #[test]
    fn save_and_load() -> Result<(), SettingsError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("skew_lattice.json");

        assert_eq!(SkewSettings::load(&path)?, SkewSettings::default());

        let mut settings = SkewSettings {
            radius: 7,
            zoom: ZoomMode::X2,
            ..Default::default()
        };
        settings.set_bounds(DisplayMode::Spectrum, -1.0, 2.5);
        settings.save(&path)?;

        assert_eq!(SkewSettings::load(&path)?, settings);
        Ok(())
    }

    #[test]
    fn load_invalid_json() -> Result<(), SettingsError> {
        let file = tempfile::NamedTempFile::new()?;
        std::fs::write(file.path(), "radius = 3")?;
        assert!(matches!(
            SkewSettings::load(file.path()),
            Err(SettingsError::Json(_))
        ));
        Ok(())
    }
}
