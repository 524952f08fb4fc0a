use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info};

use skewlat_image::{Image, Point2d};
use skewlat_imgproc::angle::{measure_angles, LatticeAngles};
use skewlat_imgproc::display::{clamp_range, zoom_view};
use skewlat_imgproc::peak::{locate_peak, Peak};
use skewlat_imgproc::spectrum::build_spectrum;

use crate::output::SkewOutput;
use crate::settings::SkewSettings;
use crate::skew::{correct_image, SkewModel, SkewParameters};
use crate::SkewError;

/// Number of lattice peaks that define the angles.
pub const PEAK_COUNT: usize = 4;

/// Which of the four images of a session is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// The source image
    #[default]
    Raw,
    /// The spectrum of the source image
    Spectrum,
    /// The corrected image
    Corrected,
    /// The spectrum of the corrected image
    CorrectedSpectrum,
}

impl DisplayMode {
    /// Index of the mode in the settings keys.
    pub fn index(&self) -> usize {
        match self {
            DisplayMode::Raw => 0,
            DisplayMode::Spectrum => 1,
            DisplayMode::Corrected => 2,
            DisplayMode::CorrectedSpectrum => 3,
        }
    }
}

/// Up to four selected lattice peaks, in selection order.
///
/// A partially filled set is valid; angles need all four peaks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeakSet {
    peaks: [Option<Peak>; PEAK_COUNT],
}

impl PeakSet {
    /// The peak in slot `idx`.
    pub fn get(&self, idx: usize) -> Option<&Peak> {
        self.peaks.get(idx)?.as_ref()
    }

    /// Store a peak in slot `idx`.
    ///
    /// # Errors
    ///
    /// The slot must exist and no other slot may hold a peak at the same
    /// pixel.
    pub fn set(&mut self, idx: usize, peak: Peak) -> Result<(), SkewError> {
        if idx >= PEAK_COUNT {
            return Err(SkewError::PeakIndexOutOfRange(idx));
        }
        let duplicate = self
            .peaks
            .iter()
            .enumerate()
            .find(|(i, p)| *i != idx && p.is_some_and(|p| p.pixel == peak.pixel));
        if let Some((other, _)) = duplicate {
            return Err(SkewError::DuplicatePeak(peak.pixel[0], peak.pixel[1], other));
        }
        self.peaks[idx] = Some(peak);
        Ok(())
    }

    /// Remove every peak.
    pub fn clear(&mut self) {
        self.peaks = [None; PEAK_COUNT];
    }

    /// Number of selected peaks.
    pub fn len(&self) -> usize {
        self.peaks.iter().flatten().count()
    }

    /// Whether no peak is selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether all four peaks are selected.
    pub fn is_full(&self) -> bool {
        self.len() == PEAK_COUNT
    }

    /// Iterate over the slots in order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Peak>> {
        self.peaks.iter().map(Option::as_ref)
    }

    /// Positions of the four peaks, if all are selected.
    pub fn points(&self) -> Option<[Point2d; PEAK_COUNT]> {
        let [p1, p2, p3, p4] = self.peaks;
        Some([p1?.point, p2?.point, p3?.point, p4?.point])
    }

    /// Angles between the peaks, if all are selected.
    pub fn angles(&self) -> Option<LatticeAngles> {
        self.points().map(|points| measure_angles(&points))
    }

    /// Search every selected peak again on `spectrum`, starting from its
    /// stored position.
    ///
    /// Refined peaks may land on the same pixel; their angles are then
    /// reported as unavailable.
    fn refined(&self, spectrum: &Image, radius: usize) -> Self {
        let mut peaks = self.peaks;
        for peak in peaks.iter_mut().flatten() {
            *peak = locate_peak(spectrum, peak.point, radius);
        }
        Self { peaks }
    }
}

/// The state of an interactive skew correction.
///
/// A session is an immutable value: every update returns a new session and
/// leaves the original untouched. The images are shared between sessions, so
/// updates only recompute what depends on the changed input.
///
/// Peaks are selected on the corrected spectrum. Changing the skew recomputes
/// the corrected image and its spectrum, then searches every selected peak
/// again so the measured angles follow the correction.
///
/// # Example
///
/// ```
/// use skewlat::image::Image;
/// use skewlat::session::{DisplayMode, SkewSession};
/// use skewlat::settings::SkewSettings;
/// use skewlat::skew::SkewParameters;
///
/// let image = Image::new([32, 32].into(), (0..1024).map(|v| (v % 7) as f64).collect()).unwrap();
/// let session = SkewSession::new(image, SkewSettings::default()).unwrap();
///
/// let session = session
///     .with_skew(SkewParameters::new(5.0, 0.0).unwrap())
///     .unwrap()
///     .with_display(DisplayMode::Corrected);
///
/// assert_eq!(session.active_image().height(), 32);
/// assert!(session.active_image().width() > 32);
/// ```
#[derive(Debug, Clone)]
pub struct SkewSession {
    title: String,
    metadata: BTreeMap<String, String>,
    settings: SkewSettings,
    display: DisplayMode,
    model: SkewModel,
    original: Arc<Image>,
    spectrum: Arc<Image>,
    corrected: Arc<Image>,
    corrected_spectrum: Arc<Image>,
    peaks: PeakSet,
}

impl SkewSession {
    /// Start a session on `image` with zero skew and no peaks.
    pub fn new(image: Image, settings: SkewSettings) -> Result<Self, SkewError> {
        info!("starting skew correction of a {} image", image.size());

        let spectrum = Arc::new(build_spectrum(&image)?);
        let model = SkewModel::new(SkewParameters::default(), image.size())?;
        let corrected = correct_image(&image, &model, settings.interpolation)?;
        let corrected_spectrum = build_spectrum(&corrected)?;

        Ok(Self {
            title: String::new(),
            metadata: BTreeMap::new(),
            settings,
            display: DisplayMode::default(),
            model,
            original: Arc::new(image),
            spectrum,
            corrected: Arc::new(corrected),
            corrected_spectrum: Arc::new(corrected_spectrum),
            peaks: PeakSet::default(),
        })
    }

    /// Attach the title and metadata of the source image, carried into the
    /// output.
    pub fn with_source(mut self, title: impl Into<String>, metadata: BTreeMap<String, String>) -> Self {
        self.title = title.into();
        self.metadata = metadata;
        self
    }

    fn recompute(&self, params: SkewParameters, settings: SkewSettings) -> Result<Self, SkewError> {
        let model = SkewModel::new(params, self.original.size())?;
        let corrected = correct_image(&self.original, &model, settings.interpolation)?;
        let corrected_spectrum = build_spectrum(&corrected)?;
        let peaks = self.peaks.refined(&corrected_spectrum, settings.radius);

        info!(
            "skew ({:.3}, {:.3}) gives a {} corrected image",
            params.x_skew(),
            params.y_skew(),
            corrected.size()
        );

        Ok(Self {
            settings,
            model,
            corrected: Arc::new(corrected),
            corrected_spectrum: Arc::new(corrected_spectrum),
            peaks,
            ..self.clone()
        })
    }

    /// Apply new skew angles.
    ///
    /// The corrected image and its spectrum are recomputed and the selected
    /// peaks searched again on the new spectrum.
    pub fn with_skew(&self, params: SkewParameters) -> Result<Self, SkewError> {
        self.recompute(params, self.settings.clone())
    }

    /// Select peak `idx` near `approx` on the corrected spectrum.
    ///
    /// The stored position is the refined local maximum, not `approx`.
    ///
    /// # Errors
    ///
    /// Fails when `idx` is not a valid slot or when another slot already holds
    /// the refined pixel.
    pub fn with_peak(&self, idx: usize, approx: Point2d) -> Result<Self, SkewError> {
        let peak = locate_peak(&self.corrected_spectrum, approx, self.settings.radius);
        debug!(
            "peak {} at ({}, {}) with value {}",
            idx, peak.point.x, peak.point.y, peak.value
        );

        let mut peaks = self.peaks;
        peaks.set(idx, peak)?;

        Ok(Self {
            peaks,
            ..self.clone()
        })
    }

    /// Remove all selected peaks.
    pub fn clear_peaks(&self) -> Self {
        Self {
            peaks: PeakSet::default(),
            ..self.clone()
        }
    }

    /// Show a different image.
    pub fn with_display(&self, display: DisplayMode) -> Self {
        Self {
            display,
            ..self.clone()
        }
    }

    /// Replace the settings.
    ///
    /// A different interpolation recomputes the corrected images and a
    /// different search radius searches the peaks again.
    pub fn with_settings(&self, settings: SkewSettings) -> Result<Self, SkewError> {
        if settings.interpolation != self.settings.interpolation {
            return self.recompute(self.model.params(), settings);
        }

        let peaks = if settings.radius != self.settings.radius {
            self.peaks.refined(&self.corrected_spectrum, settings.radius)
        } else {
            self.peaks
        };

        Ok(Self {
            settings,
            peaks,
            ..self.clone()
        })
    }

    /// The current settings.
    pub fn settings(&self) -> &SkewSettings {
        &self.settings
    }

    /// The current skew angles.
    pub fn params(&self) -> SkewParameters {
        self.model.params()
    }

    /// The current correction geometry.
    pub fn model(&self) -> &SkewModel {
        &self.model
    }

    /// The displayed mode.
    pub fn display(&self) -> DisplayMode {
        self.display
    }

    /// The selected peaks.
    pub fn peaks(&self) -> &PeakSet {
        &self.peaks
    }

    /// Angles between the selected peaks, if all four are selected.
    pub fn angles(&self) -> Option<LatticeAngles> {
        self.peaks.angles()
    }

    /// The source image.
    pub fn original(&self) -> &Image {
        &self.original
    }

    /// The spectrum of the source image.
    pub fn spectrum(&self) -> &Image {
        &self.spectrum
    }

    /// The corrected image.
    pub fn corrected(&self) -> &Image {
        &self.corrected
    }

    /// The spectrum of the corrected image.
    pub fn corrected_spectrum(&self) -> &Image {
        &self.corrected_spectrum
    }

    /// The image selected by the display mode.
    pub fn active_image(&self) -> &Image {
        match self.display {
            DisplayMode::Raw => &self.original,
            DisplayMode::Spectrum => &self.spectrum,
            DisplayMode::Corrected => &self.corrected,
            DisplayMode::CorrectedSpectrum => &self.corrected_spectrum,
        }
    }

    /// Render the active image with the zoom and display bounds of the
    /// settings.
    pub fn view(&self) -> Result<Image, SkewError> {
        let view = zoom_view(self.active_image(), self.settings.zoom)?;
        match self.settings.bounds(self.display) {
            Some((lower, upper)) => Ok(clamp_range(&view, lower, upper)?),
            None => Ok(view),
        }
    }

    /// Package the corrected image for the host.
    pub fn finish(&self) -> SkewOutput {
        info!(
            "finished skew correction at ({:.5}, {:.5})",
            self.params().x_skew(),
            self.params().y_skew()
        );
        SkewOutput::new(
            self.corrected.as_ref().clone(),
            self.params(),
            &self.title,
            self.metadata.clone(),
        )
    }
}
