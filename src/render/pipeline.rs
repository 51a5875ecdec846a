//! # Photo Pipeline
//!
//! Reduces a full-color raster to a printable halftone:
//!
//! ```text
//! source ─► rotate ─► scale to printer width ─► pad to ×8 ─► luma
//!                                                              │
//!        HalftoneBitmap ◄─ dither ◄─ invert ◄─ clamp ◄─ white point ◄─ contrast
//! ```
//!
//! The geometry half (rotate, scale, pad, luma) only depends on rotation and
//! orientation, so [`Pipeline`] caches its output and re-runs just the tone
//! half when contrast, white point, invert or dither change.
//!
//! ## Example
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use papelito::render::pipeline::{Pipeline, PipelineSettings};
//!
//! let photo = DynamicImage::ImageRgb8(RgbImage::new(100, 50));
//! let mut pipeline = Pipeline::new(photo, 560);
//!
//! let bitmap = pipeline.render(&PipelineSettings::default());
//! assert_eq!(bitmap.dimensions(), (560, 280));
//! ```

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bitmap::{GrayscaleBuffer, HalftoneBitmap, WHITE};
use super::dither::{self, DitherMode};
use crate::error::PapelitoError;

/// Resampling filter for the scale step.
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Raster rows are packed 8 pixels per byte; both dimensions pad to this.
pub const ALIGNMENT: u32 = 8;

// ============================================================================
// SETTINGS
// ============================================================================

/// Clockwise rotation applied before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }

    /// 90° and 270° exchange width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Cw90 | Rotation::Cw270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = PapelitoError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Cw90),
            180 => Ok(Rotation::Cw180),
            270 => Ok(Rotation::Cw270),
            other => Err(PapelitoError::InvalidSetting(format!(
                "Rotation must be 0, 90, 180 or 270 degrees, got {}",
                other
            ))),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl FromStr for Rotation {
    type Err = PapelitoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let degrees: u16 = s.trim().parse().map_err(|_| {
            PapelitoError::InvalidSetting(format!("Rotation must be a number, got '{}'", s))
        })?;
        Rotation::try_from(degrees)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Which image dimension is forced to the printer width.
///
/// - `Portrait`: image width = printer width (normal receipt)
/// - `Landscape`: image height = printer width (meant to be read sideways)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = PapelitoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(PapelitoError::InvalidSetting(format!(
                "Unknown orientation '{}'. Use portrait or landscape",
                other
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("portrait"),
            Orientation::Landscape => f.write_str("landscape"),
        }
    }
}

/// The part of the settings that decides the grayscale buffer's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Geometry {
    pub rotation: Rotation,
    pub orientation: Orientation,
}

/// Everything one pipeline run depends on, besides the source image.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use papelito::render::pipeline::{PipelineSettings, Rotation};
/// use papelito::render::dither::DitherMode;
///
/// let settings = PipelineSettings::from_json(r#"{"rotation": 90, "dither": "atkinson"}"#).unwrap();
/// assert_eq!(settings.rotation, Rotation::Cw90);
/// assert_eq!(settings.dither, DitherMode::Atkinson);
/// assert_eq!(settings.contrast, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub rotation: Rotation,
    pub orientation: Orientation,
    /// -255 (flat gray) to 255 (hard black/white).
    pub contrast: i32,
    /// Added to every sample after contrast. Positive brightens.
    pub white_point: i32,
    pub invert: bool,
    pub dither: DitherMode,
}

impl PipelineSettings {
    pub const MAX_CONTRAST: i32 = 255;

    /// Check ranges that the type system does not enforce.
    pub fn validate(&self) -> Result<(), PapelitoError> {
        if !(-Self::MAX_CONTRAST..=Self::MAX_CONTRAST).contains(&self.contrast) {
            return Err(PapelitoError::InvalidSetting(format!(
                "Contrast must be within -{max}..={max}, got {}",
                self.contrast,
                max = Self::MAX_CONTRAST
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON settings object.
    pub fn from_json(json: &str) -> Result<Self, PapelitoError> {
        let settings: PipelineSettings = serde_json::from_str(json)
            .map_err(|e| PapelitoError::InvalidSetting(format!("Bad settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            rotation: self.rotation,
            orientation: self.orientation,
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Size after forcing one side to `width_dots`, before padding.
///
/// The free side keeps the aspect ratio, rounded to nearest, at least 1.
///
/// ```
/// use papelito::render::pipeline::{scaled_dimensions, Orientation};
///
/// assert_eq!(scaled_dimensions(200, 100, Orientation::Portrait, 560), (560, 280));
/// assert_eq!(scaled_dimensions(200, 100, Orientation::Landscape, 560), (1120, 560));
/// ```
pub fn scaled_dimensions(
    width: u32,
    height: u32,
    orientation: Orientation,
    width_dots: u32,
) -> (u32, u32) {
    let scale_other = |other: u32, forced_from: u32| -> u32 {
        let scaled = (other as f64 * width_dots as f64 / forced_from as f64).round();
        (scaled as u32).max(1)
    };

    match orientation {
        Orientation::Portrait => (width_dots, scale_other(height, width)),
        Orientation::Landscape => (scale_other(width, height), width_dots),
    }
}

/// Round both sides up to the next multiple of [`ALIGNMENT`].
pub fn padded_dimensions(width: u32, height: u32) -> (u32, u32) {
    (
        width.next_multiple_of(ALIGNMENT),
        height.next_multiple_of(ALIGNMENT),
    )
}

fn rotate(image: RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::None => image,
        Rotation::Cw90 => imageops::rotate90(&image),
        Rotation::Cw180 => imageops::rotate180(&image),
        Rotation::Cw270 => imageops::rotate270(&image),
    }
}

/// ITU-R BT.601 luma of a pixel composited over white paper.
#[inline]
pub fn luma(pixel: Rgba<u8>) -> f32 {
    let [r, g, b, a] = pixel.0;
    let alpha = a as f32 / 255.0;
    let over_white = |c: u8| c as f32 * alpha + WHITE * (1.0 - alpha);
    0.299 * over_white(r) + 0.587 * over_white(g) + 0.114 * over_white(b)
}

/// Rotate, scale and pad `raster`, then reduce it to luminance.
///
/// Padding pixels sit on the right and bottom edges at full white.
pub fn configure_geometry(
    raster: &DynamicImage,
    rotation: Rotation,
    orientation: Orientation,
    width_dots: u32,
) -> GrayscaleBuffer {
    let rotated = rotate(raster.to_rgba8(), rotation);
    let (src_w, src_h) = rotated.dimensions();
    let (w, h) = scaled_dimensions(src_w, src_h, orientation, width_dots);

    let scaled = if (w, h) == (src_w, src_h) {
        rotated
    } else {
        imageops::resize(&rotated, w, h, RESIZE_FILTER)
    };

    let (pw, ph) = padded_dimensions(w, h);
    let stride = pw as usize;
    let mut samples = vec![WHITE; stride * ph as usize];
    for (x, y, pixel) in scaled.enumerate_pixels() {
        samples[y as usize * stride + x as usize] = luma(*pixel);
    }

    debug!(
        source_width = raster.width(),
        source_height = raster.height(),
        rotation = rotation.degrees(),
        %orientation,
        width = pw,
        height = ph,
        "rebuilt grayscale buffer"
    );

    GrayscaleBuffer::new(stride, ph as usize, samples)
}

// ============================================================================
// TONE
// ============================================================================

/// Contrast multiplier around mid-gray 128.
///
/// ```
/// use papelito::render::pipeline::contrast_factor;
///
/// assert_eq!(contrast_factor(0), 1.0);
/// assert!(contrast_factor(100) > 1.0);
/// assert!(contrast_factor(-100) < 1.0);
/// ```
pub fn contrast_factor(contrast: i32) -> f32 {
    let c = contrast as f32;
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

/// Contrast, then white point, then clamp to [0, 255], then invert.
///
/// Zero contrast and zero white point skip their step entirely, so the
/// neutral settings return the input samples bit for bit.
pub fn adjust(
    buffer: &GrayscaleBuffer,
    contrast: i32,
    white_point: i32,
    invert: bool,
) -> GrayscaleBuffer {
    let factor = contrast_factor(contrast);
    let offset = white_point as f32;

    buffer.map(|sample| {
        let mut s = sample;
        if contrast != 0 {
            s = factor * (s - 128.0) + 128.0;
        }
        if white_point != 0 {
            s += offset;
        }
        s = s.clamp(0.0, WHITE);
        if invert { WHITE - s } else { s }
    })
}

/// Halftone an adjusted buffer.
#[inline]
pub fn run_pipeline(buffer: &GrayscaleBuffer, mode: DitherMode) -> HalftoneBitmap {
    dither::dither(buffer, mode)
}

/// One-shot run without caching.
pub fn process(
    raster: &DynamicImage,
    settings: &PipelineSettings,
    width_dots: u32,
) -> HalftoneBitmap {
    let gray = configure_geometry(raster, settings.rotation, settings.orientation, width_dots);
    let adjusted = adjust(&gray, settings.contrast, settings.white_point, settings.invert);
    run_pipeline(&adjusted, settings.dither)
}

// ============================================================================
// CACHING PIPELINE
// ============================================================================

#[derive(Debug)]
struct CachedGrayscale {
    geometry: Geometry,
    buffer: GrayscaleBuffer,
}

/// A source image plus the grayscale buffer last built from it.
#[derive(Debug)]
pub struct Pipeline {
    source: DynamicImage,
    width_dots: u32,
    cache: Option<CachedGrayscale>,
}

impl Pipeline {
    pub fn new(source: DynamicImage, width_dots: u32) -> Self {
        Self {
            source,
            width_dots,
            cache: None,
        }
    }

    pub fn source(&self) -> &DynamicImage {
        &self.source
    }

    pub fn width_dots(&self) -> u32 {
        self.width_dots
    }

    /// Replace the source image. The next render rebuilds geometry.
    pub fn set_source(&mut self, source: DynamicImage) {
        self.source = source;
        self.cache = None;
    }

    /// Geometry of the cached grayscale buffer, if any.
    pub fn cached_geometry(&self) -> Option<Geometry> {
        self.cache.as_ref().map(|c| c.geometry)
    }

    /// Grayscale buffer for `geometry`, rebuilt only when it changed.
    pub fn grayscale(&mut self, geometry: Geometry) -> &GrayscaleBuffer {
        if self.cached_geometry().is_some_and(|g| g != geometry) {
            self.cache = None;
        }

        let source = &self.source;
        let width_dots = self.width_dots;
        &self
            .cache
            .get_or_insert_with(|| CachedGrayscale {
                geometry,
                buffer: configure_geometry(
                    source,
                    geometry.rotation,
                    geometry.orientation,
                    width_dots,
                ),
            })
            .buffer
    }

    /// Full run with `settings`, reusing cached geometry when possible.
    pub fn render(&mut self, settings: &PipelineSettings) -> HalftoneBitmap {
        let gray = self.grayscale(settings.geometry());
        let adjusted = adjust(gray, settings.contrast, settings.white_point, settings.invert);
        run_pipeline(&adjusted, settings.dither)
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use image::{Rgb, RgbImage};
    use proptest::prelude::*;

    fn rotation_strategy() -> impl Strategy<Value = Rotation> {
        prop::sample::select(vec![Rotation::None, Rotation::Cw90, Rotation::Cw180, Rotation::Cw270])
    }

    fn orientation_strategy() -> impl Strategy<Value = Orientation> {
        prop::sample::select(vec![Orientation::Portrait, Orientation::Landscape])
    }

    proptest! {
        /// Property: padded geometry is byte-aligned for any source and width.
        #[test]
        fn prop_padding_multiple_of_8(
            w in 1u32..=60,
            h in 1u32..=60,
            width_dots in 1u32..=72,
            rotation in rotation_strategy(),
            orientation in orientation_strategy(),
        ) {
            let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([120; 3])));
            let gray = configure_geometry(&img, rotation, orientation, width_dots);
            prop_assert_eq!(gray.width() % 8, 0);
            prop_assert_eq!(gray.height() % 8, 0);
        }

        /// Property: double invert is the identity on in-range samples.
        #[test]
        fn prop_invert_round_trip(samples in prop::collection::vec(0u8..=255, 1..64)) {
            let buf = GrayscaleBuffer::new(
                samples.len(),
                1,
                samples.iter().map(|&s| f32::from(s)).collect(),
            );
            let twice = adjust(&adjust(&buf, 0, 0, true), 0, 0, true);
            prop_assert_eq!(twice, buf);
        }

        /// Property: adjusted samples always land in [0, 255].
        #[test]
        fn prop_adjust_clamps(
            samples in prop::collection::vec(0u8..=255, 1..64),
            contrast in -255i32..=255,
            white_point in -300i32..=300,
            invert in any::<bool>(),
        ) {
            let buf = GrayscaleBuffer::new(
                samples.len(),
                1,
                samples.iter().map(|&s| f32::from(s)).collect(),
            );
            let out = adjust(&buf, contrast, white_point, invert);
            prop_assert!(out.samples().iter().all(|&s| (0.0..=WHITE).contains(&s)));
        }

        /// Property: identical source and settings give identical bitmaps.
        #[test]
        fn prop_render_idempotent(
            seed in 0u8..=255,
            contrast in -100i32..=100,
            invert in any::<bool>(),
        ) {
            let img = DynamicImage::ImageRgb8(RgbImage::from_fn(20, 13, |x, y| {
                Rgb([seed.wrapping_add((x * 13) as u8), (y * 19) as u8, seed])
            }));
            let settings = PipelineSettings { contrast, invert, ..Default::default() };
            let mut pipeline = Pipeline::new(img, 32);
            let first = pipeline.render(&settings);
            let second = pipeline.render(&settings);
            prop_assert_eq!(first, second);
        }
    }
}
