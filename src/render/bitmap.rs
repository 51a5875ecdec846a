//! # Pixel Buffers
//!
//! The two images that flow through the photo pipeline:
//!
//! - [`GrayscaleBuffer`]: real-valued luminance, 0.0 = black, 255.0 = white
//! - [`HalftoneBitmap`]: one bit per pixel, black (print a dot) or white
//!
//! Both are row-major with index `y * width + x`.

use std::io::Cursor;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};

use crate::error::PapelitoError;
use crate::protocol::graphics::pack_row;

/// Luminance of paper: unprinted background.
pub const WHITE: f32 = 255.0;

/// # Grayscale Buffer
///
/// W·H luminance samples. Values may leave [0, 255] between adjustment
/// steps; [`crate::render::pipeline::adjust`] clamps them before dithering.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleBuffer {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl GrayscaleBuffer {
    pub fn new(width: usize, height: usize, samples: Vec<f32>) -> Self {
        debug_assert_eq!(
            samples.len(),
            width * height,
            "Sample count must equal width × height"
        );
        Self {
            width,
            height,
            samples,
        }
    }

    /// Uniform buffer, e.g. `filled(w, h, WHITE)` for blank paper.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self::new(width, height, vec![value; width * height])
    }

    /// Build a buffer by sampling `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f32,
    {
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self::new(width, height, samples)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.samples[y * self.width + x]
    }

    /// Apply `f` to every sample, keeping geometry.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self::new(
            self.width,
            self.height,
            self.samples.iter().map(|&s| f(s)).collect(),
        )
    }
}

/// # Halftone Bitmap
///
/// The binary result of a dithering pass. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HalftoneBitmap {
    width: usize,
    height: usize,
    black: Vec<bool>,
}

impl HalftoneBitmap {
    /// `black[y * width + x]` is true where a dot is printed.
    pub fn new(width: usize, height: usize, black: Vec<bool>) -> Self {
        debug_assert_eq!(
            black.len(),
            width * height,
            "Pixel count must equal width × height"
        );
        Self {
            width,
            height,
            black,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn is_black(&self, x: usize, y: usize) -> bool {
        self.black[y * self.width + x]
    }

    /// One row of pixels, left to right.
    pub fn row(&self, y: usize) -> &[bool] {
        &self.black[y * self.width..(y + 1) * self.width]
    }

    /// Number of printed dots.
    pub fn black_count(&self) -> usize {
        self.black.iter().filter(|&&b| b).count()
    }

    /// Rows packed 8 pixels per byte, MSB first, set bit = black.
    ///
    /// Length = `ceil(width / 8) * height` bytes, ready for
    /// [`crate::protocol::graphics::raster`].
    pub fn to_raster_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.width.div_ceil(8) * self.height);
        for y in 0..self.height {
            data.extend(pack_row(self.row(y)));
        }
        data
    }

    fn to_gray_image(&self) -> GrayImage {
        let mut img = GrayImage::new(self.width as u32, self.height as u32);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let color = if self.is_black(x as usize, y as usize) {
                0u8
            } else {
                255u8
            };
            *pixel = Luma([color]);
        }
        img
    }

    /// Encode as a PNG preview (black = 0, white = 255).
    pub fn to_png(&self) -> Result<Vec<u8>, PapelitoError> {
        let mut out = Cursor::new(Vec::new());
        self.to_gray_image()
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| PapelitoError::Image(format!("Failed to encode PNG: {}", e)))?;
        Ok(out.into_inner())
    }

    /// Save a PNG preview to disk.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), PapelitoError> {
        self.to_gray_image()
            .save_with_format(path.as_ref(), ImageFormat::Png)
            .map_err(|e| PapelitoError::Image(format!("Failed to save PNG: {}", e)))
    }
}
