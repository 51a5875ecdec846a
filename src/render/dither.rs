//! # Halftone Kernels
//!
//! Five interchangeable ways to turn a clamped luminance buffer
//! (0 = black, 255 = white) into a black/white [`HalftoneBitmap`] of the same
//! size.
//!
//! | Mode | Kind | Carries error | Look |
//! |------|------|---------------|------|
//! | Threshold | Fixed cut at 128 | No | Posterized, banding |
//! | Floyd–Steinberg | Error diffusion | 100% | Fine noise, "worms" |
//! | Atkinson | Error diffusion | 75% | Crisper, blown highlights |
//! | Bayer 4×4 | Ordered | No | Coarse cross-hatch |
//! | Bayer 8×8 | Ordered | No | Fine regular screen |
//!
//! Every kernel copies the input into a private working buffer. Quantizing
//! at 128 sends a sample of exactly 128 to white.
//!
//! ## Error Diffusion Scan Order
//!
//! Both diffusion kernels scan rows top to bottom, pixels left to right, and
//! only push error to pixels later in that order. Each pixel is quantized
//! after every earlier pixel has deposited its error, so the scan order is
//! part of the output and must not change:
//!
//! ```text
//! Floyd–Steinberg          Atkinson (each 1/8)
//!       *  7                     *  1  1
//!    3  5  1                  1  1  1
//!     (/16)                      1
//! ```
//!
//! ## Ordered Dithering
//!
//! A pixel is white when its luminance is above `matrix[y mod n][x mod n]`,
//! with matrix entries normalized to [0, 1) and scaled to 255.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bitmap::{GrayscaleBuffer, HalftoneBitmap, WHITE};
use crate::error::PapelitoError;

/// Quantization threshold for threshold and error-diffusion kernels.
pub const THRESHOLD: f32 = 128.0;

/// Halftoning algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMode {
    /// Plain cut at 128.
    Threshold,
    /// Floyd–Steinberg error diffusion.
    #[default]
    FloydSteinberg,
    /// Atkinson error diffusion (6/8 of the error kept).
    Atkinson,
    /// Ordered dithering with a 4×4 Bayer matrix.
    Bayer4,
    /// Ordered dithering with an 8×8 Bayer matrix.
    Bayer8,
}

impl DitherMode {
    pub const ALL: [DitherMode; 5] = [
        DitherMode::Threshold,
        DitherMode::FloydSteinberg,
        DitherMode::Atkinson,
        DitherMode::Bayer4,
        DitherMode::Bayer8,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DitherMode::Threshold => "threshold",
            DitherMode::FloydSteinberg => "floyd-steinberg",
            DitherMode::Atkinson => "atkinson",
            DitherMode::Bayer4 => "bayer4",
            DitherMode::Bayer8 => "bayer8",
        }
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DitherMode {
    type Err = PapelitoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "threshold" | "none" => Ok(DitherMode::Threshold),
            "floyd-steinberg" | "floyd_steinberg" | "fs" => Ok(DitherMode::FloydSteinberg),
            "atkinson" => Ok(DitherMode::Atkinson),
            "bayer4" => Ok(DitherMode::Bayer4),
            "bayer8" | "bayer" => Ok(DitherMode::Bayer8),
            other => Err(PapelitoError::InvalidSetting(format!(
                "Unknown dither mode '{}'. Use threshold, floyd-steinberg, atkinson, bayer4 or bayer8",
                other
            ))),
        }
    }
}

/// Bayer 4x4 dithering matrix, values 0-15.
pub const BAYER4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Bayer 8x8 dithering matrix, values 0-63.
///
/// Low values activate first as luminance drops, high values last; the
/// arrangement spreads each level's dots evenly over the tile.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Halftone `buffer` with the selected algorithm.
pub fn dither(buffer: &GrayscaleBuffer, mode: DitherMode) -> HalftoneBitmap {
    let (width, height) = buffer.dimensions();
    debug!(width, height, mode = %mode, "dithering");

    match mode {
        DitherMode::Threshold => threshold(buffer),
        DitherMode::FloydSteinberg => floyd_steinberg(buffer),
        DitherMode::Atkinson => atkinson(buffer),
        DitherMode::Bayer4 => ordered(buffer, &BAYER4),
        DitherMode::Bayer8 => ordered(buffer, &BAYER8),
    }
}

/// Quantize one sample: `(is_black, quantized_luminance)`.
#[inline]
fn quantize(sample: f32) -> (bool, f32) {
    if sample < THRESHOLD {
        (true, 0.0)
    } else {
        (false, WHITE)
    }
}

/// Stateless cut at [`THRESHOLD`].
pub fn threshold(buffer: &GrayscaleBuffer) -> HalftoneBitmap {
    let black = buffer.samples().iter().map(|&s| quantize(s).0).collect();
    HalftoneBitmap::new(buffer.width(), buffer.height(), black)
}

/// Floyd–Steinberg error diffusion.
///
/// Residual `original - quantized` goes right 7/16, below-left 3/16,
/// below 5/16, below-right 1/16. Neighbors outside the image are skipped
/// and their share is lost.
pub fn floyd_steinberg(buffer: &GrayscaleBuffer) -> HalftoneBitmap {
    let (w, h) = buffer.dimensions();
    let mut work = buffer.samples().to_vec();
    let mut black = vec![false; w * h];

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let old = work[idx];
            let (is_black, new) = quantize(old);
            black[idx] = is_black;
            let err = old - new;

            if x + 1 < w {
                work[idx + 1] += err * 7.0 / 16.0;
            }
            if y + 1 < h {
                if x > 0 {
                    work[idx + w - 1] += err * 3.0 / 16.0;
                }
                work[idx + w] += err * 5.0 / 16.0;
                if x + 1 < w {
                    work[idx + w + 1] += err * 1.0 / 16.0;
                }
            }
        }
    }

    HalftoneBitmap::new(w, h, black)
}

/// Atkinson error diffusion.
///
/// Six neighbors receive `residual / 8` each: right, two right, below-left,
/// below, below-right and two below. The remaining 2/8 of the error is
/// dropped, which lifts highlights and deepens shadows.
pub fn atkinson(buffer: &GrayscaleBuffer) -> HalftoneBitmap {
    let (w, h) = buffer.dimensions();
    let mut work = buffer.samples().to_vec();
    let mut black = vec![false; w * h];

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let old = work[idx];
            let (is_black, new) = quantize(old);
            black[idx] = is_black;
            let err = (old - new) / 8.0;

            if x + 1 < w {
                work[idx + 1] += err;
            }
            if x + 2 < w {
                work[idx + 2] += err;
            }
            if y + 1 < h {
                if x > 0 {
                    work[idx + w - 1] += err;
                }
                work[idx + w] += err;
                if x + 1 < w {
                    work[idx + w + 1] += err;
                }
            }
            if y + 2 < h {
                work[idx + 2 * w] += err;
            }
        }
    }

    HalftoneBitmap::new(w, h, black)
}

/// Normalized threshold for an `N`×`N` matrix cell, in luminance units.
#[inline]
fn matrix_threshold<const N: usize>(matrix: &[[u8; N]; N], x: usize, y: usize) -> f32 {
    let value = matrix[y % N][x % N] as f32;
    value / (N * N) as f32 * WHITE
}

/// Ordered dithering against a Bayer matrix.
///
/// White when `luminance > matrix[y mod N][x mod N] / N² · 255`. Pure black
/// (0) never clears the zero cell, pure white (255) clears every cell.
pub fn ordered<const N: usize>(buffer: &GrayscaleBuffer, matrix: &[[u8; N]; N]) -> HalftoneBitmap {
    let (w, h) = buffer.dimensions();
    let mut black = Vec::with_capacity(w * h);

    for y in 0..h {
        for x in 0..w {
            let sample = buffer.get(x, y);
            black.push(sample <= matrix_threshold(matrix, x, y));
        }
    }

    HalftoneBitmap::new(w, h, black)
}

// ============================================================================
// TESTS
// ============================================================================
