//! # Rendering Module
//!
//! Turns photographs into 1-bit images a thermal head can print.
//!
//! ## Modules
//!
//! - [`bitmap`]: grayscale and halftone pixel buffers, PNG previews
//! - [`dither`]: threshold, Floyd–Steinberg, Atkinson and Bayer kernels
//! - [`pipeline`]: rotate, scale, pad, tone-adjust and dither a source image
//!
//! ## Usage Example
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use papelito::render::pipeline::{self, PipelineSettings};
//! use papelito::render::dither::DitherMode;
//!
//! let photo = DynamicImage::ImageRgb8(RgbImage::new(64, 64));
//! let settings = PipelineSettings {
//!     dither: DitherMode::Bayer8,
//!     ..Default::default()
//! };
//!
//! let bitmap = pipeline::process(&photo, &settings, 560);
//! assert_eq!(bitmap.width() % 8, 0);
//! ```

pub mod bitmap;
pub mod dither;
pub mod pipeline;

pub use bitmap::{GrayscaleBuffer, HalftoneBitmap};
pub use dither::DitherMode;
pub use pipeline::{Pipeline, PipelineSettings};
