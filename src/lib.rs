//! # Papelito - Thermal Receipt Printing
//!
//! Papelito turns rich-text notes and photographs into the exact bytes an
//! ESC/POS thermal receipt printer consumes. It provides:
//!
//! - **Protocol implementation**: ESC/POS command builders and CP1252 text
//! - **Photo pipeline**: rotate, scale, tone-adjust and halftone images
//! - **Documents**: a rich-text tree printed with bold, underline, sizes,
//!   alignment and highlights, built from HTML, JSON or Markdown
//! - **Transport**: a local character device such as `/dev/usb/lp0`
//!
//! ## Quick Start
//!
//! ```no_run
//! use image::DynamicImage;
//! use papelito::{
//!     document::markdown,
//!     render::{Pipeline, PipelineSettings},
//!     transport::DeviceTransport,
//!     Encoder, PrinterConfig,
//! };
//!
//! let config = PrinterConfig::default();
//! let mut printer = DeviceTransport::new(config.device_path);
//!
//! let mut job = Encoder::new();
//! job.initialize();
//! job.document(&markdown::parse("# Hello {.ql-align-center}\n\nFrom *papelito*."));
//!
//! let photo = image::open("cat.jpg").map_err(|e| papelito::PapelitoError::Image(e.to_string()))?;
//! let mut pipeline = Pipeline::new(photo, config.width_dots);
//! job.raster_image(&pipeline.render(&PipelineSettings::default()));
//!
//! job.cut(&mut printer)?;
//! # Ok::<(), papelito::PapelitoError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | ESC/POS command builders |
//! | [`render`] | Grayscale pipeline and halftone kernels |
//! | [`document`] | Rich-text trees and their printing |
//! | [`encoder`] | Job buffer, flush and cut |
//! | [`transport`] | Device backends |
//! | [`printer`] | Printer configuration |
//! | [`error`] | Error types |

pub mod document;
pub mod encoder;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use document::DocumentNode;
pub use encoder::Encoder;
pub use error::PapelitoError;
pub use printer::PrinterConfig;
pub use render::{DitherMode, HalftoneBitmap, Pipeline, PipelineSettings};
pub use transport::{DeviceTransport, MemoryTransport, Transport};
