//! # Printer Module
//!
//! Printer hardware specifications.
//!
//! - [`config`]: Raster width, resolution and default device path

pub mod config;

pub use config::PrinterConfig;
