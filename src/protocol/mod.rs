//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS protocol
//! used by most thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control bytes, startup sequence, cutting
//! - [`text`]: Text styling (alignment, bold, underline, reverse, size)
//! - [`graphics`]: Raster bit images
//! - [`cp1252`]: Unicode to Windows-1252 text encoding
//!
//! Every builder returns an owned `Vec<u8>` and has no side effects. The
//! stateful job buffer lives in [`crate::encoder`].
//!
//! ## Usage Example
//!
//! ```
//! use papelito::protocol::{commands, cp1252, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::startup());
//! data.extend(text::align_center());
//! data.extend(text::bold_on());
//! data.extend(cp1252::encode("RECEIPT\n"));
//! data.extend(text::bold_off());
//! data.extend(text::align_left());
//! data.extend(commands::cut_partial_feed());
//! ```

pub mod commands;
pub mod cp1252;
pub mod graphics;
pub mod text;
