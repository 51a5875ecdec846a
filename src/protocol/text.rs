//! # ESC/POS Text Styling Commands
//!
//! This module implements text formatting commands for ESC/POS printers.
//!
//! ## Text Styling Overview
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Bold | ESC E n | **Emphasized** text |
//! | Underline | ESC - n | 1-dot or 2-dot underline |
//! | Reverse | GS B n | White on black |
//! | Size | GS ! n | 1x–8x width and height |
//! | Alignment | ESC a n | Left, center, right |
//!
//! Every toggle is a plain on/off pair. The printer keeps no stack, so
//! nested styles must be balanced by the caller.

use super::commands::{ESC, GS};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// - `n = 0`: Left alignment (default)
/// - `n = 1`: Center alignment
/// - `n = 2`: Right alignment
///
/// Takes effect at the start of the next line and stays until changed.
///
/// ```
/// use papelito::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// Convenience function for left alignment
#[inline]
pub fn align_left() -> Vec<u8> {
    align(Alignment::Left)
}

/// Convenience function for center alignment
#[inline]
pub fn align_center() -> Vec<u8> {
    align(Alignment::Center)
}

/// Convenience function for right alignment
#[inline]
pub fn align_right() -> Vec<u8> {
    align(Alignment::Right)
}

// ============================================================================
// TEXT EMPHASIS (BOLD)
// ============================================================================

/// # Turn Emphasized Mode On (ESC E 1)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC E 1  |
/// | Hex     | 1B 45 01 |
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E', 1]
}

/// # Turn Emphasized Mode Off (ESC E 0)
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'E', 0]
}

// ============================================================================
// UNDERLINE
// ============================================================================

/// Underline thickness for `ESC - n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Underline {
    #[default]
    Off = 0,
    /// 1 dot thick
    Single = 1,
    /// 2 dots thick
    Double = 2,
}

/// # Turn Underline Mode On/Off (ESC - n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC - n  |
/// | Hex     | 1B 2D n  |
///
/// Underline does not affect spaces added by alignment, only printed
/// characters.
///
/// ```
/// use papelito::protocol::text::{underline, Underline};
///
/// assert_eq!(underline(Underline::Double), vec![0x1B, 0x2D, 0x02]);
/// ```
pub fn underline(mode: Underline) -> Vec<u8> {
    vec![ESC, b'-', mode as u8]
}

#[inline]
pub fn underline_on() -> Vec<u8> {
    underline(Underline::Single)
}

#[inline]
pub fn underline_off() -> Vec<u8> {
    underline(Underline::Off)
}

#[inline]
pub fn double_underline_on() -> Vec<u8> {
    underline(Underline::Double)
}

/// Same bytes as [`underline_off`]; thickness is not tracked on the way out.
#[inline]
pub fn double_underline_off() -> Vec<u8> {
    underline(Underline::Off)
}

// ============================================================================
// REVERSE (INVERT)
// ============================================================================

/// # Turn White/Black Reverse Printing On (GS B 1)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS B 1   |
/// | Hex     | 1D 42 01 |
///
/// Characters print white on a black background. Used for highlighted
/// spans.
#[inline]
pub fn invert_on() -> Vec<u8> {
    vec![GS, b'B', 1]
}

/// # Turn White/Black Reverse Printing Off (GS B 0)
#[inline]
pub fn invert_off() -> Vec<u8> {
    vec![GS, b'B', 0]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Largest supported size multiplier.
pub const MAX_SIZE: u8 = 8;

/// # Select Character Size (GS ! n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS ! n   |
/// | Hex     | 1D 21 n  |
///
/// Bits 4–7 hold the width multiplier minus one, bits 0–3 the height
/// multiplier minus one. This builder always scales both equally:
///
/// ```text
/// n = ((size - 1) << 4) | (size - 1)
///
/// size 1 → 0x00    size 3 → 0x22    size 8 → 0x77
/// ```
///
/// `size` is clamped to 1..=8.
///
/// ```
/// use papelito::protocol::text::size;
///
/// assert_eq!(size(4), vec![0x1D, 0x21, 0x33]);
/// ```
pub fn size(size: u8) -> Vec<u8> {
    let m = size.clamp(1, MAX_SIZE) - 1;
    vec![GS, b'!', (m << 4) | m]
}

/// Reset to 1x1 characters (GS ! 0)
#[inline]
pub fn size_normal() -> Vec<u8> {
    vec![GS, b'!', 0]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold_on(), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold_off(), vec![0x1B, 0x45, 0x00]);
    }

    #[test]
    fn test_underline() {
        assert_eq!(underline_on(), vec![0x1B, 0x2D, 0x01]);
        assert_eq!(underline_off(), vec![0x1B, 0x2D, 0x00]);
    }

    #[test]
    fn test_double_underline() {
        assert_eq!(double_underline_on(), vec![0x1B, 0x2D, 0x02]);
        assert_eq!(double_underline_off(), vec![0x1B, 0x2D, 0x00]);
    }

    #[test]
    fn test_invert() {
        assert_eq!(invert_on(), vec![0x1D, 0x42, 0x01]);
        assert_eq!(invert_off(), vec![0x1D, 0x42, 0x00]);
    }

    #[test]
    fn test_size_encoding() {
        assert_eq!(size(1), vec![0x1D, 0x21, 0x00]);
        assert_eq!(size(2), vec![0x1D, 0x21, 0x11]);
        assert_eq!(size(3), vec![0x1D, 0x21, 0x22]);
        assert_eq!(size(4), vec![0x1D, 0x21, 0x33]);
        assert_eq!(size(8), vec![0x1D, 0x21, 0x77]);
    }

    #[test]
    fn test_size_clamps() {
        assert_eq!(size(0), size(1));
        assert_eq!(size(12), size(8));
    }

    #[test]
    fn test_size_normal() {
        assert_eq!(size_normal(), vec![0x1D, 0x21, 0x00]);
    }
}
