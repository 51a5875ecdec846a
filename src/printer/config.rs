//! # Printer Configuration
//!
//! Hardware constants for the receipt printer.
//!
//! | Model | Width (dots) | Resolution | Device |
//! |-------|--------------|------------|--------|
//! | Generic 80mm ESC/POS (USB) | 560 | 203 DPI | `/dev/usb/lp0` |
//!
//! ## Usage
//!
//! ```
//! use papelito::printer::PrinterConfig;
//!
//! let config = PrinterConfig::USB_80MM;
//! assert_eq!(config.width_bytes(), 70);
//! assert!(config.with_width(0).validate().is_err());
//! ```

use tracing::warn;

use crate::error::PapelitoError;

/// # Printer Configuration
///
/// - **width_dots**: Raster width the image pipeline scales to. Must be a
///   multiple of 8.
/// - **dpi**: Resolution in dots per inch
/// - **device_path**: Default character device the printer is bound to
///
/// ```text
/// dots_per_mm = dpi / 25.4
/// width_mm = width_dots / dots_per_mm
///
/// For the 80mm profile:
///   dots_per_mm = 203 / 25.4 ≈ 8
///   width_mm = 560 / 8 = 70mm
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Raster width in dots (pixels)
    pub width_dots: u32,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Default device node for the USB line printer driver
    pub device_path: &'static str,
}

impl PrinterConfig {
    /// # Generic 80mm ESC/POS Printer on USB
    ///
    /// ```text
    /// ├── 5mm ──┼────── 70mm printable ──────┼── 5mm ──┤
    /// │ margin  │         560 dots           │ margin  │
    /// ```
    pub const USB_80MM: Self = Self {
        name: "ESC/POS 80mm (USB)",
        width_dots: 560,
        dpi: 203,
        device_path: "/dev/usb/lp0",
    };

    /// Same hardware with a different raster width.
    pub fn with_width(self, width_dots: u32) -> Self {
        Self { width_dots, ..self }
    }

    /// Raster row length in bytes
    #[inline]
    pub fn width_bytes(&self) -> u32 {
        self.width_dots.div_ceil(8)
    }

    /// Calculate dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Calculate print width in millimeters
    #[inline]
    pub fn width_mm(&self) -> f32 {
        self.width_dots as f32 / self.dots_per_mm()
    }

    /// Reject a zero width. A width that is not a multiple of 8 is allowed
    /// (images are padded up to whole bytes) but logged, since the printed
    /// image ends up wider than asked.
    pub fn validate(&self) -> Result<(), PapelitoError> {
        if self.width_dots == 0 {
            return Err(PapelitoError::InvalidSetting(
                "Print width must be at least 1 dot".to_string(),
            ));
        }
        if self.width_dots % 8 != 0 {
            warn!(
                width_dots = self.width_dots,
                padded = self.width_bytes() * 8,
                "print width is not a multiple of 8, images will be padded"
            );
        }
        Ok(())
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::USB_80MM
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usb_80mm_dimensions() {
        let config = PrinterConfig::USB_80MM;
        assert_eq!(config.width_dots, 560);
        assert_eq!(config.width_bytes(), 70);
        assert_eq!(config.width_dots % 8, 0);
    }

    #[test]
    fn test_dots_per_mm() {
        let dpmm = PrinterConfig::USB_80MM.dots_per_mm();
        // 203 DPI ≈ 8 dots/mm
        assert!((dpmm - 8.0).abs() < 0.1);
    }

    #[test]
    fn test_width_mm() {
        let width = PrinterConfig::USB_80MM.width_mm();
        assert!((width - 70.0).abs() < 1.0);
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let err = PrinterConfig::USB_80MM.with_width(0).validate().unwrap_err();
        assert!(matches!(err, PapelitoError::InvalidSetting(_)));
    }

    #[test]
    fn test_validate_accepts_unaligned_width() {
        assert!(PrinterConfig::USB_80MM.validate().is_ok());
        assert!(PrinterConfig::USB_80MM.with_width(563).validate().is_ok());
    }

    #[test]
    fn test_with_width() {
        let config = PrinterConfig::USB_80MM.with_width(384);
        assert_eq!(config.width_dots, 384);
        assert_eq!(config.device_path, "/dev/usb/lp0");
    }

    #[test]
    fn test_default_is_usb_80mm() {
        assert_eq!(PrinterConfig::default(), PrinterConfig::USB_80MM);
    }
}
