//! # ESC/POS Raster Graphics
//!
//! Frames a 1-bit image as a "print raster bit image" command.
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```

use super::commands::{GS, u16_le};

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Scale mode (0 = normal density, used here)
/// - `xL, xH`: Width in **bytes**, little-endian
/// - `yL, yH`: Height in dots, little-endian
/// - `d1...dk`: Row-major image data, k = width_bytes × height
///
/// Both dimensions are 16-bit on the wire. Wider or taller images are split
/// into several frames by the caller.
///
/// ```
/// use papelito::protocol::graphics;
///
/// // 560 dots wide (70 bytes), 8 rows
/// let data = vec![0x00; 70 * 8];
/// let cmd = graphics::raster(70, 8, &data);
///
/// assert_eq!(&cmd[..8], &[0x1D, 0x76, 0x30, 0x00, 70, 0, 8, 0]);
/// assert_eq!(cmd.len(), 8 + 70 * 8);
/// ```
pub fn raster(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let expected_len = width_bytes as usize * height as usize;

    debug_assert!(
        data.len() == expected_len,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        expected_len,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.push(GS);
    cmd.push(b'v');
    cmd.push(b'0');
    cmd.push(0); // m = 0 (normal)
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(data);
    cmd
}

/// Pack a row of boolean pixel values into bytes.
///
/// - Bit 7 (MSB) = leftmost pixel
/// - 1 = black (print dot), 0 = white (no dot)
///
/// If the row length is not a multiple of 8, the last byte is padded
/// with zeros (white) on the right.
///
/// ```
/// use papelito::protocol::graphics::pack_row;
///
/// let row = vec![true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]);
///
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            let byte_idx = i / 8;
            let bit_idx = 7 - (i % 8); // MSB first
            bytes[byte_idx] |= 1 << bit_idx;
        }
    }

    bytes
}

// ============================================================================
// TESTS
// ============================================================================
