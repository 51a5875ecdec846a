//! # ESC/POS Protocol Commands
//!
//! Control bytes, session startup and paper cutting for ESC/POS-class
//! thermal receipt printers.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`, `FS .`, `ESC i`
//! - Multi-byte with parameters: `ESC t n`, `GS v 0 m xL xH yL yH d1...dk`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for character size, reverse printing and raster graphics.
pub const GS: u8 = 0x1D;

/// FS (File Separator) - Kanji/double-byte command prefix
pub const FS: u8 = 0x1C;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

/// Number of line feeds sent before a cut so the last printed line clears
/// the cutter blade.
pub const CUT_FEED_LINES: usize = 5;

/// Code page number selected at startup (`ESC t 6` = Windows-1252).
pub const CODE_PAGE_CP1252: u8 = 6;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// Clears the line buffer and resets bold, underline, reverse, character
/// size and alignment.
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Cancel Kanji Character Mode (FS .)
///
/// Printers sold with a CJK firmware boot into double-byte mode, where two
/// consecutive high bytes form one glyph. Cancelling it makes every byte a
/// single character of the selected code page.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | FS .  |
/// | Hex     | 1C 2E |
#[inline]
pub fn cancel_kanji() -> Vec<u8> {
    vec![FS, b'.']
}

/// # Select Character Code Table (ESC t n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC t n  |
/// | Hex     | 1B 74 n  |
///
/// `n = 6` selects Windows-1252 on most ESC/POS firmwares.
#[inline]
pub fn code_page(n: u8) -> Vec<u8> {
    vec![ESC, b't', n]
}

/// Full startup sequence: reset, cancel double-byte mode, select CP1252.
///
/// ```
/// use papelito::protocol::commands;
///
/// assert_eq!(
///     commands::startup(),
///     vec![0x1B, 0x40, 0x1C, 0x2E, 0x1B, 0x74, 0x06]
/// );
/// ```
pub fn startup() -> Vec<u8> {
    let mut cmd = init();
    cmd.extend(cancel_kanji());
    cmd.extend(code_page(CODE_PAGE_CP1252));
    cmd
}

// ============================================================================
// CUTTER CONTROL COMMANDS
// ============================================================================

/// # Partial Cut (ESC i)
///
/// Cuts the paper leaving a small uncut hinge, so the receipt stays
/// attached to the roll until torn off.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC i |
/// | Hex     | 1B 69 |
///
/// The cut happens at the current position. Use [`cut_partial_feed`] to
/// feed the printed content past the blade first.
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![ESC, b'i']
}

/// Feed [`CUT_FEED_LINES`] blank lines, then partial cut.
///
/// ```
/// use papelito::protocol::commands;
///
/// let cmd = commands::cut_partial_feed();
/// assert_eq!(&cmd[..5], b"\n\n\n\n\n");
/// assert_eq!(&cmd[5..], &[0x1B, 0x69]);
/// ```
pub fn cut_partial_feed() -> Vec<u8> {
    let mut cmd = vec![LF; CUT_FEED_LINES];
    cmd.extend(cut_partial());
    cmd
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use papelito::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(560), [0x30, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
