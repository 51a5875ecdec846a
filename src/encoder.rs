//! # Job Encoder
//!
//! [`Encoder`] owns the outbound byte buffer for one print job. Every call
//! appends bytes built by [`crate::protocol`]; nothing reaches the printer
//! until [`Encoder::flush`] or [`Encoder::cut`].
//!
//! ```text
//! new() ──► initialize() ──► text / styles / raster / document ──► flush()
//!   (empty)     (startup bytes)        (appends)                    (write, clear)
//! ```
//!
//! A job may flush several times. A failed flush leaves the buffer exactly
//! as it was, so the caller can retry once the device is back.
//!
//! ## Example
//!
//! ```
//! use papelito::encoder::Encoder;
//! use papelito::transport::MemoryTransport;
//!
//! let mut printer = MemoryTransport::new();
//! let mut job = Encoder::new();
//! job.initialize().bold_on().line("TOTAL  $4.50").bold_off();
//! job.cut(&mut printer)?;
//!
//! assert!(job.is_empty());
//! assert!(printer.bytes().ends_with(&[0x1B, 0x69]));
//! # Ok::<(), papelito::PapelitoError>(())
//! ```

use tracing::{debug, warn};

use crate::document::{self, DocumentNode};
use crate::error::PapelitoError;
use crate::protocol::{commands, cp1252, graphics, text};
use crate::render::HalftoneBitmap;
use crate::transport::Transport;

/// Rows per raster frame. `yL yH` is 16-bit; taller bitmaps are sent as
/// consecutive frames, each byte-aligned.
pub const MAX_RASTER_ROWS: usize = 0xFFF8;

/// Bytes per raster frame row. `xL xH` is 16-bit; wider bitmaps are cut
/// into vertical strips printed one after another.
pub const MAX_RASTER_WIDTH_BYTES: usize = u16::MAX as usize;

/// Append-only ESC/POS byte buffer for one print job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    /// An empty buffer. Call [`initialize`](Self::initialize) before content.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append the startup sequence: `ESC @`, `FS .`, `ESC t 6`.
    pub fn initialize(&mut self) -> &mut Self {
        self.raw(&commands::startup())
    }

    /// Append pre-built command bytes verbatim.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    /// Append text as CP1252, with vulgar fractions spelled out first.
    ///
    /// Never fails: characters CP1252 cannot hold become `?`.
    pub fn text(&mut self, s: &str) -> &mut Self {
        let s = cp1252::replace_fractions(s);
        self.buffer.extend(cp1252::encode(&s));
        self
    }

    /// [`text`](Self::text) followed by a line feed.
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buffer.push(commands::LF);
        self
    }

    pub fn bold_on(&mut self) -> &mut Self {
        self.raw(&text::bold_on())
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.raw(&text::bold_off())
    }

    pub fn underline_on(&mut self) -> &mut Self {
        self.raw(&text::underline_on())
    }

    pub fn underline_off(&mut self) -> &mut Self {
        self.raw(&text::underline_off())
    }

    pub fn double_underline_on(&mut self) -> &mut Self {
        self.raw(&text::double_underline_on())
    }

    pub fn double_underline_off(&mut self) -> &mut Self {
        self.raw(&text::double_underline_off())
    }

    pub fn invert_on(&mut self) -> &mut Self {
        self.raw(&text::invert_on())
    }

    pub fn invert_off(&mut self) -> &mut Self {
        self.raw(&text::invert_off())
    }

    pub fn align(&mut self, alignment: text::Alignment) -> &mut Self {
        self.raw(&text::align(alignment))
    }

    pub fn align_left(&mut self) -> &mut Self {
        self.raw(&text::align_left())
    }

    pub fn align_center(&mut self) -> &mut Self {
        self.raw(&text::align_center())
    }

    pub fn align_right(&mut self) -> &mut Self {
        self.raw(&text::align_right())
    }

    /// Character size multiplier, clamped to 1..=8.
    pub fn set_size(&mut self, n: u8) -> &mut Self {
        self.raw(&text::size(n))
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.raw(&text::size_normal())
    }

    /// Frame a halftone bitmap as `GS v 0` raster data.
    ///
    /// The frame width is the bitmap width rounded up to whole bytes; bits
    /// past the right edge are white. Bitmaps past either 16-bit frame limit
    /// go out as several frames, never with a wrapped header.
    pub fn raster_image(&mut self, bitmap: &HalftoneBitmap) -> &mut Self {
        let (width, height) = bitmap.dimensions();
        let width_bytes = width.div_ceil(8);
        let data = bitmap.to_raster_bytes();
        if data.is_empty() {
            return self;
        }

        debug!(width, height, bytes = data.len(), "framing raster image");

        if width_bytes <= MAX_RASTER_WIDTH_BYTES {
            self.raster_strip(width_bytes, &data);
            return self;
        }

        for start in (0..width_bytes).step_by(MAX_RASTER_WIDTH_BYTES) {
            let strip_bytes = (width_bytes - start).min(MAX_RASTER_WIDTH_BYTES);
            debug!(start, strip_bytes, "raster strip");
            let strip: Vec<u8> = data
                .chunks(width_bytes)
                .flat_map(|row| &row[start..start + strip_bytes])
                .copied()
                .collect();
            self.raster_strip(strip_bytes, &strip);
        }
        self
    }

    /// Frame one strip at most [`MAX_RASTER_WIDTH_BYTES`] wide, in bands of
    /// at most [`MAX_RASTER_ROWS`].
    fn raster_strip(&mut self, width_bytes: usize, data: &[u8]) {
        let xl_xh = u16::try_from(width_bytes).unwrap_or(u16::MAX);
        for (band, rows) in data.chunks(MAX_RASTER_ROWS * width_bytes).enumerate() {
            let band_height = rows.len() / width_bytes;
            debug!(band, rows = band_height, "raster band");
            self.buffer.extend(graphics::raster(
                xl_xh,
                u16::try_from(band_height).unwrap_or(u16::MAX),
                rows,
            ));
        }
    }

    /// Render a document tree.
    pub fn document(&mut self, node: &DocumentNode) -> &mut Self {
        document::render::render(node, self);
        self
    }

    /// Sizes 1× through 8×, one line each, then back to normal.
    pub fn size_test_page(&mut self) -> &mut Self {
        for n in 1..=text::MAX_SIZE {
            self.set_size(n);
            self.line(&format!("{n}x{n}"));
        }
        self.reset_size()
    }

    /// Write the buffer to `transport` and clear it.
    ///
    /// Returns the number of bytes written. If the device is unavailable or
    /// the write fails, returns [`PapelitoError::DeviceUnavailable`] and the
    /// buffer is left untouched.
    pub fn flush<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<usize, PapelitoError> {
        if !transport.is_available() {
            warn!(
                device = %transport.name(),
                pending = self.buffer.len(),
                "printer unavailable, job kept"
            );
            return Err(PapelitoError::DeviceUnavailable {
                device: transport.name(),
                reason: "device not available".to_string(),
            });
        }

        if let Err(e) = transport.write_all(&self.buffer) {
            warn!(device = %transport.name(), pending = self.buffer.len(), error = %e, "write failed, job kept");
            return Err(e);
        }

        let written = self.buffer.len();
        self.buffer.clear();
        debug!(device = %transport.name(), bytes = written, "job buffer flushed");
        Ok(written)
    }

    /// Feed past the cutter, partial cut, then [`flush`](Self::flush).
    ///
    /// On failure the cut bytes stay queued with the rest of the job.
    pub fn cut<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<usize, PapelitoError> {
        self.raw(&commands::cut_partial_feed());
        self.flush(transport)
    }

    /// Bytes queued so far.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Take the queued bytes, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    const STARTUP: [u8; 7] = [0x1B, 0x40, 0x1C, 0x2E, 0x1B, 0x74, 0x06];

    #[test]
    fn test_new_is_empty() {
        assert!(Encoder::new().is_empty());
    }

    #[test]
    fn test_initialize() {
        let mut enc = Encoder::new();
        enc.initialize();
        assert_eq!(enc.buffer(), &STARTUP);
    }

    #[test]
    fn test_text_cp1252() {
        let mut enc = Encoder::new();
        enc.text("Sautéed");
        assert_eq!(enc.buffer(), b"Saut\xE9ed");
    }

    #[test]
    fn test_text_fraction_matches_ascii() {
        let mut a = Encoder::new();
        a.text("½ cup");
        let mut b = Encoder::new();
        b.text("1/2 cup");
        assert_eq!(a.buffer(), b.buffer());
    }

    #[test]
    fn test_text_unencodable_becomes_question_mark() {
        let mut enc = Encoder::new();
        enc.text("a☃b");
        assert_eq!(enc.buffer(), b"a?b");
    }

    #[test]
    fn test_line_appends_lf() {
        let mut enc = Encoder::new();
        enc.line("hi");
        assert_eq!(enc.buffer(), b"hi\n");
    }

    #[test]
    fn test_toggles() {
        let mut enc = Encoder::new();
        enc.bold_on()
            .bold_off()
            .underline_on()
            .underline_off()
            .double_underline_on()
            .double_underline_off()
            .invert_on()
            .invert_off();
        assert_eq!(
            enc.buffer(),
            &[
                0x1B, 0x45, 0x01, 0x1B, 0x45, 0x00, // bold
                0x1B, 0x2D, 0x01, 0x1B, 0x2D, 0x00, // underline
                0x1B, 0x2D, 0x02, 0x1B, 0x2D, 0x00, // double underline
                0x1D, 0x42, 0x01, 0x1D, 0x42, 0x00, // invert
            ]
        );
    }

    #[test]
    fn test_alignment_is_not_restored() {
        let mut enc = Encoder::new();
        enc.align_right().text("x");
        assert_eq!(enc.buffer(), &[0x1B, 0x61, 0x02, b'x']);
    }

    #[test]
    fn test_size_clamps_and_resets() {
        let mut enc = Encoder::new();
        enc.set_size(4).set_size(0).set_size(9).reset_size();
        assert_eq!(
            enc.buffer(),
            &[0x1D, 0x21, 0x33, 0x1D, 0x21, 0x00, 0x1D, 0x21, 0x77, 0x1D, 0x21, 0x00]
        );
    }

    #[test]
    fn test_raster_image_frame() {
        let mut black = vec![false; 16 * 8];
        black[0] = true;
        black[16 * 8 - 1] = true;
        let bitmap = HalftoneBitmap::new(16, 8, black);

        let mut enc = Encoder::new();
        enc.raster_image(&bitmap);

        let buf = enc.buffer();
        assert_eq!(&buf[..8], &[0x1D, 0x76, 0x30, 0x00, 2, 0, 8, 0]);
        assert_eq!(buf.len(), 8 + 2 * 8);
        assert_eq!(buf[8], 0x80);
        assert_eq!(buf[buf.len() - 1], 0x01);
    }

    #[test]
    fn test_raster_image_unaligned_width_rounds_up() {
        let bitmap = HalftoneBitmap::new(10, 8, vec![true; 80]);
        let mut enc = Encoder::new();
        enc.raster_image(&bitmap);

        let buf = enc.buffer();
        assert_eq!(&buf[4..6], &[2, 0]);
        assert_eq!(&buf[8..10], &[0xFF, 0xC0]);
    }

    #[test]
    fn test_raster_image_wider_than_u16_dots() {
        // Landscape panoramas scale past 65535 dots; the header counts bytes.
        let bitmap = HalftoneBitmap::new(65544, 8, vec![true; 65544 * 8]);
        let mut enc = Encoder::new();
        enc.raster_image(&bitmap);

        let buf = enc.buffer();
        assert_eq!(&buf[..8], &[0x1D, 0x76, 0x30, 0x00, 0x01, 0x20, 8, 0]);
        assert_eq!(buf.len(), 8 + 8193 * 8);
    }

    #[test]
    fn test_raster_image_splits_strips_past_width_limit() {
        let width = (MAX_RASTER_WIDTH_BYTES + 1) * 8;
        let mut black = vec![false; width * 2];
        black[width - 1] = true;
        black[2 * width - 1] = true;
        let bitmap = HalftoneBitmap::new(width, 2, black);

        let mut enc = Encoder::new();
        enc.raster_image(&bitmap);
        let buf = enc.buffer();

        let first_len = 8 + MAX_RASTER_WIDTH_BYTES * 2;
        assert_eq!(&buf[..8], &[0x1D, 0x76, 0x30, 0x00, 0xFF, 0xFF, 2, 0]);
        assert!(buf[8..first_len].iter().all(|&b| b == 0));
        assert_eq!(&buf[first_len..], &[0x1D, 0x76, 0x30, 0x00, 1, 0, 2, 0, 0x01, 0x01]);
    }

    #[test]
    fn test_raster_image_empty_bitmap_appends_nothing() {
        let mut enc = Encoder::new();
        enc.raster_image(&HalftoneBitmap::new(0, 0, Vec::new()));
        assert!(enc.is_empty());
    }

    #[test]
    fn test_size_test_page() {
        let mut enc = Encoder::new();
        enc.size_test_page();

        let mut expected = Vec::new();
        for n in 1..=8u8 {
            expected.extend([0x1D, 0x21, ((n - 1) << 4) | (n - 1)]);
            expected.extend(format!("{n}x{n}\n").bytes());
        }
        expected.extend([0x1D, 0x21, 0x00]);
        assert_eq!(enc.buffer(), &expected[..]);
    }

    #[test]
    fn test_flush_writes_and_clears() {
        let mut sink = MemoryTransport::new();
        let mut enc = Encoder::new();
        enc.initialize().line("ok");

        let written = enc.flush(&mut sink).unwrap();
        assert_eq!(written, STARTUP.len() + 3);
        assert!(enc.is_empty());
        assert_eq!(sink.writes().len(), 1);
        assert!(sink.bytes().starts_with(&STARTUP));
    }

    #[test]
    fn test_flush_unavailable_keeps_buffer() {
        let mut sink = MemoryTransport::unavailable();
        let mut enc = Encoder::new();
        enc.initialize().line("pending");
        let before = enc.buffer().to_vec();

        let err = enc.flush(&mut sink).unwrap_err();
        assert!(matches!(err, PapelitoError::DeviceUnavailable { .. }));
        assert_eq!(enc.buffer(), &before[..]);
        assert!(sink.writes().is_empty());
    }

    #[test]
    fn test_flush_twice_in_one_job() {
        let mut sink = MemoryTransport::new();
        let mut enc = Encoder::new();
        enc.initialize().line("one");
        enc.flush(&mut sink).unwrap();
        enc.line("two");
        enc.flush(&mut sink).unwrap();

        assert_eq!(sink.writes().len(), 2);
        assert_eq!(sink.writes()[1], b"two\n");
    }

    #[test]
    fn test_retry_after_device_returns() {
        let mut sink = MemoryTransport::unavailable();
        let mut enc = Encoder::new();
        enc.line("retry me");
        assert!(enc.flush(&mut sink).is_err());

        sink.set_available(true);
        enc.flush(&mut sink).unwrap();
        assert_eq!(sink.bytes(), b"retry me\n");
    }

    #[test]
    fn test_cut_appends_feed_and_cut_then_flushes() {
        let mut sink = MemoryTransport::new();
        let mut enc = Encoder::new();
        enc.text("x");
        enc.cut(&mut sink).unwrap();

        assert!(enc.is_empty());
        assert_eq!(sink.bytes(), b"x\n\n\n\n\n\x1Bi");
    }

    #[test]
    fn test_take_empties_buffer() {
        let mut enc = Encoder::new();
        enc.text("abc");
        assert_eq!(enc.take(), b"abc");
        assert!(enc.is_empty());
    }
}
