//! # Code Page 1252 Encoding
//!
//! Converts Unicode strings to Windows-1252 single-byte encoding for ESC/POS
//! printers.
//!
//! The printer must be set to code page 1252 (`ESC t 6`) for these bytes to
//! render correctly. ASCII and Latin-1 (U+00A0–U+00FF) map to themselves;
//! the 0x80–0x9F block holds typographic punctuation and a few extra
//! letters. Characters not in CP1252 are replaced with `?`.
//!
//! Vulgar fractions are rewritten to ASCII (`½` → `1/2`) before encoding,
//! even the three that CP1252 can print, so every fraction in a recipe looks
//! the same on paper.

use std::borrow::Cow;

use tracing::debug;

/// Encode a Unicode string as CP1252 bytes.
///
/// - ASCII (U+0000–U+007F): passed through as-is
/// - Latin-1 upper half (U+00A0–U+00FF): same byte value
/// - The 27 code points CP1252 places at 0x80–0x9F: single byte
/// - Unmapped characters: replaced with `?`
///
/// ```
/// use papelito::protocol::cp1252;
///
/// assert_eq!(cp1252::encode("café"), vec![0x63, 0x61, 0x66, 0xE9]);
/// assert_eq!(cp1252::encode("€5"), vec![0x80, 0x35]);
/// ```
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match unicode_to_cp1252(ch) {
            Some(byte) => out.push(byte),
            None => {
                debug!(
                    character = %ch,
                    code_point = ch as u32,
                    "cp1252: unmapped character replaced with '?'"
                );
                out.push(b'?');
            }
        }
    }
    out
}

/// Map a Unicode code point to its CP1252 byte value.
///
/// Returns `None` if the character has no CP1252 representation. C1 control
/// characters (U+0080–U+009F) are unmapped: their byte positions belong to
/// the punctuation block.
fn unicode_to_cp1252(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if cp < 0x80 || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }

    let byte = match ch {
        '\u{20AC}' => 0x80, // €
        '\u{201A}' => 0x82, // ‚
        '\u{0192}' => 0x83, // ƒ
        '\u{201E}' => 0x84, // „
        '\u{2026}' => 0x85, // …
        '\u{2020}' => 0x86, // †
        '\u{2021}' => 0x87, // ‡
        '\u{02C6}' => 0x88, // ˆ
        '\u{2030}' => 0x89, // ‰
        '\u{0160}' => 0x8A, // Š
        '\u{2039}' => 0x8B, // ‹
        '\u{0152}' => 0x8C, // Œ
        '\u{017D}' => 0x8E, // Ž
        '\u{2018}' => 0x91, // ‘
        '\u{2019}' => 0x92, // ’
        '\u{201C}' => 0x93, // “
        '\u{201D}' => 0x94, // ”
        '\u{2022}' => 0x95, // •
        '\u{2013}' => 0x96, // –
        '\u{2014}' => 0x97, // —
        '\u{02DC}' => 0x98, // ˜
        '\u{2122}' => 0x99, // ™
        '\u{0161}' => 0x9A, // š
        '\u{203A}' => 0x9B, // ›
        '\u{0153}' => 0x9C, // œ
        '\u{017E}' => 0x9E, // ž
        '\u{0178}' => 0x9F, // Ÿ
        _ => return None,
    };
    Some(byte)
}

// ============================================================================
// FRACTIONS
// ============================================================================

/// ASCII spelling of a vulgar fraction or the fraction slash.
fn ascii_fraction(ch: char) -> Option<&'static str> {
    let s = match ch {
        '\u{00BC}' => "1/4",  // ¼
        '\u{00BD}' => "1/2",  // ½
        '\u{00BE}' => "3/4",  // ¾
        '\u{2150}' => "1/7",  // ⅐
        '\u{2151}' => "1/9",  // ⅑
        '\u{2152}' => "1/10", // ⅒
        '\u{2153}' => "1/3",  // ⅓
        '\u{2154}' => "2/3",  // ⅔
        '\u{2155}' => "1/5",  // ⅕
        '\u{2156}' => "2/5",  // ⅖
        '\u{2157}' => "3/5",  // ⅗
        '\u{2158}' => "4/5",  // ⅘
        '\u{2159}' => "1/6",  // ⅙
        '\u{215A}' => "5/6",  // ⅚
        '\u{215B}' => "1/8",  // ⅛
        '\u{215C}' => "3/8",  // ⅜
        '\u{215D}' => "5/8",  // ⅝
        '\u{215E}' => "7/8",  // ⅞
        '\u{215F}' => "1/",   // ⅟
        '\u{2189}' => "0/3",  // ↉
        '\u{2044}' => "/",    // ⁄ fraction slash
        _ => return None,
    };
    Some(s)
}

/// Rewrite vulgar fractions and the fraction slash as ASCII.
///
/// Borrows the input when nothing needs replacing.
///
/// ```
/// use papelito::protocol::cp1252::replace_fractions;
///
/// assert_eq!(replace_fractions("½ cup"), "1/2 cup");
/// assert_eq!(replace_fractions("1⁄2"), "1/2");
/// ```
pub fn replace_fractions(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|ch| ascii_fraction(ch).is_some()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ascii_fraction(ch) {
            Some(ascii) => out.push_str(ascii),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}
