//! Code-point/code-unit utilities shared by the scan buffer and the
//! built-in scanners: decoding, whitespace classification, display width.

use crate::error::{Error, ErrorKind, Result};

/// Number of UTF-8 code units a code point occupies, given its leading
/// byte. Returns `0` for a byte that can never start a code point
/// (a continuation byte or one of the two unused lead-byte values).
pub fn utf8_len_from_lead(byte: u8) -> u8 {
    match byte {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

/// Decode one code point from the front of `bytes`, returning it and the
/// number of bytes consumed. `bytes` need not be a complete string; this
/// is used while pulling code units one at a time out of a [`crate::buffer`].
pub fn decode_utf8(bytes: &[u8]) -> Result<(char, usize)> {
    let first = *bytes
        .first()
        .ok_or_else(|| Error::from_kind(ErrorKind::EndOfInput))?;
    let len = utf8_len_from_lead(first) as usize;
    if len == 0 || bytes.len() < len {
        return Err(Error::new(
            ErrorKind::InvalidSourceState,
            "truncated or malformed utf-8 sequence",
        ));
    }
    std::str::from_utf8(&bytes[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .map(|c| (c, len))
        .ok_or_else(|| Error::new(ErrorKind::InvalidSourceState, "malformed utf-8 sequence"))
}

/// Number of `u16` code units a code point occupies when encoded as
/// UTF-16: two units above the BMP (a surrogate pair), one unit below.
pub fn utf16_len_from_lead(unit: u16) -> u8 {
    if (0xd800..=0xdbff).contains(&unit) {
        2
    } else {
        1
    }
}

pub fn decode_utf16(units: &[u16]) -> Result<(char, usize)> {
    let first = *units
        .first()
        .ok_or_else(|| Error::from_kind(ErrorKind::EndOfInput))?;
    let len = utf16_len_from_lead(first) as usize;
    if units.len() < len {
        return Err(Error::new(
            ErrorKind::InvalidSourceState,
            "truncated utf-16 surrogate pair",
        ));
    }
    char::decode_utf16(units[..len].iter().copied())
        .next()
        .and_then(|r| r.ok())
        .map(|c| (c, len))
        .ok_or_else(|| Error::new(ErrorKind::InvalidSourceState, "malformed utf-16 sequence"))
}

/// Whitespace matching in format strings and default string scanners
/// uses Unicode's `Pattern_White_Space` property; Rust's `char::is_whitespace`
/// tracks `White_Space` instead, which differs on a handful of control
/// characters not relevant to printable source text. See DESIGN.md.
pub fn is_pattern_white_space(c: char) -> bool {
    c.is_whitespace()
}

/// Width in display columns: 1 for most code points, 2 for East Asian
/// Wide/Fullwidth characters, the Yijing Hexagram Symbols block, and the
/// pictographic SMP ranges (emoji and friends).
pub fn display_width(c: char) -> u8 {
    if is_yijing_hexagram(c) || is_pictographic_smp(c) {
        return 2;
    }
    unicode_width::UnicodeWidthChar::width(c).unwrap_or(0) as u8
}

fn is_yijing_hexagram(c: char) -> bool {
    ('\u{4dc0}'..='\u{4dff}').contains(&c)
}

fn is_pictographic_smp(c: char) -> bool {
    matches!(c as u32,
        0x1f300..=0x1faff | 0x1f000..=0x1f0ff)
}

/// Sum of `display_width` over a string's characters, used to enforce
/// `width`/`precision` as hard caps during string scanning.
pub fn display_width_str(s: &str) -> usize {
    s.chars().map(|c| display_width(c) as usize).sum()
}
