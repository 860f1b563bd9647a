//! Character scanning. `char` fields never skip leading whitespace (a
//! `char` field means "the very next code point", whitespace included)
//! unless the field explicitly uses an integer presentation, in which
//! case it's scanned exactly like any other integer and then validated
//! as a code point.

use crate::buffer::{Cursor, ScanCursor};
use crate::error::{Error, ErrorKind, Result};
use crate::format::FormatSpec;
use crate::locale::LocaleRef;

/// A raw Unicode scalar value scanned independent of Rust's `char`
/// niche rules — mirrors the closed argument-tag set's `CodePoint`
/// entry, for callers who want the code point even if validating it as
/// a `char` would be redundant work they've already done themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodePoint(pub u32);

pub fn scan_char(
    cursor: &mut dyn ScanCursor,
    pos: Cursor,
    spec: &FormatSpec,
    locale: &dyn LocaleRef,
) -> Result<(char, Cursor)> {
    if spec.presentation.is_integer_like() {
        let (v, new_pos) = crate::scanners::integer::scan::<u32>(cursor, pos, spec, locale)?;
        let c = char::from_u32(v)
            .ok_or_else(|| Error::new(ErrorKind::InvalidScannedValue, "not a valid Unicode scalar value"))?;
        return Ok((c, new_pos));
    }
    match cursor.cur_peek(pos) {
        Some(c) => Ok((c, cursor.cur_advance(pos))),
        None => Err(Error::from_kind(ErrorKind::EndOfInput)),
    }
}

pub fn scan_code_point(
    cursor: &mut dyn ScanCursor,
    pos: Cursor,
    spec: &FormatSpec,
    locale: &dyn LocaleRef,
) -> Result<(CodePoint, Cursor)> {
    let (c, new_pos) = scan_char(cursor, pos, spec, locale)?;
    Ok((CodePoint(c as u32), new_pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ScanBuffer, StrSource};
    use crate::locale::ClassicLocale;

    #[test]
    fn reads_exactly_one_code_point_including_whitespace() {
        let mut buf = ScanBuffer::new(StrSource::new(" x"));
        let pos = buf.start();
        let spec = FormatSpec::default();
        let (c, _) = scan_char(&mut buf, pos, &spec, &ClassicLocale).unwrap();
        assert_eq!(c, ' ');
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut buf = ScanBuffer::new(StrSource::new(""));
        let pos = buf.start();
        let spec = FormatSpec::default();
        assert!(scan_char(&mut buf, pos, &spec, &ClassicLocale).is_err());
    }
}
