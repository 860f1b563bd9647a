//! §4.H: the per-field loop a `scan` call actually runs. Walks the
//! parsed format string left to right, matching literal text against
//! the source and handing replacement fields to the argument store one
//! at a time; stops at the first error so arguments past the failing
//! field are left untouched.

use crate::args::ArgStore;
use crate::buffer::{CharSource, Cursor, ScanBuffer, ScanCursor};
use crate::error::{Error, ErrorKind, Result};
use crate::format::{Align, Field, FormatSpec, FormatString};
use crate::locale::LocaleRef;

pub fn run<S: CharSource>(
    buffer: &mut ScanBuffer<S>,
    fmt: &FormatString,
    args: &mut ArgStore<'_>,
    locale: &dyn LocaleRef,
) -> Result<Cursor> {
    let pos = buffer.start();
    run_cursor(buffer, pos, fmt, args, locale)
}

/// The cursor-erased core of the loop, usable both by [`run`] (the
/// top-level entry points in `lib.rs`) and by a [`crate::args::CustomScan`]
/// impl re-entering the dispatcher for its own nested format string.
pub fn run_cursor(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    fmt: &FormatString,
    args: &mut ArgStore<'_>,
    locale: &dyn LocaleRef,
) -> Result<Cursor> {
    for field in &fmt.fields {
        match field {
            Field::Literal(text) => {
                pos = match_literal(cursor, pos, text, locale)?;
            }
            Field::Replacement { id, spec } => {
                pos = consume_leading_fill(cursor, pos, spec)?;
                pos = match args.scan_into(*id, cursor, pos, spec, locale) {
                    Some(result) => result?,
                    None => {
                        return Err(Error::new(
                            ErrorKind::InvalidFormatString,
                            format!("argument index {id} is out of range"),
                        ))
                    }
                };
                pos = consume_trailing_fill(cursor, pos, spec);
            }
        }
    }
    Ok(pos)
}

/// §4.G common preamble step 2: for right/center alignment, consume the
/// field's fill character before the type-specific scan runs, bounded by
/// `width` when one is set. A leading fill run that exhausts the entire
/// declared width leaves no room left for the value itself.
fn consume_leading_fill(cursor: &mut dyn ScanCursor, mut pos: Cursor, spec: &FormatSpec) -> Result<Cursor> {
    if !matches!(spec.align, Align::Right | Align::Center) {
        return Ok(pos);
    }
    let mut budget = spec.width;
    let mut consumed_any = false;
    while let Some(c) = cursor.cur_peek(pos) {
        if c != spec.fill {
            break;
        }
        match &mut budget {
            Some(0) => break,
            Some(remaining) => *remaining -= 1,
            None => {}
        }
        consumed_any = true;
        pos = cursor.cur_advance(pos);
    }
    if consumed_any && budget == Some(0) {
        return Err(Error::from_kind(ErrorKind::InvalidFill));
    }
    Ok(pos)
}

/// §4.G common preamble step 4: for left/center alignment, consume
/// trailing fill characters up to the remaining width budget.
fn consume_trailing_fill(cursor: &mut dyn ScanCursor, mut pos: Cursor, spec: &FormatSpec) -> Cursor {
    if !matches!(spec.align, Align::Left | Align::Center) {
        return pos;
    }
    let mut budget = spec.width;
    while let Some(c) = cursor.cur_peek(pos) {
        if c != spec.fill {
            break;
        }
        match &mut budget {
            Some(0) => break,
            Some(remaining) => *remaining -= 1,
            None => {}
        }
        pos = cursor.cur_advance(pos);
    }
    pos
}

/// A whitespace character in the format's literal text matches zero or
/// more whitespace characters in the source (classic `scanf` behavior);
/// any other literal character must match exactly.
fn match_literal(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    text: &str,
    locale: &dyn LocaleRef,
) -> Result<Cursor> {
    for expected in text.chars() {
        if expected.is_whitespace() {
            while let Some(c) = cursor.cur_peek(pos) {
                if !locale.is_space(c) {
                    break;
                }
                pos = cursor.cur_advance(pos);
            }
            continue;
        }
        match cursor.cur_peek(pos) {
            Some(c) if c == expected => pos = cursor.cur_advance(pos),
            Some(_) => return Err(Error::from_kind(ErrorKind::InvalidLiteral)),
            None => return Err(Error::from_kind(ErrorKind::EndOfInput)),
        }
    }
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{ArgTypeTag, Scannable};
    use crate::buffer::StrSource;
    use crate::format::parse;
    use crate::locale::ClassicLocale;

    #[test]
    fn literal_whitespace_matches_any_amount() {
        let fmt = parse("a   b").unwrap();
        let mut buffer = ScanBuffer::new(StrSource::new("a b"));
        let mut args = ArgStore::from_vec(vec![]);
        let pos = run(&mut buffer, &fmt, &mut args, &ClassicLocale).unwrap();
        assert!(buffer.at_end(pos));
    }

    #[test]
    fn mismatched_literal_errors() {
        let fmt = parse("a,b").unwrap();
        let mut buffer = ScanBuffer::new(StrSource::new("a;b"));
        let mut args = ArgStore::from_vec(vec![]);
        assert!(run(&mut buffer, &fmt, &mut args, &ClassicLocale).is_err());
    }

    #[test]
    fn fields_are_scanned_in_order() {
        let tags = [crate::args::ArgTypeTag::I32, crate::args::ArgTypeTag::I32];
        let fmt = crate::format::parse_checked("{},{}", &tags).unwrap();
        let mut buffer = ScanBuffer::new(StrSource::new("1,2"));
        let mut a = 0i32;
        let mut b = 0i32;
        let destinations: Vec<&mut dyn Scannable> = vec![&mut a, &mut b];
        let mut args = ArgStore::from_vec(destinations);
        run(&mut buffer, &fmt, &mut args, &ClassicLocale).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn an_error_stops_at_the_failing_field() {
        let tags = [crate::args::ArgTypeTag::I32, crate::args::ArgTypeTag::I32];
        let fmt = crate::format::parse_checked("{},{}", &tags).unwrap();
        let mut buffer = ScanBuffer::new(StrSource::new("1,x"));
        let mut a = -1i32;
        let mut b = -1i32;
        let destinations: Vec<&mut dyn Scannable> = vec![&mut a, &mut b];
        let mut args = ArgStore::from_vec(destinations);
        assert!(run(&mut buffer, &fmt, &mut args, &ClassicLocale).is_err());
        assert_eq!(a, 1);
        assert_eq!(b, -1);
    }

    #[test]
    fn right_aligned_fill_is_skipped_before_the_value() {
        let tags = [ArgTypeTag::StringOwned];
        let fmt = crate::format::parse_checked("{:*>5}", &tags).unwrap();
        let mut buffer = ScanBuffer::new(StrSource::new("***hi"));
        let mut s = String::new();
        let destinations: Vec<&mut dyn Scannable> = vec![&mut s];
        let mut args = ArgStore::from_vec(destinations);
        run(&mut buffer, &fmt, &mut args, &ClassicLocale).unwrap();
        assert_eq!(s, "hi");
    }

    #[test]
    fn left_aligned_fill_is_skipped_after_the_value() {
        let tags = [ArgTypeTag::I32];
        let fmt = crate::format::parse_checked("{:*<5}!", &tags).unwrap();
        let mut buffer = ScanBuffer::new(StrSource::new("12***!"));
        let mut n = 0i32;
        let destinations: Vec<&mut dyn Scannable> = vec![&mut n];
        let mut args = ArgStore::from_vec(destinations);
        run(&mut buffer, &fmt, &mut args, &ClassicLocale).unwrap();
        assert_eq!(n, 12);
    }

    #[test]
    fn leading_fill_exhausting_the_width_budget_is_invalid_fill() {
        let tags = [ArgTypeTag::StringOwned];
        let fmt = crate::format::parse_checked("{:*>3}", &tags).unwrap();
        let mut buffer = ScanBuffer::new(StrSource::new("***"));
        let mut s = String::new();
        let destinations: Vec<&mut dyn Scannable> = vec![&mut s];
        let mut args = ArgStore::from_vec(destinations);
        let err = run(&mut buffer, &fmt, &mut args, &ClassicLocale).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFill);
    }
}
