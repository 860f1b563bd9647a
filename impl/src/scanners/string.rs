//! String scanning. The default (`s`) form is "the next whitespace-
//! delimited word"; `[...]`/`/.../` presentations hand the field over to
//! the charset or regex matcher instead, neither of which skips leading
//! whitespace — a charset or regex is expected to name its own
//! separators if it wants them skipped.

use crate::buffer::{Cursor, ScanCursor};
use crate::error::{Error, ErrorKind, Result};
use crate::format::{FormatSpec, Presentation};
use crate::locale::LocaleRef;

use super::{skip_ws, width_budget};

pub fn scan(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    spec: &FormatSpec,
    locale: &dyn LocaleRef,
) -> Result<(String, Cursor)> {
    let mut budget = width_budget(spec);

    match &spec.presentation {
        Presentation::CharSet(cs) => {
            let (s, new_pos) = super::take_while(cursor, pos, &mut budget, |c| cs.matches(c));
            if s.is_empty() {
                return Err(Error::new(ErrorKind::InvalidScannedValue, "charset matched no characters"));
            }
            Ok((s, new_pos))
        }
        Presentation::Regex(_) => crate::scanners::regex::scan(cursor, pos, spec, locale),
        Presentation::Char => {
            // `format/parser.rs` rejects a precision-less `c` field before
            // scanning ever starts; this is the defensive backstop for
            // anyone constructing a `FormatSpec` by hand.
            let Some(precision) = spec.precision else {
                return Err(Error::new(
                    ErrorKind::InvalidFormatString,
                    "'c' presentation requires an explicit precision",
                ));
            };
            let mut s = String::new();
            let mut columns = 0usize;
            while columns < precision {
                let Some(c) = cursor.cur_peek(pos) else {
                    return Err(Error::from_kind(ErrorKind::EndOfInput));
                };
                pos = cursor.cur_advance(pos);
                s.push(c);
                columns += crate::unicode::display_width(c).max(1) as usize;
            }
            Ok((s, pos))
        }
        Presentation::Default | Presentation::S => {
            pos = skip_ws(cursor, pos, &mut budget, locale);
            let (s, new_pos) = super::take_while(cursor, pos, &mut budget, |c| !locale.is_space(c));
            if s.is_empty() {
                return Err(Error::from_kind(ErrorKind::EndOfInput));
            }
            Ok((s, new_pos))
        }
        _ => Err(Error::from_kind(ErrorKind::TypeNotSupported)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ScanBuffer, StrSource};
    use crate::format::CharSet;
    use crate::locale::ClassicLocale;

    fn scan_str(s: &str, spec: &FormatSpec) -> Result<(String, Cursor)> {
        let mut buf = ScanBuffer::new(StrSource::new(s));
        let pos = buf.start();
        scan(&mut buf, pos, spec, &ClassicLocale)
    }

    #[test]
    fn default_reads_one_word() {
        let spec = FormatSpec::default();
        let (s, _) = scan_str("  hello world", &spec).unwrap();
        assert_eq!(s, "hello");
    }

    #[test]
    fn width_limits_word_length_in_columns() {
        let mut spec = FormatSpec::default();
        spec.width = Some(3);
        let (s, _) = scan_str("hello", &spec).unwrap();
        assert_eq!(s, "hel");
    }

    #[test]
    fn charset_presentation_does_not_skip_whitespace() {
        let mut spec = FormatSpec::default();
        spec.presentation = Presentation::CharSet(CharSet::compile("a-z", false, "a-z".into()).unwrap());
        let (s, _) = scan_str("abc123", &spec).unwrap();
        assert_eq!(s, "abc");
    }

    #[test]
    fn empty_match_is_an_error() {
        let spec = FormatSpec::default();
        assert!(scan_str("", &spec).is_err());
    }

    #[test]
    fn char_presentation_reads_exactly_its_precision_in_columns() {
        let mut spec = FormatSpec::default();
        spec.presentation = Presentation::Char;
        spec.precision = Some(3);
        let (s, pos) = scan_str("hello", &spec).unwrap();
        assert_eq!(s, "hel");
        assert_eq!(pos.byte_offset(), 3);
    }

    #[test]
    fn char_presentation_without_precision_is_rejected() {
        let mut spec = FormatSpec::default();
        spec.presentation = Presentation::Char;
        assert!(scan_str("hello", &spec).is_err());
    }

    proptest::proptest! {
        #[test]
        fn default_word_tail_is_whitespace_or_eof(
            word in "[A-Za-z0-9]{1,10}",
            tail in "[ \t]{0,4}[A-Za-z]{0,4}",
        ) {
            let s = format!("{word}{tail}");
            let spec = FormatSpec::default();
            let mut buf = ScanBuffer::new(StrSource::new(&s));
            let pos = buf.start();
            let (_, new_pos) = scan(&mut buf, pos, &spec, &ClassicLocale).unwrap();
            if let Some(c) = buf.peek(new_pos) {
                proptest::prop_assert!(c.is_whitespace());
            }
        }

        #[test]
        fn charset_prefix_contains_only_listed_chars(s in "[abcxyz]{1,12}") {
            let mut spec = FormatSpec::default();
            spec.presentation =
                Presentation::CharSet(CharSet::compile("abc", false, "abc".into()).unwrap());
            let mut buf = ScanBuffer::new(StrSource::new(&s));
            let pos = buf.start();
            if let Ok((matched, new_pos)) = scan(&mut buf, pos, &spec, &ClassicLocale) {
                proptest::prop_assert!(matched.chars().all(|c| "abc".contains(c)));
                if let Some(c) = buf.peek(new_pos) {
                    proptest::prop_assert!(!"abc".contains(c));
                }
            }
        }

        #[test]
        fn negated_charset_prefix_excludes_listed_chars(s in "[abcxyz]{1,12}") {
            let mut spec = FormatSpec::default();
            spec.presentation =
                Presentation::CharSet(CharSet::compile("abc", true, "^abc".into()).unwrap());
            let mut buf = ScanBuffer::new(StrSource::new(&s));
            let pos = buf.start();
            if let Ok((matched, new_pos)) = scan(&mut buf, pos, &spec, &ClassicLocale) {
                proptest::prop_assert!(matched.chars().all(|c| !"abc".contains(c)));
                if let Some(c) = buf.peek(new_pos) {
                    proptest::prop_assert!("abc".contains(c));
                }
            }
        }
    }
}
