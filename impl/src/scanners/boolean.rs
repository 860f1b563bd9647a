//! Boolean scanning: either the locale's textual `true`/`false` literals
//! (the default, and the only form `L` affects) or, under an integer
//! presentation, `0`/`1` read the same way an integer field would be.

use crate::buffer::{Cursor, ScanCursor};
use crate::error::{Error, ErrorKind, Result};
use crate::format::{FormatSpec, Presentation};
use crate::locale::LocaleRef;

use super::{skip_ws, take_while, width_budget};

pub fn scan(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    spec: &FormatSpec,
    locale: &dyn LocaleRef,
) -> Result<(bool, Cursor)> {
    let mut budget = width_budget(spec);
    pos = skip_ws(cursor, pos, &mut budget, locale);

    if spec.presentation.is_integer_like() {
        return scan_numeric(cursor, pos, spec, locale);
    }

    if let Some((v, after)) = try_textual(cursor, pos, budget, locale) {
        return Ok((v, after));
    }

    if matches!(spec.presentation, Presentation::Default) {
        return scan_numeric(cursor, pos, spec, locale);
    }

    Err(Error::new(ErrorKind::InvalidScannedValue, "expected 'true' or 'false'"))
}

fn scan_numeric(
    cursor: &mut dyn ScanCursor,
    pos: Cursor,
    spec: &FormatSpec,
    locale: &dyn LocaleRef,
) -> Result<(bool, Cursor)> {
    let (v, new_pos) = crate::scanners::integer::scan::<u8>(cursor, pos, spec, locale)?;
    match v {
        0 => Ok((false, new_pos)),
        1 => Ok((true, new_pos)),
        _ => Err(Error::new(ErrorKind::InvalidScannedValue, "expected 0 or 1")),
    }
}

/// Read a whole alphabetic word and check it against the locale's own
/// spelling of `true`/`false`, rather than probing for a hardcoded
/// English literal and then asking the locale about that same literal.
fn try_textual(
    cursor: &mut dyn ScanCursor,
    pos: Cursor,
    budget: Option<usize>,
    locale: &dyn LocaleRef,
) -> Option<(bool, Cursor)> {
    let mut probe_budget = budget;
    let (word, after) = take_while(cursor, pos, &mut probe_budget, |c| c.is_alphabetic());
    if word.is_empty() {
        return None;
    }
    if locale.is_true_literal(&word) {
        Some((true, after))
    } else if locale.is_false_literal(&word) {
        Some((false, after))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ScanBuffer, StrSource};
    use crate::locale::ClassicLocale;

    fn scan_bool(s: &str, spec: &FormatSpec) -> Result<(bool, Cursor)> {
        let mut buf = ScanBuffer::new(StrSource::new(s));
        let pos = buf.start();
        scan(&mut buf, pos, spec, &ClassicLocale)
    }

    #[test]
    fn textual_true_and_false() {
        let spec = FormatSpec::default();
        assert_eq!(scan_bool("true", &spec).unwrap().0, true);
        assert_eq!(scan_bool("false", &spec).unwrap().0, false);
    }

    #[test]
    fn numeric_form() {
        let mut spec = FormatSpec::default();
        spec.presentation = Presentation::Decimal;
        assert_eq!(scan_bool("1", &spec).unwrap().0, true);
        assert_eq!(scan_bool("0", &spec).unwrap().0, false);
    }

    #[test]
    fn garbage_is_rejected() {
        let spec = FormatSpec::default();
        assert!(scan_bool("yes", &spec).is_err());
    }

    #[test]
    fn default_presentation_falls_back_to_numeric() {
        let spec = FormatSpec::default();
        assert_eq!(scan_bool("1", &spec).unwrap().0, true);
        assert_eq!(scan_bool("0", &spec).unwrap().0, false);
    }
}
