//! Locale plumbing. Per §1 Non-goals this is a thin collaborator: the
//! core only ever calls through the [`LocaleRef`] capability set, never
//! touches the platform locale APIs directly.

use crate::error::Result;

/// Capabilities the scanners need from a locale when a field carries the
/// `L` flag. A `locale` value is read-only for the duration of a `scan`
/// call (§5 CONCURRENCY).
pub trait LocaleRef {
    fn is_digit(&self, c: char) -> bool {
        c.is_ascii_digit()
    }

    fn is_space(&self, c: char) -> bool {
        crate::unicode::is_pattern_white_space(c)
    }

    /// The character used to group digits, e.g. `,` in `1,234`.
    fn thousands_separator(&self) -> char {
        ','
    }

    /// The character used as the decimal point, e.g. `.` in `3.14`.
    fn decimal_point(&self) -> char {
        '.'
    }

    /// Whether `true`/`false` are spelled the way `is_true`/`is_false`
    /// expect; the classic locale's textual boolean literals.
    fn is_true_literal(&self, s: &str) -> bool {
        s == "true"
    }

    fn is_false_literal(&self, s: &str) -> bool {
        s == "false"
    }

    /// Parse a run of digits using whatever locale-specific numeral
    /// system applies (`L` flag delegates here instead of to the
    /// built-in ASCII-digit scanner).
    fn read_num(&self, digits: &str) -> Result<i64> {
        digits
            .parse()
            .map_err(|_| crate::error::Error::from_kind(crate::error::ErrorKind::InvalidScannedValue))
    }
}

/// The C/"classic" locale: ASCII digits, `,` thousands separator, `.`
/// decimal point, case-sensitive `true`/`false`. This is the default used
/// whenever a caller does not supply an explicit locale.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicLocale;

impl LocaleRef for ClassicLocale {}
