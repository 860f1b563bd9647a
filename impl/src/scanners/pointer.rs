//! Pointer scanning: `{:p}`'s only legal form, `0x` followed by hex
//! digits, parsed into a bare `usize` address. There's no way to
//! validate the address is live; the field exists for round-tripping
//! `{:p}`'s own output, not for deref'ing anything.

use crate::buffer::{Cursor, ScanCursor};
use crate::error::{Error, ErrorKind, Result};
use crate::format::FormatSpec;
use crate::locale::LocaleRef;

use super::{skip_ws, width_budget};

/// Scanned pointer-width address, always printed/read as `0x`-prefixed
/// hex. Wraps a `usize` since that's the only address width Rust itself
/// exposes portably.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pointer(pub usize);

pub fn scan(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    spec: &FormatSpec,
    locale: &dyn LocaleRef,
) -> Result<(Pointer, Cursor)> {
    let mut budget = width_budget(spec);
    pos = skip_ws(cursor, pos, &mut budget, locale);

    for expected in ['0', 'x'] {
        match cursor.cur_peek(pos) {
            Some(c) if c.eq_ignore_ascii_case(&expected) => {
                if !super::consume_budget(&mut budget, c) {
                    return Err(Error::new(ErrorKind::InvalidScannedValue, "expected a pointer literal"));
                }
                pos = cursor.cur_advance(pos);
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidScannedValue,
                    "pointer literal must start with '0x'",
                ))
            }
        }
    }

    let (digits, new_pos) = super::take_while(cursor, pos, &mut budget, |c| c.is_ascii_hexdigit());
    pos = new_pos;
    if digits.is_empty() {
        return Err(Error::new(ErrorKind::InvalidScannedValue, "pointer literal has no hex digits"));
    }
    let addr = usize::from_str_radix(&digits, 16)
        .map_err(|_| Error::from_kind(ErrorKind::ValuePositiveOverflow))?;
    Ok((Pointer(addr), pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ScanBuffer, StrSource};
    use crate::locale::ClassicLocale;

    #[test]
    fn parses_hex_address() {
        let mut buf = ScanBuffer::new(StrSource::new("0x1a2b"));
        let pos = buf.start();
        let spec = FormatSpec::default();
        let (p, _) = scan(&mut buf, pos, &spec, &ClassicLocale).unwrap();
        assert_eq!(p.0, 0x1a2b);
    }

    #[test]
    fn requires_0x_prefix() {
        let mut buf = ScanBuffer::new(StrSource::new("1a2b"));
        let pos = buf.start();
        let spec = FormatSpec::default();
        assert!(scan(&mut buf, pos, &spec, &ClassicLocale).is_err());
    }
}
