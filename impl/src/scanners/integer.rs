//! Integer scanning: sign, optional base prefix, digits, optional
//! thousands separators, overflow-checked conversion to the destination
//! width. Grounded on the original's `strtol`-style cutoff/cutlim
//! accumulation, adapted to accumulate in `u128` and let `TryFrom`
//! perform the final narrowing check — see DESIGN.md.

use crate::buffer::{Cursor, ScanCursor};
use crate::error::{Error, ErrorKind, Result};
use crate::format::{FormatSpec, Presentation};
use crate::locale::LocaleRef;

use super::{skip_ws, take_while, width_budget};

/// Narrowing conversion from an accumulated magnitude + sign into a
/// concrete integer type, with one `ErrorKind` per failure shape so
/// callers can tell "negative into unsigned" from "too big for this
/// width" apart.
pub trait ScannableInt: Sized + Copy {
    const SIGNED: bool;

    fn from_magnitude(neg: bool, magnitude: u128) -> Result<Self>;
}

macro_rules! impl_scannable_int {
    ($($t:ty => $signed:expr),* $(,)?) => {
        $(
            impl ScannableInt for $t {
                const SIGNED: bool = $signed;

                fn from_magnitude(neg: bool, magnitude: u128) -> Result<Self> {
                    if neg {
                        if !$signed {
                            return Err(Error::from_kind(ErrorKind::ValueNegativeUnderflow));
                        }
                        let overflow_point = (i128::MAX as u128) + 1;
                        if magnitude > overflow_point {
                            return Err(Error::from_kind(ErrorKind::ValueNegativeOverflow));
                        }
                        let v: i128 = if magnitude == overflow_point {
                            i128::MIN
                        } else {
                            -(magnitude as i128)
                        };
                        <$t>::try_from(v).map_err(|_| Error::from_kind(ErrorKind::ValueNegativeOverflow))
                    } else {
                        <$t>::try_from(magnitude).map_err(|_| Error::from_kind(ErrorKind::ValuePositiveOverflow))
                    }
                }
            }
        )*
    };
}

impl_scannable_int!(
    i8 => true, i16 => true, i32 => true, i64 => true, i128 => true, isize => true,
    u8 => false, u16 => false, u32 => false, u64 => false, u128 => false, usize => false,
);

fn digit_value(c: char, base: u32) -> Option<u32> {
    c.to_digit(base)
}

/// Figure out the effective base and consume any prefix it implies.
/// `Presentation::integer_base() == Some(0)` is the auto-detect case
/// (`{:i}`/`{}`): `0x`/`0X` -> 16, `0b`/`0B` -> 2, a lone leading `0` ->
/// 8, anything else -> 10. A fixed base still accepts its own canonical
/// prefix (`0x` for 16, `0b` for 2) if present, but doesn't require it.
fn consume_base_prefix(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    budget: &mut Option<usize>,
    requested: u32,
) -> (u32, Cursor) {
    let c0 = cursor.cur_peek(pos);
    let c1_pos = c0.map(|_| cursor.cur_advance(pos));
    let c1 = c1_pos.and_then(|p| cursor.cur_peek(p));

    let try_prefix = |lead: char, base: u32| -> bool {
        c0.map(|c| c.eq_ignore_ascii_case(&lead)).unwrap_or(false)
            && c1.map(|c| digit_value(c, base).is_some()).unwrap_or(false)
    };

    if (requested == 0 || requested == 16) && try_prefix('x', 16) {
        super::consume_budget(budget, c0.unwrap());
        pos = cursor.cur_advance(pos);
        super::consume_budget(budget, c1.unwrap());
        pos = cursor.cur_advance(pos);
        return (16, pos);
    }
    if (requested == 0 || requested == 2) && try_prefix('b', 2) {
        super::consume_budget(budget, c0.unwrap());
        pos = cursor.cur_advance(pos);
        super::consume_budget(budget, c1.unwrap());
        pos = cursor.cur_advance(pos);
        return (2, pos);
    }
    if requested == 0 {
        if c0 == Some('0') {
            super::consume_budget(budget, '0');
            let after_zero = cursor.cur_advance(pos);
            if let Some(c) = cursor.cur_peek(after_zero) {
                if digit_value(c, 8).is_some() {
                    return (8, after_zero);
                }
            }
            return (10, after_zero);
        }
        return (10, pos);
    }
    (requested, pos)
}

pub fn scan<T: ScannableInt>(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    spec: &FormatSpec,
    locale: &dyn LocaleRef,
) -> Result<(T, Cursor)> {
    let mut budget = width_budget(spec);
    if spec.skips_leading_whitespace() {
        pos = skip_ws(cursor, pos, &mut budget, locale);
    }

    let mut neg = false;
    if let Some(c) = cursor.cur_peek(pos) {
        if c == '+' || c == '-' {
            neg = c == '-';
            if !super::consume_budget(&mut budget, c) {
                return Err(Error::from_kind(ErrorKind::InvalidScannedValue));
            }
            pos = cursor.cur_advance(pos);
        }
    }

    let requested = match spec.presentation {
        Presentation::Default | Presentation::Char => 0,
        ref p => p.integer_base().unwrap_or(10),
    };
    let (base, new_pos) = consume_base_prefix(cursor, pos, &mut budget, requested);
    pos = new_pos;

    let sep = if spec.localized {
        Some(locale.thousands_separator())
    } else {
        None
    };

    if spec.localized && base == 10 {
        return scan_localized::<T>(cursor, pos, &mut budget, neg, sep.expect("localized sets a separator"), locale);
    }

    let mut magnitude: u128 = 0;
    let mut any_digit = false;
    let mut last_was_sep = false;
    loop {
        let Some(c) = cursor.cur_peek(pos) else { break };
        if let Some(d) = digit_value(c, base) {
            if !super::consume_budget(&mut budget, c) {
                break;
            }
            pos = cursor.cur_advance(pos);
            magnitude = magnitude
                .checked_mul(base as u128)
                .and_then(|v| v.checked_add(d as u128))
                .ok_or_else(|| {
                    Error::from_kind(if neg {
                        ErrorKind::ValueNegativeOverflow
                    } else {
                        ErrorKind::ValuePositiveOverflow
                    })
                })?;
            any_digit = true;
            last_was_sep = false;
            continue;
        }
        if sep == Some(c) && any_digit && !last_was_sep {
            if !super::consume_budget(&mut budget, c) {
                break;
            }
            pos = cursor.cur_advance(pos);
            last_was_sep = true;
            continue;
        }
        break;
    }

    if !any_digit || last_was_sep {
        return Err(Error::new(ErrorKind::InvalidScannedValue, "expected an integer"));
    }

    let value = T::from_magnitude(neg, magnitude)?;
    Ok((value, pos))
}

/// The `L`-flagged digit run: recognizes digits via the locale's own
/// classification rather than assuming ASCII, and hands the accumulated
/// run to [`LocaleRef::read_num`] instead of our own base-driven
/// accumulator. Only reached for base 10 — hex/octal/binary prefixes
/// are not locale-dependent.
fn scan_localized<T: ScannableInt>(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    budget: &mut Option<usize>,
    neg: bool,
    sep: char,
    locale: &dyn LocaleRef,
) -> Result<(T, Cursor)> {
    let mut digits = String::new();
    let mut last_was_sep = false;
    loop {
        let Some(c) = cursor.cur_peek(pos) else { break };
        if locale.is_digit(c) {
            if !super::consume_budget(budget, c) {
                break;
            }
            pos = cursor.cur_advance(pos);
            digits.push(c);
            last_was_sep = false;
            continue;
        }
        if c == sep && !digits.is_empty() && !last_was_sep {
            if !super::consume_budget(budget, c) {
                break;
            }
            pos = cursor.cur_advance(pos);
            last_was_sep = true;
            continue;
        }
        break;
    }

    if digits.is_empty() || last_was_sep {
        return Err(Error::new(ErrorKind::InvalidScannedValue, "expected an integer"));
    }

    let magnitude = locale.read_num(&digits)?;
    if magnitude < 0 {
        return Err(Error::from_kind(ErrorKind::InvalidScannedValue));
    }
    let value = T::from_magnitude(neg, magnitude as u128)?;
    Ok((value, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ScanBuffer, StrSource};
    use crate::locale::ClassicLocale;

    fn scan_i32(s: &str, spec: &FormatSpec) -> Result<(i32, Cursor)> {
        let mut buf = ScanBuffer::new(StrSource::new(s));
        let pos = buf.start();
        scan::<i32>(&mut buf, pos, spec, &ClassicLocale)
    }

    #[test]
    fn plain_decimal() {
        let spec = FormatSpec::default();
        let (v, _) = scan_i32("42 rest", &spec).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn negative_decimal() {
        let spec = FormatSpec::default();
        let (v, _) = scan_i32("-7", &spec).unwrap();
        assert_eq!(v, -7);
    }

    #[test]
    fn auto_detects_hex_prefix() {
        let spec = FormatSpec::default();
        let (v, _) = scan_i32("0x2A", &spec).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn auto_detects_octal_prefix() {
        let spec = FormatSpec::default();
        let (v, _) = scan_i32("052", &spec).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn overflow_is_reported() {
        let spec = FormatSpec::default();
        let mut buf = ScanBuffer::new(StrSource::new("99999999999"));
        let pos = buf.start();
        let err = scan::<i8>(&mut buf, pos, &spec, &ClassicLocale).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValuePositiveOverflow);
    }

    #[test]
    fn negative_into_unsigned_is_rejected() {
        let spec = FormatSpec::default();
        let mut buf = ScanBuffer::new(StrSource::new("-5"));
        let pos = buf.start();
        let err = scan::<u32>(&mut buf, pos, &spec, &ClassicLocale).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueNegativeUnderflow);
    }

    #[test]
    fn width_limits_consumed_digits() {
        let mut spec = FormatSpec::default();
        spec.width = Some(2);
        let (v, pos) = scan_i32("12345", &spec).unwrap();
        assert_eq!(v, 12);
        assert_eq!(pos.byte_offset(), 2);
    }

    #[test]
    fn thousands_separators_are_skipped_when_localized() {
        let mut spec = FormatSpec::default();
        spec.localized = true;
        let (v, _) = scan_i32("1,234", &spec).unwrap();
        assert_eq!(v, 1234);
    }

    #[test]
    fn no_digits_is_an_error() {
        let spec = FormatSpec::default();
        assert!(scan_i32("abc", &spec).is_err());
    }

    #[test]
    fn minimal_decimal_of_every_boundary_succeeds_one_past_it_overflows() {
        let spec = FormatSpec::default();

        let (v, _) = scan_i32(&i8::MAX.to_string(), &spec).unwrap();
        assert_eq!(v, i8::MAX as i32);
        let mut buf = ScanBuffer::new(StrSource::new(&(i8::MAX as i16 + 1).to_string()));
        let pos = buf.start();
        let err = scan::<i8>(&mut buf, pos, &spec, &ClassicLocale).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValuePositiveOverflow);

        let mut buf = ScanBuffer::new(StrSource::new(&i8::MIN.to_string()));
        let pos = buf.start();
        let (v, _) = scan::<i8>(&mut buf, pos, &spec, &ClassicLocale).unwrap();
        assert_eq!(v, i8::MIN);
        let mut buf = ScanBuffer::new(StrSource::new(&format!("-{}", i8::MIN as i16 * -1 + 1)));
        let pos = buf.start();
        let err = scan::<i8>(&mut buf, pos, &spec, &ClassicLocale).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueNegativeOverflow);

        let mut buf = ScanBuffer::new(StrSource::new(&u8::MAX.to_string()));
        let pos = buf.start();
        let (v, _) = scan::<u8>(&mut buf, pos, &spec, &ClassicLocale).unwrap();
        assert_eq!(v, u8::MAX);
        let mut buf = ScanBuffer::new(StrSource::new(&(u8::MAX as u16 + 1).to_string()));
        let pos = buf.start();
        let err = scan::<u8>(&mut buf, pos, &spec, &ClassicLocale).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValuePositiveOverflow);
    }

    proptest::proptest! {
        #[test]
        fn decimal_round_trips_through_i32(v in proptest::prelude::any::<i32>()) {
            let spec = FormatSpec::default();
            let (parsed, _) = scan_i32(&v.to_string(), &spec).unwrap();
            proptest::prop_assert_eq!(parsed, v);
        }

        #[test]
        fn decimal_round_trips_through_u64(v in proptest::prelude::any::<u64>()) {
            let spec = FormatSpec::default();
            let s = v.to_string();
            let mut buf = ScanBuffer::new(StrSource::new(&s));
            let pos = buf.start();
            let (parsed, _) = scan::<u64>(&mut buf, pos, &spec, &ClassicLocale).unwrap();
            proptest::prop_assert_eq!(parsed, v);
        }

        #[test]
        fn base_d_never_accepts_a_base_prefix(v in 1u32..1000) {
            let mut spec = FormatSpec::default();
            spec.presentation = crate::format::Presentation::Decimal;
            let s = format!("0x{v:x}");
            let mut buf = ScanBuffer::new(StrSource::new(&s));
            let pos = buf.start();
            let (parsed, _) = scan::<u32>(&mut buf, pos, &spec, &ClassicLocale).unwrap();
            // `{:d}` must stop at the leading zero, not interpret `0x...` as hex.
            proptest::prop_assert_eq!(parsed, 0);
        }
    }
}
