//! Floating-point scanning: decimal (fixed/scientific/general) and C99-
//! style hex-float literals, plus the `nan`/`inf` word forms. Grounded on
//! the original's separate hex-float code path; decimal forms delegate
//! to Rust's own `FromStr for f64`, which already accepts the same
//! grammar scnlib documents for `g`/`e`/`f`.

use crate::buffer::{Cursor, ScanCursor};
use crate::error::{Error, ErrorKind, Result};
use crate::format::{FormatSpec, Presentation};
use crate::locale::LocaleRef;

use super::{skip_ws, width_budget};

pub trait ScannableFloat: Sized {
    fn from_decimal_token(token: &str) -> Result<Self>;
    fn from_hex_parts(neg: bool, mantissa: f64, exponent: i32) -> Self;
}

impl ScannableFloat for f32 {
    fn from_decimal_token(token: &str) -> Result<Self> {
        token
            .parse()
            .map_err(|_| Error::new(ErrorKind::InvalidScannedValue, "expected a floating-point number"))
    }

    fn from_hex_parts(neg: bool, mantissa: f64, exponent: i32) -> Self {
        let v = (mantissa * 2f64.powi(exponent)) as f32;
        if neg {
            -v
        } else {
            v
        }
    }
}

impl ScannableFloat for f64 {
    fn from_decimal_token(token: &str) -> Result<Self> {
        token
            .parse()
            .map_err(|_| Error::new(ErrorKind::InvalidScannedValue, "expected a floating-point number"))
    }

    fn from_hex_parts(neg: bool, mantissa: f64, exponent: i32) -> Self {
        let v = mantissa * 2f64.powi(exponent);
        if neg {
            -v
        } else {
            v
        }
    }
}

/// Non-destructive peek at whether `pos` looks like the start of a C99
/// hex float (`0x`/`0X`), without consuming anything. Lets `Default`
/// presentation opt into [`scan_hex_float`] the same way it already
/// opts into decimal parsing, per the "general+hex-allowed" default.
fn looks_like_hex_float(cursor: &mut dyn ScanCursor, pos: Cursor) -> bool {
    match cursor.cur_peek(pos) {
        Some('0') => {}
        _ => return false,
    }
    let after_zero = cursor.cur_advance(pos);
    matches!(cursor.cur_peek(after_zero), Some('x' | 'X'))
}

fn consume_word(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    budget: &mut Option<usize>,
    word: &str,
) -> Option<Cursor> {
    let mut probe = pos;
    for expected in word.chars() {
        let c = cursor.cur_peek(probe)?;
        if !c.eq_ignore_ascii_case(&expected) {
            return None;
        }
        probe = cursor.cur_advance(probe);
    }
    for _ in word.chars() {
        let c = cursor.cur_peek(pos).unwrap();
        if !super::consume_budget(budget, c) {
            return None;
        }
        pos = cursor.cur_advance(pos);
    }
    Some(pos)
}

pub fn scan<T: ScannableFloat>(
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
            if super::consume_budget(&mut budget, c) {
                pos = cursor.cur_advance(pos);
            }
        }
    }

    let signed_token = |word: &str| if neg { format!("-{word}") } else { word.to_string() };

    if let Some(after) = consume_word(cursor, pos, &mut budget, "infinity") {
        return Ok((T::from_decimal_token(&signed_token("inf"))?, after));
    }
    if let Some(after) = consume_word(cursor, pos, &mut budget, "inf") {
        return Ok((T::from_decimal_token(&signed_token("inf"))?, after));
    }
    if let Some(after) = consume_word(cursor, pos, &mut budget, "nan") {
        return Ok((T::from_decimal_token(&signed_token("NaN"))?, after));
    }

    let wants_hex_float = matches!(spec.presentation, Presentation::HexFloat | Presentation::HexFloatUpper)
        || (matches!(spec.presentation, Presentation::Default) && looks_like_hex_float(cursor, pos));
    if wants_hex_float {
        return scan_hex_float(cursor, pos, &mut budget, neg);
    }

    let require_exponent = matches!(spec.presentation, Presentation::Scientific | Presentation::ScientificUpper);
    let forbid_exponent = matches!(spec.presentation, Presentation::Fixed | Presentation::FixedUpper);

    let digit = |c: char| if spec.localized { locale.is_digit(c) } else { c.is_ascii_digit() };
    let decimal_point = if spec.localized { locale.decimal_point() } else { '.' };

    let mut token = String::new();
    if neg {
        token.push('-');
    }
    let mut any_digit = false;
    let (int_part, new_pos) = super::take_while(cursor, pos, &mut budget, digit);
    pos = new_pos;
    any_digit |= !int_part.is_empty();
    token.push_str(&int_part);

    if cursor.cur_peek(pos) == Some(decimal_point) {
        if super::consume_budget(&mut budget, decimal_point) {
            pos = cursor.cur_advance(pos);
            token.push('.');
            let (frac, new_pos) = super::take_while(cursor, pos, &mut budget, digit);
            pos = new_pos;
            any_digit |= !frac.is_empty();
            token.push_str(&frac);
        }
    }

    if !any_digit {
        return Err(Error::new(ErrorKind::InvalidScannedValue, "expected a floating-point number"));
    }

    let mut has_exponent = false;
    if let Some(e @ ('e' | 'E')) = cursor.cur_peek(pos) {
        if !forbid_exponent {
            // Lookahead on a throwaway budget copy: an 'e' only belongs to
            // the exponent if at least one digit follows it (with an
            // optional sign in between), otherwise it's trailing text.
            let mut probe = cursor.cur_advance(pos);
            if let Some(sign @ ('+' | '-')) = cursor.cur_peek(probe) {
                probe = cursor.cur_advance(probe);
                let _ = sign;
            }
            let has_digit_after = cursor.cur_peek(probe).map(|c| c.is_ascii_digit()).unwrap_or(false);
            if has_digit_after {
                super::consume_budget(&mut budget, e);
                pos = cursor.cur_advance(pos);
                let mut exp_token = String::new();
                exp_token.push(e);
                if let Some(sign @ ('+' | '-')) = cursor.cur_peek(pos) {
                    exp_token.push(sign);
                    super::consume_budget(&mut budget, sign);
                    pos = cursor.cur_advance(pos);
                }
                let (digits, after) = super::take_while(cursor, pos, &mut budget, |c| c.is_ascii_digit());
                exp_token.push_str(&digits);
                pos = after;
                token.push_str(&exp_token);
                has_exponent = true;
            }
        }
    }

    if require_exponent && !has_exponent {
        return Err(Error::new(
            ErrorKind::InvalidScannedValue,
            "scientific presentation requires an exponent",
        ));
    }

    let value = T::from_decimal_token(&token)?;
    Ok((value, pos))
}

fn scan_hex_float<T: ScannableFloat>(
    cursor: &mut dyn ScanCursor,
    mut pos: Cursor,
    budget: &mut Option<usize>,
    neg: bool,
) -> Result<(T, Cursor)> {
    for expected in ['0', 'x'] {
        match cursor.cur_peek(pos) {
            Some(c) if c.eq_ignore_ascii_case(&expected) => {
                if !super::consume_budget(budget, c) {
                    return Err(Error::new(ErrorKind::InvalidScannedValue, "expected a hex float"));
                }
                pos = cursor.cur_advance(pos);
            }
            _ => return Err(Error::new(ErrorKind::InvalidScannedValue, "hex float requires a '0x' prefix")),
        }
    }

    let mut mantissa = 0f64;
    let mut any_digit = false;
    let (int_digits, new_pos) = super::take_while(cursor, pos, budget, |c| c.is_ascii_hexdigit());
    pos = new_pos;
    for d in int_digits.chars() {
        mantissa = mantissa * 16.0 + d.to_digit(16).unwrap() as f64;
        any_digit = true;
    }

    if let Some('.') = cursor.cur_peek(pos) {
        if super::consume_budget(budget, '.') {
            pos = cursor.cur_advance(pos);
            let (frac_digits, new_pos) = super::take_while(cursor, pos, budget, |c| c.is_ascii_hexdigit());
            pos = new_pos;
            let mut scale = 1.0 / 16.0;
            for d in frac_digits.chars() {
                mantissa += d.to_digit(16).unwrap() as f64 * scale;
                scale /= 16.0;
                any_digit = true;
            }
        }
    }

    if !any_digit {
        return Err(Error::new(ErrorKind::InvalidScannedValue, "hex float has no mantissa digits"));
    }

    let p = cursor.cur_peek(pos);
    if !matches!(p, Some('p' | 'P')) {
        return Err(Error::new(
            ErrorKind::InvalidScannedValue,
            "hex float requires a 'p' exponent",
        ));
    }
    if !super::consume_budget(budget, p.unwrap()) {
        return Err(Error::new(ErrorKind::InvalidScannedValue, "expected a hex float"));
    }
    pos = cursor.cur_advance(pos);

    let mut exp_neg = false;
    if let Some(s @ ('+' | '-')) = cursor.cur_peek(pos) {
        exp_neg = s == '-';
        if super::consume_budget(budget, s) {
            pos = cursor.cur_advance(pos);
        }
    }
    let (exp_digits, new_pos) = super::take_while(cursor, pos, budget, |c| c.is_ascii_digit());
    pos = new_pos;
    if exp_digits.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidScannedValue,
            "hex float exponent has no digits",
        ));
    }
    let exponent: i32 = exp_digits
        .parse()
        .map_err(|_| Error::new(ErrorKind::InvalidScannedValue, "hex float exponent out of range"))?;
    let exponent = if exp_neg { -exponent } else { exponent };

    Ok((T::from_hex_parts(neg, mantissa, exponent), pos))
}
