// MIT License
//
// Copyright (c) 2024 the vscan contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! `vscan` reads structured values out of text the way `format!` writes
//! them into it: a format string describes a sequence of literal text
//! and typed replacement fields, and scanning consumes a source one
//! field at a time, type-checked against the destinations you pass in.
//!
//! ```
//! let mut year = 0i32;
//! let mut name = String::new();
//! let tail = vscan::scan("1969 Apollo 11", "{} {}", vec![&mut year, &mut name]).unwrap();
//! assert_eq!(year, 1969);
//! assert_eq!(name, "Apollo");
//! assert_eq!(tail, " 11");
//! ```

mod args;
mod buffer;
mod dispatch;
mod error;
mod format;
mod locale;
mod result;
mod scanners;
mod unicode;

use std::io::{self, Read, Write};
use std::sync::{Mutex, OnceLock};

pub use args::{ArgTypeTag, CustomScan, Scannable};
pub use buffer::{CharSource, Cursor, ForwardSource, InputSource, ReadSource, ScanCursor, StrSource};
pub use error::{Error, ErrorKind, Result};
pub use format::{parse, parse_checked, Align, CharSet, FormatSpec, FormatString, Presentation, RegexFlags, RegexSpec};
pub use locale::{ClassicLocale, LocaleRef};
pub use scanners::character::CodePoint;
pub use scanners::integer::ScannableInt;
pub use scanners::pointer::Pointer;

use buffer::ScanBuffer;

/// Scan `source`, a plain string, against `fmt` under the classic
/// locale. Returns whatever text was left over once every field in
/// `fmt` was consumed.
pub fn scan(source: &str, fmt: &str, args: Vec<&mut dyn Scannable>) -> Result<String> {
    scan_locale(source, fmt, args, &ClassicLocale)
}

/// As [`scan`], but with an explicit locale for `L`-flagged fields.
pub fn scan_locale(
    source: &str,
    fmt: &str,
    args: Vec<&mut dyn Scannable>,
    locale: &dyn LocaleRef,
) -> Result<String> {
    let mut buffer = ScanBuffer::new(StrSource::new(source));
    scan_into(&mut buffer, fmt, args, locale)
}

/// Scan any forward range of `char`s (iterated at most once) against
/// `fmt`. `[...]`/`/.../` presentations are unavailable here since they
/// need a contiguous, borrowed source.
pub fn scan_iter<I: Iterator<Item = char>>(
    source: I,
    fmt: &str,
    args: Vec<&mut dyn Scannable>,
) -> Result<String> {
    let mut buffer = ScanBuffer::new(ForwardSource::new(source));
    scan_into(&mut buffer, fmt, args, &ClassicLocale)
}

/// Scan a byte reader (a file, a socket, ...) against `fmt`, decoding
/// its contents as UTF-8 one code point at a time.
pub fn scan_reader<R: Read>(source: R, fmt: &str, args: Vec<&mut dyn Scannable>) -> Result<String> {
    let mut buffer = ScanBuffer::new(ReadSource::new(source));
    scan_into(&mut buffer, fmt, args, &ClassicLocale)
}

fn scan_into<S: CharSource>(
    buffer: &mut ScanBuffer<S>,
    fmt: &str,
    args: Vec<&mut dyn Scannable>,
    locale: &dyn LocaleRef,
) -> Result<String> {
    let pos = run_scan(buffer, fmt, args, locale)?;
    let tail = result::tail(buffer, pos);
    #[cfg(feature = "trace")]
    log::trace!(target: "vscan", "scan succeeded, {} byte(s) left over", tail.len());
    Ok(tail)
}

/// The part of [`scan_into`] shared with [`input`]: parse `fmt`, run the
/// dispatcher, and hand back the cursor the scan stopped at. Kept
/// separate from the tail-materializing half since `input`'s stdin
/// buffer must not be fully drained to compute a tail nobody asked for —
/// that would block on a live terminal waiting for EOF that never comes.
fn run_scan<S: CharSource>(
    buffer: &mut ScanBuffer<S>,
    fmt: &str,
    args: Vec<&mut dyn Scannable>,
    locale: &dyn LocaleRef,
) -> Result<Cursor> {
    let tags: Vec<ArgTypeTag> = args.iter().map(|a| a.tag()).collect();
    let parsed = format::parse_checked(fmt, &tags)?;
    #[cfg(feature = "trace")]
    log::trace!(target: "vscan", "scanning {} argument(s) against {:?}", tags.len(), fmt);
    let mut store = args::ArgStore::from_vec(args);
    dispatch::run(buffer, &parsed, &mut store, locale)
}

/// Run a parsed format string against an already-positioned cursor,
/// writing into `args` as fields are matched. This is the primitive
/// [`vscan_derive`](https://docs.rs/vscan_derive)'s generated
/// `CustomScan` impls call: a derived struct's own inner format string
/// is re-entered through the same dispatcher a top-level `scan` call
/// uses, so nested custom types compose for free.
pub fn scan_nested(
    cursor: &mut dyn ScanCursor,
    pos: Cursor,
    fmt: &FormatString,
    args: Vec<&mut dyn Scannable>,
    locale: &dyn LocaleRef,
) -> Result<Cursor> {
    let mut store = args::ArgStore::from_vec(args);
    dispatch::run_cursor(cursor, pos, fmt, &mut store, locale)
}

/// Scan a single value out of `source` using the implicit `"{}"`
/// format string. `scan_value::<T>(s)` is always equivalent to
/// `scan(s, "{}", vec![&mut v])` with `v` defaulted first.
pub fn scan_value<T: Scannable + Default>(source: &str) -> Result<(T, String)> {
    let mut value = T::default();
    let tail = scan(source, "{}", vec![&mut value])?;
    Ok((value, tail))
}

/// Scan a single integer directly, bypassing the format-string machinery
/// entirely — the fast path for the overwhelmingly common "just parse
/// this number" call.
pub fn scan_int<T: ScannableInt>(source: &str) -> Result<(T, String)> {
    let mut buffer = ScanBuffer::new(StrSource::new(source));
    let pos = buffer.start();
    let spec = FormatSpec::default();
    let (value, new_pos) = scanners::integer::scan::<T>(&mut buffer, pos, &spec, &ClassicLocale)?;
    Ok((value, result::tail(&mut buffer, new_pos)))
}

/// As [`scan_int`], but additionally requires that `source` contains
/// nothing but the integer (trailing whitespace is still allowed).
/// Useful for validating whole fields (command-line arguments,
/// individual CSV cells) rather than a prefix of a longer stream.
pub fn scan_int_exhaustive_valid<T: ScannableInt>(source: &str) -> Result<T> {
    let (value, tail) = scan_int::<T>(source)?;
    if tail.trim().is_empty() {
        Ok(value)
    } else {
        Err(Error::new(
            ErrorKind::InvalidScannedValue,
            "trailing characters after the integer",
        ))
    }
}

struct StdinBytes;

impl Read for StdinBytes {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::stdin().lock().read(buf)
    }
}

type StdinBuffer = ScanBuffer<ReadSource<StdinBytes>>;

fn stdin_buffer() -> &'static Mutex<StdinBuffer> {
    static BUFFER: OnceLock<Mutex<StdinBuffer>> = OnceLock::new();
    BUFFER.get_or_init(|| Mutex::new(ScanBuffer::new(ReadSource::new(StdinBytes))))
}

/// Scan standard input against `fmt`. All callers across the process
/// share one buffer (see §5 Concurrency) so that putback text from one
/// call is visible to the next; concurrent callers block on each other
/// rather than racing over the same bytes.
///
/// Unlike [`scan`]/[`scan_reader`], this does not materialize a tail:
/// doing so would drain the buffer's source to EOF, which on a live
/// terminal means blocking forever. Instead, the buffer commits past
/// whatever this call consumed, so the next `input`/`prompt` call picks
/// up exactly where this one left off instead of re-matching it.
pub fn input(fmt: &str, args: Vec<&mut dyn Scannable>) -> Result<()> {
    let mut buffer = stdin_buffer().lock().unwrap_or_else(|e| e.into_inner());
    let pos = run_scan(&mut buffer, fmt, args, &ClassicLocale)?;
    buffer.commit(pos);
    Ok(())
}

/// Print `message` to standard output, then [`input`] against `fmt`.
pub fn prompt(message: &str, fmt: &str, args: Vec<&mut dyn Scannable>) -> Result<()> {
    print!("{message}");
    io::stdout().flush().map_err(|e| Error::new(ErrorKind::InvalidSourceState, e.to_string()))?;
    input(fmt, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_two_positional_fields() {
        let mut a = 0i32;
        let mut b = String::new();
        let tail = scan("1969 Apollo", "{} {}", vec![&mut a, &mut b]).unwrap();
        assert_eq!(a, 1969);
        assert_eq!(b, "Apollo");
        assert_eq!(tail, "");
    }

    #[test]
    fn scan_value_matches_scan_with_implicit_field() {
        let (v, tail) = scan_value::<i32>("42 rest").unwrap();
        assert_eq!(v, 42);
        assert_eq!(tail, " rest");
    }

    #[test]
    fn scan_int_is_a_fast_path_for_bare_integers() {
        let (v, tail) = scan_int::<u32>("123abc").unwrap();
        assert_eq!(v, 123);
        assert_eq!(tail, "abc");
    }

    #[test]
    fn scan_int_exhaustive_valid_rejects_trailing_garbage() {
        assert!(scan_int_exhaustive_valid::<u32>("123abc").is_err());
        assert!(scan_int_exhaustive_valid::<u32>("123  ").is_ok());
    }

    #[test]
    fn mismatched_literal_text_is_an_error() {
        let mut a = 0i32;
        assert!(scan("x=1", "y={}", vec![&mut a]).is_err());
    }

    proptest::proptest! {
        #[test]
        fn literal_only_format_consumes_its_own_prefix(prefix in "[A-Za-z ]{0,8}", rest in "[A-Za-z0-9]{0,8}") {
            let source = format!("{prefix}{rest}");
            let tail = scan(&source, &prefix, vec![]).unwrap();
            proptest::prop_assert_eq!(tail, rest);
        }

        #[test]
        fn scan_value_matches_scan_with_implicit_field_prop(v in proptest::prelude::any::<i32>(), tail in "[A-Za-z ]{0,6}") {
            let source = format!("{v}{tail}");
            let (value, via_scan_value) = scan_value::<i32>(&source).unwrap();
            let mut via_scan = 0i32;
            let via_scan_tail = scan(&source, "{}", vec![&mut via_scan]).unwrap();
            proptest::prop_assert_eq!(value, via_scan);
            proptest::prop_assert_eq!(via_scan_value, via_scan_tail);
        }
    }
}
