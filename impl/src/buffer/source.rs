//! The four source variants of §4.C SCAN BUFFER, selected statically by
//! the type parameter on [`super::ScanBuffer`] rather than dispatched
//! through a trait object — the source kind is always known at the
//! `scan` call site.

use crate::error::{Error, ErrorKind, Result};
use std::io::Read;

/// Whether a buffer's `current_view` is the *whole* source (no `fill()`
/// will ever be called again) or is produced incrementally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Contiguous,
    NonContiguous,
}

/// The capability a [`super::ScanBuffer`] needs from whatever sits behind
/// it. `fill` extends the buffer's accumulated text by at least one
/// character and reports whether it made progress; `false` is EOF unless
/// `fill` itself returns `Err`.
pub trait CharSource {
    fn mode(&self) -> Mode;

    /// Append more text to `buf`. Returns `Ok(true)` if at least one
    /// character was appended, `Ok(false)` at a clean EOF.
    fn fill(&mut self, buf: &mut String) -> Result<bool>;

    /// Whether this source can hand out a borrowed tail (`string_view`
    /// and `/regex/` fields require this, per §4.F).
    fn is_borrowed(&self) -> bool {
        self.mode() == Mode::Contiguous
    }
}

/// A contiguous, already-fully-available `&str` — the common case for
/// `scan("42", "{}")`. `fill` is called exactly once, to hand the whole
/// string to the buffer; `is_contiguous()`/`get_contiguous()` callers see
/// `Mode::Contiguous` and can treat the buffer's accumulated text as the
/// entire source for the lifetime of the call.
pub struct StrSource<'a> {
    s: &'a str,
    handed_out: bool,
}

impl<'a> StrSource<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            s,
            handed_out: false,
        }
    }
}

impl<'a> CharSource for StrSource<'a> {
    fn mode(&self) -> Mode {
        Mode::Contiguous
    }

    fn fill(&mut self, buf: &mut String) -> Result<bool> {
        if self.handed_out {
            return Ok(false);
        }
        buf.push_str(self.s);
        self.handed_out = true;
        Ok(true)
    }
}

/// A forward range of `char` that may be iterated more than once by the
/// caller (but is consumed exactly once by a given `scan` call).
pub struct ForwardSource<I> {
    iter: I,
}

impl<I: Iterator<Item = char>> ForwardSource<I> {
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I: Iterator<Item = char>> CharSource for ForwardSource<I> {
    fn mode(&self) -> Mode {
        Mode::NonContiguous
    }

    fn fill(&mut self, buf: &mut String) -> Result<bool> {
        match self.iter.next() {
            Some(c) => {
                buf.push(c);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// A single-pass input range. Behaves like [`ForwardSource`] for
/// scanning purposes; the distinction only matters to
/// [`crate::result`], which must graft the unconsumed-but-buffered
/// "prelude" onto the tail instead of handing back a sub-range of the
/// original range (the original range is gone once iterated).
pub struct InputSource<I> {
    iter: I,
}

impl<I: Iterator<Item = char>> InputSource<I> {
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I: Iterator<Item = char>> CharSource for InputSource<I> {
    fn mode(&self) -> Mode {
        Mode::NonContiguous
    }

    fn fill(&mut self, buf: &mut String) -> Result<bool> {
        match self.iter.next() {
            Some(c) => {
                buf.push(c);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn is_borrowed(&self) -> bool {
        false
    }
}

/// A byte-oriented reader (file, stdin, socket...). `fill` decodes one
/// UTF-8 code point per call by reading its leading byte and then
/// however many continuation bytes `utf8_len_from_lead` says it needs.
///
/// §9's Open Question about `ungetc`'s one-character guarantee is
/// resolved here by never relying on the platform's putback at all: the
/// whole decoded text is retained in the buffer's own `putback`/`current`
/// accumulation, so `sync()` is always satisfiable without touching the
/// underlying reader.
pub struct ReadSource<R> {
    reader: R,
}

impl<R: Read> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn mode(&self) -> Mode {
        Mode::NonContiguous
    }

    fn fill(&mut self, buf: &mut String) -> Result<bool> {
        let mut lead = [0u8; 1];
        match self.reader.read(&mut lead) {
            Ok(0) => return Ok(false),
            Ok(_) => {}
            Err(e) => return Err(Error::new(ErrorKind::InvalidSourceState, e.to_string())),
        }
        let len = crate::unicode::utf8_len_from_lead(lead[0]);
        if len == 0 {
            return Err(Error::new(
                ErrorKind::InvalidSourceState,
                "invalid utf-8 lead byte from source",
            ));
        }
        let mut bytes = vec![0u8; len as usize];
        bytes[0] = lead[0];
        if len > 1 {
            self.reader
                .read_exact(&mut bytes[1..])
                .map_err(|e| Error::new(ErrorKind::InvalidSourceState, e.to_string()))?;
        }
        let (c, _) = crate::unicode::decode_utf8(&bytes)?;
        buf.push(c);
        Ok(true)
    }

    fn is_borrowed(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_source_fills_once_then_eof() {
        let mut s = StrSource::new("ab");
        let mut buf = String::new();
        assert!(s.fill(&mut buf).unwrap());
        assert_eq!(buf, "ab");
        assert!(!s.fill(&mut buf).unwrap());
    }

    #[test]
    fn forward_source_fills_one_char_at_a_time() {
        let mut s = ForwardSource::new("xy".chars());
        let mut buf = String::new();
        assert!(s.fill(&mut buf).unwrap());
        assert_eq!(buf, "x");
        assert!(s.fill(&mut buf).unwrap());
        assert_eq!(buf, "xy");
        assert!(!s.fill(&mut buf).unwrap());
    }

    #[test]
    fn read_source_decodes_multibyte_utf8() {
        let data = "é".as_bytes().to_vec();
        let mut s = ReadSource::new(&data[..]);
        let mut buf = String::new();
        assert!(s.fill(&mut buf).unwrap());
        assert_eq!(buf, "é");
        assert!(!s.fill(&mut buf).unwrap());
    }
}
