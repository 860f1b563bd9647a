//! §4.C SCAN BUFFER: a uniform forward-iterator view over whatever kind
//! of source a `scan` call was given, plus the putback protocol that
//! lets scanners speculatively read and unread.

mod source;

pub use source::{CharSource, ForwardSource, InputSource, Mode, ReadSource, StrSource};

use crate::error::{Error, Result};

/// A position in a [`ScanBuffer`]'s accumulated text. Cheap, `Copy`,
/// meaningful only relative to the buffer that produced it — this plays
/// the role of spec.md's scan-buffer iterator, simplified per the
/// "Iterator-with-hidden-refill" design note: equality against a
/// sentinel becomes the explicit [`ScanBuffer::at_end`] call instead of
/// an `operator==` with a side effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(pub(crate) usize);

impl Cursor {
    pub fn byte_offset(self) -> usize {
        self.0
    }
}

/// Owns the accumulated text (`putback_buffer` + `current_view` from
/// spec.md, merged into one growable `String` here — see DESIGN.md for
/// why this trades the original's zero-copy contiguous fast path for a
/// single, safe representation) and the source that feeds it.
pub struct ScanBuffer<S> {
    source: S,
    buf: String,
    source_error: Option<Error>,
}

impl<S: CharSource> ScanBuffer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buf: String::new(),
            source_error: None,
        }
    }

    pub fn start(&self) -> Cursor {
        Cursor(0)
    }

    /// Drop the already-matched prefix up to `cursor`, so a later
    /// `start()` on this same buffer begins where this call left off
    /// instead of re-matching text a previous call already consumed.
    /// Used by the stdin singleton, which keeps one buffer alive across
    /// every `input()`/`prompt()` call (§5 Concurrency) — without this,
    /// `Cursor(0)` would always point back at the first byte ever read.
    pub fn commit(&mut self, cursor: Cursor) {
        let at = cursor.0.min(self.buf.len());
        self.buf.drain(..at);
    }

    pub fn is_contiguous(&self) -> bool {
        self.source.mode() == Mode::Contiguous
    }

    pub fn is_borrowed(&self) -> bool {
        self.source.is_borrowed()
    }

    /// `None` if a prior `fill()` surfaced a source error; `at_end`
    /// still distinguishes "no error, just EOF" from this.
    pub fn source_error(&self) -> Option<&Error> {
        self.source_error.as_ref()
    }

    /// Pull more text from the source until at least `upto` bytes are
    /// buffered, or the source is exhausted/erroring. Mirrors §4.C's
    /// `fill()`, called as many times as needed instead of once, since
    /// a single `fill()` in the original may only yield one code unit.
    fn ensure_filled_to(&mut self, upto: usize) -> bool {
        while self.buf.len() < upto {
            if self.source_error.is_some() {
                return false;
            }
            match self.source.fill(&mut self.buf) {
                Ok(true) => continue,
                Ok(false) => return false,
                Err(e) => {
                    self.source_error = Some(e);
                    return false;
                }
            }
        }
        true
    }

    /// Whether the buffer is exhausted at `cursor`: no more text is
    /// bufferable from the source past this position. Lazily fills as
    /// needed, which is the buffer's only side-effecting read — the
    /// same side effect spec.md's `operator==` against the sentinel has.
    pub fn at_end(&mut self, cursor: Cursor) -> bool {
        !self.ensure_filled_to(cursor.0 + 1)
    }

    /// The code point starting at `cursor`, without advancing. `None` at
    /// EOF (check `source_error()` to tell EOF from a read failure).
    pub fn peek(&mut self, cursor: Cursor) -> Option<char> {
        if !self.ensure_filled_to(cursor.0 + 4) && self.buf.len() <= cursor.0 {
            return None;
        }
        self.buf[cursor.0..].chars().next()
    }

    /// `cursor` advanced past the code point it currently points to.
    /// Panics if `cursor` is not at a char boundary or past the
    /// buffered text — callers only ever advance cursors they obtained
    /// from this same buffer, so this is a programmer error, not a
    /// runtime one.
    pub fn advance(&mut self, cursor: Cursor) -> Cursor {
        match self.peek(cursor) {
            Some(c) => Cursor(cursor.0 + c.len_utf8()),
            None => cursor,
        }
    }

    /// Pull everything remaining out of the source into `buf`. Shared by
    /// [`Self::as_contiguous`], [`Self::segment_from`], and
    /// [`crate::result::tail`], which all need the buffer's accumulated
    /// text to be the *whole* unconsumed suffix rather than whatever
    /// lookahead a scanner happened to peek.
    fn fill_to_end(&mut self) {
        while self.ensure_filled_to(self.buf.len() + 1) {}
    }

    /// The unconsumed text starting at `cursor`, filling as far as the
    /// source allows. Used by scanners that need to look at a whole run
    /// at once (`string_view`/regex fields, which require a contiguous,
    /// borrowed source and therefore a buffer that is already fully
    /// filled).
    pub fn segment_from(&mut self, cursor: Cursor) -> &str {
        self.fill_to_end();
        &self.buf[cursor.0..]
    }

    /// `sync` signals that the caller will never rewind before `pos`.
    /// Our sources never discard buffered text (see [`ReadSource`]'s
    /// doc comment), so this never fails; it exists so callers written
    /// against spec.md's contract compile unchanged if a source that
    /// *does* need to relocate memory is added later.
    pub fn sync(&mut self, _pos: Cursor) -> Result<()> {
        if let Some(e) = &self.source_error {
            return Err(e.clone());
        }
        Ok(())
    }

    /// The full contiguous source text, if this buffer's source is
    /// contiguous. Used by scanners honoring `string_view`/regex specs.
    pub fn as_contiguous(&mut self) -> Option<&str> {
        if !self.is_contiguous() {
            return None;
        }
        self.fill_to_end();
        Some(&self.buf)
    }

    /// Already-consumed-but-buffered text before `cursor`, and the part
    /// still unconsumed. Used by [`crate::result`] to materialize the
    /// tail for non-contiguous sources, whose "prelude" is everything
    /// the buffer had to read ahead of `cursor` to decide where fields
    /// ended.
    pub fn split_at(&self, cursor: Cursor) -> (&str, &str) {
        self.buf.split_at(cursor.0.min(self.buf.len()))
    }

    /// Fully drain the source before slicing at `cursor`. The public
    /// counterpart of [`Self::fill_to_end`] for [`crate::result::tail`],
    /// which needs the whole unconsumed suffix, not just whatever
    /// lookahead scanning happened to buffer.
    pub(crate) fn drained_split_at(&mut self, cursor: Cursor) -> (&str, &str) {
        self.fill_to_end();
        self.split_at(cursor)
    }
}

/// Object-safe view of a [`ScanBuffer`], erased over the source type.
/// This is what lets [`crate::args::ArgStore`] hold a single list of
/// heterogeneous `dyn Scannable` arguments instead of being generic over
/// `S` itself — only the dispatcher (`crate::dispatch`) ever sees the
/// concrete `ScanBuffer<S>`.
pub trait ScanCursor {
    fn cur_peek(&mut self, cursor: Cursor) -> Option<char>;
    fn cur_advance(&mut self, cursor: Cursor) -> Cursor;
    fn cur_at_end(&mut self, cursor: Cursor) -> bool;
    fn cur_segment_from(&mut self, cursor: Cursor) -> &str;
    fn cur_is_contiguous(&self) -> bool;
    fn cur_is_borrowed(&self) -> bool;
}

impl<S: CharSource> ScanCursor for ScanBuffer<S> {
    fn cur_peek(&mut self, cursor: Cursor) -> Option<char> {
        self.peek(cursor)
    }

    fn cur_advance(&mut self, cursor: Cursor) -> Cursor {
        self.advance(cursor)
    }

    fn cur_at_end(&mut self, cursor: Cursor) -> bool {
        self.at_end(cursor)
    }

    fn cur_segment_from(&mut self, cursor: Cursor) -> &str {
        self.segment_from(cursor)
    }

    fn cur_is_contiguous(&self) -> bool {
        self.is_contiguous()
    }

    fn cur_is_borrowed(&self) -> bool {
        self.is_borrowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_buffer_never_calls_fill_twice() {
        let mut b = ScanBuffer::new(StrSource::new("hi"));
        let start = b.start();
        assert_eq!(b.peek(start), Some('h'));
        let next = b.advance(start);
        assert_eq!(b.peek(next), Some('i'));
        let end = b.advance(next);
        assert!(b.at_end(end));
    }

    #[test]
    fn non_contiguous_buffer_advances_one_char_at_a_time() {
        let mut b = ScanBuffer::new(ForwardSource::new("xy".chars()));
        let c0 = b.start();
        assert_eq!(b.peek(c0), Some('x'));
        let c1 = b.advance(c0);
        assert_eq!(b.peek(c1), Some('y'));
        let c2 = b.advance(c1);
        assert!(b.at_end(c2));
    }

    #[test]
    fn split_at_reflects_already_buffered_prelude() {
        let mut b = ScanBuffer::new(StrSource::new("abcdef"));
        let c3 = Cursor(3);
        assert!(b.peek(c3).is_some());
        let (before, after) = b.split_at(c3);
        assert_eq!(before, "abc");
        assert_eq!(after, "def");
    }
}
