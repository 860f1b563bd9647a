//! Regex-presentation scanning: `/pattern/flags` fields are backed by
//! the `regex` crate directly, anchored to the field's start. Requires a
//! contiguous, borrowed source (a plain `&str` scan) since matching
//! needs to see the whole remaining text at once; non-contiguous
//! sources (readers, single-pass ranges) reject this presentation.

use crate::buffer::{Cursor, ScanCursor};
use crate::error::{Error, ErrorKind, Result};
use crate::format::{FormatSpec, Presentation};
use crate::locale::LocaleRef;
use regex::RegexBuilder;

pub fn scan(
    cursor: &mut dyn ScanCursor,
    pos: Cursor,
    spec: &FormatSpec,
    _locale: &dyn LocaleRef,
) -> Result<(String, Cursor)> {
    let rs = match &spec.presentation {
        Presentation::Regex(rs) => rs,
        _ => return Err(Error::from_kind(ErrorKind::TypeNotSupported)),
    };

    if !(cursor.cur_is_contiguous() && cursor.cur_is_borrowed()) {
        return Err(Error::new(
            ErrorKind::InvalidSourceState,
            "regex fields require a contiguous, borrowed source",
        ));
    }

    // `\A` anchors the match to the field's start; the `regex` crate's
    // public API doesn't expose POSIX leftmost-longest mode, so a
    // greedy-quantifier pattern is what gets the longest match in
    // practice, same as with any other greedy regex engine.
    let anchored = format!("\\A(?:{})", rs.pattern);
    let re = RegexBuilder::new(&anchored)
        .case_insensitive(rs.flags.nocase)
        .multi_line(rs.flags.multiline)
        .dot_matches_new_line(rs.flags.singleline)
        .build()
        .map_err(|e| Error::new(ErrorKind::InvalidFormatString, e.to_string()))?;

    let remaining = cursor.cur_segment_from(pos);
    match re.find(remaining) {
        Some(m) if m.start() == 0 => {
            let text = remaining[..m.end()].to_string();
            let new_pos = Cursor(pos.byte_offset() + m.end());
            Ok((text, new_pos))
        }
        _ => Err(Error::new(ErrorKind::InvalidScannedValue, "regex did not match")),
    }
}
