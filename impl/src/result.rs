//! §4.I: turning a finished scan into what the caller gets back. The
//! original distinguishes three tail shapes (a borrowed subrange for
//! contiguous sources, an owned buffer for everything else, and a
//! prelude+remainder pair for single-pass input ranges) because its
//! scan buffer can hand out a zero-copy view into a contiguous source.
//! Ours always accumulates into one owned `String` (see
//! `buffer/mod.rs`'s doc comment), so all three collapse into the same
//! owned tail here — see DESIGN.md.

use crate::buffer::{CharSource, Cursor, ScanBuffer};

/// The source text left over after a `scan` call consumed everything
/// its format string asked for. Drains the source to completion first
/// (like [`ScanBuffer::as_contiguous`]) so non-contiguous sources
/// (`scan_iter`/`scan_reader`) report the whole remaining source, not
/// just the handful of bytes a scanner happened to look ahead at.
pub fn tail<S: CharSource>(buffer: &mut ScanBuffer<S>, pos: Cursor) -> String {
    buffer.drained_split_at(pos).1.to_string()
}
