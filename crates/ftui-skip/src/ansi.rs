#![forbid(unsafe_code)]

//! Escape sequence recognition.
//!
//! The skipping filter never interprets escape sequences. It only needs to
//! know where one starts and where it ends so the bytes in between can be
//! passed through without being counted as printed columns.
//!
//! # Sequence Reference
//!
//! | Category | Sequence | Terminator |
//! |----------|----------|------------|
//! | CSI | `ESC [ 38;2;r;g;b m` | `m` |
//! | CSI | `ESC [ row ; col H` | `H` |
//! | CSI | `ESC [ n K` | `K` |
//! | DEC | `ESC 7` / `ESC 8` | none (runs until the next letter) |
//!
//! Only the 7-bit introducer is recognized. An 8-bit C1 CSI (`U+009B`) is
//! treated as an ordinary rune.

/// Escape sequence start marker (`ESC`).
pub const MARKER: char = '\x1b';

/// Returns true if `c` starts an escape sequence.
#[inline]
#[must_use]
pub const fn is_marker(c: char) -> bool {
    c == MARKER
}

/// Returns true if `c` ends an escape sequence.
///
/// Any ASCII letter terminates a sequence. Parameter and intermediate
/// bytes (`0`-`9`, `;`, `[`, `?`, ...) never do.
#[inline]
#[must_use]
pub const fn is_terminator(c: char) -> bool {
    matches!(c, '\x40'..='\x5a' | '\x61'..='\x7a')
}
