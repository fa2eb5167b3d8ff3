#![forbid(unsafe_code)]

//! Printed column widths.
//!
//! Widths come from the `unicode-width` tables and are accounted per code
//! point, not per grapheme cluster:
//! - combining marks and other zero-width code points are 0 cells
//! - control characters are 0 cells
//! - East Asian wide and fullwidth code points are 2 cells
//! - everything else, including ambiguous-width code points, is 1 cell
//!
//! # Example
//! ```
//! use ftui_skip::width::{printable_width, rune_width};
//!
//! assert_eq!(rune_width('a'), 1);
//! assert_eq!(rune_width('你'), 2);
//! assert_eq!(printable_width("\x1b[1mhello你好\x1b[0m"), 9);
//! ```

use unicode_width::UnicodeWidthChar;

use crate::ansi;

/// Printed width of a single code point.
#[inline]
#[must_use]
pub fn rune_width(c: char) -> usize {
    if c.is_ascii() {
        return usize::from(!c.is_ascii_control());
    }
    c.width().unwrap_or(0)
}

/// Printed width of a string, ignoring escape sequences.
#[must_use]
pub fn printable_width(text: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;

    for c in text.chars() {
        if ansi::is_marker(c) {
            in_escape = true;
        } else if in_escape {
            if ansi::is_terminator(c) {
                in_escape = false;
            }
        } else {
            width += rune_width(c);
        }
    }

    width
}
