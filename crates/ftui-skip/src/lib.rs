#![forbid(unsafe_code)]

//! Horizontal scrolling for rendered terminal lines.
//!
//! This crate drops leading printed columns from a line of text:
//! - [`SkipWriter`] - streaming filter over any [`std::io::Write`] sink
//! - [`SkipOptions`] - builder for writer parameters
//! - [`skip()`] and friends - one-shot helpers for whole lines
//! - [`width`] - per-rune printed widths
//! - [`ansi`] - escape sequence boundaries
//!
//! Escape sequences are passed through untouched and never count as
//! columns. Wide runes cut in half by the scroll offset are replaced with
//! spaces so the rest of the line keeps its alignment.
//!
//! # Example
//! ```
//! use ftui_skip::{skip, skip_with_prefix, SkipWriter};
//!
//! assert_eq!(skip("foobar", 3), "bar");
//! assert_eq!(skip_with_prefix("foobar", 3, "…"), "…ar");
//!
//! // Wide rune on the boundary becomes padding
//! assert_eq!(skip("hello你好", 6), " 好");
//!
//! // Styling survives the cut
//! assert_eq!(
//!     skip("\x1b[38;2;249;38;114mhello你好\x1b[0m", 6),
//!     "\x1b[38;2;249;38;114m 好\x1b[0m",
//! );
//!
//! // Forward into another writer
//! let mut out: Vec<u8> = Vec::new();
//! let mut writer = SkipWriter::with_sink(&mut out, 2, "");
//! writer.write_str("abcd").unwrap();
//! drop(writer);
//! assert_eq!(out, b"cd");
//! ```

pub mod ansi;
pub mod error;
pub mod skip;
pub mod width;

pub use error::SkipError;
pub use skip::{SkipOptions, SkipWriter};
pub use width::{printable_width, rune_width};

/// Drop `width` printed columns from the start of `line`.
#[must_use]
pub fn skip(line: &str, width: usize) -> String {
    skip_with_prefix(line, width, "")
}

/// Drop `width` printed columns from the start of `line`, marking the cut
/// with `prefix`.
///
/// The prefix replaces skipped content rather than adding to it, so the
/// visible text after it starts at the same column it would without a
/// prefix. It is not inserted when `width` is 0.
#[must_use]
pub fn skip_with_prefix(line: &str, width: usize, prefix: &str) -> String {
    let mut writer = SkipWriter::new(width, prefix);
    let _ = writer.write_str(line);
    writer.into_string()
}

/// Byte-slice form of [`skip`].
#[must_use]
pub fn skip_bytes(line: &[u8], width: usize) -> Vec<u8> {
    skip_bytes_with_prefix(line, width, &[])
}

/// Byte-slice form of [`skip_with_prefix`].
///
/// Invalid UTF-8 in `line` or `prefix` is replaced with U+FFFD.
#[must_use]
pub fn skip_bytes_with_prefix(line: &[u8], width: usize, prefix: &[u8]) -> Vec<u8> {
    let mut writer = SkipWriter::new(width, String::from_utf8_lossy(prefix));
    let _ = writer.write_bytes(line);
    writer.finish().unwrap_or_default()
}
