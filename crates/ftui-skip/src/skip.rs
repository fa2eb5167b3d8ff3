#![forbid(unsafe_code)]

//! Streaming column skipper.
//!
//! [`SkipWriter`] drops a number of leading printed columns from a line of
//! text while copying escape sequences through untouched. It is the building
//! block for horizontally scrolled viewports: render the line as usual, then
//! pipe it through a writer configured with the scroll offset.
//!
//! # Column accounting
//!
//! - Escape sequences never consume columns.
//! - Wide runes consume two columns. A wide rune that straddles the skip
//!   boundary is replaced by spaces so the surviving content keeps its
//!   alignment.
//! - An optional prefix marks the cut. Its width is charged against the
//!   skipped columns, so `skip + prefix` still removes exactly `width`
//!   columns of content.
//!
//! State persists across writes, so a line may arrive in arbitrary chunks,
//! including chunks that split an escape sequence or a multi-byte rune.
//!
//! # Example
//! ```
//! use ftui_skip::SkipWriter;
//!
//! let mut writer = SkipWriter::new(6, "…");
//! writer.write_str("\x1b[1mhello").unwrap();
//! writer.write_str("你好\x1b[0m").unwrap();
//! assert_eq!(writer.to_string_lossy(), "\x1b[1m…好\x1b[0m");
//! ```

use std::borrow::Cow;
use std::io::{self, Write};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::ansi;
use crate::error::SkipError;
use crate::width::{printable_width, rune_width};

/// Emitted in place of bytes that are not valid UTF-8.
const REPLACEMENT: &str = "\u{FFFD}";

/// Filler for the columns of a straddling wide rune.
const FILL: &[u8] = b" ";

/// Construction parameters for a [`SkipWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkipOptions {
    /// Printed columns to drop from the start of the line.
    pub width: usize,
    /// Marker inserted where content was cut. Ignored when `width` is 0.
    pub prefix: String,
}

impl SkipOptions {
    /// Create options that skip `width` columns with no prefix.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            prefix: String::new(),
        }
    }

    /// Set the prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Build a writer that collects output in an internal buffer.
    #[must_use]
    pub fn writer(self) -> SkipWriter {
        SkipWriter::with_sink(Vec::new(), self.width, self.prefix)
    }

    /// Build a writer that forwards output to `sink`.
    #[must_use]
    pub fn writer_with_sink<W: Write>(self, sink: W) -> SkipWriter<W> {
        SkipWriter::with_sink(sink, self.width, self.prefix)
    }
}

/// Drops leading printed columns from a stream while leaving escape
/// sequences intact.
///
/// The sink is any [`Write`]. With the default `Vec<u8>` sink the result is
/// read back with [`as_bytes`](SkipWriter::as_bytes) or
/// [`to_string_lossy`](SkipWriter::to_string_lossy).
///
/// A writer handles exactly one line. Construct a new one per line.
#[derive(Debug)]
pub struct SkipWriter<W = Vec<u8>> {
    skip_width: usize,
    prefix: String,
    /// Column at which content becomes visible: `skip_width` plus the
    /// prefix width, or 0 when nothing is skipped.
    threshold: usize,
    consumed: usize,
    in_escape: bool,
    prefix_emitted: bool,
    /// Leading bytes of a rune split across writes.
    pending: SmallVec<[u8; 4]>,
    sink: W,
}

impl SkipWriter {
    /// Create a writer that collects its output in an internal buffer.
    #[must_use]
    pub fn new(width: usize, prefix: impl Into<String>) -> Self {
        Self::with_sink(Vec::new(), width, prefix)
    }

    /// The output written so far.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.sink
    }

    /// The output written so far, as text.
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.sink)
    }

    /// Consume the writer and return its output.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.sink
    }

    /// Consume the writer and return its output as text.
    #[must_use]
    pub fn into_string(self) -> String {
        String::from_utf8(self.sink)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }
}

impl<W> SkipWriter<W> {
    /// Create a writer that forwards its output to `sink`.
    #[must_use]
    pub fn with_sink(sink: W, width: usize, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let threshold = if width > 0 {
            width.saturating_add(printable_width(&prefix))
        } else {
            0
        };
        Self {
            skip_width: width,
            prefix,
            threshold,
            consumed: 0,
            in_escape: false,
            prefix_emitted: false,
            pending: SmallVec::new(),
            sink,
        }
    }

    /// Requested number of columns to skip.
    #[inline]
    #[must_use]
    pub fn skip_width(&self) -> usize {
        self.skip_width
    }

    /// The cut marker.
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Column before which visible runes are suppressed.
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Printed columns accounted for so far.
    ///
    /// Accounting stops once the threshold is reached.
    #[inline]
    #[must_use]
    pub fn consumed_width(&self) -> usize {
        self.consumed
    }

    /// Whether the stream currently sits inside an unterminated escape
    /// sequence.
    #[inline]
    #[must_use]
    pub fn in_escape(&self) -> bool {
        self.in_escape
    }

    /// Whether the skipped region has been passed.
    #[inline]
    #[must_use]
    pub fn is_past_threshold(&self) -> bool {
        self.consumed >= self.threshold
    }

    /// Get a reference to the sink.
    #[inline]
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Get a mutable reference to the sink.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consume the writer and return the sink.
    ///
    /// A rune left incomplete by the last write is discarded; use
    /// [`finish`](SkipWriter::finish) to emit it as U+FFFD instead.
    #[inline]
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> SkipWriter<W> {
    /// Filter a chunk of text.
    ///
    /// Returns the number of input bytes consumed, which is always the
    /// whole chunk.
    ///
    /// # Errors
    ///
    /// Returns [`SkipError::SinkWriteFailed`] if the sink rejects output.
    /// The rest of the chunk is dropped and the writer keeps the state
    /// implied by the bytes the sink accepted.
    pub fn write_str(&mut self, text: &str) -> Result<usize, SkipError> {
        if !self.pending.is_empty() {
            // A split rune cannot be completed by a `&str`.
            self.pending.clear();
            self.push_str(REPLACEMENT)?;
        }
        self.push_str(text)?;
        Ok(text.len())
    }

    /// Filter a chunk of UTF-8 bytes.
    ///
    /// A rune split across calls is held back until its remaining bytes
    /// arrive. Invalid sequences are replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns [`SkipError::SinkWriteFailed`] if the sink rejects output.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, SkipError> {
        let rest = if self.pending.is_empty() {
            bytes
        } else {
            self.complete_pending(bytes)?
        };
        self.push_utf8(rest)?;
        Ok(bytes.len())
    }

    /// End the stream and return the sink.
    ///
    /// A rune left incomplete by the last write is emitted as U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns [`SkipError::SinkWriteFailed`] if the sink rejects output.
    pub fn finish(mut self) -> Result<W, SkipError> {
        if !self.pending.is_empty() {
            self.pending.clear();
            self.push_str(REPLACEMENT)?;
        }
        emit_flush(&mut self.sink)?;
        Ok(self.sink)
    }

    /// Feed the continuation bytes at the head of `input` to the pending
    /// rune and return what is left.
    ///
    /// `pending` only ever holds a prefix of a valid encoding, so a rejected
    /// head decodes to exactly one U+FFFD, as it would in a single write.
    fn complete_pending<'a>(&mut self, input: &'a [u8]) -> Result<&'a [u8], SkipError> {
        let held = self.pending.len();
        let needed = utf8_sequence_len(self.pending[0]).saturating_sub(held);
        let available = input
            .iter()
            .take(needed)
            .take_while(|b| is_continuation(**b))
            .count();

        let mut head = std::mem::take(&mut self.pending);
        head.extend_from_slice(&input[..available]);

        match std::str::from_utf8(&head) {
            Ok(text) => {
                self.push_str(text)?;
                Ok(&input[available..])
            }
            Err(err) => match err.error_len() {
                None if available == input.len() => {
                    self.pending = head;
                    Ok(&[])
                }
                None => {
                    trace!(bytes = head.len(), "truncated rune replaced");
                    self.push_str(REPLACEMENT)?;
                    Ok(&input[available..])
                }
                Some(invalid) => {
                    trace!(bytes = invalid, "invalid rune replaced");
                    self.push_str(REPLACEMENT)?;
                    // Bytes past the invalid prefix are decoded afresh.
                    Ok(&input[invalid.saturating_sub(held).min(input.len())..])
                }
            },
        }
    }

    fn push_utf8(&mut self, bytes: &[u8]) -> Result<(), SkipError> {
        let mut chunks = bytes.utf8_chunks().peekable();
        while let Some(chunk) = chunks.next() {
            self.push_str(chunk.valid())?;

            let invalid = chunk.invalid();
            if invalid.is_empty() {
                continue;
            }
            if chunks.peek().is_none() && is_incomplete(invalid) {
                self.pending.extend_from_slice(invalid);
            } else {
                self.push_str(REPLACEMENT)?;
            }
        }
        Ok(())
    }

    fn push_str(&mut self, text: &str) -> Result<(), SkipError> {
        let mut rest = text;
        while !self.is_past_threshold() {
            let Some(c) = rest.chars().next() else {
                return Ok(());
            };
            self.push_rune(c)?;
            rest = &rest[c.len_utf8()..];
        }

        // Past the threshold every rune is copied; only the escape state
        // still needs tracking.
        self.emit_tracked(rest.as_bytes())
    }

    /// Copy `bytes` to the sink, updating the escape state for each part
    /// the sink accepts.
    fn emit_tracked(&mut self, mut bytes: &[u8]) -> Result<(), SkipError> {
        while !bytes.is_empty() {
            match self.sink.write(bytes) {
                Ok(0) => return Err(sink_failed(io::Error::from(io::ErrorKind::WriteZero))),
                Ok(n) => {
                    self.track_escapes(&bytes[..n]);
                    bytes = &bytes[n..];
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(sink_failed(err)),
            }
        }
        Ok(())
    }

    /// Handle one rune while still inside the skipped region.
    fn push_rune(&mut self, c: char) -> Result<(), SkipError> {
        if ansi::is_marker(c) {
            emit_char(&mut self.sink, c)?;
            self.in_escape = true;
            return Ok(());
        }
        if self.in_escape {
            emit_char(&mut self.sink, c)?;
            if ansi::is_terminator(c) {
                self.in_escape = false;
            }
            return Ok(());
        }

        let reached = self.consumed.saturating_add(rune_width(c));

        if !self.prefix.is_empty() && !self.prefix_emitted && reached >= self.threshold {
            emit(&mut self.sink, self.prefix.as_bytes())?;
            self.prefix_emitted = true;
            trace!(column = self.consumed, prefix = %self.prefix, "skip prefix emitted");
        }

        if reached > self.threshold {
            trace!(
                column = self.consumed,
                threshold = self.threshold,
                rune = %c,
                "wide rune straddles skip boundary"
            );
            while self.consumed < self.threshold {
                emit(&mut self.sink, FILL)?;
                self.consumed += 1;
            }
        } else {
            self.consumed = reached;
        }
        Ok(())
    }

    /// Marker and terminators are ASCII, so any byte split is safe.
    fn track_escapes(&mut self, bytes: &[u8]) {
        let tail = match bytes.iter().rposition(|&b| ansi::is_marker(char::from(b))) {
            Some(pos) => {
                self.in_escape = true;
                &bytes[pos + 1..]
            }
            None => bytes,
        };
        if self.in_escape && tail.iter().any(|&b| ansi::is_terminator(char::from(b))) {
            self.in_escape = false;
        }
    }
}

impl<W: Write> Write for SkipWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

fn sink_failed(err: io::Error) -> SkipError {
    debug!(error = %err, "skip sink write failed");
    SkipError::SinkWriteFailed(err)
}

#[inline]
fn emit<W: Write>(sink: &mut W, bytes: &[u8]) -> Result<(), SkipError> {
    sink.write_all(bytes).map_err(sink_failed)
}

#[inline]
fn emit_char<W: Write>(sink: &mut W, c: char) -> Result<(), SkipError> {
    let mut buf = [0u8; 4];
    emit(sink, c.encode_utf8(&mut buf).as_bytes())
}

fn emit_flush<W: Write>(sink: &mut W) -> Result<(), SkipError> {
    sink.flush().map_err(|err| {
        debug!(error = %err, "skip sink flush failed");
        SkipError::SinkWriteFailed(err)
    })
}

/// Encoded length announced by a UTF-8 lead byte, or 0 for bytes that
/// cannot start a sequence.
#[inline]
const fn utf8_sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

#[inline]
const fn is_continuation(b: u8) -> bool {
    b & 0xc0 == 0x80
}

/// True if `invalid` is the start of a rune cut off by the end of input.
fn is_incomplete(invalid: &[u8]) -> bool {
    !invalid.is_empty()
        && std::str::from_utf8(invalid).is_err_and(|err| err.error_len().is_none())
}
