//! Restartable cursor over the raw bytes of a document.

use super::Error;

/// A position within a document.
///
/// Cursors are plain values: copying one saves a position that decoding can
/// later resume from. Offsets are absolute within the document, including for
/// cursors bounded to a single line by [`Cursor::line`]. Every slice returned
/// borrows from the document; nothing is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    r: &'a [u8],
    i: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of a document.
    pub const fn new(r: &'a [u8]) -> Self {
        Self { r, i: 0 }
    }

    /// The absolute offset of the next unread byte.
    pub const fn offset(&self) -> usize {
        self.i
    }

    /// The number of unread bytes.
    pub const fn remaining(&self) -> usize {
        self.r.len().saturating_sub(self.i)
    }

    /// Whether every byte has been read.
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Skip ASCII whitespace, including line breaks.
    pub fn skip_whitespace(&mut self) {
        while self.r.get(self.i).is_some_and(u8::is_ascii_whitespace) {
            self.i += 1;
        }
    }

    /// Skip a single space or tab, if one is next.
    pub fn skip_separator(&mut self) {
        if matches!(self.r.get(self.i), Some(b' ' | b'\t')) {
            self.i += 1;
        }
    }

    /// Take the next whitespace-delimited token, skipping any whitespace
    /// (including line breaks) before it.
    pub fn next_token(&mut self) -> Result<&'a [u8], Error> {
        self.skip_whitespace();

        let s = self.i;
        while self.r.get(self.i).is_some_and(|b| !b.is_ascii_whitespace()) {
            self.i += 1;
        }

        if s == self.i {
            Err(Error::UnexpectedEndOfInput { offset: s })?;
        }

        Ok(&self.r[s..self.i])
    }

    /// Take the next line, without its terminator.
    pub fn next_line(&mut self) -> Result<&'a [u8], Error> {
        Ok(self.line()?.rest())
    }

    /// Take the next line as a cursor bounded to it.
    ///
    /// Lines end in `\n`, optionally preceded by `\r`; neither is part of the
    /// returned line. A final line without a terminator is taken as-is.
    pub fn line(&mut self) -> Result<Cursor<'a>, Error> {
        let s = self.i;
        let tail = self.r.get(s..).unwrap_or_default();

        if tail.is_empty() {
            Err(Error::UnexpectedEndOfInput { offset: s })?;
        }

        let (mut end, next) = match tail.iter().position(|&b| b == b'\n') {
            Some(n) => (s + n, s + n + 1),
            None => (self.r.len(), self.r.len()),
        };

        if end > s && self.r[end - 1] == b'\r' {
            end -= 1;
        }

        self.i = next;

        Ok(Cursor {
            r: &self.r[..end],
            i: s,
        })
    }

    /// The unread bytes, without consuming them.
    pub fn unread(&self) -> &'a [u8] {
        self.r.get(self.i..).unwrap_or_default()
    }

    /// Take every unread byte.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = self.unread();
        self.i = self.r.len();

        rest
    }

    /// Take an exact number of bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let s = self.i;
        let e = s
            .checked_add(n)
            .filter(|&e| e <= self.r.len())
            .ok_or(Error::UnexpectedEndOfInput { offset: s })?;

        self.i = e;

        Ok(&self.r[s..e])
    }
}
