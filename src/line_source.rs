//! Forward-only cursor over the lines of a log document.
//!
//! The scanner and the section extractors share one [`LineSource`]: whatever an
//! extractor consumes is gone for the scanner, which resumes right after the
//! extractor's terminal marker.

use thiserror::Error;

/// Raised when the cursor is advanced past the last line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("end of stream")]
pub struct EndOfStream;

/// Sequential line stream over a borrowed document.
#[derive(Debug, Clone)]
pub struct LineSource<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
}

impl<'a> LineSource<'a> {
    /// Splits `text` on `\n` or `\r\n` boundaries.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            cursor: 0,
        }
    }

    /// Returns the next line, or [`EndOfStream`] once every line has been handed out.
    pub fn next_line(&mut self) -> Result<&'a str, EndOfStream> {
        let line = self.lines.get(self.cursor).copied().ok_or(EndOfStream)?;
        self.cursor += 1;
        Ok(line)
    }

    /// One-based number of the line most recently returned (0 before the first call).
    pub fn line_number(&self) -> usize {
        self.cursor
    }

    /// Number of lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len() - self.cursor
    }
}

impl<'a> From<&'a str> for LineSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}
