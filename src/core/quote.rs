use std::collections::VecDeque;
use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    RecordStart,
    /// A `\r` just ended a line; a following `\n` belongs to it.
    AfterCr,
    StartField,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Passes bytes through untouched while following the same quoting rules as
/// the csv reader. It tells the caller two things the csv reader hides:
/// whether input ended inside a quoted field, and where the blank lines were.
#[derive(Debug)]
pub struct QuoteTracker<R> {
    inner: R,
    delimiter: u8,
    quote: u8,
    state: QuoteState,
    eof: bool,
    /// Records terminated so far, not counting blank lines.
    records: u64,
    /// For each blank line, the number of records that precede it.
    blank_lines: VecDeque<u64>,
}

impl<R: Read> QuoteTracker<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            delimiter: b',',
            quote: b'"',
            state: QuoteState::RecordStart,
            eof: false,
            records: 0,
            blank_lines: VecDeque::new(),
        }
    }

    pub fn ended_in_quoted_field(&self) -> bool {
        self.eof && self.state == QuoteState::Quoted
    }

    /// Removes and counts the blank lines seen before record `record` (0-based).
    pub fn take_blank_lines_before(&mut self, record: u64) -> usize {
        let mut taken = 0;
        while self.blank_lines.front().is_some_and(|&r| r <= record) {
            self.blank_lines.pop_front();
            taken += 1;
        }
        taken
    }

    fn advance(&mut self, byte: u8) {
        let state = self.state;
        self.state = match state {
            QuoteState::AfterCr if byte == b'\n' => QuoteState::RecordStart,
            QuoteState::RecordStart | QuoteState::AfterCr => self.record_start(byte),
            QuoteState::Quoted if byte == self.quote => QuoteState::QuoteInQuoted,
            QuoteState::Quoted => QuoteState::Quoted,
            // Doubled quote inside a quoted field.
            QuoteState::QuoteInQuoted if byte == self.quote => QuoteState::Quoted,
            QuoteState::StartField if byte == self.quote => QuoteState::Quoted,
            _ if byte == b'\n' || byte == b'\r' => {
                self.records += 1;
                Self::line_end(byte)
            }
            _ if byte == self.delimiter => QuoteState::StartField,
            _ => QuoteState::Unquoted,
        };
    }

    fn record_start(&mut self, byte: u8) -> QuoteState {
        if byte == b'\n' || byte == b'\r' {
            self.blank_lines.push_back(self.records);
            Self::line_end(byte)
        } else if byte == self.quote {
            QuoteState::Quoted
        } else if byte == self.delimiter {
            QuoteState::StartField
        } else {
            QuoteState::Unquoted
        }
    }

    fn line_end(byte: u8) -> QuoteState {
        if byte == b'\r' {
            QuoteState::AfterCr
        } else {
            QuoteState::RecordStart
        }
    }
}

impl<R: Read> Read for QuoteTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.eof = true;
        }
        for &byte in &buf[..n] {
            self.advance(byte);
        }
        Ok(n)
    }
}
