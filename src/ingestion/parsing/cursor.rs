//! Character Cursor
//!
//! A positional, advance-on-success view over an immutable character buffer.
//! Every scanning operation either consumes input and returns a value, or
//! returns `None` and leaves the position untouched.

use std::ops::Range;

/// Positional view over a character buffer.
///
/// Invariant: `0 <= position <= end <= buffer.len()`.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buffer: &'a [char],
    position: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `buffer`.
    pub fn new(buffer: &'a [char]) -> Self {
        Self {
            buffer,
            position: 0,
            end: buffer.len(),
        }
    }

    /// Current position (index into the buffer).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor. Positions past `end` are clamped.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.end);
    }

    /// Index one past the last readable character.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.end
    }

    /// Number of characters left to read.
    pub fn remaining(&self) -> usize {
        self.end - self.position
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        if self.is_at_end() {
            return None;
        }
        Some(self.buffer[self.position])
    }

    /// Consumes and returns the next character.
    pub fn scan_char(&mut self) -> Option<char> {
        self.scan_if(|_| true)
    }

    /// Consumes and returns the next character if it satisfies `predicate`.
    pub fn scan_if(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        let c = self.peek()?;
        if !predicate(c) {
            return None;
        }
        self.position += 1;
        Some(c)
    }

    /// Consumes `literal` if the next characters match it exactly.
    pub fn scan_literal(&mut self, literal: &str) -> Option<String> {
        let len = literal.chars().count();
        if len > self.remaining() {
            return None;
        }

        let candidate = &self.buffer[self.position..self.position + len];
        if !candidate.iter().copied().eq(literal.chars()) {
            return None;
        }

        self.position += len;
        Some(literal.to_string())
    }

    /// Consumes everything up to `end` and returns it.
    pub fn scan_remainder(&mut self) -> String {
        let rest = self.slice(self.position..self.end);
        self.position = self.end;
        rest
    }

    /// The unconsumed input as a string, without consuming it.
    pub fn remainder(&self) -> String {
        self.slice(self.position..self.end)
    }

    /// Copy a range of the buffer into a string.
    pub fn slice(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.end);
        let end = range.end.min(self.end).max(start);
        self.buffer[start..end].iter().collect()
    }
}
