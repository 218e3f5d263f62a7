//! Indentation-aware text emitter
//!
//! Indentation is applied lazily: the prefix for the current depth is written
//! just before the first non-empty text of each line, so callers can change the
//! depth after a newline and before the line's content.

use super::rules::INDENT;

/// Indentation size (2 spaces)
pub const INDENT_SIZE: usize = INDENT.len();

/// Pretty printer state
#[derive(Debug)]
pub struct Printer {
    output: String,
    indent_level: usize,
    at_line_start: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    /// Write text to output, indenting first if this starts a line
    pub fn write(&mut self, text: &str) {
        if self.at_line_start && !text.is_empty() && text != "\n" {
            for _ in 0..self.indent_level {
                self.output.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    /// End the current line
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Get the output string, trailing whitespace removed
    pub fn finish(self) -> String {
        let mut output = self.output;
        output.truncate(output.trim_end().len());
        output
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}
