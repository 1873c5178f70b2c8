//! Document model: an ordered sequence of lines plus the metadata needed to
//! reproduce the original bytes exactly.
//!
//! Rejoining the lines with the original separator (and restoring the
//! trailing separator when the input had one) must yield byte-identical
//! text. Nothing here normalizes line endings or trailing whitespace.

use serde::{Deserialize, Serialize};

/// The line separator used by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style `\n`
    Lf,
    /// Windows-style `\r\n`
    CrLf,
}

impl LineEnding {
    /// The separator as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// An immutable document: lines, separator, and trailing-separator flag.
///
/// Every transformation produces a new `Document`; no instance is mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    lines: Vec<String>,
    newline: LineEnding,
    trailing_newline: bool,
}

impl Document {
    /// Parse text into a document, detecting the line separator from the
    /// first line break. A document with no line break at all is treated
    /// as LF.
    pub fn parse(text: &str) -> Self {
        let newline = if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        let sep = newline.as_str();

        let trailing_newline = text.ends_with(sep);
        let body = if trailing_newline {
            &text[..text.len() - sep.len()]
        } else {
            text
        };

        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split(sep).map(str::to_string).collect()
        };

        Self {
            lines,
            newline,
            trailing_newline,
        }
    }

    /// Render the document back to text.
    ///
    /// Invariant: `Document::parse(s).render() == s` for every input.
    pub fn render(&self) -> String {
        let mut out = self.lines.join(self.newline.as_str());
        if self.trailing_newline {
            out.push_str(self.newline.as_str());
        }
        out
    }

    /// The document's lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The detected line separator.
    pub fn newline(&self) -> LineEnding {
        self.newline
    }

    /// Build a new document from replacement text, keeping this document's
    /// separator and trailing-separator metadata.
    ///
    /// Used by the merge step: the rewritten body inherits the original
    /// file's line-ending convention.
    pub fn with_text(&self, text: &str) -> Self {
        let lines = if text.is_empty() && self.lines.is_empty() {
            Vec::new()
        } else {
            text.split(self.newline.as_str()).map(str::to_string).collect()
        };

        Self {
            lines,
            newline: self.newline,
            trailing_newline: self.trailing_newline,
        }
    }
}
