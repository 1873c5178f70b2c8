//! Structural chunker: splits a document into segments at syntactically
//! safe boundaries.
//!
//! The scan keeps a running buffer, an open-block flag, and the
//! indentation at which the current block opened. A cut happens only when
//! the buffer has reached the line budget, no block is open, and the
//! candidate line is not indented deeper than the reference level.

use serde::{Deserialize, Serialize};

use crate::document::{Document, LineEnding};

/// Configuration for the structural chunker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum buffered lines before a cut is considered
    pub max_lines: usize,

    /// Characters that introduce a block when they end a line
    /// (`:` for indentation languages, `{` for brace languages)
    pub block_introducers: Vec<char>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_lines: 100,
            block_introducers: vec![':', '{'],
        }
    }
}

/// A contiguous slice of a document's lines treated as one rewrite unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    lines: Vec<String>,
    complete: bool,
}

impl Segment {
    /// The segment's lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines in the segment.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the segment ends at a structural boundary.
    ///
    /// A segment forced to end inside an open block is marked partial so
    /// downstream consumers can treat it cautiously.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The segment text, joined with the given separator.
    pub fn text(&self, newline: LineEnding) -> String {
        self.lines.join(newline.as_str())
    }
}

/// Split a document into an ordered list of segments.
///
/// Concatenating the segments' texts in order, separated by the document's
/// line separator, reproduces the document body exactly, for every input,
/// degenerate or not.
///
/// A document with at most `max_lines` lines comes back as a single
/// complete segment, untouched.
pub fn chunk(document: &Document, config: &ChunkConfig) -> Vec<Segment> {
    let lines = document.lines();

    if lines.len() <= config.max_lines {
        return vec![Segment {
            lines: lines.to_vec(),
            complete: true,
        }];
    }

    let mut segments = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    let mut open_block = false;
    let mut block_indent = 0usize;

    for line in lines {
        // Blank lines never trigger a cut and never toggle block state.
        if line.trim().is_empty() {
            buffer.push(line.clone());
            continue;
        }

        let indent = indent_width(line);

        // A non-blank line at or above the reference indentation closes the
        // open block; the closing line's indentation becomes the new
        // reference, supporting immediately nested closes.
        if open_block && indent <= block_indent {
            open_block = false;
            block_indent = indent;
        }

        if buffer.len() >= config.max_lines && !open_block && indent <= block_indent {
            segments.push(Segment {
                lines: std::mem::take(&mut buffer),
                complete: true,
            });
        }

        if opens_block(line, &config.block_introducers) {
            open_block = true;
            block_indent = indent;
        }

        buffer.push(line.clone());
    }

    // The final buffer is emitted even when short of the budget; a trailing
    // unclosed block marks it partial.
    segments.push(Segment {
        lines: buffer,
        complete: !open_block,
    });

    tracing::debug!(
        "Chunked {} lines into {} segments (max {})",
        lines.len(),
        segments.len(),
        config.max_lines
    );

    segments
}

/// Indentation level of a line: the number of leading whitespace
/// characters. Used only to detect block boundaries, never to re-indent.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// A line opens a block when its last non-blank character is one of the
/// configured block introducers.
fn opens_block(line: &str, introducers: &[char]) -> bool {
    match line.trim().chars().last() {
        Some(c) => introducers.contains(&c),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::parse(&lines.join("\n"))
    }

    fn config(max_lines: usize) -> ChunkConfig {
        ChunkConfig {
            max_lines,
            ..ChunkConfig::default()
        }
    }

    fn reassemble(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| s.text(LineEnding::Lf))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_small_document_single_segment() {
        let d = doc(&["a = 1", "b = 2", "c = 3"]);
        let segments = chunk(&d, &config(100));

        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_complete());
        assert_eq!(segments[0].text(LineEnding::Lf), "a = 1\nb = 2\nc = 3");
    }

    #[test]
    fn test_empty_document_single_empty_segment() {
        let d = Document::parse("");
        let segments = chunk(&d, &config(10));

        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_complete());
        assert_eq!(segments[0].line_count(), 0);
        assert_eq!(segments[0].text(LineEnding::Lf), "");
    }

    #[test]
    fn test_lossless_split_flat_lines() {
        let lines: Vec<String> = (0..250).map(|i| format!("line_{} = {}", i, i)).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let d = doc(&refs);

        let segments = chunk(&d, &config(100));

        assert!(segments.len() > 1);
        assert_eq!(reassemble(&segments), d.render());
        for segment in &segments {
            assert!(segment.is_complete());
        }
    }

    #[test]
    fn test_cut_waits_for_block_close() {
        // 250 lines with a 40-line nested block straddling line 100.
        let mut lines: Vec<String> = Vec::new();
        for i in 0..94 {
            lines.push(format!("top_{} = {}", i, i));
        }
        lines.push("def handler():".to_string());
        for i in 0..40 {
            lines.push(format!("    step_{}()", i));
        }
        while lines.len() < 250 {
            lines.push(format!("tail_{} = 0", lines.len()));
        }
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let d = doc(&refs);

        let segments = chunk(&d, &config(100));

        // Lossless reassembly.
        assert_eq!(reassemble(&segments), d.render());
        assert!(segments.len() > 1);

        // No cut lands inside the block: the opener and the full body stay
        // in one segment, and every later segment starts at top level.
        for segment in &segments[..segments.len() - 1] {
            assert!(segment.is_complete());
        }
        for segment in &segments[1..] {
            let first = segment.lines().first().unwrap();
            assert_eq!(super::indent_width(first), 0, "cut inside block: {:?}", first);
        }

        // The first segment swallowed the whole block rather than cutting
        // at the raw line budget.
        assert!(segments[0].line_count() > 100);
        assert!(segments[0]
            .lines()
            .iter()
            .any(|l| l.starts_with("def handler")));
        assert!(segments[0].lines().iter().any(|l| l.contains("step_39")));
    }

    #[test]
    fn test_trailing_open_block_marked_partial() {
        let mut lines: Vec<String> = (0..120).map(|i| format!("x_{} = {}", i, i)).collect();
        lines.push("def tail():".to_string());
        lines.push("    pending()".to_string());
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let d = doc(&refs);

        let segments = chunk(&d, &config(50));

        assert_eq!(reassemble(&segments), d.render());
        let last = segments.last().unwrap();
        assert!(!last.is_complete());
        for segment in &segments[..segments.len() - 1] {
            assert!(segment.is_complete());
        }
    }

    #[test]
    fn test_blank_lines_never_cut() {
        // All-blank document longer than the budget: blank lines are
        // buffered without ever triggering a boundary.
        let lines: Vec<&str> = std::iter::repeat("").take(30).collect();
        let d = doc(&lines);

        let segments = chunk(&d, &config(10));

        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_complete());
        assert_eq!(reassemble(&segments), d.render());
    }

    #[test]
    fn test_blank_lines_do_not_toggle_block_state() {
        let mut lines: Vec<String> = (0..60).map(|i| format!("a_{} = {}", i, i)).collect();
        lines.push("def f():".to_string());
        lines.push("    one()".to_string());
        lines.push(String::new());
        lines.push("    two()".to_string());
        for i in 0..60 {
            lines.push(format!("b_{} = {}", i, i));
        }
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let d = doc(&refs);

        let segments = chunk(&d, &config(61));

        assert_eq!(reassemble(&segments), d.render());
        // The blank line inside the block must not have closed it: the cut
        // after the budget falls on a top-level line, past the block.
        let first = &segments[0];
        assert!(first.lines().iter().any(|l| l.contains("two()")));
    }

    #[test]
    fn test_brace_introducer_keeps_body_together() {
        let mut lines: Vec<String> = (0..48).map(|i| format!("let x{} = {};", i, i)).collect();
        lines.push("fn run() {".to_string());
        lines.push("    work();".to_string());
        lines.push("    more();".to_string());
        lines.push("}".to_string());
        for i in 0..48 {
            lines.push(format!("let y{} = {};", i, i));
        }
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let d = doc(&refs);

        let cfg = ChunkConfig {
            max_lines: 49,
            block_introducers: vec!['{'],
        };
        let segments = chunk(&d, &cfg);

        assert_eq!(reassemble(&segments), d.render());
        // The opener and its body are never separated; the closing line is
        // the first candidate at the reference level, so it starts the next
        // segment under the flat indentation heuristic.
        let first = &segments[0];
        assert!(first.lines().iter().any(|l| l.contains("fn run()")));
        assert!(first.lines().iter().any(|l| l.contains("more();")));
        assert_eq!(segments[1].lines().first().unwrap(), "}");
    }

    #[test]
    fn test_crlf_documents_split_losslessly() {
        let text = (0..30)
            .map(|i| format!("line{}", i))
            .collect::<Vec<_>>()
            .join("\r\n");
        let d = Document::parse(&text);

        let segments = chunk(&d, &config(10));

        let rejoined = segments
            .iter()
            .map(|s| s.text(LineEnding::CrLf))
            .collect::<Vec<_>>()
            .join("\r\n");
        assert_eq!(rejoined, text);
        assert!(segments.len() >= 3);
    }
}
