//! Structural chunking for the Redraft CLI.
//!
//! This crate splits a source file into rewrite-sized segments without
//! losing a single character:
//! - Detects the document's line separator and preserves it
//! - Cuts only at syntactically safe points (never inside an open block)
//! - Marks segments that were forced to end mid-block as partial
//!
//! Block boundaries are detected from indentation alone; there is no
//! explicit nesting stack.

pub mod chunker;
pub mod document;

pub use chunker::{chunk, ChunkConfig, Segment};
pub use document::{Document, LineEnding};
