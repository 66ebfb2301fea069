//! Document chunking strategies.
//!
//! Provides the `Chunker` trait and the recursive separator-priority
//! implementation used to split corpus documents before embedding.

use std::collections::VecDeque;
use std::ops::Range;

use super::config::ChunkingConfig;

/// A raw chunk before it is attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    /// Byte range in the source document (start, end).
    pub byte_range: (usize, usize),

    /// Character range in the source document (start, end).
    pub char_range: (usize, usize),

    /// The text content of this chunk.
    pub content: String,
}

impl RawChunk {
    /// Get character count.
    pub fn char_count(&self) -> usize {
        self.char_range.1 - self.char_range.0
    }
}

/// Trait for document chunking strategies.
pub trait Chunker: Send + Sync {
    /// Split document content into chunks.
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Vec<RawChunk>;
}

/// Recursive chunker: separator priority with size constraints.
///
/// Algorithm:
/// 1. Pick the first separator that occurs in the text (empty = per character)
/// 2. Split on it, keeping the separator at the start of the following piece
/// 3. Merge pieces shorter than `chunk_size` into chunks, carrying up to
///    `chunk_overlap` trailing characters into the next chunk
/// 4. Recurse into pieces that are still too long with the remaining separators
/// 5. Trim surrounding whitespace; drop chunks that are only whitespace
///
/// Every chunk is a contiguous slice of the input, so offsets are exact even
/// when the same text occurs more than once.
#[derive(Debug, Default)]
pub struct RecursiveChunker;

impl RecursiveChunker {
    /// Create a new recursive chunker.
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Vec<RawChunk> {
        if content.is_empty() {
            return Vec::new();
        }

        let separators: Vec<&str> = config.separators.iter().map(String::as_str).collect();
        let splitter = Splitter {
            text: content,
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        };

        let mut spans = Vec::new();
        splitter.split(0..content.len(), &separators, &mut spans);

        let mut cursor = CharCursor::default();
        let chunks: Vec<RawChunk> = spans
            .into_iter()
            .map(|span| {
                let text = &content[span.clone()];
                let char_start = cursor.advance_to(content, span.start);
                let char_end = char_start + text.chars().count();
                RawChunk {
                    byte_range: (span.start, span.end),
                    char_range: (char_start, char_end),
                    content: text.to_string(),
                }
            })
            .collect();

        tracing::trace!(
            target: "chunker",
            "split {} chars into {} chunks",
            content.chars().count(),
            chunks.len()
        );

        chunks
    }
}

/// Byte span into the document being split.
type Span = Range<usize>;

struct Splitter<'a> {
    text: &'a str,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Splitter<'_> {
    fn char_len(&self, span: &Span) -> usize {
        self.text[span.clone()].chars().count()
    }

    fn split(&self, span: Span, separators: &[&str], out: &mut Vec<Span>) {
        let slice = &self.text[span.clone()];

        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if slice.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut good: Vec<Span> = Vec::new();
        for piece in self.split_on(span, separator) {
            if self.char_len(&piece) < self.chunk_size {
                good.push(piece);
                continue;
            }

            if !good.is_empty() {
                self.merge(&good, out);
                good.clear();
            }

            if remaining.is_empty() {
                // Indivisible with what is left; emitted oversized.
                self.push_trimmed(piece, out);
            } else {
                self.split(piece, remaining, out);
            }
        }

        if !good.is_empty() {
            self.merge(&good, out);
        }
    }

    fn split_on(&self, span: Span, separator: &str) -> Vec<Span> {
        let slice = &self.text[span.clone()];

        if separator.is_empty() {
            return slice
                .char_indices()
                .map(|(i, c)| span.start + i..span.start + i + c.len_utf8())
                .collect();
        }

        let mut pieces = Vec::new();
        let mut piece_start = span.start;
        for (i, _) in slice.match_indices(separator) {
            let at = span.start + i;
            if at > piece_start {
                pieces.push(piece_start..at);
            }
            piece_start = at;
        }
        if piece_start < span.end {
            pieces.push(piece_start..span.end);
        }
        pieces
    }

    fn merge(&self, splits: &[Span], out: &mut Vec<Span>) {
        let mut current: VecDeque<(Span, usize)> = VecDeque::new();
        let mut total = 0usize;

        for split in splits {
            let len = self.char_len(split);

            if total + len > self.chunk_size && !current.is_empty() {
                self.emit(&current, out);

                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match current.pop_front() {
                        Some((_, first_len)) => total -= first_len,
                        None => break,
                    }
                }
            }

            current.push_back((split.clone(), len));
            total += len;
        }

        if !current.is_empty() {
            self.emit(&current, out);
        }
    }

    fn emit(&self, current: &VecDeque<(Span, usize)>, out: &mut Vec<Span>) {
        if let (Some((first, _)), Some((last, _))) = (current.front(), current.back()) {
            self.push_trimmed(first.start..last.end, out);
        }
    }

    fn push_trimmed(&self, span: Span, out: &mut Vec<Span>) {
        let raw = &self.text[span.clone()];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let start = span.start + (raw.len() - raw.trim_start().len());
        out.push(start..start + trimmed.len());
    }
}

/// Converts increasing byte offsets to character offsets without rescanning.
#[derive(Debug, Default)]
struct CharCursor {
    byte: usize,
    chars: usize,
}

impl CharCursor {
    fn advance_to(&mut self, text: &str, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}
