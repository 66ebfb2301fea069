//! Property tests for recursive chunking.

use docsage::documents::{Chunker, ChunkingConfig, RawChunk, RecursiveChunker};
use proptest::prelude::*;

fn chunk(text: &str, size: usize, overlap: usize) -> Vec<RawChunk> {
    RecursiveChunker::new().chunk(text, &ChunkingConfig::new(size, overlap))
}

/// Text mixing words, spaces, newlines, paragraph breaks and multibyte chars.
fn corpus_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => "[a-z]{1,8}",
            2 => Just(" ".to_string()),
            1 => Just("\n".to_string()),
            1 => Just("\n\n".to_string()),
            1 => Just("é".to_string()),
        ],
        0..120,
    )
    .prop_map(|parts| parts.concat())
}

/// Single-space separated short words.
fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-dé]{1,5}", 1..80).prop_map(|words| words.join(" "))
}

fn size_and_overlap() -> impl Strategy<Value = (usize, usize)> {
    (1usize..80).prop_flat_map(|size| (Just(size), 0..size))
}

proptest! {
    #[test]
    fn proptest_chunks_are_exact_slices((size, overlap) in size_and_overlap(), text in corpus_text()) {
        let chars: Vec<char> = text.chars().collect();
        for c in chunk(&text, size, overlap) {
            let (start, end) = c.char_range;
            let slice: String = chars[start..end].iter().collect();
            prop_assert_eq!(&slice, &c.content);
            prop_assert_eq!(&text[c.byte_range.0..c.byte_range.1], c.content.as_str());
            prop_assert!(!c.content.is_empty());
            prop_assert_eq!(c.content.trim(), c.content.as_str());
        }
    }

    #[test]
    fn proptest_chunks_respect_size((size, overlap) in size_and_overlap(), text in corpus_text()) {
        for c in chunk(&text, size, overlap) {
            prop_assert!(c.char_count() <= size, "{} > {}", c.char_count(), size);
        }
    }

    #[test]
    fn proptest_chunks_cover_all_content((size, overlap) in size_and_overlap(), text in corpus_text()) {
        let chars: Vec<char> = text.chars().collect();
        let mut covered = vec![false; chars.len()];
        for c in chunk(&text, size, overlap) {
            covered[c.char_range.0..c.char_range.1].iter_mut().for_each(|slot| *slot = true);
        }
        for (i, ch) in chars.iter().enumerate() {
            prop_assert!(ch.is_whitespace() || covered[i], "char {} ({:?}) not covered", i, ch);
        }
    }

    #[test]
    fn proptest_chunks_in_document_order((size, overlap) in size_and_overlap(), text in corpus_text()) {
        let chunks = chunk(&text, size, overlap);
        for pair in chunks.windows(2) {
            prop_assert!(pair[0].char_range.0 <= pair[1].char_range.0);
        }
    }

    #[test]
    fn proptest_short_document_is_one_chunk(text in "[a-z]{1,10}( [a-z]{1,10}){0,5}") {
        let chunks = chunk(&text, 1000, 200);
        prop_assert_eq!(chunks.len(), 1);
        prop_assert_eq!(&chunks[0].content, &text);
    }

    #[test]
    fn proptest_consecutive_chunks_overlap(
        text in sentence(),
        (size, overlap) in (24usize..60).prop_flat_map(|size| (Just(size), 12..=size / 2)),
    ) {
        let chunks = chunk(&text, size, overlap);
        for pair in chunks.windows(2) {
            prop_assert!(
                pair[1].char_range.0 < pair[0].char_range.1,
                "no overlap between {:?} and {:?}", pair[0].content, pair[1].content
            );
        }
    }
}
