//! Recursive character splitting.
//!
//! The document is split on the coarsest boundary present (paragraphs, then lines,
//! then sentences, then words, then single characters). Pieces that are still too
//! large are split again with the next finer boundary. Small pieces are then merged
//! greedily up to `chunk_size`, carrying up to `chunk_overlap` characters of the
//! previous chunk into the next one.

use super::{ChunkingConfig, TextChunk};
use std::collections::VecDeque;
use tracing::debug;

/// Boundaries from coarsest to finest. The empty separator splits into characters.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Size-bounded recursive text splitter.
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker {
    config: ChunkingConfig,
}

impl RecursiveChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split a document into ordered, non-empty chunks.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let chunks: Vec<TextChunk> = self
            .split_recursive(text, SEPARATORS)
            .into_iter()
            .enumerate()
            .map(|(ordinal, content)| TextChunk::new(content, ordinal))
            .collect();

        debug!(
            "Split {} chars into {} chunks (size {}, overlap {})",
            text.len(),
            chunks.len(),
            self.config.chunk_size,
            self.config.chunk_overlap
        );

        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (separator, finer) = pick_separator(text, separators);
        let pieces = split_keeping_separator(text, separator);

        let mut chunks = Vec::new();
        let mut small: Vec<&str> = Vec::new();

        for piece in pieces {
            if char_len(piece) < self.config.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge(&small));
                small.clear();
            }

            if finer.is_empty() {
                // Indivisible at every boundary; kept oversized rather than truncated
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge(&small));
        }

        chunks
    }

    /// Greedily merge small pieces into chunks of at most `chunk_size` characters.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut chunks = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > size && !current.is_empty() {
                if let Some(chunk) = join(&current) {
                    chunks.push(chunk);
                }

                // Keep a tail of at most `overlap` characters that still leaves room
                while total > overlap || (total > 0 && total + len > size) {
                    match current.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            current.push_back((piece, len));
            total += len;
        }

        if let Some(chunk) = join(&current) {
            chunks.push(chunk);
        }

        chunks
    }
}

/// First separator that occurs in `text`, plus the finer separators after it.
fn pick_separator<'a>(text: &str, separators: &'a [&'a str]) -> (&'a str, &'a [&'a str]) {
    for (i, &separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return (separator, &[]);
        }
        if text.contains(separator) {
            return (separator, &separators[i + 1..]);
        }
    }
    ("", &[])
}

/// Split after each occurrence of `separator`, leaving it attached to the preceding piece.
fn split_keeping_separator<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    text.split_inclusive(separator)
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn join(pieces: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = pieces.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> RecursiveChunker {
        RecursiveChunker::new(ChunkingConfig::new(size, overlap).unwrap())
    }

    fn numbered_words(count: usize) -> String {
        (0..count).map(|i| format!("w{:04}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_and_blank_documents_have_no_chunks() {
        let chunker = RecursiveChunker::default();
        assert!(chunker.split("").is_empty());
        assert!(chunker.split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_short_document_is_single_chunk() {
        let chunks = RecursiveChunker::default().split("Hello world. This is short.");
        assert_eq!(chunks, vec![TextChunk::new("Hello world. This is short.".to_string(), 0)]);
    }

    #[test]
    fn test_unbroken_text_fills_every_chunk_but_last() {
        let text = "a".repeat(2500);
        let chunks = RecursiveChunker::default().split(&text);

        let lengths: Vec<usize> = chunks.iter().map(|c| c.char_len()).collect();
        assert_eq!(lengths, vec![1000, 1000, 900]);

        // Dropping the 200-char overlap from each later chunk rebuilds the document
        let mut rebuilt = chunks[0].content.clone();
        for chunk in &chunks[1..] {
            rebuilt.push_str(&chunk.content[200..]);
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_word_chunks_respect_size_and_overlap() {
        let text = numbered_words(600);
        let chunks = RecursiveChunker::default().split(&text);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.ordinal, i);
            assert!(chunk.char_len() <= 1000);
            assert!(!chunk.content.is_empty());
        }

        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0].content, &pair[1].content);
            let first_word = next.split(' ').next().unwrap();
            let pos = prev.find(first_word).expect("next chunk starts inside previous chunk");
            let shared = &prev[pos..];
            assert!(shared.len() <= 200);
            assert!(next.starts_with(shared));
        }

        // Every word of the document lands in some chunk
        for word in text.split(' ') {
            assert!(chunks.iter().any(|c| c.content.contains(word)), "missing {}", word);
        }
        assert!(chunks.last().unwrap().content.ends_with("w0599"));
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "First paragraph here.\n\nSecond paragraph is here.";
        let chunks = chunker(30, 0).split(text);

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["First paragraph here.", "Second paragraph is here."]);
    }

    #[test]
    fn test_falls_back_to_sentence_boundaries() {
        let text = "One sentence here. Another sentence here. Third one.";
        let chunks = chunker(40, 0).split(text);

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["One sentence here.", "Another sentence here. Third one."]);
    }

    #[test]
    fn test_oversized_paragraph_is_split_further() {
        let long_paragraph = numbered_words(20);
        let text = format!("Intro.\n\n{}", long_paragraph);
        let chunks = chunker(50, 10).split(&text);

        assert_eq!(chunks[0].content, "Intro.");
        assert!(chunks.iter().all(|c| c.char_len() <= 50));
        assert!(chunks.iter().any(|c| c.content.contains("w0019")));
    }

    #[test]
    fn test_multibyte_text_is_measured_in_characters() {
        let text = "é".repeat(30);
        let chunks = chunker(10, 2).split(&text);

        assert!(chunks.iter().all(|c| c.char_len() <= 10));
        assert_eq!(chunks[0].char_len(), 10);
    }

    #[test]
    fn test_split_is_deterministic() {
        let text = numbered_words(400);
        let chunker = RecursiveChunker::default();
        assert_eq!(chunker.split(&text), chunker.split(&text));
    }
}
