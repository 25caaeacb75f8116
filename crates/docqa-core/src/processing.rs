use crate::error::{DocqaError, Result};
use crate::models::{ChunkId, ChunkMetadata, ChunkSource, DocumentPage, TextChunk};

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Default overlap between consecutive chunks in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum chunk size in characters
    pub max_size: usize,

    /// Overlap size in characters for context preservation
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { max_size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

impl ChunkConfig {
    pub fn new(max_size: usize, overlap: usize) -> Result<Self> {
        let config = Self { max_size, overlap };
        config.validate()?;
        Ok(config)
    }

    /// Check `0 <= overlap < max_size`
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(DocqaError::invalid_config("chunk_size", "max_size must be at least 1"));
        }

        if self.overlap >= self.max_size {
            return Err(DocqaError::invalid_config(
                "chunk_overlap",
                format!(
                    "overlap ({}) must be less than max_size ({})",
                    self.overlap, self.max_size
                ),
            ));
        }

        Ok(())
    }
}

/// Character ranges `[start, end)` covering a text of `len` characters
///
/// Every window except the last is exactly `max_size` long and each window
/// starts `overlap` characters before the previous one ended.
pub fn chunk_windows(len: usize, config: &ChunkConfig) -> Vec<(usize, usize)> {
    let mut windows = Vec::new();
    let mut start = 0;

    while start < len {
        let end = (start + config.max_size).min(len);
        windows.push((start, end));

        if end == len {
            break;
        }

        start = end - config.overlap;
    }

    windows
}

/// Split every page into overlapping chunks
///
/// Chunk ids are assigned sequentially across all pages in input order.
/// Chunks never span two pages.
pub fn split_documents(pages: &[DocumentPage], config: &ChunkConfig) -> Result<Vec<TextChunk>> {
    config.validate()?;

    let mut chunks = Vec::new();
    let mut next_id = 0u64;

    for page in pages {
        // Byte position of every character, plus the end of the text
        let boundaries: Vec<usize> = page
            .text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(page.text.len()))
            .collect();
        let char_len = boundaries.len() - 1;

        for (start, end) in chunk_windows(char_len, config) {
            chunks.push(TextChunk {
                id: ChunkId(next_id),
                content: page.text[boundaries[start]..boundaries[end]].to_string(),
                source: ChunkSource {
                    document_path: page.source.document_path.clone(),
                    page: Some(page.source.page),
                    offset: start,
                },
                metadata: ChunkMetadata { size: end - start },
            });
            next_id += 1;
        }
    }

    tracing::debug!(
        pages = pages.len(),
        chunks = chunks.len(),
        max_size = config.max_size,
        overlap = config.overlap,
        "split documents"
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page(text: &str, page: usize) -> DocumentPage {
        DocumentPage::new(text, "report.pdf", page)
    }

    #[test]
    fn test_two_page_scenario() {
        let pages = vec![page(&"a".repeat(12_000), 1), page(&"b".repeat(5_000), 2)];
        let config = ChunkConfig::new(10_000, 1_000).unwrap();

        let chunks = split_documents(&pages, &config).unwrap();

        assert_eq!(chunks.len(), 3);

        assert_eq!(chunks[0].source.page, Some(1));
        assert_eq!(chunks[0].source.offset, 0);
        assert_eq!(chunks[0].metadata.size, 10_000);

        assert_eq!(chunks[1].source.page, Some(1));
        assert_eq!(chunks[1].source.offset, 9_000);
        assert_eq!(chunks[1].metadata.size, 3_000);

        assert_eq!(chunks[2].source.page, Some(2));
        assert_eq!(chunks[2].source.offset, 0);
        assert_eq!(chunks[2].metadata.size, 5_000);
    }

    #[test]
    fn test_chunk_ids_sequential() {
        let pages = vec![page(&"x".repeat(250), 1), page(&"y".repeat(250), 2)];
        let config = ChunkConfig::new(100, 10).unwrap();

        let chunks = split_documents(&pages, &config).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.id.0, i as u64);
        }
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let err = ChunkConfig::new(100, 100).unwrap_err();
        assert!(matches!(err, DocqaError::InvalidConfig { ref key, .. } if key == "chunk_overlap"));

        let err = ChunkConfig::new(0, 0).unwrap_err();
        assert!(matches!(err, DocqaError::InvalidConfig { ref key, .. } if key == "chunk_size"));
    }

    #[test]
    fn test_split_rejects_invalid_config_literal() {
        let config = ChunkConfig { max_size: 10, overlap: 20 };
        let result = split_documents(&[page("hello", 1)], &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_page_produces_no_chunks() {
        let chunks = split_documents(&[page("", 1)], &ChunkConfig::default()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_short_page_is_one_chunk() {
        let chunks = split_documents(&[page("Short text.", 4)], &ChunkConfig::default()).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Short text.");
        assert_eq!(chunks[0].source.page, Some(4));
        assert_eq!(chunks[0].source.document_path, "report.pdf");
    }

    #[test]
    fn test_multibyte_text_is_split_on_characters() {
        let text = "é".repeat(25);
        let config = ChunkConfig::new(10, 3).unwrap();

        let chunks = split_documents(&[page(&text, 1)], &config).unwrap();

        assert_eq!(chunks[0].content.chars().count(), 10);
        assert_eq!(chunks[1].source.offset, 7);
        assert!(chunks.iter().all(|c| c.content.chars().all(|ch| ch == 'é')));
    }

    #[test]
    fn test_no_overlap() {
        assert_eq!(
            chunk_windows(25, &ChunkConfig { max_size: 10, overlap: 0 }),
            vec![(0, 10), (10, 20), (20, 25)]
        );
    }

    proptest! {
        #[test]
        fn prop_windows_cover_text_with_exact_overlap(
            len in 0usize..2_000,
            max_size in 1usize..300,
            overlap_seed in 0usize..300,
        ) {
            let overlap = overlap_seed % max_size;
            let config = ChunkConfig { max_size, overlap };
            let windows = chunk_windows(len, &config);

            if len == 0 {
                prop_assert!(windows.is_empty());
            } else {
                prop_assert_eq!(windows.first().unwrap().0, 0);
                prop_assert_eq!(windows.last().unwrap().1, len);
            }

            for (i, (start, end)) in windows.iter().enumerate() {
                prop_assert!(start < end);
                prop_assert!(end - start <= max_size);
                if i + 1 < windows.len() {
                    prop_assert_eq!(end - start, max_size);
                    let (next_start, _) = windows[i + 1];
                    prop_assert_eq!(end - next_start, overlap);
                }
            }
        }

        #[test]
        fn prop_split_is_deterministic_and_reconstructs_text(
            text in "[a-z é\n]{0,400}",
            max_size in 2usize..60,
            overlap_seed in 0usize..60,
        ) {
            let overlap = overlap_seed % max_size;
            let config = ChunkConfig { max_size, overlap };
            let pages = vec![page(&text, 1)];

            let first = split_documents(&pages, &config).unwrap();
            let second = split_documents(&pages, &config).unwrap();
            prop_assert_eq!(&first, &second);

            let mut rebuilt = String::new();
            for (i, chunk) in first.iter().enumerate() {
                if i == 0 {
                    rebuilt.push_str(&chunk.content);
                } else {
                    rebuilt.extend(chunk.content.chars().skip(overlap));
                }
            }
            prop_assert_eq!(rebuilt, text);
        }
    }
}
