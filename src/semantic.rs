//! Structure-aware chunking of one extracted document.
//!
//! [`SemanticChunker`] ties the pieces together:
//!
//! ```text
//! ContentBlocks ──► assembler ──► unnumbered chunks ──► stamp ──► Vec<Chunk>
//!                   (sentences, overlap,
//!                    attribution inside)
//! ```
//!
//! "Semantic" here means structural: headings act as context boundaries
//! and splits prefer sentence ends. No embeddings or similarity scores are
//! involved.
//!
//! Chunking is pure and synchronous. Each call owns its state, so
//! documents can be chunked on as many threads as you like; within one
//! document the pass is strictly sequential.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::assembler::Assembler;
use crate::block::{ContentBlock, DocumentMetadata, ParsedDocument};
use crate::chunk::Chunk;
use crate::config::ChunkConfig;
use crate::provenance::stamp;
use crate::Chunker;

/// Splits documents into provenance-stamped chunks.
///
/// ## Example
///
/// ```rust
/// use strata::{ChunkConfig, ContentBlock, DocumentMetadata, DocumentType, ParsedDocument, SemanticChunker};
///
/// let config = ChunkConfig::new(200, 20, 400, 40)?;
/// let chunker = SemanticChunker::new(config);
///
/// let document = ParsedDocument::new(
///     DocumentMetadata::new("doc-7", "/docs/intro.md", "9f2c", DocumentType::Markdown),
///     vec![
///         ContentBlock::heading("Introduction", 0),
///         ContentBlock::paragraph("This guide walks through the setup. It assumes a Unix shell.", 1),
///     ],
/// );
///
/// let chunks = chunker.chunk_document(&document);
/// assert_eq!(chunks.len(), 1);
/// assert!(chunks[0].text.starts_with("Introduction\n\n"));
/// # Ok::<(), strata::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticChunker {
    config: ChunkConfig,
}

impl SemanticChunker {
    /// Create a chunker with a validated config.
    #[must_use]
    pub const fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// The config in use.
    #[must_use]
    pub const fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Chunk a parsed document.
    ///
    /// An empty document, or one whose content never reaches `min_size`,
    /// yields an empty list.
    #[must_use]
    pub fn chunk_document(&self, document: &ParsedDocument) -> Vec<Chunk> {
        self.chunk_blocks(&document.content_blocks, &document.metadata)
    }

    /// Chunk blocks belonging to the document described by `metadata`.
    ///
    /// Blocks must be in document order.
    #[must_use]
    pub fn chunk_blocks(&self, blocks: &[ContentBlock], metadata: &DocumentMetadata) -> Vec<Chunk> {
        let chunks = stamp(Assembler::new(&self.config, metadata).assemble(blocks));
        info!(
            document_id = %metadata.document_id,
            blocks = blocks.len(),
            chunks = chunks.len(),
            "chunked document"
        );
        chunks
    }

    /// Chunk several independent documents.
    ///
    /// Results are in input order. With the `parallel` feature documents
    /// are processed on the rayon pool.
    #[must_use]
    pub fn chunk_documents(&self, documents: &[ParsedDocument]) -> Vec<Vec<Chunk>> {
        #[cfg(feature = "parallel")]
        {
            documents
                .par_iter()
                .map(|document| self.chunk_document(document))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            documents
                .iter()
                .map(|document| self.chunk_document(document))
                .collect()
        }
    }
}

impl Chunker for SemanticChunker {
    fn chunk(&self, document: &ParsedDocument) -> Vec<Chunk> {
        self.chunk_document(document)
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / self.config.target_size()).max(1)
    }
}
