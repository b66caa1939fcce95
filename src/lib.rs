//! # strata
//!
//! Structure-aware chunking with provenance for retrieval pipelines.
//!
//! ## The Problem
//!
//! Extractors turn PDFs, Word files and web pages into ordered content
//! blocks: headings, paragraphs, list items, tables. Retrieval needs pieces
//! small enough to embed, large enough to mean something, and traceable back
//! to where they came from. A chunk that says "see the table above" is no
//! use if you can't tell which document, page and section it was cut from.
//!
//! ## How Chunks Are Built
//!
//! ```text
//! [H "Intro"] [P "short"] [H "Methods"] [P 2500 chars ...] [P ...]
//!      │                        │
//!      │ heading: close pending │ heading: pending "Intro\n\nshort" is
//!      │                        │ below min_size, merged forward (dropped)
//!      ▼                        ▼
//!                         "Methods\n\n<2500 chars>"  > max_size
//!                                   │
//!                                   ▼ sentence windows, ~target_size each,
//!                                     each seeded with the previous overlap
//! Chunk 0 "Methods\n\n..."   Chunk 1 "<tail of 0> ..."   ...
//! ```
//!
//! - Headings start a new chunk and stay attached to the text below them.
//! - Blocks are joined with a blank line until adding one would pass
//!   `max_size`.
//! - Oversized spans are cut at sentence ends, with `overlap` chars of
//!   trailing context repeated at the start of the next chunk.
//! - Every chunk records the document, page, section path, block position
//!   and char span it came from, plus its index in the final list.
//!
//! All sizes and offsets count chars (Unicode scalar values), not bytes.
//!
//! ## Quick Start
//!
//! ```rust
//! use strata::{ContentBlock, DocumentMetadata, DocumentType, ParsedDocument, SemanticChunker};
//!
//! let document = ParsedDocument::new(
//!     DocumentMetadata::new("doc-1", "/manuals/setup.pdf", "e3b0c442", DocumentType::Pdf),
//!     vec![
//!         ContentBlock::heading("Installation", 0).with_page(1),
//!         ContentBlock::paragraph(
//!             "Download the installer for your platform. Run it and follow the prompts. "
//!                 .repeat(3),
//!             1,
//!         )
//!         .with_page(1),
//!     ],
//! );
//!
//! let chunks = SemanticChunker::default().chunk_document(&document);
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].page_number, Some(1));
//! assert!(chunks[0].text.starts_with("Installation\n\nDownload"));
//! assert_eq!(chunks[0].citation(), "/manuals/setup.pdf, p. 1");
//! ```
//!
//! ## Configuration
//!
//! [`ChunkConfig`] holds the four size knobs. It validates on construction
//! and can be read from `WIKICRAFT_*` environment variables or deserialized
//! with serde.
//!
//! | Field | Default | Meaning |
//! |-------|---------|---------|
//! | `target_size` | 1000 | Preferred chunk length |
//! | `min_size` | 100 | Shorter accumulations are merged forward |
//! | `max_size` | 2000 | Longest accumulation before a forced close |
//! | `overlap` | 200 | Trailing context repeated in the next chunk |
//!
//! ## Ingestion
//!
//! [`Ingestor`] chunks a document, embeds the chunks in batches through an
//! [`Embedder`] and hands them to a [`ChunkStore`]. Both are traits; bring
//! your own model and vector database.
//!
//! ## Features
//!
//! - `parallel` (default): [`SemanticChunker::chunk_documents`] runs on the
//!   rayon pool.

mod assembler;
mod attribution;
mod block;
mod chunk;
pub mod clean;
mod config;
mod error;
mod overlap;
mod pipeline;
mod provenance;
mod semantic;
mod sentence;
mod text;

pub use attribution::{attribute, PROBE_CHARS};
pub use block::{ContentBlock, ContentType, DocumentMetadata, DocumentType, ParsedDocument};
pub use chunk::Chunk;
pub use clean::TextCleaner;
pub use config::{
    ChunkConfig, ConfigError, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE, DEFAULT_OVERLAP,
    DEFAULT_TARGET_SIZE,
};
pub use error::{Error, Result};
pub use overlap::overlap_suffix;
pub use pipeline::{ChunkStore, EmbeddedChunk, Embedder, IngestReport, Ingestor, DEFAULT_BATCH_SIZE};
pub use provenance::stamp;
pub use semantic::SemanticChunker;
pub use sentence::{split_sentences, Sentences};

/// A document chunking strategy.
///
/// ```rust
/// use strata::{Chunker, ChunkConfig, ParsedDocument, SemanticChunker};
///
/// fn count(chunker: &dyn Chunker, document: &ParsedDocument) -> usize {
///     chunker.chunk(document).len()
/// }
///
/// let chunker = SemanticChunker::new(ChunkConfig::default());
/// let document = ParsedDocument::default();
/// assert_eq!(count(&chunker, &document), 0);
/// ```
pub trait Chunker: Send + Sync {
    /// Split a document into numbered chunks.
    fn chunk(&self, document: &ParsedDocument) -> Vec<Chunk>;

    /// Estimate the number of chunks for `text_len` chars of input.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize;
}

/// Chunk a document with the default configuration.
///
/// Shorthand for `SemanticChunker::default().chunk_document(document)`.
#[must_use]
pub fn chunk_document(document: &ParsedDocument) -> Vec<Chunk> {
    SemanticChunker::default().chunk_document(document)
}
