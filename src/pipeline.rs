//! Handing chunks to the embedding and storage collaborators.
//!
//! The chunker does no I/O. Embedding models and vector stores live
//! elsewhere and are passed in, already configured, behind two traits:
//!
//! ```text
//! ParsedDocument ──► SemanticChunker ──► Vec<Chunk>
//!                                          │ batches of `batch_size`
//!                                          ▼
//!                                     Embedder::embed
//!                                          │
//!                                          ▼
//!                              ChunkStore::add_chunks ──► ids
//! ```
//!
//! Backends (ONNX, Candle, HTTP APIs, Chroma, pgvector, ...) implement the
//! traits. Nothing here is global: two [`Ingestor`]s with different stores
//! can run side by side.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::chunk::Chunk;
use crate::semantic::SemanticChunker;
use crate::{Error, Result};

/// Default number of chunk texts sent to the embedder per call.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Turns texts into embedding vectors.
pub trait Embedder: Send + Sync {
    /// Embed each text. Must return exactly one vector per input, in order.
    ///
    /// # Errors
    ///
    /// Backend failures should be reported as [`Error::Embedding`].
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// Persists embedded chunks.
pub trait ChunkStore: Send + Sync {
    /// Store chunks and return their ids, in input order.
    ///
    /// # Errors
    ///
    /// Backend failures should be reported as [`Error::Store`].
    fn add_chunks(&self, chunks: &[EmbeddedChunk]) -> Result<Vec<String>>;
}

/// A chunk together with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    /// The chunk.
    pub chunk: Chunk,
    /// Its embedding vector.
    pub embedding: Vec<f32>,
}

/// Outcome of ingesting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// The ingested document.
    pub document_id: String,
    /// Number of chunks stored. Zero is a valid outcome.
    pub chunks_created: usize,
    /// Ids returned by the store.
    pub chunk_ids: Vec<String>,
}

/// Chunks, embeds and stores documents.
pub struct Ingestor {
    chunker: SemanticChunker,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ChunkStore>,
    batch_size: usize,
}

impl Ingestor {
    /// Create an ingestor over the given collaborators.
    pub fn new(
        chunker: SemanticChunker,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn ChunkStore>,
    ) -> Self {
        Self {
            chunker,
            embedder,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set how many chunk texts go to the embedder per call (minimum 1).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Chunk, embed and store one document.
    ///
    /// A document that yields no chunks is reported with
    /// `chunks_created == 0` and neither collaborator is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if the embedder fails or returns the
    /// wrong number of vectors, and propagates store failures.
    pub fn ingest(&self, document: &crate::ParsedDocument) -> Result<IngestReport> {
        let document_id = document.metadata.document_id.clone();
        let chunks = self.chunker.chunk_document(document);
        if chunks.is_empty() {
            debug!(document_id = %document_id, "no chunks to ingest");
            return Ok(IngestReport {
                document_id,
                chunks_created: 0,
                chunk_ids: Vec::new(),
            });
        }

        let embedded = self.embed(chunks)?;
        let chunk_ids = self.store.add_chunks(&embedded).map_err(|e| {
            warn!(document_id = %document_id, error = %e, "failed to store chunks");
            e
        })?;

        Ok(IngestReport {
            document_id,
            chunks_created: chunk_ids.len(),
            chunk_ids,
        })
    }

    fn embed(&self, chunks: Vec<Chunk>) -> Result<Vec<EmbeddedChunk>> {
        let mut embeddings = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            debug!(batch = texts.len(), "embedding chunk batch");
            let vectors = self.embedder.embed(&texts)?;
            if vectors.len() != texts.len() {
                return Err(Error::Embedding(format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    vectors.len()
                )));
            }
            embeddings.extend(vectors);
        }

        Ok(chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::block::{ContentBlock, DocumentMetadata, DocumentType, ParsedDocument};
    use crate::ChunkConfig;

    #[derive(Default)]
    struct CountingEmbedder {
        calls: Mutex<Vec<usize>>,
        drop_one: bool,
    }

    impl Embedder for CountingEmbedder {
        fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            self.calls.lock().unwrap().push(texts.len());
            let mut out: Vec<Vec<f32>> = texts.iter().map(|t| vec![t.len() as f32]).collect();
            if self.drop_one {
                out.pop();
            }
            Ok(out)
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        stored: Mutex<Vec<EmbeddedChunk>>,
        fail: bool,
    }

    impl ChunkStore for MemoryStore {
        fn add_chunks(&self, chunks: &[EmbeddedChunk]) -> Result<Vec<String>> {
            if self.fail {
                return Err(Error::Store("disk full".into()));
            }
            self.stored.lock().unwrap().extend_from_slice(chunks);
            Ok(chunks.iter().map(|c| c.chunk.chunk_id()).collect())
        }
    }

    fn document(paragraphs: usize) -> ParsedDocument {
        let blocks = (0..paragraphs)
            .map(|i| ContentBlock::heading(format!("Section {i}"), i * 2))
            .zip((0..paragraphs).map(|i| {
                ContentBlock::paragraph("Each section has a body of reasonable size. ".repeat(4), i * 2 + 1)
            }))
            .flat_map(|(h, p)| [h, p])
            .collect();
        ParsedDocument::new(
            DocumentMetadata::new("doc-9", "/x.md", "h", DocumentType::Markdown),
            blocks,
        )
    }

    #[test]
    fn test_ingest_batches_and_stores() {
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(MemoryStore::default());
        let ingestor = Ingestor::new(SemanticChunker::default(), embedder.clone(), store.clone())
            .with_batch_size(2);

        let report = ingestor.ingest(&document(5)).unwrap();

        assert_eq!(report.chunks_created, 5);
        assert_eq!(report.chunk_ids, ["doc-9#0", "doc-9#1", "doc-9#2", "doc-9#3", "doc-9#4"]);
        assert_eq!(*embedder.calls.lock().unwrap(), [2, 2, 1]);

        let stored = store.stored.lock().unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(stored[0].embedding, vec![stored[0].chunk.text.len() as f32]);
    }

    #[test]
    fn test_empty_document_skips_collaborators() {
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(MemoryStore {
            fail: true,
            ..MemoryStore::default()
        });
        let ingestor = Ingestor::new(SemanticChunker::default(), embedder.clone(), store);

        let report = ingestor.ingest(&document(0)).unwrap();

        assert_eq!(report.chunks_created, 0);
        assert!(embedder.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_embedding_count_mismatch() {
        let embedder = Arc::new(CountingEmbedder {
            drop_one: true,
            ..CountingEmbedder::default()
        });
        let ingestor = Ingestor::new(
            SemanticChunker::new(ChunkConfig::default()),
            embedder,
            Arc::new(MemoryStore::default()),
        );

        assert!(matches!(ingestor.ingest(&document(1)), Err(Error::Embedding(_))));
    }

    #[test]
    fn test_store_failure_propagates() {
        let ingestor = Ingestor::new(
            SemanticChunker::default(),
            Arc::new(CountingEmbedder::default()),
            Arc::new(MemoryStore {
                fail: true,
                ..MemoryStore::default()
            }),
        );

        assert!(matches!(ingestor.ingest(&document(2)), Err(Error::Store(_))));
    }
}
