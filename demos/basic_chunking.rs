//! Basic Document Chunking
//!
//! Clean some extracted blocks, chunk them, and print each chunk with its
//! provenance.
//!
//! ```bash
//! cargo run --example basic_chunking
//! RUST_LOG=strata=debug WIKICRAFT_CHUNK_SIZE=300 cargo run --example basic_chunking
//! ```

use strata::{
    ChunkConfig, ContentBlock, DocumentMetadata, DocumentType, ParsedDocument, SemanticChunker,
    TextCleaner,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ChunkConfig::from_env()?;
    let cleaner = TextCleaner::new();

    let raw = [
        (true, "Machine Learning", 1),
        (
            false,
            "Machine learning models learn patterns from data.  They generalize these \
             patterns to make predictions.\r\nThis is fundamentally different from \
             traditional programming, where rules are written by hand.",
            1,
        ),
        (true, "Deep Learning", 2),
        (
            false,
            "Deep learning extends this with multiple hidden layers. Each layer learns \
             increasingly abstract representations. Training needs large datasets and \
             specialized hardware. Results on images, speech and text have been striking.",
            2,
        ),
    ];

    let blocks = raw
        .iter()
        .enumerate()
        .map(|(position, &(is_heading, text, page))| {
            let text = cleaner.clean(text);
            let block = if is_heading {
                ContentBlock::heading(text, position)
            } else {
                ContentBlock::paragraph(text, position)
            };
            block.with_page(page)
        })
        .collect();

    let document = ParsedDocument::new(
        DocumentMetadata::new("ml-notes", "/notes/ml.md", "7c4a8d09", DocumentType::Markdown)
            .with_title("ML Notes"),
        blocks,
    );

    let chunks = SemanticChunker::new(config).chunk_document(&document);

    println!(
        "Config: target {} / min {} / max {} / overlap {}",
        config.target_size(),
        config.min_size(),
        config.max_size(),
        config.overlap()
    );
    println!("Chunks: {}\n", chunks.len());

    for chunk in &chunks {
        println!("[{}] {} ({} chars)", chunk.chunk_id(), chunk.citation(), chunk.len());
        println!("    {}\n", chunk.text.replace('\n', "\n    "));
    }

    Ok(())
}
