//! Benchmarks for document chunking.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strata::{
    overlap_suffix, split_sentences, ChunkConfig, ContentBlock, DocumentMetadata, DocumentType,
    ParsedDocument, SemanticChunker, TextCleaner,
};

fn sample_text(size: usize) -> String {
    let sentences = [
        "The quick brown fox jumps over the lazy dog. ",
        "Pack my box with five dozen liquor jugs. ",
        "How vexingly quick daft zebras jump! ",
        "The five boxing wizards jump quickly. ",
        "Sphinx of black quartz, judge my vow. ",
    ];
    let mut text = String::with_capacity(size);
    let mut i = 0;
    while text.len() < size {
        text.push_str(sentences[i % sentences.len()]);
        i += 1;
    }
    text.truncate(size);
    text
}

/// A document of roughly `size` chars: a heading every fourth block.
fn sample_document(size: usize) -> ParsedDocument {
    let paragraph = sample_text(600);
    let mut blocks = Vec::new();
    let mut total = 0;
    while total < size {
        let position = blocks.len();
        if position % 4 == 0 {
            blocks.push(ContentBlock::heading(format!("Section {position}"), position));
        } else {
            blocks.push(ContentBlock::paragraph(paragraph.clone(), position));
            total += paragraph.len();
        }
    }
    ParsedDocument::new(
        DocumentMetadata::new("bench", "/bench/doc.md", "0", DocumentType::Markdown),
        blocks,
    )
}

fn bench_semantic_chunker(c: &mut Criterion) {
    let mut group = c.benchmark_group("semantic_chunker");

    for size in [10_000, 100_000, 1_000_000] {
        let document = sample_document(size);
        let chunker = SemanticChunker::default();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("default", size), &document, |b, doc| {
            b.iter(|| chunker.chunk_document(black_box(doc)))
        });
    }

    // One huge paragraph forces the sentence-window path.
    let config = ChunkConfig::new(500, 50, 1000, 100).unwrap();
    let chunker = SemanticChunker::new(config);
    for size in [10_000, 100_000] {
        let document = ParsedDocument::new(
            DocumentMetadata::new("bench", "/bench/big.txt", "0", DocumentType::Text),
            vec![ContentBlock::paragraph(sample_text(size), 0)],
        );

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("single_block", size), &document, |b, doc| {
            b.iter(|| chunker.chunk_document(black_box(doc)))
        });
    }

    group.finish();
}

fn bench_many_documents(c: &mut Criterion) {
    let documents: Vec<ParsedDocument> = (0..64).map(|_| sample_document(20_000)).collect();
    let chunker = SemanticChunker::default();

    c.bench_function("chunk_documents/64x20k", |b| {
        b.iter(|| chunker.chunk_documents(black_box(&documents)))
    });
}

fn bench_sentences_and_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");
    let text = sample_text(100_000);

    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("split_sentences", |b| {
        b.iter(|| split_sentences(black_box(&text)).count())
    });

    let window = sample_text(1_000);
    group.bench_function("overlap_suffix", |b| {
        b.iter(|| overlap_suffix(black_box(&window), 200).len())
    });

    let cleaner = TextCleaner::new();
    group.bench_function("clean", |b| b.iter(|| cleaner.clean(black_box(&text))));

    group.finish();
}

criterion_group!(
    benches,
    bench_semantic_chunker,
    bench_many_documents,
    bench_sentences_and_overlap
);
criterion_main!(benches);
